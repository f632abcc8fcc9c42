//! Form state: current selection, cascading choices and the submit flow.
//!
//! The form knows nothing about terminals; a front end feeds it input events
//! and renders [`FormState::notice`].

use crate::artifacts::LoadedContext;
use crate::error::{CrimeRiskError, Result};
use crate::predictor::{PredictionReport, RiskLabel};
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Years a user may pick.
pub const YEAR_RANGE: RangeInclusive<i32> = 2000..=2025;

/// Year preselected on a fresh form.
pub const DEFAULT_YEAR: i32 = 2023;

/// What the user has picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen state/UT, if any location exists.
    pub location: Option<String>,
    /// Chosen district within `location`.
    pub district: Option<String>,
    /// Chosen year.
    pub year: i32,
}

/// Submit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for input.
    Idle,
    /// A prediction is running.
    Predicting,
}

/// Rendered outcome of the last submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// High-risk banner.
    HighRisk,
    /// Low-risk banner.
    LowRisk,
    /// Failure with its description.
    Error(String),
}

impl Notice {
    /// Text shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Notice::HighRisk => RiskLabel::HighRisk.message().to_string(),
            Notice::LowRisk => RiskLabel::LowRisk.message().to_string(),
            Notice::Error(description) => {
                PredictionReport::Failed(description.clone()).message()
            }
        }
    }
}

impl From<PredictionReport> for Notice {
    fn from(report: PredictionReport) -> Self {
        match report {
            PredictionReport::Risk(RiskLabel::HighRisk) => Notice::HighRisk,
            PredictionReport::Risk(RiskLabel::LowRisk) => Notice::LowRisk,
            PredictionReport::Failed(description) => Notice::Error(description),
        }
    }
}

/// Interactive form over a loaded context.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use crimerisk::artifacts::LoadedContext;
/// # use crimerisk::data::{LocationRow, ReferenceDataset};
/// # use crimerisk::preprocessing::{EncoderSet, LabelEncoder};
/// # use crimerisk::tree::{DecisionTreeClassifier, TreeNode};
/// use crimerisk::form::{FormState, Notice};
///
/// # let encoders = EncoderSet::new()
/// #     .with_encoder("STATE/UT", LabelEncoder::from_classes(["Kerala"]))
/// #     .with_encoder("DISTRICT", LabelEncoder::from_classes(["Kochi"]));
/// # let dataset = ReferenceDataset::from_rows(vec![LocationRow::new("Kerala", "Kochi")]);
/// # let model = Arc::new(DecisionTreeClassifier::from_root(TreeNode::leaf(0, 1), 3).unwrap());
/// # let context = Arc::new(LoadedContext::new(model, encoders, dataset).unwrap());
/// let mut form = FormState::new(context);
/// assert_eq!(form.selection().district.as_deref(), Some("Kochi"));
/// form.submit();
/// assert_eq!(form.notice(), Some(&Notice::LowRisk));
/// ```
#[derive(Debug, Clone)]
pub struct FormState {
    context: Arc<LoadedContext>,
    location_idx: Option<usize>,
    district_idx: Option<usize>,
    year: i32,
    phase: Phase,
    notice: Option<Notice>,
}

impl FormState {
    /// Fresh form: first location, its first district, default year.
    #[must_use]
    pub fn new(context: Arc<LoadedContext>) -> Self {
        let mut form = Self {
            context,
            location_idx: None,
            district_idx: None,
            year: DEFAULT_YEAR,
            phase: Phase::Idle,
            notice: None,
        };
        if !form.locations().is_empty() {
            form.set_location_idx(0);
        }
        form
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &LoadedContext {
        &self.context
    }

    /// All selectable locations.
    #[must_use]
    pub fn locations(&self) -> &[String] {
        self.context.options().locations()
    }

    /// Districts selectable for the current location.
    #[must_use]
    pub fn districts(&self) -> &[String] {
        match self.location() {
            Some(location) => self.context.options().districts_for(location),
            None => &[],
        }
    }

    /// Current location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location_idx
            .and_then(|i| self.locations().get(i))
            .map(String::as_str)
    }

    /// Current district.
    #[must_use]
    pub fn district(&self) -> Option<&str> {
        self.district_idx
            .and_then(|i| self.districts().get(i))
            .map(String::as_str)
    }

    /// Index of the current location in [`locations`](Self::locations).
    #[must_use]
    pub fn location_index(&self) -> Option<usize> {
        self.location_idx
    }

    /// Index of the current district in [`districts`](Self::districts).
    #[must_use]
    pub fn district_index(&self) -> Option<usize> {
        self.district_idx
    }

    /// Current year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Snapshot of the current input.
    #[must_use]
    pub fn selection(&self) -> Selection {
        Selection {
            location: self.location().map(str::to_string),
            district: self.district().map(str::to_string),
            year: self.year,
        }
    }

    /// Submit lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome of the last submit.
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn set_location_idx(&mut self, idx: usize) {
        self.location_idx = Some(idx);
        // District choices depend on the location: start over from the first.
        self.district_idx = if self.districts().is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// Selects a location by name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if `location` is not offered.
    pub fn select_location(&mut self, location: &str) -> Result<()> {
        let idx = self
            .locations()
            .iter()
            .position(|l| l == location)
            .ok_or_else(|| {
                CrimeRiskError::invalid_selection(format!("'{location}' is not a listed location"))
            })?;
        self.set_location_idx(idx);
        Ok(())
    }

    /// Selects a district of the current location by name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if `district` is not offered for the location.
    pub fn select_district(&mut self, district: &str) -> Result<()> {
        let idx = self
            .districts()
            .iter()
            .position(|d| d == district)
            .ok_or_else(|| {
                CrimeRiskError::invalid_selection(format!(
                    "'{district}' is not a district of {}",
                    self.location().unwrap_or("the selected location")
                ))
            })?;
        self.district_idx = Some(idx);
        Ok(())
    }

    /// Moves to the next location, wrapping around.
    pub fn next_location(&mut self) {
        if let Some(idx) = cycle(self.location_idx, self.locations().len(), true) {
            self.set_location_idx(idx);
        }
    }

    /// Moves to the previous location, wrapping around.
    pub fn prev_location(&mut self) {
        if let Some(idx) = cycle(self.location_idx, self.locations().len(), false) {
            self.set_location_idx(idx);
        }
    }

    /// Moves to the next district, wrapping around.
    pub fn next_district(&mut self) {
        self.district_idx = cycle(self.district_idx, self.districts().len(), true);
    }

    /// Moves to the previous district, wrapping around.
    pub fn prev_district(&mut self) {
        self.district_idx = cycle(self.district_idx, self.districts().len(), false);
    }

    /// Sets the year.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSelection` if `year` is outside [`YEAR_RANGE`].
    pub fn set_year(&mut self, year: i32) -> Result<()> {
        if !YEAR_RANGE.contains(&year) {
            return Err(CrimeRiskError::invalid_selection(format!(
                "year {year} outside {}..={}",
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            )));
        }
        self.year = year;
        Ok(())
    }

    /// Increments the year, stopping at the upper bound.
    pub fn increment_year(&mut self) {
        self.year = (self.year + 1).min(*YEAR_RANGE.end());
    }

    /// Decrements the year, stopping at the lower bound.
    pub fn decrement_year(&mut self) {
        self.year = (self.year - 1).max(*YEAR_RANGE.start());
    }

    /// True when location, district and year all hold valid values.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.phase == Phase::Idle
            && self.location().is_some()
            && self.district().is_some()
            && YEAR_RANGE.contains(&self.year)
    }

    /// Runs a prediction for the current selection and stores the notice.
    ///
    /// Failures become [`Notice::Error`]; nothing propagates.
    pub fn submit(&mut self) -> &Notice {
        let selection = self.selection();
        let notice = match (self.can_submit(), selection.location, selection.district) {
            (true, Some(location), Some(district)) => {
                self.phase = Phase::Predicting;
                let report = self
                    .context
                    .predictor()
                    .report(&location, &district, selection.year);
                Notice::from(report)
            }
            _ => Notice::Error("select a location, a district and a year first".to_string()),
        };
        self.phase = Phase::Idle;
        self.notice.insert(notice)
    }

    /// Drops the last notice.
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

/// Next/previous index in `0..len` with wrap-around; `None` when empty.
fn cycle(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match (current, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % len,
        (Some(0), false) => len - 1,
        (Some(i), false) => (i - 1).min(len - 1),
    })
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
