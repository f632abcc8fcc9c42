//! Encode -> classify -> label.
//!
//! A prediction encodes the location and district with their label encoders,
//! feeds `(location_code, district_code, year)` to the classifier in exactly
//! that column order, and maps the single raw output to a [`RiskLabel`].

use crate::data::{DISTRICT_COLUMN, STATE_COLUMN};
use crate::error::{CrimeRiskError, Result};
use crate::preprocessing::EncoderSet;
use crate::primitives::Matrix;
use crate::traits::Classifier;
use std::fmt;

/// Raw classifier output meaning "high risk".
pub const HIGH_RISK_CLASS: i64 = 1;

/// Binary risk outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLabel {
    /// Classifier returned exactly `1`.
    HighRisk,
    /// Any other classifier output.
    LowRisk,
}

impl RiskLabel {
    /// Maps a raw classifier output to a label: exactly `1` is high risk.
    ///
    /// ```
    /// use crimerisk::predictor::RiskLabel;
    ///
    /// assert_eq!(RiskLabel::from_raw(1), RiskLabel::HighRisk);
    /// assert_eq!(RiskLabel::from_raw(0), RiskLabel::LowRisk);
    /// assert_eq!(RiskLabel::from_raw(2), RiskLabel::LowRisk);
    /// ```
    #[must_use]
    pub fn from_raw(raw: i64) -> Self {
        if raw == HIGH_RISK_CLASS {
            RiskLabel::HighRisk
        } else {
            RiskLabel::LowRisk
        }
    }

    /// User-facing notice text.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            RiskLabel::HighRisk => "High Crime Risk! Be Cautious.",
            RiskLabel::LowRisk => "Low Crime Risk! Area is relatively safe.",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLabel::HighRisk => "high",
            RiskLabel::LowRisk => "low",
        })
    }
}

/// Numeric input row in classifier column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRow {
    /// `STATE/UT` code
    pub location_code: usize,
    /// `DISTRICT` code
    pub district_code: usize,
    /// `YEAR`
    pub year: i32,
}

impl FeatureRow {
    /// Column names in the order the classifier was trained on.
    pub const COLUMNS: [&'static str; 3] = [STATE_COLUMN, DISTRICT_COLUMN, "YEAR"];

    /// Converts to a single-row feature matrix.
    #[must_use]
    pub fn to_matrix(self) -> Matrix<f32> {
        Matrix::from_row(&[
            self.location_code as f32,
            self.district_code as f32,
            self.year as f32,
        ])
    }
}

/// Outcome of a predict action as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionReport {
    /// Prediction succeeded.
    Risk(RiskLabel),
    /// Prediction failed; carries the failure description.
    Failed(String),
}

impl PredictionReport {
    /// User-facing notice text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            PredictionReport::Risk(label) => label.message().to_string(),
            PredictionReport::Failed(description) => format!("Prediction Error: {description}"),
        }
    }
}

/// Runs predictions against a classifier and its encoders.
///
/// # Examples
///
/// ```
/// use crimerisk::predictor::{RiskLabel, RiskPredictor};
/// use crimerisk::preprocessing::{EncoderSet, LabelEncoder};
/// use crimerisk::tree::{DecisionTreeClassifier, TreeNode};
///
/// let encoders = EncoderSet::new()
///     .with_encoder("STATE/UT", LabelEncoder::from_classes(["Tamil Nadu", "Kerala"]))
///     .with_encoder("DISTRICT", LabelEncoder::from_classes(["Chennai"]));
/// let model = DecisionTreeClassifier::from_root(TreeNode::leaf(1, 10), 3).unwrap();
///
/// let predictor = RiskPredictor::new(&model, &encoders);
/// assert_eq!(predictor.predict("Tamil Nadu", "Chennai", 2023).unwrap(), RiskLabel::HighRisk);
/// ```
pub struct RiskPredictor<'a> {
    model: &'a dyn Classifier,
    encoders: &'a EncoderSet,
}

impl<'a> RiskPredictor<'a> {
    /// Creates a predictor over borrowed artifacts.
    #[must_use]
    pub fn new(model: &'a dyn Classifier, encoders: &'a EncoderSet) -> Self {
        Self { model, encoders }
    }

    /// Encodes the categorical fields into a feature row.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if either value is outside its encoder's vocabulary.
    pub fn encode(&self, location: &str, district: &str, year: i32) -> Result<FeatureRow> {
        Ok(FeatureRow {
            location_code: self.encoders.encode(STATE_COLUMN, location)?,
            district_code: self.encoders.encode(DISTRICT_COLUMN, district)?,
            year,
        })
    }

    /// Invokes the classifier on one feature row and returns its raw output.
    ///
    /// # Errors
    ///
    /// Returns `PredictionFailure` if the classifier fails or does not return
    /// exactly one value.
    pub fn classify(&self, features: FeatureRow) -> Result<i64> {
        let outputs = self.model.predict(&features.to_matrix())?;
        match outputs.as_slice() {
            [raw] => Ok(*raw),
            other => Err(CrimeRiskError::prediction(format!(
                "expected 1 prediction, classifier returned {}",
                other.len()
            ))),
        }
    }

    /// Predicts the risk label for a selection.
    ///
    /// `year` is passed through unchecked; bounds belong to the form.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` or `PredictionFailure`.
    pub fn predict(&self, location: &str, district: &str, year: i32) -> Result<RiskLabel> {
        let features = self.encode(location, district, year)?;
        let raw = self.classify(features)?;
        if raw != 0 && raw != HIGH_RISK_CLASS {
            tracing::warn!(raw, location, district, year, "classifier output outside {{0, 1}}");
        }
        let label = RiskLabel::from_raw(raw);
        tracing::debug!(
            location,
            district,
            year,
            location_code = features.location_code,
            district_code = features.district_code,
            raw,
            %label,
            "prediction.complete"
        );
        Ok(label)
    }

    /// Runs [`predict`](Self::predict) and converts any failure into a report.
    #[must_use]
    pub fn report(&self, location: &str, district: &str, year: i32) -> PredictionReport {
        match self.predict(location, district, year) {
            Ok(label) => PredictionReport::Risk(label),
            Err(e) => {
                tracing::info!(location, district, year, error = %e, "prediction.failed");
                PredictionReport::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "predictor_tests.rs"]
mod tests;
