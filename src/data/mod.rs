//! Reference dataset used to populate the form's choices.
//!
//! Only the categorical `STATE/UT` and `DISTRICT` columns are kept; any other
//! columns in the CSV (year, crime counts, ...) are read past and dropped.

use crate::error::{Artifact, CrimeRiskError, Result};
use std::io::Read;
use std::path::Path;

/// Column holding the state or union territory.
pub const STATE_COLUMN: &str = "STATE/UT";

/// Column holding the district.
pub const DISTRICT_COLUMN: &str = "DISTRICT";

/// One `(STATE/UT, DISTRICT)` pair from the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRow {
    /// State or union territory.
    pub state: String,
    /// District within `state`.
    pub district: String,
}

impl LocationRow {
    /// Creates a row.
    pub fn new(state: impl Into<String>, district: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            district: district.into(),
        }
    }
}

/// Ordered, immutable rows of the reference dataset.
///
/// # Examples
///
/// ```
/// use crimerisk::data::ReferenceDataset;
///
/// let csv = "STATE/UT,DISTRICT,YEAR\nKerala,Kochi,2001\nKerala,Thrissur,2001\n";
/// let ds = ReferenceDataset::from_reader(csv.as_bytes()).expect("valid csv");
/// assert_eq!(ds.n_rows(), 2);
/// assert_eq!(ds.rows()[1].district, "Thrissur");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    rows: Vec<LocationRow>,
}

impl ReferenceDataset {
    /// Creates a dataset from already-parsed rows.
    #[must_use]
    pub fn from_rows(rows: Vec<LocationRow>) -> Self {
        Self { rows }
    }

    /// Loads the dataset from a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns `StartupLoadFailure` if the file cannot be opened, a required
    /// column is missing, or a record cannot be parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| CrimeRiskError::load_failure(Artifact::Dataset, path, e))?;
        Self::from_reader(file)
            .map_err(|e| CrimeRiskError::load_failure(Artifact::Dataset, path, e))
    }

    /// Parses CSV data with a header row from any reader.
    ///
    /// # Errors
    ///
    /// Returns a description of the first header or record problem.
    pub fn from_reader<R: Read>(reader: R) -> std::result::Result<Self, String> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| format!("failed to read headers: {e}"))?
            .clone();

        let position = |name: &str| {
            headers.iter().position(|h| h.trim() == name).ok_or_else(|| {
                format!(
                    "missing column '{name}'; available columns: {:?}",
                    headers.iter().collect::<Vec<_>>()
                )
            })
        };
        let state_idx = position(STATE_COLUMN)?;
        let district_idx = position(DISTRICT_COLUMN)?;

        let mut rows = Vec::new();
        // header is line 1
        for (line, record) in (2..).zip(reader.records()) {
            let record = record.map_err(|e| format!("line {line}: {e}"))?;
            let (Some(state), Some(district)) = (record.get(state_idx), record.get(district_idx))
            else {
                return Err(format!("line {line}: row has {} fields", record.len()));
            };
            rows.push(LocationRow::new(state, district));
        }

        Ok(Self { rows })
    }

    /// Returns all rows in file order.
    #[must_use]
    pub fn rows(&self) -> &[LocationRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
