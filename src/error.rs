//! Error types for crimerisk operations.
//!
//! Failures fall into two groups: loading the artifacts at startup, which is
//! fatal to the caller, and the predict step, which is reported back to the
//! user and never escapes the form.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Which of the three startup artifacts an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// The serialized classifier.
    Model,
    /// The per-field label encoders.
    Encoders,
    /// The reference CSV dataset.
    Dataset,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Artifact::Model => "model",
            Artifact::Encoders => "encoders",
            Artifact::Dataset => "dataset",
        };
        f.write_str(name)
    }
}

/// Main error type for crimerisk operations.
///
/// # Examples
///
/// ```
/// use crimerisk::error::CrimeRiskError;
///
/// let err = CrimeRiskError::unknown_category("STATE/UT", "Atlantis");
/// assert!(err.to_string().contains("Atlantis"));
/// assert!(!err.is_fatal());
/// ```
#[derive(Debug, Error)]
pub enum CrimeRiskError {
    /// An artifact could not be read or decoded. Fatal: the form cannot be served.
    #[error("failed to load {artifact} from {}: {reason}", path.display())]
    StartupLoadFailure {
        /// Artifact that failed
        artifact: Artifact,
        /// Path it was read from
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// A value is not in the learned vocabulary of the field's encoder.
    #[error("unknown {field} value: '{value}'")]
    UnknownCategory {
        /// Encoded field name (e.g. `STATE/UT`)
        field: String,
        /// Rejected value
        value: String,
    },

    /// The classifier could not produce a prediction.
    #[error("classifier failed: {reason}")]
    PredictionFailure {
        /// Failure description
        reason: String,
    },

    /// Form input outside its allowed choices or bounds.
    #[error("invalid selection: {reason}")]
    InvalidSelection {
        /// What was wrong
        reason: String,
    },
}

impl CrimeRiskError {
    /// Create a startup failure for `artifact` read from `path`.
    #[must_use]
    pub fn load_failure(artifact: Artifact, path: &Path, reason: impl ToString) -> Self {
        Self::StartupLoadFailure {
            artifact,
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Create an unknown-category error.
    #[must_use]
    pub fn unknown_category(field: &str, value: &str) -> Self {
        Self::UnknownCategory {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a prediction failure.
    #[must_use]
    pub fn prediction(reason: impl ToString) -> Self {
        Self::PredictionFailure {
            reason: reason.to_string(),
        }
    }

    /// Create an invalid-selection error.
    #[must_use]
    pub fn invalid_selection(reason: impl ToString) -> Self {
        Self::InvalidSelection {
            reason: reason.to_string(),
        }
    }

    /// Returns true for errors that must abort startup.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::StartupLoadFailure { .. })
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CrimeRiskError>;
