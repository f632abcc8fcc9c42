//! Error types for the crimerisk binary.

use crimerisk::error::CrimeRiskError;
use std::process::ExitCode;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Model, encoders or dataset could not be loaded
    #[error("{0}")]
    Startup(CrimeRiskError),

    /// Location, district or year not on offer
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Encoding or classification failed
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup or drawing failed
    #[error("terminal error: {0}")]
    Terminal(String),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Startup(_) => ExitCode::from(3),
            Self::InvalidSelection(_) => ExitCode::from(5),
            Self::Io(_) | Self::Terminal(_) => ExitCode::from(7),
            Self::Prediction(_) => ExitCode::from(8),
        }
    }
}

impl From<CrimeRiskError> for CliError {
    fn from(e: CrimeRiskError) -> Self {
        match e {
            CrimeRiskError::StartupLoadFailure { .. } => Self::Startup(e),
            CrimeRiskError::InvalidSelection { reason } => Self::InvalidSelection(reason),
            CrimeRiskError::UnknownCategory { .. } | CrimeRiskError::PredictionFailure { .. } => {
                Self::Prediction(e.to_string())
            }
        }
    }
}
