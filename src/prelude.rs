//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use crimerisk::prelude::*;
//! ```

pub use crate::artifacts::{ArtifactPaths, ArtifactStore, LoadedContext};
pub use crate::error::CrimeRiskError;
pub use crate::form::{FormState, Notice, Selection};
pub use crate::predictor::{PredictionReport, RiskLabel, RiskPredictor};
pub use crate::primitives::Matrix;
pub use crate::traits::Classifier;
pub use crate::tree::ClassifierModel;
