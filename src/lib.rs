//! Crimerisk: crime-risk lookup over a trained classifier.
//!
//! A user picks a state/UT, one of its districts and a year; the pair of
//! names is label-encoded, fed to a pre-trained classifier together with the
//! year, and the binary output is reported as high or low risk.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use crimerisk::prelude::*;
//! use crimerisk::data::{LocationRow, ReferenceDataset};
//! use crimerisk::preprocessing::{EncoderSet, LabelEncoder};
//! use crimerisk::tree::{DecisionTreeClassifier, TreeNode};
//!
//! let encoders = EncoderSet::new()
//!     .with_encoder("STATE/UT", LabelEncoder::from_classes(["Tamil Nadu"]))
//!     .with_encoder("DISTRICT", LabelEncoder::from_classes(["Chennai"]));
//! let dataset = ReferenceDataset::from_rows(vec![LocationRow::new("Tamil Nadu", "Chennai")]);
//! let model = DecisionTreeClassifier::from_root(TreeNode::leaf(1, 4), 3).unwrap();
//!
//! let context = LoadedContext::new(Arc::new(model), encoders, dataset).unwrap();
//! let mut form = FormState::new(Arc::new(context));
//! assert_eq!(form.submit().message(), "High Crime Risk! Be Cautious.");
//! ```
//!
//! # Modules
//!
//! - [`artifacts`]: Startup loading of model, encoders and reference dataset
//! - [`data`]: Reference dataset of (state/UT, district) rows
//! - [`form`]: Form state, cascading choices and submit flow
//! - [`options`]: Location and district choice lists
//! - [`predictor`]: Encode, classify and label
//! - [`preprocessing`]: Label encoders
//! - [`primitives`]: Feature matrix
//! - [`tree`]: Decision tree and random forest classifiers

pub mod artifacts;
pub mod data;
pub mod error;
pub mod form;
pub mod options;
pub mod predictor;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod traits;
pub mod tree;

pub use error::{CrimeRiskError, Result};
pub use primitives::Matrix;
pub use traits::Classifier;
