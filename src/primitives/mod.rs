//! Numeric containers handed to classifiers.

mod matrix;

pub use matrix::Matrix;
