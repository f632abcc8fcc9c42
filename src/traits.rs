//! Core trait for pre-trained classifiers.
//!
//! The risk predictor only needs something that maps a feature matrix to one
//! raw scalar per row; any model satisfying that contract can be plugged in.

use crate::error::Result;
use crate::primitives::Matrix;

/// A pre-trained classifier.
///
/// # Examples
///
/// ```
/// use crimerisk::prelude::*;
///
/// struct AlwaysHigh;
///
/// impl Classifier for AlwaysHigh {
///     fn predict(&self, x: &Matrix<f32>) -> crimerisk::Result<Vec<i64>> {
///         Ok(vec![1; x.n_rows()])
///     }
/// }
///
/// let x = Matrix::from_row(&[0.0, 0.0, 2023.0]);
/// assert_eq!(AlwaysHigh.predict(&x).unwrap(), vec![1]);
/// ```
pub trait Classifier {
    /// Predicts one raw class value per row of `x`.
    ///
    /// # Errors
    ///
    /// Returns `PredictionFailure` if the input does not fit the model or the
    /// model cannot be evaluated.
    fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i64>>;

    /// Number of input features, when the model records it.
    fn n_features(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrimeRiskError;

    struct Echo;

    impl Classifier for Echo {
        fn predict(&self, x: &Matrix<f32>) -> Result<Vec<i64>> {
            Ok(x.rows().map(|row| row[0] as i64).collect())
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn predict(&self, _x: &Matrix<f32>) -> Result<Vec<i64>> {
            Err(CrimeRiskError::prediction("weights corrupted"))
        }
    }

    #[test]
    fn test_default_n_features_is_unknown() {
        assert_eq!(Echo.n_features(), None);
    }

    #[test]
    fn test_predict_per_row() {
        let x = Matrix::from_vec(2, 1, vec![3.0, -1.0]).expect("2*1=2 elements");
        assert_eq!(Echo.predict(&x).expect("predict"), vec![3, -1]);
    }

    #[test]
    fn test_trait_object_propagates_error() {
        let model: &dyn Classifier = &Broken;
        let err = model.predict(&Matrix::from_row(&[0.0])).unwrap_err();
        assert_eq!(err.to_string(), "classifier failed: weights corrupted");
    }
}
