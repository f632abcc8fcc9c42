//! Categorical encoders turning form choices into classifier features.
//!
//! # Example
//!
//! ```
//! use crimerisk::preprocessing::LabelEncoder;
//!
//! let mut encoder = LabelEncoder::new();
//! encoder.fit(["Kerala", "Goa", "Kerala", "Assam"]).expect("fit should succeed");
//!
//! // Codes follow sorted class order.
//! assert_eq!(encoder.classes(), &["Assam", "Goa", "Kerala"]);
//! assert_eq!(encoder.transform("Kerala").expect("known class"), 2);
//! ```

use crate::error::{Artifact, CrimeRiskError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Maps a finite set of known labels to stable integer codes.
///
/// A label's code is its index in [`classes`](Self::classes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EncoderRepr", into = "EncoderRepr")]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct EncoderRepr {
    classes: Vec<String>,
}

impl From<EncoderRepr> for LabelEncoder {
    fn from(repr: EncoderRepr) -> Self {
        Self::from_classes(repr.classes)
    }
}

impl From<LabelEncoder> for EncoderRepr {
    fn from(encoder: LabelEncoder) -> Self {
        Self {
            classes: encoder.classes,
        }
    }
}

impl LabelEncoder {
    /// Creates an unfitted encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fitted encoder whose codes follow the given class order.
    ///
    /// Repeated classes keep their first position.
    #[must_use]
    pub fn from_classes<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut encoder = Self::new();
        for class in classes {
            let class = class.into();
            if !encoder.index.contains_key(&class) {
                encoder.index.insert(class.clone(), encoder.classes.len());
                encoder.classes.push(class);
            }
        }
        encoder
    }

    /// Learns the vocabulary from `values`, assigning codes in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` is empty.
    pub fn fit<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = values.into_iter().map(|v| v.as_ref().to_string()).collect();
        if classes.is_empty() {
            return Err(CrimeRiskError::invalid_selection(
                "cannot fit a label encoder on zero values",
            ));
        }
        classes.sort_unstable();
        classes.dedup();
        *self = Self::from_classes(classes);
        Ok(())
    }

    /// Returns true once the encoder knows at least one class.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        !self.classes.is_empty()
    }

    /// Returns the known classes in code order.
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns true if `value` is part of the vocabulary.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.index.contains_key(value)
    }

    /// Encodes one value, without field context in the error.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if `value` was not seen during fitting.
    pub fn transform(&self, value: &str) -> Result<usize> {
        self.transform_field("", value)
    }

    /// Decodes a code back to its label.
    ///
    /// # Errors
    ///
    /// Returns an error if `code` is out of range.
    pub fn inverse_transform(&self, code: usize) -> Result<&str> {
        self.classes
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| {
                CrimeRiskError::invalid_selection(format!(
                    "code {code} out of range for {} classes",
                    self.classes.len()
                ))
            })
    }

    fn transform_field(&self, field: &str, value: &str) -> Result<usize> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| CrimeRiskError::unknown_category(field, value))
    }
}

/// Field name -> encoder mapping loaded alongside the model.
///
/// Serialized as a JSON object keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the encoder for `field`.
    #[must_use]
    pub fn with_encoder(mut self, field: impl Into<String>, encoder: LabelEncoder) -> Self {
        self.encoders.insert(field.into(), encoder);
        self
    }

    /// Returns the encoder for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&LabelEncoder> {
        self.encoders.get(field)
    }

    /// Returns the field names in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    /// Encodes `value` with the encoder registered for `field`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if the value is not in the field's vocabulary,
    /// or `PredictionFailure` if no encoder exists for `field`.
    pub fn encode(&self, field: &str, value: &str) -> Result<usize> {
        self.get(field)
            .ok_or_else(|| CrimeRiskError::prediction(format!("no encoder for field '{field}'")))?
            .transform_field(field, value)
    }

    /// Checks that every field in `required` has a fitted encoder.
    ///
    /// # Errors
    ///
    /// Returns a description of the first missing or empty encoder.
    pub fn require(&self, required: &[&str]) -> std::result::Result<(), String> {
        for field in required {
            match self.get(field) {
                None => return Err(format!("missing encoder for field '{field}'")),
                Some(encoder) if !encoder.is_fitted() => {
                    return Err(format!("encoder for field '{field}' has no classes"))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Saves the set as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> std::result::Result<(), String> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| format!("Serialization failed: {e}"))?;
        std::fs::write(path, json).map_err(|e| format!("File write failed: {e}"))
    }

    /// Loads a set from JSON.
    ///
    /// # Errors
    ///
    /// Returns `StartupLoadFailure` if the file is missing or malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| CrimeRiskError::load_failure(Artifact::Encoders, path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            CrimeRiskError::load_failure(
                Artifact::Encoders,
                path,
                format!("Deserialization failed: {e}"),
            )
        })
    }
}
