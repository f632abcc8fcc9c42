//! Startup artifacts: classifier, label encoders and reference dataset.
//!
//! All three are read once and then shared read-only. [`ArtifactStore`]
//! memoizes the first successful load; nothing is cached when any of the
//! three fails.

use crate::data::{ReferenceDataset, DISTRICT_COLUMN, STATE_COLUMN};
use crate::error::{Artifact, CrimeRiskError, Result};
use crate::options::OptionResolver;
use crate::predictor::{FeatureRow, RiskPredictor};
use crate::preprocessing::EncoderSet;
use crate::traits::Classifier;
use crate::tree::ClassifierModel;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Default classifier path, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "crime_model.bin";
/// Default encoder-set path, relative to the working directory.
pub const DEFAULT_ENCODERS_PATH: &str = "label_encoders.json";
/// Default dataset path, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str = "crime.csv";

/// Where the three artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Bincode-serialized [`ClassifierModel`].
    pub model: PathBuf,
    /// JSON-serialized [`EncoderSet`].
    pub encoders: PathBuf,
    /// CSV reference dataset.
    pub dataset: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            encoders: PathBuf::from(DEFAULT_ENCODERS_PATH),
            dataset: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

impl ArtifactPaths {
    /// Default file names inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(DEFAULT_MODEL_PATH),
            encoders: dir.join(DEFAULT_ENCODERS_PATH),
            dataset: dir.join(DEFAULT_DATASET_PATH),
        }
    }
}

/// Everything a form needs, loaded once and immutable afterwards.
pub struct LoadedContext {
    model: Arc<dyn Classifier + Send + Sync>,
    model_kind: &'static str,
    encoders: EncoderSet,
    dataset: ReferenceDataset,
    options: OptionResolver,
}

impl fmt::Debug for LoadedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedContext")
            .field("model", &self.model_kind)
            .field("encoders", &self.encoders.fields().collect::<Vec<_>>())
            .field("rows", &self.dataset.n_rows())
            .field("locations", &self.options.n_locations())
            .finish()
    }
}

impl LoadedContext {
    /// Assembles a context from already-loaded parts.
    ///
    /// # Errors
    ///
    /// Returns `StartupLoadFailure` if the encoders lack a required field or
    /// the model expects a feature count other than three.
    pub fn new(
        model: Arc<dyn Classifier + Send + Sync>,
        encoders: EncoderSet,
        dataset: ReferenceDataset,
    ) -> Result<Self> {
        Self::assemble(model, "custom", encoders, dataset, &ArtifactPaths::default())
    }

    /// Loads and cross-checks all three artifacts.
    ///
    /// # Errors
    ///
    /// Returns `StartupLoadFailure` naming the first artifact that failed.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let model = ClassifierModel::load(&paths.model)?;
        info!(path = %paths.model.display(), kind = model.kind(), "model.loaded");

        let encoders = EncoderSet::load(&paths.encoders)?;
        info!(
            path = %paths.encoders.display(),
            fields = encoders.fields().count(),
            "encoders.loaded"
        );

        let dataset = ReferenceDataset::load(&paths.dataset)?;
        info!(path = %paths.dataset.display(), rows = dataset.n_rows(), "dataset.loaded");

        let kind = model.kind();
        Self::assemble(Arc::new(model), kind, encoders, dataset, paths)
    }

    fn assemble(
        model: Arc<dyn Classifier + Send + Sync>,
        model_kind: &'static str,
        encoders: EncoderSet,
        dataset: ReferenceDataset,
        paths: &ArtifactPaths,
    ) -> Result<Self> {
        encoders
            .require(&[STATE_COLUMN, DISTRICT_COLUMN])
            .map_err(|e| CrimeRiskError::load_failure(Artifact::Encoders, &paths.encoders, e))?;

        if let Some(n_features) = model.n_features() {
            if n_features != FeatureRow::COLUMNS.len() {
                return Err(CrimeRiskError::load_failure(
                    Artifact::Model,
                    &paths.model,
                    format!(
                        "model expects {n_features} features, form provides {:?}",
                        FeatureRow::COLUMNS
                    ),
                ));
            }
        }

        let options = OptionResolver::from_dataset(&dataset);
        let context = Self {
            model,
            model_kind,
            encoders,
            dataset,
            options,
        };
        context.warn_unencodable_choices();
        Ok(context)
    }

    /// Logs dataset choices the encoders cannot encode; picking one would fail.
    fn warn_unencodable_choices(&self) {
        let known = |field: &str, value: &str| {
            self.encoders
                .get(field)
                .is_some_and(|encoder| encoder.contains(value))
        };
        for (location, districts) in self.options.iter() {
            if !known(STATE_COLUMN, location) {
                warn!(location, "location not known to the STATE/UT encoder");
            }
            for district in districts.iter().filter(|d| !known(DISTRICT_COLUMN, d)) {
                warn!(location, district = %district, "district not known to the DISTRICT encoder");
            }
        }
    }

    /// The classifier.
    #[must_use]
    pub fn model(&self) -> &(dyn Classifier + Send + Sync) {
        self.model.as_ref()
    }

    /// Model family name (`decision-tree`, `random-forest`, `custom`).
    #[must_use]
    pub fn model_kind(&self) -> &'static str {
        self.model_kind
    }

    /// The label encoders.
    #[must_use]
    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    /// The reference dataset.
    #[must_use]
    pub fn dataset(&self) -> &ReferenceDataset {
        &self.dataset
    }

    /// Choices derived from the dataset.
    #[must_use]
    pub fn options(&self) -> &OptionResolver {
        &self.options
    }

    /// A predictor borrowing this context's model and encoders.
    #[must_use]
    pub fn predictor(&self) -> RiskPredictor<'_> {
        RiskPredictor::new(self.model.as_ref(), &self.encoders)
    }
}

/// Loads the artifacts on first access and hands out the same context afterwards.
///
/// # Examples
///
/// ```no_run
/// use crimerisk::artifacts::{ArtifactPaths, ArtifactStore};
///
/// let store = ArtifactStore::new(ArtifactPaths::default());
/// let context = store.context()?;
/// println!("{} locations", context.options().n_locations());
/// # Ok::<(), crimerisk::error::CrimeRiskError>(())
/// ```
#[derive(Debug)]
pub struct ArtifactStore {
    paths: ArtifactPaths,
    loaded: OnceLock<Arc<LoadedContext>>,
}

impl ArtifactStore {
    /// Creates a store; nothing is read until [`context`](Self::context).
    #[must_use]
    pub fn new(paths: ArtifactPaths) -> Self {
        Self {
            paths,
            loaded: OnceLock::new(),
        }
    }

    /// Configured paths.
    #[must_use]
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Returns true once a load has succeeded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Returns the loaded context, reading the artifacts on the first call.
    ///
    /// # Errors
    ///
    /// Returns `StartupLoadFailure` if any artifact fails; a later call retries.
    pub fn context(&self) -> Result<Arc<LoadedContext>> {
        if let Some(context) = self.loaded.get() {
            return Ok(Arc::clone(context));
        }
        let context = Arc::new(LoadedContext::load(&self.paths)?);
        Ok(Arc::clone(self.loaded.get_or_init(|| context)))
    }
}
