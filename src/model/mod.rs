//! The prediction core: pre-fitted scalers and a pre-trained classifier
//! loaded once at startup, plus the pipeline that runs raw form input
//! through them.
//!
//! All state here is read-only after `CropModel::load`, so the bundle is
//! shared through `AppState` without locking.

pub mod crops;
mod forest;
mod pipeline;
mod scaler;

pub use forest::ForestClassifier;
pub use pipeline::{predict, FeatureVector, Outcome, PredictError, FEATURE_FIELDS};
pub use scaler::{MinMaxScaler, ScalerStack, StandardScaler};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::ModelConfig;

/// Dimensionality of the feature vector the artifacts were fitted against.
pub const FEATURE_COUNT: usize = 7;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid artifact: {0}")]
    Invalid(String),
    #[error("classification failed: {0}")]
    Classification(String),
}

/// Applies the pre-fitted feature transformations, in the order they were
/// fitted.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, features: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT];
}

/// Maps a normalized feature vector to a crop code. The concrete model
/// format is opaque to callers.
pub trait Classifier: Send + Sync {
    fn classify(&self, features: [f64; FEATURE_COUNT]) -> Result<i64, ModelError>;
}

/// The loaded model bundle: normalizer plus classifier.
pub struct CropModel {
    normalizer: Box<dyn Normalizer>,
    classifier: Box<dyn Classifier>,
}

impl CropModel {
    pub fn new(normalizer: Box<dyn Normalizer>, classifier: Box<dyn Classifier>) -> Self {
        Self {
            normalizer,
            classifier,
        }
    }

    /// Load the three serialized artifacts from the configured directory.
    pub fn load(config: &ModelConfig) -> Result<Self, ModelError> {
        let minmax: MinMaxScaler = read_artifact(&config.dir.join("minmax_scaler.json"))?;
        let standard: StandardScaler = read_artifact(&config.dir.join("standard_scaler.json"))?;
        let classifier = ForestClassifier::load(&config.dir.join("model.json"))?;

        info!(dir = %config.dir.display(), trees = classifier.tree_count(), "Model artifacts loaded");

        Ok(Self::new(
            Box::new(ScalerStack::new(minmax, standard)),
            Box::new(classifier),
        ))
    }

    pub fn normalize(&self, features: [f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        self.normalizer.normalize(features)
    }

    pub fn classify(&self, features: [f64; FEATURE_COUNT]) -> Result<i64, ModelError> {
        self.classifier.classify(features)
    }
}

fn read_artifact<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_fails_on_missing_directory() {
        let config = ModelConfig {
            dir: PathBuf::from("/nonexistent/artifacts"),
        };
        assert!(matches!(CropModel::load(&config), Err(ModelError::Io { .. })));
    }

    #[test]
    fn shipped_artifacts_classify_the_reference_sample() {
        let config = ModelConfig {
            dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts"),
        };
        let model = CropModel::load(&config).unwrap();

        // N, P, K, temperature, humidity, pH, rainfall
        let raw = [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9];
        let code = model.classify(model.normalize(raw)).unwrap();
        assert_eq!(code, 1);
        assert_eq!(crops::label_for_code(code), "Rice");
    }
}
