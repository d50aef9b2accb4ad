//! Inference over a finished Run
//!
//! Uses the same normalization as Transformation and the vectorizer fitted
//! by Feature Engineering, so a raw review maps onto the model's columns.

use std::path::{Path, PathBuf};

use contracts::constants::{
    FEATURE_DIR, MODEL_DIR, MODEL_FILE, NEGATIVE_LABEL, POSITIVE_LABEL, VECTORIZER_FILE,
};
use contracts::ArtifactLayout;
use learn::{normalize, BagOfWords, LearnError, LogisticRegression};
use serde::Serialize;
use stages::io::load_bincode;
use stages::StageError;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("failed to load {what}: {source}")]
    Load {
        what: &'static str,
        #[source]
        source: StageError,
    },

    #[error("vectorizer has {vectorizer} features but the model expects {model}")]
    FeatureMismatch { vectorizer: usize, model: usize },

    #[error(transparent)]
    Learn(#[from] LearnError),
}

/// Classifier output for one review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// 0 = negative, 1 = positive
    pub label: u8,
    /// Probability of the positive class
    pub probability: f64,
}

impl Prediction {
    pub fn sentiment(&self) -> &'static str {
        if self.label == 1 {
            POSITIVE_LABEL
        } else {
            NEGATIVE_LABEL
        }
    }
}

pub struct Predictor {
    vectorizer: BagOfWords,
    model: LogisticRegression,
}

impl Predictor {
    /// Load the vectorizer and model written under `run_root`
    pub fn load(run_root: impl AsRef<Path>) -> Result<Self, PredictError> {
        let [vectorizer_path, model_path] = inference_files(run_root.as_ref());
        Self::from_files(&vectorizer_path, &model_path)
    }

    pub fn from_files(vectorizer_path: &Path, model_path: &Path) -> Result<Self, PredictError> {
        let vectorizer: BagOfWords = load_bincode(vectorizer_path).map_err(|source| {
            PredictError::Load {
                what: "vectorizer",
                source,
            }
        })?;
        let model: LogisticRegression =
            load_bincode(model_path).map_err(|source| PredictError::Load {
                what: "model",
                source,
            })?;

        if vectorizer.n_features() != model.n_features() {
            return Err(PredictError::FeatureMismatch {
                vectorizer: vectorizer.n_features(),
                model: model.n_features(),
            });
        }
        info!(
            features = model.n_features(),
            model = %model_path.display(),
            "Predictor loaded"
        );
        Ok(Self { vectorizer, model })
    }

    pub fn n_features(&self) -> usize {
        self.vectorizer.n_features()
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, PredictError> {
        let normalized = normalize(text);
        let row: Vec<f64> = self
            .vectorizer
            .transform(&normalized)
            .into_iter()
            .map(f64::from)
            .collect();
        let probability = self.model.predict_proba(&row)?;
        debug!(normalized = %normalized, probability, "Prediction");
        Ok(Prediction {
            label: u8::from(probability >= 0.5),
            probability,
        })
    }
}

/// Vectorizer and model paths under a Run root
fn inference_files(run_root: &Path) -> [PathBuf; 2] {
    let layout = ArtifactLayout::new(run_root);
    [
        layout.path_for(FEATURE_DIR, VECTORIZER_FILE),
        layout.path_for(MODEL_DIR, MODEL_FILE),
    ]
}
