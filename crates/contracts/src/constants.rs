//! Fixed naming constants.
//!
//! Directory and file names under a Run root, plus the defaults used when the
//! parameter file omits its optional sections.

/// Default directory that holds one sub-directory per Run.
pub const DEFAULT_ARTIFACT_DIR: &str = "artifact";

/// Timestamp format used for Run identifiers.
pub const RUN_ID_FORMAT: &str = "%Y-%m-%d--%H-%M-%S";

// ===== Stage directories =====
pub const INGESTION_DIR: &str = "ingested_data";
pub const TRANSFORMATION_DIR: &str = "transformed_data";
pub const FEATURE_DIR: &str = "feature";
pub const MODEL_DIR: &str = "model";
pub const REPORTS_DIR: &str = "reports";

// ===== Stage files =====
pub const RAW_DATA_FILE: &str = "data.csv";
pub const TRAIN_FILE: &str = "train.csv";
pub const TEST_FILE: &str = "test.csv";
pub const VECTORIZER_FILE: &str = "vectorizer.bin";
pub const MODEL_FILE: &str = "model.bin";
pub const METRICS_FILE: &str = "metrics.json";
pub const EXPERIMENT_INFO_FILE: &str = "experiment_info.json";

// ===== Dataset schema =====
pub const TEXT_COLUMN: &str = "review";
pub const LABEL_COLUMN: &str = "sentiment";
pub const FEATURE_LABEL_COLUMN: &str = "label";
pub const NEGATIVE_LABEL: &str = "negative";
pub const POSITIVE_LABEL: &str = "positive";

/// Seed of the train/test split.
pub const SPLIT_SEED: u64 = 42;

// ===== Object storage =====
pub const DEFAULT_CONTAINER: &str = "sentiment-pipeline";
pub const DEFAULT_DATA_BLOB_PATH: &str = "data/data.csv";
pub const DEFAULT_MODEL_BLOB_PATH: &str = "models/model.bin";

// ===== Tracking / registry =====
pub const DEFAULT_EXPERIMENT_NAME: &str = "sentiment-pipeline";
pub const DEFAULT_MODEL_NAME: &str = "imdb_sentiment_model";
/// Artifact sub-path the model is logged under inside a tracker run.
pub const LOGGED_MODEL_PATH: &str = "model";

/// Candidate version awaiting promotion.
pub const CHALLENGER_ALIAS: &str = "challenger";
/// Production version.
pub const ALPHA_ALIAS: &str = "alpha";
/// Retired production version.
pub const VETERAN_ALIAS: &str = "veteran";
