//! # Learn
//!
//! Numeric work delegated to by the pipeline stages:
//!
//! - [`normalize`]: text normalization shared by training and inference
//! - [`train_test_split`]: seeded shuffle split
//! - [`BagOfWords`]: count vectorizer fit on the training split only
//! - [`LogisticRegression`]: binary classifier trained by gradient descent
//! - [`classification_metrics`]: accuracy, precision, recall, AUC

mod error;
mod logistic;
mod metrics;
mod split;
mod text;
mod vectorizer;

pub use error::{LearnError, Result};
pub use logistic::{LogisticParams, LogisticRegression, Penalty};
pub use metrics::{accuracy, classification_metrics, precision, recall, roc_auc};
pub use split::train_test_split;
pub use text::{is_stopword, lemmatize, normalize};
pub use vectorizer::{tokenize, BagOfWords};
