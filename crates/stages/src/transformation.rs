//! Transformation - label filtering, seeded split, text normalization

use std::path::Path;

use contracts::constants::{LABEL_COLUMN, TEXT_COLUMN};
use contracts::{IngestionArtifact, Stage, StageName, TransformationArtifact, TransformationConfig};
use learn::{normalize, train_test_split};
use tracing::{debug, info};

use crate::error::{Result, StageError};
use crate::io::{column_index, write_labeled_text};

pub struct TransformationStage {
    ingestion: IngestionArtifact,
    config: TransformationConfig,
}

impl TransformationStage {
    pub fn new(ingestion: IngestionArtifact) -> Self {
        Self::with_config(ingestion, TransformationConfig::default())
    }

    pub fn with_config(ingestion: IngestionArtifact, config: TransformationConfig) -> Self {
        Self { ingestion, config }
    }

    /// Map a raw label onto {0, 1}; anything else is dropped
    fn encode_label(&self, raw: &str) -> Option<u8> {
        let raw = raw.trim();
        if raw == self.config.negative_label {
            Some(0)
        } else if raw == self.config.positive_label {
            Some(1)
        } else {
            None
        }
    }

    /// Raw rows whose label is in the two-class vocabulary
    fn read_labeled_rows(&self, path: &Path) -> Result<Vec<(String, u8)>> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| StageError::csv(path, e))?;
        let headers = reader.headers().map_err(|e| StageError::csv(path, e))?.clone();
        let text_idx = column_index(&headers, TEXT_COLUMN, path)?;
        let label_idx = column_index(&headers, LABEL_COLUMN, path)?;

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| StageError::csv(path, e))?;
            match record.get(label_idx).and_then(|l| self.encode_label(l)) {
                Some(label) => {
                    let text = record.get(text_idx).unwrap_or_default().to_string();
                    rows.push((text, label));
                }
                None => dropped += 1,
            }
        }
        info!(kept = rows.len(), dropped, "Rows filtered by label");
        Ok(rows)
    }
}

/// Normalize every text, dropping rows left empty
fn normalize_rows(rows: Vec<(String, u8)>) -> Vec<(String, u8)> {
    let before = rows.len();
    let out: Vec<_> = rows
        .into_iter()
        .map(|(text, label)| (normalize(&text), label))
        .filter(|(text, _)| !text.is_empty())
        .collect();
    if out.len() < before {
        debug!(dropped = before - out.len(), "Rows empty after normalization");
    }
    out
}

impl Stage for TransformationStage {
    type Artifact = TransformationArtifact;
    type Error = StageError;

    fn name(&self) -> StageName {
        StageName::Transformation
    }

    fn execute(&self) -> Result<TransformationArtifact> {
        let raw_path = &self.ingestion.raw_data_file_path;
        let rows = self.read_labeled_rows(raw_path)?;
        if rows.is_empty() {
            return Err(StageError::EmptyDataset {
                path: raw_path.clone(),
            });
        }

        let (train, test) = train_test_split(rows, self.config.test_size, self.config.seed);
        let train = normalize_rows(train);
        let test = normalize_rows(test);
        info!(train = train.len(), test = test.len(), "Dataset split and normalized");

        let cfg = &self.config;
        write_labeled_text(&cfg.train_data_file_path, &train)?;
        write_labeled_text(&cfg.test_data_file_path, &test)?;

        Ok(TransformationArtifact {
            train_data_file_path: cfg.train_data_file_path.clone(),
            test_data_file_path: cfg.test_data_file_path.clone(),
        })
    }
}
