//! File formats shared by the stages and the inference predictor
//!
//! - labeled text CSV: `review,sentiment` with 0/1 labels
//! - feature CSV: `0,1,..,k-1,label` with integer counts
//! - models and vectorizers: bincode
//! - reports: pretty JSON

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use contracts::constants::{FEATURE_LABEL_COLUMN, LABEL_COLUMN, TEXT_COLUMN};
use contracts::ensure_parent_dir;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StageError};

/// Position of `column` in a CSV header
pub fn column_index(headers: &csv::StringRecord, column: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| StageError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
}

fn parse_label(value: &str, path: &Path, row: usize) -> Result<u8> {
    match value.trim() {
        "0" => Ok(0),
        "1" => Ok(1),
        other => Err(StageError::InvalidValue {
            path: path.to_path_buf(),
            row,
            value: other.to_string(),
        }),
    }
}

fn csv_writer(path: &Path) -> Result<csv::Writer<File>> {
    ensure_parent_dir(path).map_err(|e| StageError::io(path, e))?;
    csv::Writer::from_path(path).map_err(|e| StageError::csv(path, e))
}

/// Read a normalized `review,sentiment` file
pub fn read_labeled_text(path: &Path) -> Result<Vec<(String, u8)>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| StageError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| StageError::csv(path, e))?.clone();
    let text_idx = column_index(&headers, TEXT_COLUMN, path)?;
    let label_idx = column_index(&headers, LABEL_COLUMN, path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| StageError::csv(path, e))?;
        let text = record.get(text_idx).unwrap_or_default().to_string();
        let label = parse_label(record.get(label_idx).unwrap_or_default(), path, i + 1)?;
        rows.push((text, label));
    }
    Ok(rows)
}

/// Write a normalized `review,sentiment` file
pub fn write_labeled_text(path: &Path, rows: &[(String, u8)]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer
        .write_record([TEXT_COLUMN, LABEL_COLUMN])
        .map_err(|e| StageError::csv(path, e))?;
    for (text, label) in rows {
        writer
            .write_record([text.as_str(), label.to_string().as_str()])
            .map_err(|e| StageError::csv(path, e))?;
    }
    writer.flush().map_err(|e| StageError::io(path, e))
}

/// Write a count matrix with its label column
pub fn write_feature_matrix(path: &Path, n_features: usize, rows: &[(Vec<u32>, u8)]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let header: Vec<String> = (0..n_features)
        .map(|i| i.to_string())
        .chain(std::iter::once(FEATURE_LABEL_COLUMN.to_string()))
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| StageError::csv(path, e))?;
    for (counts, label) in rows {
        let record: Vec<String> = counts
            .iter()
            .map(u32::to_string)
            .chain(std::iter::once(label.to_string()))
            .collect();
        writer
            .write_record(&record)
            .map_err(|e| StageError::csv(path, e))?;
    }
    writer.flush().map_err(|e| StageError::io(path, e))
}

/// Read a count matrix: every column but the trailing label is a feature
pub fn read_feature_matrix(path: &Path) -> Result<(Vec<Vec<f64>>, Vec<u8>)> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| StageError::csv(path, e))?;
    let headers = reader.headers().map_err(|e| StageError::csv(path, e))?.clone();
    let label_idx = column_index(&headers, FEATURE_LABEL_COLUMN, path)?;
    if label_idx + 1 != headers.len() {
        return Err(StageError::InvalidValue {
            path: path.to_path_buf(),
            row: 0,
            value: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut x = Vec::new();
    let mut y = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| StageError::csv(path, e))?;
        let row = i + 1;
        let features = record
            .iter()
            .take(label_idx)
            .map(|cell| {
                cell.trim().parse::<f64>().map_err(|_| StageError::InvalidValue {
                    path: path.to_path_buf(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        x.push(features);
        y.push(parse_label(record.get(label_idx).unwrap_or_default(), path, row)?);
    }
    Ok((x, y))
}

/// Serialize `value` to `path` with bincode
pub fn save_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path).map_err(|e| StageError::io(path, e))?;
    let file = File::create(path).map_err(|e| StageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, value).map_err(|source| StageError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| StageError::io(path, e))
}

/// Deserialize a bincode file
pub fn load_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(|e| StageError::io(path, e))?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|source| StageError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `value` as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path).map_err(|e| StageError::io(path, e))?;
    let file = File::create(path).map_err(|e| StageError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| StageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| StageError::io(path, e))
}
