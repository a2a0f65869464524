//! Delimited text reader for feature matrices.
//!
//! Layout: a header row, then one row per feature. The first
//! `annotation_columns` columns hold row labels and their headers name the
//! annotations; every remaining column is a sample.
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::data_handling::FeatureMatrix;
use crate::math::Array2;

#[derive(Debug, Clone)]
pub struct MatrixReaderConfig {
    /// Number of leading label columns.
    pub annotation_columns: usize,
    /// Field delimiter. When `None` it is inferred from the file extension.
    pub delimiter: Option<u8>,
}

impl Default for MatrixReaderConfig {
    fn default() -> Self {
        Self {
            annotation_columns: 1,
            delimiter: None,
        }
    }
}

/// Tab for `.tsv`/`.txt`, comma otherwise.
pub fn delimiter_for<P: AsRef<Path>>(path: P) -> u8 {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match extension.as_deref() {
        Some("tsv") | Some("txt") => b'\t',
        _ => b',',
    }
}

pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<FeatureMatrix> {
    read_matrix_with_config(path, &MatrixReaderConfig::default())
}

pub fn read_matrix_with_config<P: AsRef<Path>>(
    path: P,
    config: &MatrixReaderConfig,
) -> Result<FeatureMatrix> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| delimiter_for(path));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open matrix file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read matrix header row")?
        .clone();

    let n_labels = config.annotation_columns;
    if headers.len() < n_labels {
        return Err(anyhow!(
            "Header has {} columns but {} annotation columns were requested",
            headers.len(),
            n_labels
        ));
    }

    let annotation_names: Vec<String> = headers.iter().take(n_labels).map(str::to_string).collect();
    let samples: Vec<String> = headers.iter().skip(n_labels).map(str::to_string).collect();

    let mut labels: Vec<Vec<String>> = vec![Vec::new(); n_labels];
    let mut values = Vec::new();
    let mut n_rows = 0;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        for (slot, field) in labels.iter_mut().zip(record.iter()) {
            slot.push(field.trim().to_string());
        }

        for (col, field) in record.iter().skip(n_labels).enumerate() {
            let value = parse_cell(field).with_context(|| {
                format!(
                    "Invalid value '{}' for sample '{}' at row {}",
                    field,
                    samples.get(col).map(String::as_str).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    let values = Array2::from_shape_vec((n_rows, samples.len()), values)
        .context("Failed to build feature matrix")?;

    let mut matrix = FeatureMatrix::new(samples, values)?;
    for (name, labels) in annotation_names.into_iter().zip(labels) {
        matrix = matrix.with_annotation(&name, labels)?;
    }

    log::debug!(
        "Read {} features x {} samples from {}",
        matrix.nrows(),
        matrix.ncols(),
        path.display()
    );
    Ok(matrix)
}

/// Empty cells and `NA` read as `NaN`.
fn parse_cell(field: &str) -> Result<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|e| anyhow!(e))
}
