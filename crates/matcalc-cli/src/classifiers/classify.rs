//! Score every sample of a matrix with a model loaded from an XML export.
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use matcalc_classifiers::io::{
    delimiter_for, read_matrix_with_config, write_classification_to, MatrixReaderConfig,
};
use matcalc_classifiers::models::load_model;
use matcalc_classifiers::xml::read_document_file;
use matcalc_classifiers::{classify, ClassificationResult, ClassifierRegistry};

use crate::util::output_writer;

#[derive(Debug, Clone)]
pub struct ClassifyParams {
    pub matrix: PathBuf,
    pub models: PathBuf,
    pub name: String,
    pub annotation_columns: usize,
    pub output: Option<PathBuf>,
}

pub fn load_registry(path: &Path) -> Result<ClassifierRegistry> {
    let root = read_document_file(path)
        .map_err(|e| anyhow!("Failed to read models from {}: {}", path.display(), e))?;
    let mut registry = ClassifierRegistry::new();
    let loaded = registry.load_xml(&root, load_model)?;
    log::info!("Loaded {} models from {}", loaded, path.display());
    Ok(registry)
}

pub fn run_classification(params: &ClassifyParams) -> Result<ClassificationResult> {
    let registry = load_registry(&params.models)?;
    let model = registry.get(&params.name).ok_or_else(|| {
        anyhow!(
            "No model named '{}' in {} (available: {})",
            params.name,
            params.models.display(),
            registry.names().collect::<Vec<_>>().join(", ")
        )
    })?;

    let query = read_matrix_with_config(
        &params.matrix,
        &MatrixReaderConfig {
            annotation_columns: params.annotation_columns,
            delimiter: None,
        },
    )?;
    let result = classify(model, &query);

    let delimiter = params.output.as_ref().map(delimiter_for).unwrap_or(b'\t');
    write_classification_to(&result, output_writer(params.output.as_ref())?, delimiter)?;
    Ok(result)
}
