//! Train a model from a matrix and its sample groups, and export it.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use matcalc_classifiers::config::ModelConfig;
use matcalc_classifiers::io::{read_groups, read_matrix_with_config, MatrixReaderConfig};
use matcalc_classifiers::models::factory::build_trainer;
use matcalc_classifiers::{ClassifierRegistry, ToXml};

use crate::classifiers::create::write_xml;

/// Parameters for training, loadable from JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    pub model: ModelConfig,
    pub annotation_columns: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            annotation_columns: 1,
        }
    }
}

/// Load a training configuration from a JSON file.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

#[derive(Debug, Clone)]
pub struct TrainParams {
    pub matrix: PathBuf,
    pub groups: PathBuf,
    pub name: String,
    pub output: Option<PathBuf>,
}

/// Train one model, register it and export the registry document.
pub fn run_training(params: &TrainParams, config: &TrainConfig) -> Result<ClassifierRegistry> {
    let matrix = read_matrix_with_config(
        &params.matrix,
        &MatrixReaderConfig {
            annotation_columns: config.annotation_columns,
            delimiter: None,
        },
    )?;
    let groups = read_groups(&params.groups)?;

    let trainer = build_trainer(&config.model);
    let model = trainer
        .train(&params.name, &matrix, &groups)
        .with_context(|| format!("Failed to train model '{}'", params.name))?;

    let mut registry = ClassifierRegistry::new();
    registry.subscribe(|event| log::debug!("Registry changed: {:?}", event));
    registry.add(model);

    write_xml(&registry.to_xml()?, params.output.as_deref())?;
    Ok(registry)
}
