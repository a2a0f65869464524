use crate::config::{ModelConfig, ModelType};
use crate::models::centroid::GroupCentroidTrainer;
use crate::models::model_trait::ModelTrainer;

/// Build a boxed trainer from a `ModelConfig`.
pub fn build_trainer(config: &ModelConfig) -> Box<dyn ModelTrainer> {
    match config.model_type {
        ModelType::GroupCentroid { metric } => Box::new(GroupCentroidTrainer::new(metric)),
    }
}
