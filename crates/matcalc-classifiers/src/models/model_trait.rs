use crate::data_handling::{FeatureMatrix, SampleGroup};
use crate::error::Result;
use crate::xml::XmlElement;

/// The capability set a trained model exposes to the registry and the
/// classification pipeline. Feature order and meaning are the model's own
/// business; callers pass a full matrix column as-is. Models are `Send` so a
/// registry holding them can sit behind a `Mutex`.
pub trait TrainedModel: Send {
    /// Registry key.
    fn name(&self) -> &str;

    /// Label for one sample's feature vector.
    fn classify(&self, features: &[f64]) -> String;

    /// The model's own exchange-format element.
    fn to_xml(&self) -> Result<XmlElement>;
}

/// Builds a model from a matrix and the groups that label its columns.
pub trait ModelTrainer {
    fn train(
        &self,
        name: &str,
        matrix: &FeatureMatrix,
        groups: &[SampleGroup],
    ) -> Result<Box<dyn TrainedModel>>;
}
