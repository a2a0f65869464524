pub mod centroid;
pub mod factory;
pub mod model_trait;

pub use centroid::{Centroid, GroupCentroidModel, GroupCentroidTrainer};
pub use model_trait::{ModelTrainer, TrainedModel};

use crate::error::{ClassifierError, Result};
use crate::xml::XmlElement;

/// Decode one stored model element, dispatching on its `type` attribute.
pub fn load_model(element: &XmlElement) -> Result<Box<dyn TrainedModel>> {
    match element.require_attribute("type")? {
        centroid::MODEL_TYPE => Ok(Box::new(GroupCentroidModel::from_xml(element)?)),
        other => Err(ClassifierError::InvalidXml(format!(
            "unsupported model type '{}'",
            other
        ))),
    }
}
