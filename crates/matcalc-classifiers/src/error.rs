use thiserror::Error;

use crate::math::ShapeError;

/// Errors raised by classifier construction, lookups and the XML exchange format.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// A named lookup (mean, serialization) referenced a feature the classifier does not hold.
    #[error("feature '{0}' is not part of this classifier")]
    FeatureNotFound(String),

    #[error("matrix has no row annotation named '{0}'")]
    AnnotationNotFound(String),

    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error("cannot train model '{0}': no group has samples in the matrix")]
    EmptyTraining(String),

    #[error("invalid XML: {0}")]
    InvalidXml(String),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
