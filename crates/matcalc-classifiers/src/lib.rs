//! matcalc-classifiers: phenotype/control classifiers over named feature matrices.
//!
//! A [`classifier::Classifier`] holds the columns of a feature matrix that
//! belong to two sample groups. Trained models implement
//! [`models::TrainedModel`], are kept by name in a
//! [`registry::ClassifierRegistry`], and score query matrices through
//! [`pipeline::classify`]. Classifiers and registries serialize to a small XML
//! exchange format (see [`xml`]).
pub mod classifier;
pub mod config;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod stats;
pub mod xml;

pub use classifier::Classifier;
pub use data_handling::{FeatureMatrix, Rgba, SampleGroup};
pub use error::{ClassifierError, Result};
pub use models::{ModelTrainer, TrainedModel};
pub use pipeline::{classify, ClassificationResult};
pub use registry::{ClassifierRegistry, RegistryEvent, SubscriptionId};
pub use xml::{ToXml, XmlElement};
