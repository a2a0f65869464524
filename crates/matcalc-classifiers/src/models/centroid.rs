//! Nearest group-centroid model.
//!
//! Each training group is summarized by the per-feature mean of its columns.
//! A sample is labelled with the name of the closest centroid.
use crate::classifier::Classifier;
use crate::config::DistanceMetric;
use crate::data_handling::{FeatureMatrix, Rgba, SampleGroup};
use crate::error::{ClassifierError, Result};
use crate::models::model_trait::{ModelTrainer, TrainedModel};
use crate::xml::{format_value, parse_value, XmlElement};

pub const MODEL_TYPE: &str = "group-centroid";

#[derive(Debug, Clone, PartialEq)]
pub struct Centroid {
    pub label: String,
    pub color: Rgba,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCentroidModel {
    name: String,
    metric: DistanceMetric,
    features: Vec<String>,
    centroids: Vec<Centroid>,
}

impl GroupCentroidModel {
    /// `centroids` must be non-empty, each with one value per feature.
    pub fn new(
        name: &str,
        metric: DistanceMetric,
        features: Vec<String>,
        centroids: Vec<Centroid>,
    ) -> Result<Self> {
        if centroids.is_empty() {
            return Err(ClassifierError::EmptyTraining(name.to_string()));
        }
        if let Some(bad) = centroids.iter().find(|c| c.values.len() != features.len()) {
            return Err(ClassifierError::ShapeMismatch {
                expected: features.len(),
                found: bad.values.len(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            metric,
            features,
            centroids,
        })
    }

    /// Two-centroid model from a classifier's phenotype and control means.
    /// Rows are taken positionally so duplicate feature names keep their
    /// own values.
    pub fn from_classifier(classifier: &Classifier, metric: DistanceMetric) -> Result<Self> {
        let centroid = |label: &str, matrix: &FeatureMatrix| -> Result<Centroid> {
            if matrix.nrows() != classifier.feature_count() {
                return Err(ClassifierError::ShapeMismatch {
                    expected: classifier.feature_count(),
                    found: matrix.nrows(),
                });
            }
            Ok(Centroid {
                label: label.to_string(),
                color: Rgba::default(),
                values: (0..matrix.nrows()).map(|r| matrix.values().row_mean(r)).collect(),
            })
        };

        let mut centroids = Vec::with_capacity(2);
        for (label, matrix) in [
            (classifier.phenotype_name(), classifier.phenotype()),
            (classifier.control_name(), classifier.control()),
        ] {
            if matrix.ncols() == 0 {
                log::warn!(
                    "Group '{}' of classifier '{}' has no samples; skipping centroid",
                    label,
                    classifier.name()
                );
                continue;
            }
            centroids.push(centroid(label, matrix)?);
        }

        Self::new(
            classifier.name(),
            metric,
            classifier.features().to_vec(),
            centroids,
        )
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    /// Distance from `features` to every centroid, in centroid order.
    pub fn distances(&self, features: &[f64]) -> Vec<f64> {
        self.centroids
            .iter()
            .map(|c| self.metric.distance(features, &c.values))
            .collect()
    }

    pub fn from_xml(element: &XmlElement) -> Result<Self> {
        let name = element.require_attribute("name")?;
        let kind = element.require_attribute("type")?;
        if kind != MODEL_TYPE {
            return Err(ClassifierError::InvalidXml(format!(
                "model '{}' has type '{}', expected '{}'",
                name, kind, MODEL_TYPE
            )));
        }
        let metric = element
            .require_attribute("metric")?
            .parse::<DistanceMetric>()
            .map_err(ClassifierError::InvalidXml)?;
        let size: usize = element.parse_attribute("size")?;

        let mut features: Option<Vec<String>> = None;
        let mut centroids = Vec::new();
        for group in element.children_named("group") {
            let mut names = Vec::new();
            let mut values = Vec::new();
            for feature in group.children_named("feature") {
                names.push(feature.require_attribute("name")?.to_string());
                values.push(parse_value(feature.require_attribute("value")?)?);
            }
            match &features {
                Some(known) if *known != names => {
                    return Err(ClassifierError::InvalidXml(format!(
                        "group '{}' of model '{}' lists different features",
                        group.require_attribute("name")?,
                        name
                    )))
                }
                Some(_) => {}
                None => features = Some(names),
            }
            let color = match group.attribute("color") {
                Some(raw) => raw.parse::<Rgba>()?,
                None => Rgba::default(),
            };
            centroids.push(Centroid {
                label: group.require_attribute("name")?.to_string(),
                color,
                values,
            });
        }

        let features = features.unwrap_or_default();
        if features.len() != size {
            return Err(ClassifierError::InvalidXml(format!(
                "model '{}' declares {} features but lists {}",
                name,
                size,
                features.len()
            )));
        }

        Self::new(name, metric, features, centroids)
            .map_err(|e| ClassifierError::InvalidXml(format!("model '{}': {}", name, e)))
    }
}

impl TrainedModel for GroupCentroidModel {
    fn name(&self) -> &str {
        &self.name
    }

    /// Nearest centroid wins; ties keep the earlier group.
    fn classify(&self, features: &[f64]) -> String {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, distance) in self.distances(features).into_iter().enumerate() {
            let distance = if distance.is_nan() { f64::INFINITY } else { distance };
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        self.centroids[best].label.clone()
    }

    fn to_xml(&self) -> Result<XmlElement> {
        let mut element = XmlElement::new("model")
            .with_attribute("name", &self.name)
            .with_attribute("type", MODEL_TYPE)
            .with_attribute("metric", self.metric)
            .with_attribute("size", self.features.len());

        for centroid in &self.centroids {
            let mut group = XmlElement::new("group")
                .with_attribute("name", &centroid.label)
                .with_attribute("color", centroid.color);
            for (feature, value) in self.features.iter().zip(&centroid.values) {
                group.push_child(
                    XmlElement::new("feature")
                        .with_attribute("name", feature)
                        .with_attribute("value", format_value(*value)),
                );
            }
            element.push_child(group);
        }

        Ok(element)
    }
}

/// Trains a [`GroupCentroidModel`] with one centroid per group that has
/// samples in the matrix.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupCentroidTrainer {
    metric: DistanceMetric,
}

impl GroupCentroidTrainer {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }
}

impl ModelTrainer for GroupCentroidTrainer {
    fn train(
        &self,
        name: &str,
        matrix: &FeatureMatrix,
        groups: &[SampleGroup],
    ) -> Result<Box<dyn TrainedModel>> {
        let features: Vec<String> = match matrix.row_names() {
            Some(names) => names.to_vec(),
            None => (1..=matrix.nrows()).map(|i| format!("row_{}", i)).collect(),
        };

        let mut centroids = Vec::with_capacity(groups.len());
        for group in groups {
            let indices = matrix.column_indices(group);
            if indices.is_empty() {
                log::warn!(
                    "Group '{}' has no samples in the matrix; it will not be a class of '{}'",
                    group.name,
                    name
                );
                continue;
            }
            let selected = matrix.values().select_columns(&indices);
            centroids.push(Centroid {
                label: group.name.clone(),
                color: group.color,
                values: (0..selected.nrows()).map(|r| selected.row_mean(r)).collect(),
            });
        }

        log::info!(
            "Trained {} model '{}' on {} features with {} classes",
            MODEL_TYPE,
            name,
            features.len(),
            centroids.len()
        );

        Ok(Box::new(GroupCentroidModel::new(
            name,
            self.metric,
            features,
            centroids,
        )?))
    }
}
