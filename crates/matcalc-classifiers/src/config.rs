use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Central configuration for model training.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub model_type: ModelType,
}

/// Distance used to compare a sample against a group centroid.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
        }
    }

    /// Distance over the common prefix of `a` and `b`.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let pairs = a.iter().zip(b.iter());
        match self {
            DistanceMetric::Euclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt(),
            DistanceMetric::Manhattan => pairs.map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "manhattan" => Ok(DistanceMetric::Manhattan),
            _ => Err(format!(
                "Unknown distance metric: {}. Expected 'euclidean' or 'manhattan'",
                s
            )),
        }
    }
}

/// Supported model types and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    GroupCentroid {
        #[serde(default)]
        metric: DistanceMetric,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::GroupCentroid {
            metric: DistanceMetric::default(),
        }
    }
}

impl ModelType {
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::GroupCentroid { .. } => "group-centroid",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "group-centroid" | "group_centroid" | "centroid" => Ok(ModelType::default()),
            _ => Err(format!(
                "Unknown model type: {}. Supported types: group-centroid",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}
