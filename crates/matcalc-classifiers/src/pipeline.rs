//! Scoring of query samples against a trained model.
use crate::data_handling::FeatureMatrix;
use crate::models::TrainedModel;

/// Header of the single result column.
pub const RESULT_COLUMN: &str = "Classification";

/// One label per query sample, in query column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationResult {
    samples: Vec<String>,
    labels: Vec<String>,
}

impl ClassificationResult {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of a sample by name.
    pub fn label(&self, sample: &str) -> Option<&str> {
        self.samples
            .iter()
            .position(|s| s == sample)
            .map(|i| self.labels[i].as_str())
    }

    /// `(sample, label)` rows in order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.samples
            .iter()
            .zip(&self.labels)
            .map(|(s, l)| (s.as_str(), l.as_str()))
    }
}

/// Classify every column of `query`, passing all rows as the feature vector.
///
/// No shape checks are made against the model; a zero-column query gives an
/// empty result.
pub fn classify(model: &dyn TrainedModel, query: &FeatureMatrix) -> ClassificationResult {
    let mut result = ClassificationResult {
        samples: Vec::with_capacity(query.ncols()),
        labels: Vec::with_capacity(query.ncols()),
    };

    for col in 0..query.ncols() {
        let values = query.column(col);
        let label = model.classify(values.as_slice());
        result.samples.push(query.column_names()[col].clone());
        result.labels.push(label);
    }

    log::info!(
        "Classified {} samples with model '{}'",
        result.len(),
        model.name()
    );
    result
}
