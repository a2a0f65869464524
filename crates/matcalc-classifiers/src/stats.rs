//! Per-feature summaries of a classifier's two groups.
use serde::Serialize;

use crate::classifier::Classifier;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub feature: String,
    pub phenotype_mean: f64,
    pub control_mean: f64,
    /// `phenotype_mean - control_mean`
    pub difference: f64,
}

/// One summary per unique feature, sorted by feature name.
pub fn summarize(classifier: &Classifier) -> Result<Vec<FeatureSummary>> {
    classifier
        .sorted_features()
        .into_iter()
        .map(|feature| {
            let phenotype_mean = classifier.phenotype_mean(feature)?;
            let control_mean = classifier.control_mean(feature)?;
            Ok(FeatureSummary {
                feature: feature.to_string(),
                phenotype_mean,
                control_mean,
                difference: phenotype_mean - control_mean,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::{FeatureMatrix, SampleGroup};
    use crate::math::Array2;

    #[test]
    fn summary_is_sorted_with_differences() {
        let values = Array2::from_shape_vec((2, 2), vec![4.0, 1.0, 0.0, 2.0]).unwrap();
        let m = FeatureMatrix::new(vec!["p".into(), "c".into()], values)
            .unwrap()
            .with_annotation("symbol", vec!["zeta".into(), "alpha".into()])
            .unwrap();
        let clf = Classifier::create(
            "s",
            &m,
            &SampleGroup::new("P", vec!["p".into()]),
            &SampleGroup::new("C", vec!["c".into()]),
            "symbol",
        )
        .unwrap();

        let summary = summarize(&clf).unwrap();
        assert_eq!(summary[0].feature, "alpha");
        assert!((summary[0].difference + 2.0).abs() < 1e-12);
        assert_eq!(summary[1].feature, "zeta");
        assert!((summary[1].difference - 3.0).abs() < 1e-12);
    }
}
