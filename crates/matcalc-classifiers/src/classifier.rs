//! Phenotype/control classifier built from two sample groups.
//!
//! A `Classifier` keeps the columns of a source matrix that belong to each of
//! two groups as separate submatrices. Rows are never filtered or reordered,
//! so row `i` of both submatrices is feature `features[i]`. Identity is the
//! classifier name alone.
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::hash::{Hash, Hasher};

use crate::data_handling::{FeatureMatrix, SampleGroup};
use crate::error::{ClassifierError, Result};
use crate::math::Array2;
use crate::xml::{format_value, parse_value, ToXml, XmlElement};

/// Row annotation used for submatrices rebuilt from the exchange format.
pub const FEATURE_ANNOTATION: &str = "feature";

#[derive(Debug, Clone)]
pub struct Classifier {
    name: String,
    phenotype_name: String,
    control_name: String,
    features: Vec<String>,
    feature_index: HashMap<String, usize>,
    phenotype: FeatureMatrix,
    control: FeatureMatrix,
}

impl Classifier {
    /// Extract the phenotype and control columns of `matrix`.
    ///
    /// Feature names are read from the row annotation `annotation`. Group
    /// members that are not columns of `matrix` are ignored, and a group with
    /// no matching columns yields a zero-column submatrix.
    pub fn create(
        name: &str,
        matrix: &FeatureMatrix,
        phenotype_group: &SampleGroup,
        control_group: &SampleGroup,
        annotation: &str,
    ) -> Result<Self> {
        let features = matrix
            .annotation(annotation)
            .ok_or_else(|| ClassifierError::AnnotationNotFound(annotation.to_string()))?
            .to_vec();

        let phenotype_indices = matrix.column_indices(phenotype_group);
        let control_indices = matrix.column_indices(control_group);

        log::debug!(
            "Classifier '{}': {} features, {} phenotype samples ({}), {} control samples ({})",
            name,
            features.len(),
            phenotype_indices.len(),
            phenotype_group.name,
            control_indices.len(),
            control_group.name
        );

        Ok(Self::from_parts(
            name,
            &phenotype_group.name,
            matrix.select_columns(&phenotype_indices),
            &control_group.name,
            matrix.select_columns(&control_indices),
            features,
        ))
    }

    /// Assemble a classifier from prebuilt submatrices. The caller guarantees
    /// that both matrices have one row per entry of `features`.
    pub fn from_parts(
        name: &str,
        phenotype_name: &str,
        phenotype: FeatureMatrix,
        control_name: &str,
        control: FeatureMatrix,
        features: Vec<String>,
    ) -> Self {
        let feature_index = index_map(&features);
        Self {
            name: name.to_string(),
            phenotype_name: phenotype_name.to_string(),
            control_name: control_name.to_string(),
            features,
            feature_index,
            phenotype,
            control,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phenotype_name(&self) -> &str {
        &self.phenotype_name
    }

    pub fn control_name(&self) -> &str {
        &self.control_name
    }

    pub fn phenotype(&self) -> &FeatureMatrix {
        &self.phenotype
    }

    pub fn control(&self) -> &FeatureMatrix {
        &self.control
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn feature(&self, i: usize) -> Option<&str> {
        self.features.get(i).map(String::as_str)
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Row of `feature`. With duplicate names the last occurrence wins.
    pub fn feature_row(&self, feature: &str) -> Option<usize> {
        self.feature_index.get(feature).copied()
    }

    pub fn phenotype_mean(&self, feature: &str) -> Result<f64> {
        self.mean(&self.phenotype, feature)
    }

    pub fn control_mean(&self, feature: &str) -> Result<f64> {
        self.mean(&self.control, feature)
    }

    /// Mean of a feature row. `NaN` when the submatrix has no columns.
    fn mean(&self, matrix: &FeatureMatrix, feature: &str) -> Result<f64> {
        let row = self.checked_row(matrix, feature)?;
        Ok(matrix.values().row_mean(row))
    }

    fn checked_row(&self, matrix: &FeatureMatrix, feature: &str) -> Result<usize> {
        let row = self
            .feature_row(feature)
            .ok_or_else(|| ClassifierError::FeatureNotFound(feature.to_string()))?;
        if row >= matrix.nrows() {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.features.len(),
                found: matrix.nrows(),
            });
        }
        Ok(row)
    }

    /// Unique feature names in lexicographic order.
    pub fn sorted_features(&self) -> Vec<&str> {
        self.features
            .iter()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn samples_xml(&self, tag: &str, matrix: &FeatureMatrix, row: usize) -> XmlElement {
        let mut group = XmlElement::new(tag);
        for col in 0..matrix.ncols() {
            let value = matrix.values()[(row, col)];
            group.push_child(XmlElement::new("sample").with_attribute("value", format_value(value)));
        }
        group
    }

    /// Rebuild a classifier from a `<classifier>` element.
    ///
    /// Features come back as the sorted unique names written by [`ToXml`],
    /// and sample columns are named `<group>_<n>` since the format does not
    /// carry sample names.
    pub fn from_xml(element: &XmlElement) -> Result<Self> {
        if element.name != "classifier" {
            return Err(ClassifierError::InvalidXml(format!(
                "expected <classifier>, found <{}>",
                element.name
            )));
        }

        let name = element.require_attribute("name")?;
        let phenotype_name = element.require_attribute("phenotype")?;
        let control_name = element.require_attribute("control")?;
        let phenotype_size: usize = element.parse_attribute("phenotype-size")?;
        let control_size: usize = element.parse_attribute("control-size")?;
        let size: usize = element.parse_attribute("size")?;

        let mut features = Vec::new();
        let mut phenotype_values = Vec::new();
        let mut control_values = Vec::new();

        for gene in element.children_named("gene") {
            features.push(gene.require_attribute("name")?.to_string());
            read_samples(gene.require_child("phenotype")?, phenotype_size, &mut phenotype_values)?;
            read_samples(gene.require_child("control")?, control_size, &mut control_values)?;
        }

        if features.len() != size {
            // Duplicate names collapse to one element on write.
            log::warn!(
                "Classifier '{}' declares {} features but stores {} unique names",
                name,
                size,
                features.len()
            );
        }

        let phenotype = rebuilt_matrix(phenotype_name, &features, phenotype_size, phenotype_values)?;
        let control = rebuilt_matrix(control_name, &features, control_size, control_values)?;

        Ok(Self::from_parts(
            name,
            phenotype_name,
            phenotype,
            control_name,
            control,
            features,
        ))
    }
}

impl ToXml for Classifier {
    fn to_xml(&self) -> Result<XmlElement> {
        let mut element = XmlElement::new("classifier")
            .with_attribute("name", &self.name)
            .with_attribute("phenotype", &self.phenotype_name)
            .with_attribute("phenotype-size", self.phenotype.ncols())
            .with_attribute("control", &self.control_name)
            .with_attribute("control-size", self.control.ncols())
            .with_attribute("size", self.features.len());

        for feature in self.sorted_features() {
            let phenotype_row = self.checked_row(&self.phenotype, feature)?;
            let control_row = self.checked_row(&self.control, feature)?;

            let mut gene = XmlElement::new("gene").with_attribute("name", feature);
            gene.push_child(self.samples_xml("phenotype", &self.phenotype, phenotype_row));
            gene.push_child(self.samples_xml("control", &self.control, control_row));
            element.push_child(gene);
        }

        Ok(element)
    }
}

impl PartialEq for Classifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Classifier {}

impl Hash for Classifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Classifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Classifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

fn index_map(features: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        map.insert(feature.clone(), i);
    }
    map
}

fn read_samples(group: &XmlElement, expected: usize, out: &mut Vec<f64>) -> Result<()> {
    let before = out.len();
    for sample in group.children_named("sample") {
        out.push(parse_value(sample.require_attribute("value")?)?);
    }
    let found = out.len() - before;
    if found != expected {
        return Err(ClassifierError::InvalidXml(format!(
            "<{}> holds {} samples but the classifier declares {}",
            group.name, found, expected
        )));
    }
    Ok(())
}

fn rebuilt_matrix(
    group: &str,
    features: &[String],
    cols: usize,
    values: Vec<f64>,
) -> Result<FeatureMatrix> {
    let values = Array2::from_shape_vec((features.len(), cols), values)?;
    let columns = (1..=cols).map(|i| format!("{}_{}", group, i)).collect();
    FeatureMatrix::new(columns, values)?.with_annotation(FEATURE_ANNOTATION, features.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn source() -> FeatureMatrix {
        // g1: 1 2 3 4, g2: 5 6 7 8
        let values =
            Array2::from_shape_vec((2, 4), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        FeatureMatrix::new(strings(&["s1", "s2", "s3", "s4"]), values)
            .unwrap()
            .with_annotation("symbol", strings(&["g1", "g2"]))
            .unwrap()
    }

    fn groups() -> (SampleGroup, SampleGroup) {
        (
            SampleGroup::new("A", strings(&["s3", "s1"])),
            SampleGroup::new("B", strings(&["s2", "s4"])),
        )
    }

    #[test]
    fn create_selects_group_columns_in_matrix_order() {
        let (a, b) = groups();
        let clf = Classifier::create("clf1", &source(), &a, &b, "symbol").unwrap();

        assert_eq!(clf.phenotype().column_names(), &strings(&["s1", "s3"])[..]);
        assert_eq!(clf.control().column_names(), &strings(&["s2", "s4"])[..]);
        assert_eq!(clf.phenotype_name(), "A");
        assert_eq!(clf.control_name(), "B");
        assert_eq!(clf.feature_count(), 2);
        assert_eq!(clf.feature(1), Some("g2"));
        assert_eq!(clf.feature(2), None);
    }

    #[test]
    fn means_use_named_rows() {
        let (a, b) = groups();
        let clf = Classifier::create("clf1", &source(), &a, &b, "symbol").unwrap();
        assert!((clf.phenotype_mean("g1").unwrap() - 2.0).abs() < 1e-12);
        assert!((clf.control_mean("g2").unwrap() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_feature_fails_fast() {
        let (a, b) = groups();
        let clf = Classifier::create("clf1", &source(), &a, &b, "symbol").unwrap();
        assert!(matches!(
            clf.phenotype_mean("nope"),
            Err(ClassifierError::FeatureNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn unknown_annotation_is_an_error() {
        let (a, b) = groups();
        assert!(matches!(
            Classifier::create("clf1", &source(), &a, &b, "entrez"),
            Err(ClassifierError::AnnotationNotFound(_))
        ));
    }

    #[test]
    fn empty_group_gives_zero_columns_and_nan_mean() {
        let a = SampleGroup::new("A", strings(&["x", "y"]));
        let (_, b) = groups();
        let clf = Classifier::create("clf1", &source(), &a, &b, "symbol").unwrap();
        assert_eq!(clf.phenotype().ncols(), 0);
        assert_eq!(clf.phenotype().nrows(), 2);
        assert!(clf.phenotype_mean("g1").unwrap().is_nan());
    }

    #[test]
    fn duplicate_features_resolve_to_last_row() {
        let values = Array2::from_shape_vec((3, 1), vec![1.0, 2.0, 3.0]).unwrap();
        let m = FeatureMatrix::new(strings(&["s1"]), values)
            .unwrap()
            .with_annotation("symbol", strings(&["g", "h", "g"]))
            .unwrap();
        let a = SampleGroup::new("A", strings(&["s1"]));
        let b = SampleGroup::new("B", vec![]);
        let clf = Classifier::create("dup", &m, &a, &b, "symbol").unwrap();
        assert_eq!(clf.feature_row("g"), Some(2));
        assert_eq!(clf.feature_row("h"), Some(1));
        assert!((clf.phenotype_mean("g").unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(clf.sorted_features(), vec!["g", "h"]);
    }

    #[test]
    fn identity_is_the_name() {
        let (a, b) = groups();
        let first = Classifier::create("same", &source(), &a, &b, "symbol").unwrap();
        let second = Classifier::create("same", &source(), &b, &a, "symbol").unwrap();
        let other = Classifier::create("other", &source(), &a, &b, "symbol").unwrap();
        assert_eq!(first, second);
        assert!(other < first);
    }

    #[test]
    fn export_rejects_submatrix_shorter_than_feature_list() {
        let phenotype =
            FeatureMatrix::new(strings(&["s1"]), Array2::from_shape_vec((1, 1), vec![1.0]).unwrap())
                .unwrap();
        let control =
            FeatureMatrix::new(strings(&["s2"]), Array2::from_shape_vec((2, 1), vec![2.0, 3.0]).unwrap())
                .unwrap();
        let clf = Classifier::from_parts("short", "P", phenotype, "C", control, strings(&["g1", "g2"]));

        assert!(matches!(
            clf.to_xml(),
            Err(ClassifierError::ShapeMismatch { expected: 2, found: 1 })
        ));
        assert!(clf.phenotype_mean("g1").is_ok());
    }
}
