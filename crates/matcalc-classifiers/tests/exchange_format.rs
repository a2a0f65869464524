//! Integration tests for the XML exchange format.

use matcalc_classifiers::config::DistanceMetric;
use matcalc_classifiers::math::Array2;
use matcalc_classifiers::models::{load_model, GroupCentroidModel};
use matcalc_classifiers::xml::{document_to_string, parse_document, read_document_file, write_document_file};
use matcalc_classifiers::{
    Classifier, ClassifierError, ClassifierRegistry, FeatureMatrix, SampleGroup, ToXml, TrainedModel,
    XmlElement,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn classifier_with_duplicates() -> Classifier {
    let values = Array2::from_shape_vec(
        (3, 3),
        vec![
            1.0, 2.0, 3.0, // zeta
            4.0, 5.0, 6.0, // alpha
            7.0, 8.5, 9.0, // zeta again
        ],
    )
    .unwrap();
    let m = FeatureMatrix::new(strings(&["s1", "s2", "s3"]), values)
        .unwrap()
        .with_annotation("symbol", strings(&["zeta", "alpha", "zeta"]))
        .unwrap();
    Classifier::create(
        "dup",
        &m,
        &SampleGroup::new("P", strings(&["s1", "s3"])),
        &SampleGroup::new("C", strings(&["s2"])),
        "symbol",
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Classifier element layout
// ---------------------------------------------------------------------------

#[test]
fn classifier_attributes() {
    let xml = classifier_with_duplicates().to_xml().unwrap();
    assert_eq!(xml.name, "classifier");
    assert_eq!(xml.attribute("name"), Some("dup"));
    assert_eq!(xml.attribute("phenotype"), Some("P"));
    assert_eq!(xml.attribute("phenotype-size"), Some("2"));
    assert_eq!(xml.attribute("control"), Some("C"));
    assert_eq!(xml.attribute("control-size"), Some("1"));
    assert_eq!(xml.attribute("size"), Some("3"));
}

#[test]
fn one_sorted_child_per_unique_feature() {
    let xml = classifier_with_duplicates().to_xml().unwrap();
    let names: Vec<&str> = xml
        .children_named("gene")
        .map(|g| g.attribute("name").unwrap())
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn sample_values_come_from_the_indexed_row() {
    let xml = classifier_with_duplicates().to_xml().unwrap();
    let zeta = xml.children_named("gene").nth(1).unwrap();

    let phenotype: Vec<&str> = zeta
        .child("phenotype")
        .unwrap()
        .children_named("sample")
        .map(|s| s.attribute("value").unwrap())
        .collect();
    let control: Vec<&str> = zeta
        .child("control")
        .unwrap()
        .children_named("sample")
        .map(|s| s.attribute("value").unwrap())
        .collect();

    // last "zeta" row wins
    assert_eq!(phenotype, vec!["7", "9"]);
    assert_eq!(control, vec!["8.5"]);
}

#[test]
fn classifier_reads_back_from_text() {
    let original = classifier_with_duplicates();
    let text = document_to_string(&original.to_xml().unwrap()).unwrap();
    let back = Classifier::from_xml(&parse_document(&text).unwrap()).unwrap();

    assert_eq!(back, original);
    assert_eq!(back.features(), &strings(&["alpha", "zeta"])[..]);
    assert_eq!(back.phenotype().ncols(), 2);
    assert!((back.phenotype_mean("zeta").unwrap() - 8.0).abs() < 1e-12);
    assert!((back.control_mean("alpha").unwrap() - 5.0).abs() < 1e-12);
    assert_eq!(back.control().column_names(), &strings(&["C_1"])[..]);
}

#[test]
fn sample_count_must_match_declared_size() {
    let mut xml = classifier_with_duplicates().to_xml().unwrap();
    xml.set_attribute("phenotype-size", 5);
    assert!(matches!(
        Classifier::from_xml(&xml),
        Err(ClassifierError::InvalidXml(_))
    ));
}

#[test]
fn missing_attribute_is_reported() {
    let xml = XmlElement::new("classifier").with_attribute("name", "x");
    let err = Classifier::from_xml(&xml).unwrap_err();
    assert!(err.to_string().contains("phenotype"));
}

// ---------------------------------------------------------------------------
// Registry documents
// ---------------------------------------------------------------------------

#[test]
fn registry_document_round_trips_through_a_file() {
    let model = GroupCentroidModel::from_classifier(
        &classifier_with_duplicates(),
        DistanceMetric::Euclidean,
    )
    .unwrap();

    let mut registry = ClassifierRegistry::new();
    registry.add(Box::new(model));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classifiers.xml");
    write_document_file(&registry.to_xml().unwrap(), &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("<classifiers>"));
    assert!(text.contains("type=\"group-centroid\""));

    let mut loaded = ClassifierRegistry::new();
    let added = loaded
        .load_xml(&read_document_file(&path).unwrap(), load_model)
        .unwrap();
    assert_eq!(added, 1);
    let model = loaded.get("dup").unwrap();
    assert_eq!(model.classify(&[2.0, 5.0, 3.0]), "P");
}

#[test]
fn unknown_model_type_is_rejected() {
    let element = XmlElement::new("model")
        .with_attribute("name", "x")
        .with_attribute("type", "c45");
    assert!(load_model(&element).is_err());
}

#[test]
fn registry_load_is_all_or_nothing() {
    let model = GroupCentroidModel::from_classifier(
        &classifier_with_duplicates(),
        DistanceMetric::Euclidean,
    )
    .unwrap();
    let mut root = XmlElement::new("classifiers");
    root.push_child(model.to_xml().unwrap());
    root.push_child(
        XmlElement::new("model")
            .with_attribute("name", "bad")
            .with_attribute("type", "c45"),
    );
    let text = document_to_string(&root).unwrap();

    let mut registry = ClassifierRegistry::new();
    let result = registry.load_xml(&parse_document(&text).unwrap(), load_model);
    assert!(result.is_err());
    assert!(registry.is_empty());
    assert!(registry.get("dup").is_none());
}
