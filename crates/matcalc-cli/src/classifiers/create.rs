//! Build a single phenotype/control classifier and write it as XML.
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use matcalc_classifiers::io::{find_group, read_groups, read_matrix_with_config, MatrixReaderConfig};
use matcalc_classifiers::registry::REGISTRY_ELEMENT;
use matcalc_classifiers::stats::summarize;
use matcalc_classifiers::xml::write_document;
use matcalc_classifiers::{Classifier, ToXml, XmlElement};

use crate::util::output_writer;

#[derive(Debug, Clone)]
pub struct CreateParams {
    pub matrix: PathBuf,
    pub groups: PathBuf,
    pub name: String,
    pub phenotype: String,
    pub control: String,
    /// Row annotation holding feature names. Defaults to the first one.
    pub annotation: Option<String>,
    pub annotation_columns: usize,
    pub output: Option<PathBuf>,
}

pub fn build_classifier(params: &CreateParams) -> Result<Classifier> {
    let matrix = read_matrix_with_config(
        &params.matrix,
        &MatrixReaderConfig {
            annotation_columns: params.annotation_columns,
            delimiter: None,
        },
    )?;
    let groups = read_groups(&params.groups)?;

    let phenotype = find_group(&groups, &params.phenotype)
        .ok_or_else(|| anyhow!("No group named '{}' in {}", params.phenotype, params.groups.display()))?;
    let control = find_group(&groups, &params.control)
        .ok_or_else(|| anyhow!("No group named '{}' in {}", params.control, params.groups.display()))?;

    let annotation = match &params.annotation {
        Some(a) => a.clone(),
        None => matrix
            .annotation_names()
            .next()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Matrix has no annotation column to read feature names from"))?,
    };

    let classifier = Classifier::create(&params.name, &matrix, phenotype, control, &annotation)?;
    log::info!(
        "Created classifier '{}' ({} features, {} {} vs {} {})",
        classifier.name(),
        classifier.feature_count(),
        classifier.phenotype().ncols(),
        classifier.phenotype_name(),
        classifier.control().ncols(),
        classifier.control_name()
    );
    Ok(classifier)
}

pub fn run_create(params: &CreateParams) -> Result<Classifier> {
    let classifier = build_classifier(params)?;

    for row in summarize(&classifier)? {
        log::debug!(
            "{}: {} mean {:.4}, {} mean {:.4}",
            row.feature,
            classifier.phenotype_name(),
            row.phenotype_mean,
            classifier.control_name(),
            row.control_mean
        );
    }

    let mut root = XmlElement::new(REGISTRY_ELEMENT);
    root.push_child(classifier.to_xml()?);
    write_xml(&root, params.output.as_deref())?;
    Ok(classifier)
}

pub(crate) fn write_xml(root: &XmlElement, output: Option<&Path>) -> Result<()> {
    let owned = output.map(Path::to_path_buf);
    let writer = output_writer(owned.as_ref())?;
    write_document(root, writer).with_context(|| match output {
        Some(p) => format!("Failed to write XML to {}", p.display()),
        None => "Failed to write XML to stdout".to_string(),
    })
}
