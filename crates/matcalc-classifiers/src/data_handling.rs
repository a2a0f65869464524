//! Named feature matrices and sample groups.
//!
//! A `FeatureMatrix` holds numeric values with features as rows and samples
//! as columns. Rows can carry several annotations (e.g. a probe id and a gene
//! symbol); columns are identified by sample name. A `SampleGroup` is a named,
//! colored, ordered list of sample names used to partition the columns.
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifierError, Result};
use crate::math::{Array1, Array2};

/// One row-label source of a matrix, e.g. all gene symbols in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct RowAnnotation {
    pub name: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    annotations: Vec<RowAnnotation>,
    column_names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Create a matrix with named columns and no row annotations yet.
    pub fn new(column_names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if column_names.len() != values.ncols() {
            return Err(ClassifierError::ShapeMismatch {
                expected: values.ncols(),
                found: column_names.len(),
            });
        }
        Ok(Self {
            annotations: Vec::new(),
            column_names,
            values,
        })
    }

    /// Attach a row annotation. Re-using an existing name replaces its labels.
    pub fn with_annotation(mut self, name: &str, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.values.nrows() {
            return Err(ClassifierError::ShapeMismatch {
                expected: self.values.nrows(),
                found: labels.len(),
            });
        }
        match self.annotations.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.labels = labels,
            None => self.annotations.push(RowAnnotation {
                name: name.to_string(),
                labels,
            }),
        }
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row, col).copied()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_name(&self, col: usize) -> Option<&str> {
        self.column_names.get(col).map(String::as_str)
    }

    /// Full column as a feature vector, all rows in row order.
    pub fn column(&self, col: usize) -> Array1<f64> {
        self.values.column(col)
    }

    pub fn annotation_names(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|a| a.name.as_str())
    }

    pub fn annotation(&self, name: &str) -> Option<&[String]> {
        self.annotations
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.labels.as_slice())
    }

    /// Labels of the first annotation, which readers treat as the row ids.
    pub fn row_names(&self) -> Option<&[String]> {
        self.annotations.first().map(|a| a.labels.as_slice())
    }

    /// Column positions whose sample name is a member of `group`, in matrix
    /// column order. Members that are not columns of this matrix are ignored.
    pub fn column_indices(&self, group: &SampleGroup) -> Vec<usize> {
        let members: HashSet<&str> = group.members.iter().map(String::as_str).collect();
        self.column_names
            .iter()
            .enumerate()
            .filter(|(_, name)| members.contains(name.as_str()))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// New matrix holding only the given columns, rows untouched. Annotations
    /// are carried over.
    pub fn select_columns(&self, indices: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            annotations: self.annotations.clone(),
            column_names: indices.iter().map(|&i| self.column_names[i].clone()).collect(),
            values: self.values.select_columns(indices),
        }
    }
}

/// RGBA display color of a group, written as `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = ClassifierError;

    /// Accepts `#RRGGBB` (opaque) or `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(ClassifierError::Parse(format!("invalid color '{}'", s)));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ClassifierError::Parse(format!("invalid color '{}'", s)))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ClassifierError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_string()
    }
}

/// Named, ordered set of sample names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGroup {
    pub name: String,
    #[serde(default)]
    pub color: Rgba,
    pub members: Vec<String>,
}

impl SampleGroup {
    pub fn new<S: Into<String>>(name: S, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            color: Rgba::default(),
            members,
        }
    }

    pub fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }
}
