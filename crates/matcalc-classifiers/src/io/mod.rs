//! IO utilities for matrix, group and result files.

pub mod groups;
pub mod matrix_file;
pub mod results;

pub use groups::{find_group, read_groups};
pub use matrix_file::{delimiter_for, read_matrix, read_matrix_with_config, MatrixReaderConfig};
pub use results::{write_classification, write_classification_to};
