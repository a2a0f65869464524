use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::io::matrix_file::delimiter_for;
use crate::pipeline::{ClassificationResult, RESULT_COLUMN};

/// Header of the sample-name column in written results.
pub const SAMPLE_COLUMN: &str = "Sample";

/// Write a result table to CSV or TSV depending on the file extension.
pub fn write_classification<P: AsRef<Path>>(
    result: &ClassificationResult,
    output_path: P,
) -> Result<()> {
    let path = output_path.as_ref();
    let file =
        File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?;
    write_classification_to(result, BufWriter::new(file), delimiter_for(path))?;
    log::info!("Wrote {} classifications to {}", result.len(), path.display());
    Ok(())
}

pub fn write_classification_to<W: Write>(
    result: &ClassificationResult,
    output: W,
    delimiter: u8,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(output);

    writer.write_record([SAMPLE_COLUMN, RESULT_COLUMN])?;
    for (sample, label) in result.rows() {
        writer.write_record([sample, label])?;
    }

    writer.flush()?;
    Ok(())
}
