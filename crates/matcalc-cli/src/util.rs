use anyhow::Result;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub fn validate_matrix_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") | Some("txt") => {}
        _ => anyhow::bail!(
            "Matrix file must have a .tsv, .txt or .csv extension: {}",
            path.display()
        ),
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

/// Open `path` for writing, or stdout when no path is given.
pub fn output_writer(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(io::BufWriter::new(File::create(p)?)),
        None => Box::new(io::stdout().lock()),
    })
}
