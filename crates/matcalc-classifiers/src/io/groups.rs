//! JSON sample group files.
//!
//! A group file is a JSON array of `{ "name", "color", "members" }` objects;
//! `color` is optional and written as `#RRGGBB` or `#RRGGBBAA`.
use std::path::Path;

use anyhow::{Context, Result};

use crate::data_handling::SampleGroup;

pub fn read_groups<P: AsRef<Path>>(path: P) -> Result<Vec<SampleGroup>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read groups: {}", path.display()))?;
    let groups: Vec<SampleGroup> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse groups: {}", path.display()))?;
    log::debug!("Read {} groups from {}", groups.len(), path.display());
    Ok(groups)
}

pub fn find_group<'a>(groups: &'a [SampleGroup], name: &str) -> Option<&'a SampleGroup> {
    groups.iter().find(|g| g.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_handling::Rgba;

    #[test]
    fn reads_groups_with_optional_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(
            &path,
            r##"[{"name": "A", "color": "#ff0000", "members": ["s1"]},
                {"name": "B", "members": ["s2", "s3"]}]"##,
        )
        .unwrap();

        let groups = read_groups(&path).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].color, Rgba::new(255, 0, 0, 255));
        assert_eq!(groups[1].color, Rgba::BLACK);
        assert_eq!(find_group(&groups, "B").unwrap().members.len(), 2);
        assert!(find_group(&groups, "C").is_none());
    }

    #[test]
    fn bad_color_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        std::fs::write(&path, r#"[{"name": "A", "color": "red", "members": []}]"#).unwrap();
        assert!(read_groups(&path).is_err());
    }
}
