//! Directory listings for the open and export prompts.

use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::warn;
use walkdir::WalkDir;

/// One selectable line in a file prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseEntry {
    /// Absolute or prompt-relative path of the entry.
    pub path: PathBuf,
    /// Label shown in the list.
    pub label: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

impl BrowseEntry {
    fn parent_of(dir: &Path) -> Option<Self> {
        dir.parent().map(|parent| Self {
            path: parent.to_path_buf(),
            label: "../".to_string(),
            is_dir: true,
        })
    }
}

/// List sub-directories and files with the given extension directly
/// inside `dir`.
///
/// Directories come first, then files, each ordered by name ignoring
/// case. Hidden entries are skipped. A `../` entry leads to the parent.
pub fn list_dir(dir: &Path, extension: &str) -> Result<Vec<BrowseEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() > 0 => {
                warn!("skipping unreadable entry in {}: {err}", dir.display());
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to list {}", dir.display()));
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let is_dir = entry.file_type().is_dir() || entry.path().is_dir();
        if !is_dir && !has_extension(entry.path(), extension) {
            continue;
        }
        entries.push(BrowseEntry {
            label: if is_dir { format!("{name}/") } else { name },
            path: entry.into_path(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.label.to_lowercase().cmp(&b.label.to_lowercase()),
    });
    if let Some(parent) = BrowseEntry::parent_of(dir) {
        entries.insert(0, parent);
    }
    Ok(entries)
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_matching_files_and_directories() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("archive"))?;
        fs::create_dir_all(root.join(".cache"))?;
        fs::write(root.join("b.json"), "{}")?;
        fs::write(root.join("A.JSON"), "{}")?;
        fs::write(root.join("notes.txt"), "")?;
        fs::write(root.join(".hidden.json"), "{}")?;
        fs::write(root.join("archive").join("old.json"), "{}")?;

        let entries = list_dir(root, "json")?;
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["../", "archive/", "A.JSON", "b.json"]);
        assert!(entries[1].is_dir);
        assert_eq!(entries[3].path, root.join("b.json"));
        Ok(())
    }

    #[test]
    fn missing_directory_is_an_error() -> Result<()> {
        let temp = tempdir()?;
        assert!(list_dir(&temp.path().join("nope"), "csv").is_err());
        Ok(())
    }

    #[test]
    fn extension_check_ignores_case() {
        assert!(has_extension(Path::new("x.CSV"), "csv"));
        assert!(!has_extension(Path::new("x.csv.bak"), "csv"));
        assert!(!has_extension(Path::new("csv"), "csv"));
    }
}
