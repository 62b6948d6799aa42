// src/discovery.rs
//! Spec-file discovery: walks a directory tree, prunes vendored and
//! generated directories, and returns a deterministic, sorted list of
//! spec-file paths for the engine.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never descended into.
pub const PRUNE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "target",
    ".venv",
    "__pycache__",
    ".idea",
    ".vscode",
];

#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// File extensions treated as spec files, without the leading dot.
    pub extensions: Vec<String>,
    pub follow_links: bool,
    pub verbose: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["feature".to_string()],
            follow_links: false,
            verbose: false,
        }
    }
}

/// Walks `root` and returns all spec files, sorted by path.
#[must_use]
pub fn discover(root: &Path, options: &DiscoverOptions) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .into_iter()
        .filter_entry(|e| !should_prune(&e.file_name().to_string_lossy()));

    let mut paths = Vec::new();
    let mut errors = 0usize;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && has_spec_extension(entry.path(), options) {
                    paths.push(entry.path().to_path_buf());
                }
            }
            Err(_) => errors += 1,
        }
    }

    if errors > 0 && options.verbose {
        eprintln!("WARN: Encountered {errors} errors during file walk");
    }

    paths.sort();
    paths
}

fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

fn has_spec_extension(path: &Path, options: &DiscoverOptions) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| options.extensions.iter().any(|want| want == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discovers_feature_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.feature"), "Feature: B\n").unwrap();
        fs::write(dir.path().join("a.feature"), "Feature: A\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a spec\n").unwrap();

        let found = discover(dir.path(), &DiscoverOptions::default());
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.feature", "b.feature"]);
    }

    #[test]
    fn test_prunes_vendored_directories() {
        let dir = TempDir::new().unwrap();
        let vendored = dir.path().join("node_modules");
        fs::create_dir(&vendored).unwrap();
        fs::write(vendored.join("x.feature"), "Feature: X\n").unwrap();
        fs::write(dir.path().join("y.feature"), "Feature: Y\n").unwrap();

        let found = discover(dir.path(), &DiscoverOptions::default());
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_custom_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.spec"), "Feature: A\n").unwrap();

        let options = DiscoverOptions {
            extensions: vec!["spec".to_string()],
            ..Default::default()
        };
        assert_eq!(discover(dir.path(), &options).len(), 1);
    }
}
