// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecLintError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, SpecLintError>;

// Allow `?` on std::io::Error by converting to SpecLintError::Io with unknown path.
impl From<std::io::Error> for SpecLintError {
    fn from(source: std::io::Error) -> Self {
        SpecLintError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl SpecLintError {
    /// Attaches a concrete path to an I/O error.
    #[must_use]
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        SpecLintError::Io {
            source,
            path: path.into(),
        }
    }
}
