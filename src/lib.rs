//! speclint: static analysis for behavior-specification (feature) files.
//!
//! The crate parses a corpus of loosely-structured, human-authored spec
//! files into an immutable feature graph, then derives tag concordance
//! statistics, tag-hygiene warnings, and scenario anti-pattern warnings.
//! Rendering and CLI concerns live in external collaborators; everything
//! here is deterministic and side-effect-free given the same input order.

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod types;

pub use config::WarningConfig;
pub use engine::Engine;
pub use error::{Result, SpecLintError};
pub use model::{Feature, Scenario, ScenarioKind, Tag, TagCategory, TagConcordance};
pub use parser::Parser;
pub use types::{CorpusReport, Severity, Warning, WarningKind};
