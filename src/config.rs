// src/config.rs
//! Warning configuration: per-kind toggles and severities, numeric
//! thresholds, and the lexical vocabularies the detectors match against.
//!
//! Loaded once and passed by reference into every analyzer call; the
//! analyzers never write to it. A missing or malformed configuration
//! source degrades to defaults with a logged note.

use crate::types::{Severity, WarningKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Per-kind override: enabled flag, severity, suggested alternatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningOverride {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

impl Default for WarningOverride {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
            alternatives: Vec::new(),
        }
    }
}

/// Numeric thresholds shared by the detectors and the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    #[serde(default = "default_min_example_rows")]
    pub min_example_rows: usize,
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    #[serde(default = "default_max_step_length")]
    pub max_step_length: usize,
    /// Corpora at or above this many files are parsed in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            max_tags: default_max_tags(),
            min_example_rows: default_min_example_rows(),
            max_name_length: default_max_name_length(),
            max_step_length: default_max_step_length(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

const fn default_true() -> bool {
    true
}
const fn default_max_steps() -> usize {
    10
}
const fn default_max_tags() -> usize {
    6
}
const fn default_min_example_rows() -> usize {
    2
}
const fn default_max_name_length() -> usize {
    80
}
const fn default_max_step_length() -> usize {
    120
}
const fn default_parallel_threshold() -> usize {
    16
}

/// Word lists consulted by the lexical detectors. All matching against
/// these lists is case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    #[serde(default = "default_low_value_tags")]
    pub low_value_tags: Vec<String>,
    #[serde(default = "default_standard_alternatives")]
    pub standard_alternatives: Vec<String>,
    /// Extra tags treated as Priority beyond the built-in markers.
    #[serde(default)]
    pub custom_priority_tags: Vec<String>,
    /// Extra tags treated as Type beyond the built-in markers.
    #[serde(default)]
    pub custom_type_tags: Vec<String>,
    #[serde(default = "default_ui_verbs")]
    pub ui_verbs: Vec<String>,
    #[serde(default = "default_implementation_nouns")]
    pub implementation_nouns: Vec<String>,
    #[serde(default = "default_pronouns")]
    pub pronouns: Vec<String>,
    #[serde(default = "default_past_tense_verbs")]
    pub past_tense_verbs: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            low_value_tags: default_low_value_tags(),
            standard_alternatives: default_standard_alternatives(),
            custom_priority_tags: Vec::new(),
            custom_type_tags: Vec::new(),
            ui_verbs: default_ui_verbs(),
            implementation_nouns: default_implementation_nouns(),
            pronouns: default_pronouns(),
            past_tense_verbs: default_past_tense_verbs(),
        }
    }
}

fn default_low_value_tags() -> Vec<String> {
    ["test", "feature", "scenario", "tag", "misc"]
        .map(String::from)
        .to_vec()
}

fn default_standard_alternatives() -> Vec<String> {
    ["@smoke", "@regression", "@integration", "@e2e"]
        .map(String::from)
        .to_vec()
}

fn default_ui_verbs() -> Vec<String> {
    [
        "click", "clicks", "scroll", "scrolls", "tap", "taps", "swipe", "hover", "drag",
        "press the button", "navigate to", "type into", "select from dropdown",
    ]
    .map(String::from)
    .to_vec()
}

fn default_implementation_nouns() -> Vec<String> {
    [
        "http status",
        "status code",
        "database table",
        "database row",
        "api endpoint",
        "sql query",
        "json payload",
        "response header",
        "request header",
        "cookie",
        "query parameter",
        "cache key",
    ]
    .map(String::from)
    .to_vec()
}

fn default_pronouns() -> Vec<String> {
    ["it", "this", "that"].map(String::from).to_vec()
}

fn default_past_tense_verbs() -> Vec<String> {
    [
        "was", "were", "had", "did", "went", "saw", "clicked", "entered", "logged", "opened",
        "submitted", "received", "created", "selected", "pressed", "navigated",
    ]
    .map(String::from)
    .to_vec()
}

/// The complete warning configuration. Partial TOML overrides merge over
/// these defaults through serde's per-field default functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarningConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub vocabulary: Vocabulary,
    /// Keyed by the stable warning kind name, e.g. `"long-scenario"`.
    #[serde(default)]
    pub warnings: HashMap<String, WarningOverride>,
    #[serde(default)]
    pub verbose: bool,
}

impl WarningConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file. Any failure (missing file,
    /// unreadable, malformed) degrades to defaults with a logged note;
    /// this never aborts a run.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("WARN: using default warning configuration ({e:#})");
                Self::default()
            }
        }
    }

    /// Strict load used by `load` and by tests.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML, or
    /// names an unknown warning kind.
    pub fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML content.
    ///
    /// # Errors
    /// Returns error on malformed TOML or unknown warning kind names.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("malformed TOML")?;
        for key in config.warnings.keys() {
            if WarningKind::from_name(key).is_none() {
                anyhow::bail!("unknown warning kind in config: {key}");
            }
        }
        Ok(config)
    }

    /// True unless the kind is explicitly disabled.
    #[must_use]
    pub fn is_enabled(&self, kind: WarningKind) -> bool {
        self.warnings.get(kind.name()).map_or(true, |o| o.enabled)
    }

    /// Effective severity: override if configured, else the built-in.
    #[must_use]
    pub fn severity(&self, kind: WarningKind) -> Severity {
        self.warnings
            .get(kind.name())
            .and_then(|o| o.severity)
            .unwrap_or_else(|| kind.default_severity())
    }

    /// Suggested alternatives for kinds that carry them: the configured
    /// override when present, else a kind-appropriate default list.
    #[must_use]
    pub fn alternatives(&self, kind: WarningKind) -> Vec<String> {
        if let Some(o) = self.warnings.get(kind.name()) {
            if !o.alternatives.is_empty() {
                return o.alternatives.clone();
            }
        }
        match kind {
            WarningKind::MissingPriorityTag => {
                ["@P0", "@P1", "@P2", "@P3"].map(String::from).to_vec()
            }
            WarningKind::MissingTypeTag | WarningKind::LowValueTag => {
                self.vocabulary.standard_alternatives.clone()
            }
            _ => Vec::new(),
        }
    }
}
