// src/model/mod.rs
//! Domain model for a parsed specification corpus.
//!
//! All types here are built additively by the parser and read-only
//! afterward: mutation goes through narrow `push_*`/`set_*` methods and
//! every getter hands out a borrow, never a mutable handle.

pub mod concordance;
pub mod tag;

pub use concordance::TagConcordance;
pub use tag::{Tag, TagCategory};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The kind of behavior unit a `Scenario` represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScenarioKind {
    Scenario,
    Outline,
    Background,
    Rule,
}

/// A named data table attached to an outline scenario.
#[derive(Debug, Clone, Serialize)]
pub struct Example {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Example {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One behavior unit inside a feature.
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    name: String,
    kind: ScenarioKind,
    line: usize,
    description: String,
    tags: Vec<Tag>,
    steps: Vec<String>,
    examples: Vec<Example>,
}

impl Scenario {
    /// Creates a scenario at the given 1-based source line.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ScenarioKind, line: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            line,
            description: String::new(),
            tags: Vec::new(),
            steps: Vec::new(),
            examples: Vec::new(),
        }
    }

    pub fn push_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn push_step(&mut self, step: impl Into<String>) {
        self.steps.push(step.into());
    }

    pub fn push_example(&mut self, example: Example) {
        self.examples.push(example);
    }

    /// Appends a flushed description block, separating paragraphs.
    pub fn append_description(&mut self, text: &str) {
        append_paragraph(&mut self.description, text);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ScenarioKind {
        self.kind
    }

    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }
}

/// One parsed spec file.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    path: PathBuf,
    name: String,
    description: String,
    tags: Vec<Tag>,
    scenarios: Vec<Scenario>,
    metadata: BTreeMap<String, String>,
}

impl Feature {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: String::new(),
            description: String::new(),
            tags: Vec::new(),
            scenarios: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn push_tag(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub fn push_scenario(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Appends a flushed description block, separating paragraphs.
    pub fn append_description(&mut self, text: &str) {
        append_paragraph(&mut self.description, text);
    }

    /// Records a dialect capability flag. Only the dialect pass writes here.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// True if the dialect pass recorded the given capability as "true".
    #[must_use]
    pub fn has_capability(&self, key: &str) -> bool {
        self.metadata.get(key).is_some_and(|v| v == "true")
    }
}

fn append_paragraph(buffer: &mut String, text: &str) {
    let text = text.trim_matches('\n');
    if text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push_str("\n\n");
    }
    buffer.push_str(text);
}
