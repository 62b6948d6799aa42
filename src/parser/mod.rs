// src/parser/mod.rs
//! Line-state-machine parser for spec files.
//!
//! One forward pass, no backtracking. The format has no syntax errors:
//! any line that matches no rule is absorbed into the free-text
//! description of whichever element is currently open.

pub mod dialect;

use crate::error::{Result, SpecLintError};
use crate::model::{Example, Feature, Scenario, ScenarioKind, Tag};
use std::fs;
use std::path::Path;

/// Structural keyword prefixes, checked in this order. Longer variants
/// of the same keyword must come before their prefix.
const OUTLINE_PREFIXES: &[&str] = &["Scenario Outline:", "Scenario Template:"];
const EXAMPLES_PREFIXES: &[&str] = &["Examples:", "Scenarios:"];

const STEP_KEYWORDS: &[&str] = &["Given ", "When ", "Then ", "And ", "But "];

/// Bullet marker for the dialect's bare steps.
const BULLET_STEP: &str = "* ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    FeatureHeader,
    ScenarioBody,
    ExamplesHeader,
    ExamplesRows,
}

/// Stateless entry point; each worker in a parallel parse owns one.
#[derive(Debug, Default)]
pub struct Parser;

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses one spec file, then runs the dialect pass.
    ///
    /// # Errors
    /// Returns error only if the file cannot be read; the parse itself
    /// cannot fail.
    pub fn parse_file(&self, path: &Path) -> Result<Feature> {
        let content =
            fs::read_to_string(path).map_err(|e| SpecLintError::io(e, path))?;
        let mut feature = self.parse(path, &content);
        dialect::annotate(&mut feature, &content);
        Ok(feature)
    }

    /// Parses raw content into a feature graph. Never fails.
    #[must_use]
    pub fn parse(&self, path: &Path, content: &str) -> Feature {
        let mut machine = Machine::new(path);
        for (index, line) in content.lines().enumerate() {
            machine.consume(index + 1, line);
        }
        machine.finish()
    }
}

struct Machine {
    feature: Feature,
    state: State,
    scenario: Option<Scenario>,
    example: Option<Example>,
    pending_tags: Vec<Tag>,
    description: Vec<String>,
}

impl Machine {
    fn new(path: &Path) -> Self {
        Self {
            feature: Feature::new(path),
            state: State::Idle,
            scenario: None,
            example: None,
            pending_tags: Vec::new(),
            description: Vec::new(),
        }
    }

    fn consume(&mut self, line_number: usize, raw: &str) {
        let line = raw.trim();

        // Rule 1: blank lines never change state; mid-description they
        // insert a paragraph break.
        if line.is_empty() {
            if !self.description.is_empty() {
                self.description.push(String::new());
            }
            return;
        }

        // Rule 2: comments are ignored entirely.
        if line.starts_with('#') {
            return;
        }

        // An open example table closes on the first non-table line, which
        // then falls through to normal handling.
        if matches!(self.state, State::ExamplesHeader | State::ExamplesRows)
            && !is_table_row(line)
        {
            self.close_example();
        }

        // Tie-break between tag lines and step lines: step detection wins
        // only once a scenario is open.
        if self.scenario.is_some() && is_step_line(line) {
            self.handle_step(line);
            return;
        }

        // Rule 3: tag lines buffer tokens until the next structural keyword.
        if is_tag_line(line) {
            for token in line.split_whitespace() {
                if let Ok(tag) = Tag::of(token) {
                    self.pending_tags.push(tag);
                }
            }
            return;
        }

        // Rule 4: structural keywords.
        if let Some(name) = strip_any_prefix(line, &["Feature:"]) {
            self.open_feature(name);
            return;
        }
        if let Some(name) = strip_any_prefix(line, OUTLINE_PREFIXES) {
            self.open_scenario(name, ScenarioKind::Outline, line_number, true);
            return;
        }
        if let Some(name) = strip_any_prefix(line, &["Background:"]) {
            self.open_scenario(name, ScenarioKind::Background, line_number, false);
            return;
        }
        if let Some(name) = strip_any_prefix(line, &["Scenario:"]) {
            self.open_scenario(name, ScenarioKind::Scenario, line_number, true);
            return;
        }
        if let Some(name) = strip_any_prefix(line, &["Rule:"]) {
            self.open_scenario(name, ScenarioKind::Rule, line_number, true);
            return;
        }
        if let Some(name) = strip_any_prefix(line, EXAMPLES_PREFIXES) {
            if self.scenario.is_some() {
                self.open_example(name);
                return;
            }
            // Examples with no scenario to attach to: free text.
        }

        // Rule 5: step keyword before any scenario is open never matches
        // (handled above); a bullet outside a scenario is free text too.

        // Rule 6: table rows inside an examples block.
        if is_table_row(line) {
            match self.state {
                State::ExamplesHeader => {
                    let headers: Vec<String> = split_cells(line)
                        .into_iter()
                        .filter(|c| !c.is_empty())
                        .collect();
                    if let Some(example) = self.example.as_mut() {
                        example.set_headers(headers);
                    }
                    self.state = State::ExamplesRows;
                    return;
                }
                State::ExamplesRows => {
                    if let Some(example) = self.example.as_mut() {
                        example.push_row(split_cells(line));
                    }
                    return;
                }
                _ => {} // a table row elsewhere is free text
            }
        }

        // Rule 7: anything else joins the open element's description.
        self.description.push(line.to_string());
    }

    fn open_feature(&mut self, name: &str) {
        self.flush_description();
        self.feature.set_name(name.trim());
        for tag in self.pending_tags.drain(..) {
            self.feature.push_tag(tag);
        }
        self.state = State::FeatureHeader;
    }

    fn open_scenario(&mut self, name: &str, kind: ScenarioKind, line: usize, takes_tags: bool) {
        self.flush_description();
        self.close_scenario();

        let mut scenario = Scenario::new(name.trim(), kind, line);
        if takes_tags {
            for tag in self.pending_tags.drain(..) {
                scenario.push_tag(tag);
            }
        } else {
            // Background never receives tags; pending ones are dropped at
            // the attachment point.
            self.pending_tags.clear();
        }
        self.scenario = Some(scenario);
        self.state = State::ScenarioBody;
    }

    fn open_example(&mut self, name: &str) {
        self.flush_description();
        self.close_example();
        // Examples never receive tags.
        self.pending_tags.clear();
        self.example = Some(Example::new(name.trim()));
        self.state = State::ExamplesHeader;
    }

    fn handle_step(&mut self, line: &str) {
        self.flush_description();
        if let Some(scenario) = self.scenario.as_mut() {
            scenario.push_step(line);
        }
        self.state = State::ScenarioBody;
    }

    /// Flushes buffered free text to the open element, preserving
    /// paragraph breaks.
    fn flush_description(&mut self) {
        if self.description.is_empty() {
            return;
        }
        let text = self.description.join("\n");
        self.description.clear();
        match self.scenario.as_mut() {
            Some(scenario) => scenario.append_description(&text),
            None => self.feature.append_description(&text),
        }
    }

    fn close_example(&mut self) {
        if let Some(example) = self.example.take() {
            if let Some(scenario) = self.scenario.as_mut() {
                scenario.push_example(example);
            }
        }
        if self.state == State::ExamplesHeader || self.state == State::ExamplesRows {
            self.state = State::ScenarioBody;
        }
    }

    fn close_scenario(&mut self) {
        self.close_example();
        if let Some(scenario) = self.scenario.take() {
            self.feature.push_scenario(scenario);
        }
    }

    /// End-of-file flushes exactly as a structural keyword would.
    fn finish(mut self) -> Feature {
        self.flush_description();
        self.close_scenario();
        self.feature
    }
}

fn is_tag_line(line: &str) -> bool {
    // Caller guarantees a trimmed, non-empty line.
    line.split_whitespace().all(|t| t.starts_with('@') && t.len() > 1)
}

fn is_step_line(line: &str) -> bool {
    STEP_KEYWORDS.iter().any(|k| line.starts_with(k)) || line.starts_with(BULLET_STEP)
}

fn is_table_row(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn strip_any_prefix<'a>(line: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| line.strip_prefix(p))
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|c| c.trim().to_string())
        .collect()
}
