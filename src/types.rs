// src/types.rs
//! Common data structures of the analysis surface: findings and the
//! aggregated corpus report consumed by external renderers.
//!
//! Warning kind names and message templates are stable strings; CI
//! tooling downstream matches on them.

use crate::analysis::concordance::ConcordanceStats;
use crate::model::Feature;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity of a finding. Configurable per warning kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// The fixed enumeration of finding types produced by the two quality
/// analyzers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    // Tag quality (§ tag hygiene)
    MissingPriorityTag,
    MissingTypeTag,
    LowValueTag,
    DuplicateTag,
    ExcessiveTags,
    OrphanedTag,
    TagTypo,
    // Anti-patterns (structure and prose)
    LongScenario,
    MissingGiven,
    MissingWhen,
    MissingThen,
    IncorrectStepOrder,
    UiFocusedStep,
    ImplementationDetailStep,
    MissingExamples,
    TooFewExamples,
    AmbiguousPronoun,
    InconsistentTense,
    ConjunctionInStep,
    LongScenarioName,
    LongStepText,
}

impl WarningKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [WarningKind] = &[
        WarningKind::MissingPriorityTag,
        WarningKind::MissingTypeTag,
        WarningKind::LowValueTag,
        WarningKind::DuplicateTag,
        WarningKind::ExcessiveTags,
        WarningKind::OrphanedTag,
        WarningKind::TagTypo,
        WarningKind::LongScenario,
        WarningKind::MissingGiven,
        WarningKind::MissingWhen,
        WarningKind::MissingThen,
        WarningKind::IncorrectStepOrder,
        WarningKind::UiFocusedStep,
        WarningKind::ImplementationDetailStep,
        WarningKind::MissingExamples,
        WarningKind::TooFewExamples,
        WarningKind::AmbiguousPronoun,
        WarningKind::InconsistentTense,
        WarningKind::ConjunctionInStep,
        WarningKind::LongScenarioName,
        WarningKind::LongStepText,
    ];

    /// The stable identifier used in reports and configuration keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            WarningKind::MissingPriorityTag => "missing-priority-tag",
            WarningKind::MissingTypeTag => "missing-type-tag",
            WarningKind::LowValueTag => "low-value-tag",
            WarningKind::DuplicateTag => "duplicate-tag",
            WarningKind::ExcessiveTags => "excessive-tags",
            WarningKind::OrphanedTag => "orphaned-tag",
            WarningKind::TagTypo => "tag-typo",
            WarningKind::LongScenario => "long-scenario",
            WarningKind::MissingGiven => "missing-given",
            WarningKind::MissingWhen => "missing-when",
            WarningKind::MissingThen => "missing-then",
            WarningKind::IncorrectStepOrder => "incorrect-step-order",
            WarningKind::UiFocusedStep => "ui-focused-step",
            WarningKind::ImplementationDetailStep => "implementation-detail-step",
            WarningKind::MissingExamples => "missing-examples",
            WarningKind::TooFewExamples => "too-few-examples",
            WarningKind::AmbiguousPronoun => "ambiguous-pronoun",
            WarningKind::InconsistentTense => "inconsistent-tense",
            WarningKind::ConjunctionInStep => "conjunction-in-step",
            WarningKind::LongScenarioName => "long-scenario-name",
            WarningKind::LongStepText => "long-step-text",
        }
    }

    /// Built-in severity, used when configuration carries no override.
    #[must_use]
    pub const fn default_severity(self) -> Severity {
        match self {
            WarningKind::MissingExamples => Severity::Error,
            WarningKind::MissingPriorityTag
            | WarningKind::DuplicateTag
            | WarningKind::ExcessiveTags
            | WarningKind::TagTypo
            | WarningKind::LongScenario
            | WarningKind::MissingGiven
            | WarningKind::MissingWhen
            | WarningKind::MissingThen
            | WarningKind::IncorrectStepOrder => Severity::Warning,
            WarningKind::MissingTypeTag
            | WarningKind::LowValueTag
            | WarningKind::OrphanedTag
            | WarningKind::UiFocusedStep
            | WarningKind::ImplementationDetailStep
            | WarningKind::TooFewExamples
            | WarningKind::ConjunctionInStep => Severity::Info,
            WarningKind::AmbiguousPronoun
            | WarningKind::InconsistentTense
            | WarningKind::LongScenarioName
            | WarningKind::LongStepText => Severity::Hint,
        }
    }

    /// Resolves a stable name back to its kind.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// A single finding produced by an analyzer. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub severity: Severity,
    pub message: String,
    /// Originating feature, when the finding is not corpus-wide.
    pub path: Option<PathBuf>,
    /// Originating scenario name, when scenario-scoped.
    pub scenario: Option<String>,
    /// 1-based source line of the originating scenario.
    pub line: Option<usize>,
    /// Suggested replacement tags, when the detector carries them.
    pub alternatives: Vec<String>,
}

impl Warning {
    /// Creates a corpus-level finding with no originating file.
    #[must_use]
    pub fn corpus(kind: WarningKind, severity: Severity, message: String) -> Self {
        Self {
            kind,
            severity,
            message,
            path: None,
            scenario: None,
            line: None,
            alternatives: Vec::new(),
        }
    }

    /// Creates a feature-level finding.
    #[must_use]
    pub fn feature(kind: WarningKind, severity: Severity, message: String, path: PathBuf) -> Self {
        Self {
            kind,
            severity,
            message,
            path: Some(path),
            scenario: None,
            line: None,
            alternatives: Vec::new(),
        }
    }

    /// Creates a scenario-level finding.
    #[must_use]
    pub fn scenario(
        kind: WarningKind,
        severity: Severity,
        message: String,
        path: PathBuf,
        scenario: String,
        line: usize,
    ) -> Self {
        Self {
            kind,
            severity,
            message,
            path: Some(path),
            scenario: Some(scenario),
            line: Some(line),
            alternatives: Vec::new(),
        }
    }

    /// Attaches suggested replacement tags.
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }
}

/// A file that could not be parsed. The batch continues without it.
#[derive(Debug, Clone, Serialize)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub error: String,
}

/// The complete output surface of one analysis run: the parsed corpus,
/// concordance statistics, and both warning lists. Renderers own all
/// presentation; this struct owns no formatting.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub features: Vec<Feature>,
    pub stats: ConcordanceStats,
    pub tag_warnings: Vec<Warning>,
    pub antipattern_warnings: Vec<Warning>,
    pub failures: Vec<ParseFailure>,
    pub duration_ms: u128,
}

impl CorpusReport {
    /// True when the run found nothing to analyze. Callers must report
    /// this explicitly rather than presenting an empty report as success.
    #[must_use]
    pub fn is_empty_corpus(&self) -> bool {
        self.features.is_empty()
    }

    /// Total findings across both analyzers.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.tag_warnings.len() + self.antipattern_warnings.len()
    }

    /// Scenario count across the whole corpus.
    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.features.iter().map(|f| f.scenarios().len()).sum()
    }
}
