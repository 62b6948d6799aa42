// src/model/tag.rs
//! The tag abstraction: a classification marker attached to features and
//! scenarios. Tags compare case-insensitively (sigil and separators stripped)
//! but keep their original casing for display.

use crate::error::{Result, SpecLintError};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The marker character that identifies a token as a tag.
pub const SIGIL: char = '@';

/// Two tags whose normalized keys are within this edit distance are
/// considered candidate misspellings of each other.
pub const SIMILARITY_DISTANCE: usize = 2;

// Closed classification lists, matched against the normalized key.
const PRIORITY_MARKERS: &[&str] = &[
    "p0", "p1", "p2", "p3", "p4", "critical", "high", "medium", "low",
];

const TYPE_MARKERS: &[&str] = &[
    "smoke",
    "regression",
    "e2e",
    "endtoend",
    "integration",
    "unit",
    "api",
    "ui",
    "performance",
    "security",
    "acceptance",
    "sanity",
    "functional",
];

const STATUS_MARKERS: &[&str] = &[
    "wip",
    "skip",
    "skipped",
    "ignore",
    "ignored",
    "manual",
    "automated",
    "todo",
    "blocked",
    "flaky",
    "deprecated",
    "draft",
    "review",
];

/// Coarse classification of a tag, derived from closed marker lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TagCategory {
    Priority,
    Type,
    Status,
    Other,
}

impl TagCategory {
    /// All categories in display order.
    pub const ALL: &'static [TagCategory] = &[
        TagCategory::Priority,
        TagCategory::Type,
        TagCategory::Status,
        TagCategory::Other,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            TagCategory::Priority => "Priority",
            TagCategory::Type => "Type",
            TagCategory::Status => "Status",
            TagCategory::Other => "Other",
        }
    }
}

/// A classification marker, normalized to always carry its sigil.
///
/// Equality, ordering, and hashing all use the normalized key (sigil
/// stripped, case-folded, separators removed); the raw name is preserved
/// for display only.
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
    key: String,
}

impl Tag {
    /// Normalizes a raw token into a `Tag`, prepending the sigil exactly
    /// once. Re-normalizing an already-prefixed tag is idempotent.
    ///
    /// # Errors
    /// Returns `InvalidTag` if the input is empty or whitespace-only.
    pub fn of(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().all(|c| c == SIGIL) {
            return Err(SpecLintError::InvalidTag(raw.to_string()));
        }

        let name = if trimmed.starts_with(SIGIL) {
            trimmed.to_string()
        } else {
            format!("{SIGIL}{trimmed}")
        };
        let key = normalize_key(&name);
        Ok(Self { name, key })
    }

    /// The display name, original casing preserved, sigil included.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized comparison key: sigil stripped, case-folded,
    /// `-`/`_`/whitespace removed.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Classifies the tag against the fixed priority/type/status lists.
    #[must_use]
    pub fn category(&self) -> TagCategory {
        if PRIORITY_MARKERS.contains(&self.key.as_str()) {
            TagCategory::Priority
        } else if TYPE_MARKERS.contains(&self.key.as_str()) {
            TagCategory::Type
        } else if STATUS_MARKERS.contains(&self.key.as_str()) {
            TagCategory::Status
        } else {
            TagCategory::Other
        }
    }

    /// Levenshtein distance between the two normalized keys.
    #[must_use]
    pub fn edit_distance(&self, other: &Tag) -> usize {
        levenshtein(&self.key, &other.key)
    }

    /// True iff the keys differ but are within the similarity distance.
    #[must_use]
    pub fn is_similar_to(&self, other: &Tag) -> bool {
        self.key != other.key && self.edit_distance(other) <= SIMILARITY_DISTANCE
    }
}

fn normalize_key(name: &str) -> String {
    name.trim_start_matches(SIGIL)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classic two-row Levenshtein distance.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
