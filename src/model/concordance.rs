// src/model/concordance.rs
//! The tag concordance: an immutable frequency snapshot built once per
//! analysis run. Counts cover feature-level mentions plus scenario-level
//! mentions (a scenario's tag set is its own tags unioned with its
//! feature's, deduplicated, so each tag counts at most once per scenario).

use super::tag::{Tag, TagCategory};
use super::{Feature, Scenario};
use serde::Serialize;
use std::collections::BTreeMap;

/// Returns a scenario's effective tag set: its own tags followed by
/// inherited feature tags, deduplicated by normalized key, source order
/// preserved.
#[must_use]
pub fn effective_tags<'a>(feature: &'a Feature, scenario: &'a Scenario) -> Vec<&'a Tag> {
    let mut seen: Vec<&str> = Vec::new();
    let mut out = Vec::new();
    for tag in scenario.tags().iter().chain(feature.tags()) {
        if !seen.contains(&tag.key()) {
            seen.push(tag.key());
            out.push(tag);
        }
    }
    out
}

/// Immutable corpus-wide tag frequency index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TagConcordance {
    counts: BTreeMap<Tag, usize>,
}

impl TagConcordance {
    /// Builds the concordance from a parsed corpus. Never mutated after
    /// this; rebuild for a new corpus.
    #[must_use]
    pub fn build(features: &[Feature]) -> Self {
        let mut counts: BTreeMap<Tag, usize> = BTreeMap::new();

        for feature in features {
            let mut seen: Vec<&str> = Vec::new();
            for tag in feature.tags() {
                if !seen.contains(&tag.key()) {
                    seen.push(tag.key());
                    *counts.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            for scenario in feature.scenarios() {
                for tag in effective_tags(feature, scenario) {
                    *counts.entry(tag.clone()).or_insert(0) += 1;
                }
            }
        }

        Self { counts }
    }

    #[must_use]
    pub fn count(&self, tag: &Tag) -> usize {
        self.counts.get(tag).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, usize)> {
        self.counts.iter().map(|(t, c)| (t, *c))
    }

    /// Tags sorted by occurrence count descending, key ascending on ties.
    #[must_use]
    pub fn by_frequency(&self) -> Vec<(&Tag, usize)> {
        let mut entries: Vec<(&Tag, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.key().cmp(b.0.key())));
        entries
    }

    /// Tags grouped by category (fixed category order), alphabetical by
    /// key within each group. Empty categories are omitted.
    #[must_use]
    pub fn by_category(&self) -> Vec<(TagCategory, Vec<&Tag>)> {
        TagCategory::ALL
            .iter()
            .filter_map(|&cat| {
                let tags: Vec<&Tag> = self
                    .counts
                    .keys()
                    .filter(|t| t.category() == cat)
                    .collect();
                if tags.is_empty() {
                    None
                } else {
                    Some((cat, tags))
                }
            })
            .collect()
    }

    /// Tags whose count is at or below the threshold.
    #[must_use]
    pub fn at_most(&self, threshold: usize) -> Vec<(&Tag, usize)> {
        self.iter().filter(|(_, c)| *c <= threshold).collect()
    }

    /// Tags whose count is strictly above the threshold.
    #[must_use]
    pub fn above(&self, threshold: usize) -> Vec<(&Tag, usize)> {
        self.iter().filter(|(_, c)| *c > threshold).collect()
    }

    /// Unordered pairs of distinct tags whose normalized keys are within
    /// the similarity edit distance (candidate typos). Each pair appears
    /// once, in key order.
    #[must_use]
    pub fn similar_pairs(&self) -> Vec<(&Tag, &Tag)> {
        let tags: Vec<&Tag> = self.counts.keys().collect();
        let mut pairs = Vec::new();
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                if a.is_similar_to(b) {
                    pairs.push((*a, *b));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScenarioKind;

    fn tag(s: &str) -> Tag {
        Tag::of(s).unwrap()
    }

    fn fixture() -> Vec<Feature> {
        let mut feature = Feature::new("a.feature");
        feature.push_tag(tag("@API"));

        let mut s1 = Scenario::new("one", ScenarioKind::Scenario, 3);
        s1.push_tag(tag("@P1"));
        s1.push_tag(tag("@api")); // duplicate of inherited, counts once
        feature.push_scenario(s1);

        let mut s2 = Scenario::new("two", ScenarioKind::Scenario, 8);
        s2.push_tag(tag("@P2"));
        feature.push_scenario(s2);

        vec![feature]
    }

    #[test]
    fn test_counts_feature_and_scenario_mentions() {
        let concordance = TagConcordance::build(&fixture());
        // @API: 1 feature mention + 2 scenario mentions (inherited).
        assert_eq!(concordance.count(&tag("@api")), 3);
        assert_eq!(concordance.count(&tag("@P1")), 1);
        assert_eq!(concordance.count(&tag("@P2")), 1);
        assert_eq!(concordance.count(&tag("@absent")), 0);
    }

    #[test]
    fn test_by_frequency_orders_descending() {
        let concordance = TagConcordance::build(&fixture());
        let ranked = concordance.by_frequency();
        assert_eq!(ranked[0].0.key(), "api");
        assert_eq!(ranked[0].1, 3);
    }

    #[test]
    fn test_threshold_views() {
        let concordance = TagConcordance::build(&fixture());
        assert_eq!(concordance.at_most(1).len(), 2);
        assert_eq!(concordance.above(1).len(), 1);
    }

    #[test]
    fn test_similar_pairs() {
        let mut feature = Feature::new("b.feature");
        let mut s = Scenario::new("s", ScenarioKind::Scenario, 1);
        s.push_tag(tag("@Regression"));
        s.push_tag(tag("@Regressionn"));
        s.push_tag(tag("@Smoke"));
        feature.push_scenario(s);

        let concordance = TagConcordance::build(&[feature]);
        let pairs = concordance.similar_pairs();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.key(), "regression");
        assert_eq!(pairs[0].1.key(), "regressionn");
    }

    #[test]
    fn test_empty_corpus() {
        let concordance = TagConcordance::build(&[]);
        assert!(concordance.is_empty());
        assert!(concordance.similar_pairs().is_empty());
    }
}
