// src/analysis/concordance.rs
//! Corpus-wide tag statistics: frequency, co-occurrence, trend, and
//! significance. Pure and deterministic for a given feature ordering.
//!
//! Trend classification is intentionally order-dependent: the caller
//! must supply a stable, meaningful feature ordering (e.g. by last
//! modified time) for it to mean anything. The analyzer never re-sorts
//! its input.

use crate::model::concordance::effective_tags;
use crate::model::{Feature, Tag, TagConcordance};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Slopes above this magnitude classify as Rising/Declining.
const TREND_SLOPE_CUTOFF: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    Declining,
    Stable,
}

/// Co-occurrence of one unordered tag pair, `a` before `b` in key order.
#[derive(Debug, Clone, Serialize)]
pub struct CoOccurrence {
    pub a: Tag,
    pub b: Tag,
    /// Scenarios carrying both tags.
    pub count: usize,
    /// Jaccard coefficient: |both| / |either|.
    pub coefficient: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagTrend {
    pub tag: Tag,
    pub slope: f64,
    pub trend: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagSignificance {
    pub tag: Tag,
    /// Term-frequency / inverse-feature-frequency score, always >= 0.
    pub score: f64,
}

/// The complete statistics snapshot for one corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConcordanceStats {
    pub frequency: TagConcordance,
    /// Sorted by coefficient desc, then count desc, then pair name.
    pub cooccurrence: Vec<CoOccurrence>,
    pub trends: Vec<TagTrend>,
    /// Sorted by score descending.
    pub significance: Vec<TagSignificance>,
}

impl ConcordanceStats {
    /// Looks up the coefficient for a pair in either order.
    #[must_use]
    pub fn coefficient(&self, a: &Tag, b: &Tag) -> Option<f64> {
        self.cooccurrence
            .iter()
            .find(|c| (&c.a == a && &c.b == b) || (&c.a == b && &c.b == a))
            .map(|c| c.coefficient)
    }

    /// Looks up a tag's trend classification.
    #[must_use]
    pub fn trend(&self, tag: &Tag) -> Option<Trend> {
        self.trends.iter().find(|t| &t.tag == tag).map(|t| t.trend)
    }
}

/// Computes all statistics over the corpus. No side effects.
#[must_use]
pub fn analyze(features: &[Feature]) -> ConcordanceStats {
    let scenario_sets = collect_scenario_sets(features);

    ConcordanceStats {
        frequency: TagConcordance::build(features),
        cooccurrence: cooccurrence(&scenario_sets),
        trends: trends(features),
        significance: significance(features),
    }
}

/// One deduplicated effective tag set per scenario, corpus order.
fn collect_scenario_sets(features: &[Feature]) -> Vec<BTreeSet<Tag>> {
    let mut sets = Vec::new();
    for feature in features {
        for scenario in feature.scenarios() {
            sets.push(
                effective_tags(feature, scenario)
                    .into_iter()
                    .cloned()
                    .collect(),
            );
        }
    }
    sets
}

fn cooccurrence(scenario_sets: &[BTreeSet<Tag>]) -> Vec<CoOccurrence> {
    let mut with: BTreeMap<&Tag, usize> = BTreeMap::new();
    let mut both: BTreeMap<(&Tag, &Tag), usize> = BTreeMap::new();

    for set in scenario_sets {
        for tag in set {
            *with.entry(tag).or_insert(0) += 1;
        }
        let tags: Vec<&Tag> = set.iter().collect();
        for (i, &a) in tags.iter().enumerate() {
            for &b in &tags[i + 1..] {
                // BTreeSet iteration gives key order, so (a, b) is the
                // canonical pair ordering; symmetry holds by construction.
                *both.entry((a, b)).or_insert(0) += 1;
            }
        }
    }

    let mut out: Vec<CoOccurrence> = both
        .into_iter()
        .map(|((a, b), count)| {
            let either = with[a] + with[b] - count;
            #[allow(clippy::cast_precision_loss)]
            let coefficient = if either == 0 {
                0.0
            } else {
                count as f64 / either as f64
            };
            CoOccurrence {
                a: a.clone(),
                b: b.clone(),
                count,
                coefficient,
            }
        })
        .collect();

    out.sort_by(|x, y| {
        y.coefficient
            .partial_cmp(&x.coefficient)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| y.count.cmp(&x.count))
            .then_with(|| {
                format!("{}{}", x.a.name(), x.b.name()).cmp(&format!("{}{}", y.a.name(), y.b.name()))
            })
    });
    out
}

/// True if the tag appears anywhere on the feature: on the feature itself
/// or on any of its scenarios.
fn feature_carries(feature: &Feature, tag: &Tag) -> bool {
    feature.tags().contains(tag)
        || feature
            .scenarios()
            .iter()
            .any(|s| s.tags().contains(tag))
}

fn distinct_tags(features: &[Feature]) -> BTreeSet<Tag> {
    let mut tags = BTreeSet::new();
    for feature in features {
        tags.extend(feature.tags().iter().cloned());
        for scenario in feature.scenarios() {
            tags.extend(scenario.tags().iter().cloned());
        }
    }
    tags
}

fn trends(features: &[Feature]) -> Vec<TagTrend> {
    distinct_tags(features)
        .into_iter()
        .map(|tag| {
            let slope = incidence_slope(features, &tag);
            let trend = if slope > TREND_SLOPE_CUTOFF {
                Trend::Rising
            } else if slope < -TREND_SLOPE_CUTOFF {
                Trend::Declining
            } else {
                Trend::Stable
            };
            TagTrend { tag, slope, trend }
        })
        .collect()
}

/// Least-squares slope of per-feature 0/1 incidence over feature order.
/// Fewer than two features yields 0 (a slope is meaningless there).
fn incidence_slope(features: &[Feature], tag: &Tag) -> f64 {
    let n = features.len();
    if n < 2 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let points: Vec<(f64, f64)> = features
        .iter()
        .enumerate()
        .map(|(i, f)| (i as f64, f64::from(u8::from(feature_carries(f, tag)))))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let len = n as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / len;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / len;

    let numerator: f64 = points
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let denominator: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn significance(features: &[Feature]) -> Vec<TagSignificance> {
    let n = features.len();
    if n == 0 {
        return Vec::new();
    }
    let concordance = TagConcordance::build(features);

    #[allow(clippy::cast_precision_loss)]
    let feature_count = n as f64;

    let mut out: Vec<TagSignificance> = distinct_tags(features)
        .into_iter()
        .map(|tag| {
            let occurrences = concordance.count(&tag);
            let containing = features.iter().filter(|f| feature_carries(f, &tag)).count();
            #[allow(clippy::cast_precision_loss)]
            let score = (occurrences as f64 / feature_count)
                * (feature_count / (containing as f64 + 1.0)).ln();
            TagSignificance {
                tag,
                score: score.max(0.0),
            }
        })
        .collect();

    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.tag.key().cmp(b.tag.key()))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Scenario, ScenarioKind};

    fn tag(s: &str) -> Tag {
        Tag::of(s).unwrap()
    }

    fn feature_with(path: &str, scenario_tags: &[&[&str]]) -> Feature {
        let mut feature = Feature::new(path);
        for (i, tags) in scenario_tags.iter().enumerate() {
            let mut s = Scenario::new(format!("s{i}"), ScenarioKind::Scenario, i + 1);
            for t in *tags {
                s.push_tag(tag(t));
            }
            feature.push_scenario(s);
        }
        feature
    }

    #[test]
    fn test_cooccurrence_is_symmetric() {
        let features = vec![feature_with(
            "a.feature",
            &[&["@api", "@smoke"], &["@api"], &["@smoke", "@api"]],
        )];
        let stats = analyze(&features);
        let ab = stats.coefficient(&tag("@api"), &tag("@smoke"));
        let ba = stats.coefficient(&tag("@smoke"), &tag("@api"));
        assert_eq!(ab, ba);
        // both = 2, either = 3 (api) + 2 (smoke) - 2
        let coefficient = ab.unwrap();
        assert!((coefficient - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rising_and_declining_trends() {
        // @new appears only in later features, @old only in earlier ones.
        let features = vec![
            feature_with("1.feature", &[&["@old"]]),
            feature_with("2.feature", &[&["@old"]]),
            feature_with("3.feature", &[&["@new"]]),
            feature_with("4.feature", &[&["@new"]]),
        ];
        let stats = analyze(&features);
        assert_eq!(stats.trend(&tag("@new")), Some(Trend::Rising));
        assert_eq!(stats.trend(&tag("@old")), Some(Trend::Declining));
    }

    #[test]
    fn test_uniform_tag_is_stable() {
        let features = vec![
            feature_with("1.feature", &[&["@api"]]),
            feature_with("2.feature", &[&["@api"]]),
            feature_with("3.feature", &[&["@api"]]),
        ];
        let stats = analyze(&features);
        assert_eq!(stats.trend(&tag("@api")), Some(Trend::Stable));
    }

    #[test]
    fn test_significance_is_non_negative() {
        let features = vec![
            feature_with("1.feature", &[&["@everywhere"], &["@everywhere"]]),
            feature_with("2.feature", &[&["@everywhere", "@rare"]]),
        ];
        let stats = analyze(&features);
        for s in &stats.significance {
            assert!(s.score >= 0.0, "score for {} was {}", s.tag, s.score);
        }
    }

    #[test]
    fn test_empty_corpus_yields_empty_stats() {
        let stats = analyze(&[]);
        assert!(stats.frequency.is_empty());
        assert!(stats.cooccurrence.is_empty());
        assert!(stats.trends.is_empty());
        assert!(stats.significance.is_empty());
    }

    #[test]
    fn test_deterministic_given_same_order() {
        let features = vec![
            feature_with("1.feature", &[&["@a", "@b"], &["@b", "@c"]]),
            feature_with("2.feature", &[&["@a"]]),
        ];
        let first = analyze(&features);
        let second = analyze(&features);
        assert_eq!(first.cooccurrence.len(), second.cooccurrence.len());
        for (x, y) in first.cooccurrence.iter().zip(&second.cooccurrence) {
            assert_eq!(x.a, y.a);
            assert_eq!(x.b, y.b);
            assert_eq!(x.count, y.count);
        }
    }
}
