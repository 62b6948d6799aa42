// src/analysis/tag_quality.rs
//! Tag-hygiene detectors. Each detector is independently togglable via
//! configuration; disabling one never suppresses another. Warnings carry
//! stable kind names and message templates for downstream CI matching.

use crate::analysis::concordance::ConcordanceStats;
use crate::config::WarningConfig;
use crate::model::concordance::effective_tags;
use crate::model::{Feature, Scenario, Tag, TagCategory};
use crate::types::{Warning, WarningKind};

/// Runs every enabled tag-quality detector over the corpus.
#[must_use]
pub fn analyze(
    features: &[Feature],
    stats: &ConcordanceStats,
    config: &WarningConfig,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    for feature in features {
        check_feature_low_value(feature, config, &mut warnings);
        for scenario in feature.scenarios() {
            check_scenario(feature, scenario, config, &mut warnings);
        }
    }

    check_orphans(stats, config, &mut warnings);
    check_typos(stats, config, &mut warnings);

    warnings
}

fn check_scenario(
    feature: &Feature,
    scenario: &Scenario,
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    let effective = effective_tags(feature, scenario);

    check_missing_category(
        feature,
        scenario,
        &effective,
        WarningKind::MissingPriorityTag,
        TagCategory::Priority,
        &config.vocabulary.custom_priority_tags,
        config,
        warnings,
    );
    check_missing_category(
        feature,
        scenario,
        &effective,
        WarningKind::MissingTypeTag,
        TagCategory::Type,
        &config.vocabulary.custom_type_tags,
        config,
        warnings,
    );
    check_low_value(feature, scenario, config, warnings);
    check_duplicates(feature, scenario, config, warnings);
    check_excessive(feature, scenario, &effective, config, warnings);
}

#[allow(clippy::too_many_arguments)]
fn check_missing_category(
    feature: &Feature,
    scenario: &Scenario,
    effective: &[&Tag],
    kind: WarningKind,
    category: TagCategory,
    custom_markers: &[String],
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    if !config.is_enabled(kind) {
        return;
    }
    let has_category = effective.iter().any(|t| {
        t.category() == category || custom_markers.iter().any(|m| matches_tag(m, t))
    });
    if !has_category {
        let noun = match category {
            TagCategory::Priority => "priority",
            TagCategory::Type => "type",
            _ => "category",
        };
        warnings.push(
            Warning::scenario(
                kind,
                config.severity(kind),
                format!("Scenario '{}' has no {noun} tag", scenario.name()),
                feature.path().to_path_buf(),
                scenario.name().to_string(),
                scenario.line(),
            )
            .with_alternatives(config.alternatives(kind)),
        );
    }
}

/// Low-value tags on the scenario's own list, one warning per offender.
fn check_low_value(
    feature: &Feature,
    scenario: &Scenario,
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    let kind = WarningKind::LowValueTag;
    if !config.is_enabled(kind) {
        return;
    }
    for tag in scenario.tags() {
        if is_low_value(tag, config) {
            warnings.push(
                Warning::scenario(
                    kind,
                    config.severity(kind),
                    format!("Tag '{}' is too generic to aid discovery", tag.name()),
                    feature.path().to_path_buf(),
                    scenario.name().to_string(),
                    scenario.line(),
                )
                .with_alternatives(config.alternatives(kind)),
            );
        }
    }
}

/// Low-value tags on the feature itself, flagged once per feature.
fn check_feature_low_value(
    feature: &Feature,
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    let kind = WarningKind::LowValueTag;
    if !config.is_enabled(kind) {
        return;
    }
    for tag in feature.tags() {
        if is_low_value(tag, config) {
            warnings.push(
                Warning::feature(
                    kind,
                    config.severity(kind),
                    format!("Tag '{}' is too generic to aid discovery", tag.name()),
                    feature.path().to_path_buf(),
                )
                .with_alternatives(config.alternatives(kind)),
            );
        }
    }
}

fn check_duplicates(
    feature: &Feature,
    scenario: &Scenario,
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    let kind = WarningKind::DuplicateTag;
    if !config.is_enabled(kind) {
        return;
    }
    let mut seen: Vec<&str> = Vec::new();
    let mut reported: Vec<&str> = Vec::new();
    for tag in scenario.tags() {
        if seen.contains(&tag.key()) {
            if !reported.contains(&tag.key()) {
                reported.push(tag.key());
                warnings.push(Warning::scenario(
                    kind,
                    config.severity(kind),
                    format!(
                        "Tag '{}' appears more than once on scenario '{}'",
                        tag.name(),
                        scenario.name()
                    ),
                    feature.path().to_path_buf(),
                    scenario.name().to_string(),
                    scenario.line(),
                ));
            }
        } else {
            seen.push(tag.key());
        }
    }
}

fn check_excessive(
    feature: &Feature,
    scenario: &Scenario,
    effective: &[&Tag],
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    let kind = WarningKind::ExcessiveTags;
    if !config.is_enabled(kind) {
        return;
    }
    let count = effective.len();
    if count > config.thresholds.max_tags {
        warnings.push(Warning::scenario(
            kind,
            config.severity(kind),
            format!(
                "Scenario '{}' carries {count} tags (limit: {})",
                scenario.name(),
                config.thresholds.max_tags
            ),
            feature.path().to_path_buf(),
            scenario.name().to_string(),
            scenario.line(),
        ));
    }
}

/// Tags used exactly once across the whole corpus, flagged corpus-wide.
fn check_orphans(stats: &ConcordanceStats, config: &WarningConfig, warnings: &mut Vec<Warning>) {
    let kind = WarningKind::OrphanedTag;
    if !config.is_enabled(kind) {
        return;
    }
    for (tag, count) in stats.frequency.iter() {
        if count == 1 {
            warnings.push(Warning::corpus(
                kind,
                config.severity(kind),
                format!("Tag '{}' is used only once in the corpus", tag.name()),
            ));
        }
    }
}

/// Candidate typo pairs, each side flagged as a possible misspelling of
/// the other.
fn check_typos(stats: &ConcordanceStats, config: &WarningConfig, warnings: &mut Vec<Warning>) {
    let kind = WarningKind::TagTypo;
    if !config.is_enabled(kind) {
        return;
    }
    for (a, b) in stats.frequency.similar_pairs() {
        warnings.push(typo_warning(a, b, config));
        warnings.push(typo_warning(b, a, config));
    }
}

fn typo_warning(suspect: &Tag, of: &Tag, config: &WarningConfig) -> Warning {
    Warning::corpus(
        WarningKind::TagTypo,
        config.severity(WarningKind::TagTypo),
        format!(
            "Tag '{}' may be a misspelling of '{}'",
            suspect.name(),
            of.name()
        ),
    )
}

fn is_low_value(tag: &Tag, config: &WarningConfig) -> bool {
    config
        .vocabulary
        .low_value_tags
        .iter()
        .any(|m| matches_tag(m, tag))
}

/// Case-insensitive, sigil-tolerant comparison of a configured marker
/// against a tag.
fn matches_tag(marker: &str, tag: &Tag) -> bool {
    let normalized: String = marker
        .trim_start_matches('@')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    normalized == tag.key()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::concordance;
    use crate::model::ScenarioKind;

    fn tag(s: &str) -> Tag {
        Tag::of(s).unwrap()
    }

    fn corpus(scenario_tags: &[&[&str]]) -> Vec<Feature> {
        let mut feature = Feature::new("t.feature");
        for (i, tags) in scenario_tags.iter().enumerate() {
            let mut s = Scenario::new(format!("s{i}"), ScenarioKind::Scenario, i + 1);
            for t in *tags {
                s.push_tag(tag(t));
            }
            feature.push_scenario(s);
        }
        vec![feature]
    }

    fn run(features: &[Feature], config: &WarningConfig) -> Vec<Warning> {
        let stats = concordance::analyze(features);
        analyze(features, &stats, config)
    }

    fn kinds(warnings: &[Warning]) -> Vec<WarningKind> {
        warnings.iter().map(|w| w.kind).collect()
    }

    #[test]
    fn test_missing_priority_and_type() {
        let features = corpus(&[&["@checkout"]]);
        let warnings = run(&features, &WarningConfig::default());
        let kinds = kinds(&warnings);
        assert!(kinds.contains(&WarningKind::MissingPriorityTag));
        assert!(kinds.contains(&WarningKind::MissingTypeTag));
    }

    #[test]
    fn test_inherited_feature_tags_satisfy_categories() {
        let mut feature = Feature::new("t.feature");
        feature.push_tag(tag("@P1"));
        feature.push_tag(tag("@smoke"));
        let mut s = Scenario::new("s", ScenarioKind::Scenario, 1);
        s.push_tag(tag("@checkout"));
        feature.push_scenario(s);

        let warnings = run(&[feature], &WarningConfig::default());
        let kinds = kinds(&warnings);
        assert!(!kinds.contains(&WarningKind::MissingPriorityTag));
        assert!(!kinds.contains(&WarningKind::MissingTypeTag));
    }

    #[test]
    fn test_missing_priority_carries_alternatives() {
        let features = corpus(&[&["@smoke"]]);
        let warnings = run(&features, &WarningConfig::default());
        let warning = warnings
            .iter()
            .find(|w| w.kind == WarningKind::MissingPriorityTag)
            .unwrap();
        assert!(warning.alternatives.contains(&"@P1".to_string()));
    }

    #[test]
    fn test_low_value_tag_case_insensitive() {
        let features = corpus(&[&["@Test", "@P1", "@smoke"]]);
        let warnings = run(&features, &WarningConfig::default());
        let low: Vec<&Warning> = warnings
            .iter()
            .filter(|w| w.kind == WarningKind::LowValueTag)
            .collect();
        assert_eq!(low.len(), 1);
        assert!(low[0].message.contains("@Test"));
        assert!(!low[0].alternatives.is_empty());
    }

    #[test]
    fn test_duplicate_tag_reported_once() {
        let features = corpus(&[&["@api", "@API", "@Api"]]);
        let warnings = run(&features, &WarningConfig::default());
        let dups: Vec<&Warning> = warnings
            .iter()
            .filter(|w| w.kind == WarningKind::DuplicateTag)
            .collect();
        assert_eq!(dups.len(), 1);
    }

    #[test]
    fn test_excessive_tags() {
        let features = corpus(&[&["@a", "@b", "@c", "@d", "@e", "@f", "@g"]]);
        let warnings = run(&features, &WarningConfig::default());
        assert!(kinds(&warnings).contains(&WarningKind::ExcessiveTags));

        let features = corpus(&[&["@a", "@b", "@c"]]);
        let warnings = run(&features, &WarningConfig::default());
        assert!(!kinds(&warnings).contains(&WarningKind::ExcessiveTags));
    }

    #[test]
    fn test_orphaned_tag() {
        let features = corpus(&[&["@common"], &["@common"], &["@lonely"]]);
        let warnings = run(&features, &WarningConfig::default());
        let orphans: Vec<&Warning> = warnings
            .iter()
            .filter(|w| w.kind == WarningKind::OrphanedTag)
            .collect();
        assert_eq!(orphans.len(), 1);
        assert!(orphans[0].message.contains("@lonely"));
    }

    #[test]
    fn test_typos_flag_mutually() {
        let features = corpus(&[&["@Regression"], &["@Regressionn"], &["@Smoke"]]);
        let warnings = run(&features, &WarningConfig::default());
        let typos: Vec<&Warning> = warnings
            .iter()
            .filter(|w| w.kind == WarningKind::TagTypo)
            .collect();
        assert_eq!(typos.len(), 2);
        assert!(typos
            .iter()
            .any(|w| w.message.contains("'@Regressionn' may be a misspelling of '@Regression'")));
        assert!(typos
            .iter()
            .any(|w| w.message.contains("'@Regression' may be a misspelling of '@Regressionn'")));
        assert!(!typos.iter().any(|w| w.message.contains("@Smoke")));
    }

    #[test]
    fn test_disabling_one_detector_leaves_others() {
        let toml = r#"
            [warnings.missing-priority-tag]
            enabled = false
        "#;
        let config = WarningConfig::from_toml(toml).unwrap();
        let features = corpus(&[&["@checkout"]]);
        let warnings = run(&features, &config);
        let kinds = kinds(&warnings);
        assert!(!kinds.contains(&WarningKind::MissingPriorityTag));
        assert!(kinds.contains(&WarningKind::MissingTypeTag));
    }

    #[test]
    fn test_custom_priority_markers() {
        let toml = r#"
            [vocabulary]
            custom_priority_tags = ["blocker"]
        "#;
        let config = WarningConfig::from_toml(toml).unwrap();
        let features = corpus(&[&["@Blocker", "@smoke"]]);
        let warnings = run(&features, &config);
        assert!(!kinds(&warnings).contains(&WarningKind::MissingPriorityTag));
    }

    #[test]
    fn test_empty_corpus_yields_no_warnings() {
        let warnings = run(&[], &WarningConfig::default());
        assert!(warnings.is_empty());
    }
}
