// src/analysis/antipattern.rs
//! Structural and lexical anti-pattern detectors for scenario steps.
//!
//! Everything here is heuristic by design: pattern and wordlist matching
//! over step text, not language understanding. False positives and
//! negatives are accepted; each detector can be disabled independently.

use crate::config::WarningConfig;
use crate::model::{Feature, Scenario, ScenarioKind};
use crate::types::{Warning, WarningKind};

/// The primary step categories of the given/when/then contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepCategory {
    Given,
    When,
    Then,
}

/// Splits a step into its keyword and remaining text.
fn split_step(step: &str) -> (&str, &str) {
    for keyword in ["Given", "When", "Then", "And", "But"] {
        if let Some(rest) = step.strip_prefix(keyword) {
            if rest.starts_with(char::is_whitespace) {
                return (keyword, rest.trim_start());
            }
        }
    }
    if let Some(rest) = step.strip_prefix("* ") {
        return ("*", rest.trim_start());
    }
    ("", step)
}

/// Resolves each step to a primary category. And/But (and bullet steps)
/// inherit the category of the nearest preceding primary keyword; a
/// leading conjunction resolves to nothing.
fn resolve_categories(steps: &[String]) -> Vec<Option<StepCategory>> {
    let mut current = None;
    steps
        .iter()
        .map(|step| {
            match split_step(step).0 {
                "Given" => current = Some(StepCategory::Given),
                "When" => current = Some(StepCategory::When),
                "Then" => current = Some(StepCategory::Then),
                _ => {} // And/But/bullet inherit
            }
            current
        })
        .collect()
}

/// Runs every enabled anti-pattern detector over the corpus.
#[must_use]
pub fn analyze(features: &[Feature], config: &WarningConfig) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for feature in features {
        for scenario in feature.scenarios() {
            check_scenario(feature, scenario, config, &mut warnings);
        }
    }
    warnings
}

fn check_scenario(
    feature: &Feature,
    scenario: &Scenario,
    config: &WarningConfig,
    warnings: &mut Vec<Warning>,
) {
    let mut emit = |kind: WarningKind, message: String| {
        if config.is_enabled(kind) {
            warnings.push(Warning::scenario(
                kind,
                config.severity(kind),
                message,
                feature.path().to_path_buf(),
                scenario.name().to_string(),
                scenario.line(),
            ));
        }
    };

    check_length_limits(scenario, config, &mut emit);
    check_step_contract(scenario, &mut emit);
    check_vocabulary(scenario, config, &mut emit);
    check_examples(scenario, config, &mut emit);
    check_prose(scenario, config, &mut emit);
}

fn check_length_limits(
    scenario: &Scenario,
    config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    let steps = scenario.steps().len();
    if steps > config.thresholds.max_steps {
        emit(
            WarningKind::LongScenario,
            format!(
                "Scenario '{}' has {steps} steps (limit: {})",
                scenario.name(),
                config.thresholds.max_steps
            ),
        );
    }

    if scenario.name().chars().count() > config.thresholds.max_name_length {
        emit(
            WarningKind::LongScenarioName,
            format!(
                "Scenario name exceeds {} characters",
                config.thresholds.max_name_length
            ),
        );
    }

    for step in scenario.steps() {
        if step.chars().count() > config.thresholds.max_step_length {
            emit(
                WarningKind::LongStepText,
                format!(
                    "Step exceeds {} characters: '{}...'",
                    config.thresholds.max_step_length,
                    truncate(step, 40)
                ),
            );
        }
    }
}

/// Given/when/then presence and ordering. Backgrounds and rules sit
/// outside the contract, as do scenarios with no steps at all.
fn check_step_contract(scenario: &Scenario, emit: &mut impl FnMut(WarningKind, String)) {
    if matches!(
        scenario.kind(),
        ScenarioKind::Background | ScenarioKind::Rule
    ) || scenario.steps().is_empty()
    {
        return;
    }

    let categories = resolve_categories(scenario.steps());

    for (kind, category, noun) in [
        (WarningKind::MissingGiven, StepCategory::Given, "Given"),
        (WarningKind::MissingWhen, StepCategory::When, "When"),
        (WarningKind::MissingThen, StepCategory::Then, "Then"),
    ] {
        if !categories.contains(&Some(category)) {
            emit(
                kind,
                format!("Scenario '{}' has no {noun} step", scenario.name()),
            );
        }
    }

    // A Then followed later by a When breaks precondition/action/assertion
    // ordering.
    let mut seen_then = false;
    for category in &categories {
        match category {
            Some(StepCategory::Then) => seen_then = true,
            Some(StepCategory::When) if seen_then => {
                emit(
                    WarningKind::IncorrectStepOrder,
                    format!(
                        "Scenario '{}' has a When step after a Then step",
                        scenario.name()
                    ),
                );
                break;
            }
            _ => {}
        }
    }
}

fn check_vocabulary(
    scenario: &Scenario,
    config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    for step in scenario.steps() {
        let lower = step.to_lowercase();
        if let Some(verb) = first_match(&lower, &config.vocabulary.ui_verbs) {
            emit(
                WarningKind::UiFocusedStep,
                format!("Step uses UI language ('{verb}'): '{}'", truncate(step, 60)),
            );
        }
        if let Some(noun) = first_match(&lower, &config.vocabulary.implementation_nouns) {
            emit(
                WarningKind::ImplementationDetailStep,
                format!(
                    "Step leaks implementation detail ('{noun}'): '{}'",
                    truncate(step, 60)
                ),
            );
        }
    }
}

fn check_examples(
    scenario: &Scenario,
    config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    if scenario.kind() != ScenarioKind::Outline {
        return;
    }

    if scenario.examples().is_empty() {
        emit(
            WarningKind::MissingExamples,
            format!("Outline '{}' has no Examples table", scenario.name()),
        );
        return;
    }

    for example in scenario.examples() {
        if example.row_count() < config.thresholds.min_example_rows {
            emit(
                WarningKind::TooFewExamples,
                format!(
                    "Outline '{}' has an Examples table with {} rows (minimum: {})",
                    scenario.name(),
                    example.row_count(),
                    config.thresholds.min_example_rows
                ),
            );
        }
    }
}

fn check_prose(
    scenario: &Scenario,
    config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    check_pronouns(scenario, config, emit);
    check_tense(scenario, config, emit);
    check_conjunctions(scenario, config, emit);
}

/// Words that may legitimately precede a pronoun without naming a noun.
const NON_NOUN_WORDS: &[&str] = &[
    "the", "a", "an", "i", "to", "of", "in", "on", "at", "for", "with", "is", "are", "was",
    "were", "be", "been", "do", "does", "not", "no", "and", "but", "then", "when", "if",
];

/// Flags bare pronouns with no candidate noun earlier in the same step.
fn check_pronouns(
    scenario: &Scenario,
    config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    for step in scenario.steps() {
        let (_, text) = split_step(step);
        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .collect();

        for (i, word) in words.iter().enumerate() {
            if !config.vocabulary.pronouns.iter().any(|p| p == word) {
                continue;
            }
            let has_noun_before = words[..i]
                .iter()
                .any(|w| !w.is_empty() && !NON_NOUN_WORDS.contains(&w.as_str()));
            if !has_noun_before {
                emit(
                    WarningKind::AmbiguousPronoun,
                    format!(
                        "Step refers to '{word}' without a preceding noun: '{}'",
                        truncate(step, 60)
                    ),
                );
                break;
            }
        }
    }
}

/// Flags past-tense steps inside an otherwise present-tense scenario.
/// Suffix/wordlist matching only; not grammatical parsing.
fn check_tense(
    scenario: &Scenario,
    config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    let past: Vec<bool> = scenario
        .steps()
        .iter()
        .map(|s| is_past_tense(s, config))
        .collect();
    let past_count = past.iter().filter(|p| **p).count();
    let present_count = past.len() - past_count;

    // Only flag the minority voice; a uniformly past-tense scenario is a
    // style choice, not an inconsistency.
    if past_count == 0 || past_count >= present_count {
        return;
    }

    for (step, is_past) in scenario.steps().iter().zip(&past) {
        if *is_past {
            emit(
                WarningKind::InconsistentTense,
                format!(
                    "Step uses past tense where surrounding steps use present: '{}'",
                    truncate(step, 60)
                ),
            );
        }
    }
}

fn is_past_tense(step: &str, config: &WarningConfig) -> bool {
    let (_, text) = split_step(step);
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .any(|w| config.vocabulary.past_tense_verbs.iter().any(|v| *v == w))
}

/// Minimum words on each side of a conjunction before the step is deemed
/// to join two independent clauses.
const CONJUNCTION_CLAUSE_WORDS: usize = 3;

fn check_conjunctions(
    scenario: &Scenario,
    _config: &WarningConfig,
    emit: &mut impl FnMut(WarningKind, String),
) {
    for step in scenario.steps() {
        let (_, text) = split_step(step);
        let lower = text.to_lowercase();
        for conjunction in [" and ", " but "] {
            if let Some(pos) = lower.find(conjunction) {
                let before = lower[..pos].split_whitespace().count();
                let after = lower[pos + conjunction.len()..].split_whitespace().count();
                if before >= CONJUNCTION_CLAUSE_WORDS && after >= CONJUNCTION_CLAUSE_WORDS {
                    emit(
                        WarningKind::ConjunctionInStep,
                        format!(
                            "Step joins two clauses with '{}'; consider splitting: '{}'",
                            conjunction.trim(),
                            truncate(step, 60)
                        ),
                    );
                    break;
                }
            }
        }
    }
}

fn first_match<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .find(|n| haystack.contains(n.as_str()))
        .map(String::as_str)
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_with_steps(steps: &[&str]) -> Vec<Feature> {
        let mut feature = Feature::new("t.feature");
        let mut s = Scenario::new("s", ScenarioKind::Scenario, 1);
        for step in steps {
            s.push_step(*step);
        }
        feature.push_scenario(s);
        vec![feature]
    }

    fn kinds_of(features: &[Feature]) -> Vec<WarningKind> {
        analyze(features, &WarningConfig::default())
            .into_iter()
            .map(|w| w.kind)
            .collect()
    }

    #[test]
    fn test_long_scenario_fires_above_limit_only() {
        let steps: Vec<String> = (0..11).map(|i| format!("Given step {i}")).collect();
        let refs: Vec<&str> = steps.iter().map(String::as_str).collect();
        assert!(kinds_of(&scenario_with_steps(&refs)).contains(&WarningKind::LongScenario));

        let short: Vec<&str> = refs[..10].to_vec();
        assert!(!kinds_of(&scenario_with_steps(&short)).contains(&WarningKind::LongScenario));
    }

    #[test]
    fn test_missing_when_and_then() {
        let kinds = kinds_of(&scenario_with_steps(&["Given a cart"]));
        assert!(kinds.contains(&WarningKind::MissingWhen));
        assert!(kinds.contains(&WarningKind::MissingThen));
        assert!(!kinds.contains(&WarningKind::MissingGiven));
    }

    #[test]
    fn test_and_inherits_preceding_category() {
        let kinds = kinds_of(&scenario_with_steps(&[
            "Given a cart",
            "When I check out",
            "And the payment succeeds",
            "Then I get a receipt",
        ]));
        assert!(!kinds.contains(&WarningKind::MissingWhen));
        assert!(!kinds.contains(&WarningKind::MissingThen));
        assert!(!kinds.contains(&WarningKind::IncorrectStepOrder));
    }

    #[test]
    fn test_incorrect_step_order() {
        let kinds = kinds_of(&scenario_with_steps(&[
            "Given a cart",
            "Then it is empty",
            "When I add an item",
        ]));
        assert!(kinds.contains(&WarningKind::IncorrectStepOrder));
    }

    #[test]
    fn test_ui_and_implementation_vocabulary() {
        let kinds = kinds_of(&scenario_with_steps(&[
            "When I click the submit control",
            "Then the database table orders has one row",
        ]));
        assert!(kinds.contains(&WarningKind::UiFocusedStep));
        assert!(kinds.contains(&WarningKind::ImplementationDetailStep));
    }

    #[test]
    fn test_outline_examples_checks() {
        let mut feature = Feature::new("t.feature");
        let bare = Scenario::new("no-examples", ScenarioKind::Outline, 1);
        feature.push_scenario(bare);

        let mut thin = Scenario::new("thin", ScenarioKind::Outline, 5);
        let mut example = crate::model::Example::new("");
        example.set_headers(vec!["a".into()]);
        example.push_row(vec!["1".into()]);
        thin.push_example(example);
        feature.push_scenario(thin);

        let warnings = analyze(&[feature], &WarningConfig::default());
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::MissingExamples));
        assert!(kinds.contains(&WarningKind::TooFewExamples));
    }

    #[test]
    fn test_plain_scenario_skips_example_checks() {
        let kinds = kinds_of(&scenario_with_steps(&["Given x", "When y", "Then z"]));
        assert!(!kinds.contains(&WarningKind::MissingExamples));
        assert!(!kinds.contains(&WarningKind::TooFewExamples));
    }

    #[test]
    fn test_ambiguous_pronoun() {
        let kinds = kinds_of(&scenario_with_steps(&["Then it should work"]));
        assert!(kinds.contains(&WarningKind::AmbiguousPronoun));

        let kinds = kinds_of(&scenario_with_steps(&["Then the receipt shows that it worked"]));
        assert!(!kinds.contains(&WarningKind::AmbiguousPronoun));
    }

    #[test]
    fn test_inconsistent_tense() {
        let kinds = kinds_of(&scenario_with_steps(&[
            "Given the user clicked the link",
            "When I open the page",
            "Then I see the dashboard",
        ]));
        assert!(kinds.contains(&WarningKind::InconsistentTense));

        // Uniform present tense is clean.
        let kinds = kinds_of(&scenario_with_steps(&[
            "Given a user",
            "When I open the page",
            "Then I see the dashboard",
        ]));
        assert!(!kinds.contains(&WarningKind::InconsistentTense));
    }

    #[test]
    fn test_conjunction_in_step() {
        let kinds = kinds_of(&scenario_with_steps(&[
            "When I add an item to the cart and the system sends a confirmation email",
        ]));
        assert!(kinds.contains(&WarningKind::ConjunctionInStep));

        // Short phrases joined by "and" are not two clauses.
        let kinds = kinds_of(&scenario_with_steps(&["Given bread and butter on the table"]));
        assert!(!kinds.contains(&WarningKind::ConjunctionInStep));
    }

    #[test]
    fn test_long_name_and_step_text() {
        let long_name = "x".repeat(100);
        let mut feature = Feature::new("t.feature");
        let mut s = Scenario::new(long_name, ScenarioKind::Scenario, 1);
        s.push_step(format!("Given {}", "y".repeat(130)));
        feature.push_scenario(s);

        let warnings = analyze(&[feature], &WarningConfig::default());
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::LongScenarioName));
        assert!(kinds.contains(&WarningKind::LongStepText));
    }

    #[test]
    fn test_background_is_outside_step_contract() {
        let mut feature = Feature::new("t.feature");
        let mut bg = Scenario::new("", ScenarioKind::Background, 1);
        bg.push_step("Given a database");
        feature.push_scenario(bg);

        let warnings = analyze(&[feature], &WarningConfig::default());
        let kinds: Vec<WarningKind> = warnings.iter().map(|w| w.kind).collect();
        assert!(!kinds.contains(&WarningKind::MissingWhen));
        assert!(!kinds.contains(&WarningKind::MissingThen));
    }

    #[test]
    fn test_detectors_can_be_disabled_independently() {
        let toml = r#"
            [warnings.missing-then]
            enabled = false
        "#;
        let config = WarningConfig::from_toml(toml).unwrap();
        let features = scenario_with_steps(&["Given a cart"]);
        let kinds: Vec<WarningKind> = analyze(&features, &config)
            .into_iter()
            .map(|w| w.kind)
            .collect();
        assert!(!kinds.contains(&WarningKind::MissingThen));
        assert!(kinds.contains(&WarningKind::MissingWhen));
    }
}
