// src/parser/dialect.rs
//! Dialect detection: a second pass over the raw content that annotates
//! a parsed feature with capability flags. The base parse tree is never
//! altered here; every flag lands in the feature's metadata map.

use crate::model::Feature;
use regex::Regex;
use std::sync::LazyLock;

/// Metadata keys written by this pass.
pub const KEY_DIALECT: &str = "dialect";
pub const KEY_BULLET_STEPS: &str = "hasBulletSteps";
pub const KEY_REQUEST_STEPS: &str = "hasRequestSteps";
pub const KEY_SCHEMA_ASSERTIONS: &str = "hasSchemaAssertions";
pub const KEY_EMBEDDED_DATA: &str = "hasEmbeddedData";

/// Closed list of schema-placeholder tokens.
const SCHEMA_PLACEHOLDERS: &[&str] = &[
    "any-string",
    "any-number",
    "any-boolean",
    "any-uuid",
    "any-timestamp",
];

static HTTP_METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\b").unwrap_or_else(|_| panic!("Invalid Regex"))
});

static STATUS_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bstatus(?:\s+code)?\s+[1-5]\d{2}\b").unwrap_or_else(|_| panic!("Invalid Regex"))
});

static URL_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["'\s](/[A-Za-z0-9_\-{}]+)+/?["'\s]"#).unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Scans raw content for dialect markers and records capability flags on
/// the feature. Finding nothing leaves the metadata untouched, so the
/// absence of the `dialect` key means plain base syntax.
pub fn annotate(feature: &mut Feature, content: &str) {
    let mut bullet = false;
    let mut request = false;
    let mut schema = false;
    let mut embedded = false;

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        bullet = bullet || line.starts_with("* ");
        embedded = embedded
            || line.starts_with("\"\"\"")
            || line.starts_with('{')
            || line.starts_with('[');
        request = request
            || HTTP_METHOD_RE.is_match(line)
            || STATUS_CODE_RE.is_match(line)
            || URL_PATH_RE.is_match(line);
        schema = schema || SCHEMA_PLACEHOLDERS.iter().any(|p| line.contains(p));
    }

    if !(bullet || request || schema || embedded) {
        return;
    }

    feature.insert_metadata(KEY_DIALECT, "true");
    if bullet {
        feature.insert_metadata(KEY_BULLET_STEPS, "true");
    }
    if request {
        feature.insert_metadata(KEY_REQUEST_STEPS, "true");
    }
    if schema {
        feature.insert_metadata(KEY_SCHEMA_ASSERTIONS, "true");
    }
    if embedded {
        feature.insert_metadata(KEY_EMBEDDED_DATA, "true");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use std::path::PathBuf;

    fn annotated(content: &str) -> Feature {
        let mut feature = Parser::new().parse(&PathBuf::from("t.feature"), content);
        annotate(&mut feature, content);
        feature
    }

    #[test]
    fn test_plain_feature_gets_no_flags() {
        let feature = annotated("Feature: F\nScenario: S\nGiven a user\nThen it works\n");
        assert!(feature.metadata().is_empty());
        assert!(!feature.has_capability(KEY_DIALECT));
    }

    #[test]
    fn test_bullet_steps_detected() {
        let feature = annotated("Scenario: S\n* the service is running\n");
        assert!(feature.has_capability(KEY_DIALECT));
        assert!(feature.has_capability(KEY_BULLET_STEPS));
        assert!(!feature.has_capability(KEY_REQUEST_STEPS));
    }

    #[test]
    fn test_request_vocabulary_detected() {
        let feature =
            annotated("Scenario: S\nWhen I send a GET request to \"/orders/{id}\"\nThen the response has status 200\n");
        assert!(feature.has_capability(KEY_REQUEST_STEPS));
    }

    #[test]
    fn test_schema_placeholders_detected() {
        let feature = annotated("Scenario: S\nThen the body field \"id\" is any-uuid\n");
        assert!(feature.has_capability(KEY_SCHEMA_ASSERTIONS));
    }

    #[test]
    fn test_embedded_data_detected() {
        let content = "Scenario: S\nGiven the payload\n\"\"\"\n{ \"name\": \"x\" }\n\"\"\"\n";
        let feature = annotated(content);
        assert!(feature.has_capability(KEY_EMBEDDED_DATA));
    }

    #[test]
    fn test_base_tree_is_unchanged() {
        let content = "Scenario: S\n* a bullet step\n";
        let plain = Parser::new().parse(&PathBuf::from("t.feature"), content);
        let flagged = annotated(content);
        assert_eq!(plain.scenarios()[0].steps(), flagged.scenarios()[0].steps());
    }
}
