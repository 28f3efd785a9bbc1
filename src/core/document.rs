use crate::utils::error::{CffError, Result};
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use std::sync::OnceLock;

/// Path reported for errors that concern the whole document.
pub const DOCUMENT_PATH: &str = "<document>";

/// CFF document as written in the file, before any validation.
///
/// Every key is optional here so that a missing key becomes a validation
/// error with a field path instead of an opaque deserialization failure.
/// Keys not listed are accepted and dropped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawDocument {
    pub cff_version: Option<String>,
    pub message: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub doi: Option<String>,
    pub date_released: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub authors: Option<Vec<RawPerson>>,
    pub repository_code: Option<String>,
    pub url: Option<String>,
    pub license: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub preferred_citation: Option<RawCitation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawPerson {
    pub given_names: Option<String>,
    pub family_names: Option<String>,
    /// Only set on entity authors (organisations), which are rejected later.
    pub name: Option<String>,
    pub affiliation: Option<String>,
    pub orcid: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawCitation {
    #[serde(rename = "type")]
    pub citation_type: Option<String>,
    pub authors: Option<Vec<RawPerson>>,
    pub doi: Option<String>,
    pub journal: Option<String>,
    pub title: Option<String>,
    pub volume: Option<u32>,
    pub number: Option<u32>,
    pub issue: Option<u32>,
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<u32>,
    pub url: Option<String>,
}

/// Parse CFF text into a [`RawDocument`].
///
/// Syntax errors, a non-mapping top level and type mismatches all come back
/// as `ParseError`, with the field path and location when YAML reports them.
pub fn parse_document(content: &str) -> Result<RawDocument> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| parse_error(&e))?;

    match &value {
        Value::Mapping(_) => {}
        Value::Null => return Err(CffError::parse(DOCUMENT_PATH, "document is empty")),
        other => {
            return Err(CffError::parse(
                DOCUMENT_PATH,
                format!("expected a mapping at the top level, found {}", value_kind(other)),
            ))
        }
    }

    serde_yaml::from_str(content).map_err(|e| parse_error(&e))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn location_regex() -> &'static Regex {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    LOCATION.get_or_init(|| Regex::new(r" at line \d+ column \d+$").expect("valid location regex"))
}

fn path_regex() -> &'static Regex {
    static PATH: OnceLock<Regex> = OnceLock::new();
    PATH.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_-]+(?:\[\d+\])*(?:\.[A-Za-z0-9_-]+(?:\[\d+\])*)*): (.*)$")
            .expect("valid path regex")
    })
}

/// serde_yaml renders errors as `path: message at line L column C`;
/// split that back into its parts.
fn parse_error(err: &serde_yaml::Error) -> CffError {
    let rendered = err.to_string();
    let message = location_regex().replace(&rendered, "").into_owned();

    let (path, message) = match path_regex().captures(&message) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (DOCUMENT_PATH.to_string(), message.clone()),
    };

    let location = err.location();
    CffError::ParseError {
        path,
        message,
        line: location.as_ref().map(|l| l.line()),
        column: location.as_ref().map(|l| l.column()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse_document(
            r#"
cff-version: 1.2.0
message: Please cite
title: Example
authors:
  - given-names: Ada
    family-names: Lovelace
"#,
        )
        .unwrap();

        assert_eq!(doc.cff_version.as_deref(), Some("1.2.0"));
        let authors = doc.authors.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].family_names.as_deref(), Some("Lovelace"));
        assert!(doc.preferred_citation.is_none());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let doc = parse_document("cff-version: 1.2.0\nidentifiers: []\ncontact: []\n").unwrap();
        assert_eq!(doc.cff_version.as_deref(), Some("1.2.0"));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = parse_document("title: [unclosed\nauthors: x").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_non_mapping_document_is_parse_error() {
        let err = parse_document("- just\n- a list\n").unwrap_err();
        assert!(err.is_parse_error());
        assert_eq!(err.field_path(), Some(DOCUMENT_PATH));
        assert!(err.to_string().contains("a sequence"));

        let err = parse_document("plain scalar").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_type_mismatch_is_parse_error() {
        let err = parse_document(
            "cff-version: 1.2.0\npreferred-citation:\n  year: twenty-twenty\n",
        )
        .unwrap_err();
        assert!(err.is_parse_error());
        assert_ne!(err.exit_code(), 0);
    }
}
