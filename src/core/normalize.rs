use crate::core::document::{RawCitation, RawDocument, RawPerson};
use crate::utils::error::{CffError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with scalars that carry leading or trailing whitespace,
/// such as a family name written as `"Wang "`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum WhitespacePolicy {
    /// Keep the value verbatim and report a warning.
    #[default]
    Flag,
    /// Trim the value and report a warning.
    Trim,
    /// Fail validation at the offending field.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub field: String,
    pub value: String,
    pub message: String,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({:?})", self.field, self.message, self.value)
    }
}

/// Applies a [`WhitespacePolicy`] to every identifying scalar of a document.
///
/// Free-text fields (`message`, `abstract`) are skipped; YAML block scalars
/// legitimately end with a newline.
pub struct ScalarNormalizer {
    policy: WhitespacePolicy,
    warnings: Vec<LoadWarning>,
}

impl ScalarNormalizer {
    pub fn new(policy: WhitespacePolicy) -> Self {
        Self {
            policy,
            warnings: Vec::new(),
        }
    }

    pub fn normalize(mut self, doc: &mut RawDocument) -> Result<Vec<LoadWarning>> {
        self.visit_opt("cff-version", &mut doc.cff_version)?;
        self.visit_opt("title", &mut doc.title)?;
        self.visit_opt("version", &mut doc.version)?;
        self.visit_opt("doi", &mut doc.doi)?;
        self.visit_opt("date-released", &mut doc.date_released)?;
        if let Some(authors) = doc.authors.as_mut() {
            self.visit_people("authors", authors)?;
        }
        self.visit_opt("repository-code", &mut doc.repository_code)?;
        self.visit_opt("url", &mut doc.url)?;
        self.visit_opt("license", &mut doc.license)?;
        if let Some(keywords) = doc.keywords.as_mut() {
            for (i, keyword) in keywords.iter_mut().enumerate() {
                self.visit(&format!("keywords[{}]", i), keyword)?;
            }
        }
        if let Some(citation) = doc.preferred_citation.as_mut() {
            self.visit_citation("preferred-citation", citation)?;
        }
        Ok(self.warnings)
    }

    fn visit_citation(&mut self, prefix: &str, citation: &mut RawCitation) -> Result<()> {
        self.visit_opt(&format!("{}.type", prefix), &mut citation.citation_type)?;
        if let Some(authors) = citation.authors.as_mut() {
            self.visit_people(&format!("{}.authors", prefix), authors)?;
        }
        self.visit_opt(&format!("{}.doi", prefix), &mut citation.doi)?;
        self.visit_opt(&format!("{}.journal", prefix), &mut citation.journal)?;
        self.visit_opt(&format!("{}.title", prefix), &mut citation.title)?;
        self.visit_opt(&format!("{}.url", prefix), &mut citation.url)?;
        Ok(())
    }

    fn visit_people(&mut self, prefix: &str, people: &mut [RawPerson]) -> Result<()> {
        for (i, person) in people.iter_mut().enumerate() {
            let path = format!("{}[{}]", prefix, i);
            self.visit_opt(&format!("{}.given-names", path), &mut person.given_names)?;
            self.visit_opt(&format!("{}.family-names", path), &mut person.family_names)?;
            self.visit_opt(&format!("{}.name", path), &mut person.name)?;
            self.visit_opt(&format!("{}.affiliation", path), &mut person.affiliation)?;
            self.visit_opt(&format!("{}.orcid", path), &mut person.orcid)?;
            self.visit_opt(&format!("{}.email", path), &mut person.email)?;
            self.visit_opt(&format!("{}.website", path), &mut person.website)?;
        }
        Ok(())
    }

    fn visit_opt(&mut self, field: &str, value: &mut Option<String>) -> Result<()> {
        match value.as_mut() {
            Some(value) => self.visit(field, value),
            None => Ok(()),
        }
    }

    fn visit(&mut self, field: &str, value: &mut String) -> Result<()> {
        let leading = value.starts_with(char::is_whitespace);
        let trailing = value.ends_with(char::is_whitespace);
        // all-blank values are left for the required-field checks
        if !(leading || trailing) || value.trim().is_empty() {
            return Ok(());
        }

        let description = match (leading, trailing) {
            (true, true) => "leading and trailing whitespace",
            (true, false) => "leading whitespace",
            _ => "trailing whitespace",
        };

        match self.policy {
            WhitespacePolicy::Reject => {
                return Err(CffError::invalid_value(
                    field,
                    value.clone(),
                    format!("value has {}", description),
                ));
            }
            WhitespacePolicy::Flag => {
                tracing::debug!("{} has {}: {:?}", field, description, value);
                self.warnings.push(LoadWarning {
                    field: field.to_string(),
                    value: value.clone(),
                    message: format!("has {}", description),
                });
            }
            WhitespacePolicy::Trim => {
                tracing::debug!("Trimming {} from {}: {:?}", description, field, value);
                self.warnings.push(LoadWarning {
                    field: field.to_string(),
                    value: value.clone(),
                    message: format!("{} trimmed", description),
                });
                *value = value.trim().to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::parse_document;

    const DOC: &str = r#"
cff-version: 1.2.0
message: "Multi-line
  message "
title: " Padded title"
authors:
  - given-names: Qi
    family-names: "Wang "
"#;

    #[test]
    fn test_flag_keeps_values_and_warns() {
        let mut doc = parse_document(DOC).unwrap();
        let warnings = ScalarNormalizer::new(WhitespacePolicy::Flag)
            .normalize(&mut doc)
            .unwrap();

        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].field, "title");
        assert_eq!(warnings[0].message, "has leading whitespace");
        assert_eq!(warnings[1].field, "authors[0].family-names");
        assert_eq!(warnings[1].value, "Wang ");
        assert_eq!(doc.authors.unwrap()[0].family_names.as_deref(), Some("Wang "));
    }

    #[test]
    fn test_trim_rewrites_values() {
        let mut doc = parse_document(DOC).unwrap();
        let warnings = ScalarNormalizer::new(WhitespacePolicy::Trim)
            .normalize(&mut doc)
            .unwrap();

        assert_eq!(warnings.len(), 2);
        assert_eq!(doc.title.as_deref(), Some("Padded title"));
        assert_eq!(doc.authors.unwrap()[0].family_names.as_deref(), Some("Wang"));
    }

    #[test]
    fn test_reject_fails_at_first_field() {
        let mut doc = parse_document(DOC).unwrap();
        let err = ScalarNormalizer::new(WhitespacePolicy::Reject)
            .normalize(&mut doc)
            .unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(err.field_path(), Some("title"));
    }

    #[test]
    fn test_message_is_not_checked() {
        let mut doc = parse_document("message: |\n  Cite us.\n").unwrap();
        let warnings = ScalarNormalizer::new(WhitespacePolicy::Reject)
            .normalize(&mut doc)
            .unwrap();
        assert!(warnings.is_empty());
    }
}
