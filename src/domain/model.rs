use serde::de::value::StrDeserializer;
use serde::de::{self, IntoDeserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated CFF document. Built once by the loader, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CitationRecord {
    pub(crate) cff_version: String,
    pub(crate) message: String,
    pub(crate) title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) date_released: Option<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub(crate) abstract_text: Option<String>,
    pub(crate) authors: Vec<Person>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) repository_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) license: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) keywords: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) preferred_citation: Option<PreferredCitation>,
}

impl CitationRecord {
    pub fn cff_version(&self) -> &str {
        &self.cff_version
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Version of the cited software, not of the CFF schema.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }

    pub fn date_released(&self) -> Option<&str> {
        self.date_released.as_deref()
    }

    pub fn abstract_text(&self) -> Option<&str> {
        self.abstract_text.as_deref()
    }

    pub fn authors(&self) -> &[Person] {
        &self.authors
    }

    pub fn repository_code(&self) -> Option<&str> {
        self.repository_code.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn preferred_citation(&self) -> Option<&PreferredCitation> {
        self.preferred_citation.as_ref()
    }

    /// Year of the released software, taken from `date-released`.
    pub fn release_year(&self) -> Option<i32> {
        self.date_released
            .as_deref()
            .and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| chrono::Datelike::year(&d))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Person {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) given_names: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) family_names: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) affiliation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) orcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) website: Option<String>,
}

impl Person {
    pub fn given_names(&self) -> &str {
        &self.given_names
    }

    pub fn family_names(&self) -> &str {
        &self.family_names
    }

    pub fn affiliation(&self) -> Option<&str> {
        self.affiliation.as_deref()
    }

    pub fn orcid(&self) -> Option<&str> {
        self.orcid.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    /// "Given Family", trimmed, for display.
    pub fn display_name(&self) -> String {
        [self.given_names.trim(), self.family_names.trim()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// "A." or "J.-L." style initials of the given names.
    pub fn initials(&self) -> String {
        self.given_names
            .split_whitespace()
            .map(|word| {
                word.split('-')
                    .filter_map(|part| part.chars().find(|c| c.is_alphanumeric()))
                    .map(|c| format!("{}.", c))
                    .collect::<Vec<_>>()
                    .join("-")
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PreferredCitation {
    #[serde(rename = "type")]
    pub(crate) citation_type: CitationType,
    pub(crate) authors: Vec<Person>,
    pub(crate) doi: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) journal: Option<String>,
    pub(crate) title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) volume: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) issue: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) month: Option<u32>,
    pub(crate) year: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) url: Option<String>,
}

impl PreferredCitation {
    pub fn citation_type(&self) -> CitationType {
        self.citation_type
    }

    pub fn authors(&self) -> &[Person] {
        &self.authors
    }

    pub fn doi(&self) -> &str {
        &self.doi
    }

    pub fn journal(&self) -> Option<&str> {
        self.journal.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn volume(&self) -> Option<u32> {
        self.volume
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn issue(&self) -> Option<u32> {
        self.issue
    }

    /// First and last page, when both are given.
    pub fn pages(&self) -> Option<(u32, u32)> {
        self.start.zip(self.end)
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// Reference types accepted by CFF 1.2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CitationType {
    Art,
    Article,
    Audiovisual,
    Bill,
    Blog,
    Book,
    Catalogue,
    Conference,
    ConferencePaper,
    Data,
    Database,
    Dictionary,
    EditedWork,
    Encyclopedia,
    FilmBroadcast,
    Generic,
    GovernmentDocument,
    Grant,
    Hearing,
    HistoricalWork,
    LegalCase,
    LegalRule,
    MagazineArticle,
    Manual,
    Map,
    Multimedia,
    Music,
    NewspaperArticle,
    Pamphlet,
    Patent,
    PersonalCommunication,
    Proceedings,
    Report,
    Serial,
    Slides,
    Software,
    SoftwareCode,
    SoftwareContainer,
    SoftwareExecutable,
    SoftwareVirtualMachine,
    SoundRecording,
    Standard,
    Statute,
    Thesis,
    Unpublished,
    Video,
    Website,
}

impl CitationType {
    pub fn is_software(&self) -> bool {
        matches!(
            self,
            CitationType::Software
                | CitationType::SoftwareCode
                | CitationType::SoftwareContainer
                | CitationType::SoftwareExecutable
                | CitationType::SoftwareVirtualMachine
        )
    }
}

// 名稱只由 serde 的 kebab-case 規則產生
impl fmt::Display for CitationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::String(name)) => f.write_str(&name),
            _ => Err(fmt::Error),
        }
    }
}

impl FromStr for CitationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let deserializer: StrDeserializer<'_, de::value::Error> = s.into_deserializer();
        CitationType::deserialize(deserializer)
            .map_err(|_| format!("unknown reference type '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(given: &str, family: &str) -> Person {
        Person {
            given_names: given.to_string(),
            family_names: family.to_string(),
            affiliation: None,
            orcid: None,
            email: None,
            website: None,
        }
    }

    #[test]
    fn test_citation_type_names_round_trip() {
        for name in ["article", "conference-paper", "software-virtual-machine", "website"] {
            let t: CitationType = name.parse().unwrap();
            assert_eq!(t.to_string(), name);
        }
        assert_eq!("edited-work".parse::<CitationType>(), Ok(CitationType::EditedWork));
        assert!("journal-article".parse::<CitationType>().is_err());
        assert!("Article".parse::<CitationType>().is_err());
        assert!(CitationType::SoftwareCode.is_software());
        assert!(!CitationType::Article.is_software());
    }

    #[test]
    fn test_citation_type_serializes_kebab_case() {
        let yaml = serde_yaml::to_string(&CitationType::ConferencePaper).unwrap();
        assert_eq!(yaml.trim(), "conference-paper");
    }

    #[test]
    fn test_person_display_trims_stray_whitespace() {
        let p = person("Qi", "Wang ");
        assert_eq!(p.display_name(), "Qi Wang");
        assert_eq!(p.to_string(), "Qi Wang");
        assert_eq!(person("", "Jain").display_name(), "Jain");
    }

    #[test]
    fn test_person_initials() {
        assert_eq!(person("Alexander", "Dunn").initials(), "A.");
        assert_eq!(person("Jean-Luc Marie", "Picard").initials(), "J.-L. M.");
        assert_eq!(person("Q.", "Wang").initials(), "Q.");
    }
}
