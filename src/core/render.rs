use crate::domain::model::{CitationRecord, CitationType, Person, PreferredCitation};
use crate::domain::ports::Renderer;
use crate::utils::error::{CffError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// APA lists at most this many authors before eliding the middle.
const APA_MAX_AUTHORS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Apa,
    Bibtex,
    Cff,
    Json,
}

impl OutputFormat {
    pub const ALL: &'static [OutputFormat] = &[
        OutputFormat::Apa,
        OutputFormat::Bibtex,
        OutputFormat::Cff,
        OutputFormat::Json,
    ];

    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            OutputFormat::Apa => Box::new(ApaRenderer),
            OutputFormat::Bibtex => Box::new(BibtexRenderer),
            OutputFormat::Cff => Box::new(CffRenderer),
            OutputFormat::Json => Box::new(JsonRenderer),
        }
    }

    pub fn render(&self, record: &CitationRecord) -> Result<String> {
        self.renderer().render(record)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.renderer().name())
    }
}

impl FromStr for OutputFormat {
    type Err = CffError;

    fn from_str(s: &str) -> Result<Self> {
        OutputFormat::ALL
            .iter()
            .copied()
            .find(|f| f.renderer().name() == s.to_ascii_lowercase())
            .ok_or_else(|| CffError::ConfigError {
                field: "render.format".to_string(),
                message: format!("unknown format '{}', expected one of apa, bibtex, cff, json", s),
            })
    }
}

pub struct ApaRenderer;

impl Renderer for ApaRenderer {
    fn name(&self) -> &'static str {
        "apa"
    }

    fn render(&self, record: &CitationRecord) -> Result<String> {
        let text = match record.preferred_citation() {
            Some(citation) => apa_reference(citation),
            None => apa_software(record),
        };
        Ok(text)
    }
}

fn apa_reference(citation: &PreferredCitation) -> String {
    let mut out = format!(
        "{} ({}). {}",
        apa_authors(citation.authors()),
        citation.year(),
        sentence(citation.title())
    );

    if let Some(journal) = citation.journal() {
        out.push(' ');
        out.push_str(journal.trim());
        if let Some(volume) = citation.volume() {
            out.push_str(&format!(", {}", volume));
            if let Some(number) = citation.number().or(citation.issue()) {
                out.push_str(&format!("({})", number));
            }
        }
        if let Some((start, end)) = citation.pages() {
            out.push_str(&format!(", {}-{}", start, end));
        }
        out.push('.');
    }

    out.push_str(&format!(" https://doi.org/{}", citation.doi()));
    out
}

fn apa_software(record: &CitationRecord) -> String {
    let year = record
        .release_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string());

    let mut out = format!("{} ({}). {}", apa_authors(record.authors()), year, record.title().trim());
    if let Some(version) = record.version() {
        out.push_str(&format!(" (Version {})", version.trim()));
    }
    out.push_str(" [Computer software].");

    let link = record
        .doi()
        .map(|doi| format!("https://doi.org/{}", doi))
        .or_else(|| record.repository_code().map(str::to_string))
        .or_else(|| record.url().map(str::to_string));
    if let Some(link) = link {
        out.push(' ');
        out.push_str(&link);
    }
    out
}

fn apa_author(person: &Person) -> String {
    let family = person.family_names().trim();
    let initials = person.initials();
    match (family.is_empty(), initials.is_empty()) {
        (true, _) => person.given_names().trim().to_string(),
        (false, true) => family.to_string(),
        (false, false) => format!("{}, {}", family, initials),
    }
}

fn apa_authors(people: &[Person]) -> String {
    let names: Vec<String> = people.iter().map(apa_author).collect();
    match names.len() {
        0 => String::new(),
        1 => names[0].clone(),
        n if n <= APA_MAX_AUTHORS => {
            format!("{}, & {}", names[..n - 1].join(", "), names[n - 1])
        }
        n => format!(
            "{}, . . . {}",
            names[..APA_MAX_AUTHORS - 1].join(", "),
            names[n - 1]
        ),
    }
}

/// Title with a closing full stop unless it already ends a sentence.
fn sentence(title: &str) -> String {
    let title = title.trim();
    if title.ends_with(['.', '?', '!']) {
        title.to_string()
    } else {
        format!("{}.", title)
    }
}

pub struct BibtexRenderer;

impl Renderer for BibtexRenderer {
    fn name(&self) -> &'static str {
        "bibtex"
    }

    fn render(&self, record: &CitationRecord) -> Result<String> {
        let (entry_type, key, fields) = match record.preferred_citation() {
            Some(citation) => bibtex_reference(citation),
            None => bibtex_software(record),
        };

        let body = fields
            .iter()
            .map(|(name, value)| format!("  {} = {{{}}}", name, value))
            .collect::<Vec<_>>()
            .join(",\n");
        Ok(format!("@{}{{{},\n{}\n}}\n", entry_type, key, body))
    }
}

type BibtexEntry = (&'static str, String, Vec<(&'static str, String)>);

fn bibtex_reference(citation: &PreferredCitation) -> BibtexEntry {
    let entry_type = match citation.citation_type() {
        CitationType::Article | CitationType::MagazineArticle | CitationType::NewspaperArticle => {
            "article"
        }
        CitationType::Book => "book",
        CitationType::ConferencePaper => "inproceedings",
        CitationType::Proceedings => "proceedings",
        CitationType::Report => "techreport",
        CitationType::Thesis => "phdthesis",
        CitationType::Manual => "manual",
        CitationType::Unpublished => "unpublished",
        _ => "misc",
    };

    let mut fields = vec![
        ("author", bibtex_authors(citation.authors())),
        ("title", format!("{{{}}}", bibtex_escape(citation.title().trim()))),
    ];
    if let Some(journal) = citation.journal() {
        fields.push(("journal", bibtex_escape(journal.trim())));
    }
    if let Some(volume) = citation.volume() {
        fields.push(("volume", volume.to_string()));
    }
    if let Some(number) = citation.number().or(citation.issue()) {
        fields.push(("number", number.to_string()));
    }
    if let Some((start, end)) = citation.pages() {
        fields.push(("pages", format!("{}--{}", start, end)));
    }
    fields.push(("year", citation.year().to_string()));
    if let Some(month) = citation.month() {
        fields.push(("month", month.to_string()));
    }
    fields.push(("doi", citation.doi().to_string()));
    if let Some(url) = citation.url() {
        fields.push(("url", url.to_string()));
    }

    let key = bibtex_key(citation.authors(), Some(citation.year() as i32));
    (entry_type, key, fields)
}

fn bibtex_software(record: &CitationRecord) -> BibtexEntry {
    let mut fields = vec![
        ("author", bibtex_authors(record.authors())),
        ("title", format!("{{{}}}", bibtex_escape(record.title().trim()))),
    ];
    if let Some(year) = record.release_year() {
        fields.push(("year", year.to_string()));
    }
    if let Some(version) = record.version() {
        fields.push(("note", format!("Version {}", bibtex_escape(version.trim()))));
    }
    if let Some(doi) = record.doi() {
        fields.push(("doi", doi.to_string()));
    }
    if let Some(url) = record.repository_code().or(record.url()) {
        fields.push(("url", url.to_string()));
    }

    let key = bibtex_key(record.authors(), record.release_year());
    ("misc", key, fields)
}

fn bibtex_authors(people: &[Person]) -> String {
    people
        .iter()
        .map(|p| {
            let family = bibtex_escape(p.family_names().trim());
            let given = bibtex_escape(p.given_names().trim());
            match (family.is_empty(), given.is_empty()) {
                (false, false) => format!("{}, {}", family, given),
                (false, true) => family,
                _ => given,
            }
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

/// `<first family name><year>`, lowercase ASCII only.
fn bibtex_key(people: &[Person], year: Option<i32>) -> String {
    let mut key: String = people
        .first()
        .map(|p| {
            let name = p.family_names().trim();
            if name.is_empty() { p.given_names() } else { name }
        })
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if key.is_empty() {
        key.push_str("anonymous");
    }
    if let Some(year) = year {
        key.push_str(&year.to_string());
    }
    key
}

fn bibtex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str(r"\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

pub struct CffRenderer;

impl Renderer for CffRenderer {
    fn name(&self) -> &'static str {
        "cff"
    }

    fn render(&self, record: &CitationRecord) -> Result<String> {
        record.to_yaml_string()
    }
}

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, record: &CitationRecord) -> Result<String> {
        let mut json = record.to_json_string()?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOFTWARE: &str = r#"
cff-version: 1.2.0
message: Cite the software
title: Tally
version: 2.1.0
date-released: 2023-05-04
repository-code: https://example.org/tally
authors:
  - given-names: Mary Ann
    family-names: O'Neil
  - given-names: Jean-Luc
    family-names: Martin
"#;

    fn software() -> CitationRecord {
        CitationRecord::from_yaml_str(SOFTWARE).unwrap()
    }

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
    fn test_output_format_from_str() {
        assert_eq!("BibTeX".parse::<OutputFormat>().unwrap(), OutputFormat::Bibtex);
        assert_eq!("cff".parse::<OutputFormat>().unwrap(), OutputFormat::Cff);
        let err = "ris".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err.field_path(), Some("render.format"));
    }

    #[test]
    fn test_apa_software_without_preferred_citation() {
        let text = OutputFormat::Apa.render(&software()).unwrap();
        assert_eq!(
            text,
            "O'Neil, M. A., & Martin, J.-L. (2023). Tally (Version 2.1.0) [Computer software]. https://example.org/tally"
        );
    }

    #[test]
    fn test_apa_author_list_elides_long_lists() {
        let people: Vec<Person> = (0..25).map(|i| person("A", &format!("N{}", i))).collect();
        let text = apa_authors(&people);
        assert!(text.starts_with("N0, A., N1, A."));
        assert!(text.contains("N18, A., . . . N24, A."));
        assert!(!text.contains("N19"));
    }

    #[test]
    fn test_bibtex_software_entry() {
        let text = OutputFormat::Bibtex.render(&software()).unwrap();
        assert!(text.starts_with("@misc{oneil2023,\n"));
        assert!(text.contains("  author = {O'Neil, Mary Ann and Martin, Jean-Luc}"));
        assert!(text.contains("  title = {{Tally}}"));
        assert!(text.contains("  note = {Version 2.1.0}"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_bibtex_escapes_special_characters() {
        assert_eq!(bibtex_escape("R&D 100% #1 a_b"), r"R\&D 100\% \#1 a\_b");
        assert_eq!(bibtex_key(&[person("Zoë", "Ñúñez ")], Some(1999)), "ez1999");
        assert_eq!(bibtex_key(&[], None), "anonymous");
    }

    #[test]
    fn test_bibtex_escapes_braces_and_backslash() {
        assert_eq!(bibtex_escape(r"Sets {a, b"), r"Sets \{a, b");
        assert_eq!(bibtex_escape(r"a\b}"), r"a\textbackslash{}b\}");

        let yaml = SOFTWARE.replace("title: Tally", "title: \"Sets {a, b\"");
        let record = CitationRecord::from_yaml_str(&yaml).unwrap();
        let text = OutputFormat::Bibtex.render(&record).unwrap();
        assert!(text.contains(r"  title = {{Sets \{a, b}}"));

        // 未跳脫的括號必須成對
        let unescaped = text.replace(r"\{", "").replace(r"\}", "");
        assert_eq!(unescaped.matches('{').count(), unescaped.matches('}').count());
    }

    #[test]
    fn test_sentence_keeps_existing_punctuation() {
        assert_eq!(sentence("Why?"), "Why?");
        assert_eq!(sentence("Done "), "Done.");
    }
}
