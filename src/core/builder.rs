use crate::core::document::{RawCitation, RawDocument, RawPerson};
use crate::domain::model::{CitationRecord, CitationType, Person, PreferredCitation};
use crate::utils::error::{CffError, Result};
use crate::utils::validation::{
    validate_cff_version, validate_doi, validate_iso_date, validate_non_empty_list,
    validate_non_empty_string, validate_orcid, validate_range, validate_required_field,
    validate_spdx_license, validate_url,
};

/// Checks every invariant of a CFF document and fails at the first
/// offending field.
///
/// Format checks run on the trimmed value. Surrounding whitespace is the
/// normalizer's concern, so a padded DOI under `flag` is a warning, not an
/// invalid DOI.
pub fn validate_document(doc: &RawDocument, require_preferred_citation: bool) -> Result<()> {
    let cff_version = validate_required_field("cff-version", &doc.cff_version)?;
    validate_cff_version("cff-version", cff_version.trim())?;

    let message = validate_required_field("message", &doc.message)?;
    validate_non_empty_string("message", message)?;

    let title = validate_required_field("title", &doc.title)?;
    validate_non_empty_string("title", title)?;

    let authors = validate_required_field("authors", &doc.authors)?;
    validate_people("authors", authors)?;

    if let Some(url) = &doc.repository_code {
        validate_url("repository-code", url.trim())?;
    }
    if let Some(url) = &doc.url {
        validate_url("url", url.trim())?;
    }
    if let Some(license) = &doc.license {
        validate_spdx_license("license", license.trim())?;
    }
    if let Some(doi) = &doc.doi {
        validate_doi("doi", doi.trim())?;
    }
    if let Some(date) = &doc.date_released {
        validate_iso_date("date-released", date.trim())?;
    }
    if let Some(keywords) = &doc.keywords {
        for (i, keyword) in keywords.iter().enumerate() {
            validate_non_empty_string(&format!("keywords[{}]", i), keyword)?;
        }
    }

    match &doc.preferred_citation {
        Some(citation) => validate_citation("preferred-citation", citation)?,
        None if require_preferred_citation => {
            return Err(CffError::validation(
                "preferred-citation",
                "required field is missing",
            ))
        }
        None => {}
    }

    Ok(())
}

fn validate_people(prefix: &str, people: &[RawPerson]) -> Result<()> {
    validate_non_empty_list(prefix, people)?;
    for (i, person) in people.iter().enumerate() {
        validate_person(&format!("{}[{}]", prefix, i), person)?;
    }
    Ok(())
}

fn validate_person(path: &str, person: &RawPerson) -> Result<()> {
    let has_name = [&person.given_names, &person.family_names]
        .iter()
        .any(|part| part.as_deref().is_some_and(|s| !s.trim().is_empty()));

    if !has_name {
        let reason = if person.name.is_some() {
            "entity authors are not supported, use given-names and family-names"
        } else {
            "person needs given-names or family-names"
        };
        return Err(CffError::validation(path, reason));
    }

    if let Some(orcid) = &person.orcid {
        validate_orcid(&format!("{}.orcid", path), orcid.trim())?;
    }
    if let Some(website) = &person.website {
        validate_url(&format!("{}.website", path), website.trim())?;
    }
    if let Some(email) = &person.email {
        if !is_email(email.trim()) {
            return Err(CffError::invalid_value(
                format!("{}.email", path),
                email.clone(),
                "not an email address",
            ));
        }
    }
    Ok(())
}

fn is_email(email: &str) -> bool {
    email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && domain.split('.').all(|l| !l.is_empty())
    })
}

fn validate_citation(prefix: &str, citation: &RawCitation) -> Result<()> {
    let field = |name: &str| format!("{}.{}", prefix, name);

    let type_name = validate_required_field(&field("type"), &citation.citation_type)?;
    let citation_type: CitationType = type_name
        .trim()
        .parse()
        .map_err(|reason: String| CffError::invalid_value(field("type"), type_name.clone(), reason))?;

    let authors = validate_required_field(&field("authors"), &citation.authors)?;
    validate_people(&field("authors"), authors)?;

    let doi = validate_required_field(&field("doi"), &citation.doi)?;
    validate_doi(&field("doi"), doi.trim())?;

    let title = validate_required_field(&field("title"), &citation.title)?;
    validate_non_empty_string(&field("title"), title)?;

    let year = validate_required_field(&field("year"), &citation.year)?;
    validate_range(&field("year"), *year, 1000, 9999)?;

    if citation_type == CitationType::Article {
        let journal = validate_required_field(&field("journal"), &citation.journal)?;
        validate_non_empty_string(&field("journal"), journal)?;
    }

    if let Some(month) = citation.month {
        validate_range(&field("month"), month, 1, 12)?;
    }
    if let (Some(start), Some(end)) = (citation.start, citation.end) {
        if end < start {
            return Err(CffError::invalid_value(
                field("end"),
                end.to_string(),
                format!("last page is before first page {}", start),
            ));
        }
    }
    if let Some(url) = &citation.url {
        validate_url(&field("url"), url.trim())?;
    }
    Ok(())
}

/// Converts a document that already passed [`validate_document`].
pub fn into_record(doc: RawDocument) -> CitationRecord {
    CitationRecord {
        cff_version: doc.cff_version.unwrap_or_default(),
        message: doc.message.unwrap_or_default(),
        title: doc.title.unwrap_or_default(),
        version: doc.version,
        doi: doc.doi,
        date_released: doc.date_released,
        abstract_text: doc.abstract_text,
        authors: into_people(doc.authors),
        repository_code: doc.repository_code,
        url: doc.url,
        license: doc.license,
        keywords: doc.keywords.unwrap_or_default(),
        preferred_citation: doc.preferred_citation.map(into_citation),
    }
}

fn into_people(people: Option<Vec<RawPerson>>) -> Vec<Person> {
    people
        .unwrap_or_default()
        .into_iter()
        .map(|p| Person {
            given_names: p.given_names.unwrap_or_default(),
            family_names: p.family_names.unwrap_or_default(),
            affiliation: p.affiliation,
            orcid: p.orcid,
            email: p.email,
            website: p.website,
        })
        .collect()
}

fn into_citation(citation: RawCitation) -> PreferredCitation {
    let citation_type = citation
        .citation_type
        .as_deref()
        .and_then(|t| t.trim().parse().ok())
        .unwrap_or(CitationType::Generic);

    PreferredCitation {
        citation_type,
        authors: into_people(citation.authors),
        doi: citation.doi.unwrap_or_default(),
        journal: citation.journal,
        title: citation.title.unwrap_or_default(),
        volume: citation.volume,
        number: citation.number,
        issue: citation.issue,
        start: citation.start,
        end: citation.end,
        month: citation.month,
        year: citation.year.unwrap_or_default(),
        url: citation.url,
    }
}
