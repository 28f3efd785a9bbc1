use crate::utils::error::{CffError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// CFF schema versions this tool knows how to read.
pub const KNOWN_CFF_VERSIONS: &[&str] = &["1.0.1", "1.0.2", "1.0.3", "1.1.0", "1.2.0"];

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn doi_regex() -> &'static Regex {
    static DOI: OnceLock<Regex> = OnceLock::new();
    DOI.get_or_init(|| Regex::new(r"^10\.\d{4,9}(\.\d+)*/\S+$").expect("valid DOI regex"))
}

fn orcid_regex() -> &'static Regex {
    static ORCID: OnceLock<Regex> = OnceLock::new();
    ORCID.get_or_init(|| {
        Regex::new(r"^https://orcid\.org/(\d{4}-\d{4}-\d{4}-\d{3}[0-9X])$").expect("valid ORCID regex")
    })
}

fn spdx_regex() -> &'static Regex {
    static SPDX: OnceLock<Regex> = OnceLock::new();
    SPDX.get_or_init(|| Regex::new(r"^(LicenseRef-)?[A-Za-z0-9][A-Za-z0-9.+-]*$").expect("valid SPDX regex"))
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CffError::invalid_value(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CffError::invalid_value(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(CffError::invalid_value(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_doi(field_name: &str, doi: &str) -> Result<()> {
    if doi_regex().is_match(doi) {
        Ok(())
    } else {
        Err(CffError::invalid_value(
            field_name,
            doi,
            "DOI must look like 10.<registrant>/<suffix>",
        ))
    }
}

/// Checks the URL form and the ISO 7064 MOD 11-2 check character.
pub fn validate_orcid(field_name: &str, orcid: &str) -> Result<()> {
    let Some(caps) = orcid_regex().captures(orcid) else {
        return Err(CffError::invalid_value(
            field_name,
            orcid,
            "ORCID must look like https://orcid.org/0000-0000-0000-0000",
        ));
    };

    let id: Vec<char> = caps[1].chars().filter(|c| *c != '-').collect();
    let (body, check) = id.split_at(15);
    let expected = orcid_check_char(body);
    if check[0] != expected {
        return Err(CffError::invalid_value(
            field_name,
            orcid,
            format!("ORCID checksum mismatch, expected check character {}", expected),
        ));
    }
    Ok(())
}

fn orcid_check_char(digits: &[char]) -> char {
    let total = digits
        .iter()
        .filter_map(|c| c.to_digit(10))
        .fold(0u32, |acc, d| (acc + d) * 2);
    match (12 - total % 11) % 11 {
        10 => 'X',
        n => char::from_digit(n, 10).unwrap_or('0'),
    }
}

pub fn validate_cff_version(field_name: &str, version: &str) -> Result<()> {
    if KNOWN_CFF_VERSIONS.contains(&version) {
        return Ok(());
    }
    Err(CffError::invalid_value(
        field_name,
        version,
        format!(
            "Unknown CFF schema version. Known versions: {}",
            KNOWN_CFF_VERSIONS.join(", ")
        ),
    ))
}

pub fn validate_spdx_license(field_name: &str, license: &str) -> Result<()> {
    if spdx_regex().is_match(license) {
        Ok(())
    } else {
        Err(CffError::invalid_value(
            field_name,
            license,
            "License must be an SPDX identifier such as MIT or Apache-2.0",
        ))
    }
}

pub fn validate_iso_date(field_name: &str, date: &str) -> Result<()> {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|e| CffError::invalid_value(field_name, date, format!("Expected YYYY-MM-DD: {}", e)))
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CffError::ConfigError {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CffError::ConfigError {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value
        .as_ref()
        .ok_or_else(|| CffError::validation(field_name, "required field is missing"))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CffError::invalid_value(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_non_empty_list<T>(field_name: &str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(CffError::validation(field_name, "must contain at least one entry"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CffError::invalid_value(
            field_name,
            value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://matbench.materialsproject.org").is_ok());
        assert!(validate_url("url", "http://example.com").is_ok());
        assert!(validate_url("url", "").is_err());
        assert!(validate_url("url", "invalid-url").is_err());
        assert!(validate_url("url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_doi() {
        assert!(validate_doi("doi", "10.1038/s41524-020-00406-3").is_ok());
        assert!(validate_doi("doi", "10.5281/zenodo.1234567").is_ok());
        assert!(validate_doi("doi", "not-a-doi").is_err());
        assert!(validate_doi("doi", "10.12/short-registrant").is_err());
        assert!(validate_doi("doi", "10.1038/has space").is_err());
    }

    #[test]
    fn test_validate_orcid() {
        // Sample identifiers from the ORCID documentation.
        assert!(validate_orcid("orcid", "https://orcid.org/0000-0002-1825-0097").is_ok());
        assert!(validate_orcid("orcid", "https://orcid.org/0000-0002-1694-233X").is_ok());

        let err = validate_orcid("authors[0].orcid", "https://orcid.org/0000-0002-1825-0098").unwrap_err();
        assert_eq!(err.field_path(), Some("authors[0].orcid"));
        assert!(err.to_string().contains("checksum"));

        assert!(validate_orcid("orcid", "0000-0002-1825-0097").is_err());
        assert!(validate_orcid("orcid", "http://orcid.org/0000-0002-1825-0097").is_err());
    }

    #[test]
    fn test_validate_cff_version() {
        assert!(validate_cff_version("cff-version", "1.2.0").is_ok());
        assert!(validate_cff_version("cff-version", "1.1.0").is_ok());
        assert!(validate_cff_version("cff-version", "2.0.0").is_err());
    }

    #[test]
    fn test_validate_spdx_license() {
        assert!(validate_spdx_license("license", "MIT").is_ok());
        assert!(validate_spdx_license("license", "BSD-3-Clause").is_ok());
        assert!(validate_spdx_license("license", "GPL-2.0+").is_ok());
        assert!(validate_spdx_license("license", "MIT License").is_err());
    }

    #[test]
    fn test_validate_iso_date() {
        assert!(validate_iso_date("date-released", "2020-11-23").is_ok());
        assert!(validate_iso_date("date-released", "2020-13-01").is_err());
        assert!(validate_iso_date("date-released", "23/11/2020").is_err());
    }

    #[test]
    fn test_validate_range_and_lists() {
        assert!(validate_range("year", 2020, 1000, 9999).is_ok());
        assert!(validate_range("year", 20, 1000, 9999).is_err());
        assert!(validate_non_empty_list::<u8>("authors", &[]).is_err());
        assert!(validate_non_empty_string("title", "  ").is_err());
    }
}
