use crate::adapters::storage::FileSource;
use crate::core::builder::{into_record, validate_document};
use crate::core::document::parse_document;
use crate::core::normalize::{LoadWarning, ScalarNormalizer, WhitespacePolicy};
use crate::domain::model::CitationRecord;
use crate::domain::ports::CitationSource;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub whitespace: WhitespacePolicy,
    pub require_preferred_citation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub record: CitationRecord,
    pub warnings: Vec<LoadWarning>,
}

/// Parse, normalize and validate CFF text in one pass.
#[derive(Debug, Clone, Default)]
pub struct CitationLoader {
    options: LoadOptions,
}

impl CitationLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn load_str(&self, content: &str) -> Result<LoadReport> {
        tracing::debug!("Parsing {} bytes of CFF", content.len());
        let mut doc = parse_document(content)?;

        tracing::debug!("Normalizing scalars (policy: {:?})", self.options.whitespace);
        let warnings = ScalarNormalizer::new(self.options.whitespace).normalize(&mut doc)?;

        tracing::debug!("Validating document");
        validate_document(&doc, self.options.require_preferred_citation)?;

        let record = into_record(doc);
        tracing::debug!(
            "Loaded '{}' with {} author(s), {} warning(s)",
            record.title(),
            record.authors().len(),
            warnings.len()
        );

        Ok(LoadReport { record, warnings })
    }

    pub fn load_from<S: CitationSource>(&self, source: &S, path: &str) -> Result<LoadReport> {
        tracing::info!("Loading citation metadata from {}", path);
        let content = source.read_to_string(path)?;
        self.load_str(&content)
    }

    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport> {
        let path = path.as_ref().to_string_lossy();
        self.load_from(&FileSource::default(), &path)
    }
}

impl CitationRecord {
    /// Load with default options, discarding warnings.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        CitationLoader::default().load_str(content).map(|report| report.record)
    }

    /// Canonical CFF serialization; loading it again yields an equal record.
    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
