use crate::domain::model::CitationRecord;
use crate::utils::error::Result;

/// Where citation text comes from.
pub trait CitationSource {
    fn read_to_string(&self, path: &str) -> Result<String>;
}

pub trait Renderer {
    /// Short name used on the command line and in config, e.g. `bibtex`.
    fn name(&self) -> &'static str;
    fn render(&self, record: &CitationRecord) -> Result<String>;
}
