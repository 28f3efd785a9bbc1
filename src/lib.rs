pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::FileSource;
pub use crate::config::ProjectConfig;
pub use crate::core::loader::{CitationLoader, LoadOptions, LoadReport};
pub use crate::core::normalize::{LoadWarning, WhitespacePolicy};
pub use crate::core::render::OutputFormat;
pub use crate::domain::model::{CitationRecord, CitationType, Person, PreferredCitation};
pub use crate::utils::error::{CffError, Result};
