pub mod builder;
pub mod document;
pub mod loader;
pub mod normalize;
pub mod render;

pub use crate::domain::model::{CitationRecord, CitationType, Person, PreferredCitation};
pub use crate::domain::ports::{CitationSource, Renderer};
pub use crate::utils::error::Result;
