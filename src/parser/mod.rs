pub mod extract;
pub mod loader;
pub mod lookup;
pub mod markup;

use thiserror::Error;

use crate::record::CanonicalJobRecord;
use crate::source::PageSource;

/// Why a saved page contributed no record. Always recovered per file.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("empty or unreadable file: {0}")]
    EmptyOrUnreadable(String),
    #[error("no application/ld+json script tag")]
    NoMetadataBlock,
    #[error("malformed metadata: {0}")]
    MalformedMetadata(#[from] serde_json::Error),
    #[error("invalid posting: missing {0}")]
    InvalidPosting(&'static str),
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::EmptyOrUnreadable(_) => "empty_or_unreadable",
            SkipReason::NoMetadataBlock => "no_metadata_block",
            SkipReason::MalformedMetadata(_) => "malformed_metadata",
            SkipReason::InvalidPosting(_) => "invalid_posting",
        }
    }
}

/// Load → extract for one saved page.
pub fn process_file<S: PageSource + ?Sized>(
    source: &S,
    identifier: &str,
    role_code: &str,
) -> Result<CanonicalJobRecord, SkipReason> {
    let doc = loader::load(source, identifier)?;
    extract::extract(&doc, role_code)
}
