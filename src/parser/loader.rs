use scraper::Html;

use super::SkipReason;
use crate::source::PageSource;

/// Parsed markup of one saved page.
pub struct RawDocument {
    html: Html,
}

impl RawDocument {
    pub fn parse(markup: &str) -> Self {
        RawDocument {
            html: Html::parse_document(markup),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Read and parse a saved page. Missing, undecodable and blank files
/// come back as `EmptyOrUnreadable` rather than an error.
pub fn load<S: PageSource + ?Sized>(source: &S, identifier: &str) -> Result<RawDocument, SkipReason> {
    let bytes = source
        .read(identifier)
        .map_err(|e| SkipReason::EmptyOrUnreadable(format!("{identifier}: {e}")))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| SkipReason::EmptyOrUnreadable(format!("{identifier}: {e}")))?;

    if text.trim().is_empty() {
        return Err(SkipReason::EmptyOrUnreadable(format!("{identifier}: file is empty")));
    }

    Ok(RawDocument::parse(&text))
}
