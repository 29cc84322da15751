//! Text & Link Extractor — turns uploaded PDF bytes into one text blob.
//!
//! Flow: decode → per-page text (skip failing pages) → per-page link
//! annotations (skip failing annotations) → URL scan over the text →
//! de-duplicated link section appended → trim.
//!
//! Only a decode failure or an empty result is fatal. Everything else is
//! logged and skipped.

pub mod links;
pub mod pdf;

#[cfg(test)]
pub(crate) mod fixtures;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::links::{append_links_section, scan_text_urls, LinkSet};
use crate::extraction::pdf::PdfDocument;

/// Fatal extraction outcomes, surfaced to the caller as a client error.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not decode PDF: {0}")]
    DecodeFailed(String),

    #[error("no text could be extracted from the PDF")]
    EmptyText,
}

impl ExtractionError {
    /// Stable machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            ExtractionError::DecodeFailed(_) => "decode_failed",
            ExtractionError::EmptyText => "empty_text",
        }
    }
}

/// A single page whose text could not be read. Recovered locally.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("page {page}: {message}")]
    Text { page: usize, message: String },

    #[error("page {page}: text extractor panicked")]
    Panicked { page: usize },
}

/// A single annotation (or a page's annotation list) that could not be read.
/// Recovered locally.
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("page {page}: annotation list unreadable: {message}")]
    List { page: usize, message: String },

    #[error("page {page}: annotation {index} unreadable: {message}")]
    Entry {
        page: usize,
        index: usize,
        message: String,
    },
}

/// The decoded-page view the extractor needs. Implemented by [`PdfDocument`]
/// for real uploads and by in-memory fakes in tests.
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Plain text of one page (0-based index).
    fn page_text(&self, index: usize) -> Result<String, PageError>;

    /// Target URIs of the page's link annotations. One entry per annotation
    /// that was inspected; non-link annotations are not reported.
    fn page_link_uris(&self, index: usize) -> Vec<Result<String, AnnotationError>>;
}

/// Decodes PDF bytes and extracts the text blob. Blocking; call from
/// `spawn_blocking` inside async code.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document = PdfDocument::load(bytes)?;
    extract_from_source(&document)
}

/// Runs the per-page extraction loop over any [`PageSource`].
pub fn extract_from_source(source: &dyn PageSource) -> Result<String, ExtractionError> {
    let page_count = source.page_count();
    let mut blob = String::new();
    let mut links = LinkSet::default();
    let mut skipped_pages = 0usize;
    let mut skipped_annotations = 0usize;

    for index in 0..page_count {
        match source.page_text(index) {
            Ok(text) => {
                blob.push_str(&text);
                blob.push('\n');
            }
            Err(e) => {
                skipped_pages += 1;
                warn!("Skipping page text: {e}");
            }
        }

        for uri in source.page_link_uris(index) {
            match uri {
                Ok(uri) => links.insert(uri),
                Err(e) => {
                    skipped_annotations += 1;
                    debug!("Skipping annotation: {e}");
                }
            }
        }
    }

    for url in scan_text_urls(&blob) {
        links.insert(url);
    }

    info!(
        "Extracted {} page(s) ({} skipped), {} unique link(s), {} annotation(s) skipped",
        page_count - skipped_pages,
        skipped_pages,
        links.len(),
        skipped_annotations
    );

    append_links_section(&mut blob, &links);

    let trimmed = blob.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    Ok(trimmed.to_string())
}
