//! `lopdf`-backed [`PageSource`].
//!
//! Page text comes from `pdf-extract` when it can render the whole document
//! (it handles font encodings better); otherwise each page is read on its own
//! with `lopdf`'s extractor so one broken page only costs that page. Both
//! libraries can panic on malformed input, so every call is unwind-guarded.

use std::panic::{self, AssertUnwindSafe};

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::extraction::{AnnotationError, ExtractionError, PageError, PageSource};

pub struct PdfDocument {
    inner: Document,
    /// (1-based page number, page object id) in page order.
    pages: Vec<(u32, ObjectId)>,
    /// Per-page text from `pdf-extract`, when it succeeded for every page.
    rendered: Option<Vec<String>>,
}

impl PdfDocument {
    pub fn load(bytes: &[u8]) -> Result<Self, ExtractionError> {
        let loaded = panic::catch_unwind(AssertUnwindSafe(|| Document::load_mem(bytes)));
        let inner = match loaded {
            Ok(Ok(doc)) => doc,
            Ok(Err(e)) => return Err(ExtractionError::DecodeFailed(e.to_string())),
            Err(_) => {
                return Err(ExtractionError::DecodeFailed(
                    "decoder panicked (malformed document)".to_string(),
                ))
            }
        };

        let pages: Vec<(u32, ObjectId)> = inner.get_pages().into_iter().collect();
        let rendered = render_pages(bytes).filter(|texts| texts.len() == pages.len());
        debug!(
            "Decoded PDF: {} page(s), pdf-extract text {}",
            pages.len(),
            if rendered.is_some() { "available" } else { "unavailable" }
        );

        Ok(Self {
            inner,
            pages,
            rendered,
        })
    }

    fn page_dict(&self, index: usize) -> Result<&Dictionary, AnnotationError> {
        let (number, id) = self.pages[index];
        self.inner
            .get_object(id)
            .and_then(Object::as_dict)
            .map_err(|e| AnnotationError::List {
                page: number as usize,
                message: format!("page dictionary unreadable: {e}"),
            })
    }

    /// Follows one level of indirection; direct objects pass through.
    fn resolve<'a>(&'a self, object: &'a Object) -> Result<&'a Object, lopdf::Error> {
        match object {
            Object::Reference(id) => self.inner.get_object(*id),
            other => Ok(other),
        }
    }

    fn link_uri(&self, annotation: &Object) -> Result<Option<String>, String> {
        let dict = self
            .resolve(annotation)
            .and_then(Object::as_dict)
            .map_err(|e| e.to_string())?;

        match dict.get(b"Subtype") {
            Ok(Object::Name(name)) if name.as_slice() == b"Link" => {}
            _ => return Ok(None),
        }

        let action = match dict.get(b"A") {
            Ok(action) => self
                .resolve(action)
                .and_then(Object::as_dict)
                .map_err(|e| format!("/A unreadable: {e}"))?,
            // Internal links carry /Dest instead of an action.
            Err(_) => return Ok(None),
        };

        match action.get(b"URI") {
            Ok(uri) => match self.resolve(uri).map_err(|e| e.to_string())? {
                Object::String(bytes, _) => Ok(Some(decode_pdf_string(bytes))),
                _ => Err("/URI is not a string".to_string()),
            },
            Err(_) => Ok(None),
        }
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, PageError> {
        if let Some(texts) = &self.rendered {
            return Ok(texts[index].clone());
        }

        let (number, _) = self.pages[index];
        let page = number as usize;
        match panic::catch_unwind(AssertUnwindSafe(|| self.inner.extract_text(&[number]))) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(PageError::Text {
                page,
                message: e.to_string(),
            }),
            Err(_) => Err(PageError::Panicked { page }),
        }
    }

    fn page_link_uris(&self, index: usize) -> Vec<Result<String, AnnotationError>> {
        let page = self.pages[index].0 as usize;
        let page_dict = match self.page_dict(index) {
            Ok(dict) => dict,
            Err(e) => return vec![Err(e)],
        };

        let annots = match page_dict.get(b"Annots") {
            Ok(annots) => annots,
            Err(_) => return Vec::new(),
        };
        let annots = match self.resolve(annots).and_then(Object::as_array) {
            Ok(array) => array,
            Err(e) => {
                return vec![Err(AnnotationError::List {
                    page,
                    message: e.to_string(),
                })]
            }
        };

        annots
            .iter()
            .enumerate()
            .filter_map(|(i, annotation)| match self.link_uri(annotation) {
                Ok(Some(uri)) => Some(Ok(uri)),
                Ok(None) => None,
                Err(message) => Some(Err(AnnotationError::Entry {
                    page,
                    index: i,
                    message,
                })),
            })
            .collect()
    }
}

/// Whole-document text from `pdf-extract`, one string per page.
fn render_pages(bytes: &[u8]) -> Option<Vec<String>> {
    match panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => Some(pages),
        Ok(Err(e)) => {
            debug!("pdf-extract failed, using per-page lopdf text: {e}");
            None
        }
        Err(_) => {
            debug!("pdf-extract panicked, using per-page lopdf text");
            None
        }
    }
}

/// PDF text strings are either UTF-16BE with a byte-order mark or a
/// single-byte encoding; URIs are ASCII in practice.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    String::from_utf8_lossy(bytes).into_owned()
}
