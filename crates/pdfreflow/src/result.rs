//! Per-page extraction results.

use pdfreflow_core::{ExtractWarning, PageError, TableCandidate};

/// Fewer words than this on a page without tables marks it as likely scanned.
const SCANNED_WORD_THRESHOLD: usize = 5;

/// Text and ranked tables extracted from one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageExtractionResult {
    /// Page number (1-based).
    pub page_number: usize,
    /// Body text in reading order, table regions excluded.
    pub text: String,
    /// Surviving table candidates, best first.
    pub tables: Vec<TableCandidate>,
    /// Number of words on the page.
    pub word_count: usize,
    /// The page probably is a raster scan without a text layer.
    pub likely_scanned: bool,
    /// Number of embedded images reported by the decoder.
    pub image_count: usize,
    /// Recoverable problems met on this page.
    pub warnings: Vec<ExtractWarning>,
    /// Set when the page itself failed and was recorded empty.
    pub error: Option<String>,
}

impl PageExtractionResult {
    pub fn new(
        page_number: usize,
        text: String,
        tables: Vec<TableCandidate>,
        word_count: usize,
        image_count: usize,
        warnings: Vec<ExtractWarning>,
    ) -> Self {
        let likely_scanned = word_count < SCANNED_WORD_THRESHOLD && tables.is_empty();
        Self {
            page_number,
            text,
            tables,
            word_count,
            likely_scanned,
            image_count,
            warnings,
            error: None,
        }
    }

    /// Empty result for a page that could not be processed.
    ///
    /// A failed page is never reported as likely scanned.
    pub fn failed(page_number: usize, image_count: usize, err: PageError) -> Self {
        Self {
            page_number,
            text: String::new(),
            tables: Vec::new(),
            word_count: 0,
            likely_scanned: false,
            image_count,
            warnings: vec![ExtractWarning::page_failure(page_number, &err)],
            error: Some(err.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
