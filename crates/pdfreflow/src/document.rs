//! Whole-document extraction.
//!
//! Pages are independent: each one is segmented, assembled and scanned for
//! tables on its own, concurrently when the `parallel` feature is enabled.
//! Results are put back into page order and only then folded through the
//! sequential table merger.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use pdfreflow_core::{ExtractWarning, LogicalTable, PageError, merge_tables};

use crate::metadata::{DocumentMetadata, TableSummary, table_summaries};
use crate::options::ReflowOptions;
use crate::page::Page;
use crate::result::PageExtractionResult;

/// A decoded document: an optional source name and its pages.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    #[cfg_attr(feature = "serde", serde(default))]
    pub filename: Option<String>,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            filename: None,
            pages,
        }
    }

    /// Set the source file name reported in metadata (builder style).
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Returns the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Extract every page and merge tables across pages.
    pub fn extract(&self, options: &ReflowOptions) -> DocumentResult {
        extract_document(self, options)
    }
}

/// Everything extracted from a document.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentResult {
    /// Per-page results in page order.
    pub pages: Vec<PageExtractionResult>,
    /// Logical tables in document order.
    pub tables: Vec<LogicalTable>,
    pub metadata: DocumentMetadata,
}

impl DocumentResult {
    /// Plain-text rendering: a `=== PAGE {n} ===` banner before each page.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(&format!("=== PAGE {} ===\n{}\n\n", page.page_number, page.text));
        }
        out
    }

    /// Summary records for every merged table segment.
    pub fn table_summaries(&self) -> Vec<TableSummary> {
        table_summaries(&self.tables)
    }

    /// All warnings, in page order.
    pub fn warnings(&self) -> impl Iterator<Item = &ExtractWarning> {
        self.pages.iter().flat_map(|p| p.warnings.iter())
    }
}

/// Extract every page of `document` and merge tables across pages.
///
/// A page that panics is recorded as failed; the remaining pages are
/// unaffected.
pub fn extract_document(document: &Document, options: &ReflowOptions) -> DocumentResult {
    let mut pages = extract_pages(&document.pages, options);
    pages.sort_by_key(|p| p.page_number);

    let tables = merge_tables(pages.iter().map(|p| (p.page_number, p.tables.as_slice())));
    tracing::debug!(
        pages = pages.len(),
        logical_tables = tables.len(),
        "document extracted"
    );
    let metadata = DocumentMetadata::from_pages(document.filename.clone(), &pages);

    DocumentResult {
        pages,
        tables,
        metadata,
    }
}

fn extract_pages(pages: &[Page], options: &ReflowOptions) -> Vec<PageExtractionResult> {
    #[cfg(feature = "parallel")]
    if options.parallel {
        use rayon::prelude::*;

        return pages
            .par_iter()
            .map(|page| extract_page_guarded(page, options))
            .collect();
    }

    pages
        .iter()
        .map(|page| extract_page_guarded(page, options))
        .collect()
}

/// Run [`Page::extract`], turning a panic into a failed page.
pub fn extract_page_guarded(page: &Page, options: &ReflowOptions) -> PageExtractionResult {
    match panic::catch_unwind(AssertUnwindSafe(|| page.extract(options))) {
        Ok(result) => result,
        Err(payload) => {
            let err = PageError::Panicked(panic_message(payload.as_ref()));
            tracing::error!(page = page.page_number(), error = %err, "page failed");
            PageExtractionResult::failed(page.page_number(), page.image_count(), err)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
