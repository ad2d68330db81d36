//! pdfreflow: Reconstruct reading-order text and tables from decoded PDF pages.
//!
//! This is the public API facade crate. It re-exports the algorithm types
//! from pdfreflow-core and adds the page and document drivers.
//!
//! # Architecture
//!
//! - **pdfreflow-core**: Backend-independent geometry and layout algorithms
//! - **pdfreflow** (this crate): Page input model, per-page extraction,
//!   page-parallel document runs, cross-page table merging and metadata
//!
//! Decoding the PDF itself (glyphs, words, ruling lines, images) is left to
//! a parsing library; [`Page`] is the boundary where its output comes in.

mod document;
mod metadata;
mod options;
mod page;
mod result;

pub use document::{Document, DocumentResult, extract_document, extract_page_guarded};
pub use metadata::{DocumentMetadata, PageStats, TableSummary, table_label, table_summaries};
pub use options::ReflowOptions;
pub use page::Page;
pub use result::PageExtractionResult;

pub use pdfreflow_core;
pub use pdfreflow_core::{
    BBox, CellValue, ColumnOptions, ExtractWarning, LineOptions, LogicalTable, MergeMode,
    PageError, Ruling, Strategy, TableCandidate, TableSettings, UnicodeNorm, WarningCode, Word,
};
