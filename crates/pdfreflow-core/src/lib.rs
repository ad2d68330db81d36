//! pdfreflow-core: Backend-independent layout reconstruction.
//!
//! This crate provides the geometric types (BBox, Word, Ruling, Edge) and the
//! algorithms that turn positioned words into reading-order text and
//! normalized tables: column segmentation, line assembly, lattice and stream
//! table detection, candidate scoring and deduplication, and cross-page table
//! merging. It performs no I/O.

pub mod columns;
pub mod detect;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod merge;
pub mod quality;
pub mod table;
pub mod text;
pub mod words;

pub use columns::{ColumnBand, ColumnOptions, segment_columns, words_outside_tables};
pub use detect::{
    PageGeometry, Strategy, TableCandidate, detect_lattice, detect_stream, extract_candidates,
};
pub use edges::{Edge, EdgeSource, Ruling, derive_edges};
pub use error::{DetectError, ExtractResult, ExtractWarning, PageError, WarningCode};
pub use geometry::{BBox, Orientation, Point, cluster_by_gap};
pub use layout::{LineOptions, TextLine, assemble_lines, page_text};
pub use merge::{
    CellValue, LogicalTable, MergeMode, TableMerger, TableSegment, coerce_cell, merge_decision,
    merge_tables,
};
pub use quality::{ColumnKind, column_kinds, rank_candidates, score_cells};
pub use table::{TableFinder, TableSettings};
pub use text::{UnicodeNorm, headers_equal, normalize_cell_text, normalize_words};
pub use words::Word;
