//! Document metadata and table summary records for downstream writers.

use pdfreflow_core::{BBox, LogicalTable, MergeMode, Strategy};

use crate::result::PageExtractionResult;

/// Per-page statistics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageStats {
    pub page: usize,
    pub word_count: usize,
    /// Characters of extracted body text.
    pub text_chars: usize,
    pub tables_found: usize,
    pub images: usize,
    pub likely_scanned: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
}

impl PageStats {
    pub fn from_result(result: &PageExtractionResult) -> Self {
        Self {
            page: result.page_number,
            word_count: result.word_count,
            text_chars: result.text.chars().count(),
            tables_found: result.tables.len(),
            images: result.image_count,
            likely_scanned: result.likely_scanned,
            error: result.error.clone(),
        }
    }
}

/// Document-level summary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentMetadata {
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub filename: Option<String>,
    pub pages_total: usize,
    /// Page tables surviving deduplication, summed over pages.
    pub tables_found: usize,
    pub images_found: usize,
    pub page_stats: Vec<PageStats>,
}

impl DocumentMetadata {
    pub fn from_pages(filename: Option<String>, pages: &[PageExtractionResult]) -> Self {
        let page_stats: Vec<PageStats> = pages.iter().map(PageStats::from_result).collect();
        Self {
            filename,
            pages_total: pages.len(),
            tables_found: page_stats.iter().map(|s| s.tables_found).sum(),
            images_found: page_stats.iter().map(|s| s.images).sum(),
            page_stats,
        }
    }

    /// Pages that failed and were recorded empty.
    pub fn failed_pages(&self) -> impl Iterator<Item = &PageStats> {
        self.page_stats.iter().filter(|s| s.error.is_some())
    }
}

/// One page's contribution to a logical table, flattened for writers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSummary {
    /// Output label of the logical table, `Table_{k}` (1-based).
    pub label: String,
    pub page: usize,
    pub mode: MergeMode,
    pub score: f64,
    pub bbox: BBox,
    pub strategy: Strategy,
    pub rows: usize,
    pub columns: usize,
    pub header: Vec<String>,
}

/// Label for the `index`-th (0-based) logical table.
pub fn table_label(index: usize) -> String {
    format!("Table_{}", index + 1)
}

/// Summary records for every segment of every logical table, in order.
pub fn table_summaries(tables: &[LogicalTable]) -> Vec<TableSummary> {
    tables
        .iter()
        .enumerate()
        .flat_map(|(k, table)| {
            table.segments.iter().map(move |seg| TableSummary {
                label: table_label(k),
                page: seg.page,
                mode: seg.mode,
                score: seg.score,
                bbox: seg.bbox,
                strategy: seg.strategy,
                rows: seg.row_count,
                columns: seg.column_count,
                header: table.header.clone(),
            })
        })
        .collect()
}
