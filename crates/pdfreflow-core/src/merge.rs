//! Cross-page table merging and cell value coercion.
//!
//! Pages are consumed in increasing page order and, within a page, candidates
//! in rank order. The only state carried between candidates is the header of
//! the most recently started table; it is threaded through
//! [`merge_decision`] as an explicit accumulator.

use std::fmt;

use crate::detect::{Strategy, TableCandidate};
use crate::geometry::BBox;
use crate::text::{headers_equal, normalize_cell_text};

/// A table cell after coercion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(t) if t.is_empty())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(t) => f.write_str(t),
        }
    }
}

/// Coerce cell text to a number where unambiguous.
///
/// Spaces (including non-breaking ones) are removed; a comma is read as the
/// decimal separator when the text has no dot. Anything that does not parse
/// to a finite number stays text, normalized.
pub fn coerce_cell(text: &str) -> CellValue {
    let normalized = normalize_cell_text(text);
    let mut compact: String = normalized
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '\u{00A0}' | '\u{202F}' | '\u{2007}'))
        .collect();
    if compact.contains(',') && !compact.contains('.') {
        compact = compact.replace(',', ".");
    }
    match compact.parse::<f64>() {
        Ok(n) if n.is_finite() && !compact.is_empty() => CellValue::Number(n),
        _ => CellValue::Text(normalized),
    }
}

/// Whether a table continues the previous one or starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergeMode {
    New,
    Appended,
}

impl MergeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeMode::New => "new",
            MergeMode::Appended => "appended",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decide the merge mode for `header` given the previous table's header.
///
/// Returns the mode and the header to carry forward: unchanged when
/// appending, `header` itself when starting a new table.
pub fn merge_decision(
    previous: Option<Vec<String>>,
    header: &[String],
) -> (MergeMode, Option<Vec<String>>) {
    match previous {
        Some(prev) if headers_equal(&prev, header) => (MergeMode::Appended, Some(prev)),
        _ => (MergeMode::New, Some(header.to_vec())),
    }
}

/// Provenance of one page's contribution to a [`LogicalTable`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSegment {
    pub page: usize,
    pub mode: MergeMode,
    pub score: f64,
    pub bbox: BBox,
    pub strategy: Strategy,
    pub row_count: usize,
    pub column_count: usize,
}

/// A document-level table built from one or more page candidates.
///
/// Every row has exactly `header.len()` values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Pages contributing rows, in order, without repeats.
    pub origin_pages: Vec<usize>,
    pub segments: Vec<TableSegment>,
}

impl LogicalTable {
    fn start(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
            origin_pages: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Merge mode of each contributing segment, in order.
    pub fn modes(&self) -> Vec<MergeMode> {
        self.segments.iter().map(|s| s.mode).collect()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    fn absorb(&mut self, page: usize, mode: MergeMode, candidate: &TableCandidate) {
        let width = self.header.len();
        for row in candidate.body() {
            let mut values: Vec<CellValue> = row.iter().take(width).map(|c| coerce_cell(c)).collect();
            values.resize(width, CellValue::Text(String::new()));
            self.rows.push(values);
        }
        if self.origin_pages.last() != Some(&page) {
            self.origin_pages.push(page);
        }
        self.segments.push(TableSegment {
            page,
            mode,
            score: candidate.score,
            bbox: candidate.bbox,
            strategy: candidate.strategy,
            row_count: candidate.row_count(),
            column_count: candidate.column_count(),
        });
    }
}

/// Sequential merge fold over ranked page candidates.
#[derive(Debug, Default)]
pub struct TableMerger {
    previous_header: Option<Vec<String>>,
    tables: Vec<LogicalTable>,
}

impl TableMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one page's ranked candidates. Pages must arrive in increasing
    /// order.
    pub fn push_page(&mut self, page: usize, candidates: &[TableCandidate]) {
        for candidate in candidates {
            self.push(page, candidate);
        }
    }

    /// Feed a single candidate and return the decision taken for it.
    pub fn push(&mut self, page: usize, candidate: &TableCandidate) -> MergeMode {
        let (mode, carried) = merge_decision(self.previous_header.take(), candidate.header());
        self.previous_header = carried;
        tracing::debug!(page, %mode, columns = candidate.column_count(), "merge decision");

        if mode == MergeMode::New || self.tables.is_empty() {
            let header = candidate
                .header()
                .iter()
                .map(|h| normalize_cell_text(h))
                .collect();
            self.tables.push(LogicalTable::start(header));
        }
        if let Some(table) = self.tables.last_mut() {
            table.absorb(page, mode, candidate);
        }
        mode
    }

    pub fn finish(self) -> Vec<LogicalTable> {
        self.tables
    }
}

/// Merge ranked candidates of consecutive pages into logical tables.
pub fn merge_tables<'a, I>(pages: I) -> Vec<LogicalTable>
where
    I: IntoIterator<Item = (usize, &'a [TableCandidate])>,
{
    let mut merger = TableMerger::new();
    for (page, candidates) in pages {
        merger.push_page(page, candidates);
    }
    merger.finish()
}
