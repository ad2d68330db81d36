//! Table candidate extraction.
//!
//! Two strategies run independently over a page:
//!
//! - [`Strategy::Lattice`] derives edges from ruling lines and rectangles;
//!   best for bordered tables.
//! - [`Strategy::Stream`] synthesizes edges from word alignment and
//!   whitespace gaps; best for borderless tables.
//!
//! Both feed the same grid pipeline ([`crate::table::TableFinder`]) and
//! produce [`TableCandidate`]s of the same shape. A failing strategy is
//! recorded as a warning and contributes no candidates.

use std::fmt;

use crate::columns::ColumnBand;
use crate::edges::{Edge, EdgeSource, Ruling, derive_edges};
use crate::error::{DetectError, ExtractResult, ExtractWarning};
use crate::geometry::{BBox, cluster_by_gap};
use crate::layout::{LineOptions, assemble_lines};
use crate::quality::{ColumnKind, column_kinds, score_cells};
use crate::table::{Table, TableFinder, TableSettings, fill_cells};
use crate::words::Word;

/// Gap factor used when clustering stream cell centers into columns.
const STREAM_GAP_FACTOR: f64 = 1.7;

/// Table detection strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Explicit ruling lines as grid boundaries.
    Lattice,
    /// Whitespace and alignment gaps, no ruling lines.
    Stream,
}

impl Strategy {
    /// Every strategy, in the order they run on a page.
    pub const ALL: [Strategy; 2] = [Strategy::Lattice, Strategy::Stream];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Lattice => "lattice",
            Strategy::Stream => "stream",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table found on one page by one strategy.
///
/// Row 0 of `cells` is the header; every row has the same number of columns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableCandidate {
    /// Normalized cell strings, header first.
    pub cells: Vec<Vec<String>>,
    /// Bounding box of the table on its page.
    pub bbox: BBox,
    /// Quality score in `0.0..=1.0`.
    pub score: f64,
    /// Strategy that produced this candidate.
    pub strategy: Strategy,
}

impl TableCandidate {
    /// Build a candidate and compute its quality score.
    pub fn new(cells: Vec<Vec<String>>, bbox: BBox, strategy: Strategy) -> Self {
        let score = score_cells(&cells);
        Self {
            cells,
            bbox,
            score,
            strategy,
        }
    }

    /// The header row.
    pub fn header(&self) -> &[String] {
        self.cells.first().map_or(&[], Vec::as_slice)
    }

    /// Data rows below the header.
    pub fn body(&self) -> &[Vec<String>] {
        self.cells.get(1..).unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        self.body().len()
    }

    pub fn column_count(&self) -> usize {
        self.header().len()
    }
}

/// Geometry of one page, as consumed by the detectors.
#[derive(Debug, Clone, Copy)]
pub struct PageGeometry<'a> {
    pub words: &'a [Word],
    pub rulings: &'a [Ruling],
    pub rects: &'a [BBox],
}

/// Run one strategy over a page.
pub fn run_strategy(
    strategy: Strategy,
    page: &PageGeometry<'_>,
    settings: &TableSettings,
) -> Result<Vec<TableCandidate>, DetectError> {
    match strategy {
        Strategy::Lattice => detect_lattice(page.words, page.rulings, page.rects, settings),
        Strategy::Stream => detect_stream(page.words, settings),
    }
}

/// Run every strategy over a page and collect the raw candidates.
///
/// A strategy error is logged, recorded as a
/// [`WarningCode::StrategyFailure`](crate::error::WarningCode::StrategyFailure)
/// warning and treated as zero candidates; the other strategy still runs.
pub fn extract_candidates(
    page: &PageGeometry<'_>,
    settings: &TableSettings,
) -> ExtractResult<Vec<TableCandidate>> {
    let mut result = ExtractResult::ok(Vec::new());
    for strategy in Strategy::ALL {
        match run_strategy(strategy, page, settings) {
            Ok(found) => {
                tracing::debug!(%strategy, candidates = found.len(), "table detection finished");
                result.value.extend(found);
            }
            Err(err) => {
                tracing::warn!(%strategy, error = %err, "table detection failed");
                result
                    .warnings
                    .push(ExtractWarning::strategy_failure(strategy, &err));
            }
        }
    }
    result
}

/// Detect tables bounded by ruling lines and rectangle sides.
///
/// Returns no candidates when the page has no rulings.
pub fn detect_lattice(
    words: &[Word],
    rulings: &[Ruling],
    rects: &[BBox],
    settings: &TableSettings,
) -> Result<Vec<TableCandidate>, DetectError> {
    if rulings.is_empty() && rects.is_empty() {
        return Ok(Vec::new());
    }
    let edges = derive_edges(rulings, rects);
    if !edges.iter().all(Edge::is_finite) {
        return Err(DetectError::NonFiniteGeometry("ruling"));
    }
    ensure_finite_words(words)?;

    let tables = TableFinder::new(settings).find_tables(edges);
    Ok(tables_to_candidates(tables, words, settings, Strategy::Lattice))
}

/// Detect borderless tables from word alignment.
pub fn detect_stream(
    words: &[Word],
    settings: &TableSettings,
) -> Result<Vec<TableCandidate>, DetectError> {
    ensure_finite_words(words)?;
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let rows = stream_rows(words, settings);
    let mut candidates = Vec::new();
    for region in tabular_regions(&rows, settings) {
        let Some(edges) = region_edges(region, settings) else {
            continue;
        };
        let region_words: Vec<Word> = region
            .iter()
            .flat_map(|row| row.words.iter().map(|w| (*w).clone()))
            .collect();
        let tables = TableFinder::new(settings).find_tables(edges);
        candidates.extend(tables_to_candidates(
            tables,
            &region_words,
            settings,
            Strategy::Stream,
        ));
    }
    Ok(candidates)
}

fn ensure_finite_words(words: &[Word]) -> Result<(), DetectError> {
    if words.iter().all(|w| w.bbox.is_finite()) {
        Ok(())
    } else {
        Err(DetectError::NonFiniteGeometry("word"))
    }
}

/// Fill tables with text and keep those with a header and at least one data
/// row and some content. Stream candidates that read as prose are dropped.
fn tables_to_candidates(
    tables: Vec<Table>,
    words: &[Word],
    settings: &TableSettings,
    strategy: Strategy,
) -> Vec<TableCandidate> {
    tables
        .into_iter()
        .filter_map(|mut table| {
            fill_cells(&mut table, words, settings.text_y_tolerance);
            let cells = table.to_grid();
            if cells.len() < 2 {
                tracing::trace!(%strategy, rows = cells.len(), "discarding table without data rows");
                return None;
            }
            if cells.iter().flatten().all(String::is_empty) {
                tracing::trace!(%strategy, "discarding empty table");
                return None;
            }
            let candidate = TableCandidate::new(cells, table.bbox, strategy);
            if strategy == Strategy::Stream && reads_as_prose(&candidate, settings) {
                tracing::trace!(%strategy, "discarding prose columns");
                return None;
            }
            Some(candidate)
        })
        .collect()
}

/// No numeric column and more than `stream_max_cell_words` words per filled
/// body cell on average.
fn reads_as_prose(candidate: &TableCandidate, settings: &TableSettings) -> bool {
    if column_kinds(candidate).contains(&ColumnKind::Numeric) {
        return false;
    }
    let (filled, words) = candidate
        .body()
        .iter()
        .flatten()
        .filter(|cell| !cell.is_empty())
        .fold((0usize, 0usize), |(n, w), cell| {
            (n + 1, w + cell.split_whitespace().count())
        });
    filled > 0 && words as f64 / filled as f64 > settings.stream_max_cell_words
}

/// A horizontal run of words with no gap wider than the cell gap.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    x0: f64,
    x1: f64,
}

impl Segment {
    fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }
}

/// One text row split into cell segments.
#[derive(Debug)]
struct StreamRow<'a> {
    top: f64,
    bottom: f64,
    words: Vec<&'a Word>,
    segments: Vec<Segment>,
}

fn stream_rows<'a>(words: &'a [Word], settings: &TableSettings) -> Vec<StreamRow<'a>> {
    let band = ColumnBand {
        x0: f64::NEG_INFINITY,
        x1: f64::INFINITY,
        words: words.iter().collect(),
    };
    let options = LineOptions {
        y_tolerance: settings.text_y_tolerance,
        ..LineOptions::default()
    };

    assemble_lines(&band, &options)
        .into_iter()
        .map(|line| {
            let top = line.words.iter().map(|w| w.bbox.top).fold(f64::INFINITY, f64::min);
            let bottom = line
                .words
                .iter()
                .map(|w| w.bbox.bottom)
                .fold(f64::NEG_INFINITY, f64::max);

            let mut segments: Vec<Segment> = Vec::new();
            for word in &line.words {
                match segments.last_mut() {
                    Some(seg) if word.bbox.x0 - seg.x1 <= settings.stream_cell_gap => {
                        seg.x1 = seg.x1.max(word.bbox.x1);
                    }
                    _ => segments.push(Segment {
                        x0: word.bbox.x0,
                        x1: word.bbox.x1,
                    }),
                }
            }

            StreamRow {
                top,
                bottom,
                words: line.words,
                segments,
            }
        })
        .collect()
}

/// Maximal runs of consecutive tabular rows that are long enough.
fn tabular_regions<'r, 'a>(
    rows: &'r [StreamRow<'a>],
    settings: &TableSettings,
) -> Vec<&'r [StreamRow<'a>]> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;
    for i in 0..=rows.len() {
        let tabular = rows
            .get(i)
            .is_some_and(|r| r.segments.len() >= settings.stream_min_columns);
        match (tabular, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                if i - s >= settings.stream_min_rows {
                    regions.push(&rows[s..i]);
                }
                start = None;
            }
            _ => {}
        }
    }
    regions
}

/// Column bands of a region: segment centers clustered by gap, tightened to
/// segment extents, overlapping bands fused.
fn region_columns(region: &[StreamRow<'_>], settings: &TableSettings) -> Vec<Segment> {
    let segments: Vec<Segment> = region.iter().flat_map(|r| r.segments.iter().copied()).collect();
    let centers: Vec<f64> = segments.iter().map(Segment::center).collect();
    let clusters = cluster_by_gap(&centers, STREAM_GAP_FACTOR, settings.stream_column_gap);

    let mut bands: Vec<Segment> = clusters
        .iter()
        .filter_map(|&(lo, hi)| {
            segments
                .iter()
                .filter(|s| s.center() >= lo && s.center() <= hi)
                .fold(None, |acc: Option<Segment>, s| {
                    Some(match acc {
                        Some(b) => Segment {
                            x0: b.x0.min(s.x0),
                            x1: b.x1.max(s.x1),
                        },
                        None => *s,
                    })
                })
        })
        .collect();
    bands.sort_by(|a, b| a.x0.total_cmp(&b.x0));

    let mut fused: Vec<Segment> = Vec::with_capacity(bands.len());
    for band in bands {
        match fused.last_mut() {
            Some(prev) if band.x0 <= prev.x1 => prev.x1 = prev.x1.max(band.x1),
            _ => fused.push(band),
        }
    }
    fused
}

/// Synthetic grid edges for a region: row tops plus the final bottom, and
/// verticals at the outer extents and between adjacent columns.
fn region_edges(region: &[StreamRow<'_>], settings: &TableSettings) -> Option<Vec<Edge>> {
    let columns = region_columns(region, settings);
    if columns.len() < settings.stream_min_columns.max(2) {
        tracing::trace!(columns = columns.len(), "stream region has too few columns");
        return None;
    }
    let (first, last) = (region.first()?, region.last()?);
    let left = columns.first()?.x0;
    let right = columns.last()?.x1;
    let top = first.top;
    let bottom = last.bottom;

    let mut edges: Vec<Edge> = region
        .iter()
        .map(|row| Edge::horizontal(left, row.top, right, EdgeSource::Stream))
        .collect();
    edges.push(Edge::horizontal(left, bottom, right, EdgeSource::Stream));

    edges.push(Edge::vertical(left, top, bottom, EdgeSource::Stream));
    for pair in columns.windows(2) {
        let x = (pair[0].x1 + pair[1].x0) / 2.0;
        edges.push(Edge::vertical(x, top, bottom, EdgeSource::Stream));
    }
    edges.push(Edge::vertical(right, top, bottom, EdgeSource::Stream));
    Some(edges)
}
