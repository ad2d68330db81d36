//! Table quality scoring, deduplication and ranking.
//!
//! Lattice and stream detection frequently rediscover the same visual table.
//! Candidates are scored on density and per-column regularity, exact
//! duplicates (same header, column kinds and box) are collapsed to their first
//! occurrence, survivors are ranked by score, and a candidate mostly covered
//! by a better-ranked one is dropped.

use crate::detect::TableCandidate;
use crate::geometry::BBox;
use crate::merge::{CellValue, coerce_cell};

/// Maximum coordinate difference for two boxes to count as the same.
const BBOX_TOLERANCE: f64 = 0.05;

/// Weight of cell density in the score; the remainder goes to stability.
const DENSITY_WEIGHT: f64 = 0.6;

/// Inferred kind of a table column, from its body cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnKind {
    /// No non-empty cells.
    Empty,
    /// Every non-empty cell coerces to a number.
    Numeric,
    Text,
}

/// Score a grid whose first row is the header.
///
/// `0.6 * density + 0.4 * stability` over every row, header included, where
/// density is the share of non-empty cells and stability is
/// `1 / (1 + mean column stddev of cell text length)`. A grid without cells
/// scores `0.0`.
pub fn score_cells(cells: &[Vec<String>]) -> f64 {
    let width = cells.iter().map(Vec::len).max().unwrap_or(0);
    let total: usize = cells.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }

    let filled = cells.iter().flatten().filter(|c| !c.is_empty()).count();
    let density = filled as f64 / total as f64;

    let mean_stddev = (0..width)
        .map(|col| {
            let lengths: Vec<f64> = cells
                .iter()
                .map(|row| row.get(col).map_or(0, |c| c.chars().count()) as f64)
                .collect();
            population_stddev(&lengths)
        })
        .sum::<f64>()
        / width as f64;
    let stability = 1.0 / (1.0 + mean_stddev);

    DENSITY_WEIGHT * density + (1.0 - DENSITY_WEIGHT) * stability
}

fn population_stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// Kind signature of each column of a candidate, left to right.
pub fn column_kinds(candidate: &TableCandidate) -> Vec<ColumnKind> {
    let body = candidate.body();
    (0..candidate.column_count())
        .map(|col| {
            let mut kind = ColumnKind::Empty;
            for cell in body.iter().filter_map(|row| row.get(col)) {
                if cell.is_empty() {
                    continue;
                }
                match coerce_cell(cell) {
                    CellValue::Number(_) => {
                        if kind == ColumnKind::Empty {
                            kind = ColumnKind::Numeric;
                        }
                    }
                    CellValue::Text(_) => return ColumnKind::Text,
                }
            }
            kind
        })
        .collect()
}

fn same_bbox(a: &BBox, b: &BBox) -> bool {
    (a.x0 - b.x0).abs() < BBOX_TOLERANCE
        && (a.top - b.top).abs() < BBOX_TOLERANCE
        && (a.x1 - b.x1).abs() < BBOX_TOLERANCE
        && (a.bottom - b.bottom).abs() < BBOX_TOLERANCE
}

/// Two candidates are duplicates when header, column kinds and box agree.
fn is_duplicate(a: &TableCandidate, b: &TableCandidate) -> bool {
    a.header() == b.header() && same_bbox(&a.bbox, &b.bbox) && column_kinds(a) == column_kinds(b)
}

/// Collapse duplicate candidates, keeping the first occurrence of each.
pub fn dedupe_candidates(candidates: Vec<TableCandidate>) -> Vec<TableCandidate> {
    let mut kept: Vec<TableCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().any(|k| is_duplicate(k, &candidate)) {
            tracing::trace!(strategy = %candidate.strategy, "dropping duplicate table");
            continue;
        }
        kept.push(candidate);
    }
    kept
}

/// Drop candidates whose box lies mostly inside a better-ranked one.
///
/// Overlap is measured against the smaller of the two boxes; candidates must
/// already be in rank order.
pub fn suppress_overlaps(candidates: Vec<TableCandidate>, threshold: f64) -> Vec<TableCandidate> {
    let mut kept: Vec<TableCandidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let covered = kept.iter().any(|k| {
            let smaller = k.bbox.area().min(candidate.bbox.area());
            smaller > 0.0 && k.bbox.intersection_area(&candidate.bbox) / smaller >= threshold
        });
        if covered {
            tracing::trace!(strategy = %candidate.strategy, "dropping overlapping table");
            continue;
        }
        kept.push(candidate);
    }
    kept
}

/// Deduplicate, sort by score descending (stable), then suppress overlaps.
pub fn rank_candidates(
    candidates: Vec<TableCandidate>,
    overlap_threshold: f64,
) -> Vec<TableCandidate> {
    let mut ranked = dedupe_candidates(candidates);
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    suppress_overlaps(ranked, overlap_threshold)
}
