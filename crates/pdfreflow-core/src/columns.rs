//! Column segmentation: split a page's prose words into left-to-right bands.

use crate::geometry::{BBox, cluster_by_gap};
use crate::words::Word;

/// Options for column segmentation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ColumnOptions {
    /// Multiplier applied to the median gap between word centers.
    pub gap_factor: f64,
    /// Smallest gap (in points) that may separate two columns.
    pub min_gap: f64,
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            gap_factor: 1.7,
            min_gap: 40.0,
        }
    }
}

/// A horizontal interval of the page and the words that fall inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBand<'a> {
    /// Left edge of the band.
    pub x0: f64,
    /// Right edge of the band.
    pub x1: f64,
    /// Member words in input order.
    pub words: Vec<&'a Word>,
}

/// Keep only words whose top-left corner lies outside every table box.
pub fn words_outside_tables<'a>(words: &'a [Word], tables: &[BBox]) -> Vec<&'a Word> {
    words
        .iter()
        .filter(|w| !tables.iter().any(|t| t.contains_point(w.origin())))
        .collect()
}

/// Group words into column bands ordered left-to-right.
///
/// Horizontal word centers are clustered with [`cluster_by_gap`]; each word
/// joins the cluster containing its center, and each band is then tightened to
/// the actual extent of its member words. When no words are given the result
/// is a single empty band spanning `0..page_width`.
pub fn segment_columns<'a>(
    words: &[&'a Word],
    page_width: f64,
    options: &ColumnOptions,
) -> Vec<ColumnBand<'a>> {
    let centers: Vec<f64> = words.iter().map(|w| w.center_x()).collect();
    let clusters = cluster_by_gap(&centers, options.gap_factor, options.min_gap);

    if clusters.is_empty() {
        return vec![ColumnBand {
            x0: 0.0,
            x1: page_width,
            words: Vec::new(),
        }];
    }

    let mut members: Vec<Vec<&'a Word>> = vec![Vec::new(); clusters.len()];
    for (&word, &cx) in words.iter().zip(&centers) {
        let idx = clusters
            .iter()
            .position(|&(lo, hi)| cx >= lo && cx <= hi)
            .unwrap_or_else(|| nearest_cluster(&clusters, cx));
        members[idx].push(word);
    }

    let mut bands: Vec<ColumnBand<'a>> = members
        .into_iter()
        .filter(|m| !m.is_empty())
        .map(|m| {
            let x0 = m.iter().map(|w| w.bbox.x0).fold(f64::INFINITY, f64::min);
            let x1 = m.iter().map(|w| w.bbox.x1).fold(f64::NEG_INFINITY, f64::max);
            ColumnBand { x0, x1, words: m }
        })
        .collect();

    bands.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    tracing::trace!(bands = bands.len(), words = words.len(), "segmented columns");
    bands
}

/// Index of the cluster whose interval is closest to `x`.
///
/// Only reached for non-finite centers, which never fall inside a cluster.
fn nearest_cluster(clusters: &[(f64, f64)], x: f64) -> usize {
    clusters
        .iter()
        .enumerate()
        .map(|(i, &(lo, hi))| (i, (lo - x).abs().min((hi - x).abs())))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(0, |(i, _)| i)
}
