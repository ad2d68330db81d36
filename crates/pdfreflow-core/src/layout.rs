//! Line assembly and page text rendering.
//!
//! Within a column band words are grouped top-to-bottom into lines by
//! vertical proximity, each line is rendered left-to-right with spacing
//! reconstructed from horizontal gaps, and the columns of a page are joined
//! left-to-right with a blank line between them.

use std::cmp::Ordering;

use crate::columns::{ColumnBand, ColumnOptions, segment_columns, words_outside_tables};
use crate::geometry::BBox;
use crate::words::Word;

/// Options for line assembly.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LineOptions {
    /// Maximum distance between a word's top and the line's reference top.
    pub y_tolerance: f64,
    /// Horizontal gap above which a space is inserted between two words.
    pub space_threshold: f64,
    /// Slack allowed when checking that a word lies inside its band.
    pub band_epsilon: f64,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            y_tolerance: 2.0,
            space_threshold: 2.0,
            band_epsilon: 0.5,
        }
    }
}

/// A text line: words sharing a vertical band, sorted left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine<'a> {
    /// Top of the first word that opened this line.
    pub top: f64,
    /// Words in this line, sorted by `x0`.
    pub words: Vec<&'a Word>,
}

impl TextLine<'_> {
    /// Render the line, inserting a single space wherever the gap between
    /// neighbouring words exceeds `space_threshold`.
    pub fn render(&self, space_threshold: f64) -> String {
        let mut out = String::new();
        let mut last_x1: Option<f64> = None;
        for word in &self.words {
            if let Some(x1) = last_x1 {
                if word.bbox.x0 - x1 > space_threshold {
                    out.push(' ');
                }
            }
            out.push_str(&word.text);
            last_x1 = Some(word.bbox.x1);
        }
        out.trim_end().to_string()
    }
}

/// Rounded top used as the primary line-sorting key.
fn rounded_top(w: &Word) -> f64 {
    (w.bbox.top * 10.0).round() / 10.0
}

fn line_order(a: &&Word, b: &&Word) -> Ordering {
    rounded_top(a)
        .total_cmp(&rounded_top(b))
        .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        .then_with(|| crate::words::reading_order(a, b))
}

fn x_order(a: &&Word, b: &&Word) -> Ordering {
    a.bbox
        .x0
        .total_cmp(&b.bbox.x0)
        .then_with(|| crate::words::reading_order(a, b))
}

/// Group a band's words into lines ordered top-to-bottom.
///
/// Only words whose box lies within the band (plus `band_epsilon`) take
/// part. Words are walked in `(rounded top, x0)` order and a new line starts
/// whenever a word's top differs from the current line's reference top by
/// more than `y_tolerance`.
pub fn assemble_lines<'a>(band: &ColumnBand<'a>, options: &LineOptions) -> Vec<TextLine<'a>> {
    let eps = options.band_epsilon;
    let mut words: Vec<&'a Word> = band
        .words
        .iter()
        .copied()
        .filter(|w| w.bbox.x0 >= band.x0 - eps && w.bbox.x1 <= band.x1 + eps)
        .collect();
    words.sort_by(line_order);

    let mut lines: Vec<TextLine<'a>> = Vec::new();
    for word in words {
        match lines.last_mut() {
            Some(line) if (word.bbox.top - line.top).abs() <= options.y_tolerance => {
                line.words.push(word);
            }
            _ => lines.push(TextLine {
                top: word.bbox.top,
                words: vec![word],
            }),
        }
    }

    for line in &mut lines {
        line.words.sort_by(x_order);
    }
    lines
}

/// Render one column band as newline-joined lines.
pub fn render_column(band: &ColumnBand<'_>, options: &LineOptions) -> String {
    assemble_lines(band, options)
        .iter()
        .map(|line| line.render(options.space_threshold))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render bands left-to-right, separating non-empty columns by a blank line.
pub fn render_columns(bands: &[ColumnBand<'_>], options: &LineOptions) -> String {
    bands
        .iter()
        .map(|band| render_column(band, options))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Reconstruct a page's body text, leaving out words inside table boxes.
pub fn page_text(
    words: &[Word],
    table_boxes: &[BBox],
    page_width: f64,
    columns: &ColumnOptions,
    lines: &LineOptions,
) -> String {
    let prose = words_outside_tables(words, table_boxes);
    let bands = segment_columns(&prose, page_width, columns);
    render_columns(&bands, lines).trim().to_string()
}
