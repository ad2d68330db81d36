use std::cmp::Ordering;

use crate::geometry::{BBox, Point};

/// A positioned word supplied by the PDF decoding layer.
///
/// Words are read-only inputs: the layout engine never mutates them, it only
/// groups and orders references to them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    /// The text content of this word.
    pub text: String,
    /// Bounding box of the word on its page.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub bbox: BBox,
    /// Font name, when the decoder reports it.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub fontname: Option<String>,
    /// Font size in points, when the decoder reports it.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub size: Option<f64>,
}

impl Word {
    pub fn new(text: impl Into<String>, x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            text: text.into(),
            bbox: BBox::new(x0, top, x1, bottom),
            fontname: None,
            size: None,
        }
    }

    /// Attach font metadata (builder style).
    pub fn with_font(mut self, fontname: impl Into<String>, size: f64) -> Self {
        self.fontname = Some(fontname.into());
        self.size = Some(size);
        self
    }

    /// Horizontal center of the word.
    pub fn center_x(&self) -> f64 {
        (self.bbox.x0 + self.bbox.x1) / 2.0
    }

    /// Top-left corner, used for table-region membership.
    pub fn origin(&self) -> Point {
        Point {
            x: self.bbox.x0,
            y: self.bbox.top,
        }
    }
}

/// Total reading-order comparison: top, then left edge, then text.
///
/// The trailing keys make sorting independent of input order when two words
/// share a position.
pub fn reading_order(a: &Word, b: &Word) -> Ordering {
    a.bbox
        .top
        .total_cmp(&b.bbox.top)
        .then(a.bbox.x0.total_cmp(&b.bbox.x0))
        .then_with(|| a.text.cmp(&b.text))
        .then(a.bbox.x1.total_cmp(&b.bbox.x1))
        .then(a.bbox.bottom.total_cmp(&b.bbox.bottom))
}
