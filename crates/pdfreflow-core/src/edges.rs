//! Edge derivation from ruling geometry.
//!
//! Edges are axis-aligned segments consumed by the grid pipeline in
//! [`crate::table`]. Lattice detection derives them from the page's ruling
//! lines and rectangles; stream detection synthesizes them from word
//! alignment.

use crate::geometry::{BBox, Orientation};

/// Source of an edge, tracking which primitive it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSource {
    /// A ruling line segment drawn on the page.
    Ruling,
    /// Top side of a rectangle.
    RectTop,
    /// Bottom side of a rectangle.
    RectBottom,
    /// Left side of a rectangle.
    RectLeft,
    /// Right side of a rectangle.
    RectRight,
    /// Synthetic edge generated from text alignment (stream detection).
    Stream,
}

/// A ruling line segment as reported by the decoding layer.
///
/// The segment runs from `(x0, top)` to `(x1, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ruling {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Ruling {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Horizontal ruling at `y` spanning `x0..x1`.
    pub fn horizontal(x0: f64, y: f64, x1: f64) -> Self {
        Self::new(x0, y, x1, y)
    }

    /// Vertical ruling at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64) -> Self {
        Self::new(x, top, x, bottom)
    }

    pub fn orientation(&self) -> Orientation {
        classify_edge_orientation(self.x0, self.top, self.x1, self.bottom)
    }
}

/// An axis-aligned segment used for grid construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Left x coordinate.
    pub x0: f64,
    /// Top y coordinate (distance from top of page).
    pub top: f64,
    /// Right x coordinate.
    pub x1: f64,
    /// Bottom y coordinate (distance from top of page).
    pub bottom: f64,
    /// Edge orientation.
    pub orientation: Orientation,
    /// Where this edge was derived from.
    pub source: EdgeSource,
}

impl Edge {
    /// Horizontal edge at `y` spanning `x0..x1`.
    pub fn horizontal(x0: f64, y: f64, x1: f64, source: EdgeSource) -> Self {
        Self {
            x0,
            top: y,
            x1,
            bottom: y,
            orientation: Orientation::Horizontal,
            source,
        }
    }

    /// Vertical edge at `x` spanning `top..bottom`.
    pub fn vertical(x: f64, top: f64, bottom: f64, source: EdgeSource) -> Self {
        Self {
            x0: x,
            top,
            x1: x,
            bottom,
            orientation: Orientation::Vertical,
            source,
        }
    }

    /// Length along the edge's primary axis.
    pub fn length(&self) -> f64 {
        let dx = self.x1 - self.x0;
        let dy = self.bottom - self.top;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x0.is_finite()
            && self.top.is_finite()
            && self.x1.is_finite()
            && self.bottom.is_finite()
    }
}

/// Derive an Edge from a ruling segment, normalizing its extent.
pub fn edge_from_ruling(ruling: &Ruling) -> Edge {
    Edge {
        x0: ruling.x0.min(ruling.x1),
        top: ruling.top.min(ruling.bottom),
        x1: ruling.x0.max(ruling.x1),
        bottom: ruling.top.max(ruling.bottom),
        orientation: ruling.orientation(),
        source: EdgeSource::Ruling,
    }
}

/// Derive 4 Edges from a rectangle (top, bottom, left, right).
pub fn edges_from_rect(rect: &BBox) -> Vec<Edge> {
    vec![
        Edge::horizontal(rect.x0, rect.top, rect.x1, EdgeSource::RectTop),
        Edge::horizontal(rect.x0, rect.bottom, rect.x1, EdgeSource::RectBottom),
        Edge::vertical(rect.x0, rect.top, rect.bottom, EdgeSource::RectLeft),
        Edge::vertical(rect.x1, rect.top, rect.bottom, EdgeSource::RectRight),
    ]
}

/// Tolerance for floating-point comparison when classifying edge orientation.
const EDGE_AXIS_TOLERANCE: f64 = 1e-6;

/// Classify orientation for a segment from two points.
fn classify_edge_orientation(x0: f64, y0: f64, x1: f64, y1: f64) -> Orientation {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    if dy < EDGE_AXIS_TOLERANCE {
        Orientation::Horizontal
    } else if dx < EDGE_AXIS_TOLERANCE {
        Orientation::Vertical
    } else {
        Orientation::Diagonal
    }
}

/// Derive all edges from the page's rulings and rectangles.
pub fn derive_edges(rulings: &[Ruling], rects: &[BBox]) -> Vec<Edge> {
    let mut edges: Vec<Edge> = rulings.iter().map(edge_from_ruling).collect();
    for rect in rects {
        edges.extend(edges_from_rect(rect));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(a: f64, b: f64) {
        assert!(
            (a - b).abs() < 1e-6,
            "expected {b}, got {a}, diff={}",
            (a - b).abs()
        );
    }

    #[test]
    fn test_edge_from_horizontal_ruling() {
        let edge = edge_from_ruling(&Ruling::horizontal(10.0, 50.0, 100.0));
        assert_approx(edge.x0, 10.0);
        assert_approx(edge.top, 50.0);
        assert_approx(edge.x1, 100.0);
        assert_approx(edge.bottom, 50.0);
        assert_eq!(edge.orientation, Orientation::Horizontal);
        assert_eq!(edge.source, EdgeSource::Ruling);
    }

    #[test]
    fn test_edge_from_reversed_vertical_ruling() {
        // Decoders may report segments end-to-start.
        let edge = edge_from_ruling(&Ruling::new(50.0, 200.0, 50.0, 10.0));
        assert_approx(edge.top, 10.0);
        assert_approx(edge.bottom, 200.0);
        assert_eq!(edge.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_edge_from_diagonal_ruling() {
        let edge = edge_from_ruling(&Ruling::new(10.0, 20.0, 100.0, 200.0));
        assert_eq!(edge.orientation, Orientation::Diagonal);
    }

    #[test]
    fn test_edges_from_rect_sides() {
        let edges = edges_from_rect(&BBox::new(10.0, 20.0, 110.0, 70.0));
        assert_eq!(edges.len(), 4);

        assert_eq!(edges[0].source, EdgeSource::RectTop);
        assert_approx(edges[0].top, 20.0);
        assert_eq!(edges[1].source, EdgeSource::RectBottom);
        assert_approx(edges[1].top, 70.0);
        assert_eq!(edges[2].source, EdgeSource::RectLeft);
        assert_approx(edges[2].x0, 10.0);
        assert_eq!(edges[3].source, EdgeSource::RectRight);
        assert_approx(edges[3].x0, 110.0);
        assert_eq!(edges[3].orientation, Orientation::Vertical);
    }

    #[test]
    fn test_edge_length() {
        assert_approx(Edge::horizontal(0.0, 5.0, 30.0, EdgeSource::Stream).length(), 30.0);
        assert_approx(Edge::vertical(5.0, 10.0, 50.0, EdgeSource::Stream).length(), 40.0);
    }

    #[test]
    fn test_derive_edges_empty_inputs() {
        assert!(derive_edges(&[], &[]).is_empty());
    }

    #[test]
    fn test_derive_edges_mixed() {
        let rulings = vec![
            Ruling::horizontal(0.0, 10.0, 100.0),
            Ruling::vertical(50.0, 0.0, 100.0),
        ];
        let rects = vec![BBox::new(0.0, 0.0, 100.0, 100.0)];
        let edges = derive_edges(&rulings, &rects);
        assert_eq!(edges.len(), 6);
        assert_eq!(
            edges
                .iter()
                .filter(|e| e.source == EdgeSource::Ruling)
                .count(),
            2
        );
    }
}
