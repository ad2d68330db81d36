/// Bounding box with top-left origin coordinate system.
///
/// Coordinates follow the page convention of the decoding layer:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area of the bounding box (zero for inverted boxes).
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Center point of the box.
    pub fn center(&self) -> Point {
        Point {
            x: (self.x0 + self.x1) / 2.0,
            y: (self.top + self.bottom) / 2.0,
        }
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// True when the two boxes share a region of positive area.
    pub fn overlaps(&self, other: &BBox) -> bool {
        self.x0 < other.x1
            && other.x0 < self.x1
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Area shared by the two boxes.
    pub fn intersection_area(&self, other: &BBox) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.bottom.min(other.bottom) - self.top.max(other.top);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }

    /// Inclusive point containment.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.top && p.y <= self.bottom
    }

    /// Inclusive box containment.
    pub fn contains_bbox(&self, other: &BBox) -> bool {
        other.x0 >= self.x0
            && other.x1 <= self.x1
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite()
            && self.top.is_finite()
            && self.x1.is_finite()
            && self.bottom.is_finite()
    }
}

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Orientation of an edge or ruling segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
}

/// Group a sequence of numbers into ordered `(min, max)` intervals.
///
/// Values are sorted and the gaps between neighbours are measured. The break
/// threshold is `max(median_gap * gap_factor, min_gap)`, where the median gap
/// is `0.0` when there are fewer than two gaps. A new interval starts wherever
/// a gap exceeds the threshold.
///
/// An empty input yields no intervals; a single value yields `(v, v)`.
pub fn cluster_by_gap(values: &[f64], gap_factor: f64, min_gap: f64) -> Vec<(f64, f64)> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut gaps: Vec<f64> = sorted.windows(2).map(|w| w[1] - w[0]).collect();
    let threshold = (median_in_place(&mut gaps) * gap_factor).max(min_gap);

    let mut clusters = Vec::new();
    let mut start = sorted[0];
    let mut prev = sorted[0];
    for &v in &sorted[1..] {
        if v - prev > threshold {
            clusters.push((start, prev));
            start = v;
        }
        prev = v;
    }
    clusters.push((start, prev));
    clusters
}

/// Median of the values (sorts the slice); `0.0` when fewer than two values.
fn median_in_place(values: &mut [f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
