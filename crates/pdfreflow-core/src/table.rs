//! Table grid pipeline.
//!
//! Both detection strategies reduce a page to a set of axis-aligned edges;
//! this module turns edges into tables: snap nearby parallel edges, join
//! collinear segments, find intersections, build cells from complete
//! corner quadruples, group touching cells into tables, and finally fill the
//! cells with the words whose centers they contain.

use std::collections::{BTreeMap, HashMap};

use crate::edges::Edge;
use crate::geometry::{BBox, Orientation};
use crate::text::normalize_cell_text;
use crate::words::Word;

/// Configuration for table detection.
///
/// Tolerances default to 3.0, the usual values for both bordered and
/// borderless layouts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableSettings {
    /// Snap tolerance for aligning vertical edges along x.
    pub snap_x_tolerance: f64,
    /// Snap tolerance for aligning horizontal edges along y.
    pub snap_y_tolerance: f64,
    /// Join tolerance for merging horizontal segments.
    pub join_x_tolerance: f64,
    /// Join tolerance for merging vertical segments.
    pub join_y_tolerance: f64,
    /// Minimum edge length to consider for table detection.
    pub edge_min_length: f64,
    /// Intersection tolerance along x-axis.
    pub intersection_x_tolerance: f64,
    /// Intersection tolerance along y-axis.
    pub intersection_y_tolerance: f64,
    /// Vertical tolerance for grouping words into rows and cell lines.
    pub text_y_tolerance: f64,
    /// Horizontal gap that splits a row into separate cells (stream).
    pub stream_cell_gap: f64,
    /// Minimum number of cells for a row to count as tabular (stream).
    pub stream_min_columns: usize,
    /// Minimum number of consecutive tabular rows forming a table (stream).
    pub stream_min_rows: usize,
    /// Minimum gap between cell centers of adjacent columns (stream).
    pub stream_column_gap: f64,
    /// Mean words per body cell above which a stream candidate with no
    /// numeric column is read as prose columns rather than a table.
    pub stream_max_cell_words: f64,
    /// Share of a candidate's box that must lie inside a better-ranked
    /// candidate for it to be dropped as an overlapping duplicate.
    pub overlap_threshold: f64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            snap_x_tolerance: 3.0,
            snap_y_tolerance: 3.0,
            join_x_tolerance: 3.0,
            join_y_tolerance: 3.0,
            edge_min_length: 3.0,
            intersection_x_tolerance: 3.0,
            intersection_y_tolerance: 3.0,
            text_y_tolerance: 3.0,
            stream_cell_gap: 10.0,
            stream_min_columns: 3,
            stream_min_rows: 2,
            stream_column_gap: 20.0,
            stream_max_cell_words: 2.0,
            overlap_threshold: 0.8,
        }
    }
}

/// A detected table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Bounding box of the cell.
    pub bbox: BBox,
    /// Text content within the cell, if any.
    pub text: Option<String>,
}

/// A detected table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Bounding box enclosing the entire table.
    pub bbox: BBox,
    /// Cells organized into rows (top-to-bottom, left-to-right within each row).
    pub rows: Vec<Vec<Cell>>,
    /// Distinct left edges of the table's columns, sorted.
    pub column_xs: Vec<f64>,
}

impl Table {
    /// Rectangular grid of normalized cell strings.
    ///
    /// Each cell lands in the column whose left edge it shares; positions with
    /// no cell (irregular grids) become empty strings.
    pub fn to_grid(&self) -> Vec<Vec<String>> {
        let index: HashMap<i64, usize> = self
            .column_xs
            .iter()
            .enumerate()
            .map(|(i, &x)| (float_key(x), i))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                let mut out = vec![String::new(); self.column_xs.len()];
                for cell in row {
                    if let Some(&i) = index.get(&float_key(cell.bbox.x0)) {
                        out[i] = cell.text.as_deref().map(normalize_cell_text).unwrap_or_default();
                    }
                }
                out
            })
            .collect()
    }
}

/// Axis-aligned edges split by orientation.
///
/// Cells are bounded by horizontal and vertical edges only; diagonal edges
/// are left out when the set is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridEdges {
    pub horizontal: Vec<Edge>,
    pub vertical: Vec<Edge>,
}

impl GridEdges {
    /// Split `edges` by orientation, keeping those at least `min_length` long.
    pub fn new(edges: impl IntoIterator<Item = Edge>, min_length: f64) -> Self {
        let mut grid = Self::default();
        for edge in edges.into_iter().filter(|e| e.length() >= min_length) {
            match edge.orientation {
                Orientation::Horizontal => grid.horizontal.push(edge),
                Orientation::Vertical => grid.vertical.push(edge),
                Orientation::Diagonal => {}
            }
        }
        grid
    }

    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }

    /// Align nearby parallel edges.
    ///
    /// Horizontals are clustered by y within `y_tolerance`, verticals by x
    /// within `x_tolerance`, and every member moves to its cluster mean.
    /// Edges are aligned, never merged.
    pub fn snap(&mut self, x_tolerance: f64, y_tolerance: f64) {
        snap_axis(&mut self.horizontal, y_tolerance, |e| e.top, |e, y| {
            e.top = y;
            e.bottom = y;
        });
        snap_axis(&mut self.vertical, x_tolerance, |e| e.x0, |e, x| {
            e.x0 = x;
            e.x1 = x;
        });
    }

    /// Merge segments on the same line whose gap is within `x_tolerance`
    /// (horizontals) or `y_tolerance` (verticals).
    pub fn join(self, x_tolerance: f64, y_tolerance: f64) -> Self {
        Self {
            horizontal: join_axis(
                self.horizontal,
                x_tolerance,
                |e| e.top,
                |e| (e.x0, e.x1),
                |e, x0, x1| Edge::horizontal(x0, e.top, x1, e.source),
            ),
            vertical: join_axis(
                self.vertical,
                y_tolerance,
                |e| e.x0,
                |e| (e.top, e.bottom),
                |e, top, bottom| Edge::vertical(e.x0, top, bottom, e.source),
            ),
        }
    }

    /// Points where a vertical segment meets a horizontal one, each segment
    /// stretched by the tolerances along its own axis only.
    ///
    /// Sorted by x then y, without duplicates.
    pub fn intersections(&self, x_tolerance: f64, y_tolerance: f64) -> Vec<Intersection> {
        let mut points: Vec<Intersection> = self
            .horizontal
            .iter()
            .flat_map(|h| {
                self.vertical
                    .iter()
                    .filter(move |v| {
                        (h.x0 - x_tolerance..=h.x1 + x_tolerance).contains(&v.x0)
                            && (v.top - y_tolerance..=v.bottom + y_tolerance).contains(&h.top)
                    })
                    .map(move |v| Intersection { x: v.x0, y: h.top })
            })
            .collect();

        points.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
        points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
        points
    }
}

/// Sort edges by `key`, cut them into clusters whose keys lie within
/// `tolerance` of the cluster's first edge, and `set` each member to the
/// cluster mean.
fn snap_axis(
    edges: &mut [Edge],
    tolerance: f64,
    key: fn(&Edge) -> f64,
    set: fn(&mut Edge, f64),
) {
    edges.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut rest = edges;
    while let Some(first) = rest.first() {
        let anchor = key(first);
        let len = 1 + rest[1..]
            .iter()
            .take_while(|e| key(e) - anchor <= tolerance)
            .count();
        let (cluster, tail) = std::mem::take(&mut rest).split_at_mut(len);
        let mean = cluster.iter().map(key).sum::<f64>() / len as f64;
        for edge in cluster {
            set(edge, mean);
        }
        rest = tail;
    }
}

/// Sort edges along their lines and merge neighbours on the same `line` whose
/// `span`s overlap or are at most `tolerance` apart. `build` rebuilds an edge
/// with a wider span.
fn join_axis(
    mut edges: Vec<Edge>,
    tolerance: f64,
    line: fn(&Edge) -> f64,
    span: fn(&Edge) -> (f64, f64),
    build: fn(&Edge, f64, f64) -> Edge,
) -> Vec<Edge> {
    edges.sort_by(|a, b| {
        line(a)
            .total_cmp(&line(b))
            .then_with(|| span(a).0.total_cmp(&span(b).0))
    });

    let mut merged: Vec<Edge> = Vec::with_capacity(edges.len());
    for edge in edges {
        if let Some(last) = merged.last_mut() {
            let (start, end) = span(last);
            // Snapped edges on one line share the exact coordinate.
            let same_line = (line(last) - line(&edge)).abs() < 1e-9;
            if same_line && span(&edge).0 <= end + tolerance {
                *last = build(last, start, end.max(span(&edge).1));
                continue;
            }
        }
        merged.push(edge);
    }
    merged
}

/// An intersection point between horizontal and vertical edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub x: f64,
    pub y: f64,
}

/// Construct rectangular cells from a grid of intersection points.
///
/// For each pair of adjacent distinct rows and columns, a [`Cell`] is created
/// when all four corner intersections exist.
pub fn intersections_to_cells(intersections: &[Intersection]) -> Vec<Cell> {
    if intersections.is_empty() {
        return Vec::new();
    }

    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for pt in intersections {
        if !xs.iter().any(|&x| (x - pt.x).abs() < 1e-9) {
            xs.push(pt.x);
        }
        if !ys.iter().any(|&y| (y - pt.y).abs() < 1e-9) {
            ys.push(pt.y);
        }
    }
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);

    let has_point = |x: f64, y: f64| -> bool {
        intersections
            .iter()
            .any(|pt| (pt.x - x).abs() < 1e-9 && (pt.y - y).abs() < 1e-9)
    };

    let mut cells = Vec::new();
    for rows in ys.windows(2) {
        for cols in xs.windows(2) {
            let (x0, x1, top, bottom) = (cols[0], cols[1], rows[0], rows[1]);
            if has_point(x0, top) && has_point(x1, top) && has_point(x0, bottom) && has_point(x1, bottom)
            {
                cells.push(Cell {
                    bbox: BBox::new(x0, top, x1, bottom),
                    text: None,
                });
            }
        }
    }
    cells
}

/// Group adjacent cells into distinct tables.
///
/// Cells sharing a boundary segment are joined with union-find. Tables are
/// returned top-to-bottom, then left-to-right.
pub fn cells_to_tables(cells: Vec<Cell>) -> Vec<Table> {
    if cells.is_empty() {
        return Vec::new();
    }

    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if cells_share_edge(&cells[i], &cells[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }

    let mut tables: Vec<Table> = groups
        .into_values()
        .map(|indices| {
            let group: Vec<&Cell> = indices.iter().map(|&i| &cells[i]).collect();
            let bbox = group
                .iter()
                .skip(1)
                .fold(group[0].bbox, |acc, c| acc.union(&c.bbox));

            let mut row_map: BTreeMap<i64, Vec<Cell>> = BTreeMap::new();
            for cell in &group {
                row_map
                    .entry(float_key(cell.bbox.top))
                    .or_default()
                    .push((*cell).clone());
            }
            let rows: Vec<Vec<Cell>> = row_map
                .into_values()
                .map(|mut row| {
                    row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
                    row
                })
                .collect();

            let mut column_keys: Vec<i64> = group.iter().map(|c| float_key(c.bbox.x0)).collect();
            column_keys.sort_unstable();
            column_keys.dedup();
            let column_xs = column_keys.into_iter().map(|k| k as f64 / 1000.0).collect();

            Table {
                bbox,
                rows,
                column_xs,
            }
        })
        .collect();

    tables.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    tables
}

/// Check if two cells share an edge (a common boundary segment).
fn cells_share_edge(a: &Cell, b: &Cell) -> bool {
    let eps = 1e-6;

    let shared_vertical = ((a.bbox.x1 - b.bbox.x0).abs() < eps
        || (a.bbox.x0 - b.bbox.x1).abs() < eps)
        && a.bbox.top < b.bbox.bottom + eps
        && b.bbox.top < a.bbox.bottom + eps;

    let shared_horizontal = ((a.bbox.bottom - b.bbox.top).abs() < eps
        || (a.bbox.top - b.bbox.bottom).abs() < eps)
        && a.bbox.x0 < b.bbox.x1 + eps
        && b.bbox.x0 < a.bbox.x1 + eps;

    shared_vertical || shared_horizontal
}

/// Integer key for grouping coordinates (three decimal places).
fn float_key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// Fill each cell with the words whose center falls inside it.
///
/// Words inside a cell are grouped into lines by `y_tolerance`, joined with
/// spaces within a line and newlines between lines. Cells with no words keep
/// `text = None`.
pub fn fill_cells(table: &mut Table, words: &[Word], y_tolerance: f64) {
    for cell in table.rows.iter_mut().flatten() {
        let mut inside: Vec<&Word> = words
            .iter()
            .filter(|w| cell.bbox.contains_point(w.bbox.center()))
            .collect();
        if inside.is_empty() {
            cell.text = None;
            continue;
        }
        inside.sort_by(|a, b| crate::words::reading_order(a, b));

        let mut lines: Vec<Vec<&Word>> = Vec::new();
        for word in inside {
            match lines.last_mut() {
                Some(line) if (word.bbox.top - line[0].bbox.top).abs() <= y_tolerance => {
                    line.push(word)
                }
                _ => lines.push(vec![word]),
            }
        }

        let text = lines
            .iter_mut()
            .map(|line| {
                line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
                line.iter().map(|w| w.text.as_str()).collect::<Vec<_>>().join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");
        cell.text = Some(text);
    }
}

/// Runs the grid pipeline over a set of edges: length filter, snap, join,
/// intersections, cells, tables.
pub struct TableFinder<'s> {
    settings: &'s TableSettings,
}

impl<'s> TableFinder<'s> {
    pub fn new(settings: &'s TableSettings) -> Self {
        Self { settings }
    }

    /// Build tables from the given edges.
    pub fn find_tables(&self, edges: Vec<Edge>) -> Vec<Table> {
        let s = self.settings;
        let mut grid = GridEdges::new(edges, s.edge_min_length);
        if grid.is_empty() {
            return Vec::new();
        }

        grid.snap(s.snap_x_tolerance, s.snap_y_tolerance);
        let intersections = grid
            .join(s.join_x_tolerance, s.join_y_tolerance)
            .intersections(s.intersection_x_tolerance, s.intersection_y_tolerance);
        cells_to_tables(intersections_to_cells(&intersections))
    }
}
