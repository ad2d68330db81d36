//! Shared builders for synthetic decoded pages.
//!
//! Words are laid out with a fixed advance of 5pt per character and a 3pt gap
//! between words, the way a decoder reports a simple Helvetica line.

#![allow(dead_code)]

use pdfreflow::{Page, Ruling, Word};

// ─── Layout constants ───────────────────────────────────────────────────────

pub const PAGE_WIDTH: f64 = 612.0;
pub const PAGE_HEIGHT: f64 = 792.0;

/// Advance per character.
pub const CHAR_WIDTH: f64 = 5.0;
/// Gap between words on a line.
pub const WORD_GAP: f64 = 3.0;
/// Glyph height.
pub const LINE_HEIGHT: f64 = 10.0;

/// Left edge of the text in each table column.
pub const TABLE_TEXT_X: [f64; 3] = [72.0, 220.0, 370.0];
/// Ruling positions separating table columns.
pub const TABLE_RULE_X: [f64; 4] = [60.0, 200.0, 350.0, 500.0];
/// Distance between table rows.
pub const ROW_PITCH: f64 = 20.0;

// ─── Builders ───────────────────────────────────────────────────────────────

/// Words of a single line of text starting at `(x0, top)`.
pub fn line_words(x0: f64, top: f64, text: &str) -> Vec<Word> {
    let mut x = x0;
    text.split_whitespace()
        .map(|t| {
            let width = CHAR_WIDTH * t.chars().count() as f64;
            let word = Word::new(t, x, top, x + width, top + LINE_HEIGHT);
            x += width + WORD_GAP;
            word
        })
        .collect()
}

/// Builder for one synthetic page.
pub struct PageBuilder {
    number: usize,
    words: Vec<Word>,
    rulings: Vec<Ruling>,
    images: usize,
}

impl PageBuilder {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            words: Vec::new(),
            rulings: Vec::new(),
            images: 0,
        }
    }

    /// Add one line of prose.
    pub fn line(mut self, x0: f64, top: f64, text: &str) -> Self {
        self.words.extend(line_words(x0, top, text));
        self
    }

    /// Add a prose column: consecutive lines 14pt apart.
    pub fn column(mut self, x0: f64, top: f64, lines: &[&str]) -> Self {
        for (i, text) in lines.iter().enumerate() {
            self.words.extend(line_words(x0, top + 14.0 * i as f64, text));
        }
        self
    }

    /// Add a three-column table whose first row starts at `top`; with
    /// `ruled`, ruling lines are drawn around every cell.
    pub fn table(mut self, top: f64, rows: &[[&str; 3]], ruled: bool) -> Self {
        for (r, row) in rows.iter().enumerate() {
            let y = top + ROW_PITCH * r as f64 + 4.0;
            for (c, text) in row.iter().enumerate() {
                self.words.extend(line_words(TABLE_TEXT_X[c], y, text));
            }
        }
        if ruled {
            let bottom = top + ROW_PITCH * rows.len() as f64;
            for r in 0..=rows.len() {
                let y = top + ROW_PITCH * r as f64;
                self.rulings.push(Ruling::horizontal(TABLE_RULE_X[0], y, TABLE_RULE_X[3]));
            }
            for x in TABLE_RULE_X {
                self.rulings.push(Ruling::vertical(x, top, bottom));
            }
        }
        self
    }

    /// Add a ruling segment as-is.
    pub fn ruling(mut self, ruling: Ruling) -> Self {
        self.rulings.push(ruling);
        self
    }

    pub fn images(mut self, count: usize) -> Self {
        self.images = count;
        self
    }

    /// Reverse the word order, as some decoders emit content streams.
    pub fn reversed(mut self) -> Self {
        self.words.reverse();
        self
    }

    pub fn build(self) -> Page {
        Page::with_geometry(
            self.number,
            PAGE_WIDTH,
            PAGE_HEIGHT,
            self.words,
            self.rulings,
            Vec::new(),
        )
        .with_image_count(self.images)
    }
}

// ─── Fixtures ───────────────────────────────────────────────────────────────

pub const LEFT_COLUMN: [&str; 3] = [
    "Sales rose in the third quarter",
    "driven by strong demand for",
    "spare parts and tools",
];

pub const RIGHT_COLUMN: [&str; 3] = [
    "Costs stayed flat while",
    "margins grew by two points",
    "across all regions",
];

pub const HEADER: [&str; 3] = ["Item", "Qty", "Price"];

/// Two-page report: page 1 has two prose columns above a ruled table, page 2
/// continues the table without ruling lines.
pub fn two_page_report() -> Vec<Page> {
    let page1 = PageBuilder::new(1)
        .column(72.0, 100.0, &LEFT_COLUMN)
        .column(330.0, 100.0, &RIGHT_COLUMN)
        .table(
            200.0,
            &[HEADER, ["Bolt", "10", "0,50"], ["Nut", "25", "0,20"]],
            true,
        )
        .images(1)
        .build();
    let page2 = PageBuilder::new(2)
        .line(72.0, 60.0, "Continued from page one")
        .table(
            100.0,
            &[HEADER, ["Washer", "100", "0,05"], ["Screw", "40", "0,15"]],
            false,
        )
        .build();
    vec![page1, page2]
}
