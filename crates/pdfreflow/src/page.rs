//! Page type: one page's decoded geometry and its extraction.

use pdfreflow_core::{
    BBox, ExtractResult, ExtractWarning, PageError, PageGeometry, Ruling, TableCandidate,
    TableSettings, Word, extract_candidates, normalize_words, page_text, rank_candidates,
};

use crate::options::ReflowOptions;
use crate::result::PageExtractionResult;

/// A single page as delivered by the PDF decoding layer.
///
/// Holds the page's words and ruling geometry; the decoder owns everything
/// else (glyphs, image bytes).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    /// Page number (1-based).
    page_number: usize,
    /// Page width in points.
    width: f64,
    /// Page height in points.
    height: f64,
    /// Words in decoder order.
    words: Vec<Word>,
    /// Ruling line segments.
    #[cfg_attr(feature = "serde", serde(default))]
    rulings: Vec<Ruling>,
    /// Rectangles; each side may bound a table cell.
    #[cfg_attr(feature = "serde", serde(default))]
    rects: Vec<BBox>,
    /// Number of embedded raster images on the page.
    #[cfg_attr(feature = "serde", serde(default))]
    image_count: usize,
}

impl Page {
    /// Create a new page with the given metadata and words.
    pub fn new(page_number: usize, width: f64, height: f64, words: Vec<Word>) -> Self {
        Self {
            page_number,
            width,
            height,
            words,
            rulings: Vec::new(),
            rects: Vec::new(),
            image_count: 0,
        }
    }

    /// Create a new page with words and ruling geometry.
    pub fn with_geometry(
        page_number: usize,
        width: f64,
        height: f64,
        words: Vec<Word>,
        rulings: Vec<Ruling>,
        rects: Vec<BBox>,
    ) -> Self {
        Self {
            page_number,
            width,
            height,
            words,
            rulings,
            rects,
            image_count: 0,
        }
    }

    /// Set the embedded image count (builder style).
    pub fn with_image_count(mut self, image_count: usize) -> Self {
        self.image_count = image_count;
        self
    }

    /// Returns the page number (1-based).
    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Returns the page width in points.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the page height in points.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn rulings(&self) -> &[Ruling] {
        &self.rulings
    }

    pub fn rects(&self) -> &[BBox] {
        &self.rects
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    /// Check the page dimensions and word boxes.
    ///
    /// The page size must be finite and positive. Ruling geometry is not checked here: a bad ruling only disables the
    /// lattice strategy for this page.
    pub fn validate(&self) -> Result<(), PageError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(self.width) && positive(self.height)) {
            return Err(PageError::InvalidGeometry(format!(
                "page size {}x{}",
                self.width, self.height
            )));
        }
        if let Some((i, word)) = self
            .words
            .iter()
            .enumerate()
            .find(|(_, w)| !w.bbox.is_finite())
        {
            return Err(PageError::InvalidGeometry(format!(
                "word {i} ({:?}) has a non-finite box",
                word.text
            )));
        }
        Ok(())
    }

    /// Detect, score and rank this page's tables.
    ///
    /// Word text is normalized with `options.unicode_norm` first, so cells
    /// match what [`Page::extract`] reports. Strategy failures come back as
    /// warnings tagged with this page.
    pub fn find_tables(&self, options: &ReflowOptions) -> ExtractResult<Vec<TableCandidate>> {
        let words = normalize_words(&self.words, options.unicode_norm);
        find_tables_in(self.page_number, &words, self, &options.tables)
    }

    /// Extract text and tables from this page.
    ///
    /// Invalid geometry yields an empty result carrying the error instead of
    /// failing.
    pub fn extract(&self, options: &ReflowOptions) -> PageExtractionResult {
        if let Err(err) = self.validate() {
            tracing::error!(page = self.page_number, error = %err, "page failed");
            return PageExtractionResult::failed(self.page_number, self.image_count, err);
        }

        let words = normalize_words(&self.words, options.unicode_norm);
        let tables = find_tables_in(self.page_number, &words, self, &options.tables);
        let boxes: Vec<BBox> = tables.value.iter().map(|t| t.bbox).collect();
        let text = page_text(&words, &boxes, self.width, &options.columns, &options.lines);

        tracing::debug!(
            page = self.page_number,
            words = words.len(),
            tables = tables.value.len(),
            "page extracted"
        );
        PageExtractionResult::new(
            self.page_number,
            text,
            tables.value,
            words.len(),
            self.image_count,
            tables.warnings,
        )
    }
}

fn find_tables_in(
    page_number: usize,
    words: &[Word],
    page: &Page,
    settings: &TableSettings,
) -> ExtractResult<Vec<TableCandidate>> {
    let geometry = PageGeometry {
        words,
        rulings: &page.rulings,
        rects: &page.rects,
    };
    let raw = extract_candidates(&geometry, settings);
    ExtractResult {
        value: rank_candidates(raw.value, settings.overlap_threshold),
        warnings: raw
            .warnings
            .into_iter()
            .map(|w: ExtractWarning| w.on_page(page_number))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfreflow_core::{Strategy, WarningCode};

    fn make_word(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Word {
        Word::new(text, x0, top, x1, bottom)
    }

    fn ruled_table_page() -> Page {
        let words = vec![
            make_word("Name", 72.0, 104.0, 110.0, 114.0),
            make_word("Qty", 200.0, 104.0, 225.0, 114.0),
            make_word("Unit", 320.0, 104.0, 350.0, 114.0),
            make_word("Bolt", 72.0, 124.0, 100.0, 134.0),
            make_word("10", 200.0, 124.0, 215.0, 134.0),
            make_word("pcs", 320.0, 124.0, 345.0, 134.0),
        ];
        let mut rulings: Vec<Ruling> = [100.0, 120.0, 140.0]
            .iter()
            .map(|&y| Ruling::horizontal(60.0, y, 400.0))
            .collect();
        for x in [60.0, 160.0, 280.0, 400.0] {
            rulings.push(Ruling::vertical(x, 100.0, 140.0));
        }
        Page::with_geometry(1, 612.0, 792.0, words, rulings, Vec::new())
    }

    #[test]
    fn test_page_creation() {
        let page = Page::new(3, 612.0, 792.0, vec![]).with_image_count(2);
        assert_eq!(page.page_number(), 3);
        assert_eq!(page.width(), 612.0);
        assert_eq!(page.height(), 792.0);
        assert_eq!(page.image_count(), 2);
        assert!(page.words().is_empty());
        assert!(page.rulings().is_empty());
        assert!(page.rects().is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_page_size() {
        let page = Page::new(1, 0.0, 792.0, vec![]);
        assert!(matches!(page.validate(), Err(PageError::InvalidGeometry(_))));
    }

    #[test]
    fn test_validate_rejects_nan_word() {
        let page = Page::new(1, 612.0, 792.0, vec![make_word("x", f64::NAN, 0.0, 1.0, 1.0)]);
        assert!(matches!(page.validate(), Err(PageError::InvalidGeometry(_))));
    }

    #[test]
    fn test_find_tables_ranks_lattice_first() {
        let page = ruled_table_page();
        let tables = page.find_tables(&ReflowOptions::default());
        assert!(tables.warnings.is_empty());
        assert_eq!(tables.value.len(), 1);
        assert_eq!(tables.value[0].strategy, Strategy::Lattice);
        assert_eq!(tables.value[0].header(), ["Name", "Qty", "Unit"]);
    }

    #[test]
    fn test_extract_excludes_table_words_from_text() {
        let mut page = ruled_table_page();
        page.words.push(make_word("Intro", 72.0, 60.0, 110.0, 72.0));
        let result = page.extract(&ReflowOptions::default());
        assert_eq!(result.text, "Intro");
        assert_eq!(result.tables.len(), 1);
        assert_eq!(result.word_count, 7);
        assert!(!result.likely_scanned);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_extract_bad_ruling_is_strategy_warning() {
        let mut page = ruled_table_page();
        page.rulings.push(Ruling::horizontal(0.0, f64::NAN, 10.0));
        let result = page.extract(&ReflowOptions::default());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, WarningCode::StrategyFailure);
        assert_eq!(result.warnings[0].page, Some(1));
        // Stream still finds the aligned table.
        assert_eq!(result.tables.len(), 1);
        assert_eq!(result.tables[0].strategy, Strategy::Stream);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_extract_invalid_page_records_error() {
        let page = Page::new(5, f64::INFINITY, 792.0, vec![]).with_image_count(1);
        let result = page.extract(&ReflowOptions::default());
        assert!(result.text.is_empty());
        assert!(result.tables.is_empty());
        assert!(!result.likely_scanned);
        assert!(result.error.is_some());
        assert_eq!(result.warnings[0].code, WarningCode::PageFailure);
        assert_eq!(result.image_count, 1);
    }

    #[test]
    fn test_extract_applies_unicode_norm() {
        let page = Page::new(1, 612.0, 792.0, vec![make_word("\u{FB01}ne", 72.0, 100.0, 100.0, 112.0)]);
        let options = ReflowOptions {
            unicode_norm: pdfreflow_core::UnicodeNorm::Nfkc,
            ..ReflowOptions::default()
        };
        assert_eq!(page.extract(&options).text, "fine");
    }

    #[test]
    fn test_find_tables_applies_unicode_norm() {
        let mut page = ruled_table_page();
        // Fullwidth digits in the quantity cell.
        page.words[4].text = "\u{FF11}\u{FF10}".to_string();
        let options = ReflowOptions {
            unicode_norm: pdfreflow_core::UnicodeNorm::Nfkc,
            ..ReflowOptions::default()
        };
        let tables = page.find_tables(&options);
        assert_eq!(tables.value[0].cells[1], ["Bolt", "10", "pcs"]);
        assert_eq!(tables.value, page.extract(&options).tables);

        let raw = page.find_tables(&ReflowOptions::default());
        assert_eq!(raw.value[0].cells[1][1], "\u{FF11}\u{FF10}");
    }
}
