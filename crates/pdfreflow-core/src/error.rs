//! Error and warning types.
//!
//! Provides [`DetectError`] for a single table-detection strategy failing on a
//! page and [`PageError`] for a page that could not be processed at all.
//! Either is recorded as an [`ExtractWarning`] without stopping the document;
//! [`ExtractResult`] pairs a value with the warnings collected for it.

use std::fmt;

use thiserror::Error;

use crate::detect::Strategy;

/// Failure of one table-detection strategy on one page.
///
/// Always recovered as "zero candidates" for that strategy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectError {
    /// An input coordinate was NaN or infinite.
    #[error("non-finite geometry in {0}")]
    NonFiniteGeometry(&'static str),
}

/// Failure of a whole page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    /// Page dimensions or word boxes were not finite.
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    /// Processing the page panicked.
    #[error("page processing panicked: {0}")]
    Panicked(String),
}

/// Machine-readable warning code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum WarningCode {
    /// A detection strategy failed and contributed no candidates.
    StrategyFailure,
    /// The page failed and was recorded empty.
    PageFailure,
}

impl WarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &str {
        match self {
            WarningCode::StrategyFailure => "STRATEGY_FAILURE",
            WarningCode::PageFailure => "PAGE_FAILURE",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue encountered while extracting a page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    /// Machine-readable warning code.
    pub code: WarningCode,
    /// Human-readable description of the warning.
    pub description: String,
    /// Page number (1-based) where the warning occurred, if known.
    pub page: Option<usize>,
    /// Strategy that failed, for [`WarningCode::StrategyFailure`].
    pub strategy: Option<Strategy>,
}

impl ExtractWarning {
    /// Warning for a failed detection strategy.
    pub fn strategy_failure(strategy: Strategy, err: &DetectError) -> Self {
        Self {
            code: WarningCode::StrategyFailure,
            description: err.to_string(),
            page: None,
            strategy: Some(strategy),
        }
    }

    /// Warning for a failed page.
    pub fn page_failure(page: usize, err: &PageError) -> Self {
        Self {
            code: WarningCode::PageFailure,
            description: err.to_string(),
            page: Some(page),
            strategy: None,
        }
    }

    /// Attach a page number.
    pub fn on_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {page})")?;
        }
        if let Some(strategy) = self.strategy {
            write!(f, " ({strategy})")?;
        }
        Ok(())
    }
}

/// A value produced with best-effort recovery, plus the warnings collected
/// along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractResult<T> {
    pub value: T,
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    /// Wrap a value with no warnings.
    pub fn ok(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Whether any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
