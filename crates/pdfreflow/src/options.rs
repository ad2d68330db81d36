//! Document-level configuration.

use pdfreflow_core::{ColumnOptions, LineOptions, TableSettings, UnicodeNorm};

/// Options controlling a reflow run.
///
/// Every field has a default, so a partial JSON object (with the `serde`
/// feature) or struct-update syntax is enough to override a single knob.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReflowOptions {
    /// Column segmentation for body text.
    pub columns: ColumnOptions,
    /// Line assembly within each column.
    pub lines: LineOptions,
    /// Table detection, scoring and deduplication.
    pub tables: TableSettings,
    /// Unicode normalization applied to word text before any analysis.
    pub unicode_norm: UnicodeNorm,
    /// Process pages concurrently when the `parallel` feature is enabled.
    pub parallel: bool,
}

impl Default for ReflowOptions {
    fn default() -> Self {
        Self {
            columns: ColumnOptions::default(),
            lines: LineOptions::default(),
            tables: TableSettings::default(),
            unicode_norm: UnicodeNorm::None,
            parallel: true,
        }
    }
}
