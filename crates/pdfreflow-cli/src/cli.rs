use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pdfreflow::{ReflowOptions, UnicodeNorm};

/// Reconstruct reading-order text and merged tables from decoded PDF pages.
///
/// FILE is a JSON document `{"filename": ..., "pages": [...]}` where each
/// page carries `page_number`, `width`, `height`, `words` and optionally
/// `rulings`, `rects` and `image_count`.
#[derive(Debug, Parser)]
#[command(name = "pdfreflow", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print page text in reading order, table regions excluded
    Text {
        /// Path to the page JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        #[command(flatten)]
        reflow: ReflowArgs,
    },

    /// Detect tables and merge them across pages
    Tables {
        /// Path to the page JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        reflow: ReflowArgs,
    },

    /// Print document metadata as JSON
    Meta {
        /// Path to the page JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<String>,

        #[command(flatten)]
        reflow: ReflowArgs,
    },
}

/// Layout and detection knobs shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ReflowArgs {
    /// Multiplier on the median gap between word centers for column breaks
    #[arg(long, default_value_t = 1.7)]
    pub gap_factor: f64,

    /// Minimum gap between columns in points
    #[arg(long, default_value_t = 40.0)]
    pub min_column_gap: f64,

    /// Vertical tolerance for grouping words into lines
    #[arg(long, default_value_t = 2.0)]
    pub line_tolerance: f64,

    /// Snap tolerance for aligning nearby ruling edges
    #[arg(long, default_value_t = 3.0)]
    pub snap_tolerance: f64,

    /// Horizontal gap that splits a row into cells for borderless tables
    #[arg(long, default_value_t = 10.0)]
    pub cell_gap: f64,

    /// Apply Unicode normalization to word text
    #[arg(long, value_enum)]
    pub unicode_norm: Option<UnicodeNormArg>,

    /// Process pages one after another instead of in parallel
    #[arg(long)]
    pub sequential: bool,
}

impl ReflowArgs {
    pub fn to_options(&self) -> ReflowOptions {
        let mut options = ReflowOptions::default();
        options.columns.gap_factor = self.gap_factor;
        options.columns.min_gap = self.min_column_gap;
        options.lines.y_tolerance = self.line_tolerance;
        options.tables.snap_x_tolerance = self.snap_tolerance;
        options.tables.snap_y_tolerance = self.snap_tolerance;
        options.tables.stream_cell_gap = self.cell_gap;
        options.unicode_norm = self
            .unicode_norm
            .as_ref()
            .map_or(UnicodeNorm::None, UnicodeNormArg::to_unicode_norm);
        options.parallel = !self.sequential;
        options
    }
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// Plain text with a banner per page
    Text,
    /// JSON output
    Json,
}

/// Output format for the tables subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Aligned grid per table
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

/// Unicode normalization form for CLI arguments.
#[derive(Debug, Clone, ValueEnum)]
pub enum UnicodeNormArg {
    /// Canonical Decomposition, followed by Canonical Composition
    Nfc,
    /// Compatibility Decomposition, followed by Canonical Composition
    Nfkc,
}

impl UnicodeNormArg {
    /// Convert to the core library's `UnicodeNorm` enum.
    pub fn to_unicode_norm(&self) -> UnicodeNorm {
        match self {
            UnicodeNormArg::Nfc => UnicodeNorm::Nfc,
            UnicodeNormArg::Nfkc => UnicodeNorm::Nfkc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_text_subcommand_with_file() {
        let cli = Cli::parse_from(["pdfreflow", "text", "doc.json"]);
        match cli.command {
            Commands::Text { ref file, .. } => {
                assert_eq!(file, &PathBuf::from("doc.json"));
            }
            _ => panic!("expected Text subcommand"),
        }
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parse_text_with_pages_and_format() {
        let cli = Cli::parse_from([
            "pdfreflow",
            "text",
            "doc.json",
            "--pages",
            "1,3-5",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Text {
                ref pages,
                ref format,
                ..
            } => {
                assert_eq!(pages.as_deref(), Some("1,3-5"));
                assert!(matches!(format, TextFormat::Json));
            }
            _ => panic!("expected Text subcommand"),
        }
    }

    #[test]
    fn parse_tables_default_format_is_text() {
        let cli = Cli::parse_from(["pdfreflow", "tables", "doc.json"]);
        match cli.command {
            Commands::Tables { ref format, .. } => {
                assert!(matches!(format, OutputFormat::Text));
            }
            _ => panic!("expected Tables subcommand"),
        }
    }

    #[test]
    fn parse_tables_csv() {
        let cli = Cli::parse_from(["pdfreflow", "tables", "doc.json", "--format", "csv"]);
        match cli.command {
            Commands::Tables { ref format, .. } => {
                assert!(matches!(format, OutputFormat::Csv));
            }
            _ => panic!("expected Tables subcommand"),
        }
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::parse_from(["pdfreflow", "-vv", "meta", "doc.json"]);
        assert_eq!(cli.verbose, 2);
        let cli = Cli::parse_from(["pdfreflow", "meta", "doc.json", "-v"]);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn default_reflow_args_match_library_defaults() {
        let cli = Cli::parse_from(["pdfreflow", "meta", "doc.json"]);
        match cli.command {
            Commands::Meta { ref reflow, .. } => {
                assert_eq!(reflow.to_options(), ReflowOptions::default());
            }
            _ => panic!("expected Meta subcommand"),
        }
    }

    #[test]
    fn reflow_args_override_options() {
        let cli = Cli::parse_from([
            "pdfreflow",
            "text",
            "doc.json",
            "--min-column-gap",
            "25",
            "--cell-gap",
            "6",
            "--unicode-norm",
            "nfkc",
            "--sequential",
        ]);
        match cli.command {
            Commands::Text { ref reflow, .. } => {
                let options = reflow.to_options();
                assert_eq!(options.columns.min_gap, 25.0);
                assert_eq!(options.tables.stream_cell_gap, 6.0);
                assert_eq!(options.unicode_norm, UnicodeNorm::Nfkc);
                assert!(!options.parallel);
            }
            _ => panic!("expected Text subcommand"),
        }
    }
}
