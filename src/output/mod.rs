pub mod formatter;

pub use formatter::{
    format_breakdown, format_conclusion, format_json, format_score_table, format_tsv, round2,
    should_use_colors,
};

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Ranked table followed by the conclusion
    #[default]
    Table,
    /// Tab-separated rows, no header
    Tsv,
    /// Pretty-printed JSON report
    Json,
}
