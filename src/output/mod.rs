//! Output writers for report data.
//!
//! This module handles:
//! - JSON reports (write and read back)
//! - Text summaries for the terminal

pub mod json;
pub mod summary;

// Re-export main functions
pub use json::{read_report, write_report};
pub use summary::{generate_text_summary, top_creatives, SummaryMetric};
