//! Record ingestion and report schema definitions.
//!
//! This module handles:
//! - Parsing raw JSON payloads into typed insight/sale records
//! - Upstream date-range and status filtering
//! - Defining the report output schema

pub mod records;
pub mod schema;

// Re-export main types
pub use records::{
    filter_insights, filter_sales, parse_insights, parse_record_date, parse_sales,
    RawInsightRecord, RawSaleRecord,
};
pub use schema::{to_report, CreativeReport, ReportPeriod};
