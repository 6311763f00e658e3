//! Report JSON schema definitions.
//!
//! This module defines the structure of the report files we write to
//! disk. Schema is versioned to allow future evolution.

use crate::aggregator::{CreativeMetrics, CreativeRanking, MissingDataStats, ReportTotals};
use crate::utils::config::SCHEMA_VERSION;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Reporting period the caller filtered to, if any
    pub period: ReportPeriod,

    /// Headline KPI totals
    pub totals: ReportTotals,

    /// One aggregated row per canonical creative
    pub creatives: Vec<CreativeMetrics>,

    /// Sale-side revenue ranking by stored spelling
    pub sales_ranking: Vec<CreativeRanking>,

    /// How much of the sales table lacks creative attribution
    pub missing_data: MissingDataStats,
}

/// Reporting period bounds (either side may be open)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Assemble the final report document
///
/// **Public** - used by commands to create the output file
pub fn to_report(
    creatives: Vec<CreativeMetrics>,
    sales_ranking: Vec<CreativeRanking>,
    totals: ReportTotals,
    missing_data: MissingDataStats,
    period: ReportPeriod,
) -> CreativeReport {
    use chrono::Utc;

    CreativeReport {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        period,
        totals,
        creatives,
        sales_ranking,
        missing_data,
    }
}
