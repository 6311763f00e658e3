//! Text summary rendering for the terminal.
//!
//! Ranks creatives by a chosen metric and renders a top-N table plus the
//! period totals. Values are printed raw; locale/currency formatting is
//! the consumer's concern.

use crate::aggregator::{CreativeMetrics, ReportTotals};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Metric a summary table can rank by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMetric {
    AmountSpent,
    GrossSales,
    Profit,
    Roi,
    SalesCount,
}

impl SummaryMetric {
    /// Column header for the table
    pub fn label(&self) -> &'static str {
        match self {
            SummaryMetric::AmountSpent => "SPENT",
            SummaryMetric::GrossSales => "GROSS SALES",
            SummaryMetric::Profit => "PROFIT",
            SummaryMetric::Roi => "ROI %",
            SummaryMetric::SalesCount => "SALES",
        }
    }

    /// The ranked value for one row
    fn value(&self, creative: &CreativeMetrics) -> f64 {
        match self {
            SummaryMetric::AmountSpent => creative.amount_spent,
            SummaryMetric::GrossSales => creative.gross_sales,
            SummaryMetric::Profit => creative.profit,
            SummaryMetric::Roi => creative.roi,
            SummaryMetric::SalesCount => creative.sales_count as f64,
        }
    }

    /// The value ordering is computed on. Profit ranks by magnitude so a
    /// heavily negative creative surfaces next to the big winners.
    fn sort_value(&self, creative: &CreativeMetrics) -> f64 {
        match self {
            SummaryMetric::Profit => creative.profit.abs(),
            _ => self.value(creative),
        }
    }
}

impl FromStr for SummaryMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spent" | "amount_spent" => Ok(SummaryMetric::AmountSpent),
            "gross_sales" | "revenue" => Ok(SummaryMetric::GrossSales),
            "profit" => Ok(SummaryMetric::Profit),
            "roi" => Ok(SummaryMetric::Roi),
            "sales" | "sales_count" => Ok(SummaryMetric::SalesCount),
            other => Err(format!(
                "unknown metric '{}' (expected spent, gross_sales, profit, roi, or sales)",
                other
            )),
        }
    }
}

impl fmt::Display for SummaryMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryMetric::AmountSpent => "spent",
            SummaryMetric::GrossSales => "gross_sales",
            SummaryMetric::Profit => "profit",
            SummaryMetric::Roi => "roi",
            SummaryMetric::SalesCount => "sales",
        };
        write!(f, "{}", name)
    }
}

/// Rank creatives by a metric and take the top N
///
/// **Public** - display-side sorting lives here, not in the aggregator
pub fn top_creatives<'a>(
    creatives: &'a [CreativeMetrics],
    metric: SummaryMetric,
    top_n: usize,
) -> Vec<&'a CreativeMetrics> {
    let mut ranked: Vec<&CreativeMetrics> = creatives.iter().collect();

    ranked.sort_by(|a, b| {
        metric
            .sort_value(b)
            .partial_cmp(&metric.sort_value(a))
            .unwrap_or(Ordering::Equal)
    });

    ranked.truncate(top_n);
    ranked
}

/// Render the top-N table and totals block
///
/// **Public** - printed by the report command with --summary
pub fn generate_text_summary(
    creatives: &[CreativeMetrics],
    totals: &ReportTotals,
    metric: SummaryMetric,
    max_lines: usize,
) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  TOP CREATIVES BY {}", metric.label()));
    lines.push(format!("  {:-<66}", ""));
    lines.push(format!(
        "  {:<40} {:>12} {:>12}",
        "Creative",
        metric.label(),
        "SALES"
    ));
    lines.push(format!("  {:-<66}", ""));

    for creative in top_creatives(creatives, metric, max_lines) {
        lines.push(format!(
            "  {:<40} {:>12.2} {:>12}",
            truncate_name(&creative.creative_name, 40),
            metric.value(creative),
            creative.sales_count
        ));
    }

    if creatives.is_empty() {
        lines.push("  (no creatives in the selected period)".to_string());
    }

    lines.push(format!("  {:-<66}", ""));
    lines.push(format!(
        "  Totals: spent {:.2} | revenue {:.2} | orders {} | avg ticket {:.2} | avg ROI {:.2}",
        totals.total_spent,
        totals.total_revenue,
        totals.total_orders,
        totals.avg_ticket,
        totals.avg_roi
    ));

    lines.join("\n")
}

/// Truncate a display name without splitting characters
fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_string();
    }

    let kept: String = name.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
