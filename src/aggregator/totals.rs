//! Period KPI totals over the aggregated creatives.

use super::metrics::CreativeMetrics;
use serde::{Deserialize, Serialize};

/// Headline totals for the reporting period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportTotals {
    pub total_spent: f64,
    pub total_revenue: f64,
    pub total_orders: u64,

    /// Revenue per order
    pub avg_ticket: f64,

    /// (revenue - spend) / spend, rounded to two decimals. A ratio,
    /// not a percentage.
    pub avg_roi: f64,
}

/// Compute the period totals
///
/// **Public** - consumed by the report document and the text summary
pub fn calculate_totals(creatives: &[CreativeMetrics]) -> ReportTotals {
    let total_spent: f64 = creatives.iter().map(|c| c.amount_spent).sum();
    let total_revenue: f64 = creatives.iter().map(|c| c.gross_sales).sum();
    let total_orders: u64 = creatives.iter().map(|c| c.sales_count).sum();

    let avg_ticket = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    let avg_roi = if total_spent > 0.0 {
        round_two((total_revenue - total_spent) / total_spent)
    } else {
        0.0
    };

    ReportTotals {
        total_spent,
        total_revenue,
        total_orders,
        avg_ticket,
        avg_roi,
    }
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::records::{parse_insights, parse_sales};
    use serde_json::json;

    fn sample_creatives() -> Vec<CreativeMetrics> {
        let insights = parse_insights(&json!([
            {"creative_name": "A", "amount_spent": 10000.0},
            {"creative_name": "B", "amount_spent": 5000.0}
        ]))
        .unwrap();
        let sales = parse_sales(&json!([
            {"creative_name": "A", "gross_value": 30000.0, "net_value": 28000.0},
            {"creative_name": "B", "gross_value": 15000.0, "net_value": 14000.0},
            {"creative_name": "B", "gross_value": 0.0, "net_value": 0.0}
        ]))
        .unwrap();

        crate::aggregator::aggregate_creatives(&insights, &sales)
    }

    #[test]
    fn test_totals_over_aggregated_rows() {
        let totals = calculate_totals(&sample_creatives());

        assert_eq!(totals.total_spent, 15000.0);
        assert_eq!(totals.total_revenue, 45000.0);
        assert_eq!(totals.total_orders, 3);
        assert_eq!(totals.avg_ticket, 15000.0);
        assert_eq!(totals.avg_roi, 2.0);
    }

    #[test]
    fn test_totals_guards_on_empty_input() {
        let totals = calculate_totals(&[]);

        assert_eq!(totals.total_orders, 0);
        assert_eq!(totals.avg_ticket, 0.0);
        assert_eq!(totals.avg_roi, 0.0);
    }

    #[test]
    fn test_avg_roi_rounds_to_two_decimals() {
        let insights = parse_insights(&json!([
            {"creative_name": "A", "amount_spent": 3000.0}
        ]))
        .unwrap();
        let sales = parse_sales(&json!([
            {"creative_name": "A", "gross_value": 10000.0, "net_value": 9000.0}
        ]))
        .unwrap();

        let creatives = crate::aggregator::aggregate_creatives(&insights, &sales);
        let totals = calculate_totals(&creatives);

        // (10000 - 3000) / 3000 = 2.333... -> 2.33
        assert_eq!(totals.avg_roi, 2.33);
    }
}
