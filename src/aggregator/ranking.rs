//! Sale-side revenue ranking and missing-attribution analysis.
//!
//! The ranking reports spellings as stored (no standardization): it is a
//! data-quality view of the sales table, and collapsing names here would
//! hide exactly the drift the ranking is used to spot. Rows with no
//! creative attribution are bucketed under a fixed label and also
//! summarized separately.

use super::num_or_zero;
use crate::ingest::records::RawSaleRecord;
use crate::utils::config::{COMPLETED_STATUSES, MISSING_CREATIVE_LABEL};
use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Ranking row for one stored creative name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeRanking {
    pub creative_name: String,

    /// Number of sale rows
    pub total_sales: u64,

    /// Summed net value
    pub total_revenue: f64,

    /// Revenue per sale
    pub avg_order_value: f64,

    /// Percentage of rows with a completed status
    pub completion_rate: f64,
}

/// How much of the sales table lacks creative attribution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissingDataStats {
    pub total_sales: u64,
    pub sales_with_missing_creative: u64,
    pub percentage_missing: f64,
    pub missing_revenue: f64,
}

/// Build the revenue ranking over sale rows
///
/// **Public** - output is sorted by total revenue, descending
pub fn build_sales_ranking(sales: &[RawSaleRecord]) -> Vec<CreativeRanking> {
    let mut buckets: HashMap<String, (u64, f64, u64)> = HashMap::new();

    for sale in sales {
        let name = ranking_name(&sale.creative_name);
        let bucket = buckets.entry(name).or_insert((0, 0.0, 0));

        bucket.0 += 1;
        bucket.1 += num_or_zero(sale.net_value);
        if is_completed(sale.status.as_deref()) {
            bucket.2 += 1;
        }
    }

    let mut ranking: Vec<CreativeRanking> = buckets
        .into_iter()
        .map(|(creative_name, (total_sales, total_revenue, completed_sales))| CreativeRanking {
            creative_name,
            total_sales,
            total_revenue,
            avg_order_value: if total_sales > 0 {
                total_revenue / total_sales as f64
            } else {
                0.0
            },
            completion_rate: if total_sales > 0 {
                (completed_sales as f64 / total_sales as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(Ordering::Equal)
    });

    debug!("Ranked {} creative names from {} sale rows", ranking.len(), sales.len());

    ranking
}

/// Summarize sale rows with no creative attribution
///
/// **Public** - companion stats for the ranking view
pub fn missing_data_stats(sales: &[RawSaleRecord]) -> MissingDataStats {
    let total_sales = sales.len() as u64;
    let mut missing = 0u64;
    let mut missing_revenue = 0.0;

    for sale in sales {
        if sale.creative_name.trim().is_empty() {
            missing += 1;
            missing_revenue += num_or_zero(sale.net_value);
        }
    }

    MissingDataStats {
        total_sales,
        sales_with_missing_creative: missing,
        percentage_missing: if total_sales > 0 {
            (missing as f64 / total_sales as f64) * 100.0
        } else {
            0.0
        },
        missing_revenue,
    }
}

/// Trimmed stored name, or the missing-attribution label
fn ranking_name(creative_name: &str) -> String {
    let trimmed = creative_name.trim();
    if trimmed.is_empty() {
        MISSING_CREATIVE_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_completed(status: Option<&str>) -> bool {
    match status {
        Some(status) => COMPLETED_STATUSES.contains(&status),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sales_from(value: serde_json::Value) -> Vec<RawSaleRecord> {
        crate::ingest::records::parse_sales(&value).unwrap()
    }

    #[test]
    fn test_ranking_sorted_by_revenue() {
        let sales = sales_from(json!([
            {"creative_name": "A", "net_value": 100.0, "status": "completed"},
            {"creative_name": "B", "net_value": 300.0, "status": "pending"},
            {"creative_name": "A", "net_value": 50.0, "status": "Completed"}
        ]));

        let ranking = build_sales_ranking(&sales);

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].creative_name, "B");
        assert_eq!(ranking[0].total_revenue, 300.0);
        assert_eq!(ranking[1].creative_name, "A");
        assert_eq!(ranking[1].total_sales, 2);
        assert_eq!(ranking[1].avg_order_value, 75.0);
        assert_eq!(ranking[1].completion_rate, 100.0);
        assert_eq!(ranking[0].completion_rate, 0.0);
    }

    #[test]
    fn test_unattributed_rows_get_the_missing_label() {
        let sales = sales_from(json!([
            {"creative_name": "", "net_value": 40.0},
            {"creative_name": "   ", "net_value": 10.0},
            {"creative_name": "A", "net_value": 5.0}
        ]));

        let ranking = build_sales_ranking(&sales);

        assert_eq!(ranking[0].creative_name, MISSING_CREATIVE_LABEL);
        assert_eq!(ranking[0].total_revenue, 50.0);
        assert_eq!(ranking[0].total_sales, 2);
    }

    #[test]
    fn test_ranking_does_not_standardize_spellings() {
        let sales = sales_from(json!([
            {"creative_name": "Creative A", "net_value": 10.0},
            {"creative_name": "creative a", "net_value": 20.0}
        ]));

        let ranking = build_sales_ranking(&sales);

        // Two rows: the ranking reports the stored spellings
        assert_eq!(ranking.len(), 2);
    }

    #[test]
    fn test_missing_data_stats() {
        let sales = sales_from(json!([
            {"creative_name": "", "net_value": 40.0},
            {"creative_name": "A", "net_value": 60.0},
            {"creative_name": "A", "net_value": 100.0},
            {"creative_name": "  ", "net_value": 10.0}
        ]));

        let stats = missing_data_stats(&sales);

        assert_eq!(stats.total_sales, 4);
        assert_eq!(stats.sales_with_missing_creative, 2);
        assert_eq!(stats.percentage_missing, 50.0);
        assert_eq!(stats.missing_revenue, 50.0);
    }

    #[test]
    fn test_missing_data_stats_empty_input() {
        let stats = missing_data_stats(&[]);
        assert_eq!(stats.total_sales, 0);
        assert_eq!(stats.percentage_missing, 0.0);
    }
}
