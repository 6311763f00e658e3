//! Per-creative aggregation of insight and sale records.
//!
//! Produces one metrics row per canonical creative name, merging every
//! insight row and every sale row whose spelling standardizes to that
//! name. Rates are views-weighted; commerce values are summed; profit,
//! ROI, CPA and CTR are derived at the end.

use super::mapper::{build_name_mapping, records_for_name, NameSource};
use super::num_or_zero;
use crate::ingest::records::{RawInsightRecord, RawSaleRecord};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated metrics for one canonical creative
///
/// **Public** - the output row consumed by ranking, totals, and the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreativeMetrics {
    /// Deterministic id derived from the canonical name
    pub id: String,

    /// Canonical creative name
    pub creative_name: String,

    /// First non-empty campaign name seen across matched insight rows
    pub campaign_name: String,

    /// Earliest report date across matched insight rows
    pub start_date: Option<NaiveDate>,

    /// Latest report date across matched insight rows
    pub end_date: Option<NaiveDate>,

    pub amount_spent: f64,
    pub views_3s: u64,
    pub views_75_percent: u64,
    pub views_total: u64,
    pub clicks: u64,

    // Views-weighted rates, in whatever scale the source used
    pub ph_hook_rate: f64,
    pub hook_rate: f64,
    pub body_rate: f64,
    pub cta_rate: f64,

    /// Clicks over impressions, as a percentage
    pub ctr: f64,

    /// Alias of the weighted body rate
    pub conv_body_rate: f64,

    pub sales_count: u64,
    pub gross_sales: f64,
    pub profit: f64,
    pub cpa: f64,
    pub roi: f64,

    /// First non-empty status seen across matched insight rows
    pub status: String,

    /// Union of sale tags, in first-appearance order
    pub tags: Vec<String>,
}

/// Aggregate insight and sale records into per-creative metrics
///
/// **Public** - main entry point for the metrics core
///
/// Callers supply records already filtered by date range and status.
/// A canonical name with no matching records in either source produces
/// no row. Output order is unspecified; sorting is a caller concern.
pub fn aggregate_creatives(
    insights: &[RawInsightRecord],
    sales: &[RawSaleRecord],
) -> Vec<CreativeMetrics> {
    let insights_by_name = group_insights_by_name(insights);
    let sales_by_name = group_sales_by_name(sales);

    let insight_names: Vec<&str> = insights.iter().map(|r| r.creative_name.as_str()).collect();
    let sale_names: Vec<&str> = sales.iter().map(|r| r.creative_name.as_str()).collect();
    let mapping = build_name_mapping(&insight_names, &sale_names);

    let mut creatives = Vec::with_capacity(mapping.len());

    for (canonical_name, variants) in &mapping {
        let insight_spellings = distinct_spellings(variants, NameSource::Insights);
        let sale_spellings = distinct_spellings(variants, NameSource::Sales);

        let mut matched_insights: Vec<&RawInsightRecord> = Vec::new();
        for spelling in &insight_spellings {
            matched_insights.extend(records_for_name(spelling, &insights_by_name));
        }

        let mut matched_sales: Vec<&RawSaleRecord> = Vec::new();
        for spelling in &sale_spellings {
            matched_sales.extend(records_for_name(spelling, &sales_by_name));
        }

        if matched_insights.is_empty() && matched_sales.is_empty() {
            continue;
        }

        creatives.push(aggregate_one(canonical_name, &matched_insights, &matched_sales));
    }

    debug!(
        "Aggregated {} creatives from {} insight and {} sale records",
        creatives.len(),
        insights.len(),
        sales.len()
    );

    creatives
}

/// Merge the matched records for one canonical name
///
/// **Private** - all accumulation is local to this call
fn aggregate_one(
    canonical_name: &str,
    insights: &[&RawInsightRecord],
    sales: &[&RawSaleRecord],
) -> CreativeMetrics {
    // Insight side: summed counters and views-weighted rate numerators
    let mut amount_spent = 0.0;
    let mut views_3s = 0u64;
    let mut views_75_percent = 0u64;
    let mut views_total = 0u64;
    let mut clicks = 0u64;
    let mut impressions = 0u64;

    let mut ph_hook_weighted = 0.0;
    let mut hook_weighted = 0.0;
    let mut body_weighted = 0.0;
    let mut cta_weighted = 0.0;

    let mut campaign_name: Option<String> = None;
    let mut status: Option<String> = None;
    let mut start_date: Option<NaiveDate> = None;
    let mut end_date: Option<NaiveDate> = None;

    for record in insights {
        amount_spent += num_or_zero(record.amount_spent);
        views_3s += num_or_zero(record.views_3s);
        views_75_percent += num_or_zero(record.views_75_percent);
        clicks += num_or_zero(record.clicks);
        impressions += num_or_zero(record.impressions);

        let record_views = num_or_zero(record.views_total);
        views_total += record_views;

        // Rates only weigh in when the record actually had views
        if record_views > 0 {
            let weight = record_views as f64;
            ph_hook_weighted += num_or_zero(record.ph_hook_rate) * weight;
            hook_weighted += num_or_zero(record.hook_rate) * weight;
            body_weighted += num_or_zero(record.body_rate) * weight;
            cta_weighted += num_or_zero(record.cta_rate) * weight;
        }

        keep_first_non_empty(&mut campaign_name, record.campaign_name.as_deref());
        keep_first_non_empty(&mut status, record.status.as_deref());

        if let Some(date) = record.date_reported {
            start_date = Some(start_date.map_or(date, |d| d.min(date)));
            end_date = Some(end_date.map_or(date, |d| d.max(date)));
        }
    }

    let ph_hook_rate = weighted_average(ph_hook_weighted, views_total);
    let hook_rate = weighted_average(hook_weighted, views_total);
    let body_rate = weighted_average(body_weighted, views_total);
    let cta_rate = weighted_average(cta_weighted, views_total);

    // Sale side: summed values, counted rows, tag union
    let mut gross_sales = 0.0;
    let mut net_sales = 0.0;
    let mut sales_count = 0u64;
    let mut tags: Vec<String> = Vec::new();

    for record in sales {
        gross_sales += num_or_zero(record.gross_value);
        net_sales += num_or_zero(record.net_value);
        sales_count += 1;

        for tag in record.tags.iter().flatten() {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }

    // Derived metrics, each guarded against a zero denominator
    let profit = net_sales - amount_spent;
    let roi = if amount_spent > 0.0 {
        (profit / amount_spent) * 100.0
    } else {
        0.0
    };
    let cpa = if sales_count > 0 {
        amount_spent / sales_count as f64
    } else {
        0.0
    };
    let ctr = if impressions > 0 {
        (clicks as f64 / impressions as f64) * 100.0
    } else {
        0.0
    };

    CreativeMetrics {
        id: creative_id(canonical_name),
        creative_name: canonical_name.to_string(),
        campaign_name: campaign_name.unwrap_or_default(),
        start_date,
        end_date,
        amount_spent,
        views_3s,
        views_75_percent,
        views_total,
        clicks,
        ph_hook_rate,
        hook_rate,
        body_rate,
        cta_rate,
        ctr,
        conv_body_rate: body_rate,
        sales_count,
        gross_sales,
        profit,
        cpa,
        roi,
        status: status.unwrap_or_default(),
        tags,
    }
}

/// Group insight records by their stored creative name
///
/// **Public** - the exact-spelling buckets records_for_name scans
pub fn group_insights_by_name(
    records: &[RawInsightRecord],
) -> HashMap<String, Vec<&RawInsightRecord>> {
    let mut by_name: HashMap<String, Vec<&RawInsightRecord>> = HashMap::new();
    for record in records {
        by_name.entry(record.creative_name.clone()).or_default().push(record);
    }
    by_name
}

/// Group sale records by their stored creative name
///
/// **Public** - same bucketing as group_insights_by_name
pub fn group_sales_by_name(records: &[RawSaleRecord]) -> HashMap<String, Vec<&RawSaleRecord>> {
    let mut by_name: HashMap<String, Vec<&RawSaleRecord>> = HashMap::new();
    for record in records {
        by_name.entry(record.creative_name.clone()).or_default().push(record);
    }
    by_name
}

/// Distinct original spellings for one source, in first-seen order
///
/// **Private** - the mapping keeps duplicates; record collection wants
/// each spelling once
fn distinct_spellings(variants: &[super::mapper::NameVariant], source: NameSource) -> Vec<&str> {
    let mut spellings: Vec<&str> = Vec::new();
    for variant in variants.iter().filter(|v| v.source == source) {
        if !spellings.contains(&variant.original_name.as_str()) {
            spellings.push(variant.original_name.as_str());
        }
    }
    spellings
}

/// Deterministic row id from the canonical name
fn creative_id(canonical_name: &str) -> String {
    canonical_name.to_lowercase().replace(' ', "_")
}

/// Weighted-sum average with a zero-views guard
fn weighted_average(weighted_sum: f64, total_views: u64) -> f64 {
    if total_views > 0 {
        weighted_sum / total_views as f64
    } else {
        0.0
    }
}

/// Keep the first non-empty value seen, never overwriting
fn keep_first_non_empty(slot: &mut Option<String>, value: Option<&str>) {
    if slot.is_none() {
        if let Some(v) = value {
            if !v.is_empty() {
                *slot = Some(v.to_string());
            }
        }
    }
}
