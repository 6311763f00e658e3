//! Raw record parsing for insight and sale rows.
//!
//! Parses raw JSON payloads from the hosted database API (or a local
//! export) into typed records. Handles the payload shapes the various
//! export paths produce and skips rows that fail to deserialize.

use crate::utils::config::ROW_FIELD_NAMES;
use crate::utils::error::IngestError;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// One reporting-period row for one creative from the ad-platform side
///
/// Numeric fields stay optional at this boundary; the aggregator reads
/// them through a single numeric-or-zero helper so missing values never
/// leak defaults into the arithmetic here.
#[derive(Debug, Clone, Deserialize)]
pub struct RawInsightRecord {
    /// Creative name as stored (may be empty, never matched if so)
    #[serde(default, alias = "creativeName")]
    pub creative_name: String,

    #[serde(default, alias = "campaignName")]
    pub campaign_name: Option<String>,

    /// Report date; accepts bare dates and full ISO timestamps
    #[serde(default, alias = "dateReported", deserialize_with = "flexible_date")]
    pub date_reported: Option<NaiveDate>,

    #[serde(default, alias = "amountSpent")]
    pub amount_spent: Option<f64>,

    #[serde(default, alias = "views3s")]
    pub views_3s: Option<u64>,

    #[serde(default, alias = "views75Percent")]
    pub views_75_percent: Option<u64>,

    #[serde(default, alias = "viewsTotal")]
    pub views_total: Option<u64>,

    #[serde(default)]
    pub clicks: Option<u64>,

    #[serde(default)]
    pub impressions: Option<u64>,

    // Rate fields arrive as 0..1 or 0..100 depending on the exporter;
    // they are weighted as-is, never rescaled
    #[serde(default, alias = "phHookRate")]
    pub ph_hook_rate: Option<f64>,

    #[serde(default, alias = "hookRate")]
    pub hook_rate: Option<f64>,

    #[serde(default, alias = "bodyRate")]
    pub body_rate: Option<f64>,

    #[serde(default, alias = "ctaRate")]
    pub cta_rate: Option<f64>,

    #[serde(default)]
    pub status: Option<String>,
}

/// One completed or attempted sale attributed to a creative
#[derive(Debug, Clone, Deserialize)]
pub struct RawSaleRecord {
    /// Creative name as stored; empty means unattributed
    #[serde(default, alias = "creativeName")]
    pub creative_name: String,

    #[serde(default, alias = "grossValue")]
    pub gross_value: Option<f64>,

    #[serde(default, alias = "netValue")]
    pub net_value: Option<f64>,

    /// Tags may be absent or null; both read as no tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    #[serde(default, alias = "orderId")]
    pub order_id: Option<String>,

    #[serde(default, alias = "saleDate", deserialize_with = "flexible_date")]
    pub sale_date: Option<NaiveDate>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Parse insight rows from a raw JSON payload
///
/// **Public** - main entry point for the insights source
///
/// # Errors
/// * `IngestError::InvalidFormat` - payload is not an array and carries
///   no recognized wrapper field, or every row failed to parse
pub fn parse_insights(raw: &serde_json::Value) -> Result<Vec<RawInsightRecord>, IngestError> {
    let rows = extract_rows(raw)?;
    parse_rows(rows, "insight")
}

/// Parse sale rows from a raw JSON payload
///
/// **Public** - main entry point for the sales source
pub fn parse_sales(raw: &serde_json::Value) -> Result<Vec<RawSaleRecord>, IngestError> {
    let rows = extract_rows(raw)?;
    parse_rows(rows, "sale")
}

/// Locate the row array inside a payload
///
/// **Private** - accepts a bare array or an object wrapping one under
/// a known field name
fn extract_rows(raw: &serde_json::Value) -> Result<&Vec<serde_json::Value>, IngestError> {
    match raw {
        serde_json::Value::Array(rows) => Ok(rows),

        serde_json::Value::Object(obj) => {
            for field in ROW_FIELD_NAMES {
                if let Some(serde_json::Value::Array(rows)) = obj.get(*field) {
                    debug!("Rows found under wrapper field '{}'", field);
                    return Ok(rows);
                }
            }
            Err(IngestError::InvalidFormat(
                "Payload object has no recognized row array".to_string(),
            ))
        }

        _ => Err(IngestError::InvalidFormat(
            "Payload must be a JSON array or object".to_string(),
        )),
    }
}

/// Parse each row, skipping the malformed ones
///
/// **Private** - a batch where every row fails is an error; a partial
/// batch is logged and kept
fn parse_rows<R: DeserializeOwned>(
    rows: &[serde_json::Value],
    what: &str,
) -> Result<Vec<R>, IngestError> {
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        match serde_json::from_value::<R>(row.clone()) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Failed to parse {} row {}: {}", what, index, e);
            }
        }
    }

    if records.is_empty() && !rows.is_empty() {
        return Err(IngestError::InvalidFormat(format!(
            "All {} rows failed to parse",
            what
        )));
    }

    debug!("Parsed {} {} rows ({} supplied)", records.len(), what, rows.len());

    Ok(records)
}

/// Keep insight rows inside the date range and status filter
///
/// **Public** - filtering stays upstream of the aggregator; the API path
/// applies the same filters server-side and passes through here unchanged
pub fn filter_insights(
    records: Vec<RawInsightRecord>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    status: Option<&str>,
) -> Vec<RawInsightRecord> {
    records
        .into_iter()
        .filter(|r| date_in_range(r.date_reported, from, to))
        .filter(|r| status_matches(r.status.as_deref(), status))
        .collect()
}

/// Keep sale rows inside the date range and status filter
///
/// **Public** - same contract as filter_insights
pub fn filter_sales(
    records: Vec<RawSaleRecord>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    status: Option<&str>,
) -> Vec<RawSaleRecord> {
    records
        .into_iter()
        .filter(|r| date_in_range(r.sale_date, from, to))
        .filter(|r| status_matches(r.status.as_deref(), status))
        .collect()
}

/// Range check matching the hosted query semantics: once a bound is set,
/// rows without a date fall outside it
fn date_in_range(date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    match (from, to) {
        (None, None) => true,
        _ => match date {
            Some(d) => from.map_or(true, |f| d >= f) && to.map_or(true, |t| d <= t),
            None => false,
        },
    }
}

fn status_matches(status: Option<&str>, wanted: Option<&str>) -> bool {
    match wanted {
        Some(wanted) => status == Some(wanted),
        None => true,
    }
}

/// Deserialize a date that may arrive as a bare date, a full ISO
/// timestamp, or null
///
/// **Private** - unparseable values are treated as absent
fn flexible_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_record_date))
}

/// Parse the date part of a stored date or timestamp string
///
/// **Public** - for callers holding raw stored date strings
pub fn parse_record_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_insights_bare_array() {
        let raw = json!([
            {"creative_name": "X", "amount_spent": 100.0, "views_total": 50},
            {"creativeName": "Y", "amountSpent": 25.5, "viewsTotal": 10}
        ]);

        let records = parse_insights(&raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].creative_name, "X");
        assert_eq!(records[1].creative_name, "Y");
        assert_eq!(records[1].amount_spent, Some(25.5));
        assert_eq!(records[1].views_total, Some(10));
    }

    #[test]
    fn test_parse_sales_wrapped_rows() {
        let raw = json!({"data": [
            {"creative_name": "X", "net_value": 200.0, "gross_value": 250.0}
        ]});

        let records = parse_sales(&raw).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].net_value, Some(200.0));
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        let raw = json!([
            {"creative_name": "X"},
            "not an object"
        ]);

        let records = parse_insights(&raw).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_all_rows_malformed_is_error() {
        let raw = json!(["nope", 42]);
        assert!(parse_insights(&raw).is_err());
    }

    #[test]
    fn test_parse_rejects_scalar_payload() {
        let raw = json!("just a string");
        assert!(parse_sales(&raw).is_err());
    }

    #[test]
    fn test_missing_numeric_fields_stay_absent() {
        let raw = json!([{"creative_name": "X", "hook_rate": null}]);

        let records = parse_insights(&raw).unwrap();
        assert_eq!(records[0].amount_spent, None);
        assert_eq!(records[0].hook_rate, None);
    }

    #[test]
    fn test_flexible_date_accepts_timestamps() {
        let raw = json!([
            {"creative_name": "X", "date_reported": "2024-03-05"},
            {"creative_name": "Y", "date_reported": "2024-03-06T14:30:00.000Z"},
            {"creative_name": "Z", "date_reported": "soon"}
        ]);

        let records = parse_insights(&raw).unwrap();
        assert_eq!(records[0].date_reported, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(records[1].date_reported, NaiveDate::from_ymd_opt(2024, 3, 6));
        assert_eq!(records[2].date_reported, None);
    }

    #[test]
    fn test_filter_sales_by_range_and_status() {
        let raw = json!([
            {"creative_name": "A", "sale_date": "2024-01-10", "status": "completed"},
            {"creative_name": "B", "sale_date": "2024-02-10", "status": "completed"},
            {"creative_name": "C", "sale_date": "2024-01-20", "status": "refunded"},
            {"creative_name": "D", "status": "completed"}
        ]);
        let records = parse_sales(&raw).unwrap();

        let from = NaiveDate::from_ymd_opt(2024, 1, 1);
        let to = NaiveDate::from_ymd_opt(2024, 1, 31);
        let filtered = filter_sales(records, from, to, Some("completed"));

        // B is out of range, C has the wrong status, D has no date
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].creative_name, "A");
    }

    #[test]
    fn test_filter_without_bounds_keeps_undated_rows() {
        let raw = json!([{"creative_name": "D"}]);
        let records = parse_sales(&raw).unwrap();

        let filtered = filter_sales(records, None, None, None);
        assert_eq!(filtered.len(), 1);
    }
}
