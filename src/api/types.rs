//! Types for the hosted database REST endpoint.
//!
//! The endpoint speaks PostgREST conventions: column filters as query
//! parameters (`col=gte.value`), JSON arrays back, JSON error bodies
//! with a message and a Postgres error code.

use chrono::NaiveDate;
use serde::Deserialize;

/// Filters forwarded to a table query
///
/// Mirrors the filtering the dashboard applied upstream of aggregation:
/// a date range on the table's date column plus an optional status.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Error body returned by the endpoint
#[derive(Debug, Deserialize)]
pub struct RestErrorBody {
    #[serde(default)]
    pub message: Option<String>,

    /// Postgres error code (e.g. 42P01 for a missing table)
    #[serde(default)]
    pub code: Option<String>,
}

/// Raw rows from a table query (opaque here, parsed by ingest)
///
/// We keep this as `serde_json::Value` because the exact row shape
/// varies between tables and exporter versions. Ingestion handles
/// validation.
pub type RawRows = serde_json::Value;
