//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for REST API requests
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Sentinel for creatives whose name is empty or whitespace-only
pub const UNKNOWN_NAME: &str = "Nome Desconhecido";

/// Label under which unattributed sales are ranked
pub const MISSING_CREATIVE_LABEL: &str = "Não informado";

// Hosted database tables and their date columns
pub const INSIGHTS_TABLE: &str = "creative_insights";
pub const INSIGHTS_DATE_COLUMN: &str = "date_reported";
pub const SALES_TABLE: &str = "creative_sales";
pub const SALES_DATE_COLUMN: &str = "sale_date";

// Field names that may wrap the row array in a payload
// (different export paths nest the rows differently)
pub const ROW_FIELD_NAMES: &[&str] = &["data", "rows", "records"];

// Status values that count as a completed sale
pub const COMPLETED_STATUSES: &[&str] = &["completed", "Completed"];
