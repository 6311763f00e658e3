//! HTTP client for the hosted database REST endpoint.

use super::types::{RawRows, RecordQuery, RestErrorBody};
use crate::utils::config::{
    DEFAULT_API_TIMEOUT, INSIGHTS_DATE_COLUMN, INSIGHTS_TABLE, SALES_DATE_COLUMN, SALES_TABLE,
};
use crate::utils::error::ApiError;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// REST client for fetching record tables from the hosted database
pub struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_API_TIMEOUT)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url.into()),
            api_key: api_key.into(),
        })
    }

    /// Fetch insight rows for the query
    pub fn fetch_insights(&self, query: &RecordQuery) -> Result<RawRows, ApiError> {
        self.fetch_table(INSIGHTS_TABLE, INSIGHTS_DATE_COLUMN, query)
    }

    /// Fetch sale rows for the query
    pub fn fetch_sales(&self, query: &RecordQuery) -> Result<RawRows, ApiError> {
        self.fetch_table(SALES_TABLE, SALES_DATE_COLUMN, query)
    }

    /// Fetch one table with range/status filters applied server-side
    fn fetch_table(
        &self,
        table: &str,
        date_column: &str,
        query: &RecordQuery,
    ) -> Result<RawRows, ApiError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);

        let mut params: Vec<(String, String)> = vec![("select".to_string(), "*".to_string())];

        if let Some(from) = query.from {
            params.push((date_column.to_string(), format!("gte.{}", from)));
        }
        if let Some(to) = query.to {
            params.push((date_column.to_string(), format!("lte.{}", to)));
        }
        if let Some(status) = &query.status {
            params.push(("status".to_string(), format!("eq.{}", status)));
        }
        params.push(("order".to_string(), format!("{}.desc", date_column)));

        info!("Fetching table '{}' from {}", table, self.base_url);
        debug!("Query params: {:?}", params);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(ApiError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(map_rest_error(status, &body, table));
        }

        response.json::<RawRows>().map_err(ApiError::RequestFailed)
    }
}

/// Strip a trailing slash so path joining stays predictable
fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Map an HTTP failure to our error type
fn map_rest_error(status: StatusCode, body: &str, table: &str) -> ApiError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ApiError::Unauthorized;
    }

    let parsed: Option<RestErrorBody> = serde_json::from_str(body).ok();

    // Undefined-table errors come back as 404s or as Postgres code 42P01
    let undefined_table = status == StatusCode::NOT_FOUND
        || parsed
            .as_ref()
            .and_then(|b| b.code.as_deref())
            .map_or(false, |code| code == "42P01");

    if undefined_table {
        return ApiError::TableNotFound(table.to_string());
    }

    let message = parsed
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.to_string());

    ApiError::InvalidResponse(format!("HTTP {}: {}", status, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://example.supabase.co/".to_string()),
            "https://example.supabase.co"
        );
        assert_eq!(
            normalize_base_url("https://example.supabase.co".to_string()),
            "https://example.supabase.co"
        );
    }

    #[test]
    fn test_map_rest_error_unauthorized() {
        let err = map_rest_error(StatusCode::UNAUTHORIZED, "", "creative_sales");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_map_rest_error_undefined_table_code() {
        let body = r#"{"message": "relation does not exist", "code": "42P01"}"#;
        let err = map_rest_error(StatusCode::BAD_REQUEST, body, "creative_sales");
        assert!(matches!(err, ApiError::TableNotFound(t) if t == "creative_sales"));
    }

    #[test]
    fn test_map_rest_error_passes_message_through() {
        let body = r#"{"message": "syntax error"}"#;
        let err = map_rest_error(StatusCode::BAD_REQUEST, body, "creative_sales");
        match err {
            ApiError::InvalidResponse(msg) => assert!(msg.contains("syntax error")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
