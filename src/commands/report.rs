//! Report command implementation.
//!
//! The report command:
//! 1. Loads raw rows (hosted API or local JSON files)
//! 2. Parses them into typed records
//! 3. Applies the date-range and status filters
//! 4. Aggregates per-creative metrics
//! 5. Builds the sales ranking, missing-data stats and totals
//! 6. Writes the report file (and prints a summary if asked)

use crate::aggregator::{
    aggregate_creatives, build_sales_ranking, calculate_totals, missing_data_stats,
};
use crate::api::{RecordQuery, RestClient};
use crate::ingest::records::{filter_insights, filter_sales, parse_insights, parse_sales};
use crate::ingest::schema::{to_report, ReportPeriod};
use crate::output::{generate_text_summary, write_report, SummaryMetric};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Hosted database base URL (unused when loading from files)
    pub api_url: Option<String>,

    /// API key for the hosted database
    pub api_key: Option<String>,

    /// Local JSON file with insight rows
    pub insights_file: Option<PathBuf>,

    /// Local JSON file with sale rows
    pub sales_file: Option<PathBuf>,

    /// Reporting period start (inclusive)
    pub from: Option<NaiveDate>,

    /// Reporting period end (inclusive)
    pub to: Option<NaiveDate>,

    /// Keep only records with this status
    pub status: Option<String>,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Number of rows in the printed summary table
    pub top_creatives: usize,

    /// Metric the summary table ranks by
    pub metric: SummaryMetric,

    /// Print the text summary to stdout
    pub print_summary: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            insights_file: None,
            sales_file: None,
            from: None,
            to: None,
            status: None,
            output_json: PathBuf::from("report.json"),
            top_creatives: 10,
            metric: SummaryMetric::GrossSales,
            print_summary: false,
        }
    }
}

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * API connection failures
/// * Record parsing errors
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting report generation");

    // Step 1: Load raw rows
    info!("Step 1/6: Loading raw rows...");
    let (raw_insights, raw_sales) = load_raw_rows(&args).context("Failed to load raw rows")?;

    // Step 2: Parse into typed records
    info!("Step 2/6: Parsing records...");
    let insights = parse_insights(&raw_insights).context("Failed to parse insight rows")?;
    let sales = parse_sales(&raw_sales).context("Failed to parse sale rows")?;

    debug!("Parsed {} insight and {} sale records", insights.len(), sales.len());

    // Step 3: Apply the upstream filters. The API path already filtered
    // server-side; running the same filters again keeps one code path.
    info!("Step 3/6: Applying period filters...");
    let insights = filter_insights(insights, args.from, args.to, args.status.as_deref());
    let sales = filter_sales(sales, args.from, args.to, args.status.as_deref());

    debug!("{} insight and {} sale records in period", insights.len(), sales.len());

    // Step 4: Aggregate per-creative metrics
    info!("Step 4/6: Aggregating creatives...");
    let creatives = aggregate_creatives(&insights, &sales);

    info!("Aggregated {} creatives", creatives.len());

    // Step 5: Ranking, missing-data stats, totals
    info!("Step 5/6: Building ranking and totals...");
    let ranking = build_sales_ranking(&sales);
    let missing = missing_data_stats(&sales);
    let totals = calculate_totals(&creatives);

    if missing.sales_with_missing_creative > 0 {
        info!(
            "{} of {} sales ({:.1}%) have no creative attribution",
            missing.sales_with_missing_creative,
            missing.total_sales,
            missing.percentage_missing
        );
    }

    // Step 6: Write output
    info!("Step 6/6: Writing report...");
    let period = ReportPeriod {
        from: args.from,
        to: args.to,
    };
    let report = to_report(creatives, ranking, totals, missing, period);

    write_report(&report, &args.output_json).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(70));
        println!("CREATIVE REPORT SUMMARY");
        println!("{}", "=".repeat(70));
        println!(
            "{}",
            generate_text_summary(&report.creatives, &report.totals, args.metric, args.top_creatives)
        );
        println!("{}", "=".repeat(70));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Load raw rows from the configured source
///
/// **Private** - internal helper for execute_report
fn load_raw_rows(args: &ReportArgs) -> Result<(serde_json::Value, serde_json::Value)> {
    if let (Some(insights_file), Some(sales_file)) = (&args.insights_file, &args.sales_file) {
        info!("Loading records from local files");

        let insights = read_json_file(insights_file)
            .with_context(|| format!("Failed to read {}", insights_file.display()))?;
        let sales = read_json_file(sales_file)
            .with_context(|| format!("Failed to read {}", sales_file.display()))?;

        return Ok((insights, sales));
    }

    let api_url = args
        .api_url
        .as_deref()
        .context("No data source: pass --url or both --insights and --sales")?;
    let api_key = args
        .api_key
        .as_deref()
        .context("An API key is required when fetching from the hosted database")?;

    let client = RestClient::new(api_url, api_key).context("Failed to create REST client")?;

    let query = RecordQuery {
        from: args.from,
        to: args.to,
        status: args.status.clone(),
    };

    let insights = client
        .fetch_insights(&query)
        .context("Failed to fetch insight rows")?;
    let sales = client
        .fetch_sales(&query)
        .context("Failed to fetch sale rows")?;

    Ok((insights, sales))
}

/// Read and parse one JSON file
fn read_json_file(path: &PathBuf) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&content)?;
    Ok(value)
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    let has_files = args.insights_file.is_some() && args.sales_file.is_some();
    let has_partial_files = args.insights_file.is_some() != args.sales_file.is_some();
    let has_api = args.api_url.is_some();

    if has_partial_files {
        anyhow::bail!("--insights and --sales must be passed together");
    }

    if !has_files && !has_api {
        anyhow::bail!("No data source: pass --url or both --insights and --sales");
    }

    if has_api && !has_files {
        let url = args.api_url.as_deref().unwrap_or_default();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("API URL must start with http:// or https://");
        }
        if args.api_key.as_deref().map_or(true, |k| k.is_empty()) {
            anyhow::bail!("An API key is required when fetching from the hosted database");
        }
    }

    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            anyhow::bail!("--from must not be after --to");
        }
    }

    if args.top_creatives == 0 {
        anyhow::bail!("--top must be greater than 0");
    }

    if args.top_creatives > 1000 {
        anyhow::bail!("--top is too large (max 1000)");
    }

    Ok(())
}
