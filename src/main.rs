//! Creative Metrics CLI
//!
//! Aggregates ad-creative insight and sale records into per-creative
//! performance reports, reconciling names across data sources.

use anyhow::Result;
use clap::{Parser, Subcommand};
use creative_metrics_studio::commands::{execute_report, validate_args, ReportArgs};
use creative_metrics_studio::output::SummaryMetric;
use creative_metrics_studio::utils::config::SCHEMA_VERSION;
use env_logger::Env;
use std::path::PathBuf;

/// Creative Metrics Studio - creative performance aggregation and reporting
#[derive(Parser, Debug)]
#[command(name = "creative-metrics")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate records and write a creative report
    Report {
        /// Hosted database base URL (e.g. https://project.supabase.co)
        #[arg(short, long)]
        url: Option<String>,

        /// API key for the hosted database
        #[arg(long, env = "CREATIVE_METRICS_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Local JSON file with insight rows (with --sales, replaces --url)
        #[arg(long)]
        insights: Option<PathBuf>,

        /// Local JSON file with sale rows
        #[arg(long)]
        sales: Option<PathBuf>,

        /// Period start, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<chrono::NaiveDate>,

        /// Period end, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<chrono::NaiveDate>,

        /// Keep only records with this status
        #[arg(long)]
        status: Option<String>,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Number of creatives in the printed summary table
        #[arg(long, default_value = "10")]
        top: usize,

        /// Metric the summary ranks by (spent, gross_sales, profit, roi, sales)
        #[arg(long, default_value = "gross_sales")]
        metric: SummaryMetric,

        /// Print a text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Report {
            url,
            api_key,
            insights,
            sales,
            from,
            to,
            status,
            output,
            top,
            metric,
            summary,
        } => {
            let args = ReportArgs {
                api_url: url,
                api_key,
                insights_file: insights,
                sales_file: sales,
                from,
                to,
                status,
                output_json: output,
                top_creatives: top,
                metric,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            // Execute report
            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a report JSON file
///
/// **Private** - internal command implementation
fn validate_report_file(file_path: PathBuf) -> Result<()> {
    use creative_metrics_studio::output::read_report;

    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Creatives: {}", report.creatives.len());
    println!("  Ranked names: {}", report.sales_ranking.len());
    println!("  Total spent: {}", report.totals.total_spent);
    println!("  Total revenue: {}", report.totals.total_revenue);

    Ok(())
}

/// Display schema information
///
/// **Private** - internal command implementation
fn display_schema(show_details: bool) {
    println!("Creative Metrics Studio Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string     - ISO 8601 timestamp");
        println!("  period: object           - Reporting period bounds");
        println!("    from: date?            - Period start (inclusive)");
        println!("    to: date?              - Period end (inclusive)");
        println!("  totals: object           - Headline KPI totals");
        println!("    total_spent: number    - Summed ad spend");
        println!("    total_revenue: number  - Summed gross sales");
        println!("    total_orders: number   - Summed sale count");
        println!("    avg_ticket: number     - Revenue per order");
        println!("    avg_roi: number        - (revenue - spend) / spend, 2 decimals");
        println!("  creatives: array         - One aggregated row per creative");
        println!("    id: string             - Deterministic id from the canonical name");
        println!("    creative_name: string  - Canonical creative name");
        println!("    amount_spent: number   - Summed spend");
        println!("    views_total: number    - Summed views");
        println!("    hook_rate: number      - Views-weighted rate (et al.)");
        println!("    profit, roi, cpa, ctr  - Derived metrics");
        println!("    tags: array            - Union of sale tags");
        println!("  sales_ranking: array     - Revenue ranking by stored spelling");
        println!("  missing_data: object     - Unattributed-sales statistics");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Creative Metrics Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Creative performance aggregation and reporting for marketing analytics data.");
}
