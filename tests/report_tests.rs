use creative_metrics_studio::aggregator::{
    aggregate_creatives, build_sales_ranking, calculate_totals, missing_data_stats,
};
use creative_metrics_studio::commands::{execute_report, ReportArgs};
use creative_metrics_studio::ingest::records::{parse_insights, parse_sales};
use creative_metrics_studio::ingest::schema::{to_report, ReportPeriod};
use creative_metrics_studio::output::{read_report, write_report};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

fn sample_insights() -> serde_json::Value {
    json!([
        {
            "creative_name": "Promo Verao",
            "campaign_name": "Summer Launch",
            "date_reported": "2024-01-10",
            "amount_spent": 120.0,
            "views_total": 400,
            "views_3s": 300,
            "views_75_percent": 100,
            "clicks": 40,
            "impressions": 2000,
            "hook_rate": 0.5,
            "body_rate": 0.25,
            "status": "active"
        },
        {
            "creative_name": "promo verao",
            "date_reported": "2024-01-20",
            "amount_spent": 80.0,
            "views_total": 100,
            "hook_rate": 0.2
        }
    ])
}

fn sample_sales() -> serde_json::Value {
    json!([
        {
            "creative_name": "PROMO VERAO",
            "sale_date": "2024-01-15",
            "gross_value": 500.0,
            "net_value": 450.0,
            "status": "completed",
            "tags": ["launch"]
        },
        {
            "creative_name": "",
            "sale_date": "2024-01-16",
            "gross_value": 90.0,
            "net_value": 80.0,
            "status": "completed"
        }
    ])
}

#[test]
fn test_report_assembly_end_to_end() {
    let insights = parse_insights(&sample_insights()).unwrap();
    let sales = parse_sales(&sample_sales()).unwrap();

    let creatives = aggregate_creatives(&insights, &sales);
    let ranking = build_sales_ranking(&sales);
    let missing = missing_data_stats(&sales);
    let totals = calculate_totals(&creatives);
    let report = to_report(creatives, ranking, totals, missing, ReportPeriod::default());

    // One canonical creative: the three spellings merge, the
    // unattributed sale matches nothing
    assert_eq!(report.creatives.len(), 1);

    let row = &report.creatives[0];
    assert_eq!(row.id, "promo_verao");
    assert_eq!(row.campaign_name, "Summer Launch");
    assert_eq!(row.status, "active");
    assert_eq!(row.amount_spent, 200.0);
    assert_eq!(row.views_total, 500);
    // (0.5 * 400 + 0.2 * 100) / 500
    assert!((row.hook_rate - 0.44).abs() < 1e-9);
    assert_eq!(row.sales_count, 1);
    assert_eq!(row.gross_sales, 500.0);
    assert_eq!(row.profit, 250.0);
    assert_eq!(row.roi, 125.0);
    assert_eq!(row.cpa, 200.0);
    assert!((row.ctr - 2.0).abs() < 1e-9);
    assert_eq!(row.tags, vec!["launch"]);
    assert_eq!(
        row.start_date,
        chrono::NaiveDate::from_ymd_opt(2024, 1, 10)
    );
    assert_eq!(row.end_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 20));

    // Ranking sees both stored spellings plus the missing label
    assert_eq!(report.sales_ranking.len(), 2);
    assert_eq!(report.sales_ranking[0].creative_name, "PROMO VERAO");

    assert_eq!(report.missing_data.sales_with_missing_creative, 1);
    assert_eq!(report.missing_data.missing_revenue, 80.0);

    assert_eq!(report.totals.total_spent, 200.0);
    assert_eq!(report.totals.total_revenue, 500.0);
    assert_eq!(report.totals.total_orders, 1);
}

#[test]
fn test_report_round_trips_through_disk() {
    let insights = parse_insights(&sample_insights()).unwrap();
    let sales = parse_sales(&sample_sales()).unwrap();

    let creatives = aggregate_creatives(&insights, &sales);
    let totals = calculate_totals(&creatives);
    let ranking = build_sales_ranking(&sales);
    let missing = missing_data_stats(&sales);
    let report = to_report(creatives, ranking, totals, missing, ReportPeriod::default());

    let temp_file = tempfile::NamedTempFile::new().unwrap();
    write_report(&report, temp_file.path()).unwrap();
    let loaded = read_report(temp_file.path()).unwrap();

    assert_eq!(loaded.version, report.version);
    assert_eq!(loaded.creatives.len(), report.creatives.len());
    assert_eq!(loaded.creatives[0].id, report.creatives[0].id);
    assert_eq!(loaded.totals.total_revenue, report.totals.total_revenue);
}

#[test]
fn test_execute_report_from_local_files() {
    let dir = tempfile::tempdir().unwrap();

    let insights_path = dir.path().join("insights.json");
    let sales_path = dir.path().join("sales.json");
    let output_path = dir.path().join("out/report.json");

    let mut f = std::fs::File::create(&insights_path).unwrap();
    write!(f, "{}", sample_insights()).unwrap();
    let mut f = std::fs::File::create(&sales_path).unwrap();
    write!(f, "{}", sample_sales()).unwrap();

    let args = ReportArgs {
        insights_file: Some(insights_path),
        sales_file: Some(sales_path),
        output_json: output_path.clone(),
        ..Default::default()
    };

    execute_report(args).unwrap();

    let report = read_report(&output_path).unwrap();
    assert_eq!(report.creatives.len(), 1);
    assert_eq!(report.creatives[0].id, "promo_verao");
}

#[test]
fn test_execute_report_applies_period_filter() {
    let dir = tempfile::tempdir().unwrap();

    let insights_path = dir.path().join("insights.json");
    let sales_path = dir.path().join("sales.json");
    let output_path = dir.path().join("report.json");

    let mut f = std::fs::File::create(&insights_path).unwrap();
    write!(f, "{}", sample_insights()).unwrap();
    let mut f = std::fs::File::create(&sales_path).unwrap();
    write!(f, "{}", sample_sales()).unwrap();

    // Window covering only the first insight row and neither sale
    let args = ReportArgs {
        insights_file: Some(insights_path),
        sales_file: Some(sales_path),
        output_json: output_path.clone(),
        from: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
        to: chrono::NaiveDate::from_ymd_opt(2024, 1, 12),
        ..Default::default()
    };

    execute_report(args).unwrap();

    let report = read_report(&output_path).unwrap();
    assert_eq!(report.creatives.len(), 1);

    let row = &report.creatives[0];
    assert_eq!(row.amount_spent, 120.0);
    assert_eq!(row.sales_count, 0);
    assert_eq!(report.sales_ranking.len(), 0);
    assert_eq!(
        report.period.from,
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
    );
}
