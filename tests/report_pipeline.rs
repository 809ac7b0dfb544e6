use chrono::NaiveDate;
use ride_report::delta::Metric;
use ride_report::filter::DateFilter;
use ride_report::goal::Goal;
use ride_report::output;
use ride_report::reports::{report_from_store, ReportOptions};
use ride_report::store::DataStore;
use std::path::Path;

const RIDES: &str = "Tipo,KM,Duracao,Valor,Link,Data,Hora
UberX,4.0,12,20,https://r/1,01/03/2025,08:10:00
UberX,0,5,7,https://r/2,02/03/2025,13:00:00
Comfort,10.0,25,30,https://r/3,08/03/2025,19:45:00
UberX,3.0,10,\"12,50\",https://r/4,08/03/2025,
UberX,5.0,15,18,https://r/5,,09:00:00
";

const COSTS: &str = "Data,Valor
01/03/2025,\"50,00\"
08/03/2025,25
";

fn write_fixtures(dir: &Path) -> DataStore {
    let rides = dir.join("rides.csv");
    let costs = dir.join("costs.csv");
    std::fs::write(&rides, RIDES).unwrap();
    std::fs::write(&costs, COSTS).unwrap();
    let mut store = DataStore::new(&rides, &costs);
    store.load().unwrap();
    store
}

#[test]
fn load_filter_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_fixtures(dir.path());

    let (rides_report, costs_report) = store.load_reports().unwrap();
    assert_eq!(rides_report.total_rows, 5);
    assert_eq!(rides_report.loaded_rows, 4);
    assert_eq!(rides_report.missing_time, 1);
    assert_eq!(costs_report.loaded_rows, 2);

    let report = report_from_store(&store, DateFilter::All, &ReportOptions::default()).unwrap();
    assert_eq!(report.overview.gross_revenue, 69.5);
    assert_eq!(report.overview.operating_costs, 75.0);
    assert_eq!(report.overview.net_profit, -5.5);

    // 01/03 is a Saturday, 02/03 a Sunday: both in the week of 24/02.
    assert_eq!(report.weekly.aggregates.len(), 2);
    assert_eq!(report.weekly.deltas[0].percent_change, None);
    assert_eq!(report.weekly.deltas[1].previous_value, Some(27.0));

    // zero-km ride is only missing from the ratios
    assert_eq!(report.profitability.rows.len(), 3);
    assert_eq!(report.pareto.rows.len(), 4);
    assert!((report.pareto.rows[3].cumulative_pct - 100.0).abs() < 1e-9);

    // the ride without a time is still in the totals but not in the heatmap
    let heat_total: f64 = report.heatmap.iter().map(|c| c.revenue).sum();
    assert_eq!(heat_total, 57.0);
}

#[test]
fn week_over_week_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let rides = dir.path().join("rides.csv");
    let costs = dir.path().join("costs.csv");
    std::fs::write(
        &rides,
        "date,time,distance_km,duration_minutes,fare_value,category,link\n\
         2025-03-01,10:00:00,2,8,20,UberX,\n\
         2025-03-08,11:00:00,3,9,30,UberX,\n",
    )
    .unwrap();
    std::fs::write(&costs, "date,value\n").unwrap();
    let mut store = DataStore::new(&rides, &costs);
    store.load().unwrap();

    let options = ReportOptions { metric: Metric::Total, ..ReportOptions::default() };
    let report = report_from_store(&store, DateFilter::All, &options).unwrap();
    let second = &report.weekly.deltas[1];
    assert_eq!(second.previous_value, Some(20.0));
    assert_eq!(second.percent_change, Some(50.0));
}

#[test]
fn last_days_filter_and_goal_export() {
    let dir = tempfile::tempdir().unwrap();
    let store = write_fixtures(dir.path());

    let options = ReportOptions {
        goal: Some(Goal::new(1000.0, 20).unwrap()),
        ..ReportOptions::default()
    };
    let report = report_from_store(&store, DateFilter::LastDays(0), &options).unwrap();
    let range = report.range.unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 3, 8).unwrap());
    assert_eq!(report.overview.ride_count, 2);
    assert_eq!(report.overview.operating_costs, 25.0);

    let plan = report.goal.as_ref().unwrap();
    assert_eq!(plan.required_daily_revenue, 50.0);
    assert_eq!(plan.current_daily_revenue, Some(42.5));
    assert!(!plan.achievable);

    let out = dir.path().join("out");
    let written = output::export_report(&report, &out).unwrap();
    assert_eq!(written.len(), output::EXPORTED_FILES.len());
    let weekly = std::fs::read_to_string(out.join("weekly_comparison.csv")).unwrap();
    assert!(weekly.starts_with("bucket_start,current_value,previous_value,percent_change"));
}
