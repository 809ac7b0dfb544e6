// Presentation layer: turns numeric report rows into text tables, CSV and
// JSON files. Nothing in here computes metrics.
use crate::delta::DeltaRow;
use crate::error::Result;
use crate::goal::GoalPlan;
use crate::overview::Overview;
use crate::period::Granularity;
use crate::reports::DashboardReport;
use crate::util::{format_currency, format_int, format_number, format_percent};
use crate::weekday::{weekday_name, WeekdayStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Currency settings shared by every rendered table.
#[derive(Debug, Clone)]
pub struct Formatter {
    pub currency_symbol: String,
    pub decimal_comma: bool,
}

impl Formatter {
    pub fn money(&self, n: f64) -> String {
        format_currency(n, &self.currency_symbol, self.decimal_comma)
    }

    pub fn opt_money(&self, n: Option<f64>) -> String {
        n.map(|v| self.money(v)).unwrap_or_else(|| "-".to_string())
    }
}

#[derive(Debug, Tabled, Clone)]
pub struct KpiRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct DeltaDisplayRow {
    #[tabled(rename = "Period")]
    pub period: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Previous")]
    pub previous: String,
    #[tabled(rename = "Change")]
    pub change: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct WeekdayDisplayRow {
    #[tabled(rename = "Day")]
    pub day: String,
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[tabled(rename = "Rides")]
    pub rides: usize,
    #[tabled(rename = "MeanPerRide")]
    pub mean_per_ride: String,
    #[tabled(rename = "MedianPerRide")]
    pub median_per_ride: String,
    #[tabled(rename = "CV")]
    pub cv: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct ShiftDisplayRow {
    #[tabled(rename = "Shift")]
    pub shift: String,
    #[tabled(rename = "Share")]
    pub share: String,
    #[tabled(rename = "RidesPerDayNeeded")]
    pub required: String,
    #[tabled(rename = "RidesPerDayNow")]
    pub observed_rides: String,
    #[tabled(rename = "RevenuePerDayNow")]
    pub observed_revenue: String,
}

/// `↑ 12.3%`, `↓ 4.0%`, `0.0%`, or `-` when the change is undefined.
pub fn format_change(change: Option<f64>) -> String {
    match change {
        None => "-".to_string(),
        Some(v) if v > 0.0 => format!("↑ {:.1}%", v),
        Some(v) if v < 0.0 => format!("↓ {:.1}%", v.abs()),
        Some(v) => format!("{:.1}%", v),
    }
}

pub fn period_label(granularity: Granularity, date: chrono::NaiveDate) -> String {
    match granularity {
        Granularity::Month => date.format("%b/%y").to_string(),
        Granularity::Week | Granularity::Day => date.format("%d/%m/%y").to_string(),
    }
}

pub fn overview_rows(o: &Overview, f: &Formatter) -> Vec<KpiRow> {
    let opt_num = |v: Option<f64>, decimals: usize| {
        v.map(|x| format_number(x, decimals)).unwrap_or_else(|| "-".to_string())
    };
    let row = |metric: &str, value: String| KpiRow { metric: metric.to_string(), value };
    vec![
        row("Rides", format_int(o.ride_count as u64)),
        row("Rides per Day (median)", opt_num(o.median_rides_per_day, 1)),
        row("Distance", format!("{} km", format_number(o.total_km, 2))),
        row("Km per Ride (median)", format!("{} km", opt_num(o.median_km_per_ride, 2))),
        row("Gross Revenue", f.money(o.gross_revenue)),
        row("Revenue per Day (median)", f.opt_money(o.median_revenue_per_day)),
        row("Revenue per Ride (median)", f.opt_money(o.median_revenue_per_ride)),
        row(
            "Duration",
            format!("{:.0} min / {}h", o.total_duration_minutes, o.total_duration_hours),
        ),
        row("Operating Costs", f.money(o.operating_costs)),
        row("Net Profit", f.money(o.net_profit)),
        row("Active Days", format_int(o.active_days as u64)),
    ]
}

pub fn delta_rows(granularity: Granularity, deltas: &[DeltaRow], f: &Formatter) -> Vec<DeltaDisplayRow> {
    deltas
        .iter()
        .map(|d| DeltaDisplayRow {
            period: period_label(granularity, d.bucket_start),
            value: f.money(d.current_value),
            previous: f.opt_money(d.previous_value),
            change: format_change(d.percent_change),
        })
        .collect()
}

pub fn weekday_rows(stats: &[WeekdayStats], f: &Formatter) -> Vec<WeekdayDisplayRow> {
    stats
        .iter()
        .map(|s| WeekdayDisplayRow {
            day: weekday_name(s.weekday)[..3].to_string(),
            revenue: f.money(s.total),
            rides: s.count,
            mean_per_ride: f.money(s.mean),
            median_per_ride: f.money(s.median),
            cv: s.cv_pct.map(format_percent).unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}

pub fn shift_rows(plan: &GoalPlan, f: &Formatter) -> Vec<ShiftDisplayRow> {
    let opt = |v: Option<f64>| v.map(|x| format_number(x, 1)).unwrap_or_else(|| "-".to_string());
    plan.shifts
        .iter()
        .map(|s| ShiftDisplayRow {
            shift: s.shift.as_str().to_string(),
            share: format!("{:.0}%", s.share_pct),
            required: opt(s.required_rides_per_day),
            observed_rides: opt(s.observed_rides_per_day),
            observed_revenue: f.opt_money(s.observed_revenue_per_day),
        })
        .collect()
}

pub fn goal_lines(plan: &GoalPlan, f: &Formatter) -> Vec<String> {
    let opt = |v: Option<f64>, decimals: usize| {
        v.map(|x| format_number(x, decimals)).unwrap_or_else(|| "-".to_string())
    };
    let mut lines = vec![
        format!(
            "Daily target: {} (currently {})",
            f.money(plan.required_daily_revenue),
            f.opt_money(plan.current_daily_revenue)
        ),
        format!(
            "Mean per ride: {} (median {})",
            f.opt_money(plan.mean_revenue_per_ride),
            f.opt_money(plan.median_revenue_per_ride)
        ),
        format!(
            "Rides needed per day: {} (currently {})",
            opt(plan.required_rides_per_day, 1),
            opt(plan.current_rides_per_day, 1)
        ),
        format!("Days to goal at current pace: {}", opt(plan.days_to_goal, 0)),
    ];
    lines.push(if plan.achievable {
        "Goal is reachable at the current pace.".to_string()
    } else {
        "Goal is not reachable at the current pace; add days or raise daily revenue.".to_string()
    });
    lines
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub const EXPORTED_FILES: [&str; 11] = [
    "daily_revenue.csv",
    "heatmap.csv",
    "monthly_aggregates.csv",
    "monthly_comparison.csv",
    "weekly_aggregates.csv",
    "weekly_comparison.csv",
    "profitability.csv",
    "per_km_histogram.csv",
    "pareto.csv",
    "weekday_review.csv",
    "report.json",
];

/// Write one CSV per table plus the full report as JSON into `dir`.
/// Returns the written paths.
pub fn export_report(report: &DashboardReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let path = |name: &str| dir.join(name);
    write_csv(&path("daily_revenue.csv"), &report.daily_revenue)?;
    write_csv(&path("heatmap.csv"), &report.heatmap)?;
    write_csv(&path("monthly_aggregates.csv"), &report.monthly.aggregates)?;
    write_csv(&path("monthly_comparison.csv"), &report.monthly.deltas)?;
    write_csv(&path("weekly_aggregates.csv"), &report.weekly.aggregates)?;
    write_csv(&path("weekly_comparison.csv"), &report.weekly.deltas)?;
    write_csv(&path("profitability.csv"), &report.profitability.rows)?;
    write_csv(&path("per_km_histogram.csv"), &report.profitability.per_km_histogram)?;
    write_csv(&path("pareto.csv"), &report.pareto.rows)?;
    write_csv(&path("weekday_review.csv"), &report.weekdays)?;
    write_json(&path("report.json"), report)?;
    let written: Vec<PathBuf> = EXPORTED_FILES.iter().map(|name| path(name)).collect();
    tracing::info!(dir = %dir.display(), files = written.len(), "exported report");
    Ok(written)
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
