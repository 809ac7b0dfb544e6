use crate::delta::{compute_deltas, DeltaRow, Metric};
use crate::error::Result;
use crate::filter::{filter_costs, filter_rides, DateFilter};
use crate::goal::{simulate, Goal, GoalPlan};
use crate::overview::{daily_revenue, heatmap, overview, DailyRevenue, HeatmapCell, Overview};
use crate::pareto::{pareto_curve, ParetoCurve};
use crate::period::{aggregate_periods, Granularity, PeriodAggregate};
use crate::profitability::{box_summary, histogram, profitability_rows, BoxSummary, HistogramBin, ProfitabilityRow};
use crate::store::DataStore;
use crate::types::{Cost, DateRange, Ride};
use crate::weekday::{best_and_worst, weekday_stats, WeekdayExtremes, WeekdayStats};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportOptions {
    pub metric: Metric,
    pub histogram_bins: usize,
    pub goal: Option<Goal>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { metric: Metric::Total, histogram_bins: 30, goal: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub granularity: Granularity,
    pub metric: Metric,
    pub aggregates: Vec<PeriodAggregate>,
    pub deltas: Vec<DeltaRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityReport {
    pub rows: Vec<ProfitabilityRow>,
    pub per_km_histogram: Vec<HistogramBin>,
    pub per_km_box: Option<BoxSummary>,
}

/// Everything one dashboard view shows, computed for a single date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    /// `None` when the dataset is empty.
    pub range: Option<DateRange>,
    pub overview: Overview,
    pub daily_revenue: Vec<DailyRevenue>,
    pub heatmap: Vec<HeatmapCell>,
    pub monthly: PeriodComparison,
    pub weekly: PeriodComparison,
    pub profitability: ProfitabilityReport,
    pub pareto: ParetoCurve,
    pub weekdays: Vec<WeekdayStats>,
    pub weekday_extremes: Option<WeekdayExtremes>,
    pub goal: Option<GoalPlan>,
}

pub fn compare_periods(rides: &[Ride], granularity: Granularity, metric: Metric) -> PeriodComparison {
    let aggregates = aggregate_periods(rides, granularity);
    let deltas = compute_deltas(&aggregates, metric);
    PeriodComparison { granularity, metric, aggregates, deltas }
}

pub fn profitability_report(rides: &[Ride], bins: usize) -> ProfitabilityReport {
    let rows = profitability_rows(rides);
    let per_km: Vec<f64> = rows.iter().map(|r| r.value_per_km).collect();
    ProfitabilityReport {
        per_km_histogram: histogram(&per_km, bins),
        per_km_box: box_summary(&per_km),
        rows,
    }
}

/// Compute a full view from rows that are already filtered to `range`.
pub fn build_report(
    range: Option<DateRange>,
    rides: &[Ride],
    costs: &[Cost],
    options: &ReportOptions,
) -> DashboardReport {
    let weekdays = weekday_stats(rides);
    let weekday_extremes = best_and_worst(&weekdays);
    DashboardReport {
        range,
        overview: overview(rides, costs),
        daily_revenue: daily_revenue(rides),
        heatmap: heatmap(rides),
        monthly: compare_periods(rides, Granularity::Month, options.metric),
        weekly: compare_periods(rides, Granularity::Week, options.metric),
        profitability: profitability_report(rides, options.histogram_bins),
        pareto: pareto_curve(rides),
        weekdays,
        weekday_extremes,
        goal: options.goal.map(|g| simulate(rides, g)),
    }
}

/// Resolve `filter` against the store, filter both tables and build the
/// view.
pub fn report_from_store(
    store: &DataStore,
    filter: DateFilter,
    options: &ReportOptions,
) -> Result<DashboardReport> {
    let range = filter.resolve(store.date_bounds()?)?;
    let (rides, costs) = match &range {
        Some(r) => (filter_rides(store.rides()?, r), filter_costs(store.costs()?, r)),
        None => (Vec::new(), Vec::new()),
    };
    tracing::debug!(?range, rides = rides.len(), costs = costs.len(), "building report");
    Ok(build_report(range, &rides, &costs, options))
}
