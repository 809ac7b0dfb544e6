use crate::period::PeriodAggregate;
use crate::util::ratio;
use chrono::NaiveDate;
use serde::Serialize;

/// Which aggregate column a period comparison runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Total,
    PerDay,
    PerRide,
}

impl Metric {
    pub fn select(&self, agg: &PeriodAggregate) -> f64 {
        match self {
            Metric::Total => agg.total_value,
            Metric::PerDay => agg.mean_value_per_day,
            Metric::PerRide => agg.mean_value_per_ride,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Total => "Revenue",
            Metric::PerDay => "Revenue per Day",
            Metric::PerRide => "Revenue per Ride",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRow {
    pub bucket_start: NaiveDate,
    pub current_value: f64,
    /// `None` for the first bucket.
    pub previous_value: Option<f64>,
    /// `None` for the first bucket and when the previous value is zero.
    pub percent_change: Option<f64>,
}

/// Compare each bucket with the one right before it in `aggs`.
pub fn compute_deltas(aggs: &[PeriodAggregate], metric: Metric) -> Vec<DeltaRow> {
    let mut previous: Option<f64> = None;
    aggs.iter()
        .map(|agg| {
            let current_value = metric.select(agg);
            let percent_change =
                previous.and_then(|prev| ratio(current_value - prev, prev)).map(|r| r * 100.0);
            let row = DeltaRow {
                bucket_start: agg.bucket_start,
                current_value,
                previous_value: previous,
                percent_change,
            };
            previous = Some(current_value);
            row
        })
        .collect()
}
