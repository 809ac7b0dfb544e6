//! Period aggregation: group rides into day, week or month buckets.
//!
//! Only buckets that contain rides are produced; there is no zero filling,
//! so consecutive rows are consecutive *active* periods.

use crate::types::Ride;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    /// Monday-start weeks.
    Week,
    Month,
}

impl Granularity {
    /// Start date of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAggregate {
    pub bucket_start: NaiveDate,
    pub total_value: f64,
    /// Mean over the bucket's active days of each day's revenue.
    pub mean_value_per_day: f64,
    /// Mean over the bucket's active days of each day's revenue per ride.
    /// Every day weighs the same regardless of how many rides it had.
    pub mean_value_per_ride: f64,
    pub ride_count: usize,
    pub active_days: usize,
}

pub fn aggregate_periods(rides: &[Ride], granularity: Granularity) -> Vec<PeriodAggregate> {
    // bucket -> day -> (revenue, rides)
    let mut buckets: BTreeMap<NaiveDate, BTreeMap<NaiveDate, (f64, usize)>> = BTreeMap::new();
    for r in rides {
        let day = buckets
            .entry(granularity.bucket_start(r.date))
            .or_default()
            .entry(r.date)
            .or_insert((0.0, 0));
        day.0 += r.fare_value;
        day.1 += 1;
    }

    let out: Vec<PeriodAggregate> = buckets
        .into_iter()
        .map(|(bucket_start, days)| {
            let active_days = days.len();
            let n = active_days as f64;
            let total_value: f64 = days.values().map(|(v, _)| v).sum();
            let ride_count: usize = days.values().map(|(_, c)| c).sum();
            let per_ride_sum: f64 = days.values().map(|(v, c)| v / *c as f64).sum();
            PeriodAggregate {
                bucket_start,
                total_value,
                mean_value_per_day: total_value / n,
                mean_value_per_ride: per_ride_sum / n,
                ride_count,
                active_days,
            }
        })
        .collect();
    tracing::debug!(?granularity, rides = rides.len(), buckets = out.len(), "aggregated periods");
    out
}
