//! Headline figures, the daily revenue series and the hour × weekday heatmap.

use crate::period::{aggregate_periods, Granularity};
use crate::types::{Cost, Ride};
use crate::util::median;
use crate::weekday::WEEKDAYS;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub ride_count: usize,
    pub active_days: usize,
    pub median_rides_per_day: Option<f64>,
    pub total_km: f64,
    pub median_km_per_ride: Option<f64>,
    pub gross_revenue: f64,
    pub median_revenue_per_day: Option<f64>,
    pub median_revenue_per_ride: Option<f64>,
    pub total_duration_minutes: f64,
    pub total_duration_hours: u64,
    pub operating_costs: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: f64,
    pub rides: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub hour: u32,
    #[serde(serialize_with = "crate::weekday::serialize_weekday")]
    pub weekday: Weekday,
    pub revenue: f64,
}

pub fn overview(rides: &[Ride], costs: &[Cost]) -> Overview {
    let daily = daily_revenue(rides);
    let gross_revenue: f64 = rides.iter().map(|r| r.fare_value).sum();
    let operating_costs: f64 = costs.iter().map(|c| c.value).sum();
    let total_duration_minutes: f64 = rides.iter().map(|r| r.duration_minutes).sum();

    Overview {
        ride_count: rides.len(),
        active_days: daily.len(),
        median_rides_per_day: median(daily.iter().map(|d| d.rides as f64).collect()),
        total_km: rides.iter().map(|r| r.distance_km).sum(),
        median_km_per_ride: median(rides.iter().map(|r| r.distance_km).collect()),
        gross_revenue,
        median_revenue_per_day: median(daily.iter().map(|d| d.revenue).collect()),
        median_revenue_per_ride: median(rides.iter().map(|r| r.fare_value).collect()),
        total_duration_minutes,
        total_duration_hours: (total_duration_minutes.max(0.0) / 60.0).floor() as u64,
        operating_costs,
        net_profit: gross_revenue - operating_costs,
    }
}

pub fn daily_revenue(rides: &[Ride]) -> Vec<DailyRevenue> {
    aggregate_periods(rides, Granularity::Day)
        .into_iter()
        .map(|agg| DailyRevenue {
            date: agg.bucket_start,
            revenue: agg.total_value,
            rides: agg.ride_count,
        })
        .collect()
}

/// Revenue per (hour, weekday) for rides with a known time. Hours that saw
/// at least one ride get a full Monday..Sunday row, zero-filled.
pub fn heatmap(rides: &[Ride]) -> Vec<HeatmapCell> {
    let mut sums: BTreeMap<(u32, u32), f64> = BTreeMap::new();
    let mut hours: BTreeSet<u32> = BTreeSet::new();
    for r in rides {
        if let Some(hour) = r.hour() {
            hours.insert(hour);
            *sums.entry((hour, r.weekday().num_days_from_monday())).or_insert(0.0) += r.fare_value;
        }
    }

    hours
        .into_iter()
        .flat_map(|hour| {
            let sums = &sums;
            WEEKDAYS.iter().map(move |day| HeatmapCell {
                hour,
                weekday: *day,
                revenue: sums.get(&(hour, day.num_days_from_monday())).copied().unwrap_or(0.0),
            })
        })
        .collect()
}
