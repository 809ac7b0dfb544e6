//! Per-ride profitability ratios and their distribution summaries.

use crate::types::Ride;
use crate::util::{median, quantile_sorted, sort_f64};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitabilityRow {
    pub date: NaiveDate,
    pub fare_value: f64,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub value_per_km: f64,
    pub value_per_minute: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Most extreme values still inside the fences.
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Ratios for rides with positive distance and duration. Other rides are
/// left out of this view only.
pub fn profitability_rows(rides: &[Ride]) -> Vec<ProfitabilityRow> {
    rides
        .iter()
        .filter(|r| r.distance_km > 0.0 && r.duration_minutes > 0.0)
        .map(|r| ProfitabilityRow {
            date: r.date,
            fare_value: r.fare_value,
            distance_km: r.distance_km,
            duration_minutes: r.duration_minutes,
            value_per_km: r.fare_value / r.distance_km,
            value_per_minute: r.fare_value / r.duration_minutes,
        })
        .collect()
}

/// Equal-width bins over `[min, max]` of `values`. The last bin is closed on
/// the right so the maximum is counted. When all values are equal a single
/// bin holds them all.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;
    if width <= 0.0 {
        return vec![HistogramBin { lower: min, upper: max, count: finite.len() }];
    }

    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in finite {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Five-number summary with 1.5 × IQR outlier fences.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sort_f64(&mut sorted);
    let q1 = quantile_sorted(&sorted, 0.25)?;
    let q3 = quantile_sorted(&sorted, 0.75)?;
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let inside = sorted.iter().copied().filter(|v| (lower_fence..=upper_fence).contains(v));
    let whisker_low = inside.clone().next().unwrap_or(q1);
    let whisker_high = inside.last().unwrap_or(q3);
    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    Some(BoxSummary {
        min: sorted[0],
        q1,
        median: median(sorted.clone())?,
        q3,
        max: sorted[sorted.len() - 1],
        lower_fence,
        upper_fence,
        whisker_low,
        whisker_high,
        outliers,
    })
}
