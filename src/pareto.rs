use crate::types::Ride;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;

/// Share of revenue the headline statistic looks for.
pub const PARETO_TARGET_PCT: f64 = 80.0;

const PCT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoRow {
    pub rank: usize,
    pub date: NaiveDate,
    pub fare_value: f64,
    pub cumulative_value: f64,
    pub cumulative_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParetoSummary {
    /// Smallest rank whose cumulative share reaches the target.
    pub cutoff_rank: usize,
    /// `cutoff_rank` as a percentage of all rides.
    pub ride_share_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParetoCurve {
    pub rows: Vec<ParetoRow>,
    pub summary: Option<ParetoSummary>,
}

/// Rank rides by fare (highest first, ties keep input order) and attach the
/// running revenue share.
///
/// Negative fares (refunds, adjustments) are left out of both the ranking and
/// the total, so the share only ever grows and ends at exactly 100%. A
/// dataset with no positive revenue yields an empty curve.
pub fn pareto_curve(rides: &[Ride]) -> ParetoCurve {
    let mut sorted: Vec<&Ride> = rides.iter().filter(|r| r.fare_value >= 0.0).collect();
    if sorted.len() < rides.len() {
        tracing::debug!(excluded = rides.len() - sorted.len(), "negative fares left out of pareto curve");
    }
    let total: f64 = sorted.iter().map(|r| r.fare_value).sum();
    if sorted.is_empty() || total <= 0.0 {
        return ParetoCurve::default();
    }

    // `sort_by` is stable, which keeps the ranking reproducible.
    sorted.sort_by(|a, b| b.fare_value.partial_cmp(&a.fare_value).unwrap_or(Ordering::Equal));

    let mut cumulative_value = 0.0;
    let rows: Vec<ParetoRow> = sorted
        .into_iter()
        .enumerate()
        .map(|(idx, r)| {
            cumulative_value += r.fare_value;
            ParetoRow {
                rank: idx + 1,
                date: r.date,
                fare_value: r.fare_value,
                cumulative_value,
                cumulative_pct: 100.0 * cumulative_value / total,
            }
        })
        .collect();

    let summary = rows
        .iter()
        .find(|row| row.cumulative_pct >= PARETO_TARGET_PCT - PCT_TOLERANCE)
        .map(|row| ParetoSummary {
            cutoff_rank: row.rank,
            ride_share_pct: 100.0 * row.rank as f64 / rows.len() as f64,
        });

    ParetoCurve { rows, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(day: u32, value: f64) -> Ride {
        Ride {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            time: None,
            distance_km: 1.0,
            duration_minutes: 1.0,
            fare_value: value,
            category: String::new(),
            link: String::new(),
        }
    }

    #[test]
    fn cumulative_share_is_monotone_and_ends_at_100() {
        let rides: Vec<Ride> = [3.0, 50.0, 7.5, 12.0, 12.0, 0.5, 20.0]
            .iter()
            .enumerate()
            .map(|(i, v)| ride(i as u32 + 1, *v))
            .collect();
        let curve = pareto_curve(&rides);
        assert_eq!(curve.rows.len(), rides.len());
        for pair in curve.rows.windows(2) {
            assert!(pair[1].cumulative_pct >= pair[0].cumulative_pct);
            assert!(pair[1].fare_value <= pair[0].fare_value);
        }
        let last = curve.rows.last().unwrap();
        assert!((last.cumulative_pct - 100.0).abs() < 1e-9);
        assert_eq!(curve.rows[0].rank, 1);
    }

    #[test]
    fn ties_keep_input_order() {
        let rides = vec![ride(1, 10.0), ride(2, 10.0), ride(3, 10.0)];
        let curve = pareto_curve(&rides);
        let days: Vec<u32> = curve.rows.iter().map(|r| chrono::Datelike::day(&r.date)).collect();
        assert_eq!(days, vec![1, 2, 3]);
    }

    #[test]
    fn headline_statistic() {
        // 60 + 25 = 85% after two of five rides
        let rides = vec![ride(1, 5.0), ride(2, 60.0), ride(3, 5.0), ride(4, 25.0), ride(5, 5.0)];
        let summary = pareto_curve(&rides).summary.unwrap();
        assert_eq!(summary.cutoff_rank, 2);
        assert_eq!(summary.ride_share_pct, 40.0);
    }

    #[test]
    fn exactly_eighty_percent_counts() {
        let rides = vec![ride(1, 80.0), ride(2, 20.0)];
        assert_eq!(pareto_curve(&rides).summary.unwrap().cutoff_rank, 1);
    }

    #[test]
    fn negative_fares_do_not_break_the_share() {
        let rides = vec![ride(1, 50.0), ride(2, -20.0), ride(3, 30.0), ride(4, 20.0)];
        let curve = pareto_curve(&rides);
        assert_eq!(curve.rows.len(), 3);
        for pair in curve.rows.windows(2) {
            assert!(pair[1].cumulative_pct >= pair[0].cumulative_pct);
        }
        assert!(curve.rows.iter().all(|r| r.cumulative_pct <= 100.0 + 1e-9));
        assert!((curve.rows[2].cumulative_pct - 100.0).abs() < 1e-9);
        // 50 + 30 = 80% of the positive revenue
        assert_eq!(curve.summary.unwrap().cutoff_rank, 2);
    }

    #[test]
    fn only_negative_fares_give_empty_curve() {
        assert_eq!(pareto_curve(&[ride(1, -5.0), ride(2, -1.0)]), ParetoCurve::default());
    }

    #[test]
    fn empty_or_zero_revenue_gives_empty_curve() {
        assert_eq!(pareto_curve(&[]), ParetoCurve::default());
        assert_eq!(pareto_curve(&[ride(1, 0.0)]), ParetoCurve::default());
    }
}
