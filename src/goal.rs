//! Revenue goal simulation against the observed pace of the filtered rides.

use crate::error::{ReportError, Result};
use crate::types::{Ride, Shift};
use crate::util::{average, median, ratio};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Goal {
    pub target_revenue: f64,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftAllocation {
    pub shift: Shift,
    /// Share of rides with a known time that fell in this shift.
    pub share_pct: f64,
    pub required_rides_per_day: Option<f64>,
    pub observed_rides_per_day: Option<f64>,
    pub observed_revenue_per_day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPlan {
    pub goal: Goal,
    pub required_daily_revenue: f64,
    pub mean_revenue_per_ride: Option<f64>,
    pub median_revenue_per_ride: Option<f64>,
    pub required_rides_per_day: Option<f64>,
    pub current_daily_revenue: Option<f64>,
    pub current_rides_per_day: Option<f64>,
    pub days_to_goal: Option<f64>,
    pub achievable: bool,
    pub shifts: Vec<ShiftAllocation>,
}

impl Goal {
    pub fn new(target_revenue: f64, days: u32) -> Result<Self> {
        if !target_revenue.is_finite() || target_revenue <= 0.0 {
            return Err(ReportError::InvalidGoal(format!(
                "target revenue must be positive, got {}",
                target_revenue
            )));
        }
        if days == 0 {
            return Err(ReportError::InvalidGoal("days must be at least 1".to_string()));
        }
        Ok(Self { target_revenue, days })
    }
}

pub fn simulate(rides: &[Ride], goal: Goal) -> GoalPlan {
    let required_daily_revenue = goal.target_revenue / f64::from(goal.days);

    let fares: Vec<f64> = rides.iter().map(|r| r.fare_value).collect();
    let mean_revenue_per_ride = average(&fares);
    let required_rides_per_day =
        mean_revenue_per_ride.and_then(|m| ratio(required_daily_revenue, m)).filter(|v| *v >= 0.0);

    let mut per_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for r in rides {
        let e = per_day.entry(r.date).or_insert((0.0, 0));
        e.0 += r.fare_value;
        e.1 += 1;
    }
    let active_days = per_day.len();
    let daily_revenue: Vec<f64> = per_day.values().map(|(v, _)| *v).collect();
    let daily_rides: Vec<f64> = per_day.values().map(|(_, c)| *c as f64).collect();
    let current_daily_revenue = average(&daily_revenue);
    let current_rides_per_day = average(&daily_rides);

    let days_to_goal = current_daily_revenue
        .filter(|pace| *pace > 0.0)
        .and_then(|pace| ratio(goal.target_revenue, pace));
    let achievable = current_daily_revenue.is_some_and(|pace| pace >= required_daily_revenue);

    let shifts = allocate_shifts(rides, required_rides_per_day, active_days);

    tracing::debug!(
        target = goal.target_revenue,
        days = goal.days,
        achievable,
        "simulated goal"
    );

    GoalPlan {
        goal,
        required_daily_revenue,
        mean_revenue_per_ride,
        median_revenue_per_ride: median(fares),
        required_rides_per_day,
        current_daily_revenue,
        current_rides_per_day,
        days_to_goal,
        achievable,
        shifts,
    }
}

fn allocate_shifts(
    rides: &[Ride],
    required_rides_per_day: Option<f64>,
    active_days: usize,
) -> Vec<ShiftAllocation> {
    let mut counts: HashMap<Shift, (usize, f64)> = HashMap::new();
    for r in rides {
        if let Some(shift) = r.shift() {
            let e = counts.entry(shift).or_insert((0, 0.0));
            e.0 += 1;
            e.1 += r.fare_value;
        }
    }
    let classified: usize = counts.values().map(|(c, _)| c).sum();
    let days = active_days as f64;

    Shift::ALL
        .iter()
        .map(|shift| {
            let (count, revenue) = counts.get(shift).copied().unwrap_or((0, 0.0));
            let share_pct = ratio(count as f64, classified as f64).map(|r| r * 100.0).unwrap_or(0.0);
            ShiftAllocation {
                shift: *shift,
                share_pct,
                required_rides_per_day: required_rides_per_day.map(|req| req * share_pct / 100.0),
                observed_rides_per_day: ratio(count as f64, days),
                observed_revenue_per_day: ratio(revenue, days),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn ride(day: u32, hour: Option<u32>, value: f64) -> Ride {
        Ride {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            time: hour.and_then(|h| NaiveTime::from_hms_opt(h, 0, 0)),
            distance_km: 1.0,
            duration_minutes: 1.0,
            fare_value: value,
            category: String::new(),
            link: String::new(),
        }
    }

    #[test]
    fn rejects_invalid_goals() {
        assert!(matches!(Goal::new(0.0, 10), Err(ReportError::InvalidGoal(_))));
        assert!(matches!(Goal::new(100.0, 0), Err(ReportError::InvalidGoal(_))));
        assert!(Goal::new(100.0, 1).is_ok());
    }

    #[test]
    fn plan_from_history() {
        // Two days: 100 over 4 rides, 50 over 1 ride.
        let rides = vec![
            ride(1, Some(8), 25.0),
            ride(1, Some(9), 25.0),
            ride(1, Some(14), 25.0),
            ride(1, Some(20), 25.0),
            ride(2, None, 50.0),
        ];
        let plan = simulate(&rides, Goal::new(3000.0, 30).unwrap());
        assert_eq!(plan.required_daily_revenue, 100.0);
        assert_eq!(plan.mean_revenue_per_ride, Some(30.0));
        assert!((plan.required_rides_per_day.unwrap() - 100.0 / 30.0).abs() < 1e-12);
        assert_eq!(plan.current_daily_revenue, Some(75.0));
        assert_eq!(plan.current_rides_per_day, Some(2.5));
        assert_eq!(plan.days_to_goal, Some(40.0));
        assert!(!plan.achievable);

        let morning = &plan.shifts[0];
        assert_eq!(morning.shift, Shift::Morning);
        assert_eq!(morning.share_pct, 50.0);
        assert_eq!(morning.observed_rides_per_day, Some(1.0));
        assert_eq!(morning.observed_revenue_per_day, Some(25.0));
        let shares: f64 = plan.shifts.iter().map(|s| s.share_pct).sum();
        assert_eq!(shares, 100.0);
    }

    #[test]
    fn achievable_when_pace_matches() {
        let rides = vec![ride(1, Some(10), 100.0)];
        let plan = simulate(&rides, Goal::new(1000.0, 10).unwrap());
        assert!(plan.achievable);
        assert_eq!(plan.days_to_goal, Some(10.0));
    }

    #[test]
    fn empty_history_leaves_ratios_undefined() {
        let plan = simulate(&[], Goal::new(500.0, 5).unwrap());
        assert_eq!(plan.required_daily_revenue, 100.0);
        assert_eq!(plan.mean_revenue_per_ride, None);
        assert_eq!(plan.required_rides_per_day, None);
        assert_eq!(plan.current_daily_revenue, None);
        assert_eq!(plan.days_to_goal, None);
        assert!(!plan.achievable);
        assert!(plan.shifts.iter().all(|s| s.share_pct == 0.0 && s.required_rides_per_day.is_none()));
    }
}
