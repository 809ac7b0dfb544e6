use crate::types::Ride;
use crate::util::{average, median, ratio, std_dev};
use chrono::Weekday;
use serde::Serialize;

/// Weekdays with fewer rides than this are left out: the dispersion
/// statistics are not reliable below it.
pub const MIN_RIDES_PER_WEEKDAY: usize = 3;

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayStats {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    /// `std_dev / mean * 100`, `None` when the mean is zero.
    pub cv_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayExtremes {
    pub best: WeekdayStats,
    pub worst: WeekdayStats,
}

pub(crate) fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Per-weekday fare statistics in Monday..Sunday order.
pub fn weekday_stats(rides: &[Ride]) -> Vec<WeekdayStats> {
    let mut values: [Vec<f64>; 7] = Default::default();
    for r in rides {
        values[r.weekday().num_days_from_monday() as usize].push(r.fare_value);
    }

    WEEKDAYS
        .iter()
        .zip(values)
        .filter(|(_, v)| v.len() >= MIN_RIDES_PER_WEEKDAY)
        .filter_map(|(day, v)| {
            let mean = average(&v)?;
            let std_dev = std_dev(&v)?;
            Some(WeekdayStats {
                weekday: *day,
                count: v.len(),
                total: v.iter().sum(),
                mean,
                median: median(v.clone())?,
                std_dev,
                cv_pct: ratio(std_dev, mean).map(|r| r * 100.0),
            })
        })
        .collect()
}

/// Weekdays with the highest and lowest median fare. Ties go to the earlier
/// weekday.
pub fn best_and_worst(stats: &[WeekdayStats]) -> Option<WeekdayExtremes> {
    let first = stats.first()?;
    let mut best = first;
    let mut worst = first;
    for s in &stats[1..] {
        if s.median > best.median {
            best = s;
        }
        if s.median < worst.median {
            worst = s;
        }
    }
    Some(WeekdayExtremes { best: best.clone(), worst: worst.clone() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2025-03-03 is a Monday.
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
    fn two_rides_excluded_three_included() {
        let rides = vec![
            ride(3, 10.0),
            ride(3, 12.0),
            ride(4, 10.0),
            ride(4, 20.0),
            ride(11, 30.0),
        ];
        let stats = weekday_stats(&rides);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].weekday, Weekday::Tue);
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].median, 20.0);
        assert_eq!(stats[0].mean, 20.0);
        assert_eq!(stats[0].std_dev, 10.0);
        assert_eq!(stats[0].cv_pct, Some(50.0));
    }

    #[test]
    fn canonical_order_and_extremes() {
        let mut rides = Vec::new();
        for v in [5.0, 6.0, 7.0] {
            rides.push(ride(9, v)); // Sunday
        }
        for v in [20.0, 21.0, 22.0] {
            rides.push(ride(5, v)); // Wednesday
        }
        for v in [10.0, 11.0, 12.0] {
            rides.push(ride(3, v)); // Monday
        }
        let stats = weekday_stats(&rides);
        let order: Vec<Weekday> = stats.iter().map(|s| s.weekday).collect();
        assert_eq!(order, vec![Weekday::Mon, Weekday::Wed, Weekday::Sun]);

        let extremes = best_and_worst(&stats).unwrap();
        assert_eq!(extremes.best.weekday, Weekday::Wed);
        assert_eq!(extremes.worst.weekday, Weekday::Sun);
    }

    #[test]
    fn zero_mean_has_undefined_cv() {
        let rides = vec![ride(3, 0.0), ride(3, 0.0), ride(3, 0.0)];
        let stats = weekday_stats(&rides);
        assert_eq!(stats[0].cv_pct, None);
    }

    #[test]
    fn no_qualifying_weekday_means_no_extremes() {
        let stats = weekday_stats(&[ride(3, 1.0), ride(4, 2.0)]);
        assert!(stats.is_empty());
        assert!(best_and_worst(&stats).is_none());
    }
}
