use crate::error::{ReportError, Result};
use crate::types::{Cost, DateRange, Ride};
use chrono::{Duration, NaiveDate};

/// How the caller picks the period to analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    /// Whole dataset.
    All,
    /// Inclusive `[start, end]`.
    Between { start: NaiveDate, end: NaiveDate },
    /// `n` days back from the last ride date.
    LastDays(u32),
}

impl DateFilter {
    /// Turn the filter into a concrete range using the dataset bounds.
    ///
    /// Returns `Ok(None)` when the dataset is empty and the filter depends on
    /// its bounds.
    pub fn resolve(&self, bounds: Option<DateRange>) -> Result<Option<DateRange>> {
        match *self {
            DateFilter::All => Ok(bounds),
            DateFilter::Between { start, end } => {
                if start > end {
                    return Err(ReportError::InvalidRange { start, end });
                }
                Ok(Some(DateRange { start, end }))
            }
            // A window reaching past the calendar covers the whole dataset.
            DateFilter::LastDays(n) => Ok(bounds.map(|b| DateRange {
                start: b
                    .end
                    .checked_sub_signed(Duration::days(i64::from(n)))
                    .unwrap_or(b.start),
                end: b.end,
            })),
        }
    }
}

pub fn filter_rides(rides: &[Ride], range: &DateRange) -> Vec<Ride> {
    rides.iter().filter(|r| range.contains(r.date)).cloned().collect()
}

pub fn filter_costs(costs: &[Cost], range: &DateRange) -> Vec<Cost> {
    costs.iter().filter(|c| range.contains(c.date)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn bounds() -> Option<DateRange> {
        Some(DateRange { start: d(1, 1), end: d(3, 31) })
    }

    #[test]
    fn all_uses_dataset_bounds() {
        assert_eq!(DateFilter::All.resolve(bounds()).unwrap(), bounds());
        assert_eq!(DateFilter::All.resolve(None).unwrap(), None);
    }

    #[test]
    fn last_days_counts_back_from_last_ride() {
        let range = DateFilter::LastDays(30).resolve(bounds()).unwrap().unwrap();
        assert_eq!(range, DateRange { start: d(3, 1), end: d(3, 31) });
    }

    #[test]
    fn huge_last_days_window_covers_everything() {
        let range = DateFilter::LastDays(u32::MAX).resolve(bounds()).unwrap().unwrap();
        assert_eq!(range.end, d(3, 31));
        assert!(range.start <= d(1, 1));
        assert!(range.contains(d(1, 1)));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = DateFilter::Between { start: d(3, 2), end: d(3, 1) }.resolve(bounds()).unwrap_err();
        assert!(matches!(err, ReportError::InvalidRange { .. }));
    }

    #[test]
    fn filters_are_inclusive() {
        let range = DateRange { start: d(3, 1), end: d(3, 2) };
        let costs = vec![
            Cost { date: d(2, 28), value: 1.0 },
            Cost { date: d(3, 1), value: 2.0 },
            Cost { date: d(3, 2), value: 3.0 },
            Cost { date: d(3, 3), value: 4.0 },
        ];
        let kept = filter_costs(&costs, &range);
        assert_eq!(kept.iter().map(|c| c.value).collect::<Vec<_>>(), vec![2.0, 3.0]);
    }
}
