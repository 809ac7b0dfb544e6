use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// One row of the ride spreadsheet export, exactly as the CSV reader sees it.
///
/// Headers follow the original Portuguese sheet; the English names are
/// accepted as aliases.
#[derive(Debug, Deserialize)]
pub struct RawRideRow {
    #[serde(rename = "Tipo", alias = "category")]
    pub category: Option<String>,
    #[serde(rename = "KM", alias = "distance_km")]
    pub distance_km: Option<String>,
    #[serde(rename = "Duracao", alias = "duration_minutes")]
    pub duration_minutes: Option<String>,
    #[serde(rename = "Valor", alias = "fare_value")]
    pub fare_value: Option<String>,
    #[serde(rename = "Link", alias = "link")]
    pub link: Option<String>,
    #[serde(rename = "Data", alias = "date")]
    pub date: Option<String>,
    #[serde(rename = "Hora", alias = "time")]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCostRow {
    #[serde(rename = "Data", alias = "date")]
    pub date: Option<String>,
    #[serde(rename = "Valor", alias = "value")]
    pub value: Option<String>,
}

/// Coarse time-of-day bucket derived from a ride's start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

/// Half-open hour ranges `[start, end)` for the daytime shifts. Every hour
/// not covered here is `Night`.
const SHIFT_HOURS: [(Shift, u32, u32); 2] = [(Shift::Morning, 5, 12), (Shift::Afternoon, 12, 18)];

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    pub fn from_hour(hour: u32) -> Self {
        SHIFT_HOURS
            .iter()
            .find(|(_, start, end)| (*start..*end).contains(&hour))
            .map(|(shift, _, _)| *shift)
            .unwrap_or(Shift::Night)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Night => "Night",
        }
    }
}

/// A ride after cleaning. `time` is `None` when the sheet had no usable
/// time of day; such rides still count towards revenue totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ride {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub fare_value: f64,
    pub category: String,
    pub link: String,
}

impl Ride {
    pub fn hour(&self) -> Option<u32> {
        self.time.map(|t| t.hour())
    }

    pub fn weekday(&self) -> Weekday {
        chrono::Datelike::weekday(&self.date)
    }

    pub fn shift(&self) -> Option<Shift> {
        self.hour().map(Shift::from_hour)
    }
}

/// An operational expense entry (fuel, maintenance, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cost {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub missing_time: usize,
}

/// Inclusive date range a dashboard view is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
