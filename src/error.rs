use chrono::NaiveDate;
use std::path::PathBuf;

/// Errors surfaced by the report library.
///
/// Bad rows and zero divisors are not errors; they are counted in a
/// `LoadReport` or reported as `None` on the affected metric.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV write error: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid goal: {0}")]
    InvalidGoal(String),

    #[error("No data loaded")]
    NoData,
}

pub type Result<T> = std::result::Result<T, ReportError>;
