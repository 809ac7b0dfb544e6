use crate::error::{ReportError, Result};
use crate::types::{Cost, LoadReport, RawCostRow, RawRideRow, Ride};
use crate::util::{parse_date_safe, parse_f64_safe, parse_time_safe};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Read the rides export. `decimal_comma` selects how ambiguous numbers such
/// as `3,125` are read (see [`parse_f64_safe`]).
pub fn load_rides(path: &Path, decimal_comma: bool) -> Result<(Vec<Ride>, LoadReport)> {
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| ReportError::Csv { path: path.to_path_buf(), source })?;
    let (rides, report) = clean_rides(rdr, decimal_comma);
    tracing::info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        missing_time = report.missing_time,
        "loaded rides"
    );
    Ok((rides, report))
}

pub fn load_costs(path: &Path, decimal_comma: bool) -> Result<(Vec<Cost>, LoadReport)> {
    let rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| ReportError::Csv { path: path.to_path_buf(), source })?;
    let (costs, report) = clean_costs(rdr, decimal_comma);
    tracing::info!(
        path = %path.display(),
        total = report.total_rows,
        loaded = report.loaded_rows,
        skipped = report.skipped_rows,
        "loaded costs"
    );
    Ok((costs, report))
}

pub fn read_rides<R: Read>(reader: R, decimal_comma: bool) -> (Vec<Ride>, LoadReport) {
    clean_rides(
        ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_reader(reader),
        decimal_comma,
    )
}

pub fn read_costs<R: Read>(reader: R, decimal_comma: bool) -> (Vec<Cost>, LoadReport) {
    clean_costs(
        ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_reader(reader),
        decimal_comma,
    )
}

fn clean_rides<R: Read>(mut rdr: csv::Reader<R>, decimal_comma: bool) -> (Vec<Ride>, LoadReport) {
    let number = |cell: Option<&str>| parse_f64_safe(cell, decimal_comma);
    let mut report = LoadReport::default();
    let mut rides = Vec::new();

    for (idx, result) in rdr.deserialize::<RawRideRow>().enumerate() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row = idx + 1, error = %e, "unreadable ride row");
                report.skipped_rows += 1;
                continue;
            }
        };

        // A ride without a date cannot be placed in any bucket, and one
        // without a fare contributes nothing.
        let Some(date) = parse_date_safe(row.date.as_deref()) else {
            tracing::warn!(row = idx + 1, "ride row without a valid date");
            report.skipped_rows += 1;
            continue;
        };
        let Some(fare_value) = number(row.fare_value.as_deref()) else {
            tracing::warn!(row = idx + 1, "ride row without a valid fare");
            report.skipped_rows += 1;
            continue;
        };

        let time = parse_time_safe(row.time.as_deref());
        if time.is_none() {
            report.missing_time += 1;
        }

        rides.push(Ride {
            date,
            time,
            distance_km: number(row.distance_km.as_deref()).unwrap_or(0.0),
            duration_minutes: number(row.duration_minutes.as_deref()).unwrap_or(0.0),
            fare_value,
            category: row.category.unwrap_or_default().trim().to_string(),
            link: row.link.unwrap_or_default().trim().to_string(),
        });
    }

    report.loaded_rows = rides.len();
    (rides, report)
}

fn clean_costs<R: Read>(mut rdr: csv::Reader<R>, decimal_comma: bool) -> (Vec<Cost>, LoadReport) {
    let mut report = LoadReport::default();
    let mut costs = Vec::new();

    for result in rdr.deserialize::<RawCostRow>() {
        report.total_rows += 1;
        let Ok(row) = result else {
            report.skipped_rows += 1;
            continue;
        };
        match (
            parse_date_safe(row.date.as_deref()),
            parse_f64_safe(row.value.as_deref(), decimal_comma),
        ) {
            (Some(date), Some(value)) => costs.push(Cost { date, value }),
            _ => report.skipped_rows += 1,
        }
    }

    report.loaded_rows = costs.len();
    (costs, report)
}
