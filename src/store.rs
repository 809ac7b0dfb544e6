//! In-memory store for the loaded ride and cost tables.
//!
//! The store is owned by the caller and passed around explicitly. Data stays
//! cached until `reload` is called; every computation works on slices taken
//! from it and never mutates the cached rows.

use crate::error::{ReportError, Result};
use crate::loader;
use crate::types::{Cost, DateRange, LoadReport, Ride};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
struct Loaded {
    rides: Vec<Ride>,
    costs: Vec<Cost>,
    rides_report: LoadReport,
    costs_report: LoadReport,
}

#[derive(Debug, Clone)]
pub struct DataStore {
    rides_path: PathBuf,
    costs_path: PathBuf,
    decimal_comma: bool,
    loaded: Option<Loaded>,
}

impl DataStore {
    pub fn new(rides_path: impl Into<PathBuf>, costs_path: impl Into<PathBuf>) -> Self {
        Self {
            rides_path: rides_path.into(),
            costs_path: costs_path.into(),
            decimal_comma: true,
            loaded: None,
        }
    }

    /// Number convention used when the files are read: `true` for
    /// `1.234,56`, `false` for `1,234.56`.
    pub fn with_decimal_comma(mut self, decimal_comma: bool) -> Self {
        self.decimal_comma = decimal_comma;
        self
    }

    /// Build a store around rows that are already in memory.
    pub fn from_rows(rides: Vec<Ride>, costs: Vec<Cost>) -> Self {
        let rides_report = LoadReport {
            total_rows: rides.len(),
            loaded_rows: rides.len(),
            ..LoadReport::default()
        };
        let costs_report = LoadReport {
            total_rows: costs.len(),
            loaded_rows: costs.len(),
            ..LoadReport::default()
        };
        Self {
            rides_path: PathBuf::new(),
            costs_path: PathBuf::new(),
            decimal_comma: true,
            loaded: Some(Loaded { rides, costs, rides_report, costs_report }),
        }
    }

    pub fn rides_path(&self) -> &Path {
        &self.rides_path
    }

    pub fn costs_path(&self) -> &Path {
        &self.costs_path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Load both tables unless they are already cached.
    pub fn load(&mut self) -> Result<()> {
        if self.loaded.is_some() {
            return Ok(());
        }
        self.reload()
    }

    /// Drop the cache and read both files again.
    pub fn reload(&mut self) -> Result<()> {
        self.loaded = None;
        let (rides, rides_report) = loader::load_rides(&self.rides_path, self.decimal_comma)?;
        let (costs, costs_report) = loader::load_costs(&self.costs_path, self.decimal_comma)?;
        self.loaded = Some(Loaded { rides, costs, rides_report, costs_report });
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.loaded = None;
    }

    pub fn rides(&self) -> Result<&[Ride]> {
        self.loaded.as_ref().map(|l| l.rides.as_slice()).ok_or(ReportError::NoData)
    }

    pub fn costs(&self) -> Result<&[Cost]> {
        self.loaded.as_ref().map(|l| l.costs.as_slice()).ok_or(ReportError::NoData)
    }

    pub fn load_reports(&self) -> Option<(&LoadReport, &LoadReport)> {
        self.loaded.as_ref().map(|l| (&l.rides_report, &l.costs_report))
    }

    /// First and last ride dates, `None` when there are no rides.
    pub fn date_bounds(&self) -> Result<Option<DateRange>> {
        let rides = self.rides()?;
        let start = rides.iter().map(|r| r.date).min();
        let end = rides.iter().map(|r| r.date).max();
        Ok(start.zip(end).map(|(start, end)| DateRange { start, end }))
    }
}
