//! Ride income reporting: period comparisons, profitability ratios, Pareto
//! share, weekday statistics and goal simulation over two spreadsheet
//! exports (rides and operating costs).

pub mod config;
pub mod delta;
pub mod error;
pub mod filter;
pub mod goal;
pub mod loader;
pub mod output;
pub mod overview;
pub mod pareto;
pub mod period;
pub mod profitability;
pub mod reports;
pub mod store;
pub mod types;
pub mod util;
pub mod weekday;

pub use error::{ReportError, Result};
