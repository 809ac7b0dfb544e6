//! Report configuration.
//!
//! Values come from an optional TOML file and are then overridden by
//! command-line flags in `main`.

use crate::error::{ReportError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "ride_report.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub rides_path: PathBuf,
    pub costs_path: PathBuf,
    pub output_dir: PathBuf,
    pub histogram_bins: usize,
    pub currency_symbol: String,
    pub decimal_comma: bool,
    pub preview_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rides_path: PathBuf::from("rides.csv"),
            costs_path: PathBuf::from("costs.csv"),
            output_dir: PathBuf::from("."),
            histogram_bins: 30,
            currency_symbol: "R$".to_string(),
            decimal_comma: true,
            preview_rows: 5,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit path the file must exist. Without one, the default
    /// file is read when present and built-in defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content).map_err(|source| ReportError::Config {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(content)?;
        if config.histogram_bins == 0 {
            config.histogram_bins = Self::default().histogram_bins;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml("rides_path = \"data/corridas.csv\"\nhistogram_bins = 0\n").unwrap();
        assert_eq!(config.rides_path, PathBuf::from("data/corridas.csv"));
        assert_eq!(config.costs_path, PathBuf::from("costs.csv"));
        assert_eq!(config.histogram_bins, 30);
        assert!(config.decimal_comma);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "histogram_bins = \"many\"").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }
}
