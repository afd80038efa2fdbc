//! Analysis Configuration
//! Fixed defaults for one analysis run, optionally overridden by `eda.json`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "eda.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Settings for a single pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Listings spreadsheet (or CSV export).
    pub input_path: PathBuf,
    /// Rows with more minimum nights than this are outliers.
    pub max_minimum_nights: i64,
    /// Rows priced above this are outliers.
    pub max_price: f64,
    /// Size of the most expensive neighbourhood ranking.
    pub top_priced: usize,
    /// Size of the least available neighbourhood ranking.
    pub least_available: usize,
    /// Map centre as (latitude, longitude).
    pub map_center: (f64, f64),
    pub map_zoom: u8,
    /// Where the map HTML is written. Defaults to the system temp directory.
    pub map_output: Option<PathBuf>,
    pub open_map: bool,
    /// Show the native chart window.
    pub show_charts: bool,
    /// Also render every chart to PNG in this directory.
    pub export_dir: Option<PathBuf>,
    /// Also write the analysis results as JSON.
    pub summary_path: Option<PathBuf>,
    /// Fallback filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("database").join("airbnb_database.xlsx"),
            max_minimum_nights: 30,
            max_price: 3000.0,
            top_priced: 10,
            least_available: 5,
            map_center: (-22.9068, -43.1729),
            map_zoom: 12,
            map_output: None,
            open_map: true,
            show_charts: true,
            export_dir: None,
            summary_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl AnalysisConfig {
    /// Load the config file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_minimum_nights < 0 {
            return Err(ConfigError::Invalid(
                "max_minimum_nights must not be negative".to_string(),
            ));
        }
        if !self.max_price.is_finite() || self.max_price < 0.0 {
            return Err(ConfigError::Invalid(
                "max_price must be a non-negative number".to_string(),
            ));
        }
        let (lat, lon) = self.map_center;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ConfigError::Invalid(format!(
                "map_center ({lat}, {lon}) is not a valid coordinate"
            )));
        }
        if self.map_zoom > 20 {
            return Err(ConfigError::Invalid("map_zoom must be at most 20".to_string()));
        }
        Ok(())
    }

    /// Resolved location of the map document.
    pub fn map_path(&self) -> PathBuf {
        self.map_output
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("rio_listings_map.html"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_rio_analysis() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_minimum_nights, 30);
        assert_eq!(config.max_price, 3000.0);
        assert_eq!(config.top_priced, 10);
        assert_eq!(config.least_available, 5);
        assert_eq!(config.map_center, (-22.9068, -43.1729));
        assert_eq!(config.map_zoom, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_price": 1500.0, "show_charts": false}}"#).unwrap();

        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_price, 1500.0);
        assert!(!config.show_charts);
        assert_eq!(config.max_minimum_nights, 30);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_prize": 10}}"#).unwrap();

        let err = AnalysisConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn out_of_range_centre_is_invalid() {
        let config = AnalysisConfig {
            map_center: (123.0, 0.0),
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
