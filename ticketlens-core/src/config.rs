//! Dashboard defaults loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! data_path = "normalized_listings.json.gz"
//! default_section = "112"
//! default_price_ceiling = 1600.0
//! table_limit = 200
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Listing file to load when no path is given on the command line.
    pub data_path: PathBuf,
    /// Section preselected when it exists in the data.
    pub default_section: Option<String>,
    /// Upper end of the default price range.
    pub default_price_ceiling: f64,
    /// Maximum rows printed in table output; `None` prints all.
    pub table_limit: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("normalized_listings.json.gz"),
            default_section: Some("112".to_string()),
            default_price_ceiling: 1600.0,
            table_limit: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.default_price_ceiling.is_finite() || self.default_price_ceiling < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "default_price_ceiling must be a non-negative number, got {}",
                self.default_price_ceiling
            )));
        }
        if self.table_limit == Some(0) {
            return Err(ConfigError::Invalid("table_limit must be at least 1".into()));
        }
        Ok(())
    }
}
