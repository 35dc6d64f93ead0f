// Settings module
// User preferences stored as TOML in the project config directory

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_holiday_country() -> String {
    "US".to_string()
}

fn default_show_holidays() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// ISO 3166 country code passed to the holiday feed
    #[serde(default = "default_holiday_country")]
    pub holiday_country: String,
    /// Holiday feed key; the environment is consulted when unset
    #[serde(default)]
    pub holiday_api_key: Option<String>,
    #[serde(default = "default_show_holidays")]
    pub show_holidays: bool,
    /// Stacked rows drawn per day before the rest collapse into "+N more".
    /// Unset draws every row.
    #[serde(default)]
    pub max_visible_rows: Option<usize>,
    /// Event database location; the project data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            holiday_country: default_holiday_country(),
            holiday_api_key: None,
            show_holidays: default_show_holidays(),
            max_visible_rows: None,
            database_path: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        let country = self.holiday_country.trim();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!(
                "Holiday country must be a two-letter code, got '{}'",
                self.holiday_country
            ));
        }

        if self.max_visible_rows == Some(0) {
            return Err("max_visible_rows must be at least 1".to_string());
        }

        Ok(())
    }
}
