//! Settings for the knockout CLI
//!
//! ```toml
//! color = true
//! log_level = "info"
//!
//! [rating]
//! spread = 1.0
//! speed = 0.2
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::elo::RatingParams;

/// File looked up in the working directory when no config is given
pub const DEFAULT_CONFIG_FILE: &str = "knockout.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rating parameters for records without a `:rating` directive
    pub rating: RatingParams,
    /// Highlight winners and losers with ANSI colours
    pub color: bool,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rating: RatingParams::default(),
            color: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, String> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| format!("Failed to parse settings: {}", e))?;
        RatingParams::new(settings.rating.spread, settings.rating.speed)
            .map_err(|e| e.to_string())?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&contents)
    }

    /// Settings from `path` if given, else from [`DEFAULT_CONFIG_FILE`] when
    /// it exists, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self, String> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_toml("color = false\n[rating]\nspread = 400.0\nspeed = 32.0\n").unwrap();

        assert!(!settings.color);
        assert_eq!(settings.rating, RatingParams::new(400.0, 32.0).unwrap());
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_invalid_rating_rejected() {
        assert!(Settings::from_toml("[rating]\nspread = 0.0\nspeed = 0.2\n").is_err());
        assert!(Settings::from_toml("color = 3").is_err());
    }
}
