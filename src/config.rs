//! Runtime configuration
//!
//! Read from environment variables at startup.

use std::path::PathBuf;

use serde::Serialize;

use crate::nutrition::VolumeUnits;

/// Overrides the database location
pub const DATABASE_PATH_VAR: &str = "NUTRILOG_DATABASE_PATH";

/// Selects the regional volume units: `us`, `metric` or `imperial`
pub const VOLUME_UNITS_VAR: &str = "NUTRILOG_VOLUME_UNITS";

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub database_path: PathBuf,
    /// Name of the selected volume unit preference
    pub volume_units_name: String,
    /// Regional variants used for bare "cup", "tbsp", ... in amounts
    pub volume_units: VolumeUnits,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(DATABASE_PATH_VAR).ok(),
            std::env::var(VOLUME_UNITS_VAR).ok(),
        )
    }

    /// Build the configuration from raw variable values
    pub fn from_vars(database_path: Option<String>, volume_units: Option<String>) -> Self {
        let database_path = database_path
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let requested = volume_units.unwrap_or_else(|| "us".to_string());
        let (volume_units_name, volume_units) = match VolumeUnits::from_name(&requested) {
            Some(units) => (requested.trim().to_lowercase(), units),
            None => {
                tracing::warn!(
                    "Unknown {} value '{}', using US customary units",
                    VOLUME_UNITS_VAR,
                    requested
                );
                ("us".to_string(), VolumeUnits::us_customary())
            }
        };

        Self {
            database_path,
            volume_units_name,
            volume_units,
        }
    }
}

/// `<project>/data/nutrilog.db`, located relative to the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(parent) = path.parent() {
            if let Some(grandparent) = parent.parent() {
                path = grandparent.to_path_buf();
            }
        }
    }

    path.push("data");
    path.push("nutrilog.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{VolumeUnit, VolumeUnitType};

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(None, None);
        assert!(config.database_path.ends_with("data/nutrilog.db"));
        assert_eq!(config.volume_units_name, "us");
        assert_eq!(config.volume_units.unit(VolumeUnitType::Cup), VolumeUnit::CupUs);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(Some("/tmp/food.db".to_string()), Some("Metric".to_string()));
        assert_eq!(config.database_path, PathBuf::from("/tmp/food.db"));
        assert_eq!(config.volume_units_name, "metric");
        assert_eq!(config.volume_units.unit(VolumeUnitType::Cup), VolumeUnit::CupMetric);
    }

    #[test]
    fn test_unknown_volume_units_fall_back() {
        let config = Config::from_vars(None, Some("martian".to_string()));
        assert_eq!(config.volume_units_name, "us");
        assert_eq!(config.volume_units, VolumeUnits::us_customary());
    }
}
