//! Nutrilog Info Tool
//!
//! Provides runtime status information about the Nutrilog service.

use std::path::PathBuf;
use std::time::Instant;

use serde::Serialize;

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::Food;

/// How to use the food and log tools, for AI assistants
pub const USAGE_INSTRUCTIONS: &str = r#"
# Nutrilog Usage

## Foods
- Every food declares its nutrients per a reference `amount` (e.g. 100 g, 1 cup, 1 serving).
- A food may also have a `serving`, named `sizes` ("1 slice = 28 g") and a `density`
  ("240 g = 1 cup") that let it be measured in other units.
- Call `food_units` to see which unit strings a food accepts.

## Amounts
An amount is a number plus a unit string:
- weights: g, kg, mg, oz, lb
- volumes: ml, l, tsp, tbsp, fl oz, cup, pint, quart, gallon
  (regional variants follow the configured volume units, or name one explicitly: cup_metric)
- serving
- a size name ("slice"), or a volume unit plus a volume-prefixed size ("cup shredded")

Amounts that cannot be related to the food's reference amount are rejected when logging.
If a size is later removed, entries using it count as zero.

## Logging
- `log_food` with a date (YYYY-MM-DD, defaults to today) and meal
  (breakfast, lunch, dinner, snack, unspecified).
- `get_day` returns every entry with its nutrients and the day totals.
"#;

/// Status information
#[derive(Debug, Serialize)]
pub struct NutrilogInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub food_count: i64,
    pub volume_units: String,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub instructions: &'static str,
}

/// Tracks service start time and location for status reports
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    volume_units: String,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf, volume_units: String) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            volume_units,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> Result<NutrilogInfo, String> {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let food_count = db
            .with_conn(Food::count)
            .map_err(|e| format!("Database error: {}", e))?;

        Ok(NutrilogInfo {
            name: build_info.name,
            version: build_info.version,
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            food_count,
            volume_units: self.volume_units.clone(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: std::process::id(),
            instructions: USAGE_INSTRUCTIONS,
        })
    }
}
