//! Food Log MCP Tools
//!
//! Tools for logging food amounts and reading back day totals.

use serde::Serialize;

use super::amounts::parse_amount;
use super::foods::parse_food_id;
use crate::db::Database;
use crate::models::{
    calculate_day_nutrients, validate_date, Food, FoodEntry, FoodEntryCreate, FoodEntryDetail,
    MealType, Nutrients,
};
use crate::nutrition::VolumeUnits;

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: FoodEntryDetail,
    pub day_totals: Nutrients,
}

/// Response for get_day
#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: String,
    pub entries: Vec<FoodEntryDetail>,
    /// Entries whose unit no longer resolves; they count as zero
    pub unresolved_entries: usize,
    pub totals: Nutrients,
}

/// Response for delete_food_entry
#[derive(Debug, Serialize)]
pub struct DeleteEntryResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub date: String,
    pub day_totals: Nutrients,
}

/// Today's date in the local timezone
pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Log `value unit` of a food on a date
#[allow(clippy::too_many_arguments)]
pub fn log_food(
    db: &Database,
    food_id: &str,
    value: f64,
    unit: &str,
    date: Option<&str>,
    meal: Option<&str>,
    notes: Option<String>,
    units: &VolumeUnits,
) -> Result<LogFoodResponse, String> {
    let food_id = parse_food_id(food_id)?;
    let date = date.map(str::to_string).unwrap_or_else(today);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let food = Food::get_by_id(&conn, &food_id)
        .map_err(|e| format!("Failed to get food: {}", e))?
        .ok_or_else(|| format!("Food not found with id: {}", food_id))?;
    let amount = parse_amount(&food.measures, value, unit, units)?;

    let data = FoodEntryCreate {
        date: date.clone(),
        meal: meal.map(MealType::from_str).unwrap_or_default(),
        food_id,
        amount,
        notes,
    };
    let entry = FoodEntry::create(&conn, &data).map_err(|e| format!("Failed to log food: {}", e))?;

    let day_totals = calculate_day_nutrients(&conn, &date)
        .map_err(|e| format!("Failed to calculate day totals: {}", e))?;

    Ok(LogFoodResponse {
        entry: entry.detail(&food),
        day_totals,
    })
}

/// All entries for a date with their nutrients and the day totals
pub fn get_day(db: &Database, date: &str) -> Result<DayResponse, String> {
    validate_date(date).map_err(|e| e.to_string())?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = FoodEntry::details_for_date(&conn, date)
        .map_err(|e| format!("Failed to get entries: {}", e))?;

    let unresolved_entries = entries.iter().filter(|e| !e.resolved).count();
    let totals: Nutrients = entries.iter().map(|e| e.nutrients.clone()).sum();

    Ok(DayResponse {
        date: date.to_string(),
        entries,
        unresolved_entries,
        totals,
    })
}

/// Delete a log entry
pub fn delete_food_entry(db: &Database, id: i64) -> Result<DeleteEntryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entry = FoodEntry::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Food entry not found with id: {}", id))?;

    FoodEntry::delete(&conn, id).map_err(|e| format!("Failed to delete food entry: {}", e))?;

    let day_totals = calculate_day_nutrients(&conn, &entry.date)
        .map_err(|e| format!("Failed to calculate day totals: {}", e))?;

    Ok(DeleteEntryResponse {
        success: true,
        deleted_id: id,
        date: entry.date,
        day_totals,
    })
}
