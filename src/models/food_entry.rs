//! Food Entry model
//!
//! A logged amount of a food on a date. Nutrients are derived from the
//! food on read, so edits to the food (or its sizes) are reflected in
//! every entry.

use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Food, Nutrients};
use crate::db::{DbError, DbResult};
use crate::nutrition::{self, FoodValue, FoodValueRow};

/// Meal type enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    #[default]
    Unspecified,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Unspecified => "unspecified",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            "snack" => MealType::Snack,
            _ => MealType::Unspecified,
        }
    }
}

/// A logged food amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: i64,
    pub date: String,
    pub meal: MealType,
    pub food_id: Uuid,
    pub amount: FoodValue,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Entry with its food resolved and nutrients computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryDetail {
    pub id: i64,
    pub date: String,
    pub meal: MealType,
    pub food_id: Uuid,
    pub food_name: String,
    pub amount: FoodValue,
    /// e.g. "2 slice" or "1 cup"
    pub amount_description: String,
    /// False when the amount's unit no longer resolves against the food
    pub resolved: bool,
    pub nutrients: Nutrients,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Data for creating a food entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntryCreate {
    pub date: String,
    #[serde(default)]
    pub meal: MealType,
    pub food_id: Uuid,
    pub amount: FoodValue,
    pub notes: Option<String>,
}

struct EntryRow {
    id: i64,
    date: String,
    meal: String,
    food_id: String,
    amount: FoodValueRow,
    notes: Option<String>,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            meal: row.get("meal")?,
            food_id: row.get("food_id")?,
            amount: FoodValueRow {
                value: row.get("amount_value")?,
                unit_type: row.get("amount_unit_type")?,
                weight_unit: row.get("amount_weight_unit")?,
                volume_unit: row.get("amount_volume_unit")?,
                size_id: row.get("amount_size_id")?,
                size_volume_unit: row.get("amount_size_volume_unit")?,
            },
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

impl TryFrom<EntryRow> for FoodEntry {
    type Error = DbError;

    fn try_from(row: EntryRow) -> DbResult<Self> {
        Ok(Self {
            id: row.id,
            date: row.date,
            meal: MealType::from_str(&row.meal),
            food_id: Uuid::parse_str(&row.food_id)?,
            amount: FoodValue::try_from(row.amount)?,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Check an ISO `YYYY-MM-DD` date
pub fn validate_date(date: &str) -> DbResult<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| DbError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", date)))
}

impl FoodEntry {
    /// Log a new entry.
    ///
    /// The amount must be positive and relatable to the food's reference
    /// amount at the time of logging.
    pub fn create(conn: &Connection, data: &FoodEntryCreate) -> DbResult<Self> {
        validate_date(&data.date)?;
        if data.amount.value <= 0.0 {
            return Err(DbError::Validation("Amount must be greater than 0".to_string()));
        }
        data.amount.validate().map_err(DbError::Validation)?;

        let food = Food::get_by_id(conn, &data.food_id)?
            .ok_or_else(|| DbError::Validation(format!("Food {} not found", data.food_id)))?;

        if nutrition::ratio(&food.measures, &data.amount, &food.measures.amount).is_none() {
            return Err(DbError::Validation(format!(
                "'{}' cannot be converted to the reference amount of {}",
                food.describe(&data.amount),
                food.name
            )));
        }

        let row = data.amount.to_row();
        conn.execute(
            r#"
            INSERT INTO food_entries (
                date, meal, food_id,
                amount_value, amount_unit_type, amount_weight_unit,
                amount_volume_unit, amount_size_id, amount_size_volume_unit,
                notes
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.date,
                data.meal.as_str(),
                data.food_id.to_string(),
                row.value,
                row.unit_type,
                row.weight_unit,
                row.volume_unit,
                row.size_id,
                row.size_volume_unit,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], EntryRow::from_row);
        match result {
            Ok(row) => Ok(Some(row.try_into()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all entries for a date
    pub fn list_for_date(conn: &Connection, date: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_entries WHERE date = ?1
            ORDER BY CASE meal
                WHEN 'breakfast' THEN 1
                WHEN 'lunch' THEN 2
                WHEN 'dinner' THEN 3
                WHEN 'snack' THEN 4
                ELSE 5
            END, id
            "#,
        )?;

        let rows = stmt
            .query_map([date], EntryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(FoodEntry::try_from).collect()
    }

    /// Get detailed entries for a date
    pub fn details_for_date(conn: &Connection, date: &str) -> DbResult<Vec<FoodEntryDetail>> {
        let entries = Self::list_for_date(conn, date)?;
        let mut foods: HashMap<Uuid, Food> = HashMap::new();

        let mut details = Vec::new();
        for entry in entries {
            if !foods.contains_key(&entry.food_id) {
                let food = Food::get_by_id(conn, &entry.food_id)?
                    .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;
                foods.insert(entry.food_id, food);
            }
            let Some(food) = foods.get(&entry.food_id) else {
                continue;
            };
            details.push(entry.detail(food));
        }

        Ok(details)
    }

    /// Resolve this entry against its food
    pub fn detail(self, food: &Food) -> FoodEntryDetail {
        let resolved = self.amount.form_unit(&food.measures).is_some();
        if !resolved {
            tracing::debug!(
                entry = self.id,
                food = %food.id,
                "Entry amount no longer resolves against its food"
            );
        }

        FoodEntryDetail {
            id: self.id,
            date: self.date,
            meal: self.meal,
            food_id: self.food_id,
            food_name: food.name.clone(),
            amount_description: food.describe(&self.amount),
            resolved,
            nutrients: food.scaled_nutrients(&self.amount),
            amount: self.amount,
            notes: self.notes,
            created_at: self.created_at,
        }
    }

    /// Delete an entry
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM food_entries WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

/// Calculate total nutrients for a date from its entries
pub fn calculate_day_nutrients(conn: &Connection, date: &str) -> DbResult<Nutrients> {
    let details = FoodEntry::details_for_date(conn, date)?;

    let total: Nutrients = details.into_iter().map(|d| d.nutrients).sum();

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_support::memory_conn;
    use crate::models::FoodCreate;
    use crate::nutrition::{
        FoodMeasures, FoodNutrient, FoodSize, Micro, NutrientUnit, VolumeUnit, WeightUnit,
    };

    const DATE: &str = "2025-01-09";

    fn cheese(conn: &Connection) -> Food {
        let mut measures = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        measures.sizes = vec![FoodSize::new(
            1.0,
            "slice",
            None,
            FoodValue::weight(20.0, WeightUnit::G),
        )];
        let data = FoodCreate {
            name: "Cheddar".to_string(),
            brand: None,
            detail: None,
            measures,
            nutrients: Nutrients {
                energy: 400.0,
                carb: 1.0,
                fat: 33.0,
                protein: 25.0,
                micros: vec![FoodNutrient::micro(Micro::Calcium, 700.0, NutrientUnit::Mg)],
            },
        };
        Food::create(conn, &data).unwrap()
    }

    fn entry(food: &Food, meal: MealType, amount: FoodValue) -> FoodEntryCreate {
        FoodEntryCreate {
            date: DATE.to_string(),
            meal,
            food_id: food.id,
            amount,
            notes: None,
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = memory_conn();
        let food = cheese(&conn);
        let slices = FoodValue::size_with_id(2.0, "slice".to_string(), None);

        let created = FoodEntry::create(&conn, &entry(&food, MealType::Lunch, slices.clone())).unwrap();
        assert_eq!(created.amount, slices);
        assert_eq!(created.meal, MealType::Lunch);

        let fetched = FoodEntry::get_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_create_rejects_invalid() {
        let conn = memory_conn();
        let food = cheese(&conn);

        let mut bad_date = entry(&food, MealType::Snack, FoodValue::weight(10.0, WeightUnit::G));
        bad_date.date = "09/01/2025".to_string();
        assert!(matches!(FoodEntry::create(&conn, &bad_date), Err(DbError::Validation(_))));

        let zero = entry(&food, MealType::Snack, FoodValue::weight(0.0, WeightUnit::G));
        assert!(FoodEntry::create(&conn, &zero).is_err());

        let volume = entry(&food, MealType::Snack, FoodValue::volume(1.0, VolumeUnit::CupUs));
        assert!(matches!(FoodEntry::create(&conn, &volume), Err(DbError::Validation(_))));

        let mut unknown = entry(&food, MealType::Snack, FoodValue::weight(10.0, WeightUnit::G));
        unknown.food_id = Uuid::new_v4();
        assert!(FoodEntry::create(&conn, &unknown).is_err());

        let mut no_unit = entry(&food, MealType::Snack, FoodValue::weight(10.0, WeightUnit::G));
        no_unit.amount.weight_unit = None;
        assert!(matches!(FoodEntry::create(&conn, &no_unit), Err(DbError::Validation(_))));
    }

    #[test]
    fn test_day_totals() {
        let conn = memory_conn();
        let food = cheese(&conn);

        FoodEntry::create(
            &conn,
            &entry(&food, MealType::Breakfast, FoodValue::weight(50.0, WeightUnit::G)),
        )
        .unwrap();
        FoodEntry::create(
            &conn,
            &entry(&food, MealType::Dinner, FoodValue::size_with_id(1.0, "slice".to_string(), None)),
        )
        .unwrap();

        let total = calculate_day_nutrients(&conn, DATE).unwrap();
        assert!((total.energy - 280.0).abs() < 1e-9);
        assert!((total.protein - 17.5).abs() < 1e-9);
        assert_eq!(total.micros.len(), 1);
        assert!((total.micros[0].value - 490.0).abs() < 1e-9);

        assert_eq!(calculate_day_nutrients(&conn, "2025-01-10").unwrap(), Nutrients::zero());
    }

    #[test]
    fn test_removed_size_contributes_zero() {
        let conn = memory_conn();
        let food = cheese(&conn);
        FoodEntry::create(
            &conn,
            &entry(&food, MealType::Lunch, FoodValue::size_with_id(3.0, "slice".to_string(), None)),
        )
        .unwrap();

        Food::remove_size(&conn, &food.id, "slice").unwrap().unwrap();

        let details = FoodEntry::details_for_date(&conn, DATE).unwrap();
        assert_eq!(details.len(), 1);
        assert!(!details[0].resolved);
        assert_eq!(details[0].nutrients.energy, 0.0);
        assert_eq!(calculate_day_nutrients(&conn, DATE).unwrap().energy, 0.0);
    }

    #[test]
    fn test_entries_block_food_delete() {
        let conn = memory_conn();
        let food = cheese(&conn);
        let created = FoodEntry::create(
            &conn,
            &entry(&food, MealType::Lunch, FoodValue::weight(30.0, WeightUnit::G)),
        )
        .unwrap();

        assert_eq!(Food::entry_count(&conn, &food.id).unwrap(), 1);
        assert!(matches!(Food::delete(&conn, &food.id), Err(DbError::Validation(_))));

        assert!(FoodEntry::delete(&conn, created.id).unwrap());
        assert!(!FoodEntry::delete(&conn, created.id).unwrap());
        assert!(Food::delete(&conn, &food.id).unwrap());
    }

    #[test]
    fn test_list_orders_by_meal() {
        let conn = memory_conn();
        let food = cheese(&conn);
        let grams = FoodValue::weight(10.0, WeightUnit::G);
        FoodEntry::create(&conn, &entry(&food, MealType::Dinner, grams.clone())).unwrap();
        FoodEntry::create(&conn, &entry(&food, MealType::Breakfast, grams)).unwrap();

        let meals: Vec<MealType> = FoodEntry::list_for_date(&conn, DATE)
            .unwrap()
            .into_iter()
            .map(|e| e.meal)
            .collect();
        assert_eq!(meals, vec![MealType::Breakfast, MealType::Dinner]);
    }

    #[test]
    fn test_corrupt_row_is_hard_error() {
        let conn = memory_conn();
        let food = cheese(&conn);
        let created = FoodEntry::create(
            &conn,
            &entry(&food, MealType::Lunch, FoodValue::weight(30.0, WeightUnit::G)),
        )
        .unwrap();
        conn.execute(
            "UPDATE food_entries SET amount_weight_unit = 42 WHERE id = ?1",
            [created.id],
        )
        .unwrap();

        assert!(matches!(
            FoodEntry::get_by_id(&conn, created.id),
            Err(DbError::Codec(_))
        ));
    }
}
