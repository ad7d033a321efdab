//! Food model
//!
//! A stored food: its measures (reference amount, serving, sizes, density)
//! and the nutrients declared per reference amount.

use rusqlite::{params, Connection, Row, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Nutrients;
use crate::db::{DbError, DbResult};
use crate::nutrition::{
    FoodDensity, FoodMeasures, FoodNutrient, FoodSize, FoodValue, RawValue, UnitType, VolumeUnit,
    WeightUnit,
};

/// A food with its unit context and nutrients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub detail: Option<String>,
    #[serde(flatten)]
    pub measures: FoodMeasures,
    /// Nutrients per `measures.amount`
    pub nutrients: Nutrients,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new food.
///
/// Also the element type of JSON import fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCreate {
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub measures: FoodMeasures,
    #[serde(flatten)]
    pub nutrients: Nutrients,
}

/// Data for updating a food
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub detail: Option<String>,
    pub energy: Option<f64>,
    pub carb: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
}

/// Raw `foods` columns, decoded outside the row callback so codec
/// failures surface as `DbError::Codec`
struct FoodRow {
    id: String,
    name: String,
    brand: Option<String>,
    detail: Option<String>,
    amount: String,
    serving: Option<String>,
    density_weight_amount: Option<f64>,
    density_weight_unit: Option<i64>,
    density_volume_amount: Option<f64>,
    density_volume_unit: Option<i64>,
    energy: f64,
    carb: f64,
    fat: f64,
    protein: f64,
    created_at: String,
    updated_at: String,
}

impl FoodRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            brand: row.get("brand")?,
            detail: row.get("detail")?,
            amount: row.get("amount")?,
            serving: row.get("serving")?,
            density_weight_amount: row.get("density_weight_amount")?,
            density_weight_unit: row.get("density_weight_unit")?,
            density_volume_amount: row.get("density_volume_amount")?,
            density_volume_unit: row.get("density_volume_unit")?,
            energy: row.get("energy")?,
            carb: row.get("carb")?,
            fat: row.get("fat")?,
            protein: row.get("protein")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn density(&self) -> DbResult<Option<FoodDensity>> {
        let (Some(weight_amount), Some(weight_unit), Some(volume_amount), Some(volume_unit)) = (
            self.density_weight_amount,
            self.density_weight_unit,
            self.density_volume_amount,
            self.density_volume_unit,
        ) else {
            return Ok(None);
        };
        Ok(Some(FoodDensity::new(
            weight_amount,
            WeightUnit::decode_raw(weight_unit)?,
            volume_amount,
            VolumeUnit::decode_raw(volume_unit)?,
        )))
    }
}

impl Food {
    /// Nutrient multiplier for `requested`; zero when it cannot be related
    /// to the food's reference amount
    pub fn scale_factor(&self, requested: &FoodValue) -> f64 {
        self.measures.scale_factor(requested)
    }

    /// Nutrients for `requested` of this food
    pub fn scaled_nutrients(&self, requested: &FoodValue) -> Nutrients {
        self.nutrients.scale(self.scale_factor(requested))
    }

    /// Human readable rendering of a value of this food
    pub fn describe(&self, value: &FoodValue) -> String {
        value.description(&self.measures)
    }

    fn load(conn: &Connection, row: FoodRow) -> DbResult<Self> {
        let density = row.density()?;
        let amount = FoodValue::decode(&row.amount)?;
        let serving = row.serving.as_deref().map(FoodValue::decode).transpose()?;

        let sizes = load_children(
            conn,
            "SELECT size FROM food_sizes WHERE food_id = ?1 ORDER BY position",
            &row.id,
        )?
        .iter()
        .map(|s| FoodSize::decode(s))
        .collect::<Result<Vec<_>, _>>()?;

        let micros = load_children(
            conn,
            "SELECT nutrient FROM food_nutrients WHERE food_id = ?1 ORDER BY position",
            &row.id,
        )?
        .iter()
        .map(|s| FoodNutrient::decode(s))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: Uuid::parse_str(&row.id)?,
            name: row.name,
            brand: row.brand,
            detail: row.detail,
            measures: FoodMeasures {
                amount,
                serving,
                sizes,
                density,
            },
            nutrients: Nutrients {
                energy: row.energy,
                carb: row.carb,
                fat: row.fat,
                protein: row.protein,
                micros,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn query(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, FoodRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(|row| Self::load(conn, row)).collect()
    }

    /// Check a new food before it is stored
    pub fn validate(data: &FoodCreate) -> DbResult<()> {
        if data.name.trim().is_empty() {
            return Err(DbError::Validation("Food name cannot be empty".to_string()));
        }
        data.measures.validate().map_err(DbError::Validation)
    }

    /// Insert a new food inside the caller's transaction
    pub(crate) fn insert(conn: &Connection, data: &FoodCreate) -> DbResult<Uuid> {
        Self::validate(data)?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let density = data.measures.density;

        conn.execute(
            r#"
            INSERT INTO foods (
                id, name, brand, detail, amount, serving,
                density_weight_amount, density_weight_unit,
                density_volume_amount, density_volume_unit,
                energy, carb, fat, protein
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                id_str,
                data.name.trim(),
                data.brand,
                data.detail,
                data.measures.amount.encode(),
                data.measures.serving.as_ref().map(FoodValue::encode),
                density.map(|d| d.weight_amount),
                density.map(|d| d.weight_unit.raw_value()),
                density.map(|d| d.volume_amount),
                density.map(|d| d.volume_unit.raw_value()),
                data.nutrients.energy,
                data.nutrients.carb,
                data.nutrients.fat,
                data.nutrients.protein,
            ],
        )?;

        write_sizes(conn, &id_str, &data.measures.sizes)?;
        for (position, nutrient) in data.nutrients.micros.iter().enumerate() {
            conn.execute(
                "INSERT INTO food_nutrients (food_id, position, nutrient) VALUES (?1, ?2, ?3)",
                params![id_str, position as i64, nutrient.encode()],
            )?;
        }

        Ok(id)
    }

    /// Insert a new food into the database
    pub fn create(conn: &Connection, data: &FoodCreate) -> DbResult<Self> {
        let tx = conn.unchecked_transaction()?;
        let id = Self::insert(&tx, data)?;
        tx.commit()?;

        Self::get_by_id(conn, &id)?.ok_or_else(|| {
            DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food by ID
    pub fn get_by_id(conn: &Connection, id: &Uuid) -> DbResult<Option<Self>> {
        let id_str = id.to_string();
        let mut foods = Self::query(conn, "SELECT * FROM foods WHERE id = ?1", &[&id_str])?;
        Ok(foods.pop())
    }

    /// Search foods by name or brand
    pub fn search(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", query);
        Self::query(
            conn,
            r#"
            SELECT * FROM foods
            WHERE name LIKE ?1 OR brand LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
            &[&search_pattern, &limit],
        )
    }

    /// List foods with sorting and paging
    pub fn list(
        conn: &Connection,
        sort_by: &str,
        sort_order: &str,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let order = if sort_order.to_lowercase() == "desc" { "DESC" } else { "ASC" };
        let sort_col = match sort_by.to_lowercase().as_str() {
            "created_at" => "created_at",
            "energy" => "energy",
            "brand" => "brand",
            _ => "name",
        };

        let sql = format!(
            "SELECT * FROM foods ORDER BY {} {} LIMIT ?1 OFFSET ?2",
            sort_col, order
        );
        Self::query(conn, &sql, &[&limit, &offset])
    }

    /// Count total foods
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM foods", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update a food's descriptive fields and macros
    pub fn update(conn: &Connection, id: &Uuid, data: &FoodUpdate) -> DbResult<Option<Self>> {
        if data.name.as_ref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DbError::Validation("Food name cannot be empty".to_string()));
        }

        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    updates.push(format!("{} = ?{}", $col, params_vec.len() + 1));
                    params_vec.push(Box::new(val.clone()));
                }
            };
        }

        add_update!(name, "name");
        add_update!(brand, "brand");
        add_update!(detail, "detail");
        add_update!(energy, "energy");
        add_update!(carb, "carb");
        add_update!(fat, "fat");
        add_update!(protein, "protein");

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE foods SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id.to_string()));

        let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Add a size to a food.
    ///
    /// Fails with `DbError::Validation` when the name is unusable or the
    /// food already has a size with the same id.
    pub fn add_size(conn: &Connection, id: &Uuid, size: FoodSize) -> DbResult<Option<Self>> {
        let Some(food) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        let size_id = size.id();
        let mut measures = food.measures;
        if measures.size(&size_id).is_some() {
            return Err(DbError::Validation(format!(
                "Food already has a size '{}'",
                size_id
            )));
        }
        measures.sizes.push(size);
        measures.validate().map_err(DbError::Validation)?;

        let tx = conn.unchecked_transaction()?;
        replace_sizes(&tx, id, &measures.sizes)?;
        tx.commit()?;

        Self::get_by_id(conn, id)
    }

    /// Remove a size from a food.
    ///
    /// Values saved against the size, log entries and other sizes alike,
    /// stop resolving and scale to zero. Returns `Ok(None)` when the food
    /// or the size does not exist.
    pub fn remove_size(conn: &Connection, id: &Uuid, size_id: &str) -> DbResult<Option<Self>> {
        let Some(food) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };
        if food.measures.size(size_id).is_none() {
            return Ok(None);
        }

        let references_size =
            |v: &FoodValue| v.unit_type == UnitType::Size && v.size_id.as_deref() == Some(size_id);
        if references_size(&food.measures.amount)
            || food.measures.serving.as_ref().is_some_and(references_size)
        {
            return Err(DbError::Validation(format!(
                "Size '{}' is used by the food's amount or serving",
                size_id
            )));
        }

        let sizes: Vec<FoodSize> = food
            .measures
            .sizes
            .into_iter()
            .filter(|s| s.id() != size_id)
            .collect();

        let tx = conn.unchecked_transaction()?;
        replace_sizes(&tx, id, &sizes)?;
        tx.commit()?;

        Self::get_by_id(conn, id)
    }

    /// Set or clear a food's density
    pub fn set_density(
        conn: &Connection,
        id: &Uuid,
        density: Option<FoodDensity>,
    ) -> DbResult<Option<Self>> {
        if density.is_some_and(|d| !d.is_usable()) {
            return Err(DbError::Validation(
                "Density amounts must be greater than 0".to_string(),
            ));
        }

        let rows = conn.execute(
            r#"
            UPDATE foods SET
                density_weight_amount = ?1,
                density_weight_unit = ?2,
                density_volume_amount = ?3,
                density_volume_unit = ?4,
                updated_at = datetime('now')
            WHERE id = ?5
            "#,
            params![
                density.map(|d| d.weight_amount),
                density.map(|d| d.weight_unit.raw_value()),
                density.map(|d| d.volume_amount),
                density.map(|d| d.volume_unit.raw_value()),
                id.to_string(),
            ],
        )?;

        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }

    /// Get the count of log entries using this food
    pub fn entry_count(conn: &Connection, id: &Uuid) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM food_entries WHERE food_id = ?1",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a food (only if no log entries reference it)
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, id: &Uuid) -> DbResult<bool> {
        if Self::get_by_id(conn, id)?.is_none() {
            return Ok(false);
        }

        let entries = Self::entry_count(conn, id)?;
        if entries > 0 {
            return Err(DbError::Validation(format!(
                "Food is used by {} log entries",
                entries
            )));
        }

        let rows = conn.execute("DELETE FROM foods WHERE id = ?1", [id.to_string()])?;
        Ok(rows > 0)
    }
}

fn load_children(conn: &Connection, sql: &str, food_id: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let values = stmt
        .query_map([food_id], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(values)
}

fn write_sizes(conn: &Connection, food_id: &str, sizes: &[FoodSize]) -> DbResult<()> {
    for (position, size) in sizes.iter().enumerate() {
        conn.execute(
            "INSERT INTO food_sizes (food_id, position, size) VALUES (?1, ?2, ?3)",
            params![food_id, position as i64, size.encode()],
        )?;
    }
    Ok(())
}

fn replace_sizes(conn: &Connection, id: &Uuid, sizes: &[FoodSize]) -> DbResult<()> {
    let id_str = id.to_string();
    conn.execute("DELETE FROM food_sizes WHERE food_id = ?1", [&id_str])?;
    write_sizes(conn, &id_str, sizes)?;
    conn.execute(
        "UPDATE foods SET updated_at = datetime('now') WHERE id = ?1",
        [&id_str],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::test_support::memory_conn;
    use crate::nutrition::{CodecError, Micro, NutrientUnit};

    fn bread() -> FoodCreate {
        let mut measures = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        measures.serving = Some(FoodValue::weight(56.0, WeightUnit::G));
        measures.sizes = vec![
            FoodSize::new(1.0, "slice", None, FoodValue::weight(28.0, WeightUnit::G)),
            FoodSize::new(
                1.0,
                "crumbs",
                Some(VolumeUnit::CupUs),
                FoodValue::weight(108.0, WeightUnit::G),
            ),
        ];
        FoodCreate {
            name: "Whole Wheat Bread".to_string(),
            brand: Some("Bakery".to_string()),
            detail: None,
            measures,
            nutrients: Nutrients {
                energy: 250.0,
                carb: 40.0,
                fat: 3.5,
                protein: 12.0,
                micros: vec![FoodNutrient::micro(Micro::Sodium, 450.0, NutrientUnit::Mg)],
            },
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = memory_conn();
        let created = Food::create(&conn, &bread()).unwrap();

        let food = Food::get_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(food, created);
        assert_eq!(food.measures, bread().measures);
        assert_eq!(food.nutrients, bread().nutrients);
        assert!(food.measures.size("crumbs¦3").is_some());
    }

    #[test]
    fn test_get_missing() {
        let conn = memory_conn();
        assert!(Food::get_by_id(&conn, &Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_create_rejects_invalid() {
        let conn = memory_conn();

        let mut unnamed = bread();
        unnamed.name = "  ".to_string();
        assert!(matches!(Food::create(&conn, &unnamed), Err(DbError::Validation(_))));

        let mut duplicate = bread();
        duplicate.measures.sizes.push(FoodSize::new(
            2.0,
            "slice",
            None,
            FoodValue::weight(50.0, WeightUnit::G),
        ));
        assert!(matches!(Food::create(&conn, &duplicate), Err(DbError::Validation(_))));

        let mut reserved = bread();
        reserved.measures.sizes[0].name = "thin_slice".to_string();
        assert!(matches!(Food::create(&conn, &reserved), Err(DbError::Validation(_))));

        let mut no_unit = bread();
        no_unit.measures.amount.weight_unit = None;
        assert!(matches!(Food::create(&conn, &no_unit), Err(DbError::Validation(_))));

        let mut mixed_serving = bread();
        if let Some(serving) = mixed_serving.measures.serving.as_mut() {
            serving.volume_unit = Some(VolumeUnit::Ml);
        }
        assert!(matches!(Food::create(&conn, &mixed_serving), Err(DbError::Validation(_))));

        let mut hollow_density = bread();
        hollow_density.measures.density =
            Some(FoodDensity::new(50.0, WeightUnit::G, 0.0, VolumeUnit::CupUs));
        assert!(matches!(Food::create(&conn, &hollow_density), Err(DbError::Validation(_))));

        assert_eq!(Food::count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_scaled_nutrients() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();

        let two_slices = FoodValue::size_with_id(2.0, "slice".to_string(), None);
        assert!((food.scale_factor(&two_slices) - 0.56).abs() < 1e-9);

        let nutrients = food.scaled_nutrients(&FoodValue::weight(50.0, WeightUnit::G));
        assert!((nutrients.carb - 20.0).abs() < 1e-9);
        assert!((nutrients.micros[0].value - 225.0).abs() < 1e-9);
    }

    #[test]
    fn test_search_list_count() {
        let conn = memory_conn();
        Food::create(&conn, &bread()).unwrap();
        let mut apple = FoodCreate {
            name: "Apple".to_string(),
            brand: None,
            ..bread()
        };
        apple.measures.sizes.clear();
        Food::create(&conn, &apple).unwrap();

        assert_eq!(Food::count(&conn).unwrap(), 2);
        assert_eq!(Food::search(&conn, "wheat", 10).unwrap().len(), 1);
        assert_eq!(Food::search(&conn, "bakery", 10).unwrap().len(), 1);

        let listed = Food::list(&conn, "name", "asc", 10, 0).unwrap();
        assert_eq!(listed[0].name, "Apple");
        let paged = Food::list(&conn, "name", "asc", 10, 1).unwrap();
        assert_eq!(paged.len(), 1);
        assert_eq!(paged[0].name, "Whole Wheat Bread");
    }

    #[test]
    fn test_update() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();

        let update = FoodUpdate {
            carb: Some(42.0),
            detail: Some("sliced".to_string()),
            ..Default::default()
        };
        let updated = Food::update(&conn, &food.id, &update).unwrap().unwrap();
        assert!((updated.nutrients.carb - 42.0).abs() < 1e-9);
        assert_eq!(updated.detail.as_deref(), Some("sliced"));
        assert_eq!(updated.nutrients.micros, food.nutrients.micros);
    }

    #[test]
    fn test_add_size_rejects_duplicate_id() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();

        let again = FoodSize::new(1.0, "slice", None, FoodValue::weight(30.0, WeightUnit::G));
        assert!(matches!(
            Food::add_size(&conn, &food.id, again),
            Err(DbError::Validation(_))
        ));

        // Same name with a volume prefix is a different size
        let prefixed = FoodSize::new(
            1.0,
            "slice",
            Some(VolumeUnit::CupMetric),
            FoodValue::weight(90.0, WeightUnit::G),
        );
        let updated = Food::add_size(&conn, &food.id, prefixed).unwrap().unwrap();
        assert_eq!(updated.measures.sizes.len(), 3);
        assert!(updated.measures.size("slice¦3").is_some());
    }

    #[test]
    fn test_remove_size() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();

        let updated = Food::remove_size(&conn, &food.id, "slice").unwrap().unwrap();
        assert_eq!(updated.measures.sizes.len(), 1);

        let one_slice = FoodValue::size_with_id(1.0, "slice".to_string(), None);
        assert_eq!(updated.scale_factor(&one_slice), 0.0);
        assert!(Food::remove_size(&conn, &food.id, "slice").unwrap().is_none());
    }

    #[test]
    fn test_remove_size_used_by_amount() {
        let conn = memory_conn();
        let mut per_slice = bread();
        per_slice.measures.amount = FoodValue::size_with_id(1.0, "slice".to_string(), None);
        let food = Food::create(&conn, &per_slice).unwrap();

        assert!(matches!(
            Food::remove_size(&conn, &food.id, "slice"),
            Err(DbError::Validation(_))
        ));
    }

    #[test]
    fn test_set_density() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();
        let cup = FoodValue::volume(1.0, VolumeUnit::CupUs);
        assert_eq!(food.scale_factor(&cup), 0.0);

        let density = FoodDensity::new(50.0, WeightUnit::G, 1.0, VolumeUnit::CupUs);
        let updated = Food::set_density(&conn, &food.id, Some(density)).unwrap().unwrap();
        assert_eq!(updated.measures.density, Some(density));
        assert!((updated.scale_factor(&cup) - 0.5).abs() < 1e-9);

        let bad = FoodDensity::new(0.0, WeightUnit::G, 1.0, VolumeUnit::CupUs);
        assert!(Food::set_density(&conn, &food.id, Some(bad)).is_err());

        let cleared = Food::set_density(&conn, &food.id, None).unwrap().unwrap();
        assert!(cleared.measures.density.is_none());
        assert!(Food::set_density(&conn, &Uuid::new_v4(), None).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();

        assert!(Food::delete(&conn, &food.id).unwrap());
        assert!(!Food::delete(&conn, &food.id).unwrap());

        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM food_sizes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_corrupt_amount_is_hard_error() {
        let conn = memory_conn();
        let food = Food::create(&conn, &bread()).unwrap();
        conn.execute(
            "UPDATE foods SET amount = '100.0_9_1_-1__-1' WHERE id = ?1",
            [food.id.to_string()],
        )
        .unwrap();

        assert!(matches!(
            Food::get_by_id(&conn, &food.id),
            Err(DbError::Codec(CodecError::UnknownRawValue { value: 9, .. }))
        ));
    }

    #[test]
    fn test_fixture_json_shape() {
        let json = r#"{
            "name": "Milk",
            "amount": {"value": 1.0, "unit_type": "volume", "volume_unit": "cup_us"},
            "density": {"weight_amount": 244.0, "weight_unit": "g", "volume_amount": 1.0, "volume_unit": "cup_us"},
            "energy": 150.0,
            "carb": 12.0,
            "micros": [{"micro": "calcium", "value": 300.0, "unit": "mg"}]
        }"#;
        let data: FoodCreate = serde_json::from_str(json).unwrap();
        assert_eq!(data.measures.amount, FoodValue::volume(1.0, VolumeUnit::CupUs));
        assert!(data.measures.sizes.is_empty());
        assert!((data.nutrients.fat - 0.0).abs() < 1e-9);
        assert_eq!(data.nutrients.micros[0].micro, Some(Micro::Calcium));
    }
}
