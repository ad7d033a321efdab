//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- FOODS
        -- Nutrients are declared per `amount`
        -- ============================================
        CREATE TABLE foods (
            id TEXT PRIMARY KEY,                 -- UUID
            name TEXT NOT NULL,
            brand TEXT,
            detail TEXT,

            amount TEXT NOT NULL,                -- encoded FoodValue
            serving TEXT,                        -- encoded FoodValue

            -- Density: weight_amount weight_unit == volume_amount volume_unit
            density_weight_amount REAL,
            density_weight_unit INTEGER,
            density_volume_amount REAL,
            density_volume_unit INTEGER,

            energy REAL NOT NULL DEFAULT 0,      -- kcal
            carb REAL NOT NULL DEFAULT 0,        -- grams
            fat REAL NOT NULL DEFAULT 0,         -- grams
            protein REAL NOT NULL DEFAULT 0,     -- grams

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_foods_name ON foods(name);
        CREATE INDEX idx_foods_brand ON foods(brand);

        -- ============================================
        -- FOOD SIZES
        -- Named units belonging to one food
        -- ============================================
        CREATE TABLE food_sizes (
            food_id TEXT NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            size TEXT NOT NULL,                  -- encoded FoodSize
            PRIMARY KEY (food_id, position)
        );

        -- ============================================
        -- FOOD NUTRIENTS
        -- Micronutrients beyond energy and macros
        -- ============================================
        CREATE TABLE food_nutrients (
            food_id TEXT NOT NULL REFERENCES foods(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            nutrient TEXT NOT NULL,              -- encoded FoodNutrient
            PRIMARY KEY (food_id, position)
        );

        -- ============================================
        -- FOOD ENTRIES
        -- Logged amounts, stored in FoodValue row form
        -- ============================================
        CREATE TABLE food_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,                  -- ISO date: "2025-01-09"
            meal TEXT NOT NULL DEFAULT 'unspecified'
                CHECK(meal IN ('breakfast', 'lunch', 'dinner', 'snack', 'unspecified')),
            food_id TEXT NOT NULL REFERENCES foods(id) ON DELETE RESTRICT,

            amount_value REAL NOT NULL,
            amount_unit_type INTEGER NOT NULL,
            amount_weight_unit INTEGER,
            amount_volume_unit INTEGER,
            amount_size_id TEXT,
            amount_size_volume_unit INTEGER,

            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_entries_date ON food_entries(date);
        CREATE INDEX idx_food_entries_food ON food_entries(food_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
