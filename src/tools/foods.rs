//! Food MCP Tools
//!
//! Tools for managing foods, their sizes and density, and for computing
//! nutrients for an arbitrary amount.

use serde::Serialize;
use uuid::Uuid;

use super::amounts::{available_units, parse_amount};
use crate::db::Database;
use crate::models::{Food, FoodCreate, FoodUpdate, Nutrients};
use crate::nutrition::{
    FoodDensity, FoodSize, FoodValue, UnitType, VolumeUnit, VolumeUnits, WeightUnit,
};

/// Parse a food id argument
pub fn parse_food_id(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id.trim()).map_err(|e| format!("Invalid food id '{}': {}", id, e))
}

/// Response for add_food
#[derive(Debug, Serialize)]
pub struct AddFoodResponse {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub created_at: String,
}

/// Summary of a food for list/search results
#[derive(Debug, Serialize)]
pub struct FoodSummary {
    pub id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    /// Reference amount, e.g. "100 g"
    pub per: String,
    pub energy: f64,
}

impl From<&Food> for FoodSummary {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            brand: food.brand.clone(),
            per: food.describe(&food.measures.amount),
            energy: food.nutrients.energy,
        }
    }
}

/// Response for search_foods
#[derive(Debug, Serialize)]
pub struct SearchFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: usize,
}

/// Response for list_foods
#[derive(Debug, Serialize)]
pub struct ListFoodsResponse {
    pub foods: Vec<FoodSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Full food detail response
#[derive(Debug, Serialize)]
pub struct FoodDetail {
    #[serde(flatten)]
    pub food: Food,
    pub per: String,
    pub serving_description: Option<String>,
    pub entry_count: i64,
}

/// A size as presented to tool callers
#[derive(Debug, Serialize)]
pub struct SizeSummary {
    pub id: String,
    /// e.g. "1 slice = 28 g"
    pub description: String,
    /// False when the size's own value no longer resolves
    pub resolved: bool,
}

/// Response for add_food_size / remove_food_size
#[derive(Debug, Serialize)]
pub struct FoodSizesResponse {
    pub food_id: Uuid,
    pub sizes: Vec<SizeSummary>,
}

/// Response for set_food_density
#[derive(Debug, Serialize)]
pub struct SetDensityResponse {
    pub food_id: Uuid,
    pub density: Option<FoodDensity>,
    pub grams_per_ml: Option<f64>,
}

/// Response for food_units
#[derive(Debug, Serialize)]
pub struct FoodUnitsResponse {
    pub food_id: Uuid,
    pub name: String,
    pub can_be_measured_in_weight: bool,
    pub can_be_measured_in_volume: bool,
    pub only_supports_weights: bool,
    pub only_supports_volumes: bool,
    pub only_supports_serving: bool,
    pub unit_types: Vec<UnitType>,
    /// Unit strings accepted by calculate_nutrients and log_food
    pub units: Vec<String>,
    pub sizes: Vec<SizeSummary>,
}

/// Response for calculate_nutrients
#[derive(Debug, Serialize)]
pub struct CalculateNutrientsResponse {
    pub food_id: Uuid,
    pub name: String,
    pub amount: FoodValue,
    pub amount_description: String,
    pub scale_factor: f64,
    pub grams: Option<f64>,
    pub milliliters: Option<f64>,
    pub nutrients: Nutrients,
}

/// Response for update_food
#[derive(Debug, Serialize)]
pub struct UpdateFoodResponse {
    pub success: bool,
    pub updated_at: String,
}

/// Response for delete_food blocked
#[derive(Debug, Serialize)]
pub struct DeleteFoodBlockedResponse {
    pub error: String,
    pub entry_count: i64,
}

/// Response for successful delete_food
#[derive(Debug, Serialize)]
pub struct DeleteFoodSuccessResponse {
    pub success: bool,
    pub deleted_id: Uuid,
}

fn size_summaries(food: &Food) -> Vec<SizeSummary> {
    food.measures
        .sizes
        .iter()
        .map(|size| {
            let resolved = size.form_size(&food.measures).is_some();
            let name = match size.volume_unit {
                Some(unit) => format!("{}, {}", unit.abbreviation(), size.name),
                None => size.name.clone(),
            };
            SizeSummary {
                id: size.id(),
                description: format!(
                    "{} {} = {}",
                    size.quantity,
                    name,
                    food.describe(&size.value)
                ),
                resolved,
            }
        })
        .collect()
}

fn load_food(db: &Database, id: &Uuid) -> Result<Food, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Food::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get food: {}", e))?
        .ok_or_else(|| format!("Food not found with id: {}", id))
}

/// Add a new food
pub fn add_food(db: &Database, data: FoodCreate) -> Result<AddFoodResponse, String> {
    let n = &data.nutrients;
    if n.energy < 0.0 || n.carb < 0.0 || n.fat < 0.0 || n.protein < 0.0 {
        return Err("Energy and macros cannot be negative".to_string());
    }
    if n.micros.iter().any(|m| m.micro.is_none() && m.usda_type.is_none()) {
        return Err("Each nutrient needs a micro or a usda_type".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let food = Food::create(&conn, &data).map_err(|e| format!("Failed to create food: {}", e))?;

    Ok(AddFoodResponse {
        id: food.id,
        name: food.name,
        brand: food.brand,
        created_at: food.created_at,
    })
}

/// Get a food by ID with usage information
pub fn get_food(db: &Database, id: &str) -> Result<Option<FoodDetail>, String> {
    let id = parse_food_id(id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let food = Food::get_by_id(&conn, &id).map_err(|e| format!("Failed to get food: {}", e))?;

    match food {
        Some(food) => {
            let entry_count = Food::entry_count(&conn, &id)
                .map_err(|e| format!("Failed to get usage count: {}", e))?;
            Ok(Some(FoodDetail {
                per: food.describe(&food.measures.amount),
                serving_description: food.measures.serving.as_ref().map(|s| food.describe(s)),
                entry_count,
                food,
            }))
        }
        None => Ok(None),
    }
}

/// Search foods by name or brand
pub fn search_foods(db: &Database, query: &str, limit: i64) -> Result<SearchFoodsResponse, String> {
    let limit = limit.clamp(1, 100);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let foods = Food::search(&conn, query, limit).map_err(|e| format!("Search failed: {}", e))?;

    let summaries: Vec<FoodSummary> = foods.iter().map(FoodSummary::from).collect();
    let total = summaries.len();

    Ok(SearchFoodsResponse {
        foods: summaries,
        total,
    })
}

/// List foods with sorting and pagination
pub fn list_foods(
    db: &Database,
    sort_by: &str,
    sort_order: &str,
    limit: i64,
    offset: i64,
) -> Result<ListFoodsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let foods = Food::list(&conn, sort_by, sort_order, limit, offset)
        .map_err(|e| format!("Failed to list foods: {}", e))?;

    let total = Food::count(&conn).map_err(|e| format!("Failed to count foods: {}", e))?;

    Ok(ListFoodsResponse {
        foods: foods.iter().map(FoodSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Update a food's name, brand, detail or macros
pub fn update_food(db: &Database, id: &str, data: FoodUpdate) -> Result<UpdateFoodResponse, String> {
    let id = parse_food_id(id)?;
    let negative = [data.energy, data.carb, data.fat, data.protein]
        .into_iter()
        .flatten()
        .any(|v| v < 0.0);
    if negative {
        return Err("Energy and macros cannot be negative".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Food::update(&conn, &id, &data)
        .map_err(|e| format!("Failed to update food: {}", e))?;

    match updated {
        Some(food) => Ok(UpdateFoodResponse {
            success: true,
            updated_at: food.updated_at,
        }),
        None => Err(format!("Food not found with id: {}", id)),
    }
}

/// Delete a food (blocked while log entries reference it)
pub fn delete_food(
    db: &Database,
    id: &str,
) -> Result<Result<DeleteFoodSuccessResponse, DeleteFoodBlockedResponse>, String> {
    let id = parse_food_id(id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let food = Food::get_by_id(&conn, &id).map_err(|e| format!("Database error: {}", e))?;
    if food.is_none() {
        return Err(format!("Food not found with id: {}", id));
    }

    let entry_count = Food::entry_count(&conn, &id)
        .map_err(|e| format!("Failed to check usage: {}", e))?;

    if entry_count > 0 {
        return Ok(Err(DeleteFoodBlockedResponse {
            error: format!("Cannot delete food: used in {} log entries", entry_count),
            entry_count,
        }));
    }

    Food::delete(&conn, &id).map_err(|e| format!("Failed to delete food: {}", e))?;

    Ok(Ok(DeleteFoodSuccessResponse {
        success: true,
        deleted_id: id,
    }))
}

/// Add a size: "`quantity` `[volume_unit,]` `name` = `value` `unit`".
///
/// `unit` is parsed against the food, so a size may be defined in terms of
/// another of the food's sizes.
#[allow(clippy::too_many_arguments)]
pub fn add_food_size(
    db: &Database,
    id: &str,
    quantity: f64,
    name: &str,
    volume_unit: Option<&str>,
    value: f64,
    unit: &str,
    units: &VolumeUnits,
) -> Result<FoodSizesResponse, String> {
    let id = parse_food_id(id)?;
    if quantity <= 0.0 {
        return Err("quantity must be greater than 0".to_string());
    }
    let volume_unit = volume_unit
        .map(|u| VolumeUnit::parse(u, units).ok_or_else(|| format!("Unknown volume unit '{}'", u)))
        .transpose()?;

    let food = load_food(db, &id)?;
    let size_value = parse_amount(&food.measures, value, unit, units)?;
    let size = FoodSize::new(quantity, name.trim(), volume_unit, size_value);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let food = Food::add_size(&conn, &id, size)
        .map_err(|e| format!("Failed to add size: {}", e))?
        .ok_or_else(|| format!("Food not found with id: {}", id))?;

    Ok(FoodSizesResponse {
        food_id: id,
        sizes: size_summaries(&food),
    })
}

/// Remove a size by its id
pub fn remove_food_size(db: &Database, id: &str, size_id: &str) -> Result<FoodSizesResponse, String> {
    let id = parse_food_id(id)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let food = Food::remove_size(&conn, &id, size_id)
        .map_err(|e| format!("Failed to remove size: {}", e))?
        .ok_or_else(|| format!("Size '{}' not found on food {}", size_id, id))?;

    Ok(FoodSizesResponse {
        food_id: id,
        sizes: size_summaries(&food),
    })
}

/// Set a food's density, or clear it when no amounts are given
pub fn set_food_density(
    db: &Database,
    id: &str,
    weight: Option<(f64, &str)>,
    volume: Option<(f64, &str)>,
    units: &VolumeUnits,
) -> Result<SetDensityResponse, String> {
    let id = parse_food_id(id)?;

    let density = match (weight, volume) {
        (Some((weight_amount, weight_unit)), Some((volume_amount, volume_unit))) => {
            let weight_unit = WeightUnit::parse(weight_unit)
                .ok_or_else(|| format!("Unknown weight unit '{}'", weight_unit))?;
            let volume_unit = VolumeUnit::parse(volume_unit, units)
                .ok_or_else(|| format!("Unknown volume unit '{}'", volume_unit))?;
            Some(FoodDensity::new(weight_amount, weight_unit, volume_amount, volume_unit))
        }
        (None, None) => None,
        _ => return Err("Density needs both a weight and a volume".to_string()),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let food = Food::set_density(&conn, &id, density)
        .map_err(|e| format!("Failed to set density: {}", e))?
        .ok_or_else(|| format!("Food not found with id: {}", id))?;

    Ok(SetDensityResponse {
        food_id: id,
        density: food.measures.density,
        grams_per_ml: food.measures.density.and_then(|d| d.grams_per_ml()),
    })
}

/// Describe which units a food can be measured in
pub fn food_units(db: &Database, id: &str, units: &VolumeUnits) -> Result<FoodUnitsResponse, String> {
    let id = parse_food_id(id)?;
    let food = load_food(db, &id)?;
    let measures = &food.measures;

    Ok(FoodUnitsResponse {
        food_id: food.id,
        name: food.name.clone(),
        can_be_measured_in_weight: measures.can_be_measured_in_weight(),
        can_be_measured_in_volume: measures.can_be_measured_in_volume(),
        only_supports_weights: measures.only_supports_weights(),
        only_supports_volumes: measures.only_supports_volumes(),
        only_supports_serving: measures.only_supports_serving(),
        unit_types: measures.available_unit_types(),
        units: available_units(measures, units),
        sizes: size_summaries(&food),
    })
}

/// Nutrients for `value unit` of a food
pub fn calculate_nutrients(
    db: &Database,
    id: &str,
    value: f64,
    unit: &str,
    units: &VolumeUnits,
) -> Result<CalculateNutrientsResponse, String> {
    let id = parse_food_id(id)?;
    let food = load_food(db, &id)?;
    let amount = parse_amount(&food.measures, value, unit, units)?;

    Ok(CalculateNutrientsResponse {
        food_id: food.id,
        name: food.name.clone(),
        amount_description: food.describe(&amount),
        scale_factor: food.scale_factor(&amount),
        grams: food.measures.grams(&amount),
        milliliters: food.measures.milliliters(&amount),
        nutrients: food.scaled_nutrients(&amount),
        amount,
    })
}
