//! Nutrilog MCP Server Implementation
//!
//! Implements the MCP server with all Nutrilog tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::import;
use crate::models::{FoodCreate, FoodUpdate, Nutrients};
use crate::nutrition::{
    FoodMeasures, FoodNutrient, FoodValue, Micro, NutrientUnit, VolumeUnits,
};
use crate::tools::amounts::parse_amount;
use crate::tools::entries;
use crate::tools::foods;
use crate::tools::info::StatusTracker;

/// Nutrilog MCP Service
#[derive(Clone)]
pub struct NutrilogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    volume_units: VolumeUnits,
    tool_router: ToolRouter<NutrilogService>,
}

impl NutrilogService {
    pub fn new(config: &Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
                config.volume_units_name.clone(),
            ))),
            database,
            volume_units: config.volume_units,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct NutrientParams {
    /// Micronutrient name, e.g. "sodium", "vitamin_c", "fiber"
    pub name: Option<String>,
    /// USDA nutrient number, for nutrients without a name
    pub usda_type: Option<i64>,
    pub value: f64,
    /// g, mg, mcg, kcal, kj, iu, percent (defaults to the nutrient's usual unit)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodParams {
    pub name: String,
    pub brand: Option<String>,
    /// Extra description, e.g. "raw" or "cooked"
    pub detail: Option<String>,
    /// Reference amount the nutrients are given for (e.g. 100)
    pub amount_value: f64,
    /// Unit of the reference amount: a weight, a volume, or "serving"
    pub amount_unit: String,
    /// Optional serving size value (e.g. 30)
    pub serving_value: Option<f64>,
    /// Optional serving size unit: a weight or a volume
    pub serving_unit: Option<String>,
    /// kcal per reference amount
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub carb: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub micros: Vec<NutrientParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FoodIdParams {
    /// Food ID (UUID)
    pub food_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 { 20 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodsParams {
    /// name, brand, energy or created_at
    #[serde(default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default = "default_sort_order")]
    pub sort_order: String,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_sort_by() -> String { "name".to_string() }
fn default_sort_order() -> String { "asc".to_string() }
fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateFoodParams {
    /// Food ID (UUID)
    pub food_id: String,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub detail: Option<String>,
    pub energy: Option<f64>,
    pub carb: Option<f64>,
    pub fat: Option<f64>,
    pub protein: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodSizeParams {
    /// Food ID (UUID)
    pub food_id: String,
    /// How many of the size the value covers (default 1)
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    /// Size name, e.g. "slice" or "shredded" (no '_' or '¦')
    pub name: String,
    /// Volume prefix for sizes like "1 cup, shredded"
    pub volume_unit: Option<String>,
    /// Value of `quantity` of the size, e.g. 28
    pub value: f64,
    /// Unit of the value: weight, volume, "serving" or another size of the food
    pub unit: String,
}

fn default_quantity() -> f64 { 1.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveFoodSizeParams {
    /// Food ID (UUID)
    pub food_id: String,
    /// Size id as shown by food_units (name, or name¦N for volume-prefixed sizes)
    pub size_id: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetFoodDensityParams {
    /// Food ID (UUID)
    pub food_id: String,
    /// Weight side, e.g. 240 (omit both sides to clear the density)
    pub weight_value: Option<f64>,
    /// Weight unit, e.g. "g"
    pub weight_unit: Option<String>,
    /// Volume side, e.g. 1
    pub volume_value: Option<f64>,
    /// Volume unit, e.g. "cup"
    pub volume_unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateNutrientsParams {
    /// Food ID (UUID)
    pub food_id: String,
    pub value: f64,
    /// Weight, volume, "serving" or one of the food's sizes
    pub unit: String,
}

// ============================================================================
// Food Log Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Food ID (UUID)
    pub food_id: String,
    pub value: f64,
    /// Weight, volume, "serving" or one of the food's sizes
    pub unit: String,
    /// Date in ISO format: YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
    /// breakfast, lunch, dinner, snack or unspecified
    pub meal: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDayParams {
    /// Date in ISO format: YYYY-MM-DD (defaults to today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteFoodEntryParams {
    /// Food entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportFoodsParams {
    /// Path to a JSON file holding an array of food definitions
    pub file_path: String,
}

/// Build a new food from tool parameters
fn food_from_params(p: AddFoodParams, units: &VolumeUnits) -> Result<FoodCreate, String> {
    // No sizes exist yet, so only weights, volumes and servings parse
    let blank = FoodMeasures::new(FoodValue::serving(1.0));

    let amount = parse_amount(&blank, p.amount_value, &p.amount_unit, units)?;
    let serving = match (p.serving_value, p.serving_unit) {
        (Some(value), Some(unit)) => Some(parse_amount(&blank, value, &unit, units)?),
        (None, None) => None,
        _ => return Err("serving needs both serving_value and serving_unit".to_string()),
    };

    let micros = p
        .micros
        .into_iter()
        .map(|n| {
            let micro = match n.name.as_deref() {
                Some(name) => {
                    Some(Micro::parse(name).ok_or_else(|| format!("Unknown nutrient '{}'", name))?)
                }
                None => None,
            };
            let unit = match (n.unit.as_deref(), micro) {
                (Some(unit), _) => NutrientUnit::parse(unit)
                    .ok_or_else(|| format!("Unknown nutrient unit '{}'", unit))?,
                (None, Some(micro)) => micro.default_unit(),
                (None, None) => return Err("Nutrients given by usda_type need a unit".to_string()),
            };
            Ok(FoodNutrient {
                micro,
                usda_type: n.usda_type,
                value: n.value,
                unit,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let mut measures = FoodMeasures::new(amount);
    measures.serving = serving;

    Ok(FoodCreate {
        name: p.name,
        brand: p.brand,
        detail: p.detail,
        measures,
        nutrients: Nutrients {
            energy: p.energy,
            carb: p.carb,
            fat: p.fat,
            protein: p.protein,
            micros,
        },
    })
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutrilogService {
    // --- Status ---

    #[tool(description = "Get the status of the Nutrilog service (build info, database, volume units) and usage instructions for the food and log tools")]
    async fn nutrilog_info(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker
            .get_status(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&status)
    }

    // --- Foods ---

    #[tool(description = "Create a new food. Nutrients are given per the reference amount (amount_value amount_unit), e.g. per 100 g, per 1 cup or per 1 serving.")]
    fn add_food(&self, Parameters(p): Parameters<AddFoodParams>) -> Result<CallToolResult, McpError> {
        let data = food_from_params(p, &self.volume_units).map_err(|e| McpError::internal_error(e, None))?;
        let result = foods::add_food(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get full details for a food: reference amount, serving, sizes, density, nutrients and log usage")]
    fn get_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::get_food(&self.database, &p.food_id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(detail) => to_json(&detail),
            None => to_json(&serde_json::json!({"error": "Food not found", "id": p.food_id})),
        }
    }

    #[tool(description = "Search for foods by name or brand")]
    fn search_foods(&self, Parameters(p): Parameters<SearchFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_foods(&self.database, &p.query, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List foods with sorting and pagination")]
    fn list_foods(&self, Parameters(p): Parameters<ListFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::list_foods(&self.database, &p.sort_by, &p.sort_order, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a food's name, brand, detail, energy or macros. Log entries reflect the change immediately.")]
    fn update_food(&self, Parameters(p): Parameters<UpdateFoodParams>) -> Result<CallToolResult, McpError> {
        let data = FoodUpdate {
            name: p.name,
            brand: p.brand,
            detail: p.detail,
            energy: p.energy,
            carb: p.carb,
            fat: p.fat,
            protein: p.protein,
        };
        let result = foods::update_food(&self.database, &p.food_id, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a food (only allowed if no log entries use it)")]
    fn delete_food(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_food(&self.database, &p.food_id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Ok(success) => to_json(&success),
            Err(blocked) => to_json(&blocked),
        }
    }

    #[tool(description = "Add a named size to a food: quantity x name = value unit, e.g. 1 slice = 28 g, or with a volume_unit prefix 1 cup, shredded = 113 g. Size names must be unique per volume prefix.")]
    fn add_food_size(&self, Parameters(p): Parameters<AddFoodSizeParams>) -> Result<CallToolResult, McpError> {
        let result = foods::add_food_size(
            &self.database,
            &p.food_id,
            p.quantity,
            &p.name,
            p.volume_unit.as_deref(),
            p.value,
            &p.unit,
            &self.volume_units,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove a size from a food. Log entries using the size stop resolving and count as zero.")]
    fn remove_food_size(&self, Parameters(p): Parameters<RemoveFoodSizeParams>) -> Result<CallToolResult, McpError> {
        let result = foods::remove_food_size(&self.database, &p.food_id, &p.size_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Set a food's density (weight_value weight_unit == volume_value volume_unit), enabling weight/volume conversion. Omit all values to clear it.")]
    fn set_food_density(&self, Parameters(p): Parameters<SetFoodDensityParams>) -> Result<CallToolResult, McpError> {
        let weight = match (p.weight_value, p.weight_unit.as_deref()) {
            (Some(value), Some(unit)) => Some((value, unit)),
            (None, None) => None,
            _ => return Err(McpError::internal_error("weight needs both a value and a unit", None)),
        };
        let volume = match (p.volume_value, p.volume_unit.as_deref()) {
            (Some(value), Some(unit)) => Some((value, unit)),
            (None, None) => None,
            _ => return Err(McpError::internal_error("volume needs both a value and a unit", None)),
        };
        let result = foods::set_food_density(&self.database, &p.food_id, weight, volume, &self.volume_units)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List the units a food can be measured in, including its sizes, and whether it is weight-only, volume-only or serving-only")]
    fn food_units(&self, Parameters(p): Parameters<FoodIdParams>) -> Result<CallToolResult, McpError> {
        let result = foods::food_units(&self.database, &p.food_id, &self.volume_units)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Calculate the nutrients of an amount of a food, in any unit the food supports")]
    fn calculate_nutrients(&self, Parameters(p): Parameters<CalculateNutrientsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::calculate_nutrients(&self.database, &p.food_id, p.value, &p.unit, &self.volume_units)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Food Log ---

    #[tool(description = "Log an amount of a food on a date and meal. Returns the entry's nutrients and the day totals.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let result = entries::log_food(
            &self.database,
            &p.food_id,
            p.value,
            &p.unit,
            p.date.as_deref(),
            p.meal.as_deref(),
            p.notes,
            &self.volume_units,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get all log entries for a date with their nutrients and the day totals")]
    fn get_day(&self, Parameters(p): Parameters<GetDayParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(entries::today);
        let result = entries::get_day(&self.database, &date).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a log entry")]
    fn delete_food_entry(&self, Parameters(p): Parameters<DeleteFoodEntryParams>) -> Result<CallToolResult, McpError> {
        let result = entries::delete_food_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Import ---

    #[tool(description = "Import foods from a JSON file holding an array of food definitions. Inserts in batches of 500; invalid foods are skipped and reported.")]
    fn import_foods(&self, Parameters(p): Parameters<ImportFoodsParams>) -> Result<CallToolResult, McpError> {
        let report = import::import_file(&self.database, std::path::Path::new(&p.file_path))
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        // Only return the first errors, the full list can be huge
        let summary = serde_json::json!({
            "success": true,
            "file_path": p.file_path,
            "total": report.total,
            "imported": report.imported,
            "skipped": report.skipped,
            "batches": report.batches,
            "errors": report.errors.iter().take(20).collect::<Vec<_>>(),
            "message": format!("Imported {} of {} foods", report.imported, report.total)
        });
        to_json(&summary)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrilogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrilog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrilog".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrilog - food database and food log with unit conversion. \
                 Call nutrilog_info for usage instructions. \
                 Foods: add/get/search/list/update/delete_food, import_foods. \
                 Units: food_units, add_food_size, remove_food_size, set_food_density. \
                 Nutrients: calculate_nutrients for any amount in any supported unit. \
                 Log: log_food, get_day, delete_food_entry."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{UnitType, VolumeUnit, WeightUnit};

    fn params(amount_unit: &str) -> AddFoodParams {
        AddFoodParams {
            name: "Yogurt".to_string(),
            brand: None,
            detail: None,
            amount_value: 1.0,
            amount_unit: amount_unit.to_string(),
            serving_value: Some(170.0),
            serving_unit: Some("g".to_string()),
            energy: 100.0,
            carb: 6.0,
            fat: 0.0,
            protein: 17.0,
            micros: vec![NutrientParams {
                name: Some("calcium".to_string()),
                usda_type: None,
                value: 190.0,
                unit: None,
            }],
        }
    }

    #[test]
    fn test_food_from_params() {
        let food = food_from_params(params("cup"), &VolumeUnits::default()).unwrap();
        assert_eq!(food.measures.amount, FoodValue::volume(1.0, VolumeUnit::CupUs));
        assert_eq!(food.measures.serving, Some(FoodValue::weight(170.0, WeightUnit::G)));
        assert_eq!(food.nutrients.micros[0].unit, NutrientUnit::Mg);

        let per_serving = food_from_params(params("serving"), &VolumeUnits::default()).unwrap();
        assert_eq!(per_serving.measures.amount.unit_type, UnitType::Serving);
    }

    #[test]
    fn test_food_from_params_rejects_unknowns() {
        assert!(food_from_params(params("slice"), &VolumeUnits::default()).is_err());

        let mut p = params("g");
        p.micros[0].name = Some("unobtainium".to_string());
        assert!(food_from_params(p, &VolumeUnits::default()).is_err());

        let mut p = params("g");
        p.serving_unit = None;
        assert!(food_from_params(p, &VolumeUnits::default()).is_err());
    }
}
