//! Data models
//!
//! Rust structs representing database entities.

mod food;
mod food_entry;
mod nutrients;

pub use food::{Food, FoodCreate, FoodUpdate};
pub use food_entry::{
    calculate_day_nutrients, validate_date, FoodEntry, FoodEntryCreate, FoodEntryDetail, MealType,
};
pub use nutrients::Nutrients;
