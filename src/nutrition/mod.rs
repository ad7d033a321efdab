//! Food value and unit model
//!
//! Unit taxonomy, food values and sizes with their string encodings,
//! density conversion, and nutrient scaling.

pub mod codec;
pub mod converter;
pub mod density;
pub mod form;
pub mod measures;
pub mod nutrient;
pub mod size;
pub mod units;
pub mod value;

pub use codec::{CodecError, CodecResult, RawValue, NIL_INT};
pub use converter::{base_quantity, ratio, scale_factor, BaseKind, BaseQuantity};
pub use density::FoodDensity;
pub use form::{FormSize, FormUnit};
pub use measures::FoodMeasures;
pub use nutrient::{FoodNutrient, Micro, NutrientUnit};
pub use size::{size_id, validate_name, FoodSize};
pub use units::{
    UnitType, VolumeQuantity, VolumeUnit, VolumeUnitType, VolumeUnits, WeightQuantity, WeightUnit,
};
pub use value::{FoodValue, FoodValueRow};
