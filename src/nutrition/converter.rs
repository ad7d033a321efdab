//! Unit conversion functions
//!
//! Resolves food values into base quantities (grams, milliliters or
//! servings) using the food's sizes, serving and density, and derives the
//! nutrient scale factor from them.
//!
//! Every failure here is soft: an unrelatable unit resolves to `None`, and
//! the scale factor falls back to zero.

use super::measures::FoodMeasures;
use super::size::MAX_SIZE_DEPTH;
use super::units::{UnitType, VolumeQuantity, VolumeUnit, WeightQuantity, WeightUnit};
use super::value::FoodValue;

/// A food value reduced to one of the three absolute kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseQuantity {
    Grams(f64),
    Milliliters(f64),
    Servings(f64),
}

/// The kind of a base quantity, without its amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseKind {
    Grams,
    Milliliters,
    Servings,
}

impl BaseQuantity {
    pub fn amount(&self) -> f64 {
        match self {
            BaseQuantity::Grams(v) | BaseQuantity::Milliliters(v) | BaseQuantity::Servings(v) => *v,
        }
    }

    pub fn kind(&self) -> BaseKind {
        match self {
            BaseQuantity::Grams(_) => BaseKind::Grams,
            BaseQuantity::Milliliters(_) => BaseKind::Milliliters,
            BaseQuantity::Servings(_) => BaseKind::Servings,
        }
    }

    fn scaled(self, multiplier: f64) -> Self {
        match self {
            BaseQuantity::Grams(v) => BaseQuantity::Grams(v * multiplier),
            BaseQuantity::Milliliters(v) => BaseQuantity::Milliliters(v * multiplier),
            BaseQuantity::Servings(v) => BaseQuantity::Servings(v * multiplier),
        }
    }
}

/// Reduce `value` to a base quantity
///
/// Sizes are followed (including nested sizes and volume prefixes); the
/// serving itself is left as `Servings`.
pub fn base_quantity(food: &FoodMeasures, value: &FoodValue) -> Option<BaseQuantity> {
    resolve(food, value, 0)
}

fn resolve(food: &FoodMeasures, value: &FoodValue, depth: usize) -> Option<BaseQuantity> {
    if depth >= MAX_SIZE_DEPTH {
        tracing::warn!("Size nesting too deep while resolving {}", value);
        return None;
    }

    match value.unit_type {
        UnitType::Weight => Some(BaseQuantity::Grams(value.value * value.weight_unit?.grams())),
        UnitType::Volume => Some(BaseQuantity::Milliliters(
            value.value * value.volume_unit?.milliliters(),
        )),
        UnitType::Serving => Some(BaseQuantity::Servings(value.value)),
        UnitType::Size => {
            let size_id = value.size_id.as_deref()?;
            let Some(size) = food.size(size_id) else {
                tracing::debug!("Size '{}' no longer exists", size_id);
                return None;
            };
            if size.quantity <= 0.0 {
                return None;
            }

            let mut units = value.value / size.quantity;
            if let (Some(chosen), Some(declared)) = (value.size_volume_unit, size.volume_unit) {
                units *= chosen.milliliters() / declared.milliliters();
            }

            let per_quantity = resolve(food, &size.value, depth + 1)?;
            Some(per_quantity.scaled(units))
        }
    }
}

/// Express `quantity` in `kind`, crossing weight/volume through the
/// density and servings through the food's serving
pub fn express(food: &FoodMeasures, quantity: BaseQuantity, kind: BaseKind) -> Option<f64> {
    express_at(food, quantity, kind, 0)
}

fn express_at(
    food: &FoodMeasures,
    quantity: BaseQuantity,
    kind: BaseKind,
    depth: usize,
) -> Option<f64> {
    if depth >= MAX_SIZE_DEPTH {
        return None;
    }

    match (quantity, kind) {
        (BaseQuantity::Grams(g), BaseKind::Grams) => Some(g),
        (BaseQuantity::Milliliters(ml), BaseKind::Milliliters) => Some(ml),
        (BaseQuantity::Servings(s), BaseKind::Servings) => Some(s),

        (BaseQuantity::Grams(g), BaseKind::Milliliters) => {
            let density = food.usable_density()?;
            let volume = density.convert_weight(WeightQuantity::new(g, WeightUnit::G));
            Some(volume.milliliters())
        }
        (BaseQuantity::Milliliters(ml), BaseKind::Grams) => {
            let density = food.usable_density()?;
            let weight = density.convert_volume(VolumeQuantity::new(ml, VolumeUnit::Ml));
            Some(weight.grams())
        }

        (BaseQuantity::Servings(s), _) => {
            let serving = serving_quantity(food, depth)?;
            express_at(food, serving.scaled(s), kind, depth + 1)
        }
        (_, BaseKind::Servings) => {
            let serving = serving_quantity(food, depth)?;
            let per_serving = serving.amount();
            if per_serving <= 0.0 {
                return None;
            }
            let amount = express_at(food, quantity, serving.kind(), depth + 1)?;
            Some(amount / per_serving)
        }
    }
}

/// The food's serving as grams or milliliters
fn serving_quantity(food: &FoodMeasures, depth: usize) -> Option<BaseQuantity> {
    let serving = food.serving.as_ref()?;
    match resolve(food, serving, depth + 1)? {
        BaseQuantity::Servings(_) => None,
        quantity => Some(quantity),
    }
}

/// How many of `unit_value`'s units `value` amounts to.
///
/// For example, how many "1 cup" a value of "500 g" is, given a density.
pub fn ratio(food: &FoodMeasures, value: &FoodValue, unit_value: &FoodValue) -> Option<f64> {
    let reference = base_quantity(food, unit_value)?;
    let reference_amount = reference.amount();
    if reference_amount <= 0.0 {
        return None;
    }
    let quantity = base_quantity(food, value)?;
    let amount = express(food, quantity, reference.kind())?;
    Some(amount / reference_amount)
}

/// Scale factor for `requested`, relative to the food's reference amount.
///
/// Falls back to zero when the units cannot be related.
pub fn scale_factor(food: &FoodMeasures, requested: &FoodValue) -> f64 {
    if food.amount.value <= 0.0 {
        return 0.0;
    }
    match ratio(food, requested, &food.amount) {
        Some(factor) => factor,
        None => {
            tracing::warn!(
                "Unit conversion fallback: cannot relate '{}' to food amount '{}'. Using 0.",
                requested,
                food.amount
            );
            0.0
        }
    }
}

/// `value` in grams, if the food allows it
pub fn grams(food: &FoodMeasures, value: &FoodValue) -> Option<f64> {
    let quantity = base_quantity(food, value)?;
    express(food, quantity, BaseKind::Grams)
}

/// `value` in milliliters, if the food allows it
pub fn milliliters(food: &FoodMeasures, value: &FoodValue) -> Option<f64> {
    let quantity = base_quantity(food, value)?;
    express(food, quantity, BaseKind::Milliliters)
}
