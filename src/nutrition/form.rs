//! Form units
//!
//! The richer in-memory unit representation used when presenting or editing
//! amounts. Obtained from a `FoodValue` plus the food it is relative to.

use super::measures::FoodMeasures;
use super::size::{size_id, FoodSize, MAX_SIZE_DEPTH};
use super::units::{UnitType, VolumeUnit, WeightUnit};

#[derive(Debug, Clone, PartialEq)]
pub enum FormUnit {
    Weight(WeightUnit),
    Volume(VolumeUnit),
    Serving,
    /// A size, with the chosen volume prefix unit for volume-prefixed sizes
    Size(FormSize, Option<VolumeUnit>),
}

impl FormUnit {
    pub fn unit_type(&self) -> UnitType {
        match self {
            FormUnit::Weight(_) => UnitType::Weight,
            FormUnit::Volume(_) => UnitType::Volume,
            FormUnit::Serving => UnitType::Serving,
            FormUnit::Size(..) => UnitType::Size,
        }
    }

    pub fn description(&self) -> String {
        match self {
            FormUnit::Weight(u) => u.abbreviation().to_string(),
            FormUnit::Volume(u) => u.abbreviation().to_string(),
            FormUnit::Serving => "serving".to_string(),
            FormUnit::Size(size, volume_unit) => match (volume_unit.or(size.volume_unit), &size.name) {
                (Some(prefix), name) => format!("{}, {}", prefix.abbreviation(), name),
                (None, name) => name.clone(),
            },
        }
    }
}

/// A size resolved against its food: "`quantity` x `name` = `amount` `unit`"
#[derive(Debug, Clone, PartialEq)]
pub struct FormSize {
    pub quantity: f64,
    pub volume_unit: Option<VolumeUnit>,
    pub name: String,
    pub amount: f64,
    pub unit: Box<FormUnit>,
}

impl FormSize {
    pub fn id(&self) -> String {
        size_id(&self.name, self.volume_unit)
    }

    pub(crate) fn resolve(size: &FoodSize, food: &FoodMeasures, depth: usize) -> Option<Self> {
        if depth >= MAX_SIZE_DEPTH {
            tracing::warn!("Size '{}' nests too deeply, treating as unresolvable", size.name);
            return None;
        }

        let unit = match size.value.unit_type {
            UnitType::Size => {
                let nested_id = size.value.size_id.as_deref()?;
                let nested = food.size(nested_id)?;
                let nested_form = Self::resolve(nested, food, depth + 1)?;
                FormUnit::Size(nested_form, size.value.size_volume_unit)
            }
            _ => size.value.form_unit(food)?,
        };

        Some(Self {
            quantity: size.quantity,
            volume_unit: size.volume_unit,
            name: size.name.clone(),
            amount: size.value.value,
            unit: Box::new(unit),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::value::FoodValue;

    fn food_with_sizes(sizes: Vec<FoodSize>) -> FoodMeasures {
        FoodMeasures {
            sizes,
            ..FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G))
        }
    }

    #[test]
    fn test_nested_size_resolves() {
        let bar = FoodSize::new(1.0, "bar", None, FoodValue::weight(40.0, WeightUnit::G));
        let pack = FoodSize::new(1.0, "pack", None, FoodValue::size(6.0, &bar, None));
        let food = food_with_sizes(vec![bar, pack.clone()]);

        let form = pack.form_size(&food).unwrap();
        assert_eq!(form.amount, 6.0);
        match *form.unit {
            FormUnit::Size(ref inner, None) => assert_eq!(inner.name, "bar"),
            ref other => panic!("unexpected unit: {:?}", other),
        }
    }

    #[test]
    fn test_size_cycle_is_unresolvable() {
        let a = FoodSize::new(1.0, "a", None, FoodValue::size_with_id(1.0, "b".into(), None));
        let b = FoodSize::new(1.0, "b", None, FoodValue::size_with_id(1.0, "a".into(), None));
        let food = food_with_sizes(vec![a.clone(), b]);
        assert!(a.form_size(&food).is_none());
    }

    #[test]
    fn test_description() {
        let shredded = FoodSize::new(
            1.0,
            "shredded",
            Some(VolumeUnit::CupUs),
            FoodValue::weight(125.0, WeightUnit::G),
        );
        let food = food_with_sizes(vec![shredded.clone()]);
        let form = shredded.form_size(&food).unwrap();

        assert_eq!(FormUnit::Size(form.clone(), None).description(), "cup, shredded");
        assert_eq!(
            FormUnit::Size(form, Some(VolumeUnit::TablespoonUs)).description(),
            "tbsp, shredded"
        );
        assert_eq!(FormUnit::Weight(WeightUnit::Oz).description(), "oz");
        assert_eq!(FormUnit::Serving.unit_type(), UnitType::Serving);
    }
}
