//! Food measures
//!
//! The unit context a food provides: its reference amount, serving, sizes
//! and density. Everything needed to resolve relative units lives here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::converter;
use super::density::FoodDensity;
use super::size::{validate_name, FoodSize};
use super::units::UnitType;
use super::value::FoodValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodMeasures {
    /// Reference amount the food's nutrients are declared per
    pub amount: FoodValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving: Option<FoodValue>,
    #[serde(default)]
    pub sizes: Vec<FoodSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<FoodDensity>,
}

impl FoodMeasures {
    pub fn new(amount: FoodValue) -> Self {
        Self {
            amount,
            serving: None,
            sizes: Vec::new(),
            density: None,
        }
    }

    /// Find a size by its derived id
    pub fn size(&self, id: &str) -> Option<&FoodSize> {
        self.sizes.iter().find(|s| s.id() == id)
    }

    /// The density, if both of its sides are positive
    pub fn usable_density(&self) -> Option<FoodDensity> {
        self.density.filter(FoodDensity::is_usable)
    }

    pub fn can_be_measured_in_weight(&self) -> bool {
        self.usable_density().is_some()
            || self.amount.is_weight_based()
            || self.serving.as_ref().is_some_and(FoodValue::is_weight_based)
            || self.sizes.iter().any(|s| s.value.is_weight_based())
    }

    pub fn can_be_measured_in_volume(&self) -> bool {
        self.usable_density().is_some()
            || self.amount.is_volume_based()
            || self.serving.as_ref().is_some_and(FoodValue::is_volume_based)
            || self.sizes.iter().any(|s| s.value.is_volume_based())
    }

    /// Only weights make sense for this food: no volume, serving or sizes
    pub fn only_supports_weights(&self) -> bool {
        self.can_be_measured_in_weight()
            && !self.can_be_measured_in_volume()
            && self.serving.is_none()
            && self.sizes.is_empty()
    }

    /// Only volumes make sense for this food: no weight, serving or sizes
    pub fn only_supports_volumes(&self) -> bool {
        self.can_be_measured_in_volume()
            && !self.can_be_measured_in_weight()
            && self.serving.is_none()
            && self.sizes.is_empty()
    }

    /// Only servings make sense: neither weight nor volume, and no sizes
    pub fn only_supports_serving(&self) -> bool {
        !self.can_be_measured_in_weight()
            && !self.can_be_measured_in_volume()
            && self.sizes.is_empty()
    }

    /// Unit categories a unit picker should offer for this food
    pub fn available_unit_types(&self) -> Vec<UnitType> {
        let mut types = Vec::new();
        if self.can_be_measured_in_weight() {
            types.push(UnitType::Weight);
        }
        if self.can_be_measured_in_volume() {
            types.push(UnitType::Volume);
        }
        if self.serving.is_some() || self.amount.unit_type == UnitType::Serving {
            types.push(UnitType::Serving);
        }
        if !self.sizes.is_empty() {
            types.push(UnitType::Size);
        }
        types
    }

    /// Multiplier turning per-`amount` nutrients into nutrients for `requested`.
    ///
    /// Zero when the requested unit cannot be related to the food's amount.
    pub fn scale_factor(&self, requested: &FoodValue) -> f64 {
        converter::scale_factor(self, requested)
    }

    /// `value` expressed in grams, if the food allows it
    pub fn grams(&self, value: &FoodValue) -> Option<f64> {
        converter::grams(self, value)
    }

    /// `value` expressed in milliliters, if the food allows it
    pub fn milliliters(&self, value: &FoodValue) -> Option<f64> {
        converter::milliliters(self, value)
    }

    /// Ids shared by more than one size
    pub fn duplicate_size_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for size in &self.sizes {
            let id = size.id();
            if !seen.insert(id.clone()) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// Check the invariants a stored food must satisfy
    pub fn validate(&self) -> Result<(), String> {
        if self.amount.value <= 0.0 {
            return Err("amount must be greater than 0".to_string());
        }
        self.amount.validate().map_err(|e| format!("amount: {}", e))?;
        if let Some(serving) = &self.serving {
            serving.validate().map_err(|e| format!("serving: {}", e))?;
            if serving.value <= 0.0 {
                return Err("serving must be greater than 0".to_string());
            }
            if serving.unit_type == UnitType::Serving {
                return Err("serving cannot be measured in servings".to_string());
            }
        }
        for size in &self.sizes {
            validate_name(&size.name)?;
            if size.quantity <= 0.0 {
                return Err(format!("Size '{}' quantity must be greater than 0", size.name));
            }
            size.value.validate().map_err(|e| format!("Size '{}': {}", size.name, e))?;
        }
        if self.density.is_some_and(|d| !d.is_usable()) {
            return Err("density amounts must be greater than 0".to_string());
        }
        if let Some(id) = self.duplicate_size_ids().first() {
            return Err(format!("Duplicate size: '{}'", id));
        }
        Ok(())
    }
}
