//! Food density
//!
//! A per-food weight/volume ratio used when a conversion between weight and
//! volume is needed and no size already encodes it.

use serde::{Deserialize, Serialize};

use super::units::{VolumeQuantity, VolumeUnit, WeightQuantity, WeightUnit};

/// `weight_amount weight_unit == volume_amount volume_unit` for one food
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodDensity {
    pub weight_amount: f64,
    pub weight_unit: WeightUnit,
    pub volume_amount: f64,
    pub volume_unit: VolumeUnit,
}

impl FoodDensity {
    pub fn new(
        weight_amount: f64,
        weight_unit: WeightUnit,
        volume_amount: f64,
        volume_unit: VolumeUnit,
    ) -> Self {
        Self {
            weight_amount,
            weight_unit,
            volume_amount,
            volume_unit,
        }
    }

    /// Both sides of the ratio are positive
    pub fn is_usable(&self) -> bool {
        self.weight_amount > 0.0 && self.volume_amount > 0.0
    }

    /// Volume occupied by `weight`, in the density's volume unit.
    ///
    /// An incomplete density (either amount not positive) yields zero.
    pub fn convert_weight(&self, weight: WeightQuantity) -> VolumeQuantity {
        if !self.is_usable() {
            return VolumeQuantity::new(0.0, self.volume_unit);
        }
        let in_density_unit = weight.convert(self.weight_unit).value;
        VolumeQuantity::new(
            in_density_unit * self.volume_amount / self.weight_amount,
            self.volume_unit,
        )
    }

    /// Weight of `volume`, in the density's weight unit.
    ///
    /// An incomplete density (either amount not positive) yields zero.
    pub fn convert_volume(&self, volume: VolumeQuantity) -> WeightQuantity {
        if !self.is_usable() {
            return WeightQuantity::new(0.0, self.weight_unit);
        }
        let in_density_unit = volume.convert(self.volume_unit).value;
        WeightQuantity::new(
            in_density_unit * self.weight_amount / self.volume_amount,
            self.weight_unit,
        )
    }

    /// Grams per milliliter, if usable
    pub fn grams_per_ml(&self) -> Option<f64> {
        if !self.is_usable() {
            return None;
        }
        let grams = WeightQuantity::new(self.weight_amount, self.weight_unit).grams();
        let ml = VolumeQuantity::new(self.volume_amount, self.volume_unit).milliliters();
        Some(grams / ml)
    }
}
