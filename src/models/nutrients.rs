//! Shared nutrient data structure
//!
//! Used by foods, log entries, and day totals.

use serde::{Deserialize, Serialize};

use crate::nutrition::FoodNutrient;

/// Energy, macros and micronutrients for some amount of food
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(default)]
    pub energy: f64,  // kcal
    #[serde(default)]
    pub carb: f64,    // grams
    #[serde(default)]
    pub fat: f64,     // grams
    #[serde(default)]
    pub protein: f64, // grams
    #[serde(default)]
    pub micros: Vec<FoodNutrient>,
}

impl Nutrients {
    /// Create a new Nutrients with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrient values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            energy: self.energy * multiplier,
            carb: self.carb * multiplier,
            fat: self.fat * multiplier,
            protein: self.protein * multiplier,
            micros: self.micros.iter().map(|n| n.scaled(multiplier)).collect(),
        }
    }

    /// Add another set of nutrients to this one.
    ///
    /// Micronutrients with the same nutrient and unit are summed; the rest
    /// are appended in order of first appearance.
    pub fn add(&self, other: &Nutrients) -> Self {
        let mut micros = self.micros.clone();
        for nutrient in &other.micros {
            match micros.iter_mut().find(|m| m.matches(nutrient)) {
                Some(existing) => existing.value += nutrient.value,
                None => micros.push(nutrient.clone()),
            }
        }
        Self {
            energy: self.energy + other.energy,
            carb: self.carb + other.carb,
            fat: self.fat + other.fat,
            protein: self.protein + other.protein,
            micros,
        }
    }
}

impl std::ops::Add for Nutrients {
    type Output = Nutrients;

    fn add(self, other: Nutrients) -> Nutrients {
        Nutrients::add(&self, &other)
    }
}

impl std::iter::Sum for Nutrients {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrients::zero(), |acc, n| acc + n)
    }
}
