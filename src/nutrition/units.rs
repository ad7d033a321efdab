//! Unit types and conversion constants
//!
//! Provides the closed unit taxonomy (weight, volume, serving, size), the
//! standard conversion factors, and quantity types for weights and volumes.

use serde::{Deserialize, Serialize};

use super::codec::RawValue;

/// The kind of unit a food value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Weight,
    Volume,
    /// Multiples of the food's serving
    Serving,
    /// A named, food-specific size
    Size,
}

impl UnitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitType::Weight => "weight",
            UnitType::Volume => "volume",
            UnitType::Serving => "serving",
            UnitType::Size => "size",
        }
    }
}

impl RawValue for UnitType {
    const FIELD: &'static str = "unit type";

    fn raw_value(self) -> i64 {
        match self {
            UnitType::Weight => 1,
            UnitType::Volume => 2,
            UnitType::Serving => 3,
            UnitType::Size => 4,
        }
    }

    fn from_raw_value(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(UnitType::Weight),
            2 => Some(UnitType::Volume),
            3 => Some(UnitType::Serving),
            4 => Some(UnitType::Size),
            _ => None,
        }
    }
}

// ============================================================================
// Volume Conversion Constants (to milliliters)
// ============================================================================

/// Milliliters per US teaspoon
pub const ML_PER_TSP_US: f64 = 4.92892;
/// Milliliters per metric teaspoon
pub const ML_PER_TSP_METRIC: f64 = 5.0;
/// Milliliters per US tablespoon
pub const ML_PER_TBSP_US: f64 = 14.7868;
/// Milliliters per metric tablespoon
pub const ML_PER_TBSP_METRIC: f64 = 15.0;
/// Milliliters per US fluid ounce
pub const ML_PER_FL_OZ_US: f64 = 29.5735;
/// Milliliters per imperial fluid ounce
pub const ML_PER_FL_OZ_IMPERIAL: f64 = 28.4131;
/// Milliliters per US cup
pub const ML_PER_CUP_US: f64 = 236.588;
/// Milliliters per metric cup
pub const ML_PER_CUP_METRIC: f64 = 250.0;
/// Milliliters per imperial cup
pub const ML_PER_CUP_IMPERIAL: f64 = 284.131;
/// Milliliters per US pint
pub const ML_PER_PINT_US: f64 = 473.176;
/// Milliliters per imperial pint
pub const ML_PER_PINT_IMPERIAL: f64 = 568.261;
/// Milliliters per US quart
pub const ML_PER_QUART_US: f64 = 946.353;
/// Milliliters per liter
pub const ML_PER_LITER: f64 = 1000.0;
/// Milliliters per US gallon
pub const ML_PER_GALLON_US: f64 = 3785.41;

// ============================================================================
// Weight Conversion Constants (to grams)
// ============================================================================

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Grams per kilogram
pub const G_PER_KG: f64 = 1000.0;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Grams per pound
pub const G_PER_LB: f64 = 453.592;

// ============================================================================
// Weight Units
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    G,
    Kg,
    Mg,
    Oz,
    Lb,
}

impl WeightUnit {
    pub const ALL: [WeightUnit; 5] = [
        WeightUnit::G,
        WeightUnit::Kg,
        WeightUnit::Mg,
        WeightUnit::Oz,
        WeightUnit::Lb,
    ];

    /// Conversion factor to grams
    pub fn grams(&self) -> f64 {
        match self {
            WeightUnit::G => 1.0,
            WeightUnit::Kg => G_PER_KG,
            WeightUnit::Mg => G_PER_MG,
            WeightUnit::Oz => G_PER_OZ,
            WeightUnit::Lb => G_PER_LB,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            WeightUnit::G => "g",
            WeightUnit::Kg => "kg",
            WeightUnit::Mg => "mg",
            WeightUnit::Oz => "oz",
            WeightUnit::Lb => "lb",
        }
    }

    /// Recognize a weight unit name
    pub fn parse(unit: &str) -> Option<Self> {
        let lower = unit.to_lowercase();
        match lower.trim() {
            "g" | "gram" | "grams" => Some(WeightUnit::G),
            "mg" | "milligram" | "milligrams" => Some(WeightUnit::Mg),
            "kg" | "kilogram" | "kilograms" => Some(WeightUnit::Kg),
            "oz" | "ounce" | "ounces" => Some(WeightUnit::Oz),
            "lb" | "lbs" | "pound" | "pounds" => Some(WeightUnit::Lb),
            _ => None,
        }
    }
}

impl RawValue for WeightUnit {
    const FIELD: &'static str = "weight unit";

    fn raw_value(self) -> i64 {
        match self {
            WeightUnit::G => 1,
            WeightUnit::Kg => 2,
            WeightUnit::Mg => 3,
            WeightUnit::Oz => 4,
            WeightUnit::Lb => 5,
        }
    }

    fn from_raw_value(raw: i64) -> Option<Self> {
        WeightUnit::ALL.into_iter().find(|u| u.raw_value() == raw)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Region-independent kind of a volume unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnitType {
    Ml,
    Liter,
    Cup,
    FluidOunce,
    Tablespoon,
    Teaspoon,
    Pint,
    Quart,
    Gallon,
}

impl VolumeUnitType {
    pub fn raw_value(&self) -> i64 {
        match self {
            VolumeUnitType::Ml => 1,
            VolumeUnitType::Liter => 2,
            VolumeUnitType::Cup => 3,
            VolumeUnitType::FluidOunce => 4,
            VolumeUnitType::Tablespoon => 5,
            VolumeUnitType::Teaspoon => 6,
            VolumeUnitType::Pint => 7,
            VolumeUnitType::Quart => 8,
            VolumeUnitType::Gallon => 9,
        }
    }

    /// Recognize a generic volume unit name ("cup", "tbsp", ...)
    pub fn parse(unit: &str) -> Option<Self> {
        let lower = unit.to_lowercase();
        match lower.trim() {
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(VolumeUnitType::Ml)
            }
            "l" | "liter" | "liters" | "litre" | "litres" => Some(VolumeUnitType::Liter),
            "tsp" | "teaspoon" | "teaspoons" => Some(VolumeUnitType::Teaspoon),
            "tbsp" | "tablespoon" | "tablespoons" => Some(VolumeUnitType::Tablespoon),
            "fl oz" | "floz" | "fluid ounce" | "fluid ounces" => Some(VolumeUnitType::FluidOunce),
            "cup" | "cups" => Some(VolumeUnitType::Cup),
            "pt" | "pint" | "pints" => Some(VolumeUnitType::Pint),
            "qt" | "quart" | "quarts" => Some(VolumeUnitType::Quart),
            "gal" | "gallon" | "gallons" => Some(VolumeUnitType::Gallon),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    Ml,
    Liter,
    CupUs,
    CupMetric,
    CupImperial,
    FluidOunceUs,
    FluidOunceImperial,
    TablespoonUs,
    TablespoonMetric,
    TeaspoonUs,
    TeaspoonMetric,
    PintUs,
    PintImperial,
    QuartUs,
    GallonUs,
}

impl VolumeUnit {
    pub const ALL: [VolumeUnit; 15] = [
        VolumeUnit::Ml,
        VolumeUnit::Liter,
        VolumeUnit::CupUs,
        VolumeUnit::CupMetric,
        VolumeUnit::CupImperial,
        VolumeUnit::FluidOunceUs,
        VolumeUnit::FluidOunceImperial,
        VolumeUnit::TablespoonUs,
        VolumeUnit::TablespoonMetric,
        VolumeUnit::TeaspoonUs,
        VolumeUnit::TeaspoonMetric,
        VolumeUnit::PintUs,
        VolumeUnit::PintImperial,
        VolumeUnit::QuartUs,
        VolumeUnit::GallonUs,
    ];

    /// Conversion factor to milliliters
    pub fn milliliters(&self) -> f64 {
        match self {
            VolumeUnit::Ml => 1.0,
            VolumeUnit::Liter => ML_PER_LITER,
            VolumeUnit::CupUs => ML_PER_CUP_US,
            VolumeUnit::CupMetric => ML_PER_CUP_METRIC,
            VolumeUnit::CupImperial => ML_PER_CUP_IMPERIAL,
            VolumeUnit::FluidOunceUs => ML_PER_FL_OZ_US,
            VolumeUnit::FluidOunceImperial => ML_PER_FL_OZ_IMPERIAL,
            VolumeUnit::TablespoonUs => ML_PER_TBSP_US,
            VolumeUnit::TablespoonMetric => ML_PER_TBSP_METRIC,
            VolumeUnit::TeaspoonUs => ML_PER_TSP_US,
            VolumeUnit::TeaspoonMetric => ML_PER_TSP_METRIC,
            VolumeUnit::PintUs => ML_PER_PINT_US,
            VolumeUnit::PintImperial => ML_PER_PINT_IMPERIAL,
            VolumeUnit::QuartUs => ML_PER_QUART_US,
            VolumeUnit::GallonUs => ML_PER_GALLON_US,
        }
    }

    pub fn unit_type(&self) -> VolumeUnitType {
        match self {
            VolumeUnit::Ml => VolumeUnitType::Ml,
            VolumeUnit::Liter => VolumeUnitType::Liter,
            VolumeUnit::CupUs | VolumeUnit::CupMetric | VolumeUnit::CupImperial => {
                VolumeUnitType::Cup
            }
            VolumeUnit::FluidOunceUs | VolumeUnit::FluidOunceImperial => VolumeUnitType::FluidOunce,
            VolumeUnit::TablespoonUs | VolumeUnit::TablespoonMetric => VolumeUnitType::Tablespoon,
            VolumeUnit::TeaspoonUs | VolumeUnit::TeaspoonMetric => VolumeUnitType::Teaspoon,
            VolumeUnit::PintUs | VolumeUnit::PintImperial => VolumeUnitType::Pint,
            VolumeUnit::QuartUs => VolumeUnitType::Quart,
            VolumeUnit::GallonUs => VolumeUnitType::Gallon,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self.unit_type() {
            VolumeUnitType::Ml => "mL",
            VolumeUnitType::Liter => "L",
            VolumeUnitType::Cup => "cup",
            VolumeUnitType::FluidOunce => "fl oz",
            VolumeUnitType::Tablespoon => "tbsp",
            VolumeUnitType::Teaspoon => "tsp",
            VolumeUnitType::Pint => "pt",
            VolumeUnitType::Quart => "qt",
            VolumeUnitType::Gallon => "gal",
        }
    }

    /// Stable snake_case name, as used in serialized JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeUnit::Ml => "ml",
            VolumeUnit::Liter => "liter",
            VolumeUnit::CupUs => "cup_us",
            VolumeUnit::CupMetric => "cup_metric",
            VolumeUnit::CupImperial => "cup_imperial",
            VolumeUnit::FluidOunceUs => "fluid_ounce_us",
            VolumeUnit::FluidOunceImperial => "fluid_ounce_imperial",
            VolumeUnit::TablespoonUs => "tablespoon_us",
            VolumeUnit::TablespoonMetric => "tablespoon_metric",
            VolumeUnit::TeaspoonUs => "teaspoon_us",
            VolumeUnit::TeaspoonMetric => "teaspoon_metric",
            VolumeUnit::PintUs => "pint_us",
            VolumeUnit::PintImperial => "pint_imperial",
            VolumeUnit::QuartUs => "quart_us",
            VolumeUnit::GallonUs => "gallon_us",
        }
    }

    /// Recognize a volume unit name.
    ///
    /// Explicit regional names ("cup_metric") map directly; generic names
    /// ("cup", "tbsp") go through the preferred `units`.
    pub fn parse(unit: &str, units: &VolumeUnits) -> Option<Self> {
        let lower = unit.to_lowercase();
        let trimmed = lower.trim();
        if let Some(explicit) = VolumeUnit::ALL.into_iter().find(|u| u.as_str() == trimmed) {
            return Some(explicit);
        }
        VolumeUnitType::parse(trimmed).map(|t| units.unit(t))
    }
}

impl RawValue for VolumeUnit {
    const FIELD: &'static str = "volume unit";

    fn raw_value(self) -> i64 {
        match self {
            VolumeUnit::Ml => 1,
            VolumeUnit::Liter => 2,
            VolumeUnit::CupUs => 3,
            VolumeUnit::CupMetric => 4,
            VolumeUnit::CupImperial => 5,
            VolumeUnit::FluidOunceUs => 6,
            VolumeUnit::FluidOunceImperial => 7,
            VolumeUnit::TablespoonUs => 8,
            VolumeUnit::TablespoonMetric => 9,
            VolumeUnit::TeaspoonUs => 10,
            VolumeUnit::TeaspoonMetric => 11,
            VolumeUnit::PintUs => 12,
            VolumeUnit::PintImperial => 13,
            VolumeUnit::QuartUs => 14,
            VolumeUnit::GallonUs => 15,
        }
    }

    fn from_raw_value(raw: i64) -> Option<Self> {
        VolumeUnit::ALL.into_iter().find(|u| u.raw_value() == raw)
    }
}

/// Preferred regional variant for each generic volume unit type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeUnits {
    pub cup: VolumeUnit,
    pub fluid_ounce: VolumeUnit,
    pub tablespoon: VolumeUnit,
    pub teaspoon: VolumeUnit,
    pub pint: VolumeUnit,
}

impl VolumeUnits {
    pub fn us_customary() -> Self {
        Self {
            cup: VolumeUnit::CupUs,
            fluid_ounce: VolumeUnit::FluidOunceUs,
            tablespoon: VolumeUnit::TablespoonUs,
            teaspoon: VolumeUnit::TeaspoonUs,
            pint: VolumeUnit::PintUs,
        }
    }

    pub fn metric() -> Self {
        Self {
            cup: VolumeUnit::CupMetric,
            fluid_ounce: VolumeUnit::FluidOunceUs,
            tablespoon: VolumeUnit::TablespoonMetric,
            teaspoon: VolumeUnit::TeaspoonMetric,
            pint: VolumeUnit::PintUs,
        }
    }

    pub fn imperial() -> Self {
        Self {
            cup: VolumeUnit::CupImperial,
            fluid_ounce: VolumeUnit::FluidOunceImperial,
            tablespoon: VolumeUnit::TablespoonMetric,
            teaspoon: VolumeUnit::TeaspoonMetric,
            pint: VolumeUnit::PintImperial,
        }
    }

    /// Parse a preset name: "us", "metric" or "imperial"
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().trim() {
            "us" | "us_customary" => Some(Self::us_customary()),
            "metric" => Some(Self::metric()),
            "imperial" => Some(Self::imperial()),
            _ => None,
        }
    }

    /// The preferred unit for a generic volume type
    pub fn unit(&self, unit_type: VolumeUnitType) -> VolumeUnit {
        match unit_type {
            VolumeUnitType::Ml => VolumeUnit::Ml,
            VolumeUnitType::Liter => VolumeUnit::Liter,
            VolumeUnitType::Cup => self.cup,
            VolumeUnitType::FluidOunce => self.fluid_ounce,
            VolumeUnitType::Tablespoon => self.tablespoon,
            VolumeUnitType::Teaspoon => self.teaspoon,
            VolumeUnitType::Pint => self.pint,
            VolumeUnitType::Quart => VolumeUnit::QuartUs,
            VolumeUnitType::Gallon => VolumeUnit::GallonUs,
        }
    }
}

impl Default for VolumeUnits {
    fn default() -> Self {
        Self::us_customary()
    }
}

// ============================================================================
// Quantities
// ============================================================================

/// An amount of some weight unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightQuantity {
    pub value: f64,
    pub unit: WeightUnit,
}

impl WeightQuantity {
    pub fn new(value: f64, unit: WeightUnit) -> Self {
        Self { value, unit }
    }

    pub fn grams(&self) -> f64 {
        self.value * self.unit.grams()
    }

    pub fn convert(&self, unit: WeightUnit) -> Self {
        Self::new(self.grams() / unit.grams(), unit)
    }
}

/// An amount of some volume unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeQuantity {
    pub value: f64,
    pub unit: VolumeUnit,
}

impl VolumeQuantity {
    pub fn new(value: f64, unit: VolumeUnit) -> Self {
        Self { value, unit }
    }

    pub fn milliliters(&self) -> f64 {
        self.value * self.unit.milliliters()
    }

    pub fn convert(&self, unit: VolumeUnit) -> Self {
        Self::new(self.milliliters() / unit.milliliters(), unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weight_units() {
        assert_eq!(WeightUnit::parse("g"), Some(WeightUnit::G));
        assert_eq!(WeightUnit::parse("Grams"), Some(WeightUnit::G));
        assert_eq!(WeightUnit::parse(" oz "), Some(WeightUnit::Oz));
        assert_eq!(WeightUnit::parse("lbs"), Some(WeightUnit::Lb));
        assert_eq!(WeightUnit::parse("tbsp"), None);
    }

    #[test]
    fn test_parse_volume_units_uses_preferences() {
        let us = VolumeUnits::us_customary();
        let metric = VolumeUnits::metric();
        assert_eq!(VolumeUnit::parse("cup", &us), Some(VolumeUnit::CupUs));
        assert_eq!(VolumeUnit::parse("cup", &metric), Some(VolumeUnit::CupMetric));
        assert_eq!(VolumeUnit::parse("tbsp", &metric), Some(VolumeUnit::TablespoonMetric));
        assert_eq!(VolumeUnit::parse("ml", &us), Some(VolumeUnit::Ml));
        assert_eq!(VolumeUnit::parse("g", &us), None);
    }

    #[test]
    fn test_parse_explicit_volume_unit_ignores_preferences() {
        let us = VolumeUnits::us_customary();
        assert_eq!(VolumeUnit::parse("cup_imperial", &us), Some(VolumeUnit::CupImperial));
    }

    #[test]
    fn test_raw_values_are_unique_and_positive() {
        for unit in VolumeUnit::ALL {
            assert!(unit.raw_value() > 0);
            assert_eq!(VolumeUnit::from_raw_value(unit.raw_value()), Some(unit));
        }
        for unit in WeightUnit::ALL {
            assert!(unit.raw_value() > 0);
            assert_eq!(WeightUnit::from_raw_value(unit.raw_value()), Some(unit));
        }
        assert_eq!(UnitType::from_raw_value(0), None);
    }

    #[test]
    fn test_weight_quantity_convert() {
        let pound = WeightQuantity::new(1.0, WeightUnit::Lb);
        let grams = pound.convert(WeightUnit::G);
        assert!((grams.value - G_PER_LB).abs() < 1e-9);
        assert_eq!(grams.unit, WeightUnit::G);
    }

    #[test]
    fn test_volume_quantity_convert() {
        let cup = VolumeQuantity::new(1.0, VolumeUnit::CupUs);
        let tbsp = cup.convert(VolumeUnit::TablespoonUs);
        assert!((tbsp.value - 16.0).abs() < 0.001);
    }
}
