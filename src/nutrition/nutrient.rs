//! Food nutrients
//!
//! Micronutrient values attached to a food, with their 4-field string form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::codec::{
    encode_optional, format_f64, parse_f64, parse_int, parse_optional, split_exact, CodecError,
    CodecResult, RawValue, FOOD_VALUE_DELIMITER, NIL_INT,
};

const FIELD_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientUnit {
    G,
    Mg,
    Mcg,
    Kcal,
    Kj,
    Iu,
    /// Percentage of the daily value
    Percent,
}

impl NutrientUnit {
    pub const ALL: [NutrientUnit; 7] = [
        NutrientUnit::G,
        NutrientUnit::Mg,
        NutrientUnit::Mcg,
        NutrientUnit::Kcal,
        NutrientUnit::Kj,
        NutrientUnit::Iu,
        NutrientUnit::Percent,
    ];

    pub fn abbreviation(&self) -> &'static str {
        match self {
            NutrientUnit::G => "g",
            NutrientUnit::Mg => "mg",
            NutrientUnit::Mcg => "mcg",
            NutrientUnit::Kcal => "kcal",
            NutrientUnit::Kj => "kJ",
            NutrientUnit::Iu => "IU",
            NutrientUnit::Percent => "%",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.trim() {
            "g" | "gram" | "grams" => Some(NutrientUnit::G),
            "mg" | "milligram" | "milligrams" => Some(NutrientUnit::Mg),
            "mcg" | "µg" | "ug" | "microgram" | "micrograms" => Some(NutrientUnit::Mcg),
            "kcal" | "cal" | "calories" => Some(NutrientUnit::Kcal),
            "kj" | "kilojoule" | "kilojoules" => Some(NutrientUnit::Kj),
            "iu" => Some(NutrientUnit::Iu),
            "%" | "percent" | "dv" => Some(NutrientUnit::Percent),
            _ => None,
        }
    }
}

impl RawValue for NutrientUnit {
    const FIELD: &'static str = "nutrient unit";

    fn raw_value(self) -> i64 {
        match self {
            NutrientUnit::G => 1,
            NutrientUnit::Mg => 2,
            NutrientUnit::Mcg => 3,
            NutrientUnit::Kcal => 4,
            NutrientUnit::Kj => 5,
            NutrientUnit::Iu => 6,
            NutrientUnit::Percent => 7,
        }
    }

    fn from_raw_value(raw: i64) -> Option<Self> {
        NutrientUnit::ALL.into_iter().find(|u| u.raw_value() == raw)
    }
}

/// Micronutrients tracked beyond energy and the three macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Micro {
    SaturatedFat,
    MonounsaturatedFat,
    PolyunsaturatedFat,
    TransFat,
    Cholesterol,
    DietaryFiber,
    Sugars,
    AddedSugars,
    Sodium,
    Potassium,
    Calcium,
    Iron,
    Magnesium,
    Zinc,
    VitaminA,
    VitaminC,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminB6,
    VitaminB12,
    Folate,
    Caffeine,
}

impl Micro {
    pub const ALL: [Micro; 23] = [
        Micro::SaturatedFat,
        Micro::MonounsaturatedFat,
        Micro::PolyunsaturatedFat,
        Micro::TransFat,
        Micro::Cholesterol,
        Micro::DietaryFiber,
        Micro::Sugars,
        Micro::AddedSugars,
        Micro::Sodium,
        Micro::Potassium,
        Micro::Calcium,
        Micro::Iron,
        Micro::Magnesium,
        Micro::Zinc,
        Micro::VitaminA,
        Micro::VitaminC,
        Micro::VitaminD,
        Micro::VitaminE,
        Micro::VitaminK,
        Micro::VitaminB6,
        Micro::VitaminB12,
        Micro::Folate,
        Micro::Caffeine,
    ];

    /// Unit the nutrient is conventionally declared in
    pub fn default_unit(&self) -> NutrientUnit {
        match self {
            Micro::SaturatedFat
            | Micro::MonounsaturatedFat
            | Micro::PolyunsaturatedFat
            | Micro::TransFat
            | Micro::DietaryFiber
            | Micro::Sugars
            | Micro::AddedSugars => NutrientUnit::G,
            Micro::VitaminA
            | Micro::VitaminD
            | Micro::VitaminK
            | Micro::VitaminB12
            | Micro::Folate => NutrientUnit::Mcg,
            _ => NutrientUnit::Mg,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Micro::SaturatedFat => "saturated_fat",
            Micro::MonounsaturatedFat => "monounsaturated_fat",
            Micro::PolyunsaturatedFat => "polyunsaturated_fat",
            Micro::TransFat => "trans_fat",
            Micro::Cholesterol => "cholesterol",
            Micro::DietaryFiber => "dietary_fiber",
            Micro::Sugars => "sugars",
            Micro::AddedSugars => "added_sugars",
            Micro::Sodium => "sodium",
            Micro::Potassium => "potassium",
            Micro::Calcium => "calcium",
            Micro::Iron => "iron",
            Micro::Magnesium => "magnesium",
            Micro::Zinc => "zinc",
            Micro::VitaminA => "vitamin_a",
            Micro::VitaminC => "vitamin_c",
            Micro::VitaminD => "vitamin_d",
            Micro::VitaminE => "vitamin_e",
            Micro::VitaminK => "vitamin_k",
            Micro::VitaminB6 => "vitamin_b6",
            Micro::VitaminB12 => "vitamin_b12",
            Micro::Folate => "folate",
            Micro::Caffeine => "caffeine",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "fiber" => return Some(Micro::DietaryFiber),
            "sugar" => return Some(Micro::Sugars),
            _ => {}
        }
        Micro::ALL.into_iter().find(|m| m.as_str() == normalized)
    }
}

impl RawValue for Micro {
    const FIELD: &'static str = "micronutrient";

    fn raw_value(self) -> i64 {
        Micro::ALL
            .iter()
            .position(|m| *m == self)
            .map(|i| i as i64 + 1)
            .unwrap_or(NIL_INT)
    }

    fn from_raw_value(raw: i64) -> Option<Self> {
        if raw < 1 {
            return None;
        }
        Micro::ALL.get(raw as usize - 1).copied()
    }
}

/// A nutrient value: a known micronutrient, a USDA nutrient number, or both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub micro: Option<Micro>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usda_type: Option<i64>,
    pub value: f64,
    pub unit: NutrientUnit,
}

impl FoodNutrient {
    pub fn micro(micro: Micro, value: f64, unit: NutrientUnit) -> Self {
        Self {
            micro: Some(micro),
            usda_type: None,
            value,
            unit,
        }
    }

    /// Same nutrient and unit, so values can be summed
    pub fn matches(&self, other: &FoodNutrient) -> bool {
        self.micro == other.micro && self.usda_type == other.usda_type && self.unit == other.unit
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            value: self.value * multiplier,
            ..self.clone()
        }
    }

    pub fn encode(&self) -> String {
        let fields = [
            encode_optional(self.micro),
            self.usda_type.unwrap_or(NIL_INT).to_string(),
            format_f64(self.value),
            self.unit.raw_value().to_string(),
        ];
        fields.join(&FOOD_VALUE_DELIMITER.to_string())
    }

    pub fn decode(s: &str) -> CodecResult<Self> {
        let fields = split_exact("food nutrient", s, FOOD_VALUE_DELIMITER, FIELD_COUNT)?;
        let usda_type = match parse_int("usda type", fields[1])? {
            NIL_INT => None,
            raw => Some(raw),
        };
        Ok(Self {
            micro: parse_optional(fields[0])?,
            usda_type,
            value: parse_f64("nutrient value", fields[2])?,
            unit: NutrientUnit::decode_raw(parse_int(NutrientUnit::FIELD, fields[3])?)?,
        })
    }
}

impl fmt::Display for FoodNutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for FoodNutrient {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_micro() {
        let sodium = FoodNutrient::micro(Micro::Sodium, 230.0, NutrientUnit::Mg);
        assert_eq!(sodium.encode(), "9_-1_230.0_2");
    }

    #[test]
    fn test_round_trip() {
        let nutrients = [
            FoodNutrient::micro(Micro::VitaminD, 2.5, NutrientUnit::Mcg),
            FoodNutrient {
                micro: None,
                usda_type: Some(1253),
                value: 0.333,
                unit: NutrientUnit::Mg,
            },
            FoodNutrient {
                micro: Some(Micro::Iron),
                usda_type: Some(1089),
                value: 15.0,
                unit: NutrientUnit::Percent,
            },
        ];
        for n in nutrients {
            assert_eq!(FoodNutrient::decode(&n.encode()).unwrap(), n);
        }
    }

    #[test]
    fn test_decode_errors() {
        assert!(FoodNutrient::decode("9_-1_230.0").is_err());
        assert!(FoodNutrient::decode("9_-1_abc_2").is_err());
        assert!(matches!(
            FoodNutrient::decode("99_-1_1.0_2"),
            Err(CodecError::UnknownRawValue { value: 99, .. })
        ));
        assert!(FoodNutrient::decode("9_-1_1.0_0").is_err());
    }

    #[test]
    fn test_micro_raw_values() {
        assert_eq!(Micro::SaturatedFat.raw_value(), 1);
        assert_eq!(Micro::Caffeine.raw_value(), 23);
        for micro in Micro::ALL {
            assert_eq!(Micro::from_raw_value(micro.raw_value()), Some(micro));
        }
        assert_eq!(Micro::from_raw_value(0), None);
        assert_eq!(Micro::from_raw_value(NIL_INT), None);
    }

    #[test]
    fn test_parse_micro() {
        assert_eq!(Micro::parse("Vitamin C"), Some(Micro::VitaminC));
        assert_eq!(Micro::parse("fiber"), Some(Micro::DietaryFiber));
        assert_eq!(Micro::parse("saturated-fat"), Some(Micro::SaturatedFat));
        assert_eq!(Micro::parse("unobtainium"), None);
    }
}
