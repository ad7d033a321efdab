//! Food values
//!
//! A `FoodValue` is an amount paired with a unit-agnostic unit description.
//! Sizes are referenced by their derived id, never held, so resolving a
//! size or serving value always needs the owning food's measures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::codec::{
    encode_optional, format_f64, parse_f64, parse_int, parse_optional, split_exact, CodecError,
    CodecResult, RawValue, FOOD_VALUE_DELIMITER,
};
use super::form::FormUnit;
use super::measures::FoodMeasures;
use super::size::FoodSize;
use super::units::{UnitType, VolumeUnit, WeightUnit};

const FIELD_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodValue {
    pub value: f64,
    pub unit_type: UnitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<WeightUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_unit: Option<VolumeUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_volume_unit: Option<VolumeUnit>,
}

impl FoodValue {
    pub fn weight(value: f64, unit: WeightUnit) -> Self {
        Self {
            value,
            unit_type: UnitType::Weight,
            weight_unit: Some(unit),
            volume_unit: None,
            size_id: None,
            size_volume_unit: None,
        }
    }

    pub fn volume(value: f64, unit: VolumeUnit) -> Self {
        Self {
            value,
            unit_type: UnitType::Volume,
            weight_unit: None,
            volume_unit: Some(unit),
            size_id: None,
            size_volume_unit: None,
        }
    }

    pub fn serving(value: f64) -> Self {
        Self {
            value,
            unit_type: UnitType::Serving,
            weight_unit: None,
            volume_unit: None,
            size_id: None,
            size_volume_unit: None,
        }
    }

    /// A value measured in `size`, optionally choosing the volume prefix unit
    pub fn size(value: f64, size: &FoodSize, volume_unit: Option<VolumeUnit>) -> Self {
        Self::size_with_id(value, size.id(), volume_unit)
    }

    pub fn size_with_id(value: f64, size_id: String, volume_unit: Option<VolumeUnit>) -> Self {
        Self {
            value,
            unit_type: UnitType::Size,
            weight_unit: None,
            volume_unit: None,
            size_id: Some(size_id),
            size_volume_unit: volume_unit,
        }
    }

    /// Build a value from a form selection
    pub fn new(value: f64, unit: &FormUnit) -> Self {
        match unit {
            FormUnit::Weight(u) => Self::weight(value, *u),
            FormUnit::Volume(u) => Self::volume(value, *u),
            FormUnit::Serving => Self::serving(value),
            FormUnit::Size(size, volume_unit) => Self::size_with_id(value, size.id(), *volume_unit),
        }
    }

    pub fn is_weight_based(&self) -> bool {
        self.unit_type == UnitType::Weight
    }

    pub fn is_volume_based(&self) -> bool {
        self.unit_type == UnitType::Volume
    }

    /// Check that exactly the unit fields `unit_type` calls for are set
    pub fn validate(&self) -> Result<(), String> {
        let (weight, volume, size) = match self.unit_type {
            UnitType::Weight => (true, false, false),
            UnitType::Volume => (false, true, false),
            UnitType::Serving => (false, false, false),
            UnitType::Size => (false, false, true),
        };
        let unit_type = self.unit_type.as_str();

        if self.weight_unit.is_some() != weight {
            return Err(if weight {
                format!("a {} value needs a weight_unit", unit_type)
            } else {
                format!("a {} value cannot have a weight_unit", unit_type)
            });
        }
        if self.volume_unit.is_some() != volume {
            return Err(if volume {
                format!("a {} value needs a volume_unit", unit_type)
            } else {
                format!("a {} value cannot have a volume_unit", unit_type)
            });
        }
        let has_size_id = self.size_id.as_deref().is_some_and(|id| !id.is_empty());
        if has_size_id != size {
            return Err(if size {
                format!("a {} value needs a size_id", unit_type)
            } else {
                format!("a {} value cannot have a size_id", unit_type)
            });
        }
        if !size && self.size_volume_unit.is_some() {
            return Err(format!("a {} value cannot have a size_volume_unit", unit_type));
        }
        Ok(())
    }

    /// Resolve the unit against the food this value is relative to.
    ///
    /// Returns `None` when the referenced size no longer exists or the
    /// unit field required by `unit_type` is missing.
    pub fn form_unit(&self, food: &FoodMeasures) -> Option<FormUnit> {
        match self.unit_type {
            UnitType::Serving => Some(FormUnit::Serving),
            UnitType::Weight => self.weight_unit.map(FormUnit::Weight),
            UnitType::Volume => self.volume_unit.map(FormUnit::Volume),
            UnitType::Size => {
                let size_id = self.size_id.as_deref()?;
                let Some(size) = food.size(size_id) else {
                    tracing::debug!("Size '{}' not found on food", size_id);
                    return None;
                };
                let form_size = size.form_size(food)?;
                Some(FormUnit::Size(form_size, self.size_volume_unit))
            }
        }
    }

    /// Encode as the 6-field delimited string
    pub fn encode(&self) -> String {
        let fields = [
            format_f64(self.value),
            self.unit_type.raw_value().to_string(),
            encode_optional(self.weight_unit),
            encode_optional(self.volume_unit),
            self.size_id.clone().unwrap_or_default(),
            encode_optional(self.size_volume_unit),
        ];
        fields.join(&FOOD_VALUE_DELIMITER.to_string())
    }

    /// Decode a 6-field delimited string
    pub fn decode(s: &str) -> CodecResult<Self> {
        let fields = split_exact("food value", s, FOOD_VALUE_DELIMITER, FIELD_COUNT)?;
        let value = parse_f64("value", fields[0])?;
        let unit_type = UnitType::decode_raw(parse_int(UnitType::FIELD, fields[1])?)?;
        let size_id = match fields[4] {
            "" => None,
            id => Some(id.to_string()),
        };
        Ok(Self {
            value,
            unit_type,
            weight_unit: parse_optional(fields[2])?,
            volume_unit: parse_optional(fields[3])?,
            size_id,
            size_volume_unit: parse_optional(fields[5])?,
        })
    }

    pub fn to_row(&self) -> FoodValueRow {
        FoodValueRow {
            value: self.value,
            unit_type: self.unit_type.raw_value(),
            weight_unit: self.weight_unit.map(RawValue::raw_value),
            volume_unit: self.volume_unit.map(RawValue::raw_value),
            size_id: self.size_id.clone(),
            size_volume_unit: self.size_volume_unit.map(RawValue::raw_value),
        }
    }

    /// Short human-readable description ("100 g", "2 serving", "1 slice")
    pub fn description(&self, food: &FoodMeasures) -> String {
        let unit = match self.form_unit(food) {
            Some(unit) => unit.description(),
            None => self.unit_type.as_str().to_string(),
        };
        format!("{} {}", trim_float(self.value), unit)
    }
}

impl fmt::Display for FoodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for FoodValue {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Column form of a `FoodValue`, with SQL NULL in place of the sentinel
#[derive(Debug, Clone, PartialEq)]
pub struct FoodValueRow {
    pub value: f64,
    pub unit_type: i64,
    pub weight_unit: Option<i64>,
    pub volume_unit: Option<i64>,
    pub size_id: Option<String>,
    pub size_volume_unit: Option<i64>,
}

impl TryFrom<FoodValueRow> for FoodValue {
    type Error = CodecError;

    fn try_from(row: FoodValueRow) -> Result<Self, Self::Error> {
        Ok(Self {
            value: row.value,
            unit_type: UnitType::decode_raw(row.unit_type)?,
            weight_unit: row.weight_unit.map(WeightUnit::decode_raw).transpose()?,
            volume_unit: row.volume_unit.map(VolumeUnit::decode_raw).transpose()?,
            size_id: row.size_id.filter(|id| !id.is_empty()),
            size_volume_unit: row.size_volume_unit.map(VolumeUnit::decode_raw).transpose()?,
        })
    }
}

fn trim_float(value: f64) -> String {
    let s = format!("{:.6}", value);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::codec::NIL_INT;

    #[test]
    fn test_encode_weight() {
        let v = FoodValue::weight(100.0, WeightUnit::G);
        assert_eq!(v.encode(), format!("100.0_1_1_{}__{}", NIL_INT, NIL_INT));
        assert_eq!(v.encode(), "100.0_1_1_-1__-1");
    }

    #[test]
    fn test_round_trip_all_kinds() {
        let slice = FoodSize::new(1.0, "slice", None, FoodValue::weight(28.0, WeightUnit::G));
        let shredded = FoodSize::new(
            1.0,
            "shredded",
            Some(VolumeUnit::CupUs),
            FoodValue::weight(125.0, WeightUnit::G),
        );
        let values = [
            FoodValue::weight(100.0, WeightUnit::G),
            FoodValue::weight(0.1 + 0.2, WeightUnit::Oz),
            FoodValue::volume(1.5, VolumeUnit::TablespoonMetric),
            FoodValue::serving(2.0),
            FoodValue::size(3.0, &slice, None),
            FoodValue::size(0.75, &shredded, Some(VolumeUnit::TeaspoonUs)),
        ];
        for v in values {
            let decoded = FoodValue::decode(&v.encode()).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(decoded.value.to_bits(), v.value.to_bits());
        }
    }

    #[test]
    fn test_decode_rejects_wrong_field_count() {
        assert!(matches!(
            FoodValue::decode("100.0_1_1_-1_-1"),
            Err(CodecError::FieldCount { found: 5, .. })
        ));
        assert!(FoodValue::decode("100.0_1_1_-1__-1_7").is_err());
        assert!(FoodValue::decode("").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_numbers() {
        assert!(matches!(
            FoodValue::decode("abc_1_1_-1__-1"),
            Err(CodecError::InvalidNumber { field: "value", .. })
        ));
        assert!(matches!(
            FoodValue::decode("1.0_x_1_-1__-1"),
            Err(CodecError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_raw_values() {
        assert!(matches!(
            FoodValue::decode("1.0_9_-1_-1__-1"),
            Err(CodecError::UnknownRawValue { value: 9, .. })
        ));
        assert!(matches!(
            FoodValue::decode("1.0_1_42_-1__-1"),
            Err(CodecError::UnknownRawValue { value: 42, .. })
        ));
    }

    #[test]
    fn test_from_str_and_display() {
        let v: FoodValue = "2.0_3_-1_-1__-1".parse().unwrap();
        assert_eq!(v, FoodValue::serving(2.0));
        assert_eq!(v.to_string(), "2.0_3_-1_-1__-1");
    }

    #[test]
    fn test_row_round_trip() {
        let v = FoodValue::size_with_id(2.0, "cup¦3".to_string(), Some(VolumeUnit::Ml));
        let row = v.to_row();
        assert_eq!(row.unit_type, 4);
        assert_eq!(row.weight_unit, None);
        assert_eq!(FoodValue::try_from(row).unwrap(), v);
    }

    #[test]
    fn test_row_rejects_unknown_unit() {
        let row = FoodValueRow {
            value: 1.0,
            unit_type: 2,
            weight_unit: None,
            volume_unit: Some(99),
            size_id: None,
            size_volume_unit: None,
        };
        assert!(FoodValue::try_from(row).is_err());
    }

    #[test]
    fn test_form_unit_simple_kinds() {
        let food = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        assert_eq!(FoodValue::serving(1.0).form_unit(&food), Some(FormUnit::Serving));
        assert_eq!(
            FoodValue::weight(5.0, WeightUnit::Oz).form_unit(&food),
            Some(FormUnit::Weight(WeightUnit::Oz))
        );
        assert_eq!(
            FoodValue::volume(5.0, VolumeUnit::Ml).form_unit(&food),
            Some(FormUnit::Volume(VolumeUnit::Ml))
        );
    }

    #[test]
    fn test_form_unit_missing_unit_field_is_none() {
        let food = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        let mut corrupt = FoodValue::volume(1.0, VolumeUnit::Ml);
        corrupt.volume_unit = None;
        assert_eq!(corrupt.form_unit(&food), None);
    }

    #[test]
    fn test_form_unit_resolves_size() {
        let mut food = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        let slice = FoodSize::new(1.0, "slice", None, FoodValue::weight(28.0, WeightUnit::G));
        food.sizes.push(slice.clone());

        let v = FoodValue::size(2.0, &slice, None);
        match v.form_unit(&food) {
            Some(FormUnit::Size(form_size, None)) => {
                assert_eq!(form_size.name, "slice");
                assert_eq!(form_size.amount, 28.0);
                assert_eq!(*form_size.unit, FormUnit::Weight(WeightUnit::G));
            }
            other => panic!("unexpected form unit: {:?}", other),
        }
    }

    #[test]
    fn test_form_unit_deleted_size_is_none() {
        let food = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        let v = FoodValue::size_with_id(1.0, "slice".to_string(), None);
        assert_eq!(v.form_unit(&food), None);
    }

    #[test]
    fn test_new_from_form_unit() {
        let slice = FoodSize::new(1.0, "slice", None, FoodValue::weight(28.0, WeightUnit::G));
        let food = FoodMeasures {
            sizes: vec![slice.clone()],
            ..FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G))
        };
        let form_size = slice.form_size(&food).unwrap();
        let v = FoodValue::new(3.0, &FormUnit::Size(form_size, None));
        assert_eq!(v, FoodValue::size(3.0, &slice, None));
    }

    #[test]
    fn test_description() {
        let food = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        assert_eq!(FoodValue::weight(100.0, WeightUnit::G).description(&food), "100 g");
        assert_eq!(FoodValue::serving(1.5).description(&food), "1.5 serving");
        assert_eq!(FoodValue::weight(0.001, WeightUnit::G).description(&food), "0.001 g");
        assert_eq!(FoodValue::weight(1.0 / 3.0, WeightUnit::G).description(&food), "0.333333 g");
    }

    #[test]
    fn test_validate_unit_fields() {
        let slice = FoodSize::new(1.0, "slice", None, FoodValue::weight(28.0, WeightUnit::G));
        assert!(FoodValue::weight(1.0, WeightUnit::G).validate().is_ok());
        assert!(FoodValue::volume(1.0, VolumeUnit::Ml).validate().is_ok());
        assert!(FoodValue::serving(1.0).validate().is_ok());
        assert!(FoodValue::size(1.0, &slice, Some(VolumeUnit::Ml)).validate().is_ok());

        let mut no_unit = FoodValue::weight(100.0, WeightUnit::G);
        no_unit.weight_unit = None;
        assert!(no_unit.validate().unwrap_err().contains("needs a weight_unit"));

        let mut extra = FoodValue::serving(1.0);
        extra.volume_unit = Some(VolumeUnit::Ml);
        assert!(extra.validate().unwrap_err().contains("cannot have a volume_unit"));

        let no_size = FoodValue::size_with_id(1.0, String::new(), None);
        assert!(no_size.validate().unwrap_err().contains("needs a size_id"));

        let mut prefixed = FoodValue::volume(1.0, VolumeUnit::Ml);
        prefixed.size_volume_unit = Some(VolumeUnit::Ml);
        assert!(prefixed.validate().is_err());
    }

    #[test]
    fn test_deserialized_value_without_unit_is_invalid() {
        let v: FoodValue = serde_json::from_str(r#"{"value": 100.0, "unit_type": "weight"}"#).unwrap();
        assert!(v.validate().is_err());
    }
}
