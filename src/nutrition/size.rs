//! Food sizes
//!
//! Named, food-scoped units: "`quantity` x `name` = `value`", for example
//! "1 slice = 28 g" or, volume-prefixed, "1 cup, shredded = 125 g".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::codec::{
    encode_optional, format_f64, parse_f64, parse_optional, split_fields, CodecError,
    CodecResult, FOOD_SIZE_DELIMITER, RESERVED_NAME_CHARACTERS,
};
use super::form::FormSize;
use super::measures::FoodMeasures;
use super::units::VolumeUnit;
use super::value::FoodValue;

const FIELD_COUNT: usize = 4;

/// Separates a size name from its volume type suffix in a size id.
///
/// Reserved from size names, so ids of distinct (name, volume type) pairs
/// never collide.
pub const SIZE_ID_SEPARATOR: char = FOOD_SIZE_DELIMITER;

/// Maximum depth when a size is defined in terms of another size
pub const MAX_SIZE_DEPTH: usize = 8;

/// Derive the id a size is referenced by
pub fn size_id(name: &str, volume_unit: Option<VolumeUnit>) -> String {
    match volume_unit {
        Some(unit) => format!(
            "{}{}{}",
            name,
            SIZE_ID_SEPARATOR,
            unit.unit_type().raw_value()
        ),
        None => name.to_string(),
    }
}

/// Check that `name` is usable as a size name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Size name cannot be empty".to_string());
    }
    if let Some(c) = name.chars().find(|c| RESERVED_NAME_CHARACTERS.contains(c)) {
        return Err(format!("Size name '{}' cannot contain '{}'", name, c));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSize {
    pub quantity: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_unit: Option<VolumeUnit>,
    pub value: FoodValue,
}

impl FoodSize {
    pub fn new(
        quantity: f64,
        name: impl Into<String>,
        volume_unit: Option<VolumeUnit>,
        value: FoodValue,
    ) -> Self {
        Self {
            quantity,
            name: name.into(),
            volume_unit,
            value,
        }
    }

    pub fn id(&self) -> String {
        size_id(&self.name, self.volume_unit)
    }

    pub fn is_volume_prefixed(&self) -> bool {
        self.volume_unit.is_some()
    }

    /// Resolve into the in-memory form representation
    pub fn form_size(&self, food: &FoodMeasures) -> Option<FormSize> {
        FormSize::resolve(self, food, 0)
    }

    /// Encode as the 4-field delimited string
    pub fn encode(&self) -> String {
        let fields = [
            self.name.clone(),
            format_f64(self.quantity),
            encode_optional(self.volume_unit),
            self.value.encode(),
        ];
        fields.join(&FOOD_SIZE_DELIMITER.to_string())
    }

    /// Decode a 4-field delimited string
    pub fn decode(s: &str) -> CodecResult<Self> {
        let fields = split_fields("food size", s, FOOD_SIZE_DELIMITER, FIELD_COUNT)?;
        Ok(Self {
            name: fields[0].to_string(),
            quantity: parse_f64("size quantity", fields[1])?,
            volume_unit: parse_optional(fields[2])?,
            value: FoodValue::decode(fields[3])?,
        })
    }
}

impl fmt::Display for FoodSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for FoodSize {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
