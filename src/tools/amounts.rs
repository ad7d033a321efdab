//! Amount parsing
//!
//! Turns a number plus a free-form unit string from a tool call into a
//! `FoodValue` relative to a specific food.

use crate::nutrition::{
    FoodMeasures, FoodValue, UnitType, VolumeUnit, VolumeUnitType, VolumeUnits, WeightUnit,
};

/// Parse `value unit` for `food`.
///
/// Recognized units, in order: one of the food's unprefixed size names,
/// a weight unit, a volume unit (generic names resolved through `units`),
/// "serving", or a volume unit followed by the name of a volume-prefixed
/// size ("cup shredded", "tbsp, shredded").
pub fn parse_amount(
    food: &FoodMeasures,
    value: f64,
    unit: &str,
    units: &VolumeUnits,
) -> Result<FoodValue, String> {
    if !value.is_finite() || value <= 0.0 {
        return Err("Amount must be greater than 0".to_string());
    }
    let unit = unit.trim();
    if unit.is_empty() {
        return Err("Unit cannot be empty".to_string());
    }

    if let Some(size) = food
        .sizes
        .iter()
        .find(|s| !s.is_volume_prefixed() && s.name.eq_ignore_ascii_case(unit))
    {
        return Ok(FoodValue::size(value, size, None));
    }

    if let Some(weight_unit) = WeightUnit::parse(unit) {
        return Ok(FoodValue::weight(value, weight_unit));
    }

    if let Some(volume_unit) = VolumeUnit::parse(unit, units) {
        return Ok(FoodValue::volume(value, volume_unit));
    }

    if matches!(unit.to_lowercase().as_str(), "serving" | "servings") {
        return Ok(FoodValue::serving(value));
    }

    if let Some((prefix, name)) = split_prefix(unit, units) {
        if let Some(size) = food.sizes.iter().find(|s| {
            s.volume_unit
                .is_some_and(|declared| declared.unit_type() == prefix.unit_type())
                && s.name.eq_ignore_ascii_case(name)
        }) {
            return Ok(FoodValue::size(value, size, Some(prefix)));
        }
        // A different prefix than the declared one converts through volume
        if let Some(size) = food
            .sizes
            .iter()
            .find(|s| s.is_volume_prefixed() && s.name.eq_ignore_ascii_case(name))
        {
            return Ok(FoodValue::size(value, size, Some(prefix)));
        }
    }

    Err(format!(
        "Unknown unit '{}' for this food. Available: {}",
        unit,
        available_units(food, units).join(", ")
    ))
}

/// Split "cup shredded" / "cup, shredded" into a volume unit and a size name
fn split_prefix<'a>(unit: &'a str, units: &VolumeUnits) -> Option<(VolumeUnit, &'a str)> {
    // Longest prefix first so "fl oz" wins over a hypothetical "fl"
    let boundaries: Vec<usize> = unit
        .char_indices()
        .filter(|(_, c)| c.is_whitespace() || *c == ',')
        .map(|(i, _)| i)
        .collect();

    boundaries.into_iter().rev().find_map(|i| {
        let prefix = VolumeUnit::parse(&unit[..i], units)?;
        let name = unit[i..].trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        (!name.is_empty()).then_some((prefix, name))
    })
}

/// Unit strings `parse_amount` accepts for `food`
pub fn available_units(food: &FoodMeasures, units: &VolumeUnits) -> Vec<String> {
    let mut names = Vec::new();
    for unit_type in food.available_unit_types() {
        match unit_type {
            UnitType::Weight => {
                names.extend(WeightUnit::ALL.iter().map(|u| u.abbreviation().to_string()));
            }
            UnitType::Volume => {
                names.extend(volume_names(units));
            }
            UnitType::Serving => names.push("serving".to_string()),
            UnitType::Size => {
                for size in &food.sizes {
                    match size.volume_unit {
                        Some(unit) => names.push(format!("{} {}", unit.abbreviation(), size.name)),
                        None => names.push(size.name.clone()),
                    }
                }
            }
        }
    }
    names
}

fn volume_names(units: &VolumeUnits) -> Vec<String> {
    [
        VolumeUnitType::Ml,
        VolumeUnitType::Liter,
        VolumeUnitType::Teaspoon,
        VolumeUnitType::Tablespoon,
        VolumeUnitType::FluidOunce,
        VolumeUnitType::Cup,
        VolumeUnitType::Pint,
        VolumeUnitType::Quart,
        VolumeUnitType::Gallon,
    ]
    .into_iter()
    .map(|t| units.unit(t).abbreviation().to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{FoodDensity, FoodSize};

    fn cheese() -> FoodMeasures {
        let mut food = FoodMeasures::new(FoodValue::weight(100.0, WeightUnit::G));
        food.sizes = vec![
            FoodSize::new(1.0, "slice", None, FoodValue::weight(20.0, WeightUnit::G)),
            FoodSize::new(
                1.0,
                "shredded",
                Some(VolumeUnit::CupUs),
                FoodValue::weight(113.0, WeightUnit::G),
            ),
        ];
        food
    }

    #[test]
    fn test_parse_basic_units() {
        let food = cheese();
        let units = VolumeUnits::default();

        assert_eq!(
            parse_amount(&food, 30.0, "grams", &units).unwrap(),
            FoodValue::weight(30.0, WeightUnit::G)
        );
        assert_eq!(
            parse_amount(&food, 2.0, "Slice", &units).unwrap(),
            FoodValue::size_with_id(2.0, "slice".to_string(), None)
        );
        assert_eq!(
            parse_amount(&food, 1.0, "servings", &units).unwrap(),
            FoodValue::serving(1.0)
        );
    }

    #[test]
    fn test_volume_uses_preference() {
        let food = cheese();
        let metric = VolumeUnits::metric();

        assert_eq!(
            parse_amount(&food, 1.0, "cup", &metric).unwrap(),
            FoodValue::volume(1.0, VolumeUnit::CupMetric)
        );
        assert_eq!(
            parse_amount(&food, 1.0, "cup_us", &metric).unwrap(),
            FoodValue::volume(1.0, VolumeUnit::CupUs)
        );
    }

    #[test]
    fn test_prefixed_size() {
        let food = cheese();
        let units = VolumeUnits::default();

        let value = parse_amount(&food, 0.5, "cup, shredded", &units).unwrap();
        assert_eq!(value.size_id.as_deref(), Some("shredded¦3"));
        assert_eq!(value.size_volume_unit, Some(VolumeUnit::CupUs));
        assert!((food.scale_factor(&value) - 0.565).abs() < 1e-9);

        // A tablespoon of a cup-declared size converts through volume
        let tbsp = parse_amount(&food, 1.0, "tbsp shredded", &units).unwrap();
        assert_eq!(tbsp.size_id.as_deref(), Some("shredded¦3"));
        assert_eq!(tbsp.size_volume_unit, Some(VolumeUnit::TablespoonUs));
        assert!((food.scale_factor(&tbsp) - 1.13 / 16.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_input() {
        let food = cheese();
        let units = VolumeUnits::default();

        assert!(parse_amount(&food, 0.0, "g", &units).is_err());
        assert!(parse_amount(&food, 1.0, "  ", &units).is_err());
        let err = parse_amount(&food, 1.0, "wedge", &units).unwrap_err();
        assert!(err.contains("wedge"));
        assert!(err.contains("slice"));
    }

    #[test]
    fn test_available_units() {
        let mut food = cheese();
        let names = available_units(&food, &VolumeUnits::default());
        assert!(names.contains(&"g".to_string()));
        assert!(names.contains(&"slice".to_string()));
        assert!(names.contains(&"cup shredded".to_string()));
        assert!(!names.contains(&"serving".to_string()));

        food.sizes.clear();
        food.density = Some(FoodDensity::new(100.0, WeightUnit::G, 1.0, VolumeUnit::CupUs));
        let names = available_units(&food, &VolumeUnits::default());
        assert!(names.contains(&"tbsp".to_string()));
    }

    #[test]
    fn test_every_listed_unit_parses() {
        let mut food = cheese();
        food.serving = Some(FoodValue::weight(30.0, WeightUnit::G));
        food.density = Some(FoodDensity::new(100.0, WeightUnit::G, 1.0, VolumeUnit::CupUs));

        for units in [VolumeUnits::us_customary(), VolumeUnits::metric(), VolumeUnits::imperial()] {
            let names = available_units(&food, &units);
            assert!(names.contains(&"pt".to_string()));
            for name in names {
                let value = parse_amount(&food, 1.0, &name, &units)
                    .unwrap_or_else(|e| panic!("'{}' did not parse: {}", name, e));
                assert!(food.scale_factor(&value) > 0.0, "'{}' does not scale", name);
            }
        }
    }
}
