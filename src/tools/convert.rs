use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Mass,
    Volume,
    Temperature,
}

lazy_static! {
    // Factor converts the unit into its base (grams for mass, milliliters
    // for volume). Temperature carries no factor and is handled separately.
    static ref UNITS: HashMap<&'static str, (UnitKind, f64)> = {
        let mut m = HashMap::new();
        m.insert("g", (UnitKind::Mass, 1.0));
        m.insert("kg", (UnitKind::Mass, 1000.0));
        m.insert("oz", (UnitKind::Mass, 28.3495));
        m.insert("lb", (UnitKind::Mass, 453.592));
        m.insert("ml", (UnitKind::Volume, 1.0));
        m.insert("l", (UnitKind::Volume, 1000.0));
        m.insert("tsp", (UnitKind::Volume, 4.92892));
        m.insert("tbsp", (UnitKind::Volume, 14.7868));
        m.insert("cup", (UnitKind::Volume, 236.588));
        m.insert("c", (UnitKind::Temperature, 0.0));
        m.insert("f", (UnitKind::Temperature, 0.0));
        m
    };
}

/// Maps the spellings people actually type to the canonical unit key.
fn normalize_unit(unit: &str) -> String {
    let u = unit.trim().to_lowercase();
    match u.as_str() {
        "gram" | "grams" | "gr" => "g".to_string(),
        "kilogram" | "kilograms" | "kilo" | "kilos" => "kg".to_string(),
        "ounce" | "ounces" => "oz".to_string(),
        "pound" | "pounds" | "lbs" => "lb".to_string(),
        "milliliter" | "milliliters" | "millilitre" | "millilitres" => "ml".to_string(),
        "liter" | "liters" | "litre" | "litres" => "l".to_string(),
        "teaspoon" | "teaspoons" => "tsp".to_string(),
        "tablespoon" | "tablespoons" => "tbsp".to_string(),
        "cups" => "cup".to_string(),
        "celsius" | "°c" => "c".to_string(),
        "fahrenheit" | "°f" => "f".to_string(),
        _ => u,
    }
}

/// True when the spelling (canonical or alias) names a unit we know.
pub fn is_known_unit(unit: &str) -> bool {
    UNITS.contains_key(normalize_unit(unit).as_str())
}

/// Converts a quantity between common kitchen units.
///
/// Mass and volume go through their base unit; temperature uses the usual
/// linear formula. Converting across kinds (say grams to cups) is refused,
/// since that would need a per-ingredient density we do not have.
pub fn convert_units(value: f64, from: &str, to: &str) -> Result<f64> {
    let from_key = normalize_unit(from);
    let to_key = normalize_unit(to);

    let (from_kind, from_factor) = UNITS
        .get(from_key.as_str())
        .ok_or_else(|| anyhow!("Unknown unit: {}", from))?;
    let (to_kind, to_factor) = UNITS
        .get(to_key.as_str())
        .ok_or_else(|| anyhow!("Unknown unit: {}", to))?;

    if from_kind != to_kind {
        return Err(anyhow!(
            "Cannot convert {} to {}: incompatible unit kinds",
            from,
            to
        ));
    }

    if *from_kind == UnitKind::Temperature {
        return Ok(convert_temperature(value, &from_key, &to_key));
    }

    Ok(value * from_factor / to_factor)
}

fn convert_temperature(value: f64, from: &str, to: &str) -> f64 {
    match (from, to) {
        ("c", "f") => value * 9.0 / 5.0 + 32.0,
        ("f", "c") => (value - 32.0) * 5.0 / 9.0,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_mass_conversion() {
        assert!(approx(convert_units(2.0, "kg", "g").unwrap(), 2000.0));
        assert!(approx(convert_units(1.0, "lb", "oz").unwrap(), 16.0));
    }

    #[test]
    fn test_volume_conversion() {
        assert!(approx(convert_units(1.0, "cup", "ml").unwrap(), 236.588));
        assert!(approx(convert_units(3.0, "tsp", "tbsp").unwrap(), 1.0));
    }

    #[test]
    fn test_temperature_conversion() {
        assert!(approx(convert_units(180.0, "c", "f").unwrap(), 356.0));
        assert!(approx(convert_units(356.0, "fahrenheit", "celsius").unwrap(), 180.0));
    }

    #[test]
    fn test_unit_aliases() {
        assert!(approx(convert_units(500.0, "grams", "kilograms").unwrap(), 0.5));
        assert!(approx(
            convert_units(2.0, "tablespoons", "ml").unwrap(),
            29.5736
        ));
    }

    #[test]
    fn test_incompatible_kinds() {
        assert!(convert_units(100.0, "g", "ml").is_err());
        assert!(convert_units(100.0, "c", "cup").is_err());
    }

    #[test]
    fn test_unknown_unit() {
        assert!(convert_units(1.0, "smidgen", "g").is_err());
    }
}
