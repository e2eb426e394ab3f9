use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Rescales every ingredient quantity by the ratio of target to original
/// servings. Units are left untouched; 3 tsp stays 3 tsp worth of scaling,
/// not a promotion to tablespoons.
pub fn scale_portions(
    servings_from: f64,
    servings_to: f64,
    ingredients: &[IngredientLine],
) -> Result<Vec<IngredientLine>> {
    if servings_from <= 0.0 || servings_to <= 0.0 {
        return Err(anyhow!(
            "Servings must be positive (got {} -> {})",
            servings_from,
            servings_to
        ));
    }

    let ratio = servings_to / servings_from;
    Ok(ingredients
        .iter()
        .map(|line| IngredientLine {
            name: line.name.clone(),
            quantity: line.quantity * ratio,
            unit: line.unit.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, quantity: f64, unit: Option<&str>) -> IngredientLine {
        IngredientLine {
            name: name.to_string(),
            quantity,
            unit: unit.map(String::from),
        }
    }

    #[test]
    fn test_scale_up() {
        let scaled = scale_portions(
            2.0,
            6.0,
            &[line("jasmine rice", 200.0, Some("g")), line("egg", 2.0, None)],
        )
        .unwrap();

        assert_eq!(scaled[0].quantity, 600.0);
        assert_eq!(scaled[0].unit.as_deref(), Some("g"));
        assert_eq!(scaled[1].quantity, 6.0);
    }

    #[test]
    fn test_scale_down_fractional() {
        let scaled = scale_portions(4.0, 3.0, &[line("coconut milk", 400.0, Some("ml"))]).unwrap();
        assert_eq!(scaled[0].quantity, 300.0);
    }

    #[test]
    fn test_rejects_nonpositive_servings() {
        assert!(scale_portions(0.0, 4.0, &[]).is_err());
        assert!(scale_portions(2.0, -1.0, &[]).is_err());
    }
}
