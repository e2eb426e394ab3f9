use anyhow::{anyhow, Result};
use serde_json::{json, Value};

pub mod convert;
pub mod scale;
pub mod substitute;

pub use convert::convert_units;
pub use scale::{scale_portions, IngredientLine};
pub use substitute::substitute_ingredient;

/// A function the model is allowed to call, in the shape both providers
/// understand (name, description, JSON-schema parameters).
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

/// A call the model asked for. `id` is empty for providers that do not
/// assign call ids.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// The executed call together with its result payload, ready to hand back
/// to the model.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub call: ToolCall,
    pub result: Value,
}

/// Declarations for the three kitchen helpers.
pub fn kitchen_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "convert_units",
            description: "Convert a quantity between kitchen units (g, kg, oz, lb, ml, l, tsp, tbsp, cup, celsius, fahrenheit).",
            parameters: json!({
                "type": "object",
                "properties": {
                    "value": { "type": "number", "description": "The quantity to convert" },
                    "from": { "type": "string", "description": "Unit to convert from" },
                    "to": { "type": "string", "description": "Unit to convert to" }
                },
                "required": ["value", "from", "to"]
            }),
        },
        ToolSpec {
            name: "scale_portions",
            description: "Rescale a list of ingredient quantities from one number of servings to another.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "servings_from": { "type": "number", "description": "Servings the recipe is written for" },
                    "servings_to": { "type": "number", "description": "Servings wanted" },
                    "ingredients": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "quantity": { "type": "number" },
                                "unit": { "type": "string" }
                            },
                            "required": ["name", "quantity"]
                        }
                    }
                },
                "required": ["servings_from", "servings_to", "ingredients"]
            }),
        },
        ToolSpec {
            name: "substitute_ingredient",
            description: "Suggest a pantry substitution for a hard-to-find ingredient.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "ingredient": { "type": "string", "description": "The ingredient to replace" }
                },
                "required": ["ingredient"]
            }),
        },
    ]
}

fn arg_f64(args: &Value, key: &str) -> Result<f64> {
    args.get(key)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| anyhow!("Missing or non-numeric argument: {}", key))
}

fn arg_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("Missing or non-string argument: {}", key))
}

/// Routes a model-requested call to the matching helper. Helper failures
/// are returned as errors; the chat layer decides how to report them back
/// to the model.
pub fn dispatch(call: &ToolCall) -> Result<Value> {
    match call.name.as_str() {
        "convert_units" => {
            let value = arg_f64(&call.arguments, "value")?;
            let from = arg_str(&call.arguments, "from")?;
            let to = arg_str(&call.arguments, "to")?;
            let converted = convert_units(value, from, to)?;
            Ok(json!({ "value": converted, "unit": to }))
        }
        "scale_portions" => {
            let servings_from = arg_f64(&call.arguments, "servings_from")?;
            let servings_to = arg_f64(&call.arguments, "servings_to")?;
            let ingredients: Vec<IngredientLine> = call
                .arguments
                .get("ingredients")
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();
            let scaled = scale_portions(servings_from, servings_to, &ingredients)?;
            Ok(json!({ "servings": servings_to, "ingredients": scaled }))
        }
        "substitute_ingredient" => {
            let ingredient = arg_str(&call.arguments, "ingredient")?;
            match substitute_ingredient(ingredient) {
                Some(sub) => Ok(json!({ "ingredient": ingredient, "substitute": sub })),
                None => Ok(json!({
                    "ingredient": ingredient,
                    "substitute": Value::Null,
                    "note": "No substitution on file for this ingredient"
                })),
            }
        }
        other => Err(anyhow!("Unknown tool: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            id: String::new(),
            name: name.to_string(),
            arguments,
        }
    }

    #[test]
    fn test_dispatch_convert() {
        let result = dispatch(&call(
            "convert_units",
            json!({ "value": 1.0, "from": "kg", "to": "g" }),
        ))
        .unwrap();
        assert_eq!(result["value"], 1000.0);
        assert_eq!(result["unit"], "g");
    }

    #[test]
    fn test_dispatch_scale() {
        let result = dispatch(&call(
            "scale_portions",
            json!({
                "servings_from": 2,
                "servings_to": 4,
                "ingredients": [{ "name": "rice", "quantity": 150.0, "unit": "g" }]
            }),
        ))
        .unwrap();
        assert_eq!(result["ingredients"][0]["quantity"], 300.0);
    }

    #[test]
    fn test_dispatch_substitute_unknown_is_not_an_error() {
        let result = dispatch(&call(
            "substitute_ingredient",
            json!({ "ingredient": "moon cheese" }),
        ))
        .unwrap();
        assert!(result["substitute"].is_null());
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        assert!(dispatch(&call("order_takeout", json!({}))).is_err());
    }

    #[test]
    fn test_dispatch_missing_argument() {
        assert!(dispatch(&call("convert_units", json!({ "value": 1.0 }))).is_err());
    }

    #[test]
    fn test_kitchen_tools_have_schemas() {
        let tools = kitchen_tools();
        assert_eq!(tools.len(), 3);
        for tool in tools {
            assert_eq!(tool.parameters["type"], "object");
        }
    }
}
