//! Output Validator: re-checks the raw response against the declared schema.
//!
//! The generation service is asked for schema-conforming JSON, but nothing
//! downstream trusts that. The walk uses the exact schema value that was sent
//! with the request, so the contract has one definition.

use serde_json::{Map, Value};

use crate::errors::TailorError;
use crate::llm_client::strip_json_fences;
use crate::models::output::LlmOutput;
use crate::tailoring::schema::output_schema;

/// Parses and validates a raw response, returning the typed output.
///
/// Fails with `TailorError::Schema` naming the offending JSON path when the
/// text is not JSON, a required key is missing, or a value has the wrong shape.
pub fn validate_response(raw: &str) -> Result<LlmOutput, TailorError> {
    let mut value: Value = serde_json::from_str(strip_json_fences(raw))
        .map_err(|e| TailorError::schema("$", format!("response is not valid JSON: {e}")))?;

    check_node(&mut value, output_schema(), "")?;

    serde_json::from_value(value).map_err(|e| TailorError::schema("$", e.to_string()))
}

/// Checks `value` against `schema` in place. Optional keys holding `null` are
/// removed so typed deserialization falls back to their defaults.
fn check_node(value: &mut Value, schema: &Value, path: &str) -> Result<(), TailorError> {
    match schema.get("type").and_then(Value::as_str) {
        Some("OBJECT") => {
            let obj = value
                .as_object_mut()
                .ok_or_else(|| TailorError::schema(display(path), "expected an object"))?;
            check_object(obj, schema, path)
        }
        Some("ARRAY") => {
            let items = value
                .as_array_mut()
                .ok_or_else(|| TailorError::schema(display(path), "expected an array"))?;
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter_mut().enumerate() {
                    check_node(item, item_schema, &format!("{path}[{i}]"))?;
                }
            }
            Ok(())
        }
        Some("STRING") if !value.is_string() => {
            Err(TailorError::schema(display(path), "expected a string"))
        }
        _ => Ok(()),
    }
}

fn check_object(
    obj: &mut Map<String, Value>,
    schema: &Value,
    path: &str,
) -> Result<(), TailorError> {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    for key in &required {
        if obj.get(*key).map_or(true, Value::is_null) {
            return Err(TailorError::schema(
                child(path, key),
                "missing required key",
            ));
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (key, sub_schema) in properties {
        let is_null = match obj.get(key) {
            None => continue,
            Some(v) => v.is_null(),
        };
        if is_null {
            obj.remove(key);
            continue;
        }
        if let Some(v) = obj.get_mut(key) {
            check_node(v, sub_schema, &child(path, key))?;
        }
    }
    Ok(())
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn display(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}
