//! Check 1: structural shape and component type resolution.

use serde_json::{Map, Value};

use super::CheckResult;
use crate::catalog::Catalog;
use crate::document::ShdfDocument;

fn type_error(component_type: &str) -> String {
    format!("Invalid component type: {}", component_type.to_lowercase())
}

fn check_component(index: usize, component: &Value, errors: &mut Vec<String>) {
    let Some(fields) = component.as_object() else {
        errors.push(format!("Validation error: component {} must be an object", index));
        return;
    };

    let owner = format!("component {}", index);
    require_string(fields, "id", &owner, errors);
    require_string(fields, "type", &owner, errors);

    match fields.get("properties") {
        None | Some(Value::Null) => {}
        Some(Value::Object(properties)) => {
            for (key, value) in properties {
                if value.is_array() || value.is_object() {
                    errors.push(format!(
                        "Validation error: component {} property '{}' must be a string, number or boolean",
                        index, key
                    ));
                }
            }
        }
        Some(_) => errors.push(format!(
            "Validation error: component {} 'properties' must be an object",
            index
        )),
    }
}

fn require_string(fields: &Map<String, Value>, key: &str, owner: &str, errors: &mut Vec<String>) {
    match fields.get(key) {
        Some(Value::String(_)) => {}
        Some(_) => errors.push(format!("Validation error: {} '{}' must be a string", owner, key)),
        None => errors.push(format!("Validation error: {} is missing required field '{}'", owner, key)),
    }
}

fn check_connection(index: usize, connection: &Value, errors: &mut Vec<String>) {
    let endpoints = match connection {
        Value::Array(items) => items,
        Value::Object(fields) => match fields.get("endpoints") {
            Some(Value::Array(items)) => items,
            _ => {
                errors.push(format!(
                    "Validation error: connection {} must be an array of two endpoints",
                    index
                ));
                return;
            }
        },
        _ => {
            errors.push(format!(
                "Validation error: connection {} must be an array of two endpoints",
                index
            ));
            return;
        }
    };

    if endpoints.len() != 2 {
        errors.push(format!(
            "Validation error: connection {} must have exactly 2 endpoints, found {}",
            index,
            endpoints.len()
        ));
    }
    for (j, endpoint) in endpoints.iter().enumerate() {
        if !endpoint.is_string() {
            errors.push(format!(
                "Validation error: connection {} endpoint {} must be a string",
                index, j
            ));
        }
    }
}

/// Shape errors of a raw JSON document: an object with a `components`
/// array of `{id, type, properties?}` and a `connections` array of
/// two-string arrays (or `{"endpoints": [..]}`).
pub fn validate_structure(document: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = document.as_object() else {
        return vec!["Validation error: document must be a JSON object".to_string()];
    };

    match root.get("components") {
        Some(Value::Array(components)) => {
            for (i, component) in components.iter().enumerate() {
                check_component(i, component, &mut errors);
            }
        }
        Some(_) => errors.push("Validation error: 'components' must be an array".to_string()),
        None => errors.push("Validation error: missing required field 'components'".to_string()),
    }

    match root.get("connections") {
        Some(Value::Array(connections)) => {
            for (i, connection) in connections.iter().enumerate() {
                check_connection(i, connection, &mut errors);
            }
        }
        Some(_) => errors.push("Validation error: 'connections' must be an array".to_string()),
        None => errors.push("Validation error: missing required field 'connections'".to_string()),
    }

    errors
}

/// Check 1 on a raw JSON document: [`validate_structure`], then every
/// component type, lower-cased, must be a catalog type or alias.
pub fn validate_schema(catalog: &Catalog, document: &Value) -> CheckResult {
    let mut errors = validate_structure(document);

    let components = document
        .get("components")
        .and_then(Value::as_array)
        .map(|c| c.as_slice())
        .unwrap_or_default();
    for component in components {
        if let Some(component_type) = component.get("type").and_then(Value::as_str) {
            if catalog.lookup_alias(component_type).is_none() {
                errors.push(type_error(component_type));
            }
        }
    }

    CheckResult::from_errors(errors)
}

/// Type resolution half of check 1, for typed documents.
pub fn validate_component_types(catalog: &Catalog, document: &ShdfDocument) -> CheckResult {
    let errors = document
        .components
        .iter()
        .filter(|c| catalog.lookup_alias(&c.component_type).is_none())
        .map(|c| type_error(&c.component_type))
        .collect();
    CheckResult::from_errors(errors)
}
