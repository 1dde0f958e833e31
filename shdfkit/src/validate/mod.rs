//! SHDF document validation.
//!
//! Four ordered checks, each producing its own [`CheckResult`]:
//!
//! 1. [`validate_schema`]: document shape and component types
//! 2. [`validate_component_ids`]: unique ids, no dangling references
//! 3. [`validate_pin_names`]: pin names accepted by each component type
//! 4. [`validate_breadboard_positions`]: breadboard address grammar and column range
//!
//! A failing check 1 stops validation; checks 2 to 4 always all run.

mod schema;
mod semantic;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::catalog::Catalog;
use crate::document::ShdfDocument;

pub use schema::{validate_component_types, validate_schema, validate_structure};
pub use semantic::{validate_breadboard_positions, validate_component_ids, validate_pin_names};

/// Outcome of one check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Aggregated outcome of all checks, errors in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn collect(checks: impl IntoIterator<Item = CheckResult>) -> Self {
        let errors: Vec<String> = checks.into_iter().flat_map(|c| c.errors).collect();
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Validate a raw JSON document.
pub fn validate_shdf_document(catalog: &Catalog, value: &Value) -> ValidationReport {
    let schema = validate_schema(catalog, value);
    if !schema.is_valid {
        debug!(errors = schema.errors.len(), "schema check failed; skipping remaining checks");
        return ValidationReport::collect([schema]);
    }

    match serde_json::from_value::<ShdfDocument>(value.clone()) {
        Ok(document) => ValidationReport::collect([
            schema,
            validate_component_ids(&document),
            validate_pin_names(catalog, &document),
            validate_breadboard_positions(&document),
        ]),
        Err(e) => ValidationReport::collect([CheckResult::from_errors(vec![format!("Validation error: {}", e)])]),
    }
}

/// Validate an already-parsed document. Its shape is guaranteed by the
/// type, so check 1 reduces to component type resolution.
pub fn validate_shdf(catalog: &Catalog, document: &ShdfDocument) -> ValidationReport {
    let types = validate_component_types(catalog, document);
    if !types.is_valid {
        return ValidationReport::collect([types]);
    }
    ValidationReport::collect([
        types,
        validate_component_ids(document),
        validate_pin_names(catalog, document),
        validate_breadboard_positions(document),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_document() {
        let catalog = Catalog::builtin();
        let doc = json!({
            "components": [
                { "id": "uno1", "type": "Arduino Uno" },
                { "id": "led1", "type": "led", "properties": { "color": "red" } }
            ],
            "connections": [["uno1.pin13", "led1.anode"], ["led1.c", "breadboard.5c"]]
        });
        let report = validate_shdf_document(&catalog, &doc);
        assert!(report.is_valid, "{:?}", report.errors);
    }

    #[test]
    fn test_schema_failure_gates_later_checks() {
        let catalog = Catalog::builtin();
        let doc = json!({
            "components": [
                { "id": "x1", "type": "warp drive" },
                { "id": "x1", "type": "led" }
            ],
            "connections": [["ghost.pin1", "breadboard.99z"]]
        });
        let report = validate_shdf_document(&catalog, &doc);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec!["Invalid component type: warp drive".to_string()]);
    }

    #[test]
    fn test_semantic_errors_accumulate() {
        let catalog = Catalog::builtin();
        let doc = json!({
            "components": [
                { "id": "led1", "type": "led" },
                { "id": "led1", "type": "led" }
            ],
            "connections": [["led1.gate", "ghost1.pin1"], ["led1.a", "breadboard.61a"]]
        });
        let report = validate_shdf_document(&catalog, &doc);
        assert_eq!(
            report.errors,
            vec![
                "Component IDs must be unique".to_string(),
                "Connection 0 endpoint 1 references unknown component ID: ghost1".to_string(),
                "Connection 0 endpoint 0 uses invalid pin name: gate for component type: led".to_string(),
                "Connection 1 endpoint 1 has invalid breadboard column: 61 (must be 1-60)".to_string(),
            ]
        );
    }

    #[test]
    fn test_typed_entry_point_matches_raw() {
        let catalog = Catalog::builtin();
        let value = json!({
            "components": [{ "id": "r1", "type": "resistor" }],
            "connections": [["r1.pin1", "breadboard.tn.3"], ["r1.pin3", "breadboard.0a"]]
        });
        let document: ShdfDocument = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(
            validate_shdf(&catalog, &document),
            validate_shdf_document(&catalog, &value)
        );
    }
}
