//! Checks 2 to 4: references, pin names, breadboard addresses.

use std::collections::{HashMap, HashSet};

use super::CheckResult;
use crate::catalog::Catalog;
use crate::document::{Endpoint, ShdfDocument};
use crate::mapping::breadboard::{is_breadboard_endpoint, AddressError, BreadboardAddress, BREADBOARD_ID};
use crate::mapping::pins::{matches_default_pattern, pin_patterns};

/// Check 2: component ids are unique and every endpoint names a declared
/// component (or the breadboard).
pub fn validate_component_ids(document: &ShdfDocument) -> CheckResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    if !document.components.iter().all(|c| ids.insert(c.id.as_str())) {
        errors.push("Component IDs must be unique".to_string());
    }
    // finish collecting after an early duplicate
    ids.extend(document.components.iter().map(|c| c.id.as_str()));

    for (i, connection) in document.connections.iter().enumerate() {
        for (j, endpoint) in connection.endpoints().into_iter().enumerate() {
            match Endpoint::parse(endpoint) {
                Endpoint::Pin { component, .. } if !ids.contains(component) => {
                    errors.push(format!(
                        "Connection {} endpoint {} references unknown component ID: {}",
                        i, j, component
                    ));
                }
                Endpoint::Malformed(text) => {
                    errors.push(format!(
                        "Connection {} endpoint {} is not in '<component>.<pin>' form: {}",
                        i, j, text
                    ));
                }
                _ => {}
            }
        }
    }

    CheckResult::from_errors(errors)
}

/// Check 3: every pin suffix is accepted by its component's type,
/// case-insensitively. Undeclared components are left to check 2.
pub fn validate_pin_names(catalog: &Catalog, document: &ShdfDocument) -> CheckResult {
    let patterns = pin_patterns(catalog);
    let mut errors = Vec::new();

    let mut types: HashMap<&str, &str> = HashMap::new();
    for component in &document.components {
        types.entry(component.id.as_str()).or_insert(&component.component_type);
    }

    for (i, connection) in document.connections.iter().enumerate() {
        for (j, endpoint) in connection.endpoints().into_iter().enumerate() {
            let Endpoint::Pin { component, pin } = Endpoint::parse(endpoint) else {
                continue;
            };
            let Some(declared_type) = types.get(component) else {
                continue;
            };

            let accepted = match catalog
                .lookup_alias(declared_type)
                .and_then(|entry| patterns.get(entry.neutral_type.as_str()))
                .filter(|set| !set.is_empty())
            {
                Some(set) => set.matches(pin),
                None => matches_default_pattern(pin),
            };

            if !accepted {
                errors.push(format!(
                    "Connection {} endpoint {} uses invalid pin name: {} for component type: {}",
                    i,
                    j,
                    pin,
                    declared_type.to_lowercase()
                ));
            }
        }
    }

    CheckResult::from_errors(errors)
}

/// Check 4: `breadboard.<col><row>`, `breadboard.<col><rail>` or
/// `breadboard.<rail>.<col>`, with the column in 1..=60.
pub fn validate_breadboard_positions(document: &ShdfDocument) -> CheckResult {
    let mut errors = Vec::new();

    for (i, connection) in document.connections.iter().enumerate() {
        for (j, endpoint) in connection.endpoints().into_iter().enumerate() {
            if !is_breadboard_endpoint(endpoint) {
                continue;
            }
            let checked = BreadboardAddress::parse_neutral(endpoint).and_then(|a| a.validate_column());
            match checked {
                Ok(()) => {}
                Err(AddressError::ColumnOutOfRange { column }) => errors.push(format!(
                    "Connection {} endpoint {} has invalid breadboard column: {} (must be 1-60)",
                    i, j, column
                )),
                Err(_) => errors.push(format!(
                    "Connection {} endpoint {} has invalid {} position format: {}",
                    i, j, BREADBOARD_ID, endpoint
                )),
            }
        }
    }

    CheckResult::from_errors(errors)
}
