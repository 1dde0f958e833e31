//! Pin name mapping between Wokwi and SHDF.
//!
//! Wokwi pin names are whatever the part author chose (`13`, `GND.1`,
//! `1.l`, `A`). SHDF pin names are derived from them once, when the catalog
//! is built, and can additionally be written using any declared alias.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::types::type_from_component_id;
use super::MappingError;
use crate::catalog::{Catalog, ComponentType};

/// Types whose pins collapse to compound names (`GND.1` -> `gnd1`,
/// `COM.2` -> `com2`) instead of the dotted form.
pub const COMPOUND_PIN_TYPES: [&str; 2] = ["arduino uno", "7-segment display"];

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn normalize_pin_part(part: &str) -> String {
    if is_numeric(part) {
        format!("pin{}", part)
    } else {
        part.to_lowercase()
    }
}

/// Derive the neutral pin name for a simulator pin of the given neutral type.
///
/// - `13` -> `pin13`
/// - compound types: `A0` -> `a0`, `GND.1` -> `gnd1`
/// - dotted names: `1.l` -> `pin1.l`
/// - otherwise lower-cased
pub fn derive_neutral_pin(neutral_type: &str, simulator_pin: &str) -> String {
    if is_numeric(simulator_pin) {
        return format!("pin{}", simulator_pin);
    }

    if COMPOUND_PIN_TYPES.contains(&neutral_type) {
        return simulator_pin
            .chars()
            .filter(|&c| c != '.')
            .flat_map(|c| c.to_lowercase())
            .collect();
    }

    if simulator_pin.contains('.') {
        return simulator_pin
            .split('.')
            .map(normalize_pin_part)
            .collect::<Vec<_>>()
            .join(".");
    }

    simulator_pin.to_lowercase()
}

/// Neutral pin name for a simulator pin, with the component type taken
/// from the component id (`led1:A` -> `a`).
pub fn neutral_pin(catalog: &Catalog, component_id: &str, simulator_pin: &str) -> Result<String, MappingError> {
    let component_type = type_from_component_id(catalog, component_id)?;
    neutral_pin_for_type(catalog, &component_type, simulator_pin)
}

/// Neutral pin name for a simulator pin of a resolved type.
///
/// Tries the simulator name as written, then case-insensitively, then as a
/// neutral name or alias.
pub fn neutral_pin_for_type(
    catalog: &Catalog,
    component_type: &ComponentType,
    simulator_pin: &str,
) -> Result<String, MappingError> {
    let entry = catalog
        .entry(component_type)
        .ok_or_else(|| MappingError::UnknownType(component_type.to_string()))?;

    entry
        .pin_by_simulator_name(simulator_pin)
        .or_else(|| entry.pin_by_neutral_name(simulator_pin))
        .map(|pin| pin.neutral_pin_name.clone())
        .ok_or_else(|| MappingError::UnknownPin {
            component_type: component_type.to_string(),
            pin: simulator_pin.to_string(),
        })
}

/// Simulator pin name for a neutral pin name or alias.
pub fn simulator_pin(catalog: &Catalog, neutral_pin: &str, neutral_type: &str) -> Result<String, MappingError> {
    let entry = catalog
        .lookup_alias(neutral_type)
        .ok_or_else(|| MappingError::UnknownType(neutral_type.trim().to_lowercase()))?;

    entry
        .pin_by_neutral_name(neutral_pin)
        .map(|pin| pin.simulator_pin_name.clone())
        .ok_or_else(|| MappingError::UnknownPin {
            component_type: entry.neutral_type.to_string(),
            pin: neutral_pin.to_string(),
        })
}

/// Accepted neutral pin names (canonical plus aliases) for one type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PinPatternSet {
    names: BTreeSet<String>,
}

impl PinPatternSet {
    /// Case-insensitive exact match against any accepted name.
    pub fn matches(&self, pin: &str) -> bool {
        self.names.contains(&pin.to_lowercase())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Pattern applied to pins of types the catalog does not describe:
/// letters, digits, `_` and `.` only.
pub fn matches_default_pattern(pin: &str) -> bool {
    !pin.is_empty()
        && pin
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Validation pattern set for every catalog type, keyed by canonical type.
pub fn pin_patterns(catalog: &Catalog) -> BTreeMap<String, PinPatternSet> {
    catalog
        .entries()
        .iter()
        .map(|entry| {
            let names = entry.accepted_pin_names().map(|n| n.to_string()).collect();
            (entry.neutral_type.as_str().to_string(), PinPatternSet { names })
        })
        .collect()
}
