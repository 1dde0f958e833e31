//! Component type mapping between Wokwi and SHDF.
//!
//! Wokwi names parts like `wokwi-arduino-uno`; SHDF uses lower-case words
//! like `arduino uno`. Types missing from the catalog get a deterministic
//! synthesized name so a partial translation is still possible.

use super::MappingError;
use crate::catalog::{Catalog, ComponentType};

/// Prefix carried by every simulator part type.
pub const SIMULATOR_PREFIX: &str = "wokwi-";

/// Outcome of a type lookup in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    /// Found in the catalog.
    Catalog(String),
    /// Not in the catalog; the name was synthesized from the input.
    Synthesized(String),
}

impl TypeResolution {
    pub fn name(&self) -> &str {
        match self {
            TypeResolution::Catalog(name) | TypeResolution::Synthesized(name) => name,
        }
    }

    pub fn into_name(self) -> String {
        match self {
            TypeResolution::Catalog(name) | TypeResolution::Synthesized(name) => name,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TypeResolution::Catalog(_))
    }
}

/// Resolve a canonical type or any alias to its canonical neutral type.
///
/// Case and surrounding whitespace are ignored. Resolving a canonical name
/// returns it unchanged.
pub fn resolve_neutral_type(catalog: &Catalog, alias_or_type: &str) -> Result<ComponentType, MappingError> {
    catalog
        .lookup_alias(alias_or_type)
        .map(|entry| entry.neutral_type.clone())
        .ok_or_else(|| MappingError::UnknownType(alias_or_type.trim().to_lowercase()))
}

/// Neutral type for a simulator part type.
pub fn neutral_type_for_simulator(catalog: &Catalog, simulator_type: &str) -> TypeResolution {
    match catalog.entry_for_simulator_type(simulator_type) {
        Some(entry) => TypeResolution::Catalog(entry.neutral_type.as_str().to_string()),
        None => TypeResolution::Synthesized(
            simulator_type
                .replace(SIMULATOR_PREFIX, "")
                .to_lowercase()
                .replace('-', " "),
        ),
    }
}

/// Simulator part type for a neutral type or alias.
pub fn simulator_type_of(catalog: &Catalog, neutral_type: &str) -> TypeResolution {
    match catalog.lookup_alias(neutral_type) {
        Some(entry) => TypeResolution::Catalog(entry.simulator_type.clone()),
        None => TypeResolution::Synthesized(format!(
            "{}{}",
            SIMULATOR_PREFIX,
            neutral_type.trim().to_lowercase().replace(' ', "-")
        )),
    }
}

/// Component type implied by a component id: trailing digits stripped, then
/// resolved as an alias (`led1` -> `led`, `uno2` -> `arduino uno`).
pub fn type_from_component_id(catalog: &Catalog, component_id: &str) -> Result<ComponentType, MappingError> {
    let stem = component_id.trim_end_matches(|c: char| c.is_ascii_digit());
    resolve_neutral_type(catalog, stem)
}
