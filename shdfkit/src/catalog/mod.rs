//! Component Catalog
//!
//! Authoritative list of supported part types. Each entry pairs a canonical
//! neutral (SHDF) type with its simulator (Wokwi) type, the accepted type
//! aliases, and a pin table naming every pin on both sides.
//!
//! The catalog is built once by [`build_catalog`] and never mutated
//! afterwards; every mapper takes it by reference. [`Catalog::shared`] holds
//! the process-wide instance.

pub mod builtin;
pub mod schema;

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use serde::Serialize;

use crate::mapping::pins::derive_neutral_pin;

pub use builtin::{CatalogError, CATALOG_ENV_VAR};
pub use schema::{ModuleRecord, PinRecord};

/// A neutral component type that has been resolved through the catalog.
///
/// Only the catalog hands these out, so holding one means the lookup
/// already succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ComponentType(String);

impl ComponentType {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ComponentType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ComponentType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// One pin of a catalog entry.
#[derive(Debug, Clone, Serialize)]
pub struct PinEntry {
    pub simulator_pin_name: String,
    pub neutral_pin_name: String,
    pub neutral_pin_aliases: BTreeSet<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub neutral_type: ComponentType,
    pub neutral_type_aliases: BTreeSet<String>,
    pub simulator_type: String,
    pub pins: Vec<PinEntry>,
    #[serde(skip)]
    by_simulator_pin: HashMap<String, usize>,
    #[serde(skip)]
    by_simulator_pin_lower: HashMap<String, usize>,
    /// lower-cased neutral names and aliases
    #[serde(skip)]
    by_neutral_pin: HashMap<String, usize>,
}

impl CatalogEntry {
    /// Pin by simulator name, exact match first, then case-insensitive.
    pub fn pin_by_simulator_name(&self, name: &str) -> Option<&PinEntry> {
        self.by_simulator_pin
            .get(name)
            .or_else(|| self.by_simulator_pin_lower.get(&name.to_lowercase()))
            .map(|&idx| &self.pins[idx])
    }

    /// Pin by neutral name or any declared alias (case-insensitive).
    pub fn pin_by_neutral_name(&self, name: &str) -> Option<&PinEntry> {
        self.by_neutral_pin
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.pins[idx])
    }

    /// Every lower-cased neutral pin name and alias this type accepts.
    pub fn accepted_pin_names(&self) -> impl Iterator<Item = &str> {
        self.by_neutral_pin.keys().map(|k| k.as_str())
    }

    pub fn is_breadboard(&self) -> bool {
        self.neutral_type == "breadboard"
    }
}

/// Immutable lookup tables derived from the catalog source.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_simulator: HashMap<String, usize>,
    /// lower-cased canonical names and aliases
    by_alias: HashMap<String, usize>,
}

static SHARED: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Process-wide catalog, built on first use from `SHDFKIT_CATALOG` or
    /// the embedded source.
    pub fn shared() -> &'static Catalog {
        SHARED.get_or_init(Catalog::from_env_or_builtin)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, component_type: &ComponentType) -> Option<&CatalogEntry> {
        self.lookup_alias(component_type.as_str())
    }

    /// Entry for a canonical type or alias, ignoring case and surrounding whitespace.
    pub fn lookup_alias(&self, name: &str) -> Option<&CatalogEntry> {
        self.by_alias
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    pub fn entry_for_simulator_type(&self, simulator_type: &str) -> Option<&CatalogEntry> {
        self.by_simulator
            .get(simulator_type)
            .map(|&idx| &self.entries[idx])
    }

    /// Every accepted type string: canonical names plus aliases, lower-cased.
    pub fn component_types(&self) -> BTreeSet<String> {
        self.by_alias.keys().cloned().collect()
    }
}

/// Build the lookup tables from catalog source records.
///
/// Neutral pin names are derived here, once. Records that would break the
/// uniqueness invariants (repeated neutral or simulator type, repeated pin
/// names within a type) are dropped with a warning; the first one wins.
pub fn build_catalog(source: Vec<ModuleRecord>) -> Catalog {
    let mut catalog = Catalog::default();

    for record in source {
        let simulator_type = record.simulator_type.trim().to_string();
        let neutral_type = record.neutral_type.trim().to_lowercase();
        if simulator_type.is_empty() || neutral_type.is_empty() {
            tracing::warn!("Skipping catalog record without simulator or neutral type: {:?}", record);
            continue;
        }
        if catalog.by_alias.contains_key(&neutral_type) {
            tracing::warn!("Duplicate neutral type '{}' in catalog source; keeping the first", neutral_type);
            continue;
        }
        if catalog.by_simulator.contains_key(&simulator_type) {
            tracing::warn!("Duplicate simulator type '{}' in catalog source; keeping the first", simulator_type);
            continue;
        }

        let entry = build_entry(simulator_type, neutral_type, &record);
        let idx = catalog.entries.len();

        catalog.by_simulator.insert(entry.simulator_type.clone(), idx);
        catalog.by_alias.insert(entry.neutral_type.as_str().to_string(), idx);
        for alias in &entry.neutral_type_aliases {
            if let Some(&other) = catalog.by_alias.get(alias) {
                if other != idx {
                    tracing::warn!(
                        "Type alias '{}' already maps to '{}'; ignoring it for '{}'",
                        alias,
                        catalog.entries[other].neutral_type,
                        entry.neutral_type
                    );
                }
                continue;
            }
            catalog.by_alias.insert(alias.clone(), idx);
        }

        catalog.entries.push(entry);
    }

    tracing::debug!("Catalog built with {} component types", catalog.entries.len());
    catalog
}

fn build_entry(simulator_type: String, neutral_type: String, record: &ModuleRecord) -> CatalogEntry {
    let mut entry = CatalogEntry {
        neutral_type: ComponentType::new(neutral_type),
        neutral_type_aliases: record
            .neutral_type_aliases
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect(),
        simulator_type,
        pins: Vec::new(),
        by_simulator_pin: HashMap::new(),
        by_simulator_pin_lower: HashMap::new(),
        by_neutral_pin: HashMap::new(),
    };

    for pin in &record.pins {
        let simulator_pin = pin.pin_name.trim();
        if simulator_pin.is_empty() {
            continue;
        }
        let neutral_pin = derive_neutral_pin(entry.neutral_type.as_str(), simulator_pin);

        if entry.by_simulator_pin.contains_key(simulator_pin)
            || entry.by_neutral_pin.contains_key(&neutral_pin)
        {
            tracing::warn!(
                "Duplicate pin '{}' ({}) on '{}'; keeping the first",
                simulator_pin,
                neutral_pin,
                entry.neutral_type
            );
            continue;
        }

        let idx = entry.pins.len();
        entry.by_simulator_pin.insert(simulator_pin.to_string(), idx);
        entry
            .by_simulator_pin_lower
            .entry(simulator_pin.to_lowercase())
            .or_insert(idx);
        entry.by_neutral_pin.insert(neutral_pin.clone(), idx);
        entry.pins.push(PinEntry {
            simulator_pin_name: simulator_pin.to_string(),
            neutral_pin_name: neutral_pin,
            neutral_pin_aliases: BTreeSet::new(),
            description: pin.description.clone(),
        });
    }

    // Aliases go in after every canonical pin name so an alias can never
    // shadow another pin.
    for (record_pin, idx) in record
        .pins
        .iter()
        .filter_map(|p| entry.by_simulator_pin.get(p.pin_name.trim()).map(|&i| (p, i)))
        .collect::<Vec<_>>()
    {
        for alias in &record_pin.pin_aliases {
            let alias = alias.trim().to_lowercase();
            if alias.is_empty() {
                continue;
            }
            match entry.by_neutral_pin.get(&alias) {
                Some(&existing) if existing != idx => {
                    tracing::debug!(
                        "Pin alias '{}' on '{}' already names '{}'",
                        alias,
                        entry.neutral_type,
                        entry.pins[existing].neutral_pin_name
                    );
                }
                Some(_) => {
                    entry.pins[idx].neutral_pin_aliases.insert(alias);
                }
                None => {
                    entry.by_neutral_pin.insert(alias.clone(), idx);
                    entry.pins[idx].neutral_pin_aliases.insert(alias);
                }
            }
        }
    }

    entry
}
