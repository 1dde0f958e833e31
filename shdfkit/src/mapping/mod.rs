//! Name mapping between the simulator and neutral conventions
//!
//! - [`types`]: component type resolution and fallback name synthesis
//! - [`pins`]: pin name derivation, resolution, and validation pattern sets
//! - [`breadboard`]: breadboard hole and power rail address translation

pub mod breadboard;
pub mod pins;
pub mod types;

use thiserror::Error;

pub use breadboard::{AddressError, BreadboardAddress, BreadboardNode, Rail, Side};
pub use pins::{
    derive_neutral_pin, neutral_pin, neutral_pin_for_type, pin_patterns, simulator_pin,
    PinPatternSet,
};
pub use types::{neutral_type_for_simulator, resolve_neutral_type, simulator_type_of, TypeResolution};

/// Catalog resolution failures. Never fatal: callers record an issue and
/// continue with the original name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("Component type is not in catalog aliases: {0}")]
    UnknownType(String),

    #[error("Pin name '{pin}' is not known for component type '{component_type}'")]
    UnknownPin { component_type: String, pin: String },
}
