//! Structural conversion between Wokwi diagrams and SHDF documents.
//!
//! Conversion is best effort. Unknown types, unknown pins and bad
//! breadboard cells become [`Issue`]s and the affected item is skipped or
//! passed through; only an uncoercible attribute value aborts.

pub mod layout;
mod to_neutral;
mod to_simulator;
pub mod values;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::diagnostics::Issue;

pub use to_neutral::to_neutral;
pub use to_simulator::to_simulator;
pub use values::{normalize_resistance, ValueError};

/// Attribute keys carried from Wokwi parts into SHDF properties.
pub const NEUTRAL_PROPERTY_KEYS: [&str; 5] = ["color", "value", "label", "frequency", "threshold"];

/// Property keys carried from SHDF components into Wokwi attrs.
pub const SIMULATOR_ATTR_KEYS: [&str; 6] = ["color", "digits", "value", "label", "frequency", "threshold"];

/// Simulator-side key prefix marking the four-digit seven-segment variant.
pub(crate) const FOUR_DIGIT_PREFIX: &str = "4-digit ";
pub(crate) const SEVEN_SEGMENT_TYPE: &str = "wokwi-7segment";

/// Circuit view a conversion works in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Component-to-component wiring only; breadboard routing is dropped.
    #[default]
    Logical,
    /// Breadboard placement and routing included.
    Physical,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Logical => "logical",
            Mode::Physical => "physical",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown mode '{0}', expected 'logical' or 'physical'")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "logical" => Ok(Mode::Logical),
            "physical" => Ok(Mode::Physical),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// Options for a conversion run.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    pub mode: Mode,
    /// Keep components whose type is not in the catalog, under the
    /// synthesized type name, instead of skipping them.
    pub synthesize_unknown_types: bool,
}

impl ConvertOptions {
    pub fn logical() -> Self {
        Self::default()
    }

    pub fn physical() -> Self {
        Self {
            mode: Mode::Physical,
            ..Self::default()
        }
    }

    pub fn with_synthesized_types(mut self) -> Self {
        self.synthesize_unknown_types = true;
        self
    }
}

/// A converted document and the non-fatal findings collected on the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion<T> {
    pub document: T,
    pub issues: Vec<Issue>,
}

impl<T> Conversion<T> {
    pub fn has_warnings(&self) -> bool {
        self.issues.iter().any(Issue::is_warning)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.is_warning())
    }

    /// Warnings as a bullet list, suitable for pasting into a prompt.
    /// Empty when there is nothing to report.
    pub fn advisory_text(&self) -> String {
        self.warnings()
            .map(|issue| format!("- {}", issue.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Component '{component}' has invalid {attribute} '{value}': {source}")]
    InvalidAttribute {
        component: String,
        attribute: String,
        value: String,
        #[source]
        source: ValueError,
    },
}

/// Resistor value as a bare integer, or the fatal conversion error.
pub(crate) fn coerce_resistor_value(component: &str, value: &str) -> Result<String, ConvertError> {
    normalize_resistance(value).map_err(|source| ConvertError::InvalidAttribute {
        component: component.to_string(),
        attribute: "value".to_string(),
        value: value.to_string(),
        source,
    })
}
