//! Catalog source records
//!
//! Shape of the `module_info.json` document. Field names from the Wokwi
//! benchmark (`wokwi_type`, `shdf_type`, ...) are accepted as aliases.

use serde::{Deserialize, Serialize};

/// One supported hardware part as described in the catalog source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Simulator part type (e.g. "wokwi-resistor")
    #[serde(default, alias = "wokwi_type")]
    pub simulator_type: String,

    /// Canonical neutral type (e.g. "resistor"); lower-cased on load
    #[serde(default, alias = "shdf_type")]
    pub neutral_type: String,

    #[serde(default, alias = "shdf_type_aliases")]
    pub neutral_type_aliases: Vec<String>,

    #[serde(default)]
    pub pins: Vec<PinRecord>,
}

/// A pin as named by the simulator, with optional neutral-side aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinRecord {
    #[serde(default)]
    pub pin_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub pin_aliases: Vec<String>,
}

impl ModuleRecord {
    pub fn new(simulator_type: &str, neutral_type: &str) -> Self {
        Self {
            simulator_type: simulator_type.to_string(),
            neutral_type: neutral_type.to_string(),
            ..Default::default()
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.neutral_type_aliases = aliases.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_pin(mut self, pin_name: &str, aliases: &[&str]) -> Self {
        self.pins.push(PinRecord {
            pin_name: pin_name.to_string(),
            description: String::new(),
            pin_aliases: aliases.iter().map(|a| a.to_string()).collect(),
        });
        self
    }
}
