//! Document models
//!
//! - [`shdf`]: the neutral Standardized Hardware Description Format
//! - [`wokwi`]: the Wokwi simulator `diagram.json` format
//! - [`endpoint`]: parsed view of an SHDF connection endpoint

pub mod endpoint;
pub mod shdf;
pub mod wokwi;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use endpoint::Endpoint;
pub use shdf::{Component, Connection, ShdfDocument};
pub use wokwi::{Position, WokwiConnection, WokwiDiagram, WokwiPart};

/// Text form of a JSON scalar; `None` for null, arrays and objects.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Property maps written by hand or by a generator often carry numbers
/// (`"value": 220`); keep their text form and drop nulls.
pub(crate) fn deserialize_string_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let mut properties = BTreeMap::new();
    for (key, value) in raw {
        match value {
            Value::Null => {}
            Value::Array(_) | Value::Object(_) => {
                return Err(serde::de::Error::custom(format!(
                    "property '{}' must be a string, number or boolean",
                    key
                )));
            }
            scalar => {
                if let Some(text) = scalar_to_string(&scalar) {
                    properties.insert(key, text);
                }
            }
        }
    }
    Ok(properties)
}
