//! Standardized Hardware Description Format (SHDF) Data Types
//!
//! ```json
//! {
//!   "components": [
//!     { "id": "uno1", "type": "arduino uno" },
//!     { "id": "led1", "type": "led", "properties": { "color": "red" } }
//!   ],
//!   "connections": [["uno1.pin13", "led1.a"], ["led1.c", "uno1.gnd1"]]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::deserialize_string_map;
use super::endpoint::component_prefix;

/// A neutral circuit description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShdfDocument {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: String,

    /// Neutral type or any alias the catalog resolves
    #[serde(rename = "type")]
    pub component_type: String,

    #[serde(
        default,
        deserialize_with = "deserialize_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub properties: BTreeMap<String, String>,
}

impl Component {
    pub fn new(id: &str, component_type: &str) -> Self {
        Self {
            id: id.to_string(),
            component_type: component_type.to_string(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|v| v.as_str())
    }
}

/// A wire between exactly two endpoints. Serialized as a two-element array;
/// the legacy `{"endpoints": [..]}` object form is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConnection", into = "[String; 2]")]
pub struct Connection {
    pub from: String,
    pub to: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConnection {
    Pair(Vec<String>),
    Object { endpoints: Vec<String> },
}

impl TryFrom<RawConnection> for Connection {
    type Error = String;

    fn try_from(raw: RawConnection) -> Result<Self, Self::Error> {
        let endpoints = match raw {
            RawConnection::Pair(endpoints) | RawConnection::Object { endpoints } => endpoints,
        };
        match <[String; 2]>::try_from(endpoints) {
            Ok([from, to]) => Ok(Connection { from, to }),
            Err(endpoints) => Err(format!(
                "connection must have exactly 2 endpoints, found {}",
                endpoints.len()
            )),
        }
    }
}

impl From<Connection> for [String; 2] {
    fn from(connection: Connection) -> Self {
        [connection.from, connection.to]
    }
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn endpoints(&self) -> [&str; 2] {
        [&self.from, &self.to]
    }

    /// Endpoints in sorted order; wires are undirected.
    pub fn unordered_key(&self) -> (&str, &str) {
        if self.from <= self.to {
            (&self.from, &self.to)
        } else {
            (&self.to, &self.from)
        }
    }
}

impl ShdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn connect(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.connections.push(Connection::new(from, to));
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Component ids referenced by connection endpoints, in first-seen order.
    pub fn referenced_ids(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for connection in &self.connections {
            for endpoint in connection.endpoints() {
                if let Some(id) = component_prefix(endpoint) {
                    if !seen.contains(&id) {
                        seen.push(id);
                    }
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "components": [
                { "id": "r1", "type": "Resistor", "properties": { "value": 220, "note": null } },
                { "id": "led1", "type": "led" }
            ],
            "connections": [["r1.pin2", "led1.a"], { "endpoints": ["led1.c", "uno1.gnd1"] }]
        }"#;
        let doc = ShdfDocument::from_json_str(json).unwrap();
        assert_eq!(doc.components.len(), 2);
        assert_eq!(doc.components[0].property("value"), Some("220"));
        assert_eq!(doc.components[0].property("note"), None);
        assert_eq!(doc.connections[1], Connection::new("led1.c", "uno1.gnd1"));
    }

    #[test]
    fn test_connection_arity() {
        let err = serde_json::from_str::<Connection>(r#"["a.x", "b.y", "c.z"]"#).unwrap_err();
        assert!(err.to_string().contains("exactly 2 endpoints"));
        assert!(serde_json::from_str::<Connection>(r#"["a.x"]"#).is_err());
    }

    #[test]
    fn test_missing_connections_field() {
        assert!(ShdfDocument::from_json_str(r#"{ "components": [] }"#).is_err());
    }

    #[test]
    fn test_connection_serializes_as_pair() {
        let json = serde_json::to_string(&Connection::new("a.x", "b.y")).unwrap();
        assert_eq!(json, r#"["a.x","b.y"]"#);
    }

    #[test]
    fn test_unordered_key() {
        let ab = Connection::new("a.x", "b.y");
        let ba = Connection::new("b.y", "a.x");
        assert_eq!(ab.unordered_key(), ba.unordered_key());
    }

    #[test]
    fn test_referenced_ids() {
        let mut doc = ShdfDocument::new();
        doc.connect("led1.a", "uno1.pin13");
        doc.connect("led1.c", "breadboard.10a");
        assert_eq!(doc.referenced_ids(), vec!["led1", "uno1", "breadboard"]);
    }
}
