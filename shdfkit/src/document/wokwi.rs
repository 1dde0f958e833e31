//! Wokwi `diagram.json` model.
//!
//! Connections are positional arrays, `[from, to, color, routing]`, with
//! `<part id>:<pin>` endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::scalar_to_string;

pub const DEFAULT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DEFAULT_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WokwiDiagram {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub editor: String,

    pub parts: Vec<WokwiPart>,

    #[serde(default)]
    pub connections: Vec<WokwiConnection>,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub dependencies: Map<String, Value>,
}

impl Default for WokwiDiagram {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
            author: String::new(),
            editor: String::new(),
            parts: Vec::new(),
            connections: Vec::new(),
            dependencies: Map::new(),
        }
    }
}

impl WokwiDiagram {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn part(&self, id: &str) -> Option<&WokwiPart> {
        self.parts.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WokwiPart {
    #[serde(rename = "type")]
    pub part_type: String,

    pub id: String,

    #[serde(flatten)]
    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,

    #[serde(default)]
    pub attrs: BTreeMap<String, Value>,
}

impl WokwiPart {
    pub fn new(id: &str, part_type: &str) -> Self {
        Self {
            part_type: part_type.to_string(),
            id: id.to_string(),
            position: Position::default(),
            rotate: None,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Attribute as text; numbers and booleans are stringified.
    pub fn attr(&self, key: &str) -> Option<String> {
        self.attrs.get(key).and_then(scalar_to_string)
    }
}

/// One wire. Only the two endpoints are required on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Value")]
pub struct WokwiConnection {
    pub from: String,
    pub to: String,
    pub color: String,
    pub routing: Vec<String>,
}

impl WokwiConnection {
    pub fn new(from: impl Into<String>, to: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            color: color.into(),
            routing: Vec::new(),
        }
    }
}

impl TryFrom<Vec<Value>> for WokwiConnection {
    type Error = String;

    fn try_from(items: Vec<Value>) -> Result<Self, Self::Error> {
        let mut items = items.into_iter();
        let from = items.next();
        let to = items.next();
        let (from, to) = match (from, to) {
            (Some(Value::String(from)), Some(Value::String(to))) => (from, to),
            _ => return Err("connection must start with two endpoint strings".to_string()),
        };

        let color = match items.next() {
            Some(Value::String(color)) => color,
            _ => String::new(),
        };

        let routing = match items.next() {
            Some(Value::Array(steps)) => steps.iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            from,
            to,
            color,
            routing,
        })
    }
}

impl From<WokwiConnection> for Value {
    fn from(connection: WokwiConnection) -> Self {
        Value::Array(vec![
            Value::String(connection.from),
            Value::String(connection.to),
            Value::String(connection.color),
            Value::Array(connection.routing.into_iter().map(Value::String).collect()),
        ])
    }
}

/// Split `<part id>:<pin>`.
pub fn split_endpoint(endpoint: &str) -> Option<(&str, &str)> {
    endpoint.split_once(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = r#"{
        "version": 1,
        "author": "Anonymous maker",
        "editor": "wokwi",
        "parts": [
            { "type": "wokwi-arduino-uno", "id": "uno", "top": 200, "left": 20, "attrs": {} },
            { "type": "wokwi-resistor", "id": "r1", "top": 100, "left": 150, "rotate": 90,
              "attrs": { "value": "220" } },
            { "type": "wokwi-7segment", "id": "sevseg1", "top": 0, "left": 0, "attrs": { "digits": 4 } }
        ],
        "connections": [
            [ "uno:13", "r1:1", "green", [ "v0" ] ],
            [ "r1:2", "uno:GND.1" ]
        ],
        "dependencies": {}
    }"#;

    #[test]
    fn test_parse_diagram() {
        let diagram = WokwiDiagram::from_json_str(DIAGRAM).unwrap();
        assert_eq!(diagram.parts.len(), 3);
        assert_eq!(diagram.parts[0].position.top, 200.0);
        assert_eq!(diagram.parts[1].rotate, Some(90.0));
        assert_eq!(diagram.parts[2].attr("digits").as_deref(), Some("4"));
        assert_eq!(diagram.connections[0].routing, vec!["v0".to_string()]);
        assert_eq!(diagram.connections[1].color, "");
    }

    #[test]
    fn test_short_connection_rejected() {
        let json = r#"{ "parts": [], "connections": [["uno:13"]] }"#;
        let err = WokwiDiagram::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("two endpoint strings"));
    }

    #[test]
    fn test_defaults() {
        let diagram = WokwiDiagram::from_json_str(r#"{ "parts": [] }"#).unwrap();
        assert_eq!(diagram.version, 1);
        assert!(diagram.connections.is_empty());
    }

    #[test]
    fn test_connection_serializes_as_array() {
        let value = serde_json::to_value(WokwiConnection::new("uno:13", "r1:1", "blue")).unwrap();
        assert_eq!(value, serde_json::json!(["uno:13", "r1:1", "blue", []]));
    }

    #[test]
    fn test_split_endpoint() {
        assert_eq!(split_endpoint("bb1:10t.a"), Some(("bb1", "10t.a")));
        assert_eq!(split_endpoint("uno"), None);
    }
}
