//! Integration tests for Wokwi <-> SHDF conversion

use std::collections::HashSet;
use std::path::PathBuf;

use shdfkit::document::Connection;
use shdfkit::mapping::breadboard::{neutral_to_simulator, simulator_to_neutral};
use shdfkit::mapping::resolve_neutral_type;
use shdfkit::prelude::*;
use shdfkit::{to_neutral, to_simulator, ConvertError};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_shdf(name: &str) -> ShdfDocument {
    let text = std::fs::read_to_string(fixture_path(name)).expect("fixture should exist");
    ShdfDocument::from_json_str(&text).expect("fixture should parse")
}

fn unordered_pairs(document: &ShdfDocument) -> HashSet<(String, String)> {
    document
        .connections
        .iter()
        .map(|c| {
            let (a, b) = c.unordered_key();
            (a.to_string(), b.to_string())
        })
        .collect()
}

#[test]
fn test_physical_diagram_to_shdf() {
    let core = ShdfKitCore::new();
    let conversion = core
        .convert_file_to_neutral(&fixture_path("blink_diagram.json"), &ConvertOptions::physical())
        .expect("conversion should succeed");

    assert!(conversion.issues.is_empty(), "unexpected issues: {:?}", conversion.issues);
    assert_eq!(conversion.document, load_shdf("blink_breadboard.json"));
}

#[test]
fn test_logical_conversion_drops_breadboard() {
    let core = ShdfKitCore::new();
    let conversion = core
        .convert_file_to_neutral(&fixture_path("blink_diagram.json"), &ConvertOptions::logical())
        .expect("conversion should succeed");

    let document = &conversion.document;
    assert!(document.component("bb1").is_none());
    assert!(document.component("breadboard").is_none());
    assert_eq!(document.components.len(), 3);
    assert!(document.connections.is_empty());

    // one notice per wire with a single breadboard end; the bb-only wire is silent
    assert_eq!(conversion.issues.len(), 6);
    assert!(!conversion.has_warnings());
}

#[test]
fn test_logical_filtering_breadboard_only_wires() {
    let diagram = WokwiDiagram::from_json_str(
        r#"{
            "parts": [
                { "type": "wokwi-breadboard", "id": "bb1", "attrs": {} },
                { "type": "wokwi-led", "id": "led1", "attrs": {} }
            ],
            "connections": [
                ["bb1:1t.a", "bb1:5t.a", "green", []],
                ["bb1:tp.3", "bb1:20b.j", "red", []]
            ]
        }"#,
    )
    .unwrap();

    let conversion = to_neutral(Catalog::shared(), &diagram, &ConvertOptions::logical()).unwrap();
    assert!(conversion.document.connections.is_empty());
    assert!(conversion.issues.is_empty());
}

#[test]
fn test_logical_round_trip() {
    let catalog = Catalog::shared();
    let original = load_shdf("blink_logical.json");

    let diagram = to_simulator(catalog, &original, &ConvertOptions::logical()).unwrap();
    assert!(diagram.issues.is_empty(), "{:?}", diagram.issues);
    let back = to_neutral(catalog, &diagram.document, &ConvertOptions::logical()).unwrap();
    assert!(back.issues.is_empty(), "{:?}", back.issues);

    assert_eq!(back.document.components, original.components);
    assert_eq!(unordered_pairs(&back.document), unordered_pairs(&original));
}

#[test]
fn test_breadboard_round_trip() {
    let catalog = Catalog::shared();
    let original = load_shdf("blink_breadboard.json");

    let diagram = to_simulator(catalog, &original, &ConvertOptions::physical()).unwrap();
    let wires: Vec<(&str, &str)> = diagram
        .document
        .connections
        .iter()
        .map(|w| (w.from.as_str(), w.to.as_str()))
        .collect();
    assert!(wires.contains(&("uno:13", "breadboard:10t.a")));
    assert!(wires.contains(&("led1:C", "breadboard:tn.16")));
    assert!(wires.contains(&("breadboard:10b.f", "breadboard:12b.f")));

    let back = to_neutral(catalog, &diagram.document, &ConvertOptions::physical()).unwrap();
    assert_eq!(back.document, original);
}

#[test]
fn test_alias_resolution_is_idempotent() {
    let catalog = Catalog::shared();
    for alias in ["Arduino", "uno", "arduino uno", "5mm LED", "led", "Push Button"] {
        let once = resolve_neutral_type(catalog, alias).unwrap();
        let twice = resolve_neutral_type(catalog, once.as_str()).unwrap();
        assert_eq!(once, twice, "alias {alias}");
    }

    let mut document = ShdfDocument::new();
    document.add_component(shdfkit::Component::new("uno", "Arduino"));
    document.add_component(shdfkit::Component::new("led1", "LED"));
    document.connect("uno.d13", "led1.anode");

    let first = to_neutral(
        catalog,
        &to_simulator(catalog, &document, &ConvertOptions::logical()).unwrap().document,
        &ConvertOptions::logical(),
    )
    .unwrap()
    .document;
    assert_eq!(first.connections, vec![Connection::new("uno.pin13", "led1.a")]);
    assert_eq!(first.component("uno").unwrap().component_type, "arduino uno");

    let second = to_neutral(
        catalog,
        &to_simulator(catalog, &first, &ConvertOptions::logical()).unwrap().document,
        &ConvertOptions::logical(),
    )
    .unwrap()
    .document;
    assert_eq!(first, second);
}

#[test]
fn test_breadboard_address_round_trip_and_side() {
    for column in 1..=60 {
        for row in 'a'..='j' {
            let neutral = format!("breadboard.{}{}", column, row);
            let cell = neutral_to_simulator(&neutral).unwrap();
            let side = if row <= 'e' { 't' } else { 'b' };
            assert_eq!(cell, format!("{}{}.{}", column, side, row));
            assert_eq!(simulator_to_neutral(&cell).unwrap(), neutral);
        }
        for rail in ["tp", "tn", "bp", "bn"] {
            let cell = format!("{}.{}", rail, column);
            let neutral = simulator_to_neutral(&cell).unwrap();
            assert_eq!(neutral, format!("breadboard.{}{}", column, rail));
            assert_eq!(neutral_to_simulator(&neutral).unwrap(), cell);
        }
    }
}

#[test]
fn test_resistor_value_normalized() {
    let core = ShdfKitCore::new();
    let conversion = core
        .convert_file_to_neutral(&fixture_path("blink_diagram.json"), &ConvertOptions::logical())
        .unwrap();
    let r1 = conversion.document.component("r1").unwrap();
    assert_eq!(r1.property("value"), Some("4700"));
}

#[test]
fn test_bad_resistor_value_aborts() {
    let mut document = ShdfDocument::new();
    document.add_component(shdfkit::Component::new("r1", "resistor").with_property("value", "warm"));

    let err = to_simulator(Catalog::shared(), &document, &ConvertOptions::logical()).unwrap_err();
    let ConvertError::InvalidAttribute { component, attribute, value, .. } = err;
    assert_eq!(component, "r1");
    assert_eq!(attribute, "value");
    assert_eq!(value, "warm");
}

#[test]
fn test_unknown_types_skipped_or_synthesized() {
    let mut document = ShdfDocument::new();
    document.add_component(shdfkit::Component::new("x1", "flux capacitor"));
    document.add_component(shdfkit::Component::new("led1", "led"));
    document.connect("x1.in", "led1.a");

    let skipped = to_simulator(Catalog::shared(), &document, &ConvertOptions::logical()).unwrap();
    assert_eq!(skipped.document.parts.len(), 1);
    assert!(skipped.document.connections.is_empty());
    assert!(skipped.has_warnings());

    let kept = to_simulator(
        Catalog::shared(),
        &document,
        &ConvertOptions::logical().with_synthesized_types(),
    )
    .unwrap();
    assert_eq!(kept.document.parts.len(), 2);
    assert_eq!(kept.document.parts[0].part_type, "wokwi-flux-capacitor");
    assert_eq!(kept.document.connections.len(), 1);
    assert_eq!(kept.document.connections[0].from, "x1:in");
}

#[test]
fn test_generated_diagram_serializes() {
    let catalog = Catalog::shared();
    let conversion = to_simulator(catalog, &load_shdf("blink_logical.json"), &ConvertOptions::logical()).unwrap();
    let json = conversion.document.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], 1);
    assert_eq!(value["author"], "shdfkit");
    assert_eq!(value["parts"][0]["type"], "wokwi-arduino-uno");
    assert_eq!(value["connections"][2][2], "black");
    assert!(value["connections"][0][3].is_array());
}
