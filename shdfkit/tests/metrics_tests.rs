//! Tests for circuit quality metrics

use std::path::PathBuf;

use serde_json::json;
use shdfkit::metrics::{
    check_component_attrs, check_direct_connections, check_duplicate_connections,
    check_endpoint_conflicts, check_unused_components,
};
use shdfkit::prelude::*;
use shdfkit::Component;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn document(components: &[(&str, &str)], connections: &[(&str, &str)]) -> ShdfDocument {
    let mut doc = ShdfDocument::new();
    for (id, component_type) in components {
        doc.add_component(Component::new(id, component_type));
    }
    for (a, b) in connections {
        doc.connect(*a, *b);
    }
    doc
}

#[test]
fn test_duplicates_are_order_independent() {
    let doc = document(&[], &[("a.x", "b.y"), ("b.y", "a.x")]);
    let result = check_duplicate_connections(&doc);
    assert_eq!(result.duplicate_connections, 1);
    assert_eq!(result.duplicate_connection_list[0].index, 1);
}

#[test]
fn test_three_way_endpoint_conflict() {
    let doc = document(
        &[],
        &[
            ("led1.anode", "r1.pin2"),
            ("led1.anode", "uno.pin13"),
            ("btn1.pin1", "led1.anode"),
        ],
    );
    let result = check_endpoint_conflicts(&doc);
    assert_eq!(result.endpoint_conflicts, 1);
    assert_eq!(result.conflict_endpoints[0].endpoint, "led1.anode");
    assert_eq!(result.conflict_endpoints[0].connection_indices, vec![0, 1, 2]);
    assert_eq!(result.conflict_endpoints[0].connection_count, 3);
}

#[test]
fn test_unused_component() {
    let doc = document(
        &[("led1", "led"), ("r1", "resistor")],
        &[("led1.anode", "arduino1.pin13")],
    );
    let result = check_unused_components(&doc);
    assert_eq!(result.unused_components, 1);
    assert_eq!(result.unused_component_list[0].id, "r1");
}

#[test]
fn test_direct_connection_percentage() {
    let mut connections = vec![("uno.pin13", "led1.a"), ("led1.c", "uno.gnd1")];
    let holes: Vec<String> = (1..=8).map(|c| format!("breadboard.{}a", c)).collect();
    for hole in &holes {
        connections.push(("r1.pin1", hole.as_str()));
    }
    let doc = document(&[], &connections);

    let result = check_direct_connections(&doc);
    assert_eq!(result.direct_connections, 2);
    assert_eq!(result.breadboard_connections, 8);
    assert_eq!(result.direct_connection_percentage, 20.0);
    assert_eq!(result.breadboard_connection_percentage, 80.0);
}

#[test]
fn test_converted_resistor_matches_reference() {
    let core = ShdfKitCore::new();
    let generated = core
        .convert_file_to_neutral(&fixture_path("blink_diagram.json"), &ConvertOptions::logical())
        .unwrap()
        .document;
    let reference = shdfkit::read_json(&fixture_path("reference.json")).unwrap();
    let reference = shdfkit::parse_shdf(&reference).unwrap();

    let attrs = check_component_attrs(&generated, &reference, None);
    assert_eq!(attrs.incorrect_attrs, 0, "{:?}", attrs.incorrect_attrs_list);

    let mut wrong = generated.clone();
    wrong.components.retain(|c| c.id != "r1");
    wrong.add_component(Component::new("r1", "resistor").with_property("value", "220"));
    let attrs = check_component_attrs(&wrong, &reference, None);
    assert_eq!(attrs.incorrect_attrs, 1);
    assert_eq!(attrs.incorrect_attrs_list[0].generated_value, "220");
    assert_eq!(attrs.incorrect_attrs_list[0].reference_value, "4700 ohm");
}

#[test]
fn test_led_color_checked_only_in_traffic_light_scenario() {
    let generated = ShdfDocument {
        components: vec![Component::new("led1", "led").with_property("color", "green")],
        connections: vec![],
    };
    let reference = ShdfDocument {
        components: vec![Component::new("led1", "LED").with_property("color", "Red")],
        connections: vec![],
    };

    assert_eq!(check_component_attrs(&generated, &reference, None).incorrect_attrs, 0);
    assert_eq!(
        check_component_attrs(&generated, &reference, Some("benchmarks/traffic_light")).incorrect_attrs,
        1
    );
}

#[test]
fn test_evaluate_files_in_physical_mode() {
    let core = ShdfKitCore::new();
    let evaluation = core
        .evaluate_files(
            &fixture_path("blink_breadboard.json"),
            Some(&fixture_path("reference.json")),
            &EvaluationOptions::new(Mode::Physical),
        )
        .unwrap();
    let metrics = &evaluation.metrics;

    assert_eq!(metrics.duplicate_connections.duplicate_connections, 0);
    assert_eq!(metrics.unused_components.unused_components, 0);
    let direct = metrics.direct_connections.as_ref().unwrap();
    assert_eq!(direct.direct_connections, 0);
    assert_eq!(direct.breadboard_connections, 7);
    assert_eq!(direct.breadboard_connection_percentage, 100.0);

    // the reference has no breadboard component
    let comparison = metrics.unnecessary_components.as_ref().unwrap();
    assert_eq!(comparison.unnecessary_components, 1);
    assert_eq!(comparison.unnecessary_component_list[0].component_type, "breadboard");
    assert_eq!(comparison.missing_components, 0);
    // 4700 against "4700 ohm"
    assert_eq!(metrics.component_attrs.as_ref().unwrap().incorrect_attrs, 0);

    // uno.pin13 and r1.pin1 share strip 10 top
    assert_eq!(metrics.electrical_nets.shorted_nets, 0);
    assert!(metrics
        .electrical_nets
        .nets
        .iter()
        .any(|n| n.pins == vec!["r1.pin1".to_string(), "uno.pin13".to_string()]));
}

#[test]
fn test_evaluate_json_rejects_malformed_reference() {
    let core = ShdfKitCore::new();
    let result = core.evaluate_json(
        &json!({ "components": [], "connections": [] }),
        Some(&json!({ "components": [] })),
        &EvaluationOptions::default(),
    );
    assert!(matches!(result, Err(ShdfKitError::Structural(_))));
}
