use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{debug, warn};

use super::layout::{position_for, wire_color};
use super::{
    coerce_resistor_value, ConvertError, ConvertOptions, Conversion, Mode, FOUR_DIGIT_PREFIX,
    SIMULATOR_ATTR_KEYS,
};
use crate::catalog::Catalog;
use crate::diagnostics::{rules, Issue};
use crate::document::{Component, Endpoint, ShdfDocument, WokwiConnection, WokwiDiagram, WokwiPart};
use crate::mapping::breadboard::{BreadboardAddress, BREADBOARD_ID};
use crate::mapping::{resolve_neutral_type, simulator_pin, simulator_type_of, TypeResolution};

/// Metadata stamped on generated diagrams.
pub const GENERATED_AUTHOR: &str = "shdfkit";
pub const GENERATED_EDITOR: &str = "wokwi";

enum Declared {
    Breadboard,
    Component { neutral_type: String, resolved: bool },
    Skipped,
}

/// Convert an SHDF document to a Wokwi diagram.
///
/// Parts are placed with [`position_for`] and wires coloured with
/// [`wire_color`]. In logical mode breadboard components and any wire that
/// touches the breadboard are left out.
pub fn to_simulator(
    catalog: &Catalog,
    document: &ShdfDocument,
    options: &ConvertOptions,
) -> Result<Conversion<WokwiDiagram>, ConvertError> {
    let mut issues = Vec::new();
    let mut diagram = WokwiDiagram {
        author: GENERATED_AUTHOR.to_string(),
        editor: GENERATED_EDITOR.to_string(),
        ..WokwiDiagram::default()
    };
    let mut declared: HashMap<&str, Declared> = HashMap::new();
    let mut breadboard_part: Option<&str> = None;

    for (index, component) in document.components.iter().enumerate() {
        if component.component_type.trim().is_empty() {
            issues.push(
                Issue::warning(
                    rules::MISSING_TYPE,
                    format!("Component '{}' has no type and was skipped", component.id),
                )
                .with_component(&component.id),
            );
            declared.insert(&component.id, Declared::Skipped);
            continue;
        }

        let (simulator_type, resolved) = match simulator_type_of(catalog, &component.component_type) {
            TypeResolution::Catalog(simulator_type) => (simulator_type, true),
            TypeResolution::Synthesized(simulator_type) => {
                if !options.synthesize_unknown_types {
                    warn!(component = %component.id, component_type = %component.component_type, "skipping component with unknown type");
                    issues.push(
                        Issue::warning(
                            rules::UNKNOWN_TYPE,
                            format!(
                                "Component '{}' has unknown type '{}' and was skipped",
                                component.id, component.component_type
                            ),
                        )
                        .with_component(&component.id),
                    );
                    declared.insert(&component.id, Declared::Skipped);
                    continue;
                }
                issues.push(
                    Issue::warning(
                        rules::UNKNOWN_TYPE,
                        format!(
                            "Component '{}' has unknown type '{}', emitted as '{}'",
                            component.id, component.component_type, simulator_type
                        ),
                    )
                    .with_component(&component.id),
                );
                (simulator_type, false)
            }
        };

        let neutral_type = match resolve_neutral_type(catalog, &component.component_type) {
            Ok(component_type) => component_type.as_str().to_string(),
            Err(_) => component.component_type.trim().to_lowercase(),
        };

        if resolved && catalog.lookup_alias(&neutral_type).is_some_and(|e| e.is_breadboard()) {
            declared.insert(&component.id, Declared::Breadboard);
            if options.mode == Mode::Logical {
                debug!(component = %component.id, "skipping breadboard in logical mode");
                continue;
            }
            if breadboard_part.is_some() {
                issues.push(
                    Issue::warning(
                        rules::DUPLICATE_BREADBOARD,
                        format!("Additional breadboard '{}' ignored", component.id),
                    )
                    .with_component(&component.id),
                );
                continue;
            }
            breadboard_part = Some(component.id.as_str());
        } else {
            declared.insert(
                &component.id,
                Declared::Component {
                    neutral_type: neutral_type.clone(),
                    resolved,
                },
            );
        }

        let mut attrs = carry_attrs(component, &neutral_type, &mut issues)?;
        let part_type = match simulator_type.strip_prefix(FOUR_DIGIT_PREFIX) {
            Some(base) => {
                attrs.insert("digits".to_string(), Value::String("4".to_string()));
                base.to_string()
            }
            None => simulator_type,
        };

        let placement = position_for(&part_type, index, options.mode);
        diagram.parts.push(WokwiPart {
            part_type,
            id: component.id.clone(),
            position: placement.position,
            rotate: placement.rotate,
            attrs,
        });
    }

    let breadboard_part = breadboard_part.unwrap_or(BREADBOARD_ID);

    for (index, connection) in document.connections.iter().enumerate() {
        let from = Endpoint::parse(&connection.from);
        let to = Endpoint::parse(&connection.to);

        if options.mode == Mode::Logical {
            let touches = |e: &Endpoint<'_>| match e {
                Endpoint::Breadboard(_) => true,
                Endpoint::Pin { component, .. } => matches!(declared.get(component), Some(Declared::Breadboard)),
                Endpoint::Malformed(_) => false,
            };
            match (touches(&from), touches(&to)) {
                (true, true) => {
                    debug!(index, "skipping breadboard-only connection");
                    continue;
                }
                (true, false) | (false, true) => {
                    issues.push(Issue::info(
                        rules::LOGICAL_FILTER,
                        format!(
                            "Connection {} ('{}' - '{}') runs through the breadboard and was dropped",
                            index, connection.from, connection.to
                        ),
                    ));
                    continue;
                }
                (false, false) => {}
            }
        }

        let context = EndpointContext {
            catalog,
            declared: &declared,
            breadboard_part,
            index,
        };
        let translated = context
            .translate(&from, &mut issues)
            .zip(context.translate(&to, &mut issues));
        if let Some((from_wokwi, to_wokwi)) = translated {
            let color = wire_color(&connection.from, &connection.to);
            diagram
                .connections
                .push(WokwiConnection::new(from_wokwi, to_wokwi, color));
        }
    }

    debug!(
        parts = diagram.parts.len(),
        connections = diagram.connections.len(),
        issues = issues.len(),
        mode = %options.mode,
        "converted SHDF to diagram"
    );
    Ok(Conversion {
        document: diagram,
        issues,
    })
}

fn carry_attrs(
    component: &Component,
    neutral_type: &str,
    issues: &mut Vec<Issue>,
) -> Result<BTreeMap<String, Value>, ConvertError> {
    let mut attrs = BTreeMap::new();
    for (key, value) in &component.properties {
        let value = if key == "value" && neutral_type == "resistor" {
            coerce_resistor_value(&component.id, value)?
        } else if SIMULATOR_ATTR_KEYS.contains(&key.as_str()) {
            value.clone()
        } else {
            issues.push(
                Issue::info(
                    rules::DROPPED_PROPERTY,
                    format!("Property '{}' of '{}' has no Wokwi attribute", key, component.id),
                )
                .with_component(&component.id),
            );
            continue;
        };
        attrs.insert(key.clone(), Value::String(value));
    }
    Ok(attrs)
}

struct EndpointContext<'a> {
    catalog: &'a Catalog,
    declared: &'a HashMap<&'a str, Declared>,
    breadboard_part: &'a str,
    index: usize,
}

impl EndpointContext<'_> {
    fn breadboard_cell(&self, position: &str, issues: &mut Vec<Issue>) -> Option<String> {
        let address = BreadboardAddress::parse_neutral(position)
            .and_then(|address| address.validate_column().map(|_| address));
        match address {
            Ok(address) => Some(format!("{}:{}", self.breadboard_part, address.to_simulator())),
            Err(e) => {
                issues.push(Issue::warning(
                    rules::BREADBOARD_ADDRESS,
                    format!("Connection {} dropped: {}", self.index, e),
                ));
                None
            }
        }
    }

    fn translate(&self, endpoint: &Endpoint<'_>, issues: &mut Vec<Issue>) -> Option<String> {
        match *endpoint {
            Endpoint::Breadboard(position) => self.breadboard_cell(position, issues),
            Endpoint::Pin { component, pin } => match self.declared.get(component) {
                Some(Declared::Component { neutral_type, resolved }) => {
                    let simulator = if *resolved {
                        simulator_pin(self.catalog, pin, neutral_type).unwrap_or_else(|e| {
                            issues.push(Issue::warning(rules::UNKNOWN_PIN, e.to_string()).with_component(component));
                            pin.to_string()
                        })
                    } else {
                        pin.to_string()
                    };
                    Some(format!("{}:{}", component, simulator))
                }
                // `<breadboard id>.<position>` names a cell of that breadboard
                Some(Declared::Breadboard) => self.breadboard_cell(pin, issues),
                Some(Declared::Skipped) => {
                    issues.push(
                        Issue::warning(
                            rules::DANGLING_ENDPOINT,
                            format!("Connection {} dropped: component '{}' was skipped", self.index, component),
                        )
                        .with_component(component),
                    );
                    None
                }
                None => {
                    issues.push(
                        Issue::warning(
                            rules::DANGLING_ENDPOINT,
                            format!(
                                "Connection {} dropped: component '{}' is not declared",
                                self.index, component
                            ),
                        )
                        .with_component(component),
                    );
                    None
                }
            },
            Endpoint::Malformed(text) => {
                issues.push(Issue::warning(
                    rules::DANGLING_ENDPOINT,
                    format!(
                        "Connection {} dropped: endpoint '{}' is not '<component>.<pin>'",
                        self.index, text
                    ),
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Connection;

    fn blink() -> ShdfDocument {
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("uno1", "Arduino"));
        doc.add_component(Component::new("led1", "LED").with_property("color", "red"));
        doc.add_component(Component::new("r1", "resistor").with_property("value", "220 ohm"));
        doc.connect("uno1.pin13", "r1.pin1");
        doc.connect("r1.pin2", "led1.anode");
        doc.connect("led1.cathode", "uno1.gnd");
        doc
    }

    #[test]
    fn test_blink_circuit() {
        let catalog = Catalog::builtin();
        let result = to_simulator(&catalog, &blink(), &ConvertOptions::logical()).unwrap();
        assert!(result.issues.is_empty(), "{:?}", result.issues);

        let diagram = result.document;
        assert_eq!(diagram.author, GENERATED_AUTHOR);
        assert_eq!(diagram.parts[0].part_type, "wokwi-arduino-uno");
        assert_eq!(diagram.parts[1].attr("color").as_deref(), Some("red"));
        assert_eq!(diagram.parts[2].attr("value").as_deref(), Some("220"));
        assert_eq!(diagram.parts[2].rotate, Some(90.0));

        let wires: Vec<(&str, &str, &str)> = diagram
            .connections
            .iter()
            .map(|c| (c.from.as_str(), c.to.as_str(), c.color.as_str()))
            .collect();
        assert_eq!(wires[1], ("r1:2", "led1:A", "green"));
        assert_eq!(wires[2], ("led1:C", "uno1:GND.1", "black"));
        assert_eq!(wires[0].0, "uno1:13");
    }

    #[test]
    fn test_physical_breadboard_cells() {
        let catalog = Catalog::builtin();
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("breadboard", "breadboard"));
        doc.add_component(Component::new("led1", "led"));
        doc.connect("led1.a", "breadboard.10a");
        doc.connect("breadboard.10f", "breadboard.1tn");

        let diagram = to_simulator(&catalog, &doc, &ConvertOptions::physical())
            .unwrap()
            .document;
        assert_eq!(diagram.parts[0].part_type, "wokwi-breadboard");
        assert_eq!(diagram.connections[0].to, "breadboard:10t.a");
        assert_eq!(diagram.connections[1].from, "breadboard:10b.f");
        assert_eq!(diagram.connections[1].to, "breadboard:tn.1");
    }

    #[test]
    fn test_out_of_range_column_dropped() {
        let catalog = Catalog::builtin();
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("led1", "led"));
        doc.connect("led1.a", "breadboard.61a");
        let result = to_simulator(&catalog, &doc, &ConvertOptions::physical()).unwrap();
        assert!(result.document.connections.is_empty());
        assert_eq!(result.issues[0].rule_id, rules::BREADBOARD_ADDRESS);
    }

    #[test]
    fn test_unknown_type_and_dangling_connection() {
        let catalog = Catalog::builtin();
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("led1", "led"));
        doc.add_component(Component::new("x1", "flux capacitor"));
        doc.connect("led1.a", "x1.in");
        doc.connect("led1.c", "ghost1.gnd");

        let result = to_simulator(&catalog, &doc, &ConvertOptions::logical()).unwrap();
        assert_eq!(result.document.parts.len(), 1);
        assert!(result.document.connections.is_empty());
        let rules_hit: Vec<&str> = result.issues.iter().map(|i| i.rule_id.as_str()).collect();
        assert_eq!(
            rules_hit,
            vec![rules::UNKNOWN_TYPE, rules::DANGLING_ENDPOINT, rules::DANGLING_ENDPOINT]
        );

        let kept = to_simulator(&catalog, &doc, &ConvertOptions::logical().with_synthesized_types()).unwrap();
        assert_eq!(kept.document.parts[1].part_type, "wokwi-flux-capacitor");
        assert_eq!(kept.document.connections[0].to, "x1:in");
    }

    #[test]
    fn test_bad_resistor_value_aborts() {
        let catalog = Catalog::builtin();
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("r1", "resistor").with_property("value", "very high"));
        assert!(matches!(
            to_simulator(&catalog, &doc, &ConvertOptions::logical()),
            Err(ConvertError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_four_digit_display_gets_digits_attr() {
        let catalog = Catalog::builtin();
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("disp1", "4-digit 7-segment display"));
        let part = &to_simulator(&catalog, &doc, &ConvertOptions::logical())
            .unwrap()
            .document
            .parts[0];
        assert_eq!(part.part_type, "wokwi-7segment");
        assert_eq!(part.attr("digits").as_deref(), Some("4"));
    }

    #[test]
    fn test_unknown_pin_kept_verbatim() {
        let catalog = Catalog::builtin();
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("led1", "led"));
        doc.add_component(Component::new("uno1", "arduino uno"));
        doc.connections.push(Connection::new("led1.gate", "uno1.pin13"));
        let result = to_simulator(&catalog, &doc, &ConvertOptions::logical()).unwrap();
        assert_eq!(result.document.connections[0].from, "led1:gate");
        assert_eq!(result.issues[0].rule_id, rules::UNKNOWN_PIN);
    }
}
