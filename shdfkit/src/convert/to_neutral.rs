use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use super::{
    coerce_resistor_value, ConvertError, ConvertOptions, Conversion, Mode, FOUR_DIGIT_PREFIX,
    NEUTRAL_PROPERTY_KEYS, SEVEN_SEGMENT_TYPE,
};
use crate::catalog::{Catalog, ComponentType};
use crate::diagnostics::{rules, Issue};
use crate::document::wokwi::split_endpoint;
use crate::document::{Component, Connection, ShdfDocument, WokwiDiagram, WokwiPart};
use crate::mapping::breadboard::{BreadboardAddress, BREADBOARD_ID};
use crate::mapping::{
    derive_neutral_pin, neutral_pin_for_type, neutral_type_for_simulator, resolve_neutral_type,
    TypeResolution,
};

enum PartKind {
    Breadboard,
    Component {
        neutral_type: String,
        resolved: Option<ComponentType>,
    },
    Skipped,
}

enum SimulatorEndpoint<'a> {
    Breadboard(&'a str),
    Pin { part: &'a str, pin: &'a str },
}

fn is_breadboard_type(catalog: &Catalog, simulator_type: &str) -> bool {
    simulator_type.starts_with("wokwi-breadboard")
        || catalog
            .entry_for_simulator_type(simulator_type)
            .is_some_and(|entry| entry.is_breadboard())
}

/// Catalog key for a part; the four-digit display shares its Wokwi type
/// with the single-digit one and is told apart by `digits`.
fn simulator_lookup_key(part: &WokwiPart) -> String {
    if part.part_type == SEVEN_SEGMENT_TYPE && part.attr("digits").as_deref() == Some("4") {
        format!("{}{}", FOUR_DIGIT_PREFIX, SEVEN_SEGMENT_TYPE)
    } else {
        part.part_type.clone()
    }
}

fn carry_properties(part: &WokwiPart, neutral_type: &str) -> Result<BTreeMap<String, String>, ConvertError> {
    let mut properties = BTreeMap::new();
    for key in part.attrs.keys() {
        let Some(text) = part.attr(key) else {
            debug!(part = %part.id, attr = %key, "dropping non-scalar attribute");
            continue;
        };
        match key.as_str() {
            "color" => {
                properties.insert(key.clone(), text.to_lowercase());
            }
            "value" if neutral_type == "resistor" => {
                properties.insert(key.clone(), coerce_resistor_value(&part.id, &text)?);
            }
            k if NEUTRAL_PROPERTY_KEYS.contains(&k) => {
                properties.insert(key.clone(), text);
            }
            _ => debug!(part = %part.id, attr = %key, "dropping attribute"),
        }
    }
    Ok(properties)
}

fn classify<'a>(endpoint: &'a str, parts: &HashMap<&str, PartKind>) -> Option<SimulatorEndpoint<'a>> {
    let (part, pin) = split_endpoint(endpoint)?;
    let is_breadboard = match parts.get(part) {
        Some(PartKind::Breadboard) => true,
        Some(_) => false,
        None => part.contains(BREADBOARD_ID),
    };
    Some(if is_breadboard {
        SimulatorEndpoint::Breadboard(pin)
    } else {
        SimulatorEndpoint::Pin { part, pin }
    })
}

/// Convert a Wokwi diagram to an SHDF document.
///
/// Component ids are kept as-is. In physical mode the first breadboard part
/// becomes the component `breadboard` and its cells become
/// `breadboard.<col><row>` endpoints.
pub fn to_neutral(
    catalog: &Catalog,
    diagram: &WokwiDiagram,
    options: &ConvertOptions,
) -> Result<Conversion<ShdfDocument>, ConvertError> {
    let mut issues = Vec::new();
    let mut document = ShdfDocument::new();
    let mut parts: HashMap<&str, PartKind> = HashMap::new();
    let mut breadboard_emitted = false;

    for part in &diagram.parts {
        if is_breadboard_type(catalog, &part.part_type) {
            parts.insert(&part.id, PartKind::Breadboard);
            if options.mode == Mode::Logical {
                debug!(part = %part.id, "skipping breadboard in logical mode");
                continue;
            }
            if breadboard_emitted {
                issues.push(
                    Issue::warning(
                        rules::DUPLICATE_BREADBOARD,
                        format!("Breadboard '{}' merged into '{}'", part.id, BREADBOARD_ID),
                    )
                    .with_component(&part.id),
                );
                continue;
            }
            breadboard_emitted = true;
            let neutral_type = neutral_type_for_simulator(catalog, &part.part_type).into_name();
            document.add_component(Component::new(BREADBOARD_ID, &neutral_type));
            continue;
        }

        let key = simulator_lookup_key(part);
        let neutral_type = match neutral_type_for_simulator(catalog, &key) {
            TypeResolution::Catalog(name) => name,
            TypeResolution::Synthesized(name) => {
                if !options.synthesize_unknown_types {
                    warn!(part = %part.id, part_type = %part.part_type, "skipping part with unknown type");
                    issues.push(
                        Issue::warning(
                            rules::UNKNOWN_TYPE,
                            format!(
                                "Component '{}' has unknown type '{}' and was skipped",
                                part.id, part.part_type
                            ),
                        )
                        .with_component(&part.id),
                    );
                    parts.insert(&part.id, PartKind::Skipped);
                    continue;
                }
                issues.push(
                    Issue::warning(
                        rules::UNKNOWN_TYPE,
                        format!(
                            "Component '{}' has unknown type '{}', kept as '{}'",
                            part.id, part.part_type, name
                        ),
                    )
                    .with_component(&part.id),
                );
                name
            }
        };

        let properties = carry_properties(part, &neutral_type)?;
        let resolved = resolve_neutral_type(catalog, &neutral_type).ok();
        document.add_component(Component {
            id: part.id.clone(),
            component_type: neutral_type.clone(),
            properties,
        });
        parts.insert(&part.id, PartKind::Component { neutral_type, resolved });
    }

    for (index, wire) in diagram.connections.iter().enumerate() {
        let (Some(from), Some(to)) = (classify(&wire.from, &parts), classify(&wire.to, &parts)) else {
            issues.push(Issue::warning(
                rules::DANGLING_ENDPOINT,
                format!(
                    "Connection {} ('{}' - '{}') has an endpoint without a part id",
                    index, wire.from, wire.to
                ),
            ));
            continue;
        };

        if options.mode == Mode::Logical {
            match (&from, &to) {
                (SimulatorEndpoint::Breadboard(_), SimulatorEndpoint::Breadboard(_)) => {
                    debug!(index, "skipping breadboard-only wire");
                    continue;
                }
                (SimulatorEndpoint::Breadboard(_), _) | (_, SimulatorEndpoint::Breadboard(_)) => {
                    issues.push(Issue::info(
                        rules::LOGICAL_FILTER,
                        format!(
                            "Connection {} ('{}' - '{}') runs through the breadboard and was dropped",
                            index, wire.from, wire.to
                        ),
                    ));
                    continue;
                }
                _ => {}
            }
        }

        let translated = translate_endpoint(catalog, &from, index, &parts, &mut issues)
            .zip(translate_endpoint(catalog, &to, index, &parts, &mut issues));
        if let Some((from, to)) = translated {
            document.connections.push(Connection::new(from, to));
        }
    }

    debug!(
        components = document.components.len(),
        connections = document.connections.len(),
        issues = issues.len(),
        mode = %options.mode,
        "converted diagram to SHDF"
    );
    Ok(Conversion { document, issues })
}

fn translate_endpoint(
    catalog: &Catalog,
    endpoint: &SimulatorEndpoint<'_>,
    index: usize,
    parts: &HashMap<&str, PartKind>,
    issues: &mut Vec<Issue>,
) -> Option<String> {
    match *endpoint {
        SimulatorEndpoint::Breadboard(cell) => match BreadboardAddress::parse_simulator(cell) {
            Ok(address) => Some(address.to_neutral()),
            Err(e) => {
                issues.push(Issue::warning(
                    rules::BREADBOARD_ADDRESS,
                    format!("Connection {} dropped: {}", index, e),
                ));
                None
            }
        },
        SimulatorEndpoint::Pin { part, pin } => match parts.get(part) {
            Some(PartKind::Component { neutral_type, resolved }) => {
                let neutral = match resolved {
                    Some(component_type) => neutral_pin_for_type(catalog, component_type, pin)
                        .unwrap_or_else(|e| {
                            issues.push(Issue::warning(rules::UNKNOWN_PIN, e.to_string()).with_component(part));
                            pin.to_lowercase()
                        }),
                    None => derive_neutral_pin(neutral_type, pin),
                };
                Some(format!("{}.{}", part, neutral))
            }
            Some(PartKind::Skipped) => {
                issues.push(
                    Issue::warning(
                        rules::DANGLING_ENDPOINT,
                        format!("Connection {} dropped: component '{}' was skipped", index, part),
                    )
                    .with_component(part),
                );
                None
            }
            Some(PartKind::Breadboard) | None => {
                issues.push(
                    Issue::warning(
                        rules::DANGLING_ENDPOINT,
                        format!("Connection {} dropped: part '{}' is not declared", index, part),
                    )
                    .with_component(part),
                );
                None
            }
        },
    }
}
