//! Component checks: unused parts, reference comparison, attribute values.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::convert::values::{parse_resistance, strip_resistance_text};
use crate::document::endpoint::component_prefix;
use crate::document::{Component, ShdfDocument};

/// Scenario name fragment that enables the LED colour check.
pub const LED_COLOR_SCENARIO: &str = "traffic_light";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnusedComponents {
    pub unused_components: usize,
    pub unused_component_list: Vec<Component>,
}

/// Declared components never named by a connection endpoint.
pub fn check_unused_components(document: &ShdfDocument) -> UnusedComponents {
    let used: HashSet<&str> = document
        .connections
        .iter()
        .flat_map(|c| c.endpoints())
        .filter_map(component_prefix)
        .collect();

    let unused_ids: HashSet<&str> = document
        .components
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| !used.contains(id))
        .collect();

    UnusedComponents {
        unused_components: unused_ids.len(),
        unused_component_list: document
            .components
            .iter()
            .filter(|c| unused_ids.contains(c.id.as_str()))
            .cloned()
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnnecessaryType {
    #[serde(rename = "type")]
    pub component_type: String,
    pub extra_count: usize,
    pub generated_count: usize,
    pub reference_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingType {
    #[serde(rename = "type")]
    pub component_type: String,
    pub missing_count: usize,
    pub generated_count: usize,
    pub reference_count: usize,
}

/// Per-type count differences between a generated and a reference design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceComparison {
    pub unnecessary_components: usize,
    pub unnecessary_component_list: Vec<UnnecessaryType>,
    pub missing_components: usize,
    pub missing_component_list: Vec<MissingType>,
}

fn normalized_type(component: &Component) -> String {
    component.component_type.trim().to_lowercase()
}

fn type_counts(document: &ShdfDocument) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for component in &document.components {
        *counts.entry(normalized_type(component)).or_insert(0) += 1;
    }
    counts
}

/// Compare component type counts; types are compared lower-cased and trimmed.
pub fn compare_with_reference(generated: &ShdfDocument, reference: &ShdfDocument) -> ReferenceComparison {
    let generated_counts = type_counts(generated);
    let reference_counts = type_counts(reference);
    let mut result = ReferenceComparison::default();

    for (component_type, &generated_count) in &generated_counts {
        let reference_count = reference_counts.get(component_type).copied().unwrap_or(0);
        if generated_count > reference_count {
            let extra_count = generated_count - reference_count;
            result.unnecessary_components += extra_count;
            result.unnecessary_component_list.push(UnnecessaryType {
                component_type: component_type.clone(),
                extra_count,
                generated_count,
                reference_count,
            });
        }
    }

    for (component_type, &reference_count) in &reference_counts {
        let generated_count = generated_counts.get(component_type).copied().unwrap_or(0);
        if reference_count > generated_count {
            let missing_count = reference_count - generated_count;
            result.missing_components += missing_count;
            result.missing_component_list.push(MissingType {
                component_type: component_type.clone(),
                missing_count,
                generated_count,
                reference_count,
            });
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorrectAttr {
    pub component_id: String,
    pub component_type: String,
    pub attribute: String,
    pub generated_value: String,
    pub reference_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentAttrs {
    pub incorrect_attrs: usize,
    pub incorrect_attrs_list: Vec<IncorrectAttr>,
}

/// Resistances compare numerically when both parse, otherwise as text with
/// units and whitespace stripped.
fn resistances_match(generated: &str, reference: &str) -> bool {
    match (parse_resistance(generated), parse_resistance(reference)) {
        (Ok(a), Ok(b)) => a == b,
        _ => strip_resistance_text(generated) == strip_resistance_text(reference),
    }
}

fn colors_match(generated: &str, reference: &str) -> bool {
    generated.trim().to_lowercase() == reference.trim().to_lowercase()
}

/// Compare attribute values of components that share an id with the
/// reference: resistor `value` always, LED `color` only when `scenario`
/// contains [`LED_COLOR_SCENARIO`].
pub fn check_component_attrs(
    generated: &ShdfDocument,
    reference: &ShdfDocument,
    scenario: Option<&str>,
) -> ComponentAttrs {
    let check_led_color = scenario.is_some_and(|s| s.contains(LED_COLOR_SCENARIO));

    let mut expected: HashMap<&str, (&'static str, &str)> = HashMap::new();
    for component in &reference.components {
        let component_type = normalized_type(component);
        if component_type == "resistor" {
            if let Some(value) = component.property("value") {
                expected.insert(&component.id, ("value", value));
            }
        } else if check_led_color && component_type == "led" {
            if let Some(color) = component.property("color") {
                expected.insert(&component.id, ("color", color));
            }
        }
    }

    let mut result = ComponentAttrs::default();
    for component in &generated.components {
        let component_type = normalized_type(component);
        let Some(&(attribute, reference_value)) = expected.get(component.id.as_str()) else {
            continue;
        };
        let generated_value = component.property(attribute).unwrap_or("");

        let matches = match (component_type.as_str(), attribute) {
            ("resistor", "value") => resistances_match(generated_value, reference_value),
            ("led", "color") => colors_match(generated_value, reference_value),
            _ => continue,
        };

        if !matches {
            result.incorrect_attrs += 1;
            result.incorrect_attrs_list.push(IncorrectAttr {
                component_id: component.id.clone(),
                component_type,
                attribute: attribute.to_string(),
                generated_value: generated_value.to_string(),
                reference_value: reference_value.to_string(),
            });
        }
    }
    result
}
