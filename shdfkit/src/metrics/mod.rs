//! Circuit quality metrics over SHDF documents.
//!
//! Every check is an independent pure function; [`evaluate_hardware_design`]
//! runs the set that applies to a mode and keys the results by metric name.

pub mod components;
pub mod connections;
pub mod nets;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::Mode;
use crate::document::ShdfDocument;

pub use components::{
    check_component_attrs, check_unused_components, compare_with_reference, ComponentAttrs,
    IncorrectAttr, MissingType, ReferenceComparison, UnnecessaryType, UnusedComponents,
};
pub use connections::{
    check_direct_connections, check_duplicate_connections, check_endpoint_conflicts,
    DirectConnections, DuplicateConnections, EndpointConflict, EndpointConflicts,
    IndexedConnection,
};
pub use nets::{check_electrical_nets, Net, NetReport, Netlist};

/// Options for an evaluation run.
#[derive(Clone, Debug, Default)]
pub struct EvaluationOptions {
    pub mode: Mode,
    /// Benchmark scenario name or path; enables scenario-specific checks.
    pub scenario: Option<String>,
}

impl EvaluationOptions {
    pub fn new(mode: Mode) -> Self {
        Self { mode, scenario: None }
    }

    pub fn with_scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }
}

/// Results keyed by metric name. Metrics that did not run are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub duplicate_connections: DuplicateConnections,
    pub unused_components: UnusedComponents,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_conflicts: Option<EndpointConflicts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_connections: Option<DirectConnections>,

    // both keys carry the same comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unnecessary_components: Option<ReferenceComparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_components: Option<ReferenceComparison>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_attrs: Option<ComponentAttrs>,

    pub electrical_nets: NetReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub mode: Mode,
    pub metrics: Metrics,
}

impl Evaluation {
    /// Total of the defect counters that ran.
    pub fn defect_count(&self) -> usize {
        let m = &self.metrics;
        m.duplicate_connections.duplicate_connections
            + m.unused_components.unused_components
            + m.endpoint_conflicts.as_ref().map_or(0, |c| c.endpoint_conflicts)
            + m.direct_connections.as_ref().map_or(0, |c| c.direct_connections)
            + m.unnecessary_components.as_ref().map_or(0, |c| c.unnecessary_components)
            + m.missing_components.as_ref().map_or(0, |c| c.missing_components)
            + m.component_attrs.as_ref().map_or(0, |c| c.incorrect_attrs)
            + m.electrical_nets.shorted_nets
    }
}

/// Run every metric that applies to `options.mode`.
///
/// Duplicates, unused components and nets always run. Endpoint conflicts
/// and direct connections run in physical mode. Reference comparison and
/// attribute checks run when a reference is given.
pub fn evaluate_hardware_design(
    document: &ShdfDocument,
    reference: Option<&ShdfDocument>,
    options: &EvaluationOptions,
) -> Evaluation {
    let physical = options.mode == Mode::Physical;
    let comparison = reference.map(|r| compare_with_reference(document, r));

    let metrics = Metrics {
        duplicate_connections: check_duplicate_connections(document),
        unused_components: check_unused_components(document),
        endpoint_conflicts: physical.then(|| check_endpoint_conflicts(document)),
        direct_connections: physical.then(|| check_direct_connections(document)),
        unnecessary_components: comparison.clone(),
        missing_components: comparison,
        component_attrs: reference.map(|r| check_component_attrs(document, r, options.scenario.as_deref())),
        electrical_nets: check_electrical_nets(document),
    };

    let evaluation = Evaluation {
        mode: options.mode,
        metrics,
    };
    debug!(mode = %options.mode, defects = evaluation.defect_count(), "evaluated design");
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Component;

    fn sample() -> ShdfDocument {
        let mut doc = ShdfDocument::new();
        doc.add_component(Component::new("uno1", "arduino uno"));
        doc.add_component(Component::new("led1", "led"));
        doc.add_component(Component::new("r1", "resistor").with_property("value", "220"));
        doc.connect("uno1.pin13", "led1.a");
        doc.connect("led1.a", "uno1.pin13");
        doc.connect("led1.c", "breadboard.4c");
        doc
    }

    #[test]
    fn test_logical_mode_subset() {
        let evaluation = evaluate_hardware_design(&sample(), None, &EvaluationOptions::default());
        let value = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(value["mode"], "logical");
        let metrics = value["metrics"].as_object().unwrap();
        let mut keys: Vec<&str> = metrics.keys().map(|k| k.as_str()).collect();
        keys.sort();
        assert_eq!(keys, vec!["duplicate_connections", "electrical_nets", "unused_components"]);
        assert_eq!(value["metrics"]["duplicate_connections"]["duplicate_connections"], 1);
        assert_eq!(value["metrics"]["unused_components"]["unused_component_list"][0]["id"], "r1");
    }

    #[test]
    fn test_physical_mode_with_reference() {
        let mut reference = sample();
        reference.components[2] = Component::new("r1", "resistor").with_property("value", "330 ohm");

        let options = EvaluationOptions::new(Mode::Physical).with_scenario("blink");
        let evaluation = evaluate_hardware_design(&sample(), Some(&reference), &options);
        let metrics = &evaluation.metrics;

        assert_eq!(metrics.endpoint_conflicts.as_ref().unwrap().endpoint_conflicts, 2);
        let direct = metrics.direct_connections.as_ref().unwrap();
        assert_eq!(direct.direct_connections, 2);
        assert_eq!(direct.breadboard_connections, 1);
        assert_eq!(metrics.unnecessary_components, metrics.missing_components);
        assert_eq!(metrics.component_attrs.as_ref().unwrap().incorrect_attrs, 1);
    }

    #[test]
    fn test_evaluation_round_trips_through_json() {
        let evaluation = evaluate_hardware_design(
            &sample(),
            Some(&sample()),
            &EvaluationOptions::new(Mode::Physical),
        );
        let json = serde_json::to_string(&evaluation).unwrap();
        let parsed: Evaluation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, evaluation);
    }
}
