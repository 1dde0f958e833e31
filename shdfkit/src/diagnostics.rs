//! Non-fatal findings reported by the mappers and converters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A single reported finding. Conversion keeps going after an issue is
/// recorded; only attribute coercion failures abort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl Issue {
    pub fn warning(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Warning,
            message: message.into(),
            component: None,
        }
    }

    pub fn info(rule_id: &str, message: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.to_string(),
            severity: Severity::Info,
            message: message.into(),
            component: None,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning | Severity::Error)
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.component {
            Some(component) => write!(f, "[{}] {}: {}", self.rule_id, component, self.message),
            None => write!(f, "[{}] {}", self.rule_id, self.message),
        }
    }
}

/// Rule identifiers used across the converters.
pub mod rules {
    pub const UNKNOWN_TYPE: &str = "unknown_type";
    pub const UNKNOWN_PIN: &str = "unknown_pin";
    pub const MISSING_TYPE: &str = "missing_type";
    pub const BREADBOARD_ADDRESS: &str = "breadboard_address";
    pub const DANGLING_ENDPOINT: &str = "dangling_endpoint";
    pub const LOGICAL_FILTER: &str = "logical_filter";
    pub const DROPPED_PROPERTY: &str = "dropped_property";
    pub const DUPLICATE_BREADBOARD: &str = "duplicate_breadboard";
}
