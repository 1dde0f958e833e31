//! File and JSON entry points shared by the CLI and library callers.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogError};
use crate::convert::{to_neutral, to_simulator, ConvertError, ConvertOptions, Conversion};
use crate::document::{ShdfDocument, WokwiDiagram};
use crate::metrics::{evaluate_hardware_design, Evaluation, EvaluationOptions};
use crate::validate::{validate_shdf_document, validate_structure, ValidationReport};

#[derive(Debug, thiserror::Error)]
pub enum ShdfKitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed document; nothing was converted.
    #[error("Structural error: {}", .0.join("; "))]
    Structural(Vec<String>),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, ShdfKitError> {
    let text = std::fs::read_to_string(path)?;
    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(serde_json::from_str(&text)?)
}

/// Parse a raw SHDF document, reporting every shape violation at once.
pub fn parse_shdf(value: &Value) -> Result<ShdfDocument, ShdfKitError> {
    let errors = validate_structure(value);
    if !errors.is_empty() {
        return Err(ShdfKitError::Structural(errors));
    }
    serde_json::from_value(value.clone()).map_err(|e| ShdfKitError::Structural(vec![e.to_string()]))
}

/// Parse a raw Wokwi diagram.
pub fn parse_wokwi(value: &Value) -> Result<WokwiDiagram, ShdfKitError> {
    serde_json::from_value(value.clone()).map_err(|e| ShdfKitError::Structural(vec![e.to_string()]))
}

/// Conversion, validation and evaluation against one catalog.
#[derive(Debug, Clone, Copy)]
pub struct ShdfKitCore<'c> {
    catalog: &'c Catalog,
}

impl Default for ShdfKitCore<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ShdfKitCore<'static> {
    /// Core over the process-wide catalog.
    pub fn new() -> Self {
        Self {
            catalog: Catalog::shared(),
        }
    }
}

impl<'c> ShdfKitCore<'c> {
    pub fn with_catalog(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Wokwi diagram JSON to SHDF.
    pub fn convert_json_to_neutral(
        &self,
        diagram: &Value,
        options: &ConvertOptions,
    ) -> Result<Conversion<ShdfDocument>, ShdfKitError> {
        let diagram = parse_wokwi(diagram)?;
        Ok(to_neutral(self.catalog, &diagram, options)?)
    }

    /// SHDF JSON to a Wokwi diagram.
    pub fn convert_json_to_simulator(
        &self,
        document: &Value,
        options: &ConvertOptions,
    ) -> Result<Conversion<WokwiDiagram>, ShdfKitError> {
        let document = parse_shdf(document)?;
        Ok(to_simulator(self.catalog, &document, options)?)
    }

    pub fn convert_file_to_neutral(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Conversion<ShdfDocument>, ShdfKitError> {
        let conversion = self.convert_json_to_neutral(&read_json(path)?, options)?;
        info!(
            "Converted {} to SHDF ({} components, {} issues)",
            path.display(),
            conversion.document.components.len(),
            conversion.issues.len()
        );
        Ok(conversion)
    }

    pub fn convert_file_to_simulator(
        &self,
        path: &Path,
        options: &ConvertOptions,
    ) -> Result<Conversion<WokwiDiagram>, ShdfKitError> {
        let conversion = self.convert_json_to_simulator(&read_json(path)?, options)?;
        info!(
            "Converted {} to Wokwi ({} parts, {} issues)",
            path.display(),
            conversion.document.parts.len(),
            conversion.issues.len()
        );
        Ok(conversion)
    }

    pub fn validate_json(&self, document: &Value) -> ValidationReport {
        validate_shdf_document(self.catalog, document)
    }

    /// Validate an SHDF file. Only I/O and JSON syntax errors are `Err`;
    /// every document defect lands in the report.
    pub fn validate_file(&self, path: &Path) -> Result<ValidationReport, ShdfKitError> {
        let report = self.validate_json(&read_json(path)?);
        info!("Validated {}: {} errors", path.display(), report.error_count());
        Ok(report)
    }

    pub fn evaluate_json(
        &self,
        document: &Value,
        reference: Option<&Value>,
        options: &EvaluationOptions,
    ) -> Result<Evaluation, ShdfKitError> {
        let document = parse_shdf(document)?;
        let reference = reference.map(parse_shdf).transpose()?;
        Ok(evaluate_hardware_design(&document, reference.as_ref(), options))
    }

    pub fn evaluate_files(
        &self,
        path: &Path,
        reference: Option<&Path>,
        options: &EvaluationOptions,
    ) -> Result<Evaluation, ShdfKitError> {
        let document = read_json(path)?;
        let reference = reference.map(read_json).transpose()?;
        self.evaluate_json(&document, reference.as_ref(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structural_errors_are_listed() {
        let core = ShdfKitCore::new();
        let err = core
            .convert_json_to_simulator(
                &json!({ "components": [{ "id": "a" }], "connections": [["a.x"]] }),
                &ConvertOptions::default(),
            )
            .unwrap_err();
        match err {
            ShdfKitError::Structural(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_wokwi_connection_is_structural() {
        let core = ShdfKitCore::new();
        let err = core
            .convert_json_to_neutral(
                &json!({ "parts": [], "connections": [["uno:13"]] }),
                &ConvertOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ShdfKitError::Structural(_)));
    }

    #[test]
    fn test_attribute_error_propagates() {
        let core = ShdfKitCore::new();
        let err = core
            .convert_json_to_simulator(
                &json!({
                    "components": [{ "id": "r1", "type": "resistor", "properties": { "value": "many" } }],
                    "connections": []
                }),
                &ConvertOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(err, ShdfKitError::Convert(ConvertError::InvalidAttribute { .. })));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = Catalog::empty();
        let core = ShdfKitCore::with_catalog(&catalog);
        let report = core.validate_json(&json!({
            "components": [{ "id": "led1", "type": "led" }],
            "connections": []
        }));
        assert_eq!(report.errors, vec!["Invalid component type: led".to_string()]);
    }
}
