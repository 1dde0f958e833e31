//! Built-in and External Catalog Sources
//!
//! The component catalog is loaded from:
//! 1. An external JSON file named by `--catalog` or the `SHDFKIT_CATALOG`
//!    environment variable (user-editable)
//! 2. The `module_info.json` compiled into the binary (fallback)
//!
//! A missing or malformed external source degrades to an empty catalog;
//! translation still runs but every lookup reports "unresolved".

use std::path::Path;

use thiserror::Error;

use super::schema::ModuleRecord;
use super::{build_catalog, Catalog};

const EMBEDDED_MODULE_INFO: &str = include_str!("../../catalog/module_info.json");

/// Environment variable naming an external catalog source.
pub const CATALOG_ENV_VAR: &str = "SHDFKIT_CATALOG";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Records of the embedded catalog source.
pub fn embedded_records() -> Vec<ModuleRecord> {
    match serde_json::from_str::<Vec<ModuleRecord>>(EMBEDDED_MODULE_INFO) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Failed to parse embedded module info: {}", e);
            Vec::new()
        }
    }
}

/// Read catalog records from a JSON file.
pub fn load_records_from_file(path: &Path) -> Result<Vec<ModuleRecord>, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl Catalog {
    /// Catalog built from the embedded `module_info.json`.
    pub fn builtin() -> Self {
        build_catalog(embedded_records())
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<ModuleRecord> = serde_json::from_str(json)?;
        Ok(build_catalog(records))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let records = load_records_from_file(path)?;
        tracing::info!("Loaded {} catalog records from {:?}", records.len(), path);
        Ok(build_catalog(records))
    }

    /// Load an external catalog, falling back to an empty one on any error.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::from_path(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(
                    "Catalog source {:?} unavailable ({}); continuing with an empty catalog",
                    path,
                    e
                );
                Self::empty()
            }
        }
    }

    /// External catalog from `SHDFKIT_CATALOG` if set, otherwise the builtin.
    pub fn from_env_or_builtin() -> Self {
        match std::env::var_os(CATALOG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load_or_empty(Path::new(&path)),
            _ => Self::builtin(),
        }
    }
}
