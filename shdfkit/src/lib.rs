//! shdfkit - Wokwi <-> SHDF circuit diagram conversion library
//!
//! Translates between Wokwi simulator diagrams and the Simple Hardware
//! Description Format (SHDF), validates SHDF documents against the
//! component catalog, and scores generated circuits with a set of quality
//! metrics.
//!
//! # Quick Start
//!
//! ```no_run
//! use shdfkit::{ConvertOptions, ShdfKitCore};
//! use std::path::Path;
//!
//! let core = ShdfKitCore::new();
//! let conversion = core
//!     .convert_file_to_neutral(Path::new("diagram.json"), &ConvertOptions::physical())
//!     .unwrap();
//!
//! for issue in &conversion.issues {
//!     println!("{}", issue);
//! }
//! println!("{}", conversion.document.to_json_pretty().unwrap());
//! ```
//!
//! # Features
//!
//! - **Conversion**: Wokwi to SHDF and back, in logical or physical mode
//! - **Catalog**: type and pin mapping driven by `module_info.json`
//! - **Breadboard addressing**: `10t.a` <-> `breadboard.10a`
//! - **Validation**: schema, ids, pin names, breadboard positions
//! - **Metrics**: duplicates, conflicts, unused parts, reference comparison, nets

pub mod catalog;
pub mod convert;
pub mod core;
pub mod diagnostics;
pub mod document;
pub mod mapping;
pub mod metrics;
pub mod validate;

// Re-export main types
pub use crate::core::{parse_shdf, parse_wokwi, read_json, ShdfKitCore, ShdfKitError};
pub use catalog::{build_catalog, Catalog, CatalogEntry, CatalogError, ComponentType};
pub use convert::{to_neutral, to_simulator, Conversion, ConvertError, ConvertOptions, Mode};
pub use diagnostics::{Issue, Severity};
pub use document::{Component, Connection, ShdfDocument, WokwiConnection, WokwiDiagram, WokwiPart};
pub use mapping::{AddressError, BreadboardAddress, MappingError};
pub use metrics::{evaluate_hardware_design, Evaluation, EvaluationOptions, Metrics};
pub use validate::{validate_shdf, validate_shdf_document, CheckResult, ValidationReport};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Catalog, Conversion, ConvertOptions, Evaluation, EvaluationOptions, Issue, Mode, Severity,
        ShdfDocument, ShdfKitCore, ShdfKitError, ValidationReport, WokwiDiagram,
    };
}
