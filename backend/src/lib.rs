//! # Pricat - supplier price/catalog feed to catalog JSON
//!
//! Pricat turns a flat, semicolon-delimited supplier export into a catalog
//! document grouped by article, recoding fields through a mapping rule table.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐
//! │ mappings.csv │────▶│ Mapping     │──┐
//! └──────────────┘     │ index       │  │
//!                      └─────────────┘  ▼
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  pricat.csv  │────▶│  Variation  │────▶│  Grouper    │────▶│ catalog.json │
//! │  (rows)      │     │  builder    │     │ + validator │     │  (articles)  │
//! └──────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricat::{transform_files, TransformOptions};
//! use std::path::Path;
//!
//! let summary = transform_files(
//!     Path::new("pricat.csv"),
//!     Path::new("mappings.csv"),
//!     Path::new("catalog.json"),
//!     &TransformOptions::default(),
//! ).unwrap();
//! println!("Wrote {} articles", summary.articles);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Domain models (RawRow, Variation, Article, Catalog)
//! - [`parser`] - Delimited row source
//! - [`transform`] - Mapping index, variation builder, grouping, pipeline
//! - [`validation`] - Structural checks on the catalog document
//! - [`output`] - JSON document writer
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Output
pub mod output;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CatalogError,
    CsvError,
    MappingError,
    OutputError,
    PipelineError,
    PipelineResult,
    ValidationError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Article, Catalog, CatalogDocument, Columns, MappingRule, RawRow, Variation};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{parse_str, RowReader, DEFAULT_DELIMITER};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    build_catalog,
    load_mappings_index,
    row_to_variation,
    AssembledCatalog,
    MappingIndex,
    NumericFields,
    VariationBuilder,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    transform_files,
    transform_rows,
    CatalogSummary,
    TransformOptions,
    TransformOutput,
};

// =============================================================================
// Re-exports - Validation / Output
// =============================================================================

pub use output::write_catalog;
pub use validation::{is_valid_catalog, validate_catalog};
