//! Error types for the pricat transformation pipeline.
//!
//! One error type per stage, converted into [`PipelineError`] at the top:
//!
//! - [`CsvError`] - Row source errors (missing file, headers, malformed lines)
//! - [`MappingError`] - Mapping rule index construction
//! - [`CatalogError`] - Catalog assembly (article numbers, brand consistency)
//! - [`ValidationError`] - Post-assembly structural checks
//! - [`OutputError`] - Writing the catalog document
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Row Source Errors
// =============================================================================

/// Errors while reading semicolon-delimited rows.
#[derive(Debug, Error)]
pub enum CsvError {
    /// The input file does not exist.
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The source has no header line.
    #[error("No headers: {source_name}")]
    NoHeaders { source_name: String },

    /// A line could not be decoded.
    #[error("Line {line}: {message}")]
    Parse { line: u64, message: String },
}

// =============================================================================
// Mapping Errors
// =============================================================================

/// Errors while building the mapping index.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A rule row has an empty source type, destination type or field list.
    #[error("Invalid mapping rule on row {row} ({reason}): {rule}")]
    InvalidMappingRule {
        row: usize,
        reason: &'static str,
        rule: String,
    },

    /// The rule file could not be read.
    #[error("Cannot read mapping rules: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Catalog Errors
// =============================================================================

/// Errors while assembling the catalog from pricat rows.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A pricat row has no article number.
    #[error("Row {row}: missing article_number")]
    MissingArticleNumber { row: usize },

    /// A pricat row carries a different brand than the first row.
    #[error("Row {row}: inconsistent brand, expected '{expected}' but found '{found}'")]
    InconsistentBrand {
        row: usize,
        expected: String,
        found: String,
    },

    /// The pricat file could not be read.
    #[error("Cannot read pricat rows: {0}")]
    Csv(#[from] CsvError),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised by the structural validator.
///
/// These point at a defect in assembly rather than at bad input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Structural invariant violated ({check}): {message}")]
    StructuralInvariantViolation { check: &'static str, message: String },
}

impl ValidationError {
    pub fn violation(check: &'static str, message: impl Into<String>) -> Self {
        Self::StructuralInvariantViolation {
            check,
            message: message.into(),
        }
    }
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while writing the catalog document.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Cannot write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot serialize catalog: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::transform_files`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An input path does not exist.
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl PipelineError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } => 2,
            _ => 1,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for row source operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for mapping index operations.
pub type MappingResult<T> = Result<T, MappingError>;

/// Result type for catalog assembly.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for structural validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
