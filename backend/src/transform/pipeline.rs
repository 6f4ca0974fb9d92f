//! High-level pipeline API for pricat to catalog transformation.
//!
//! Combines all steps: load the mapping rules, assemble the catalog from the
//! pricat rows, validate its structure, write the JSON document. Nothing is
//! written unless every step succeeds.
//!
//! # Example
//!
//! ```rust,ignore
//! use pricat::transform::pipeline::{transform_files, TransformOptions};
//! use std::path::Path;
//!
//! let summary = transform_files(
//!     Path::new("pricat.csv"),
//!     Path::new("mappings.csv"),
//!     Path::new("out/catalog.json"),
//!     &TransformOptions::default(),
//! )?;
//! println!("{} articles", summary.articles);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::grouper::{build_catalog, AssembledCatalog};
use super::mapping::{load_mappings_index, MappingIndex};
use super::variation::{NumericFields, VariationBuilder};
use crate::error::{CatalogError, CsvResult, OutputError, PipelineError, PipelineResult};
use crate::logs::{log_info, log_success, log_success_indent, log_warning};
use crate::models::{CatalogDocument, RawRow};
use crate::output::write_catalog;
use crate::parser::{RowReader, DEFAULT_DELIMITER};
use crate::validation::validate_catalog;

/// Options for the transformation pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Field delimiter of the pricat feed
    pub pricat_delimiter: u8,

    /// Field delimiter of the mapping rule file
    pub mappings_delimiter: u8,

    /// Fields emitted as numbers when they parse
    pub numeric_fields: NumericFields,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            pricat_delimiter: DEFAULT_DELIMITER,
            mappings_delimiter: DEFAULT_DELIMITER,
            numeric_fields: NumericFields::default(),
        }
    }
}

/// A validated catalog, ready to be written.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// Typed catalog
    pub document: CatalogDocument,
    /// Same catalog as a JSON value tree, as validated
    pub value: Value,
    /// Number of pricat rows read
    pub rows_processed: usize,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSummary {
    pub brand: String,
    pub articles: usize,
    pub rows_processed: usize,
    pub rules: usize,
    pub output: PathBuf,
}

/// Assemble and validate a catalog from in-memory rows.
pub fn transform_rows<I>(rows: I, index: &MappingIndex, options: &TransformOptions) -> PipelineResult<TransformOutput>
where
    I: IntoIterator<Item = CsvResult<RawRow>>,
{
    let builder = VariationBuilder::new(index, &options.numeric_fields);
    let AssembledCatalog {
        catalog,
        rows_processed,
    } = build_catalog(rows, builder)?;

    let document = CatalogDocument::new(catalog);
    let value = document.to_value().map_err(OutputError::from)?;
    validate_catalog(&value, rows_processed)?;

    Ok(TransformOutput {
        document,
        value,
        rows_processed,
    })
}

/// Transform a pricat file to a catalog JSON file.
///
/// This is the main entry point. It:
/// 1. Checks both inputs exist
/// 2. Loads the mapping index
/// 3. Assembles the catalog row by row
/// 4. Validates the catalog structure
/// 5. Writes the JSON document
pub fn transform_files(
    pricat: &Path,
    mappings: &Path,
    output: &Path,
    options: &TransformOptions,
) -> PipelineResult<CatalogSummary> {
    ensure_exists(pricat)?;
    ensure_exists(mappings)?;

    log_info(format!("Loading mappings: {}", mappings.display()));
    let index = load_mappings_index(mappings, options.mappings_delimiter)?;
    log_success_indent(
        format!("{} rules over {} field combinations", index.rule_count(), index.tuple_count()),
        1,
    );
    if index.is_empty() {
        log_warning("No mapping rules, fields are copied unchanged");
    }

    log_info(format!("Reading pricat: {}", pricat.display()));
    let rows = RowReader::from_path(pricat, options.pricat_delimiter).map_err(CatalogError::from)?;
    let result = transform_rows(rows, &index, options)?;
    let catalog = &result.document.catalog;
    log_success_indent(
        format!(
            "{} rows → {} articles (brand '{}')",
            result.rows_processed,
            catalog.articles.len(),
            catalog.brand
        ),
        1,
    );
    if result.rows_processed == 0 {
        log_warning("Pricat feed has no rows, writing an empty catalog");
    }

    write_catalog(output, &result.value)?;
    log_success(format!("Catalog written to {}", output.display()));

    Ok(CatalogSummary {
        brand: catalog.brand.clone(),
        articles: catalog.articles.len(),
        rows_processed: result.rows_processed,
        rules: index.rule_count(),
        output: output.to_path_buf(),
    })
}

fn ensure_exists(path: &Path) -> PipelineResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(PipelineError::InputNotFound {
            path: path.to_path_buf(),
        })
    }
}
