//! Structural validation of the assembled catalog document.
//!
//! Runs on the serialized value tree, after assembly and before anything is
//! written. A failure here means rows were dropped or duplicated during
//! grouping, not that the input was bad.
//!
//! # Checks
//!
//! | check                | rule                                                  |
//! |----------------------|-------------------------------------------------------|
//! | `catalog_structure`  | document has `catalog.brand` and `catalog.articles`   |
//! | `articles_sequence`  | `catalog.articles` is an array                        |
//! | `variations_sequence`| every article's `variations` is an array              |
//! | `variation_count`    | total variations == rows processed                    |
//! | `schema`             | document matches `schemas/catalog.json` (Draft 7)     |
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use pricat::validation::validate_catalog;
//!
//! let doc = json!({ "catalog": { "brand": "", "articles": [] } });
//! assert!(validate_catalog(&doc, 0).is_ok());
//! ```

use serde_json::Value;
use tracing::debug;

use crate::error::{ValidationError, ValidationResult};

const CATALOG_SCHEMA: &str = include_str!("../../schemas/catalog.json");

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every error otherwise
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The embedded catalog document schema.
pub fn catalog_schema() -> ValidationResult<Value> {
    serde_json::from_str(CATALOG_SCHEMA)
        .map_err(|e| ValidationError::violation("schema", format!("embedded schema unreadable: {}", e)))
}

/// Run every structural check against a catalog document.
pub fn validate_catalog(document: &Value, rows_processed: usize) -> ValidationResult<()> {
    let catalog = document
        .get("catalog")
        .filter(|c| c.get("brand").is_some() && c.get("articles").is_some())
        .ok_or_else(|| {
            ValidationError::violation("catalog_structure", "document must contain catalog.brand and catalog.articles")
        })?;

    let articles = catalog["articles"]
        .as_array()
        .ok_or_else(|| ValidationError::violation("articles_sequence", "catalog.articles must be an array"))?;

    let mut total = 0usize;
    for (i, article) in articles.iter().enumerate() {
        let variations = article
            .get("variations")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ValidationError::violation(
                    "variations_sequence",
                    format!("articles[{}].variations must be an array", i),
                )
            })?;
        total += variations.len();
    }

    if total != rows_processed {
        return Err(ValidationError::violation(
            "variation_count",
            format!("{} variations for {} rows processed", total, rows_processed),
        ));
    }

    validate(&catalog_schema()?, document)
        .map_err(|errors| ValidationError::violation("schema", errors.join("; ")))?;

    debug!(articles = articles.len(), variations = total, "catalog structure valid");
    Ok(())
}

/// Quick check without error details.
pub fn is_valid_catalog(document: &Value, rows_processed: usize) -> bool {
    validate_catalog(document, rows_processed).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check_name(result: ValidationResult<()>) -> &'static str {
        match result {
            Err(ValidationError::StructuralInvariantViolation { check, .. }) => check,
            Ok(()) => "ok",
        }
    }

    #[test]
    fn test_valid_catalog() {
        let doc = json!({
            "catalog": {
                "brand": "Via Vai",
                "articles": [
                    { "article_number": "15189-02", "variations": [{ "ean": "111", "price_sell": 139.95 }, { "ean": "222" }] },
                    { "article_number": "20001-01", "variations": [{ "ean": "333" }] }
                ]
            }
        });
        assert!(validate_catalog(&doc, 3).is_ok());
        assert!(is_valid_catalog(&doc, 3));
    }

    #[test]
    fn test_empty_catalog() {
        let doc = json!({ "catalog": { "brand": "", "articles": [] } });
        assert!(validate_catalog(&doc, 0).is_ok());
    }

    #[test]
    fn test_missing_catalog() {
        let doc = json!({ "brand": "Via Vai", "articles": [] });
        assert_eq!(check_name(validate_catalog(&doc, 0)), "catalog_structure");
    }

    #[test]
    fn test_missing_articles() {
        let doc = json!({ "catalog": { "brand": "Via Vai" } });
        assert_eq!(check_name(validate_catalog(&doc, 0)), "catalog_structure");
    }

    #[test]
    fn test_articles_not_array() {
        let doc = json!({ "catalog": { "brand": "Via Vai", "articles": {} } });
        assert_eq!(check_name(validate_catalog(&doc, 0)), "articles_sequence");
    }

    #[test]
    fn test_variations_not_array() {
        let doc = json!({
            "catalog": { "brand": "B", "articles": [{ "article_number": "1", "variations": {} }] }
        });
        assert_eq!(check_name(validate_catalog(&doc, 1)), "variations_sequence");
    }

    #[test]
    fn test_count_mismatch() {
        let doc = json!({
            "catalog": { "brand": "B", "articles": [{ "article_number": "1", "variations": [{ "ean": "1" }] }] }
        });
        assert_eq!(check_name(validate_catalog(&doc, 2)), "variation_count");

        let err = validate_catalog(&doc, 2).unwrap_err();
        assert!(err.to_string().contains("1 variations for 2 rows"));
    }

    #[test]
    fn test_schema_rejects_brand_in_variation() {
        let doc = json!({
            "catalog": { "brand": "B", "articles": [{ "article_number": "1", "variations": [{ "brand": "B" }] }] }
        });
        assert_eq!(check_name(validate_catalog(&doc, 1)), "schema");
    }

    #[test]
    fn test_schema_rejects_nested_values() {
        let doc = json!({
            "catalog": { "brand": "B", "articles": [{ "article_number": "1", "variations": [{ "size": { "eu": 38 } }] }] }
        });
        assert_eq!(check_name(validate_catalog(&doc, 1)), "schema");
    }

    #[test]
    fn test_embedded_schema_parses() {
        let schema = catalog_schema().unwrap();
        assert_eq!(schema["type"], "object");
    }

    #[test]
    fn test_generic_validate_reports_errors() {
        let schema = json!({
            "type": "object",
            "required": ["name"],
            "properties": { "name": { "type": "string" } }
        });

        assert!(validate(&schema, &json!({ "name": "test" })).is_ok());
        let errors = validate(&schema, &json!({ "age": 42 })).unwrap_err();
        assert!(!errors.is_empty());
    }
}
