//! Group pricat rows into a brand catalog of articles.
//!
//! Each row becomes one variation, appended to the article sharing its
//! `article_number`:
//!
//! ```text
//! Pricat rows (flat)                      →  Catalog (grouped)
//! ┌──────────────────────────────────┐      ┌──────────────────────────┐
//! │ brand: Via Vai, article: 15189-02│      │ brand: Via Vai           │
//! │ brand: Via Vai, article: 15189-02│  →   │ 15189-02: [var1, var2]   │
//! │ brand: Via Vai, article: 20001-01│      │ 20001-01: [var3]         │
//! └──────────────────────────────────┘      └──────────────────────────┘
//! ```
//!
//! Articles keep first-occurrence order and variations keep row order. All
//! rows must carry the brand of the first row; any bad row aborts the whole
//! assembly.

use std::collections::HashMap;

use tracing::debug;

use super::variation::{VariationBuilder, BRAND_FIELD};
use crate::error::{CatalogError, CatalogResult, CsvResult};
use crate::models::{Article, Catalog, RawRow};

/// Column holding the grouping key.
pub const ARTICLE_NUMBER_FIELD: &str = "article_number";

/// A catalog together with the number of rows it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledCatalog {
    pub catalog: Catalog,
    pub rows_processed: usize,
}

/// Accumulates rows into a [`Catalog`].
pub struct CatalogAssembler<'a> {
    builder: VariationBuilder<'a>,
    brand: Option<String>,
    articles: Vec<Article>,
    positions: HashMap<String, usize>,
    rows_processed: usize,
}

impl<'a> CatalogAssembler<'a> {
    pub fn new(builder: VariationBuilder<'a>) -> Self {
        Self {
            builder,
            brand: None,
            articles: Vec::new(),
            positions: HashMap::new(),
            rows_processed: 0,
        }
    }

    /// Add one pricat row.
    pub fn push(&mut self, row: &RawRow) -> CatalogResult<()> {
        self.rows_processed += 1;
        let row_number = self.rows_processed;

        let brand = row.value(BRAND_FIELD);
        match &self.brand {
            None => self.brand = Some(brand.to_string()),
            Some(expected) if expected != brand => {
                return Err(CatalogError::InconsistentBrand {
                    row: row_number,
                    expected: expected.clone(),
                    found: brand.to_string(),
                });
            }
            Some(_) => {}
        }

        let article_number = row.value(ARTICLE_NUMBER_FIELD);
        if article_number.is_empty() {
            return Err(CatalogError::MissingArticleNumber { row: row_number });
        }

        let variation = self.builder.build(row);

        let position = match self.positions.get(article_number) {
            Some(&position) => position,
            None => {
                let position = self.articles.len();
                self.positions.insert(article_number.to_string(), position);
                self.articles.push(Article::new(article_number));
                position
            }
        };
        self.articles[position].variations.push(variation);

        Ok(())
    }

    /// Number of rows pushed so far.
    pub fn rows_processed(&self) -> usize {
        self.rows_processed
    }

    pub fn finish(self) -> AssembledCatalog {
        AssembledCatalog {
            catalog: Catalog {
                brand: self.brand.unwrap_or_default(),
                articles: self.articles,
            },
            rows_processed: self.rows_processed,
        }
    }
}

/// Assemble a catalog from a row sequence. Stops at the first bad row.
pub fn build_catalog<I>(rows: I, builder: VariationBuilder<'_>) -> CatalogResult<AssembledCatalog>
where
    I: IntoIterator<Item = CsvResult<RawRow>>,
{
    let mut assembler = CatalogAssembler::new(builder);
    for row in rows {
        assembler.push(&row?)?;
    }

    let assembled = assembler.finish();
    debug!(
        brand = %assembled.catalog.brand,
        articles = assembled.catalog.articles.len(),
        rows = assembled.rows_processed,
        "assembled catalog"
    );
    Ok(assembled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MappingRule;
    use crate::transform::mapping::MappingIndex;
    use crate::transform::variation::NumericFields;
    use serde_json::json;

    fn rows(data: &[&[(&str, &str)]]) -> Vec<CsvResult<RawRow>> {
        data.iter()
            .map(|fields| Ok(fields.iter().copied().collect()))
            .collect()
    }

    fn assemble(data: &[&[(&str, &str)]], index: &MappingIndex) -> CatalogResult<AssembledCatalog> {
        let numeric = NumericFields::default();
        build_catalog(rows(data), VariationBuilder::new(index, &numeric))
    }

    #[test]
    fn test_same_article_groups_in_row_order() {
        let assembled = assemble(
            &[
                &[("brand", "Via Vai"), ("article_number", "15189-02"), ("ean", "111")],
                &[("brand", "Via Vai"), ("article_number", "15189-02"), ("ean", "222")],
            ],
            &MappingIndex::new(),
        )
        .unwrap();

        assert_eq!(assembled.rows_processed, 2);
        assert_eq!(assembled.catalog.brand, "Via Vai");
        assert_eq!(assembled.catalog.articles.len(), 1);

        let variations = &assembled.catalog.articles[0].variations;
        assert_eq!(variations.len(), 2);
        assert_eq!(variations[0].get("ean"), Some(&json!("111")));
        assert_eq!(variations[1].get("ean"), Some(&json!("222")));
    }

    #[test]
    fn test_articles_in_first_seen_order() {
        let assembled = assemble(
            &[
                &[("brand", "B"), ("article_number", "200")],
                &[("brand", "B"), ("article_number", "100")],
                &[("brand", "B"), ("article_number", "200")],
            ],
            &MappingIndex::new(),
        )
        .unwrap();

        let numbers: Vec<&str> = assembled
            .catalog
            .articles
            .iter()
            .map(|a| a.article_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["200", "100"]);
        assert_eq!(assembled.catalog.articles[0].variations.len(), 2);
        assert_eq!(assembled.catalog.variation_count(), assembled.rows_processed);
    }

    #[test]
    fn test_inconsistent_brand_fails() {
        let err = assemble(
            &[
                &[("ean", "111"), ("brand", "Via Vai"), ("article_number", "15189-02")],
                &[("ean", "222"), ("brand", "Other Brand"), ("article_number", "15189-02")],
            ],
            &MappingIndex::new(),
        )
        .unwrap_err();

        match err {
            CatalogError::InconsistentBrand { row, expected, found } => {
                assert_eq!(row, 2);
                assert_eq!(expected, "Via Vai");
                assert_eq!(found, "Other Brand");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_brand_compared_exactly() {
        let err = assemble(
            &[
                &[("brand", "Via Vai"), ("article_number", "1")],
                &[("brand", "Via Vai "), ("article_number", "1")],
            ],
            &MappingIndex::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InconsistentBrand { .. }));
    }

    #[test]
    fn test_empty_first_brand_is_adopted() {
        let err = assemble(
            &[
                &[("article_number", "1")],
                &[("brand", "Via Vai"), ("article_number", "1")],
            ],
            &MappingIndex::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::InconsistentBrand { row: 2, .. }));
    }

    #[test]
    fn test_missing_article_number_fails() {
        let err = assemble(
            &[
                &[("brand", "B"), ("article_number", "1")],
                &[("brand", "B"), ("article_number", "")],
            ],
            &MappingIndex::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::MissingArticleNumber { row: 2 }));
    }

    #[test]
    fn test_whitespace_article_number_is_grouped() {
        let assembled = assemble(
            &[
                &[("brand", "B"), ("article_number", " "), ("ean", "1")],
                &[("brand", "B"), ("article_number", " "), ("ean", "2")],
            ],
            &MappingIndex::new(),
        )
        .unwrap();
        assert_eq!(assembled.catalog.articles.len(), 1);
        assert_eq!(assembled.catalog.articles[0].article_number, " ");
        assert_eq!(assembled.catalog.articles[0].variations.len(), 2);
    }

    #[test]
    fn test_absent_article_number_column_fails() {
        let err = assemble(&[&[("brand", "B"), ("ean", "1")]], &MappingIndex::new()).unwrap_err();
        assert!(matches!(err, CatalogError::MissingArticleNumber { row: 1 }));
    }

    #[test]
    fn test_empty_feed() {
        let assembled = assemble(&[], &MappingIndex::new()).unwrap();

        assert_eq!(assembled.rows_processed, 0);
        assert_eq!(assembled.catalog.brand, "");
        assert!(assembled.catalog.articles.is_empty());
    }

    #[test]
    fn test_row_source_error_propagates() {
        let numeric = NumericFields::default();
        let index = MappingIndex::new();
        let input: Vec<CsvResult<RawRow>> = vec![Err(crate::error::CsvError::Parse {
            line: 3,
            message: "invalid UTF-8".into(),
        })];

        let err = build_catalog(input, VariationBuilder::new(&index, &numeric)).unwrap_err();
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    #[test]
    fn test_mappings_applied_and_brand_excluded() {
        let index = MappingIndex::from_rules(vec![MappingRule {
            source_type: "season".into(),
            source: "winter".into(),
            destination_type: "season".into(),
            destination: "Winter".into(),
        }])
        .unwrap();

        let assembled = assemble(
            &[&[("brand", "Via Vai"), ("article_number", "15189-02"), ("season", "winter")]],
            &index,
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&assembled.catalog).unwrap(),
            json!({
                "brand": "Via Vai",
                "articles": [{
                    "article_number": "15189-02",
                    "variations": [{ "article_number": "15189-02", "season": "Winter" }]
                }]
            })
        );
    }

    #[test]
    fn test_variation_count_matches_rows_for_many_articles() {
        let numbers = ["A", "B", "A", "C", "B", "A", "D"];
        let data: Vec<Vec<(&str, &str)>> = numbers
            .iter()
            .map(|n| vec![("brand", "B"), ("article_number", *n)])
            .collect();
        let slices: Vec<&[(&str, &str)]> = data.iter().map(Vec::as_slice).collect();

        let assembled = assemble(&slices, &MappingIndex::new()).unwrap();

        assert_eq!(assembled.rows_processed, numbers.len());
        assert_eq!(assembled.catalog.variation_count(), numbers.len());
        assert_eq!(assembled.catalog.articles.len(), 4);
        for article in &assembled.catalog.articles {
            assert!(article.variations.iter().all(|v| !v.contains_key("brand")));
        }
    }
}
