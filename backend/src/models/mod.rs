//! Domain models for the pricat transformation pipeline.
//!
//! - [`RawRow`] - One feed line, header name to string value
//! - [`MappingRule`] - One row of the mapping rule table
//! - [`Variation`] - Per-row output record
//! - [`Article`] - Variations grouped by article number
//! - [`Catalog`] - Brand plus all its articles
//! - [`CatalogDocument`] - The serialized output root (`{"catalog": ...}`)

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Raw Row
// =============================================================================

/// Deduplicated column names of a source, with O(1) name lookup.
///
/// Built once per header line and shared by every row read from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of `name`, appending it if unseen.
    pub fn push(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(&position) = self.positions.get(&name) {
            return position;
        }
        let position = self.names.len();
        self.positions.insert(name.clone(), position);
        self.names.push(name);
        position
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One line of a delimited source, keyed by header name.
///
/// Fields keep header order. Inserting an existing name replaces its value
/// but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    columns: Arc<Columns>,
    values: Vec<String>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row over a shared column set. `values` are in column order; missing
    /// trailing values read as empty and extra ones are dropped.
    pub fn from_parts(columns: Arc<Columns>, mut values: Vec<String>) -> Self {
        values.resize(columns.len(), String::new());
        Self { columns, values }
    }

    /// Set a field value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.columns.position(&name) {
            Some(position) => self.values[position] = value,
            None => {
                Arc::make_mut(&mut self.columns).push(name);
                self.values.push(value);
            }
        }
    }

    /// Get a field value if the column exists.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .position(name)
            .map(|position| self.values[position].as_str())
    }

    /// Get a field value, treating a missing column as empty.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Iterate over `(name, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .names()
            .iter()
            .zip(&self.values)
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// =============================================================================
// Mapping Rule
// =============================================================================

/// A row of the mapping rule table, before validation.
///
/// Missing columns are read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingRule {
    /// `|`-separated source field names.
    pub source_type: String,
    /// Literal value the joined source fields must equal.
    pub source: String,
    /// Destination field name.
    pub destination_type: String,
    /// Destination value.
    pub destination: String,
}

impl MappingRule {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            source_type: row.value("source_type").to_string(),
            source: row.value("source").to_string(),
            destination_type: row.value("destination_type").to_string(),
            destination: row.value("destination").to_string(),
        }
    }
}

impl std::fmt::Display for MappingRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{};{};{};{}",
            self.source_type, self.source, self.destination_type, self.destination
        )
    }
}

// =============================================================================
// Variation
// =============================================================================

/// One output record per pricat row.
///
/// Values are JSON strings or numbers. Keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variation {
    fields: Map<String, Value>,
}

impl Variation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =============================================================================
// Article / Catalog
// =============================================================================

/// Variations sharing an article number, in row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_number: String,
    pub variations: Vec<Variation>,
}

impl Article {
    pub fn new(article_number: impl Into<String>) -> Self {
        Self {
            article_number: article_number.into(),
            variations: Vec::new(),
        }
    }
}

/// One brand and all its articles, in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub brand: String,
    pub articles: Vec<Article>,
}

impl Catalog {
    /// Total number of variations across all articles.
    pub fn variation_count(&self) -> usize {
        self.articles.iter().map(|a| a.variations.len()).sum()
    }
}

/// Root of the output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub catalog: Catalog,
}

impl CatalogDocument {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Convert to a generic JSON value tree.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
