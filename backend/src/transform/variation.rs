//! Row → variation transformation.
//!
//! Two passes over one pricat row:
//!
//! 1. Every rule group in the [`MappingIndex`] probes the row. A hit writes
//!    its destination and marks all of the group's source fields consumed.
//!    A destination of `brand` is dropped, its sources are still consumed.
//! 2. Remaining non-empty fields are copied as-is, except `brand` (catalog
//!    level) and consumed fields. Numeric fields become JSON numbers when
//!    they parse.
//!
//! The copy pass only checks consumed *source* fields, so an unconsumed raw
//! column that shares its name with another rule's destination overwrites
//! that mapped value.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::trace;

use super::mapping::MappingIndex;
use crate::models::{RawRow, Variation};

/// Catalog-level column, never copied into a variation.
pub const BRAND_FIELD: &str = "brand";

/// Fields emitted as numbers when their value parses as a float.
pub const DEFAULT_NUMERIC_FIELDS: [&str; 4] = [
    "price_buy_net",
    "price_buy_gross",
    "price_sell",
    "discount_rate",
];

/// Set of field names subject to numeric coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericFields(BTreeSet<String>);

impl NumericFields {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for NumericFields {
    fn default() -> Self {
        Self::new(DEFAULT_NUMERIC_FIELDS)
    }
}

/// Builds one [`Variation`] per row against a fixed index and numeric set.
#[derive(Debug, Clone, Copy)]
pub struct VariationBuilder<'a> {
    index: &'a MappingIndex,
    numeric_fields: &'a NumericFields,
}

impl<'a> VariationBuilder<'a> {
    pub fn new(index: &'a MappingIndex, numeric_fields: &'a NumericFields) -> Self {
        Self {
            index,
            numeric_fields,
        }
    }

    /// Transform one row. Neither the row nor the index is modified.
    pub fn build(&self, row: &RawRow) -> Variation {
        let mut variation = Variation::new();
        let mut consumed: HashSet<&str> = HashSet::new();

        for group in self.index.groups() {
            let joined = group.joined_value(row);
            if let Some(target) = group.lookup(&joined) {
                trace!(fields = ?group.fields(), joined = %joined, field = %target.field, "mapping rule fired");
                if target.field != BRAND_FIELD {
                    variation.insert(target.field.as_str(), target.value.as_str());
                }
                consumed.extend(group.fields().iter().map(String::as_str));
            }
        }

        for (name, value) in row.iter() {
            if name == BRAND_FIELD || consumed.contains(name) || value.is_empty() {
                continue;
            }
            if self.numeric_fields.contains(name) {
                let coerced = parse_number(value).unwrap_or_else(|| Value::from(value));
                variation.insert(name, coerced);
            } else {
                variation.insert(name, value);
            }
        }

        variation
    }
}

/// Transform one row with the default numeric field set.
pub fn row_to_variation(row: &RawRow, index: &MappingIndex) -> Variation {
    let numeric_fields = NumericFields::default();
    VariationBuilder::new(index, &numeric_fields).build(row)
}

/// Parse a float, surrounding whitespace and `1_000` digit grouping allowed.
/// Non-finite values have no JSON representation and are rejected.
fn parse_number(value: &str) -> Option<Value> {
    let trimmed = value.trim();
    let parsed: f64 = if trimmed.contains('_') {
        without_digit_separators(trimmed)?.parse().ok()?
    } else {
        trimmed.parse().ok()?
    };
    Number::from_f64(parsed).map(Value::Number)
}

/// Drop underscores that sit between two digits. Any other underscore makes
/// the value non-numeric.
fn without_digit_separators(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'_' {
            let before = i > 0 && bytes[i - 1].is_ascii_digit();
            let after = bytes.get(i + 1).is_some_and(|next| next.is_ascii_digit());
            if !(before && after) {
                return None;
            }
        }
    }
    Some(value.replace('_', ""))
}
