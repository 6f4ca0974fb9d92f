//! Mapping rule index.
//!
//! Rules are grouped by the tuple of source field names they read, then keyed
//! by the literal value those fields must produce once joined with `|`:
//!
//! ```text
//! source_type                source       destination_type   destination
//! season                     winter       season             Winter
//! size_group_code|size_code  EU|38        size               European size 38
//!
//! ("season",)                    → { "winter" → (season, Winter) }
//! ("size_group_code","size_code") → { "EU|38"  → (size, European size 38) }
//! ```
//!
//! Tuples iterate in the order they first appear in the rule file. When two
//! tuples fire for the same row and write the same destination field, the
//! later tuple wins.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{CsvResult, MappingError, MappingResult};
use crate::models::{MappingRule, RawRow};
use crate::parser::RowReader;

/// Separator between field names in `source_type`, and between row values
/// when probing a combined rule.
pub const FIELD_SEPARATOR: char = '|';

/// Destination written when a rule fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingTarget {
    pub field: String,
    pub value: String,
}

/// All rules reading the same ordered tuple of source fields.
#[derive(Debug, Clone)]
pub struct RuleGroup {
    fields: Vec<String>,
    targets: HashMap<String, MappingTarget>,
}

impl RuleGroup {
    fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            targets: HashMap::new(),
        }
    }

    /// Source field names, in join order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Find the rule whose literal equals `joined`.
    pub fn lookup(&self, joined: &str) -> Option<&MappingTarget> {
        self.targets.get(joined)
    }

    /// Join this group's field values from `row`, missing fields read as empty.
    pub fn joined_value(&self, row: &RawRow) -> String {
        let mut joined = String::new();
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                joined.push(FIELD_SEPARATOR);
            }
            joined.push_str(row.value(field));
        }
        joined
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Two-level lookup: field tuple → joined literal → destination.
#[derive(Debug, Clone, Default)]
pub struct MappingIndex {
    groups: Vec<RuleGroup>,
    positions: HashMap<Vec<String>, usize>,
}

impl MappingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from rule rows. `row` numbers in errors are 1-based.
    pub fn from_rules<I>(rules: I) -> MappingResult<Self>
    where
        I: IntoIterator<Item = MappingRule>,
    {
        let mut index = Self::new();
        for (i, rule) in rules.into_iter().enumerate() {
            index.add_rule(&rule, i + 1)?;
        }
        Ok(index)
    }

    /// Validate one rule and insert it.
    pub fn add_rule(&mut self, rule: &MappingRule, row: usize) -> MappingResult<()> {
        let source_type = rule.source_type.trim();
        let destination_type = rule.destination_type.trim();

        if source_type.is_empty() || destination_type.is_empty() {
            return Err(MappingError::InvalidMappingRule {
                row,
                reason: "source_type/destination_type empty",
                rule: rule.to_string(),
            });
        }

        let fields: Vec<String> = source_type
            .split(FIELD_SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();

        if fields.is_empty() {
            return Err(MappingError::InvalidMappingRule {
                row,
                reason: "empty fields",
                rule: rule.to_string(),
            });
        }

        trace!(row, fields = ?fields, source = rule.source.trim(), "indexed mapping rule");

        self.insert(
            fields,
            rule.source.trim().to_string(),
            MappingTarget {
                field: destination_type.to_string(),
                value: rule.destination.trim().to_string(),
            },
        );
        Ok(())
    }

    /// Insert a destination for `fields` + `literal`. An existing entry is replaced.
    pub fn insert(&mut self, fields: Vec<String>, literal: String, target: MappingTarget) {
        let position = match self.positions.get(&fields) {
            Some(&position) => position,
            None => {
                let position = self.groups.len();
                self.positions.insert(fields.clone(), position);
                self.groups.push(RuleGroup::new(fields));
                position
            }
        };
        self.groups[position].targets.insert(literal, target);
    }

    /// Rules for an exact field tuple.
    pub fn get(&self, fields: &[String]) -> Option<&RuleGroup> {
        self.positions.get(fields).map(|&i| &self.groups[i])
    }

    /// Direct two-level lookup.
    pub fn lookup(&self, fields: &[String], literal: &str) -> Option<&MappingTarget> {
        self.get(fields)?.lookup(literal)
    }

    /// Rule groups in first-appearance order.
    pub fn groups(&self) -> impl Iterator<Item = &RuleGroup> {
        self.groups.iter()
    }

    /// Number of distinct field tuples.
    pub fn tuple_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of distinct (tuple, literal) rules after overwrites.
    pub fn rule_count(&self) -> usize {
        self.groups.iter().map(RuleGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Build an index from a sequence of raw rule rows.
pub fn build_index<I>(rows: I) -> MappingResult<MappingIndex>
where
    I: IntoIterator<Item = CsvResult<RawRow>>,
{
    let mut index = MappingIndex::new();
    for (i, row) in rows.into_iter().enumerate() {
        let rule = MappingRule::from_row(&row?);
        index.add_rule(&rule, i + 1)?;
    }
    Ok(index)
}

/// Read a mapping rule file (`source_type;source;destination_type;destination`).
pub fn load_mappings_index<P: AsRef<Path>>(path: P, delimiter: u8) -> MappingResult<MappingIndex> {
    let reader = RowReader::from_path(path.as_ref(), delimiter)?;
    let index = build_index(reader)?;
    debug!(
        path = %path.as_ref().display(),
        tuples = index.tuple_count(),
        rules = index.rule_count(),
        "loaded mapping index"
    );
    Ok(index)
}
