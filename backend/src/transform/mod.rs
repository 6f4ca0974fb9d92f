//! Transformation module.
//!
//! This module handles pricat to catalog transformation:
//! - Mapping: Rule index keyed by source field tuples
//! - Variation: One pricat row to one variation record
//! - Grouper: Variations grouped into articles under one brand
//! - Pipeline: Main transformation pipeline

pub mod grouper;
pub mod mapping;
pub mod pipeline;
pub mod variation;

pub use grouper::{build_catalog, AssembledCatalog, CatalogAssembler};
pub use mapping::{build_index, load_mappings_index, MappingIndex, MappingTarget, RuleGroup};
pub use pipeline::*;
pub use variation::{row_to_variation, NumericFields, VariationBuilder};
