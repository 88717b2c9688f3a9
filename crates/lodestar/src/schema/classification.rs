//! Table-level classification produced by the shape classifier.

use serde::{Deserialize, Serialize};

use super::types::{SchemaPattern, TableType};

/// Structural breakdown of the table, shaped by its table type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableStructure {
    /// Central fact structure: measures plus references out to dimensions.
    Central {
        /// Measure column names.
        measures: Vec<String>,
        /// Dimension-reference column names.
        dimension_refs: Vec<String>,
        /// Foreign-key candidate pairs as (source, target) column names.
        foreign_keys: Vec<(String, String)>,
    },
    /// Descriptive dimension structure.
    Dimensional {
        /// Natural key column, when one was identified.
        natural_key: Option<String>,
        /// Attribute column names.
        attributes: Vec<String>,
        /// Retained hierarchy pairs as (parent, child) column names.
        hierarchies: Vec<(String, String)>,
    },
}

/// Final classification of one table.
///
/// Classification is deterministic and idempotent: the same roles and
/// relationships always produce the same table type, pattern, and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableClassification {
    /// Fact or dimension shape.
    pub table_type: TableType,
    /// Recommended schema pattern.
    pub pattern: SchemaPattern,
    /// Confidence in the recommended pattern (0.0-1.0).
    pub confidence: f64,
    /// Structural breakdown backing the recommendation.
    pub structure: TableStructure,
    /// Human-readable recommendation.
    pub recommendation: String,
}
