//! Per-column profile and role assignment values.

use serde::{Deserialize, Serialize};

use super::types::{ColumnRole, ColumnType, SemanticType};

/// Profile of a single column, computed once during profiling and immutable
/// afterward.
///
/// Invariant: `distinct_count + null_count <= total_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name as it appears in the header.
    pub name: String,
    /// Zero-based position in the table.
    pub position: usize,
    /// Elected semantic type.
    pub semantic_type: SemanticType,
    /// Confidence in the elected type (0.0-1.0).
    pub confidence: f64,
    /// Inferred physical type.
    pub column_type: ColumnType,
    /// Total number of cells (including nulls).
    pub total_count: usize,
    /// Number of non-blank cells.
    pub non_blank_count: usize,
    /// Number of distinct non-blank values.
    pub distinct_count: usize,
    /// Number of null/blank cells.
    pub null_count: usize,
    /// First-seen sample of distinct values for display.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    /// Degenerate profile for a column with no usable values.
    pub fn empty(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            position,
            semantic_type: SemanticType::Unknown,
            confidence: 0.0,
            column_type: ColumnType::Unknown,
            total_count: 0,
            non_blank_count: 0,
            distinct_count: 0,
            null_count: 0,
            sample_values: Vec::new(),
        }
    }

    /// Distinct values relative to distinct-plus-null population.
    pub fn uniqueness_ratio(&self) -> f64 {
        let denominator = self.distinct_count + self.null_count;
        if denominator == 0 {
            0.0
        } else {
            self.distinct_count as f64 / denominator as f64
        }
    }

    /// Fraction of cells that are null/blank.
    pub fn null_ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.null_count as f64 / self.total_count as f64
        }
    }
}

/// Structural role assigned to one column; derived from its profile and
/// recomputed whenever profiles change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Column name.
    pub column: String,
    /// Assigned structural role.
    pub role: ColumnRole,
    /// Semantic type carried over from the profile.
    pub semantic_type: SemanticType,
    /// Uniqueness ratio that drove the identifier decision.
    pub uniqueness_ratio: f64,
}
