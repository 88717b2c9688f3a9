//! Structural role assignment from column profiles.

use crate::schema::{ColumnProfile, ColumnRole, RoleAssignment, SemanticType};

/// Uniqueness ratio above which a column reads as a row identifier.
const IDENTIFIER_UNIQUENESS: f64 = 0.8;

/// Assigns each column a structural role. The rule chain is ordered; the
/// first matching rule wins.
#[derive(Debug, Clone)]
pub struct RoleClassifier {
    categorical_cardinality: usize,
    dimension_cardinality: usize,
}

impl RoleClassifier {
    /// Create a classifier with the given cardinality cutoffs.
    pub fn new(categorical_cardinality: usize, dimension_cardinality: usize) -> Self {
        Self {
            categorical_cardinality,
            dimension_cardinality,
        }
    }

    /// Classify every profile in order.
    pub fn classify_all(&self, profiles: &[ColumnProfile]) -> Vec<RoleAssignment> {
        profiles.iter().map(|p| self.classify(p)).collect()
    }

    /// Classify a single column.
    pub fn classify(&self, profile: &ColumnProfile) -> RoleAssignment {
        let uniqueness_ratio = profile.uniqueness_ratio();

        let role = if uniqueness_ratio > IDENTIFIER_UNIQUENESS {
            ColumnRole::Identifier
        } else if matches!(
            profile.semantic_type,
            SemanticType::Email | SemanticType::Phone | SemanticType::Url
        ) {
            ColumnRole::Dimension
        } else if matches!(profile.semantic_type, SemanticType::Date | SemanticType::Time) {
            ColumnRole::TemporalDimension
        } else if profile.semantic_type == SemanticType::Currency {
            ColumnRole::Measure
        } else if profile.distinct_count < self.categorical_cardinality {
            ColumnRole::CategoricalDimension
        } else if profile.distinct_count < self.dimension_cardinality {
            ColumnRole::Dimension
        } else {
            ColumnRole::Measure
        };

        RoleAssignment {
            column: profile.name.clone(),
            role,
            semantic_type: profile.semantic_type,
            uniqueness_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnType;

    fn profile(
        name: &str,
        semantic_type: SemanticType,
        distinct: usize,
        nulls: usize,
        total: usize,
    ) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            position: 0,
            semantic_type,
            confidence: if semantic_type == SemanticType::Unknown {
                0.0
            } else {
                1.0
            },
            column_type: ColumnType::Text,
            total_count: total,
            non_blank_count: total - nulls,
            distinct_count: distinct,
            null_count: nulls,
            sample_values: Vec::new(),
        }
    }

    fn classifier() -> RoleClassifier {
        RoleClassifier::new(20, 100)
    }

    #[test]
    fn test_unique_column_is_identifier() {
        let p = profile("order_id", SemanticType::Unknown, 100, 0, 100);
        assert_eq!(classifier().classify(&p).role, ColumnRole::Identifier);
    }

    #[test]
    fn test_identifier_wins_over_semantic_type() {
        // Fully unique emails still classify as the row identifier.
        let p = profile("email", SemanticType::Email, 50, 0, 50);
        assert_eq!(classifier().classify(&p).role, ColumnRole::Identifier);
    }

    #[test]
    fn test_email_is_dimension() {
        let p = profile("contact", SemanticType::Email, 10, 40, 100);
        assert_eq!(classifier().classify(&p).role, ColumnRole::Dimension);
    }

    #[test]
    fn test_date_is_temporal_dimension() {
        let p = profile("order_date", SemanticType::Date, 12, 40, 100);
        assert_eq!(
            classifier().classify(&p).role,
            ColumnRole::TemporalDimension
        );
    }

    #[test]
    fn test_currency_is_measure() {
        let p = profile("price", SemanticType::Currency, 15, 40, 100);
        assert_eq!(classifier().classify(&p).role, ColumnRole::Measure);
    }

    #[test]
    fn test_cardinality_cutoffs() {
        let categorical = profile("status", SemanticType::Unknown, 4, 50, 100);
        let dimension = profile("city", SemanticType::Unknown, 60, 60, 200);
        let measure = profile("note", SemanticType::Unknown, 150, 500, 1000);

        let classifier = classifier();
        assert_eq!(
            classifier.classify(&categorical).role,
            ColumnRole::CategoricalDimension
        );
        assert_eq!(classifier.classify(&dimension).role, ColumnRole::Dimension);
        assert_eq!(classifier.classify(&measure).role, ColumnRole::Measure);
    }

    #[test]
    fn test_uniqueness_ratio_uses_nulls() {
        // 8 distinct over 8 + 2 nulls: exactly 0.8, not above it.
        let p = profile("code", SemanticType::Unknown, 8, 2, 10);
        let assignment = classifier().classify(&p);
        assert!((assignment.uniqueness_ratio - 0.8).abs() < f64::EPSILON);
        assert_ne!(assignment.role, ColumnRole::Identifier);
    }
}
