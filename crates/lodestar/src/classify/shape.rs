//! Table-shape classification: fact/dimension typing and schema-pattern
//! hypothesis scoring.

use crate::relations::Relationship;
use crate::schema::{
    ColumnRole, RoleAssignment, SchemaPattern, TableClassification, TableStructure, TableType,
};

/// Fixed confidence for the simple-table fallback.
const SIMPLE_TABLE_CONFIDENCE: f64 = 0.3;
/// Fraction of identifier columns above which a table reads as a dimension.
const IDENTIFIER_SHARE: f64 = 0.3;

/// Aggregates roles and relationships into a table classification.
#[derive(Debug, Clone)]
pub struct TableShapeClassifier {
    hierarchy_coverage_threshold: f64,
}

impl TableShapeClassifier {
    /// Create a classifier retaining hierarchies above the given coverage.
    pub fn new(hierarchy_coverage_threshold: f64) -> Self {
        Self {
            hierarchy_coverage_threshold,
        }
    }

    /// Classify the table from its role assignments and relationship
    /// candidates. Always produces some pattern; simple-table is the
    /// guaranteed fallback.
    pub fn classify(
        &self,
        roles: &[RoleAssignment],
        relationships: &[Relationship],
    ) -> TableClassification {
        let measures: Vec<&RoleAssignment> = roles
            .iter()
            .filter(|r| r.role == ColumnRole::Measure)
            .collect();
        let identifiers: Vec<&RoleAssignment> = roles
            .iter()
            .filter(|r| r.role == ColumnRole::Identifier)
            .collect();
        let dimensions: Vec<&RoleAssignment> =
            roles.iter().filter(|r| r.role.is_dimension()).collect();

        let foreign_keys: Vec<(String, String)> = relationships
            .iter()
            .filter_map(|c| match c {
                Relationship::ForeignKeyCandidate { source, target, .. } => {
                    Some((source.clone(), target.clone()))
                }
                _ => None,
            })
            .collect();
        let retained_hierarchies: Vec<(String, String)> = relationships
            .iter()
            .filter_map(|c| match c {
                Relationship::Hierarchy {
                    parent,
                    child,
                    coverage,
                } if *coverage > self.hierarchy_coverage_threshold => {
                    Some((parent.clone(), child.clone()))
                }
                _ => None,
            })
            .collect();

        let table_type = infer_table_type(
            measures.len(),
            dimensions.len(),
            identifiers.len(),
            foreign_keys.len(),
            roles.len(),
        );

        let star = star_confidence(measures.len(), dimensions.len(), foreign_keys.len());

        let natural_key = identifiers.first().map(|r| r.column.clone());
        let attribute_count = roles.len() - identifiers.len();
        let dimension = dimension_confidence(natural_key.is_some(), attribute_count);

        // Snowflake is only a hypothesis for fact-shaped tables that carry at
        // least one retained hierarchy.
        let snowflake = if table_type == TableType::Fact && !retained_hierarchies.is_empty() {
            let bonus = (0.05 * retained_hierarchies.len() as f64).min(0.2);
            Some((star + bonus).min(1.0))
        } else {
            None
        };

        let (pattern, confidence) = match snowflake {
            Some(snow) if snow > star => (SchemaPattern::Snowflake, snow),
            _ if star > 0.5 => (SchemaPattern::Star, star),
            _ if dimension > 0.5 => (SchemaPattern::DimensionTable, dimension),
            _ => (SchemaPattern::SimpleTable, SIMPLE_TABLE_CONFIDENCE),
        };

        let structure = match table_type {
            TableType::Fact => TableStructure::Central {
                measures: measures.iter().map(|r| r.column.clone()).collect(),
                dimension_refs: dimensions.iter().map(|r| r.column.clone()).collect(),
                foreign_keys,
            },
            TableType::Dimension => TableStructure::Dimensional {
                natural_key,
                attributes: roles
                    .iter()
                    .filter(|r| r.role != ColumnRole::Identifier)
                    .map(|r| r.column.clone())
                    .collect(),
                hierarchies: retained_hierarchies,
            },
        };

        let recommendation = recommendation(pattern, confidence);

        TableClassification {
            table_type,
            pattern,
            confidence,
            structure,
            recommendation,
        }
    }
}

/// Fact/dimension decision over role and candidate counts.
fn infer_table_type(
    measures: usize,
    dimensions: usize,
    identifiers: usize,
    foreign_keys: usize,
    total_columns: usize,
) -> TableType {
    if measures > 2 && foreign_keys > 1 {
        TableType::Fact
    } else if dimensions > measures && foreign_keys < 2 {
        TableType::Dimension
    } else if total_columns > 0 && identifiers as f64 > IDENTIFIER_SHARE * total_columns as f64 {
        TableType::Dimension
    } else {
        TableType::Fact
    }
}

/// Tiered star-pattern confidence.
fn star_confidence(measures: usize, dimension_refs: usize, foreign_keys: usize) -> f64 {
    if measures >= 2 && dimension_refs >= 3 && foreign_keys >= 2 {
        0.9
    } else if measures >= 1 && dimension_refs >= 2 && foreign_keys >= 1 {
        0.7
    } else if measures >= 1 && dimension_refs >= 1 {
        0.5
    } else {
        0.2
    }
}

/// Tiered dimension-pattern confidence.
fn dimension_confidence(has_natural_key: bool, attributes: usize) -> f64 {
    match (has_natural_key, attributes) {
        (true, n) if n >= 3 => 0.8,
        (true, n) if n >= 2 => 0.6,
        (true, _) => 0.4,
        (false, _) => 0.2,
    }
}

/// Human-readable recommendation for the selected pattern.
fn recommendation(pattern: SchemaPattern, confidence: f64) -> String {
    match pattern {
        SchemaPattern::Star => format!(
            "Star schema recommended at {:.0}% confidence: model this table as a central fact with denormalized dimensions.",
            confidence * 100.0
        ),
        SchemaPattern::Snowflake => format!(
            "Snowflake schema recommended at {:.0}% confidence: normalize the detected hierarchies into parent/child dimensions.",
            confidence * 100.0
        ),
        SchemaPattern::DimensionTable => format!(
            "Dimension table recommended at {:.0}% confidence: key the descriptive attributes by the natural key.",
            confidence * 100.0
        ),
        SchemaPattern::SimpleTable => {
            "Low confidence: no schema pattern cleared its threshold; emitting a generic table for manual review.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SemanticType;

    fn role(name: &str, role: ColumnRole) -> RoleAssignment {
        RoleAssignment {
            column: name.to_string(),
            role,
            semantic_type: SemanticType::Unknown,
            uniqueness_ratio: 0.5,
        }
    }

    fn fk(source: &str, target: &str, similarity: f64) -> Relationship {
        Relationship::ForeignKeyCandidate {
            source: source.to_string(),
            target: target.to_string(),
            similarity,
        }
    }

    fn hierarchy(parent: &str, child: &str, coverage: f64) -> Relationship {
        Relationship::Hierarchy {
            parent: parent.to_string(),
            child: child.to_string(),
            coverage,
        }
    }

    fn classifier() -> TableShapeClassifier {
        TableShapeClassifier::new(0.7)
    }

    #[test]
    fn test_star_scenario_scores_high() {
        // 2 measures, 3 dimensions, 2 foreign-key candidates: 0.9 star.
        let roles = vec![
            role("qty", ColumnRole::Measure),
            role("total", ColumnRole::Measure),
            role("status", ColumnRole::CategoricalDimension),
            role("city", ColumnRole::Dimension),
            role("day", ColumnRole::TemporalDimension),
        ];
        let relationships = vec![fk("city", "region", 0.8), fk("status", "phase", 0.75)];

        let classification = classifier().classify(&roles, &relationships);

        assert_eq!(classification.pattern, SchemaPattern::Star);
        assert!((classification.confidence - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_simple_table_fallback() {
        // 1 identifier + 1 dimension, no measures, no foreign keys: both
        // detectors stay at or below 0.5 and the fallback fires.
        let roles = vec![
            role("id", ColumnRole::Identifier),
            role("label", ColumnRole::Dimension),
        ];

        let classification = classifier().classify(&roles, &[]);

        assert_eq!(classification.pattern, SchemaPattern::SimpleTable);
        assert!((classification.confidence - 0.3).abs() < f64::EPSILON);
        assert!(classification.recommendation.contains("Low confidence"));
    }

    #[test]
    fn test_dimension_table_selection() {
        let roles = vec![
            role("customer_id", ColumnRole::Identifier),
            role("tier", ColumnRole::CategoricalDimension),
            role("city", ColumnRole::Dimension),
            role("joined", ColumnRole::TemporalDimension),
        ];

        let classification = classifier().classify(&roles, &[]);

        assert_eq!(classification.table_type, TableType::Dimension);
        assert_eq!(classification.pattern, SchemaPattern::DimensionTable);
        assert!((classification.confidence - 0.8).abs() < f64::EPSILON);
        match &classification.structure {
            TableStructure::Dimensional {
                natural_key,
                attributes,
                ..
            } => {
                assert_eq!(natural_key.as_deref(), Some("customer_id"));
                assert_eq!(attributes.len(), 3);
            }
            _ => panic!("expected dimensional structure"),
        }
    }

    #[test]
    fn test_snowflake_beats_star_with_hierarchy() {
        let roles = vec![
            role("qty", ColumnRole::Measure),
            role("total", ColumnRole::Measure),
            role("subcat", ColumnRole::CategoricalDimension),
            role("cat", ColumnRole::CategoricalDimension),
            role("day", ColumnRole::TemporalDimension),
        ];
        let relationships = vec![
            fk("subcat", "cat", 0.75),
            fk("cat", "dept", 0.72),
            hierarchy("cat", "subcat", 0.75),
        ];

        let classification = classifier().classify(&roles, &relationships);

        assert_eq!(classification.pattern, SchemaPattern::Snowflake);
        assert!((classification.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_low_coverage_hierarchy_not_retained() {
        let roles = vec![
            role("qty", ColumnRole::Measure),
            role("total", ColumnRole::Measure),
            role("subcat", ColumnRole::CategoricalDimension),
            role("cat", ColumnRole::CategoricalDimension),
            role("day", ColumnRole::TemporalDimension),
        ];
        let relationships = vec![
            fk("subcat", "cat", 0.75),
            fk("cat", "dept", 0.72),
            hierarchy("cat", "subcat", 0.6),
        ];

        let classification = classifier().classify(&roles, &relationships);

        assert_eq!(classification.pattern, SchemaPattern::Star);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let roles = vec![
            role("qty", ColumnRole::Measure),
            role("status", ColumnRole::CategoricalDimension),
            role("city", ColumnRole::Dimension),
        ];
        let relationships = vec![fk("city", "region", 0.8)];

        let classifier = classifier();
        let first = classifier.classify(&roles, &relationships);
        let second = classifier.classify(&roles, &relationships);

        assert_eq!(first, second);
    }

    #[test]
    fn test_identifier_share_forces_dimension_type() {
        let roles = vec![
            role("id", ColumnRole::Identifier),
            role("code", ColumnRole::Identifier),
            role("qty", ColumnRole::Measure),
            role("total", ColumnRole::Measure),
        ];
        let relationships = vec![fk("a", "b", 0.8), fk("c", "d", 0.8)];

        let classification = classifier().classify(&roles, &relationships);

        assert_eq!(classification.table_type, TableType::Dimension);
    }
}
