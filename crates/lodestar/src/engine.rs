//! Main engine struct and public API.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::{RoleClassifier, TableShapeClassifier};
use crate::ddl::DdlSynthesizer;
use crate::error::{LodestarError, Result};
use crate::input::{DataTable, Parser, ParserConfig, SourceMetadata};
use crate::profile::{ColumnProfiler, PatternRule, default_rules};
use crate::relations::{Relationship, RelationshipDiscoverer};
use crate::schema::{
    ColumnProfile, RoleAssignment, SemanticType, TableArtifact, TableClassification,
};

/// Discovery and classification thresholds.
///
/// The defaults mirror the engine's long-standing constants; they are
/// exposed here rather than hard-coded so callers can tune them per dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum strength before a functional dependency is reported.
    pub fd_strength: f64,
    /// Minimum Jaccard similarity for a foreign-key candidate.
    pub fk_similarity: f64,
    /// Minimum coverage before a hierarchy is retained downstream.
    pub hierarchy_coverage: f64,
    /// Distinct-count ceiling for categorical dimensions.
    pub categorical_cardinality: usize,
    /// Distinct-count ceiling for plain dimensions.
    pub dimension_cardinality: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fd_strength: 0.8,
            fk_similarity: 0.7,
            hierarchy_coverage: 0.7,
            categorical_cardinality: 20,
            dimension_cardinality: 100,
        }
    }
}

/// Configuration for a full inference run, threaded explicitly through every
/// stage.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Values considered per column when electing a semantic type.
    pub sample_size: usize,
    /// Minimum confidence before a semantic type is accepted.
    pub confidence_threshold: f64,
    /// Prioritized semantic-type detection rules.
    pub patterns: Vec<PatternRule>,
    /// Discovery and classification thresholds.
    pub thresholds: Thresholds,
    /// Upstream parser configuration (delimiter, quote, header handling).
    pub parser: ParserConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            confidence_threshold: 0.8,
            patterns: default_rules(),
            thresholds: Thresholds::default(),
            parser: ParserConfig::default(),
        }
    }
}

/// Summary of one inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceSummary {
    /// Total number of columns.
    pub total_columns: usize,
    /// Columns whose semantic type cleared the confidence threshold.
    pub typed_columns: usize,
    /// Relationship candidates discovered.
    pub relationship_count: usize,
    /// Output tables synthesized.
    pub artifact_count: usize,
}

/// Result of inferring a schema design for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceReport {
    /// Name the synthesized tables are derived from.
    pub table_name: String,
    /// Source file metadata when the built-in parser was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,
    /// Column profiles in header order.
    pub profiles: Vec<ColumnProfile>,
    /// Relationship candidates, sorted within each kind.
    pub relationships: Vec<Relationship>,
    /// Role assignments in header order.
    pub roles: Vec<RoleAssignment>,
    /// Table classification.
    pub classification: TableClassification,
    /// Synthesized table definitions (fact first, then dimensions).
    pub artifacts: Vec<TableArtifact>,
    /// COMMENT statements for semantically typed columns.
    pub comments: Vec<String>,
    /// SCD maintenance procedures for dimension tables.
    pub maintenance: Vec<String>,
    /// Run summary.
    pub summary: InferenceSummary,
}

/// The schema inference engine.
///
/// Each stage is a pure function of its predecessor's output; running the
/// same table through twice yields an identical report (modulo source
/// timestamps).
pub struct Lodestar {
    config: EngineConfig,
    parser: Parser,
    profiler: ColumnProfiler,
    discoverer: RelationshipDiscoverer,
    role_classifier: RoleClassifier,
    shape_classifier: TableShapeClassifier,
    synthesizer: DdlSynthesizer,
}

impl Lodestar {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let profiler = ColumnProfiler::new(
            config.patterns.clone(),
            config.sample_size,
            config.confidence_threshold,
        );
        let discoverer = RelationshipDiscoverer::new(
            config.thresholds.fd_strength,
            config.thresholds.fk_similarity,
        );
        let role_classifier = RoleClassifier::new(
            config.thresholds.categorical_cardinality,
            config.thresholds.dimension_cardinality,
        );
        let shape_classifier = TableShapeClassifier::new(config.thresholds.hierarchy_coverage);
        let synthesizer = DdlSynthesizer::new(config.thresholds.hierarchy_coverage);

        Self {
            config,
            parser,
            profiler,
            discoverer,
            role_classifier,
            shape_classifier,
            synthesizer,
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Infer a schema design for an in-memory table.
    ///
    /// Fails fast on input-contract violations (empty or ragged tables);
    /// every other degeneracy is absorbed into the report as low confidence
    /// or unknown types.
    pub fn infer(&self, table_name: &str, table: &DataTable) -> Result<InferenceReport> {
        validate(table)?;

        let profiles = self.profiler.profile_table(table);
        let relationships = self.discoverer.discover(table);
        let roles = self.role_classifier.classify_all(&profiles);
        let classification = self.shape_classifier.classify(&roles, &relationships);
        let synthesis = self.synthesizer.synthesize(
            table_name,
            &classification,
            &profiles,
            &roles,
            &relationships,
        );

        let summary = InferenceSummary {
            total_columns: profiles.len(),
            typed_columns: profiles
                .iter()
                .filter(|p| p.semantic_type != SemanticType::Unknown)
                .count(),
            relationship_count: relationships.len(),
            artifact_count: synthesis.artifacts.len(),
        };

        Ok(InferenceReport {
            table_name: table_name.to_string(),
            source: None,
            profiles,
            relationships,
            roles,
            classification,
            artifacts: synthesis.artifacts,
            comments: synthesis.comments,
            maintenance: synthesis.maintenance,
            summary,
        })
    }

    /// Parse a delimited file with the upstream collaborator, then infer.
    pub fn infer_file(&self, path: impl AsRef<Path>) -> Result<InferenceReport> {
        let path = path.as_ref();
        let (table, source) = self.parser.parse_file(path)?;

        let table_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table".to_string());

        let mut report = self.infer(&table_name, &table)?;
        report.source = Some(source);
        Ok(report)
    }
}

impl Default for Lodestar {
    fn default() -> Self {
        Self::new()
    }
}

/// Input-contract check: the table must be non-empty and rectangular.
fn validate(table: &DataTable) -> Result<()> {
    if table.column_count() == 0 {
        return Err(LodestarError::EmptyTable("no columns".to_string()));
    }
    if table.row_count() == 0 {
        return Err(LodestarError::EmptyTable("no rows".to_string()));
    }

    let expected = table.column_count();
    for (index, row) in table.rows.iter().enumerate() {
        if row.len() != expected {
            return Err(LodestarError::RaggedRow {
                row: index,
                expected,
                actual: row.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaPattern;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            b',',
        )
    }

    #[test]
    fn test_empty_table_is_hard_error() {
        let engine = Lodestar::new();

        let no_columns = DataTable::new(Vec::new(), Vec::new(), b',');
        assert!(matches!(
            engine.infer("t", &no_columns),
            Err(LodestarError::EmptyTable(_))
        ));

        let no_rows = make_table(vec!["a"], vec![]);
        assert!(matches!(
            engine.infer("t", &no_rows),
            Err(LodestarError::EmptyTable(_))
        ));
    }

    #[test]
    fn test_ragged_table_is_hard_error() {
        let engine = Lodestar::new();
        let table = make_table(vec!["a", "b"], vec![vec!["1", "2"], vec!["3"]]);

        match engine.infer("t", &table) {
            Err(LodestarError::RaggedRow {
                row,
                expected,
                actual,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("expected ragged-row error, got {other:?}"),
        }
    }

    #[test]
    fn test_inference_is_idempotent() {
        let engine = Lodestar::new();
        let table = make_table(
            vec!["id", "status"],
            vec![
                vec!["1", "open"],
                vec!["2", "open"],
                vec!["3", "closed"],
                vec!["4", "open"],
            ],
        );

        let first = engine.infer("tickets", &table).unwrap();
        let second = engine.infer("tickets", &table).unwrap();

        assert_eq!(first.classification, second.classification);
        assert_eq!(first.artifacts, second.artifacts);
        assert_eq!(first.profiles, second.profiles);
    }

    #[test]
    fn test_every_table_gets_a_pattern() {
        let engine = Lodestar::new();
        let table = make_table(vec!["x"], vec![vec!["only"], vec!["two"]]);

        let report = engine.infer("tiny", &table).unwrap();

        // Even a degenerate table classifies to something.
        assert!(matches!(
            report.classification.pattern,
            SchemaPattern::Star
                | SchemaPattern::Snowflake
                | SchemaPattern::DimensionTable
                | SchemaPattern::SimpleTable
        ));
        assert!(!report.artifacts.is_empty());
    }

    #[test]
    fn test_summary_counts() {
        let engine = Lodestar::new();
        let table = make_table(
            vec!["contact", "note"],
            vec![
                vec!["a@x.com", "first"],
                vec!["b@x.com", "second"],
                vec!["c@x.com", "third"],
            ],
        );

        let report = engine.infer("leads", &table).unwrap();

        assert_eq!(report.summary.total_columns, 2);
        assert_eq!(report.summary.typed_columns, 1);
        assert_eq!(report.summary.artifact_count, report.artifacts.len());
    }
}
