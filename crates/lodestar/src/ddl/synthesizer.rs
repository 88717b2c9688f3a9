//! Table assembly: turns a classification into named table artifacts,
//! comment statements, and history-tracking maintenance procedures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::mapping::{infer_constraints, sanitize_identifier, sql_type_for};
use crate::relations::Relationship;
use crate::schema::{
    ColumnDefinition, ColumnProfile, ColumnRole, Constraint, RoleAssignment, SchemaPattern,
    SemanticType, SqlType, TableArtifact, TableClassification, TableStructure,
};

/// Everything the synthesizer emits for one inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    /// Output tables in emission order (fact first, then dimensions).
    pub artifacts: Vec<TableArtifact>,
    /// COMMENT statements, one per semantically typed source column.
    pub comments: Vec<String>,
    /// SCD Type-2 maintenance procedures, one per dimension table.
    pub maintenance: Vec<String>,
}

/// Synthesizes DDL from the classified structure.
#[derive(Debug, Clone)]
pub struct DdlSynthesizer {
    hierarchy_coverage_threshold: f64,
}

impl DdlSynthesizer {
    /// Create a synthesizer; hierarchies above the coverage threshold are
    /// normalized out when the snowflake pattern was selected.
    pub fn new(hierarchy_coverage_threshold: f64) -> Self {
        Self {
            hierarchy_coverage_threshold,
        }
    }

    /// Synthesize artifacts for one classified table.
    ///
    /// A structure missing an expected part (for instance a dimension table
    /// with no discovered natural key) degrades to a minimal generic table
    /// rather than failing.
    pub fn synthesize(
        &self,
        table_name: &str,
        classification: &TableClassification,
        profiles: &[ColumnProfile],
        roles: &[RoleAssignment],
        relationships: &[Relationship],
    ) -> Synthesis {
        let base = sanitize_identifier(table_name);
        let profile_by_name: HashMap<&str, &ColumnProfile> =
            profiles.iter().map(|p| (p.name.as_str(), p)).collect();
        let role_by_name: HashMap<&str, ColumnRole> =
            roles.iter().map(|r| (r.column.as_str(), r.role)).collect();

        let (artifacts, maintenance) = match (&classification.pattern, &classification.structure) {
            (
                SchemaPattern::Star | SchemaPattern::Snowflake,
                TableStructure::Central {
                    measures,
                    dimension_refs,
                    ..
                },
            ) => self.fact_tables(
                &base,
                measures,
                dimension_refs,
                &profile_by_name,
                &role_by_name,
                classification.pattern == SchemaPattern::Snowflake,
                relationships,
            ),
            (
                SchemaPattern::DimensionTable,
                TableStructure::Dimensional {
                    natural_key: Some(natural_key),
                    attributes,
                    ..
                },
            ) if profile_by_name.contains_key(natural_key.as_str()) => self.dimension_table(
                &base,
                natural_key,
                attributes,
                &profile_by_name,
                &role_by_name,
            ),
            _ => (
                vec![simple_table(&base, profiles, &role_by_name)],
                Vec::new(),
            ),
        };

        let comments = comment_statements(&base, profiles);

        Synthesis {
            artifacts,
            comments,
            maintenance,
        }
    }

    /// Assemble the central fact table plus one dimension table per
    /// dimension reference.
    #[allow(clippy::too_many_arguments)]
    fn fact_tables(
        &self,
        base: &str,
        measures: &[String],
        dimension_refs: &[String],
        profiles: &HashMap<&str, &ColumnProfile>,
        roles: &HashMap<&str, ColumnRole>,
        snowflake: bool,
        relationships: &[Relationship],
    ) -> (Vec<TableArtifact>, Vec<String>) {
        let fact_name = format!("fact_{base}");
        let mut columns = vec![surrogate_key(&format!("{base}_key"))];

        for measure in measures {
            let Some(profile) = profiles.get(measure.as_str()) else {
                continue;
            };
            columns.push(source_column(profile, ColumnRole::Measure));
        }

        let mut key_columns = Vec::new();
        for dim in dimension_refs {
            let stem = sanitize_identifier(dim);
            let key_name = format!("{stem}_key");
            let role = roles.get(dim.as_str()).copied();
            columns.push(ColumnDefinition {
                name: key_name.clone(),
                sql_type: SqlType::BigInt,
                constraints: vec![Constraint::References {
                    table: format!("dim_{stem}"),
                    column: key_name.clone(),
                }],
                role,
                semantic_type: SemanticType::Unknown,
                source_column: Some(dim.clone()),
            });
            key_columns.push(key_name);
        }

        let mut index_statements = Vec::new();
        let measure_names: Vec<String> = measures
            .iter()
            .filter(|m| profiles.contains_key(m.as_str()))
            .map(|m| sanitize_identifier(m))
            .collect();
        if !measure_names.is_empty() {
            index_statements.push(format!(
                "CREATE INDEX idx_{fact_name}_measures ON {fact_name} ({});",
                measure_names.join(", ")
            ));
        }
        if !key_columns.is_empty() {
            index_statements.push(format!(
                "CREATE INDEX idx_{fact_name}_keys ON {fact_name} ({});",
                key_columns.join(", ")
            ));
        }

        let mut artifacts = vec![TableArtifact {
            name: fact_name.clone(),
            create_statement: render_create(&fact_name, &columns),
            index_statements,
            columns,
        }];
        let mut maintenance = Vec::new();

        // Under the snowflake pattern, a retained hierarchy between two
        // dimension references links the child dimension to its parent.
        let parent_of: HashMap<&str, &str> = if snowflake {
            relationships
                .iter()
                .filter_map(|c| match c {
                    Relationship::Hierarchy {
                        parent,
                        child,
                        coverage,
                    } if *coverage > self.hierarchy_coverage_threshold
                        && dimension_refs.contains(parent)
                        && dimension_refs.contains(child) =>
                    {
                        Some((child.as_str(), parent.as_str()))
                    }
                    _ => None,
                })
                .collect()
        } else {
            HashMap::new()
        };

        for dim in dimension_refs {
            let Some(profile) = profiles.get(dim.as_str()) else {
                continue;
            };
            let role = roles
                .get(dim.as_str())
                .copied()
                .unwrap_or(ColumnRole::Dimension);
            let parent = parent_of.get(dim.as_str()).copied();
            let (artifact, procedure) = self.reference_dimension(profile, role, parent);
            artifacts.push(artifact);
            maintenance.push(procedure);
        }

        (artifacts, maintenance)
    }

    /// One dimension table backing a fact-table reference: surrogate key,
    /// the source column as natural key, SCD metadata, and an optional link
    /// to a parent dimension.
    fn reference_dimension(
        &self,
        profile: &ColumnProfile,
        role: ColumnRole,
        parent: Option<&str>,
    ) -> (TableArtifact, String) {
        let stem = sanitize_identifier(&profile.name);
        let dim_name = format!("dim_{stem}");
        let natural_name = stem.clone();

        let mut columns = vec![
            surrogate_key(&format!("{stem}_key")),
            ColumnDefinition {
                name: natural_name.clone(),
                sql_type: sql_type_for(profile, role),
                constraints: vec![Constraint::NotNull, Constraint::Unique],
                role: Some(role),
                semantic_type: profile.semantic_type,
                source_column: Some(profile.name.clone()),
            },
        ];

        if let Some(parent) = parent {
            let parent_stem = sanitize_identifier(parent);
            let key_name = format!("{parent_stem}_key");
            columns.push(ColumnDefinition {
                name: key_name.clone(),
                sql_type: SqlType::BigInt,
                constraints: vec![Constraint::References {
                    table: format!("dim_{parent_stem}"),
                    column: key_name,
                }],
                role: None,
                semantic_type: SemanticType::Unknown,
                source_column: Some(parent.to_string()),
            });
        }

        columns.extend(scd_columns());

        let index_statements = dimension_indexes(&dim_name, &natural_name);
        let procedure = scd_maintenance(&dim_name, &natural_name);

        (
            TableArtifact {
                name: dim_name.clone(),
                create_statement: render_create(&dim_name, &columns),
                index_statements,
                columns,
            },
            procedure,
        )
    }

    /// Assemble a standalone dimension table for a dimension-shaped source
    /// table.
    fn dimension_table(
        &self,
        base: &str,
        natural_key: &str,
        attributes: &[String],
        profiles: &HashMap<&str, &ColumnProfile>,
        roles: &HashMap<&str, ColumnRole>,
    ) -> (Vec<TableArtifact>, Vec<String>) {
        let dim_name = format!("dim_{base}");
        let mut columns = vec![surrogate_key(&format!("{base}_key"))];

        let natural_name = sanitize_identifier(natural_key);
        if let Some(profile) = profiles.get(natural_key) {
            let role = roles
                .get(natural_key)
                .copied()
                .unwrap_or(ColumnRole::Identifier);
            columns.push(ColumnDefinition {
                name: natural_name.clone(),
                sql_type: sql_type_for(profile, role),
                constraints: vec![Constraint::NotNull, Constraint::Unique],
                role: Some(role),
                semantic_type: profile.semantic_type,
                source_column: Some(natural_key.to_string()),
            });
        }

        for attribute in attributes {
            let Some(profile) = profiles.get(attribute.as_str()) else {
                continue;
            };
            let role = roles
                .get(attribute.as_str())
                .copied()
                .unwrap_or(ColumnRole::Dimension);
            columns.push(source_column(profile, role));
        }

        columns.extend(scd_columns());

        let index_statements = dimension_indexes(&dim_name, &natural_name);
        let maintenance = vec![scd_maintenance(&dim_name, &natural_name)];

        (
            vec![TableArtifact {
                name: dim_name.clone(),
                create_statement: render_create(&dim_name, &columns),
                index_statements,
                columns,
            }],
            maintenance,
        )
    }
}

/// Minimal generic table: surrogate id plus every profiled column.
fn simple_table(
    base: &str,
    profiles: &[ColumnProfile],
    roles: &HashMap<&str, ColumnRole>,
) -> TableArtifact {
    let mut columns = vec![surrogate_key(&format!("{base}_id"))];
    for profile in profiles {
        let role = roles
            .get(profile.name.as_str())
            .copied()
            .unwrap_or(ColumnRole::Dimension);
        columns.push(source_column(profile, role));
    }

    TableArtifact {
        name: base.to_string(),
        create_statement: render_create(base, &columns),
        index_statements: Vec::new(),
        columns,
    }
}

/// Map one source column into a definition with inferred constraints.
fn source_column(profile: &ColumnProfile, role: ColumnRole) -> ColumnDefinition {
    ColumnDefinition {
        name: sanitize_identifier(&profile.name),
        sql_type: sql_type_for(profile, role),
        constraints: infer_constraints(profile, role),
        role: Some(role),
        semantic_type: profile.semantic_type,
        source_column: Some(profile.name.clone()),
    }
}

/// Auto-incrementing surrogate primary key.
fn surrogate_key(name: &str) -> ColumnDefinition {
    ColumnDefinition {
        name: name.to_string(),
        sql_type: SqlType::BigSerial,
        constraints: vec![Constraint::PrimaryKey],
        role: None,
        semantic_type: SemanticType::Unknown,
        source_column: None,
    }
}

/// The three fixed slowly-changing-dimension metadata columns.
fn scd_columns() -> Vec<ColumnDefinition> {
    let scd = |name: &str, sql_type: SqlType, default: &str| ColumnDefinition {
        name: name.to_string(),
        sql_type,
        constraints: vec![
            Constraint::NotNull,
            Constraint::Default {
                value: default.to_string(),
            },
        ],
        role: None,
        semantic_type: SemanticType::Unknown,
        source_column: None,
    };

    vec![
        scd("effective_date", SqlType::Date, "CURRENT_DATE"),
        scd("expiry_date", SqlType::Date, "'9999-12-31'"),
        scd("is_current", SqlType::Boolean, "TRUE"),
    ]
}

/// Standard dimension-table indexes: natural key plus a partial index over
/// the current rows.
fn dimension_indexes(dim_name: &str, natural_name: &str) -> Vec<String> {
    vec![
        format!("CREATE INDEX idx_{dim_name}_natural ON {dim_name} ({natural_name});"),
        format!(
            "CREATE INDEX idx_{dim_name}_current ON {dim_name} (is_current) WHERE is_current;"
        ),
    ]
}

/// Render a CREATE TABLE statement from column definitions.
fn render_create(name: &str, columns: &[ColumnDefinition]) -> String {
    let body: Vec<String> = columns.iter().map(|c| format!("    {}", c.render())).collect();
    format!("CREATE TABLE {} (\n{}\n);", name, body.join(",\n"))
}

/// Type-2 history maintenance: close the previously current row for a
/// natural key before the new row lands as current.
fn scd_maintenance(dim_name: &str, natural_name: &str) -> String {
    format!(
        "CREATE OR REPLACE FUNCTION {dim_name}_close_current() RETURNS trigger AS $$\n\
         BEGIN\n\
         \u{20}   UPDATE {dim_name}\n\
         \u{20}   SET expiry_date = CURRENT_DATE, is_current = FALSE\n\
         \u{20}   WHERE {natural_name} = NEW.{natural_name} AND is_current;\n\
         \u{20}   RETURN NEW;\n\
         END;\n\
         $$ LANGUAGE plpgsql;\n\
         CREATE TRIGGER {dim_name}_scd\n\
         BEFORE INSERT ON {dim_name}\n\
         FOR EACH ROW EXECUTE FUNCTION {dim_name}_close_current();"
    )
}

/// One COMMENT statement per semantically typed source column.
fn comment_statements(base: &str, profiles: &[ColumnProfile]) -> Vec<String> {
    profiles
        .iter()
        .filter(|p| p.semantic_type != SemanticType::Unknown)
        .map(|p| {
            format!(
                "COMMENT ON COLUMN {}.{} IS '{} values detected at {:.0}% confidence';",
                base,
                sanitize_identifier(&p.name),
                p.semantic_type,
                p.confidence * 100.0
            )
        })
        .collect()
}
