//! Total mappings from inferred types and roles to PostgreSQL column types,
//! plus single-column constraint inference.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{ColumnProfile, ColumnRole, ColumnType, Constraint, SemanticType, SqlType};

/// Null fraction at or above which NOT NULL is withheld.
const NOT_NULL_MAX_RATIO: f64 = 0.10;
/// Minimum distinct values before UNIQUE inference is trusted.
const UNIQUE_MIN_DISTINCT: usize = 5;

static IDENTIFIER_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(id|key|code|number)").unwrap());

/// Normalize a source name into a SQL identifier: lowercased, with every
/// character outside `[A-Za-z0-9_]` replaced by an underscore.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Map a profiled column to its storage type.
///
/// The semantic type takes priority; otherwise the physical type decides,
/// with free text sized by role and cardinality.
pub fn sql_type_for(profile: &ColumnProfile, role: ColumnRole) -> SqlType {
    match profile.semantic_type {
        SemanticType::Email => SqlType::Varchar { length: 255 },
        SemanticType::Phone => SqlType::Varchar { length: 20 },
        SemanticType::Currency => SqlType::Numeric {
            precision: 15,
            scale: 2,
        },
        SemanticType::Date => SqlType::Date,
        SemanticType::Time => SqlType::Time,
        SemanticType::Url => SqlType::Text,
        SemanticType::ZipCode => SqlType::Varchar { length: 10 },
        SemanticType::Ssn => SqlType::Char { length: 11 },
        SemanticType::Unknown => match profile.column_type {
            ColumnType::Integer => SqlType::BigInt,
            ColumnType::Decimal => SqlType::Numeric {
                precision: 15,
                scale: 4,
            },
            ColumnType::Boolean => SqlType::Boolean,
            ColumnType::Date => SqlType::Date,
            ColumnType::Time => SqlType::Time,
            ColumnType::Timestamp => SqlType::Timestamp,
            ColumnType::Text => SqlType::Varchar {
                length: varchar_length(role, profile.distinct_count),
            },
            ColumnType::Unknown => SqlType::Text,
        },
    }
}

/// Role-based length bounds for free-text columns, scaled by observed
/// cardinality. Roles without a sizing rule default to 255.
pub fn varchar_length(role: ColumnRole, distinct_count: usize) -> usize {
    let (floor, ceiling) = match role {
        ColumnRole::Identifier => (50, 255),
        ColumnRole::CategoricalDimension => (50, 100),
        ColumnRole::Dimension => (100, 500),
        ColumnRole::Measure | ColumnRole::TemporalDimension => return 255,
    };
    distinct_count.clamp(floor, ceiling)
}

/// Constraints inferable from a single column's profile.
///
/// UNIQUE is only trusted for identifier-role columns with no semantic type,
/// enough distinct values, and an identifier-like token in the name, to
/// avoid over-constraining semantically typed columns.
pub fn infer_constraints(profile: &ColumnProfile, role: ColumnRole) -> Vec<Constraint> {
    let mut constraints = Vec::new();

    if profile.total_count > 0 && profile.null_ratio() < NOT_NULL_MAX_RATIO {
        constraints.push(Constraint::NotNull);
    }

    if role == ColumnRole::Identifier
        && profile.semantic_type == SemanticType::Unknown
        && profile.distinct_count > UNIQUE_MIN_DISTINCT
        && IDENTIFIER_TOKEN.is_match(&profile.name)
    {
        constraints.push(Constraint::Unique);
    }

    constraints
}
