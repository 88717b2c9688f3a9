//! Synthesized column and table definitions, final and rendered as DDL text.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{ColumnRole, SemanticType};

/// Rendered PostgreSQL storage type for a synthesized column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SqlType {
    /// 64-bit integer.
    BigInt,
    /// Auto-incrementing 64-bit surrogate key.
    BigSerial,
    /// Boolean.
    Boolean,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    Timestamp,
    /// Unbounded text.
    Text,
    /// Bounded variable-width string.
    Varchar { length: usize },
    /// Fixed-width string.
    Char { length: usize },
    /// Fixed-point number.
    Numeric { precision: u8, scale: u8 },
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::BigInt => f.write_str("BIGINT"),
            SqlType::BigSerial => f.write_str("BIGSERIAL"),
            SqlType::Boolean => f.write_str("BOOLEAN"),
            SqlType::Date => f.write_str("DATE"),
            SqlType::Time => f.write_str("TIME"),
            SqlType::Timestamp => f.write_str("TIMESTAMP"),
            SqlType::Text => f.write_str("TEXT"),
            SqlType::Varchar { length } => write!(f, "VARCHAR({length})"),
            SqlType::Char { length } => write!(f, "CHAR({length})"),
            SqlType::Numeric { precision, scale } => write!(f, "NUMERIC({precision},{scale})"),
        }
    }
}

/// A constraint attached to a synthesized column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Column may not hold nulls.
    NotNull,
    /// Column values must be unique.
    Unique,
    /// Column is the primary key.
    PrimaryKey,
    /// Column default expression.
    Default { value: String },
    /// Referential constraint to another table's column.
    References { table: String, column: String },
}

impl Constraint {
    /// Render the constraint as SQL.
    pub fn render(&self) -> String {
        match self {
            Constraint::NotNull => "NOT NULL".to_string(),
            Constraint::Unique => "UNIQUE".to_string(),
            Constraint::PrimaryKey => "PRIMARY KEY".to_string(),
            Constraint::Default { value } => format!("DEFAULT {value}"),
            Constraint::References { table, column } => format!("REFERENCES {table}({column})"),
        }
    }
}

/// One synthesized column, final once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Sanitized SQL identifier.
    pub name: String,
    /// Target storage type.
    pub sql_type: SqlType,
    /// Constraints in render order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
    /// Structural role of the source column, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ColumnRole>,
    /// Semantic type of the source column.
    #[serde(default)]
    pub semantic_type: SemanticType,
    /// Name of the source column this definition was derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_column: Option<String>,
}

impl ColumnDefinition {
    /// Render the column clause of a CREATE TABLE statement.
    pub fn render(&self) -> String {
        let mut out = format!("{} {}", self.name, self.sql_type);
        for constraint in &self.constraints {
            out.push(' ');
            out.push_str(&constraint.render());
        }
        out
    }
}

/// One named output table: a create statement, its indexes, and the column
/// definitions the statement was rendered from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableArtifact {
    /// Sanitized table name.
    pub name: String,
    /// CREATE TABLE statement.
    pub create_statement: String,
    /// CREATE INDEX statements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_statements: Vec<String>,
    /// Column definitions in declaration order.
    pub columns: Vec<ColumnDefinition>,
}

impl TableArtifact {
    /// Find a column definition by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type_rendering() {
        assert_eq!(SqlType::Varchar { length: 255 }.to_string(), "VARCHAR(255)");
        assert_eq!(
            SqlType::Numeric {
                precision: 15,
                scale: 2
            }
            .to_string(),
            "NUMERIC(15,2)"
        );
        assert_eq!(SqlType::Char { length: 11 }.to_string(), "CHAR(11)");
        assert_eq!(SqlType::BigSerial.to_string(), "BIGSERIAL");
    }

    #[test]
    fn test_column_render_with_constraints() {
        let column = ColumnDefinition {
            name: "customer_id".to_string(),
            sql_type: SqlType::Varchar { length: 50 },
            constraints: vec![Constraint::NotNull, Constraint::Unique],
            role: None,
            semantic_type: SemanticType::Unknown,
            source_column: None,
        };
        assert_eq!(column.render(), "customer_id VARCHAR(50) NOT NULL UNIQUE");
    }
}
