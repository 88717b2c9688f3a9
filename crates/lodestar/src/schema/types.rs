//! Core enumerations for the inferred schema model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Domain-meaningful classification of a column's values, distinct from the
/// physical storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    /// Email addresses.
    Email,
    /// Phone numbers.
    Phone,
    /// Monetary amounts.
    Currency,
    /// Calendar dates.
    Date,
    /// Times of day.
    Time,
    /// Web URLs.
    Url,
    /// Postal ZIP codes.
    ZipCode,
    /// US social security numbers.
    Ssn,
    /// No semantic pattern cleared the confidence threshold.
    Unknown,
}

impl SemanticType {
    /// Returns true if this type carries a date or time meaning.
    pub fn is_temporal(&self) -> bool {
        matches!(self, SemanticType::Date | SemanticType::Time)
    }
}

impl Default for SemanticType {
    fn default() -> Self {
        SemanticType::Unknown
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SemanticType::Email => "email",
            SemanticType::Phone => "phone",
            SemanticType::Currency => "currency",
            SemanticType::Date => "date",
            SemanticType::Time => "time",
            SemanticType::Url => "url",
            SemanticType::ZipCode => "zip_code",
            SemanticType::Ssn => "ssn",
            SemanticType::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Physical value type inferred from the raw cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers (no decimal point).
    Integer,
    /// Numbers with a fractional part.
    Decimal,
    /// Boolean values (true/false).
    Boolean,
    /// Date only (no time component).
    Date,
    /// Time only (no date component).
    Time,
    /// Combined date and time.
    Timestamp,
    /// Free text.
    Text,
    /// Unable to determine type.
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Decimal)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::Time | ColumnType::Timestamp
        )
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Unknown
    }
}

/// Structural role a column plays in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Row identifier (natural or business key).
    Identifier,
    /// Numeric fact to aggregate.
    Measure,
    /// Descriptive attribute.
    Dimension,
    /// Low-cardinality descriptive attribute.
    CategoricalDimension,
    /// Date/time attribute.
    TemporalDimension,
}

impl ColumnRole {
    /// Returns true for any of the dimension-flavored roles.
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            ColumnRole::Dimension | ColumnRole::CategoricalDimension | ColumnRole::TemporalDimension
        )
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnRole::Identifier => "identifier",
            ColumnRole::Measure => "measure",
            ColumnRole::Dimension => "dimension",
            ColumnRole::CategoricalDimension => "categorical_dimension",
            ColumnRole::TemporalDimension => "temporal_dimension",
        };
        f.write_str(label)
    }
}

/// Overall shape of the analyzed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// Dominated by measures and references to dimensions.
    Fact,
    /// Descriptive attributes keyed by an identifier.
    Dimension,
}

/// Recommended schema pattern for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPattern {
    /// One fact table referencing denormalized dimensions.
    Star,
    /// A star with dimension hierarchies normalized out.
    Snowflake,
    /// A standalone dimension table.
    DimensionTable,
    /// No pattern cleared its threshold; generic single table.
    SimpleTable,
}
