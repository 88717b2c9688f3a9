//! Column profiler: elects a semantic type over a bounded sample and
//! computes full-column cardinality statistics.

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::PatternRule;
use crate::input::DataTable;
use crate::schema::{ColumnProfile, ColumnType, SemanticType};

/// Number of first-seen distinct values kept on a profile for display.
const SAMPLE_DISPLAY_LIMIT: usize = 5;

// Shapes used for physical type detection, compiled once on first use.
static DATE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(), // US date
        Regex::new(r"^\d{2}-\d{2}-\d{4}").unwrap(), // European date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

static TIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2})?$").unwrap());

/// Profiles columns one at a time.
#[derive(Debug, Clone)]
pub struct ColumnProfiler {
    rules: Vec<PatternRule>,
    sample_size: usize,
    confidence_threshold: f64,
}

impl ColumnProfiler {
    /// Create a profiler with the given rule set and sampling bounds.
    pub fn new(rules: Vec<PatternRule>, sample_size: usize, confidence_threshold: f64) -> Self {
        Self {
            rules,
            sample_size,
            confidence_threshold,
        }
    }

    /// Profile every column of a table in header order.
    pub fn profile_table(&self, table: &DataTable) -> Vec<ColumnProfile> {
        table
            .headers
            .iter()
            .enumerate()
            .map(|(index, name)| self.profile_column(table, index, name))
            .collect()
    }

    /// Profile a single column.
    ///
    /// The semantic type is elected over at most `sample_size` non-blank
    /// values; the cardinality statistics cover the full column. A column
    /// with no usable values profiles to `Unknown` at zero confidence.
    pub fn profile_column(&self, table: &DataTable, index: usize, name: &str) -> ColumnProfile {
        let values: Vec<&str> = table.column_values(index).collect();
        let total_count = values.len();
        if total_count == 0 {
            return ColumnProfile::empty(name, index);
        }

        let non_blank: Vec<&str> = values
            .iter()
            .copied()
            .filter(|v| !DataTable::is_null_value(v))
            .collect();
        let null_count = total_count - non_blank.len();

        let mut distinct: IndexSet<&str> = IndexSet::new();
        for value in &non_blank {
            distinct.insert(*value);
        }

        let sample_values = distinct
            .iter()
            .take(SAMPLE_DISPLAY_LIMIT)
            .map(|s| s.to_string())
            .collect();

        let sample = &non_blank[..non_blank.len().min(self.sample_size)];
        let (semantic_type, confidence) = self.elect_semantic_type(sample);
        let column_type = self.infer_column_type(sample);

        ColumnProfile {
            name: name.to_string(),
            position: index,
            semantic_type,
            confidence,
            column_type,
            total_count,
            non_blank_count: non_blank.len(),
            distinct_count: distinct.len(),
            null_count,
            sample_values,
        }
    }

    /// Elect a semantic type: every rule is tested against every sampled
    /// value, matches vote with the rule's base confidence, and the heaviest
    /// type wins. Ties go to the first-declared type. The winner is accepted
    /// only when its confidence clears the configured threshold.
    fn elect_semantic_type(&self, sample: &[&str]) -> (SemanticType, f64) {
        if sample.is_empty() {
            return (SemanticType::Unknown, 0.0);
        }

        let mut scores: IndexMap<SemanticType, f64> = IndexMap::new();
        for rule in &self.rules {
            scores.entry(rule.semantic_type).or_insert(0.0);
        }
        for value in sample {
            let trimmed = value.trim();
            for rule in &self.rules {
                if rule.pattern.is_match(trimmed) {
                    *scores.entry(rule.semantic_type).or_insert(0.0) += rule.base_confidence;
                }
            }
        }

        // Only a strictly larger score displaces the current winner, so the
        // first-declared type keeps ties.
        let mut winner: Option<(SemanticType, f64)> = None;
        for (&semantic_type, &score) in &scores {
            if score > 0.0 && winner.is_none_or(|(_, best)| score > best) {
                winner = Some((semantic_type, score));
            }
        }

        match winner {
            Some((semantic_type, score)) => {
                let confidence = (score / sample.len() as f64).min(1.0);
                if confidence >= self.confidence_threshold {
                    (semantic_type, confidence)
                } else {
                    (SemanticType::Unknown, confidence)
                }
            }
            None => (SemanticType::Unknown, 0.0),
        }
    }

    /// Per-value physical type detection with a majority vote.
    fn infer_column_type(&self, sample: &[&str]) -> ColumnType {
        if sample.is_empty() {
            return ColumnType::Unknown;
        }

        let mut counts: IndexMap<ColumnType, usize> = IndexMap::new();
        for value in sample {
            *counts.entry(detect_value_type(value)).or_insert(0) += 1;
        }

        let mut winner = (ColumnType::Text, 0usize);
        for (&column_type, &count) in &counts {
            if count > winner.1 {
                winner = (column_type, count);
            }
        }

        // Integer columns that also carry fractional values widen to decimal.
        if winner.0 == ColumnType::Integer && counts.get(&ColumnType::Decimal).is_some_and(|&c| c > 0)
        {
            return ColumnType::Decimal;
        }

        winner.0
    }
}

/// Detect the physical type of a single value.
fn detect_value_type(value: &str) -> ColumnType {
    let trimmed = value.trim();

    if matches!(
        trimmed.to_lowercase().as_str(),
        "true" | "false" | "yes" | "no"
    ) {
        return ColumnType::Boolean;
    }

    if trimmed.parse::<i64>().is_ok() {
        return ColumnType::Integer;
    }

    if trimmed.parse::<f64>().is_ok() {
        return ColumnType::Decimal;
    }

    if DATE_SHAPES.iter().any(|shape| shape.is_match(trimmed)) {
        if trimmed.contains(':') || trimmed.contains('T') {
            return ColumnType::Timestamp;
        }
        return ColumnType::Date;
    }

    if TIME_SHAPE.is_match(trimmed) {
        return ColumnType::Time;
    }

    ColumnType::Text
}
