//! Relationship discovery: functional dependencies, inclusion hierarchies,
//! and foreign-key candidates across column pairs.

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// A candidate relationship between two columns. Produced by the pairwise
/// scans and not persisted beyond a single inference run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relationship {
    /// The determinant column's value fixes the dependent column's value for
    /// (nearly) every row.
    FunctionalDependency {
        determinant: String,
        dependent: String,
        strength: f64,
    },
    /// The child column's values form a proper subset of the parent's,
    /// suggesting a rollup.
    Hierarchy {
        parent: String,
        child: String,
        coverage: f64,
    },
    /// Strongly overlapping value sets suggesting a reference.
    ForeignKeyCandidate {
        source: String,
        target: String,
        similarity: f64,
    },
}

impl Relationship {
    /// Score used to order candidates within their kind.
    pub fn score(&self) -> f64 {
        match self {
            Relationship::FunctionalDependency { strength, .. } => *strength,
            Relationship::Hierarchy { coverage, .. } => *coverage,
            Relationship::ForeignKeyCandidate { similarity, .. } => *similarity,
        }
    }

    /// Returns true for foreign-key candidates.
    pub fn is_foreign_key(&self) -> bool {
        matches!(self, Relationship::ForeignKeyCandidate { .. })
    }

    /// Returns true for hierarchy candidates.
    pub fn is_hierarchy(&self) -> bool {
        matches!(self, Relationship::Hierarchy { .. })
    }
}

/// Runs the three pairwise scans over a table.
#[derive(Debug, Clone)]
pub struct RelationshipDiscoverer {
    fd_strength_threshold: f64,
    fk_similarity_threshold: f64,
}

impl RelationshipDiscoverer {
    /// Create a discoverer with the given reporting thresholds.
    pub fn new(fd_strength_threshold: f64, fk_similarity_threshold: f64) -> Self {
        Self {
            fd_strength_threshold,
            fk_similarity_threshold,
        }
    }

    /// Discover all candidate relationships in the table.
    ///
    /// The three scans are independent; each kind's candidates come back
    /// sorted by descending score so downstream tie-breaking is
    /// deterministic.
    pub fn discover(&self, table: &DataTable) -> Vec<Relationship> {
        let column_sets: Vec<IndexSet<&str>> = (0..table.column_count())
            .map(|index| table.non_blank_values(index).collect())
            .collect();

        let mut fds = self.functional_dependencies(table);
        let mut hierarchies = self.hierarchies(table, &column_sets);
        let mut foreign_keys = self.foreign_key_candidates(table, &column_sets);

        sort_by_score(&mut fds);
        sort_by_score(&mut hierarchies);
        sort_by_score(&mut foreign_keys);

        let mut all = fds;
        all.append(&mut hierarchies);
        all.append(&mut foreign_keys);
        all
    }

    /// Scan every ordered column pair for functional dependencies.
    ///
    /// Rows are grouped by the determinant's value; each group contributes
    /// `max(0, distinct_dependent_values - 1)` violations, and strength is
    /// `1 - violations / total_rows`.
    fn functional_dependencies(&self, table: &DataTable) -> Vec<Relationship> {
        let total_rows = table.row_count();
        let mut out = Vec::new();
        if total_rows == 0 {
            return out;
        }

        for (det_idx, det_name) in table.headers.iter().enumerate() {
            for (dep_idx, dep_name) in table.headers.iter().enumerate() {
                if det_idx == dep_idx {
                    continue;
                }

                let mut groups: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
                for row in &table.rows {
                    let det_value = row.get(det_idx).map(String::as_str).unwrap_or("");
                    if DataTable::is_null_value(det_value) {
                        continue;
                    }
                    let group = groups.entry(det_value).or_default();
                    let dep_value = row.get(dep_idx).map(String::as_str).unwrap_or("");
                    if !DataTable::is_null_value(dep_value) {
                        group.insert(dep_value);
                    }
                }

                let violations: usize = groups
                    .values()
                    .map(|dependents| dependents.len().saturating_sub(1))
                    .sum();
                let strength = 1.0 - violations as f64 / total_rows as f64;

                if strength > self.fd_strength_threshold {
                    out.push(Relationship::FunctionalDependency {
                        determinant: det_name.clone(),
                        dependent: dep_name.clone(),
                        strength,
                    });
                }
            }
        }

        out
    }

    /// Scan unordered pairs for proper-subset value sets.
    fn hierarchies(&self, table: &DataTable, column_sets: &[IndexSet<&str>]) -> Vec<Relationship> {
        let mut out = Vec::new();

        for i in 0..column_sets.len() {
            for j in (i + 1)..column_sets.len() {
                let (a, b) = (&column_sets[i], &column_sets[j]);
                if a.is_empty() || b.is_empty() {
                    continue;
                }

                // Only a proper subset suggests a rollup; equal sets do not.
                let (child, parent) = if a.len() < b.len() && a.is_subset(b) {
                    (i, j)
                } else if b.len() < a.len() && b.is_subset(a) {
                    (j, i)
                } else {
                    continue;
                };

                let coverage =
                    column_sets[child].len() as f64 / column_sets[parent].len() as f64;
                out.push(Relationship::Hierarchy {
                    parent: table.headers[parent].clone(),
                    child: table.headers[child].clone(),
                    coverage,
                });
            }
        }

        out
    }

    /// Scan unordered pairs for overlapping value sets.
    ///
    /// Pairs are kept when their Jaccard similarity clears the threshold or
    /// one set contains the other. The subset side becomes the source; for
    /// pure-overlap candidates the earlier column does.
    fn foreign_key_candidates(
        &self,
        table: &DataTable,
        column_sets: &[IndexSet<&str>],
    ) -> Vec<Relationship> {
        let mut out = Vec::new();

        for i in 0..column_sets.len() {
            for j in (i + 1)..column_sets.len() {
                let (a, b) = (&column_sets[i], &column_sets[j]);
                if a.is_empty() || b.is_empty() {
                    continue;
                }

                let intersection = a.intersection(b).count();
                let union = a.len() + b.len() - intersection;
                let similarity = intersection as f64 / union as f64;

                let a_in_b = a.is_subset(b);
                let b_in_a = b.is_subset(a);

                if similarity > self.fk_similarity_threshold || a_in_b || b_in_a {
                    let (source, target) = if b_in_a && !a_in_b { (j, i) } else { (i, j) };
                    out.push(Relationship::ForeignKeyCandidate {
                        source: table.headers[source].clone(),
                        target: table.headers[target].clone(),
                        similarity,
                    });
                }
            }
        }

        out
    }
}

/// Stable descending sort by score; equal scores keep pair order.
fn sort_by_score(candidates: &mut [Relationship]) {
    candidates.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(Ordering::Equal)
    });
}
