//! Pairwise relationship discovery between columns.

mod discovery;

pub use discovery::{Relationship, RelationshipDiscoverer};
