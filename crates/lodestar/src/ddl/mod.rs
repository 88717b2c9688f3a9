//! DDL synthesis from the classified table structure.

mod mapping;
mod synthesizer;

pub use mapping::{infer_constraints, sanitize_identifier, sql_type_for, varchar_length};
pub use synthesizer::{DdlSynthesizer, Synthesis};
