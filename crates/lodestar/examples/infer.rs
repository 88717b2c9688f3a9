//! Example: infer a schema design for a tabular data file.
//!
//! Usage:
//!   cargo run --example infer -- <file_path>

use std::env;
use std::path::Path;
use std::process;

use lodestar::Lodestar;

fn main() -> lodestar::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example infer -- <file_path>");
        process::exit(1);
    }

    let file_path = &args[1];
    if !Path::new(file_path).exists() {
        eprintln!("Error: file not found: {file_path}");
        process::exit(1);
    }

    let engine = Lodestar::new();
    let report = engine.infer_file(file_path)?;

    let separator = "=".repeat(72);
    println!("{separator}");
    println!("Lodestar inference: {file_path}");
    println!("{separator}\n");

    println!(
        "Table type: {:?}  Pattern: {:?}  Confidence: {:.0}%",
        report.classification.table_type,
        report.classification.pattern,
        report.classification.confidence * 100.0
    );
    println!("{}\n", report.classification.recommendation);

    println!("Columns:");
    for (profile, role) in report.profiles.iter().zip(&report.roles) {
        println!(
            "  {:<24} {:>10}  {:<20} distinct={} nulls={}",
            profile.name,
            profile.semantic_type.to_string(),
            role.role.to_string(),
            profile.distinct_count,
            profile.null_count
        );
    }

    println!("\nDDL:");
    for artifact in &report.artifacts {
        println!("{}\n", artifact.create_statement);
        for index in &artifact.index_statements {
            println!("{index}");
        }
        println!();
    }
    for comment in &report.comments {
        println!("{comment}");
    }
    for procedure in &report.maintenance {
        println!("\n{procedure}");
    }

    Ok(())
}
