//! Full inference pipeline performance benchmarks.
//!
//! Measures end-to-end inference including profiling, the pairwise
//! relationship scans, classification, and DDL synthesis.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use lodestar::{DataTable, Lodestar};

/// Generate realistic retail order data.
fn generate_order_table(rows: usize) -> DataTable {
    let headers = vec![
        "order_id".to_string(),
        "unit_price".to_string(),
        "total_price".to_string(),
        "status".to_string(),
        "order_date".to_string(),
        "customer_email".to_string(),
        "warehouse".to_string(),
        "return_site".to_string(),
    ];

    let statuses = ["open", "shipped", "closed", "returned", "NA"];
    let warehouses = ["W01", "W02", "W03", "W04", "W05", "W06", "W07", "W08", "NA"];
    let return_sites = ["W01", "W02", "W03", "W04", "W05", "W06", "W07", "X01", "NA"];

    let data_rows = (0..rows)
        .map(|row| {
            let email = if row % 7 == 6 {
                "NA".to_string()
            } else {
                format!("user{}@shop.example", row % 40)
            };
            let price = if row % 11 == 10 {
                "NA".to_string()
            } else {
                format!("${}.{:02}", 5 + (row % 60), row % 100)
            };
            vec![
                format!("ORD{:06}", row + 1),
                price,
                format!("${}.{:02}", 100 + (row % 400), (row * 7) % 100),
                statuses[row % statuses.len()].to_string(),
                format!("2024-{:02}-{:02}", (row % 12) + 1, (row % 28) + 1),
                email,
                warehouses[row % warehouses.len()].to_string(),
                return_sites[row % return_sites.len()].to_string(),
            ]
        })
        .collect();

    DataTable::new(headers, data_rows, b',')
}

/// Narrow two-column table for baseline measurements.
fn generate_minimal_table(rows: usize) -> DataTable {
    let headers = vec!["id".to_string(), "value".to_string()];
    let data_rows = (0..rows)
        .map(|row| vec![format!("{row}"), format!("{}", row % 50)])
        .collect();
    DataTable::new(headers, data_rows, b',')
}

fn bench_full_inference(c: &mut Criterion) {
    let engine = Lodestar::new();
    let mut group = c.benchmark_group("full_inference");

    for rows in [100, 1_000, 5_000] {
        let table = generate_order_table(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| engine.infer("orders", black_box(table)).unwrap());
        });
    }

    group.finish();
}

fn bench_minimal_baseline(c: &mut Criterion) {
    let engine = Lodestar::new();
    let mut group = c.benchmark_group("minimal_baseline");

    for rows in [1_000, 10_000] {
        let table = generate_minimal_table(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &table, |b, table| {
            b.iter(|| engine.infer("baseline", black_box(table)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_inference, bench_minimal_baseline);
criterion_main!(benches);
