//! Direction policies, tolerance, and join statistics.
//!
//! Run with: cargo run --example directions

use std::time::Duration;

use asof_joiner::{AsofJoiner, DataType, Direction, JoinConfig, Schema, Table, Value};

/// Sensor readings, one every ten seconds (nanosecond time keys).
fn readings() -> Table {
    let schema =
        Schema::from_fields([("ts", DataType::Int), ("reading", DataType::Float)]).unwrap();
    let mut builder = Table::builder(schema, "ts");
    for i in 0..6 {
        builder = builder.row(vec![
            Value::Int(i * 10_000_000_000),
            Value::Float(20.0 + i as f64),
        ]);
    }
    builder.build().unwrap()
}

/// Reference calibrations, sparser and offset from the readings.
fn calibrations() -> Table {
    let schema =
        Schema::from_fields([("ts", DataType::Int), ("offset", DataType::Float)]).unwrap();
    Table::builder(schema, "ts")
        .row(vec![Value::Int(4_000_000_000), Value::Float(0.10)])
        .row(vec![Value::Int(27_000_000_000), Value::Float(0.15)])
        .row(vec![Value::Int(48_000_000_000), Value::Float(0.05)])
        .build()
        .unwrap()
}

fn print_joined(label: &str, table: &Table) {
    println!("{label}:");
    for row in table.rows() {
        let cells: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        println!("  {}", cells.join(" | "));
    }
    println!();
}

fn main() {
    println!("=================================================================");
    println!("As-of Join - Direction Policies");
    println!("=================================================================\n");

    let readings = readings();
    let calibrations = calibrations();

    for direction in [Direction::Backward, Direction::Forward, Direction::Nearest] {
        let mut joiner = AsofJoiner::new(direction);
        let joined = joiner.join(&readings, &calibrations).unwrap();
        print_joined(&format!("{direction}"), &joined);
    }

    // A tolerance caps how stale a match may be.
    let config = JoinConfig::new(Direction::Backward)
        .with_tolerance(Duration::from_secs(10));
    let mut joiner = AsofJoiner::with_config(config);
    let joined = joiner.join(&readings, &calibrations).unwrap();
    print_joined("backward, 10s tolerance", &joined);

    let stats = joiner.stats();
    println!("Statistics:");
    println!("  Joins: {}", stats.joins);
    println!("  Matched: {}", stats.matched);
    println!("  Unmatched: {}", stats.unmatched);
    println!("  Outside tolerance: {}", stats.outside_tolerance);
    println!("  As JSON: {}", stats.to_json());

    println!("\n✓ Example complete!");
}
