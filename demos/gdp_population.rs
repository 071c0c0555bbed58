//! Align yearly population figures with the most recent GDP figure.
//!
//! Run with: cargo run --example gdp_population

use asof_joiner::{asof_join, DataType, Direction, Schema, Table, Value};

fn main() {
    println!("=================================================================");
    println!("As-of Join - GDP / Population Alignment");
    println!("=================================================================\n");

    // GDP figures are published on January 1st of each year.
    let gdp = Table::builder(
        Schema::from_fields([("date", DataType::Timestamp), ("gdp", DataType::Int)]).unwrap(),
        "date",
    )
    .row(vec![Value::from_ymd(2016, 1, 1).unwrap(), Value::Int(4164)])
    .row(vec![Value::from_ymd(2017, 1, 1).unwrap(), Value::Int(4411)])
    .row(vec![Value::from_ymd(2018, 1, 1).unwrap(), Value::Int(4566)])
    .row(vec![Value::from_ymd(2019, 1, 1).unwrap(), Value::Int(4696)])
    .build()
    .unwrap();
    println!("✓ Built GDP table ({} rows, keyed on January 1st)", gdp.len());

    // Population counts are taken on May 12th of each year.
    let population = Table::builder(
        Schema::from_fields([("date", DataType::Timestamp), ("population", DataType::Float)])
            .unwrap(),
        "date",
    )
    .row(vec![Value::from_ymd(2016, 5, 12).unwrap(), Value::Float(82.19)])
    .row(vec![Value::from_ymd(2017, 5, 12).unwrap(), Value::Float(82.66)])
    .row(vec![Value::from_ymd(2018, 5, 12).unwrap(), Value::Float(83.12)])
    .row(vec![Value::from_ymd(2019, 5, 12).unwrap(), Value::Float(83.52)])
    .build()
    .unwrap();
    println!(
        "✓ Built population table ({} rows, keyed on May 12th)\n",
        population.len()
    );

    // Each population row picks up the latest GDP figure published at or
    // before its own date - here, January 1st of the same year.
    let joined = asof_join(&population, &gdp, Direction::Backward).unwrap();

    let header: Vec<&str> = joined.schema().iter().map(|(name, _)| name).collect();
    println!("{}", header.join(" | "));
    println!("-----------------------------------------------------------------");
    for row in joined.rows() {
        let cells: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        println!("{}", cells.join(" | "));
    }

    println!("\n✓ Example complete!");
}
