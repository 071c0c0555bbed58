//! # asof-joiner
//!
//! As-of (temporal proximity) joins between time-indexed in-memory tables.
//!
//! An as-of join attaches to each row of a probe table the best-matching
//! row of a second table on an ordered time key: most recent prior value,
//! next future value, or nearest by absolute gap. It is the standard way
//! to align two time series sampled on different clocks (e.g. enriching
//! observations with the latest reference figure published before them).
//!
//! ## Features
//!
//! - **Single-pass matching**: two-pointer merge over both sorted inputs,
//!   O(|left| + |right|), never a quadratic scan
//! - **Three directions**: backward (default), forward, nearest
//! - **Tolerance**: optional cap on the matched time gap
//! - **Left-outer or inner output**: unmatched rows carry nulls or drop
//! - **Fail-fast validation**: key-type mismatches and (optionally)
//!   unsorted inputs are rejected with descriptive errors before matching
//! - **Statistics**: per-joiner match/unmatch counters, JSON-exportable
//!
//! ## Quick Start
//!
//! ```
//! use asof_joiner::{asof_join, DataType, Direction, Schema, Table, Value};
//!
//! // Yearly GDP figures, recorded on January 1st.
//! let gdp = Table::builder(
//!     Schema::from_fields([("date", DataType::Timestamp), ("gdp", DataType::Int)]).unwrap(),
//!     "date",
//! )
//! .row(vec![Value::from_ymd(2016, 1, 1).unwrap(), Value::Int(4164)])
//! .row(vec![Value::from_ymd(2017, 1, 1).unwrap(), Value::Int(4411)])
//! .row(vec![Value::from_ymd(2018, 1, 1).unwrap(), Value::Int(4566)])
//! .row(vec![Value::from_ymd(2019, 1, 1).unwrap(), Value::Int(4696)])
//! .build()
//! .unwrap();
//!
//! // Yearly population figures, recorded on May 12th.
//! let population = Table::builder(
//!     Schema::from_fields([("date", DataType::Timestamp), ("population", DataType::Float)])
//!         .unwrap(),
//!     "date",
//! )
//! .row(vec![Value::from_ymd(2016, 5, 12).unwrap(), Value::Float(82.19)])
//! .row(vec![Value::from_ymd(2017, 5, 12).unwrap(), Value::Float(82.66)])
//! .row(vec![Value::from_ymd(2018, 5, 12).unwrap(), Value::Float(83.12)])
//! .row(vec![Value::from_ymd(2019, 5, 12).unwrap(), Value::Float(83.52)])
//! .build()
//! .unwrap();
//!
//! // Attach the most recent prior GDP figure to each population row.
//! let joined = asof_join(&population, &gdp, Direction::Backward).unwrap();
//!
//! assert_eq!(joined.len(), 4);
//! assert_eq!(joined.row(0).unwrap()[2], Value::Int(4164));
//! assert_eq!(joined.row(3).unwrap()[2], Value::Int(4696));
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Core types: `Value`, `DataType`, `Direction`, `JoinSide` |
//! | [`table`] | Schema and table model: `Schema`, `Table`, `TableBuilder` |
//! | [`join`] | Matching: `AsofJoiner`, `JoinConfig`, `JoinKind`, `JoinStats` |
//! | [`error`] | Error taxonomy: `JoinError`, `Result` |

pub mod error;
pub mod join;
pub mod table;
pub mod types;

// Re-exports - Core types
pub use error::{JoinError, Result};
pub use types::{DataType, Direction, JoinSide, Value};

// Re-exports - Table model
pub use table::{Row, Schema, Table, TableBuilder};

// Re-exports - Joining
pub use join::{asof_join, AsofJoiner, JoinConfig, JoinKind, JoinStats};
