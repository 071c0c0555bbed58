//! Core data types for timestamped tabular records.
//!
//! These types are designed to be:
//! - Simple to construct from literals in tests and demos
//! - Self-describing (every cell knows its type)
//! - Serializable for export and debugging

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Declared type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 string
    Str,
    /// Instant in time, nanoseconds since the Unix epoch
    Timestamp,
}

impl DataType {
    /// Whether columns of this type can serve as a time index.
    ///
    /// Only totally ordered integer-backed types qualify; joining on a
    /// float or string column is rejected at table construction.
    #[inline]
    pub fn is_orderable(self) -> bool {
        matches!(self, DataType::Int | DataType::Timestamp)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DataType::Int => "int",
            DataType::Float => "float",
            DataType::Str => "str",
            DataType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A single dynamically typed cell.
///
/// `Null` is the no-value marker used for unmatched join output; payload
/// columns accept it, time columns do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent value
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Nanoseconds since the Unix epoch
    Timestamp(i64),
}

impl Value {
    /// The concrete type of this cell, or `None` for `Null`.
    #[inline]
    pub fn dtype(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(DataType::Int),
            Value::Float(_) => Some(DataType::Float),
            Value::Str(_) => Some(DataType::Str),
            Value::Timestamp(_) => Some(DataType::Timestamp),
        }
    }

    /// Check if this cell is `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check whether this cell can live in a column of the given type.
    ///
    /// `Null` matches any column type; typed cells must match exactly.
    #[inline]
    pub fn matches(&self, dtype: DataType) -> bool {
        match self.dtype() {
            None => true,
            Some(actual) => actual == dtype,
        }
    }

    /// Build a `Timestamp` cell for midnight UTC on a calendar date.
    ///
    /// Returns `None` for invalid dates (e.g. February 30th) or dates
    /// outside the representable nanosecond range.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        let ns = NaiveDate::from_ymd_opt(year, month, day)?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_nanos_opt()?;
        Some(Value::Timestamp(ns))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Timestamp(ns) => {
                write!(f, "{}", DateTime::from_timestamp_nanos(*ns).to_rfc3339())
            }
        }
    }
}

/// Direction policy for as-of matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Match the most recent prior row (timestamp <= probe timestamp).
    /// This is the default and the most common choice for time series.
    #[default]
    Backward,
    /// Match the next future row (timestamp >= probe timestamp).
    Forward,
    /// Match the closest row by absolute time difference; ties go to the
    /// earlier-occurring row.
    Nearest,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Backward => "backward",
            Direction::Forward => "forward",
            Direction::Nearest => "nearest",
        };
        f.write_str(name)
    }
}

/// Which side of a join an input table sits on.
///
/// Used in diagnostics so errors name the offending input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinSide {
    /// The probe table (drives the output)
    Left,
    /// The table being searched
    Right,
}

impl std::fmt::Display for JoinSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinSide::Left => f.write_str("left"),
            JoinSide::Right => f.write_str("right"),
        }
    }
}
