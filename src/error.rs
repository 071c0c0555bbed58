//! Error types for table construction and joining.
//!
//! Clean error handling using `thiserror` for ergonomic error definitions.

use thiserror::Error;

use crate::types::{DataType, JoinSide};

/// Result type alias for join operations.
pub type Result<T> = std::result::Result<T, JoinError>;

/// Main error type for table construction and as-of joins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JoinError {
    /// Named column does not exist in the schema
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Schema declares the same column name twice
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// Row width differs from the schema width
    #[error("row {row} has {found} values, expected {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Cell value does not match the declared column type
    #[error("row {row}, column '{column}': expected {expected}, found {found}")]
    CellType {
        row: usize,
        column: String,
        expected: DataType,
        found: DataType,
    },

    /// Time column has a type that cannot be ordered
    #[error("time column '{column}' has type {found}, expected timestamp or int")]
    TimeColumnType { column: String, found: DataType },

    /// A row's time cell is null
    #[error("row {row}: time column cell is null")]
    NullTimestamp { row: usize },

    /// Left and right time columns have different types
    #[error(
        "time column type mismatch: left '{left_column}' is {left}, \
         right '{right_column}' is {right}"
    )]
    KeyTypeMismatch {
        left_column: String,
        left: DataType,
        right_column: String,
        right: DataType,
    },

    /// Input table is not sorted ascending by its time column
    #[error("{side} table is not sorted by '{column}': row {row} goes backwards")]
    UnsortedInput {
        side: JoinSide,
        column: String,
        row: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = JoinError::UnknownColumn("date".to_string());
        assert_eq!(err.to_string(), "unknown column: date");

        let err = JoinError::UnsortedInput {
            side: JoinSide::Right,
            column: "date".to_string(),
            row: 3,
        };
        assert_eq!(
            err.to_string(),
            "right table is not sorted by 'date': row 3 goes backwards"
        );
    }

    #[test]
    fn test_result_type() {
        let result: Result<i32> = Err(JoinError::NullTimestamp { row: 0 });
        assert!(result.is_err());
    }
}
