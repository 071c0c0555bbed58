//! Schema and table model for time-indexed records.
//!
//! A [`Table`] is an ordered sequence of rows with a declared [`Schema`]
//! and a designated time column. Construction validates shape and types
//! once, so downstream code can index cells without re-checking.
//!
//! Sortedness by the time column is deliberately NOT enforced here: it is
//! the precondition of the as-of join, and whether it is checked or
//! assumed is a join configuration choice.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{JoinError, Result};
use crate::types::{DataType, Value};

/// Ordered column map with a fast hasher for name lookups.
type FieldMap = IndexMap<String, DataType, ahash::RandomState>;

/// A single table row.
pub type Row = Vec<Value>;

// ============================================================================
// Schema
// ============================================================================

/// Ordered mapping of column names to declared types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    fields: FieldMap,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from `(name, type)` pairs.
    ///
    /// # Errors
    /// Returns [`JoinError::DuplicateColumn`] if a name repeats.
    ///
    /// # Example
    /// ```
    /// use asof_joiner::{DataType, Schema};
    ///
    /// let schema = Schema::from_fields([
    ///     ("date", DataType::Timestamp),
    ///     ("gdp", DataType::Int),
    /// ])
    /// .unwrap();
    /// assert_eq!(schema.len(), 2);
    /// ```
    pub fn from_fields<N, I>(fields: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, DataType)>,
    {
        let mut schema = Self::new();
        for (name, dtype) in fields {
            schema = schema.with_field(name, dtype)?;
        }
        Ok(schema)
    }

    /// Append a column.
    ///
    /// # Errors
    /// Returns [`JoinError::DuplicateColumn`] if the name already exists.
    pub fn with_field(mut self, name: impl Into<String>, dtype: DataType) -> Result<Self> {
        let name = name.into();
        if self.fields.contains_key(&name) {
            return Err(JoinError::DuplicateColumn(name));
        }
        self.fields.insert(name, dtype);
        Ok(self)
    }

    /// Number of columns.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no columns.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Positional index of a named column.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// Declared type of a named column.
    #[inline]
    pub fn dtype_of(&self, name: &str) -> Option<DataType> {
        self.fields.get(name).copied()
    }

    /// Column name at a positional index.
    #[inline]
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.fields.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Declared type at a positional index.
    #[inline]
    pub fn dtype_at(&self, index: usize) -> Option<DataType> {
        self.fields.get_index(index).map(|(_, dtype)| *dtype)
    }

    /// Iterate columns in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.fields.iter().map(|(name, dtype)| (name.as_str(), *dtype))
    }
}

// ============================================================================
// Table
// ============================================================================

/// An ordered sequence of validated rows with a designated time column.
///
/// Every row matches the schema (width and cell types), and every time
/// cell is a non-null `Timestamp` or `Int`. Raw time keys are extracted
/// once at construction so the join sweep reads a plain `&[i64]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    time_index: usize,
    rows: Vec<Row>,
    times: Vec<i64>,
}

impl Table {
    /// Create a table, validating every row against the schema.
    ///
    /// # Arguments
    /// * `schema` - Column names and types
    /// * `time_column` - Name of the time index column
    /// * `rows` - Row data, one `Vec<Value>` per row
    ///
    /// # Errors
    /// * [`JoinError::UnknownColumn`] - `time_column` not in the schema
    /// * [`JoinError::TimeColumnType`] - time column is not orderable
    /// * [`JoinError::RowArity`] - a row's width differs from the schema
    /// * [`JoinError::CellType`] - a cell's type differs from its column
    /// * [`JoinError::NullTimestamp`] - a time cell is null
    pub fn new(schema: Schema, time_column: &str, rows: Vec<Row>) -> Result<Self> {
        let time_index = schema
            .index_of(time_column)
            .ok_or_else(|| JoinError::UnknownColumn(time_column.to_string()))?;

        match schema.dtype_at(time_index) {
            Some(dtype) if dtype.is_orderable() => {}
            Some(dtype) => {
                return Err(JoinError::TimeColumnType {
                    column: time_column.to_string(),
                    found: dtype,
                });
            }
            None => return Err(JoinError::UnknownColumn(time_column.to_string())),
        }

        let mut times = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            times.push(Self::validate_row(&schema, time_index, i, row)?);
        }

        Ok(Self {
            schema,
            time_index,
            rows,
            times,
        })
    }

    /// Start building a table row by row.
    ///
    /// # Example
    /// ```
    /// use asof_joiner::{DataType, Schema, Table, Value};
    ///
    /// let schema = Schema::from_fields([
    ///     ("date", DataType::Timestamp),
    ///     ("gdp", DataType::Int),
    /// ])
    /// .unwrap();
    ///
    /// let table = Table::builder(schema, "date")
    ///     .row(vec![Value::from_ymd(2016, 1, 1).unwrap(), Value::Int(4164)])
    ///     .row(vec![Value::from_ymd(2017, 1, 1).unwrap(), Value::Int(4411)])
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn builder(schema: Schema, time_column: impl Into<String>) -> TableBuilder {
        TableBuilder {
            schema,
            time_column: time_column.into(),
            rows: Vec::new(),
        }
    }

    /// Validate one row and return its raw time key.
    fn validate_row(schema: &Schema, time_index: usize, row_no: usize, row: &Row) -> Result<i64> {
        if row.len() != schema.len() {
            return Err(JoinError::RowArity {
                row: row_no,
                expected: schema.len(),
                found: row.len(),
            });
        }

        let mut time_key = None;
        for (col, value) in row.iter().enumerate() {
            let is_time = col == time_index;
            if value.is_null() {
                if is_time {
                    return Err(JoinError::NullTimestamp { row: row_no });
                }
                continue;
            }

            // Non-null cell: type must match the declared column type.
            let expected = match schema.dtype_at(col) {
                Some(dtype) => dtype,
                None => continue,
            };
            match value.dtype() {
                Some(found) if found != expected => {
                    return Err(JoinError::CellType {
                        row: row_no,
                        column: schema.name_at(col).unwrap_or_default().to_string(),
                        expected,
                        found,
                    });
                }
                _ => {}
            }

            if is_time {
                time_key = match value {
                    Value::Timestamp(ns) => Some(*ns),
                    Value::Int(v) => Some(*v),
                    _ => None,
                };
            }
        }

        time_key.ok_or(JoinError::NullTimestamp { row: row_no })
    }

    /// Internal constructor for join output: rows already validated.
    pub(crate) fn from_parts(
        schema: Schema,
        time_index: usize,
        rows: Vec<Row>,
        times: Vec<i64>,
    ) -> Self {
        Self {
            schema,
            time_index,
            rows,
            times,
        }
    }

    /// The table's schema.
    #[inline]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Name of the time index column.
    #[inline]
    pub fn time_column(&self) -> &str {
        self.schema.name_at(self.time_index).unwrap_or_default()
    }

    /// Positional index of the time column.
    #[inline]
    pub fn time_index(&self) -> usize {
        self.time_index
    }

    /// Declared type of the time column.
    #[inline]
    pub fn time_dtype(&self) -> DataType {
        self.schema.dtype_at(self.time_index).unwrap_or(DataType::Timestamp)
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, in order.
    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// A single row by index.
    #[inline]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// Raw time key of a row (nanoseconds for `Timestamp` columns).
    #[inline]
    pub fn timestamp_at(&self, index: usize) -> Option<i64> {
        self.times.get(index).copied()
    }

    /// Raw time keys for all rows, in row order.
    #[inline]
    pub fn timestamps(&self) -> &[i64] {
        &self.times
    }

    /// Check that rows are in non-decreasing time order.
    pub fn is_sorted_by_time(&self) -> bool {
        self.first_unsorted_row().is_none()
    }

    /// Index of the first row whose time key goes backwards, if any.
    pub fn first_unsorted_row(&self) -> Option<usize> {
        self.times
            .windows(2)
            .position(|pair| pair[1] < pair[0])
            .map(|i| i + 1)
    }
}

/// Row-at-a-time [`Table`] builder; validation happens once in `build`.
pub struct TableBuilder {
    schema: Schema,
    time_column: String,
    rows: Vec<Row>,
}

impl TableBuilder {
    /// Append a row.
    pub fn row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Append many rows.
    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    /// Validate and build the table.
    pub fn build(self) -> Result<Table> {
        Table::new(self.schema, &self.time_column, self.rows)
    }
}
