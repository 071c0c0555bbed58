//! As-of matcher over two sorted tables.
//!
//! The matcher walks both inputs once (two-pointer merge), exploiting the
//! sortedness precondition for O(|left| + |right|) matching. A naive scan
//! of the right table per left row is never taken.

use crate::error::{JoinError, Result};
use crate::join::config::JoinConfig;
use crate::table::{Schema, Table};
use crate::types::{Direction, JoinSide, Value};

use serde::{Deserialize, Serialize};

/// Statistics for monitoring join behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JoinStats {
    /// Total joins performed
    pub joins: u64,

    /// Total left (probe) rows processed
    pub left_rows: u64,

    /// Total right (build) rows processed
    pub right_rows: u64,

    /// Left rows that found a match
    pub matched: u64,

    /// Left rows without a match (includes tolerance rejections)
    pub unmatched: u64,

    /// Left rows whose only candidate was farther than the tolerance
    pub outside_tolerance: u64,
}

impl JoinStats {
    /// Create new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Serialize the counters to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Per-row result of the matching sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchOutcome {
    /// Matched the right row at this index
    Matched(usize),
    /// No right row satisfies the direction at all
    NoCandidate,
    /// Best candidate exists but its gap exceeds the tolerance
    OutsideTolerance,
}

/// As-of joiner.
///
/// For each row of a left (probe) table, finds the best-matching row of a
/// right (build) table according to the configured [`Direction`], and
/// emits the left row extended with the match's payload columns.
///
/// The join is a pure function of its inputs: neither table is mutated
/// and repeated calls on the same inputs produce identical output. Only
/// the joiner's [`JoinStats`] accumulate across calls.
///
/// # Preconditions
///
/// Both tables must be sorted ascending by their time columns. With
/// `check_sorted` enabled (the default) a violation fails fast with
/// [`JoinError::UnsortedInput`] before any matching begins; with it
/// disabled the result is unspecified, matching the contract of
/// dataframe as-of joins.
///
/// # Example
/// ```
/// use asof_joiner::{AsofJoiner, DataType, Direction, Schema, Table, Value};
///
/// let gdp = Table::builder(
///     Schema::from_fields([("date", DataType::Timestamp), ("gdp", DataType::Int)]).unwrap(),
///     "date",
/// )
/// .row(vec![Value::from_ymd(2016, 1, 1).unwrap(), Value::Int(4164)])
/// .row(vec![Value::from_ymd(2017, 1, 1).unwrap(), Value::Int(4411)])
/// .build()
/// .unwrap();
///
/// let population = Table::builder(
///     Schema::from_fields([("date", DataType::Timestamp), ("population", DataType::Float)])
///         .unwrap(),
///     "date",
/// )
/// .row(vec![Value::from_ymd(2016, 5, 12).unwrap(), Value::Float(82.19)])
/// .row(vec![Value::from_ymd(2017, 5, 12).unwrap(), Value::Float(82.66)])
/// .build()
/// .unwrap();
///
/// let mut joiner = AsofJoiner::new(Direction::Backward);
/// let joined = joiner.join(&population, &gdp).unwrap();
///
/// assert_eq!(joined.len(), 2);
/// assert_eq!(joined.row(0).unwrap()[2], Value::Int(4164));
/// ```
#[derive(Debug, Clone)]
pub struct AsofJoiner {
    /// Configuration
    config: JoinConfig,

    /// Statistics (for monitoring)
    stats: JoinStats,
}

impl AsofJoiner {
    /// Create a joiner with the given direction and default config.
    pub fn new(direction: Direction) -> Self {
        Self::with_config(JoinConfig::new(direction))
    }

    /// Create a joiner with custom configuration.
    pub fn with_config(config: JoinConfig) -> Self {
        Self {
            config,
            stats: JoinStats::new(),
        }
    }

    /// Get a reference to the current configuration.
    #[inline]
    pub fn config(&self) -> &JoinConfig {
        &self.config
    }

    /// Get current statistics.
    pub fn stats(&self) -> &JoinStats {
        &self.stats
    }

    /// Reset accumulated statistics.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Join two tables, attaching each left row's best right match.
    ///
    /// # Arguments
    /// * `left` - Probe table; drives the output order and length
    /// * `right` - Build table being searched
    ///
    /// # Returns
    /// A table with the left columns (time column included) followed by
    /// the right payload columns (the right time column is dropped; name
    /// collisions get a `right_` prefix). Under `LeftOuter` the output
    /// has one row per left row, with nulls where nothing matched; under
    /// `Inner` unmatched rows are dropped.
    ///
    /// # Errors
    /// * [`JoinError::KeyTypeMismatch`] - time column types differ
    /// * [`JoinError::UnsortedInput`] - an input violates the sortedness
    ///   precondition (only when `check_sorted` is enabled)
    /// * [`JoinError::DuplicateColumn`] - output column names collide
    ///   even after prefixing
    pub fn join(&mut self, left: &Table, right: &Table) -> Result<Table> {
        check_key_types(left, right)?;

        if self.config.check_sorted {
            check_sorted(left, JoinSide::Left)?;
            check_sorted(right, JoinSide::Right)?;
        }

        let (schema, right_payload) = compose_output_schema(left, right)?;

        let tolerance = self.config.tolerance_ns();
        let outcomes = match self.config.direction {
            Direction::Backward => {
                backward_sweep(left.timestamps(), right.timestamps(), tolerance)
            }
            Direction::Forward => forward_sweep(left.timestamps(), right.timestamps(), tolerance),
            Direction::Nearest => nearest_sweep(left.timestamps(), right.timestamps(), tolerance),
        };

        let emit_unmatched = self.config.kind.emits_unmatched();
        let mut rows = Vec::with_capacity(left.len());
        let mut times = Vec::with_capacity(left.len());
        let mut matched = 0u64;
        let mut unmatched = 0u64;
        let mut outside_tolerance = 0u64;

        for (i, outcome) in outcomes.into_iter().enumerate() {
            let hit = match outcome {
                MatchOutcome::Matched(j) => Some(j),
                MatchOutcome::NoCandidate => None,
                MatchOutcome::OutsideTolerance => {
                    outside_tolerance += 1;
                    None
                }
            };

            match hit {
                Some(j) => {
                    matched += 1;
                    let mut row = left.rows()[i].clone();
                    let source = &right.rows()[j];
                    for &col in &right_payload {
                        row.push(source[col].clone());
                    }
                    rows.push(row);
                    times.push(left.timestamps()[i]);
                }
                None => {
                    unmatched += 1;
                    if emit_unmatched {
                        let mut row = left.rows()[i].clone();
                        row.extend(std::iter::repeat(Value::Null).take(right_payload.len()));
                        rows.push(row);
                        times.push(left.timestamps()[i]);
                    }
                }
            }
        }

        self.stats.joins += 1;
        self.stats.left_rows += left.len() as u64;
        self.stats.right_rows += right.len() as u64;
        self.stats.matched += matched;
        self.stats.unmatched += unmatched;
        self.stats.outside_tolerance += outside_tolerance;

        if self.config.log_summary {
            log::debug!(
                "asof join ({}): {} left x {} right rows, {} matched, {} unmatched",
                self.config.direction,
                left.len(),
                right.len(),
                matched,
                unmatched
            );
        }

        Ok(Table::from_parts(schema, left.time_index(), rows, times))
    }
}

/// Join two tables with default configuration.
///
/// Convenience wrapper for one-off joins; use [`AsofJoiner`] directly to
/// configure tolerance, join kind, or to accumulate statistics.
pub fn asof_join(left: &Table, right: &Table, direction: Direction) -> Result<Table> {
    let mut joiner = AsofJoiner::new(direction);
    joiner.join(left, right)
}

/// Fail fast if the time column types differ between the inputs.
fn check_key_types(left: &Table, right: &Table) -> Result<()> {
    let left_dtype = left.time_dtype();
    let right_dtype = right.time_dtype();
    if left_dtype != right_dtype {
        return Err(JoinError::KeyTypeMismatch {
            left_column: left.time_column().to_string(),
            left: left_dtype,
            right_column: right.time_column().to_string(),
            right: right_dtype,
        });
    }
    Ok(())
}

/// Fail fast if a table violates the sortedness precondition.
fn check_sorted(table: &Table, side: JoinSide) -> Result<()> {
    match table.first_unsorted_row() {
        Some(row) => Err(JoinError::UnsortedInput {
            side,
            column: table.time_column().to_string(),
            row,
        }),
        None => Ok(()),
    }
}

/// Left columns followed by right payload columns.
///
/// The right time column is dropped (the output keeps the left one).
/// Right names already present on the left get a `right_` prefix; a
/// collision surviving the prefix is an error. Returns the output schema
/// and the right column indices to copy, in output order.
fn compose_output_schema(left: &Table, right: &Table) -> Result<(Schema, Vec<usize>)> {
    let mut schema = left.schema().clone();
    let mut payload = Vec::with_capacity(right.schema().len().saturating_sub(1));

    for (col, (name, dtype)) in right.schema().iter().enumerate() {
        if col == right.time_index() {
            continue;
        }
        let out_name = if left.schema().index_of(name).is_some() {
            format!("right_{name}")
        } else {
            name.to_string()
        };
        schema = schema.with_field(out_name, dtype)?;
        payload.push(col);
    }

    Ok((schema, payload))
}

/// For each probe, the greatest right time `<=` probe.
///
/// Duplicate right timestamps resolve to the last row at the selected
/// timestamp. An exactly equal timestamp is a valid match.
fn backward_sweep(left: &[i64], right: &[i64], tolerance: i64) -> Vec<MatchOutcome> {
    let mut out = Vec::with_capacity(left.len());
    let mut next = 0usize;
    let mut last_at_or_before: Option<usize> = None;

    for &probe in left {
        while next < right.len() && right[next] <= probe {
            last_at_or_before = Some(next);
            next += 1;
        }
        out.push(match last_at_or_before {
            Some(i) if probe.saturating_sub(right[i]) <= tolerance => MatchOutcome::Matched(i),
            Some(_) => MatchOutcome::OutsideTolerance,
            None => MatchOutcome::NoCandidate,
        });
    }

    out
}

/// For each probe, the least right time `>=` probe.
///
/// Duplicate right timestamps resolve to the last row at the selected
/// timestamp. An exactly equal timestamp is a valid match.
fn forward_sweep(left: &[i64], right: &[i64], tolerance: i64) -> Vec<MatchOutcome> {
    let mut out = Vec::with_capacity(left.len());
    let mut first_at_or_after = 0usize;
    // Last row of the duplicate run starting at `first_at_or_after`;
    // extended lazily, never moves backwards.
    let mut run_end = 0usize;

    for &probe in left {
        while first_at_or_after < right.len() && right[first_at_or_after] < probe {
            first_at_or_after += 1;
        }
        if first_at_or_after >= right.len() {
            out.push(MatchOutcome::NoCandidate);
            continue;
        }
        if right[first_at_or_after].saturating_sub(probe) > tolerance {
            out.push(MatchOutcome::OutsideTolerance);
            continue;
        }
        if run_end < first_at_or_after {
            run_end = first_at_or_after;
        }
        while run_end + 1 < right.len() && right[run_end + 1] == right[first_at_or_after] {
            run_end += 1;
        }
        out.push(MatchOutcome::Matched(run_end));
    }

    out
}

/// For each probe, the right row minimizing the absolute time gap.
///
/// Ties break toward the earlier-occurring row: when the gaps before and
/// after are equal the preceding row wins, and within a duplicate run the
/// first row wins.
fn nearest_sweep(left: &[i64], right: &[i64], tolerance: i64) -> Vec<MatchOutcome> {
    let mut out = Vec::with_capacity(left.len());
    let mut next = 0usize;
    // First row of the duplicate run holding the latest time <= probe.
    let mut before_run_start: Option<usize> = None;

    for &probe in left {
        while next < right.len() && right[next] <= probe {
            let starts_new_run = match before_run_start {
                Some(start) => right[start] != right[next],
                None => true,
            };
            if starts_new_run {
                before_run_start = Some(next);
            }
            next += 1;
        }

        let after = (next < right.len()).then_some(next);
        let candidate = match (before_run_start, after) {
            (Some(b), Some(a)) => {
                let before_gap = probe.saturating_sub(right[b]);
                let after_gap = right[a].saturating_sub(probe);
                if before_gap <= after_gap {
                    Some((b, before_gap))
                } else {
                    Some((a, after_gap))
                }
            }
            (Some(b), None) => Some((b, probe.saturating_sub(right[b]))),
            (None, Some(a)) => Some((a, right[a].saturating_sub(probe))),
            (None, None) => None,
        };

        out.push(match candidate {
            Some((i, gap)) if gap <= tolerance => MatchOutcome::Matched(i),
            Some(_) => MatchOutcome::OutsideTolerance,
            None => MatchOutcome::NoCandidate,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Schema;
    use crate::types::DataType;

    use MatchOutcome::{Matched, NoCandidate, OutsideTolerance};

    const NO_LIMIT: i64 = i64::MAX;

    fn seq_table(name: &str, times: &[i64], values: &[i64]) -> Table {
        let schema =
            Schema::from_fields([("t", DataType::Int), (name, DataType::Int)]).unwrap();
        let rows = times
            .iter()
            .zip(values)
            .map(|(&t, &v)| vec![Value::Int(t), Value::Int(v)])
            .collect();
        Table::new(schema, "t", rows).unwrap()
    }

    // =========================================================================
    // Sweep tests (raw time keys)
    // =========================================================================

    #[test]
    fn test_backward_sweep_basic() {
        let out = backward_sweep(&[5, 15, 25], &[0, 10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(0), Matched(1), Matched(2)]);
    }

    #[test]
    fn test_backward_sweep_before_first() {
        let out = backward_sweep(&[5, 15], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![NoCandidate, Matched(0)]);
    }

    #[test]
    fn test_backward_sweep_exact_equality() {
        let out = backward_sweep(&[10], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(0)]);
    }

    #[test]
    fn test_backward_sweep_duplicates_pick_last() {
        // Three rows at t=10: the last one wins.
        let out = backward_sweep(&[15], &[10, 10, 10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(2)]);
    }

    #[test]
    fn test_backward_sweep_tolerance() {
        let out = backward_sweep(&[15, 100], &[10], 5);
        assert_eq!(out, vec![Matched(0), OutsideTolerance]);
    }

    #[test]
    fn test_backward_sweep_empty_right() {
        let out = backward_sweep(&[1, 2], &[], NO_LIMIT);
        assert_eq!(out, vec![NoCandidate, NoCandidate]);
    }

    #[test]
    fn test_forward_sweep_basic() {
        let out = forward_sweep(&[5, 15, 25], &[10, 20, 30], NO_LIMIT);
        assert_eq!(out, vec![Matched(0), Matched(1), Matched(2)]);
    }

    #[test]
    fn test_forward_sweep_after_last() {
        let out = forward_sweep(&[5, 25], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(0), NoCandidate]);
    }

    #[test]
    fn test_forward_sweep_exact_equality() {
        let out = forward_sweep(&[20], &[10, 20, 30], NO_LIMIT);
        assert_eq!(out, vec![Matched(1)]);
    }

    #[test]
    fn test_forward_sweep_duplicates_pick_last() {
        let out = forward_sweep(&[15], &[10, 20, 20, 20, 30], NO_LIMIT);
        assert_eq!(out, vec![Matched(3)]);
    }

    #[test]
    fn test_forward_sweep_tolerance() {
        let out = forward_sweep(&[5, 6], &[10], 4);
        assert_eq!(out, vec![OutsideTolerance, Matched(0)]);
    }

    #[test]
    fn test_nearest_sweep_prefers_closest() {
        // probe 12: gap 2 to t=10 vs gap 8 to t=20.
        let out = nearest_sweep(&[12], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(0)]);

        // probe 18: gap 8 to t=10 vs gap 2 to t=20.
        let out = nearest_sweep(&[18], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(1)]);
    }

    #[test]
    fn test_nearest_sweep_tie_goes_backward() {
        // probe 15 is equidistant from 10 and 20: earlier-occurring wins.
        let out = nearest_sweep(&[15], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(0)]);
    }

    #[test]
    fn test_nearest_sweep_duplicates_pick_first() {
        // All rows at t=10 have equal gaps: the first in order wins.
        let out = nearest_sweep(&[15], &[10, 10, 10], NO_LIMIT);
        assert_eq!(out, vec![Matched(0)]);

        // Same for the after side.
        let out = nearest_sweep(&[5], &[10, 10, 10], NO_LIMIT);
        assert_eq!(out, vec![Matched(0)]);
    }

    #[test]
    fn test_nearest_sweep_only_one_side() {
        let out = nearest_sweep(&[25], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(1)]);

        let out = nearest_sweep(&[5], &[10, 20], NO_LIMIT);
        assert_eq!(out, vec![Matched(0)]);
    }

    #[test]
    fn test_nearest_sweep_tolerance() {
        let out = nearest_sweep(&[15], &[10, 30], 4);
        assert_eq!(out, vec![OutsideTolerance]);
    }

    #[test]
    fn test_nearest_sweep_exact_equality_wins() {
        let out = nearest_sweep(&[20], &[10, 20, 21], NO_LIMIT);
        assert_eq!(out, vec![Matched(1)]);
    }

    #[test]
    fn test_sweep_cursors_are_monotone() {
        // Repeated probes over long duplicate runs stay linear and correct.
        let right = [10, 10, 10, 10, 20, 20, 20, 30];
        let left = [10, 10, 15, 20, 25, 35];

        let backward = backward_sweep(&left, &right, NO_LIMIT);
        assert_eq!(
            backward,
            vec![
                Matched(3),
                Matched(3),
                Matched(3),
                Matched(6),
                Matched(6),
                Matched(7),
            ]
        );

        let forward = forward_sweep(&left, &right, NO_LIMIT);
        assert_eq!(
            forward,
            vec![
                Matched(3),
                Matched(3),
                Matched(6),
                Matched(6),
                Matched(7),
                NoCandidate,
            ]
        );
    }

    // =========================================================================
    // Joiner tests
    // =========================================================================

    #[test]
    fn test_join_attaches_payload() {
        let left = seq_table("a", &[5, 15], &[1, 2]);
        let right = seq_table("b", &[0, 10], &[100, 200]);

        let mut joiner = AsofJoiner::new(Direction::Backward);
        let out = joiner.join(&left, &right).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out.schema().len(), 3);
        assert_eq!(out.row(0).unwrap()[2], Value::Int(100));
        assert_eq!(out.row(1).unwrap()[2], Value::Int(200));
    }

    #[test]
    fn test_join_drops_right_time_column() {
        let left = seq_table("a", &[5], &[1]);
        let right = seq_table("b", &[0], &[100]);

        let out = asof_join(&left, &right, Direction::Backward).unwrap();
        let names: Vec<_> = out.schema().iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["t", "a", "b"]);
    }

    #[test]
    fn test_join_prefixes_colliding_names() {
        let left = seq_table("value", &[5], &[1]);
        let right = seq_table("value", &[0], &[100]);

        let out = asof_join(&left, &right, Direction::Backward).unwrap();
        let names: Vec<_> = out.schema().iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["t", "value", "right_value"]);
        assert_eq!(out.row(0).unwrap()[2], Value::Int(100));
    }

    #[test]
    fn test_join_key_type_mismatch() {
        let left = seq_table("a", &[5], &[1]);

        let right_schema =
            Schema::from_fields([("date", DataType::Timestamp), ("b", DataType::Int)]).unwrap();
        let right = Table::new(
            right_schema,
            "date",
            vec![vec![Value::Timestamp(0), Value::Int(100)]],
        )
        .unwrap();

        let result = asof_join(&left, &right, Direction::Backward);
        assert_eq!(
            result.unwrap_err(),
            JoinError::KeyTypeMismatch {
                left_column: "t".to_string(),
                left: DataType::Int,
                right_column: "date".to_string(),
                right: DataType::Timestamp,
            }
        );
    }

    #[test]
    fn test_join_unsorted_input_rejected() {
        let left = seq_table("a", &[5], &[1]);
        let right = seq_table("b", &[20, 10], &[1, 2]);

        let result = asof_join(&left, &right, Direction::Backward);
        assert_eq!(
            result.unwrap_err(),
            JoinError::UnsortedInput {
                side: JoinSide::Right,
                column: "t".to_string(),
                row: 1,
            }
        );
    }

    #[test]
    fn test_join_unsorted_check_disabled() {
        let left = seq_table("a", &[5], &[1]);
        let right = seq_table("b", &[20, 10], &[1, 2]);

        let config = JoinConfig::new(Direction::Backward)
            .with_sorted_check(false)
            .with_logging(false);
        let mut joiner = AsofJoiner::with_config(config);

        // No error; the output is unspecified but the call succeeds.
        assert!(joiner.join(&left, &right).is_ok());
    }

    #[test]
    fn test_join_inner_kind_drops_unmatched() {
        let left = seq_table("a", &[5, 15], &[1, 2]);
        let right = seq_table("b", &[10], &[100]);

        let config = JoinConfig::new(Direction::Backward).with_kind(crate::JoinKind::Inner);
        let mut joiner = AsofJoiner::with_config(config);
        let out = joiner.join(&left, &right).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out.row(0).unwrap()[1], Value::Int(2));
    }

    #[test]
    fn test_join_stats_accumulate() {
        let left = seq_table("a", &[5, 15], &[1, 2]);
        let right = seq_table("b", &[10], &[100]);

        let mut joiner = AsofJoiner::new(Direction::Backward);
        joiner.join(&left, &right).unwrap();
        joiner.join(&left, &right).unwrap();

        let stats = joiner.stats();
        assert_eq!(stats.joins, 2);
        assert_eq!(stats.left_rows, 4);
        assert_eq!(stats.right_rows, 2);
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.unmatched, 2);
        assert_eq!(stats.outside_tolerance, 0);

        joiner.reset_stats();
        assert_eq!(joiner.stats().joins, 0);
    }

    #[test]
    fn test_join_stats_tolerance_counter() {
        let left = seq_table("a", &[100], &[1]);
        let right = seq_table("b", &[10], &[100]);

        let config = JoinConfig::new(Direction::Backward)
            .with_tolerance(std::time::Duration::from_nanos(5));
        let mut joiner = AsofJoiner::with_config(config);
        let out = joiner.join(&left, &right).unwrap();

        assert_eq!(out.row(0).unwrap()[2], Value::Null);
        assert_eq!(joiner.stats().outside_tolerance, 1);
        assert_eq!(joiner.stats().unmatched, 1);
    }

    #[test]
    fn test_join_stats_to_json() {
        let stats = JoinStats::new();
        let json = stats.to_json();
        assert!(json.contains("\"matched\":0"));
    }
}
