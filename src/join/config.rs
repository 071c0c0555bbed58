//! Join configuration and policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Which left rows appear in the join output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinKind {
    /// Emit every left row; unmatched rows carry nulls (default).
    /// Output length always equals the left table's length.
    #[default]
    LeftOuter,

    /// Emit only left rows that found a match.
    Inner,
}

impl JoinKind {
    /// Returns true if unmatched left rows appear in the output.
    #[inline]
    pub fn emits_unmatched(self) -> bool {
        matches!(self, JoinKind::LeftOuter)
    }
}

/// Configuration for as-of join behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinConfig {
    /// Direction policy for matching
    pub direction: Direction,

    /// Which left rows to emit
    pub kind: JoinKind,

    /// Maximum time gap for a match (`None` = unlimited).
    /// A candidate farther away counts as no-match, not an error.
    pub tolerance: Option<Duration>,

    /// Whether to verify the sortedness precondition before matching.
    /// When disabled, unsorted input silently yields incorrect output,
    /// matching the contract of dataframe as-of joins.
    pub check_sorted: bool,

    /// Whether to emit a debug-level summary after each join
    pub log_summary: bool,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Backward,
            kind: JoinKind::LeftOuter,
            tolerance: None,
            check_sorted: true,
            log_summary: true,
        }
    }
}

impl JoinConfig {
    /// Create a config with the given direction and defaults otherwise.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// Set which left rows to emit.
    pub fn with_kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the maximum time gap for a match.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Enable/disable the sortedness check.
    pub fn with_sorted_check(mut self, check: bool) -> Self {
        self.check_sorted = check;
        self
    }

    /// Enable/disable the per-join debug summary.
    pub fn with_logging(mut self, log: bool) -> Self {
        self.log_summary = log;
        self
    }

    /// Tolerance in nanoseconds, or `i64::MAX` if unlimited.
    #[inline]
    pub fn tolerance_ns(&self) -> i64 {
        self.tolerance
            .map_or(i64::MAX, |d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
    }
}
