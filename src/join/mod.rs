//! As-of join module.
//!
//! This module provides temporal proximity matching between two
//! time-indexed tables.

mod config;
pub mod matcher;

pub use config::{JoinConfig, JoinKind};
pub use matcher::{asof_join, AsofJoiner, JoinStats};
