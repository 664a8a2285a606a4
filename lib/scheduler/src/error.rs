//! Error types for the scheduler crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `ScheduleError`: Errors from parsing cadence expressions
//! - `TriggerError`: Errors from trigger registry operations

use marquee_core::TriggerId;
use std::fmt;

/// Errors from cadence parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The cadence expression could not be parsed.
    InvalidCadence { expression: String, reason: String },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCadence { expression, reason } => {
                write!(f, "invalid cadence '{expression}': {reason}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

/// Errors from trigger registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// Trigger not found.
    NotFound { id: TriggerId },
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "trigger not found: {id}"),
        }
    }
}

impl std::error::Error for TriggerError {}
