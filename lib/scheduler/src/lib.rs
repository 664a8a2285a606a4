//! Tick-driven scheduling for marquee events.
//!
//! This crate provides:
//!
//! - **Cadence**: A structured, parsed form of expressions like
//!   `every 10 seconds` or `every monday at 07:30`
//! - **Trigger**: A cadence bound to a callback, tracking its next due time
//! - **Scheduler**: An explicit registry of triggers that fires the due ones
//!   each time it is ticked

pub mod cadence;
pub mod error;
pub mod scheduler;
pub mod trigger;

pub use cadence::{AtTime, Cadence, Unit};
pub use error::{ScheduleError, TriggerError};
pub use scheduler::Scheduler;
pub use trigger::Trigger;
