//! Lifecycle states, hooks, and transition outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an event is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventState {
    #[default]
    Uninitialized,
    Initialized,
    Running,
    /// Terminal. No operation leaves this state.
    Cancelled,
}

impl EventState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A side-effecting lifecycle step supplied by an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    Initialize,
    Run,
    Stop,
    Reset,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initialize => "initialize",
            Self::Run => "run",
            Self::Stop => "stop",
            Self::Reset => "reset",
        })
    }
}

/// The result of a lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The transition happened.
    Applied,
    /// The event was not in a state the operation acts on; nothing ran.
    Skipped,
    /// A hook failed and the state was left as it was.
    Failed,
    /// The event is now cancelled.
    Cancelled,
}

impl Outcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}
