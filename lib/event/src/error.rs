//! Error types for the event crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `HookError`: A lifecycle hook failed; always caught by the failure guard
//! - `MediaError`: Failures reported by a media player
//! - `LoadError`: A descriptor could not be turned into an event

use crate::state::Hook;
use std::fmt;

/// Errors raised by lifecycle hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookError {
    /// The hook failed for a reason specific to the event type.
    Failed { hook: Hook, reason: String },
    /// The media player refused the request.
    Media { hook: Hook, reason: String },
    /// The display refused to show or hide the event's surface.
    Display { hook: Hook, reason: String },
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { hook, reason } => write!(f, "{hook} hook failed: {reason}"),
            Self::Media { hook, reason } => write!(f, "{hook} hook media error: {reason}"),
            Self::Display { hook, reason } => write!(f, "{hook} hook display error: {reason}"),
        }
    }
}

impl std::error::Error for HookError {}

/// Errors from media players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The media could not be opened.
    OpenFailed { url: String, reason: String },
    /// Playback could not be started or stopped.
    PlaybackFailed { reason: String },
    /// The player has no media open.
    NotOpen,
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed { url, reason } => write!(f, "failed to open '{url}': {reason}"),
            Self::PlaybackFailed { reason } => write!(f, "playback failed: {reason}"),
            Self::NotOpen => write!(f, "no media is open"),
        }
    }
}

impl std::error::Error for MediaError {}

/// Errors from loading a single descriptor.
///
/// Each is fatal for its descriptor only; loading continues with the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The descriptor is missing a required key or has a malformed one.
    InvalidDescriptor { name: String, reason: String },
    /// No event type is registered under the descriptor's type tag.
    UnknownEventType { name: String, event_type: String },
    /// The descriptor's schedule is not a valid cadence.
    InvalidSchedule { name: String, reason: String },
    /// The type-specific settings are missing or malformed.
    InvalidSettings { name: String, reason: String },
    /// Another descriptor already uses this name.
    DuplicateName { name: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDescriptor { name, reason } => {
                write!(f, "event '{name}' is malformed: {reason}")
            }
            Self::UnknownEventType { name, event_type } => {
                write!(f, "event '{name}' has unknown type '{event_type}'")
            }
            Self::InvalidSchedule { name, reason } => {
                write!(f, "event '{name}' has an invalid schedule: {reason}")
            }
            Self::InvalidSettings { name, reason } => {
                write!(f, "event '{name}' has invalid settings: {reason}")
            }
            Self::DuplicateName { name } => write!(f, "event '{name}' is declared twice"),
        }
    }
}

impl std::error::Error for LoadError {}
