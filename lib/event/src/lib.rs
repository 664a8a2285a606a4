//! Scheduled presentation events for marquee.
//!
//! This crate provides:
//!
//! - **Lifecycle Engine**: [`Event`], a guarded `initialize → run → stop →
//!   reset` state machine whose side-effecting [`Hooks`] may fail
//! - **Display-Bound Events**: [`DisplayBound`], which shows an event's
//!   surface on the shared display while it runs
//! - **Event Types**: the closed set of concrete events, dispatched through
//!   [`EventKind`]
//! - **Loading**: [`Programme`], which turns descriptors into events bound to
//!   scheduler triggers

pub mod descriptor;
pub mod display_bound;
pub mod error;
pub mod factory;
pub mod lifecycle;
pub mod media;
pub mod programme;
pub mod state;
pub mod video;

#[cfg(test)]
mod testing;

pub use descriptor::EventDescriptor;
pub use display_bound::DisplayBound;
pub use error::{HookError, LoadError, MediaError};
pub use factory::{EventContext, EventKind};
pub use lifecycle::{Event, HookResult, Hooks};
pub use media::{MediaPlayer, MediaSpec, PlayerFactory};
pub use programme::{Programme, SharedEvent, SkippedDescriptor};
pub use state::{EventState, Hook, Outcome};
pub use video::{PlayVideo, PlayVideoSettings, Playback};
