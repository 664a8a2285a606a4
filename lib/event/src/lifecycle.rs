//! The event lifecycle engine.
//!
//! ## State Transitions
//!
//! ```text
//! uninitialized --initialize--> initialized --run--> running
//!       ^                            ^                  |
//!       |                            +------stop--------+
//!       +------------------reset (from any live state)
//!
//! any live state --cancel--> cancelled (terminal)
//! ```
//!
//! `run` heals from any live state: it initializes first when needed and
//! restarts (stop, then run) when already running, so a trigger can call it
//! without knowing where the event is.
//!
//! Every hook runs inside a failure guard. A failing hook leaves the state
//! untouched and is logged; if the event is marked `cancel_on_error`, the
//! guard also cancels the event. Cancellation resets the event with
//! escalation suppressed, so it always completes.

use crate::error::HookError;
use crate::state::{EventState, Hook, Outcome};
use marquee_core::TriggerId;
use rootcause::prelude::Report;
use tracing::{debug, error, info, instrument};

/// Result of a lifecycle hook.
pub type HookResult = Result<(), Report<HookError>>;

/// Side-effecting steps supplied by an event type.
///
/// Each defaults to doing nothing.
pub trait Hooks {
    fn do_initialize(&mut self) -> HookResult {
        Ok(())
    }

    fn do_run(&mut self) -> HookResult {
        Ok(())
    }

    fn do_stop(&mut self) -> HookResult {
        Ok(())
    }

    fn do_reset(&mut self) -> HookResult {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escalation {
    Allowed,
    Suppressed,
}

/// A scheduled event and its lifecycle state.
#[derive(Debug)]
pub struct Event<H> {
    name: String,
    tags: Vec<String>,
    cancel_on_error: bool,
    state: EventState,
    trigger: Option<TriggerId>,
    hooks: H,
}

impl<H: Hooks> Event<H> {
    /// Creates an uninitialized event.
    #[must_use]
    pub fn new(name: impl Into<String>, hooks: H) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            cancel_on_error: false,
            state: EventState::Uninitialized,
            trigger: None,
            hooks,
        }
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Sets whether a failing hook cancels the event.
    #[must_use]
    pub fn with_cancel_on_error(mut self, cancel_on_error: bool) -> Self {
        self.cancel_on_error = cancel_on_error;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub fn cancel_on_error(&self) -> bool {
        self.cancel_on_error
    }

    #[must_use]
    pub fn state(&self) -> EventState {
        self.state
    }

    /// The trigger this event's `run` is bound to, once loaded.
    #[must_use]
    pub fn trigger(&self) -> Option<TriggerId> {
        self.trigger
    }

    pub fn attach_trigger(&mut self, trigger: TriggerId) {
        self.trigger = Some(trigger);
    }

    #[must_use]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Prepares an uninitialized event. Does nothing in any other state.
    #[instrument(skip(self), fields(event = %self.name))]
    pub fn initialize(&mut self) -> Outcome {
        if self.state != EventState::Uninitialized {
            return Outcome::Skipped;
        }
        debug!("initializing");
        self.guarded(Hook::Initialize, EventState::Initialized, Escalation::Allowed)
    }

    /// Runs the event, initializing or restarting it first as needed.
    ///
    /// Does nothing once cancelled.
    #[instrument(skip(self), fields(event = %self.name))]
    pub fn run(&mut self) -> Outcome {
        if self.state.is_terminal() {
            debug!("cancelled; ignoring run");
            return Outcome::Skipped;
        }
        if self.state == EventState::Uninitialized {
            let initialized = self.initialize();
            if !initialized.is_applied() {
                return initialized;
            }
        }
        if self.state == EventState::Running {
            let stopped = self.stop_with(Escalation::Allowed);
            if !stopped.is_applied() {
                return stopped;
            }
        }
        debug!("starting");
        self.guarded(Hook::Run, EventState::Running, Escalation::Allowed)
    }

    /// Stops a running event. Does nothing in any other state.
    #[instrument(skip(self), fields(event = %self.name))]
    pub fn stop(&mut self) -> Outcome {
        self.stop_with(Escalation::Allowed)
    }

    /// Stops the event if needed and returns it to `uninitialized`.
    #[instrument(skip(self), fields(event = %self.name))]
    pub fn reset(&mut self) -> Outcome {
        self.reset_with(Escalation::Allowed)
    }

    /// Resets the event and moves it to the terminal `cancelled` state.
    ///
    /// Hook failures during cancellation are logged but cannot stop it.
    #[instrument(skip(self), fields(event = %self.name))]
    pub fn cancel(&mut self) -> Outcome {
        if self.state.is_terminal() {
            return Outcome::Cancelled;
        }
        let _ = self.reset_with(Escalation::Suppressed);
        self.state = EventState::Cancelled;
        info!("event cancelled");
        Outcome::Cancelled
    }

    fn stop_with(&mut self, escalation: Escalation) -> Outcome {
        if self.state != EventState::Running {
            return Outcome::Skipped;
        }
        debug!("stopping");
        self.guarded(Hook::Stop, EventState::Initialized, escalation)
    }

    fn reset_with(&mut self, escalation: Escalation) -> Outcome {
        if self.state.is_terminal() {
            return Outcome::Skipped;
        }
        if self.stop_with(escalation) == Outcome::Cancelled {
            return Outcome::Cancelled;
        }
        debug!("resetting");
        self.guarded(Hook::Reset, EventState::Uninitialized, escalation)
    }

    /// Invokes a hook, moving to `target` only if it succeeds.
    fn guarded(&mut self, hook: Hook, target: EventState, escalation: Escalation) -> Outcome {
        let result = match hook {
            Hook::Initialize => self.hooks.do_initialize(),
            Hook::Run => self.hooks.do_run(),
            Hook::Stop => self.hooks.do_stop(),
            Hook::Reset => self.hooks.do_reset(),
        };

        match result {
            Ok(()) => {
                debug!(from = %self.state, to = %target, "transition");
                self.state = target;
                Outcome::Applied
            }
            Err(report) => {
                error!(
                    event = %self.name,
                    %hook,
                    state = %self.state,
                    error = %report,
                    "lifecycle hook failed"
                );
                if self.cancel_on_error && escalation == Escalation::Allowed {
                    self.cancel()
                } else {
                    Outcome::Failed
                }
            }
        }
    }
}
