//! Triggers bind a cadence to a callback.

use crate::cadence::Cadence;
use chrono::NaiveDateTime;
use marquee_core::TriggerId;
use std::collections::BTreeSet;
use std::fmt;

/// Callback invoked each time a trigger comes due.
pub type Callback = Box<dyn FnMut()>;

/// A cadence bound to a callback.
///
/// Triggers are owned by a [`Scheduler`](crate::Scheduler) and are only
/// fired from the thread that ticks it.
pub struct Trigger {
    id: TriggerId,
    cadence: Cadence,
    tags: BTreeSet<String>,
    last_run: Option<NaiveDateTime>,
    next_run: NaiveDateTime,
    callback: Callback,
}

impl Trigger {
    /// Creates a trigger whose first occurrence follows `now`.
    #[must_use]
    pub fn new(
        cadence: Cadence,
        tags: impl IntoIterator<Item = String>,
        callback: Callback,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: TriggerId::new(),
            cadence,
            tags: tags.into_iter().collect(),
            last_run: None,
            next_run: cadence.next_after(now),
            callback,
        }
    }

    #[must_use]
    pub fn id(&self) -> TriggerId {
        self.id
    }

    #[must_use]
    pub fn cadence(&self) -> &Cadence {
        &self.cadence
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// When the trigger last fired.
    #[must_use]
    pub fn last_run(&self) -> Option<NaiveDateTime> {
        self.last_run
    }

    /// When the trigger is next due.
    #[must_use]
    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    #[must_use]
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Invokes the callback and schedules the next occurrence after `now`.
    ///
    /// Occurrences missed between ticks are not replayed.
    pub fn fire(&mut self, now: NaiveDateTime) {
        (self.callback)();
        self.last_run = Some(now);
        self.next_run = self.cadence.next_after(now);
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("id", &self.id)
            .field("cadence", &self.cadence.to_string())
            .field("tags", &self.tags)
            .field("last_run", &self.last_run)
            .field("next_run", &self.next_run)
            .finish_non_exhaustive()
    }
}
