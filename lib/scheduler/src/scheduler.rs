//! The trigger registry driven by a fixed-interval tick.

use crate::cadence::Cadence;
use crate::error::TriggerError;
use crate::trigger::Trigger;
use chrono::{Local, NaiveDateTime};
use marquee_core::TriggerId;
use rootcause::prelude::Report;
use tracing::{debug, trace};

/// An explicit registry of triggers.
///
/// The scheduler is constructed at startup, ticked by a single driver, and
/// cleared at shutdown. Callbacks run synchronously on the ticking thread in
/// the order their triggers were bound, so a later callback observes every
/// effect of an earlier one from the same tick.
#[derive(Debug, Default)]
pub struct Scheduler {
    triggers: Vec<Trigger>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `callback` to `cadence`, with the first occurrence after `now`.
    pub fn bind<F>(
        &mut self,
        cadence: Cadence,
        tags: impl IntoIterator<Item = String>,
        callback: F,
        now: NaiveDateTime,
    ) -> TriggerId
    where
        F: FnMut() + 'static,
    {
        let trigger = Trigger::new(cadence, tags, Box::new(callback), now);
        let id = trigger.id();
        debug!(trigger = %id, cadence = %cadence, next_run = %trigger.next_run(), "bound trigger");
        self.triggers.push(trigger);
        id
    }

    /// Fires every trigger due at `now`, in registration order.
    ///
    /// Returns the number of triggers fired.
    pub fn run_pending(&mut self, now: NaiveDateTime) -> usize {
        let mut fired = 0;
        for trigger in self.triggers.iter_mut().filter(|trigger| trigger.is_due(now)) {
            trace!(trigger = %trigger.id(), "firing trigger");
            trigger.fire(now);
            fired += 1;
        }
        fired
    }

    /// Fires every trigger due according to the local wall clock.
    pub fn tick(&mut self) -> usize {
        self.run_pending(Local::now().naive_local())
    }

    /// Looks up a trigger.
    #[must_use]
    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.iter().find(|trigger| trigger.id() == id)
    }

    /// Lists the triggers carrying `tag`, in registration order.
    pub fn tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = TriggerId> + 'a {
        self.triggers
            .iter()
            .filter(move |trigger| trigger.has_tag(tag))
            .map(Trigger::id)
    }

    /// Returns the earliest time any trigger is due.
    #[must_use]
    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.triggers.iter().map(Trigger::next_run).min()
    }

    /// Unbinds a single trigger.
    ///
    /// # Errors
    ///
    /// Returns `TriggerError::NotFound` if no trigger has the given ID.
    pub fn cancel(&mut self, id: TriggerId) -> Result<(), Report<TriggerError>> {
        let index = self
            .triggers
            .iter()
            .position(|trigger| trigger.id() == id)
            .ok_or(TriggerError::NotFound { id })?;
        self.triggers.remove(index);
        debug!(trigger = %id, "unbound trigger");
        Ok(())
    }

    /// Unbinds every trigger, returning how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.triggers.len();
        self.triggers.clear();
        count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid date")
    }

    fn every(expression: &str) -> Cadence {
        Cadence::parse(expression).expect("should parse")
    }

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> Box<dyn FnMut()> {
        let log = Rc::clone(log);
        Box::new(move || log.borrow_mut().push(name))
    }

    #[test]
    fn fires_only_due_triggers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.bind(every("every 10 seconds"), Vec::new(), recorder(&log, "fast"), start());
        scheduler.bind(every("every minute"), Vec::new(), recorder(&log, "slow"), start());

        assert_eq!(scheduler.run_pending(start() + Duration::seconds(5)), 0);
        assert_eq!(scheduler.run_pending(start() + Duration::seconds(10)), 1);
        assert_eq!(*log.borrow(), vec!["fast"]);
    }

    #[test]
    fn due_triggers_fire_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.bind(every("every minute"), Vec::new(), recorder(&log, "a"), start());
        scheduler.bind(every("every 10 seconds"), Vec::new(), recorder(&log, "b"), start());
        scheduler.bind(every("every 30 seconds"), Vec::new(), recorder(&log, "c"), start());

        assert_eq!(scheduler.run_pending(start() + Duration::minutes(1)), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn missed_occurrences_collapse_into_one_invocation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.bind(every("every second"), Vec::new(), recorder(&log, "tick"), start());

        assert_eq!(scheduler.run_pending(start() + Duration::seconds(30)), 1);
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(
            scheduler.next_run(),
            Some(start() + Duration::seconds(31))
        );
    }

    #[test]
    fn tagged_lists_matching_triggers() {
        let mut scheduler = Scheduler::new();
        let lobby = scheduler.bind(
            every("every hour"),
            vec!["lobby".to_string()],
            || {},
            start(),
        );
        scheduler.bind(every("every hour"), vec!["stage".to_string()], || {}, start());
        let both = scheduler.bind(
            every("every day"),
            vec!["lobby".to_string(), "stage".to_string()],
            || {},
            start(),
        );

        let tagged: Vec<_> = scheduler.tagged("lobby").collect();
        assert_eq!(tagged, vec![lobby, both]);
        assert_eq!(scheduler.tagged("nowhere").count(), 0);
    }

    #[test]
    fn cancel_unbinds_one_trigger() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        let gone = scheduler.bind(every("every second"), Vec::new(), recorder(&log, "gone"), start());
        scheduler.bind(every("every second"), Vec::new(), recorder(&log, "kept"), start());

        scheduler.cancel(gone).expect("should cancel");
        assert!(scheduler.get(gone).is_none());
        assert!(scheduler.cancel(gone).is_err());

        scheduler.run_pending(start() + Duration::seconds(1));
        assert_eq!(*log.borrow(), vec!["kept"]);
    }

    #[test]
    fn clear_drains_registry() {
        let mut scheduler = Scheduler::new();
        scheduler.bind(every("every second"), Vec::new(), || {}, start());
        scheduler.bind(every("every minute"), Vec::new(), || {}, start());

        assert_eq!(scheduler.clear(), 2);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_run(), None);
        assert_eq!(scheduler.run_pending(start() + Duration::days(1)), 0);
    }
}
