//! Loading descriptors into scheduled events.

use crate::descriptor::EventDescriptor;
use crate::error::LoadError;
use crate::factory::{self, EventContext, EventKind};
use crate::lifecycle::Event;
use crate::state::Outcome;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use marquee_scheduler::{Cadence, Scheduler};
use rootcause::prelude::Report;
use serde_json::Value as JsonValue;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, instrument, warn};

/// An event shared between the programme and its trigger callback.
pub type SharedEvent = Rc<RefCell<Event<EventKind>>>;

/// A descriptor that could not be loaded.
#[derive(Debug)]
pub struct SkippedDescriptor {
    pub name: String,
    pub error: Report<LoadError>,
}

/// The loaded set of events, in declaration order.
#[derive(Debug, Default)]
pub struct Programme {
    events: IndexMap<String, SharedEvent>,
    skipped: Vec<SkippedDescriptor>,
}

impl Programme {
    /// Builds an event for each descriptor and binds its run operation to a
    /// trigger on `scheduler`.
    ///
    /// A descriptor that fails to load is logged and recorded in
    /// [`skipped`](Self::skipped); loading continues with the rest. Each
    /// descriptor's name is taken from its key.
    pub fn load(
        descriptors: impl IntoIterator<Item = (String, EventDescriptor)>,
        context: &EventContext,
        scheduler: &mut Scheduler,
        now: NaiveDateTime,
    ) -> Self {
        let entries = descriptors
            .into_iter()
            .map(|(name, descriptor)| (name, Ok(descriptor)));
        Self::load_entries(entries, context, scheduler, now)
    }

    /// Like [`load`](Self::load), but reads each descriptor from its untyped
    /// form first, so a malformed descriptor is skipped like any other.
    pub fn load_values(
        values: impl IntoIterator<Item = (String, JsonValue)>,
        context: &EventContext,
        scheduler: &mut Scheduler,
        now: NaiveDateTime,
    ) -> Self {
        let entries = values.into_iter().map(|(name, value)| {
            let descriptor = EventDescriptor::from_value(&name, value);
            (name, descriptor)
        });
        Self::load_entries(entries, context, scheduler, now)
    }

    #[instrument(skip_all)]
    fn load_entries(
        entries: impl Iterator<Item = (String, Result<EventDescriptor, Report<LoadError>>)>,
        context: &EventContext,
        scheduler: &mut Scheduler,
        now: NaiveDateTime,
    ) -> Self {
        let mut programme = Self::default();

        for (name, descriptor) in entries {
            let loaded = descriptor.and_then(|mut descriptor| {
                descriptor.name.clone_from(&name);
                programme.load_one(&descriptor, context, scheduler, now)
            });
            if let Err(error) = loaded {
                warn!(event = %name, %error, "skipping event");
                programme.skipped.push(SkippedDescriptor { name, error });
            }
        }

        info!(
            loaded = programme.events.len(),
            skipped = programme.skipped.len(),
            "programme loaded"
        );
        programme
    }

    fn load_one(
        &mut self,
        descriptor: &EventDescriptor,
        context: &EventContext,
        scheduler: &mut Scheduler,
        now: NaiveDateTime,
    ) -> Result<(), Report<LoadError>> {
        if self.events.contains_key(&descriptor.name) {
            return Err(LoadError::DuplicateName {
                name: descriptor.name.clone(),
            }
            .into());
        }

        let cadence =
            Cadence::parse(&descriptor.schedule).map_err(|report| LoadError::InvalidSchedule {
                name: descriptor.name.clone(),
                reason: report.to_string(),
            })?;

        let event = Rc::new(RefCell::new(factory::create(
            &descriptor.event_type,
            context,
            descriptor,
        )?));

        let callback = {
            let event = Rc::clone(&event);
            move || run_event(&event)
        };
        let trigger = scheduler.bind(cadence, descriptor.tags.iter().cloned(), callback, now);
        event.borrow_mut().attach_trigger(trigger);

        debug!(event = %descriptor.name, %trigger, %cadence, "event scheduled");
        self.events.insert(descriptor.name.clone(), event);
        Ok(())
    }

    #[must_use]
    pub fn event(&self, name: &str) -> Option<&SharedEvent> {
        self.events.get(name)
    }

    /// Loaded events, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = (&str, &SharedEvent)> {
        self.events.iter().map(|(name, event)| (name.as_str(), event))
    }

    #[must_use]
    pub fn skipped(&self) -> &[SkippedDescriptor] {
        &self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Initializes every event ahead of its first trigger.
    ///
    /// Returns the number of events initialized.
    pub fn initialize_all(&self) -> usize {
        self.events
            .values()
            .filter(|event| event.borrow_mut().initialize().is_applied())
            .count()
    }

    /// Unbinds every trigger and returns each event to `uninitialized`.
    pub fn shutdown(&self, scheduler: &mut Scheduler) {
        let unbound = scheduler.clear();
        for (name, event) in &self.events {
            let outcome = event.borrow_mut().reset();
            debug!(event = %name, ?outcome, "event reset");
        }
        info!(unbound, events = self.events.len(), "programme shut down");
    }
}

fn run_event(event: &SharedEvent) {
    match event.try_borrow_mut() {
        Ok(mut event) => {
            let outcome: Outcome = event.run();
            debug!(event = %event.name(), ?outcome, state = %event.state(), "trigger fired");
        }
        Err(_) => warn!("event is busy; skipping trigger"),
    }
}
