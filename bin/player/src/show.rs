//! Drives a loaded programme from a periodic tick.

use crate::config::PlayerConfig;
use chrono::{Local, NaiveDateTime};
use marquee_core::SurfaceId;
use marquee_display::Display;
use marquee_event::{EventContext, PlayerFactory, Programme, SkippedDescriptor};
use marquee_scheduler::Scheduler;
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// A programme bound to its scheduler and display.
#[derive(Debug)]
pub struct Show {
    scheduler: Scheduler,
    display: Rc<RefCell<Display>>,
    programme: Programme,
    period: Duration,
    shown: SurfaceId,
}

impl Show {
    /// Creates the display and loads every configured event, scheduling
    /// relative to `now`.
    #[must_use]
    pub fn build(config: PlayerConfig, players: PlayerFactory, now: NaiveDateTime) -> Self {
        let period = config.tick_interval();
        let display = Rc::new(RefCell::new(Display::new(config.display.area())));
        let shown = display.borrow().current();
        let context = EventContext::new(Rc::clone(&display), players);
        let mut scheduler = Scheduler::new();
        let programme = Programme::load_values(config.events, &context, &mut scheduler, now);
        let ready = display.borrow();
        debug!(
            surfaces = ready.surface_count(),
            area = %ready.area(),
            "display ready"
        );
        drop(ready);

        Self {
            scheduler,
            display,
            programme,
            period,
            shown,
        }
    }

    #[must_use]
    pub fn programme(&self) -> &Programme {
        &self.programme
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn display(&self) -> &Rc<RefCell<Display>> {
        &self.display
    }

    #[must_use]
    pub fn skipped(&self) -> &[SkippedDescriptor] {
        self.programme.skipped()
    }

    /// Initializes every event before the first tick.
    pub fn initialize_all(&self) -> usize {
        let initialized = self.programme.initialize_all();
        info!(initialized, "events initialized");
        initialized
    }

    /// Fires every trigger due at `now` and logs a change of the visible
    /// surface. Returns the number of triggers fired.
    pub fn tick_at(&mut self, now: NaiveDateTime) -> usize {
        let fired = self.scheduler.run_pending(now);
        if fired > 0 {
            debug!(fired, %now, "tick");
        }

        let current = self.display.borrow().current();
        if current != self.shown {
            info!(
                surface = %current,
                event = self.owner_of(current).unwrap_or("floor"),
                "display changed"
            );
            self.shown = current;
        }
        fired
    }

    /// Ticks against the local clock until `shutdown` completes, then
    /// unbinds every trigger and resets every event.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(
            period = ?self.period,
            events = self.programme.len(),
            next_run = ?self.scheduler.next_run(),
            "show started"
        );
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("shutdown requested");
                    break;
                }
                _ = interval.tick() => {
                    self.tick_at(Local::now().naive_local());
                }
            }
        }
        self.shutdown();
    }

    /// Unbinds every trigger and resets every event.
    pub fn shutdown(&mut self) {
        self.programme.shutdown(&mut self.scheduler);
        self.shown = self.display.borrow().current();
    }

    fn owner_of(&self, surface: SurfaceId) -> Option<&str> {
        self.programme
            .events()
            .find(|(_, event)| {
                event
                    .try_borrow()
                    .is_ok_and(|event| event.hooks().surface() == Some(surface))
            })
            .map(|(name, _)| name)
    }
}
