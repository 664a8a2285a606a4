//! Events that show a surface on the shared display while running.

use crate::error::HookError;
use crate::lifecycle::{HookResult, Hooks};
use crate::state::Hook;
use marquee_core::SurfaceId;
use marquee_display::{Display, Placement, Rect};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

/// Wraps an event type's hooks so that its surface is on the visibility
/// stack exactly while the event is running.
///
/// Running pushes the surface before the inner run hook; stopping and
/// resetting pop it before the inner hook. If the inner hook fails, the
/// surface returns to the position it held, so the stack is put back the way
/// it was.
#[derive(Debug)]
pub struct DisplayBound<H> {
    display: Rc<RefCell<Display>>,
    surface: SurfaceId,
    inner: H,
}

impl<H> DisplayBound<H> {
    /// Allocates a surface on `display` and builds the inner hooks for it.
    ///
    /// The surface is registered but not shown.
    pub fn new(
        display: Rc<RefCell<Display>>,
        placement: Placement,
        build: impl FnOnce(SurfaceId, Rect) -> H,
    ) -> Self {
        let (surface, region) = {
            let mut display = display.borrow_mut();
            let surface = display.create_surface(placement);
            let region = display.region(surface).unwrap_or_else(|| display.area());
            (surface, region)
        };
        Self {
            display,
            surface,
            inner: build(surface, region),
        }
    }

    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[must_use]
    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    /// Takes the surface off the stack, returning the position it held.
    fn withdraw(&self) -> Option<usize> {
        self.display.borrow_mut().pop(self.surface)
    }

    /// Returns a withdrawn surface to the position it held.
    fn put_back(&self, held: Option<usize>, hook: Hook) {
        let Some(index) = held else {
            return;
        };
        if let Err(report) = self.display.borrow_mut().restore(self.surface, index) {
            warn!(surface = %self.surface, %hook, error = %report, "failed to restore surface");
        }
    }

    fn push(&self, hook: Hook) -> HookResult {
        self.display
            .borrow_mut()
            .push(self.surface)
            .map_err(|report| HookError::Display {
                hook,
                reason: report.to_string(),
            })?;
        Ok(())
    }
}

impl<H: Hooks> Hooks for DisplayBound<H> {
    fn do_initialize(&mut self) -> HookResult {
        self.inner.do_initialize()
    }

    fn do_run(&mut self) -> HookResult {
        // A surface left over from an earlier failure moves to the top.
        self.withdraw();
        self.push(Hook::Run)?;
        let result = self.inner.do_run();
        if result.is_err() {
            self.withdraw();
        }
        result
    }

    fn do_stop(&mut self) -> HookResult {
        let held = self.withdraw();
        let result = self.inner.do_stop();
        if result.is_err() {
            self.put_back(held, Hook::Stop);
        }
        result
    }

    fn do_reset(&mut self) -> HookResult {
        let held = self.withdraw();
        let result = self.inner.do_reset();
        if result.is_err() {
            self.put_back(held, Hook::Reset);
        }
        result
    }
}
