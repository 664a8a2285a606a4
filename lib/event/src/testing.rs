//! Scripted hooks and players for tests.

use crate::error::{HookError, MediaError};
use crate::lifecycle::{HookResult, Hooks};
use crate::media::{MediaPlayer, MediaSpec, PlayerFactory};
use crate::state::Hook;
use marquee_core::SurfaceId;
use marquee_display::Rect;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

/// Hooks that record every call and fail on request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedHooks {
    pub calls: Vec<Hook>,
    pub failures: usize,
    failing: HashSet<Hook>,
}

impl ScriptedHooks {
    pub fn fail_on(&mut self, hook: Hook) {
        self.failing.insert(hook);
    }

    fn invoke(&mut self, hook: Hook) -> HookResult {
        self.calls.push(hook);
        if self.failing.contains(&hook) {
            self.failures += 1;
            return Err(HookError::Failed {
                hook,
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl Hooks for ScriptedHooks {
    fn do_initialize(&mut self) -> HookResult {
        self.invoke(Hook::Initialize)
    }

    fn do_run(&mut self) -> HookResult {
        self.invoke(Hook::Run)
    }

    fn do_stop(&mut self) -> HookResult {
        self.invoke(Hook::Stop)
    }

    fn do_reset(&mut self) -> HookResult {
        self.invoke(Hook::Reset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PlayerCall {
    Open,
    Play,
    Stop,
    Close,
}

/// Shared record of every scripted player's calls, keyed by event name.
#[derive(Debug, Default)]
pub(crate) struct PlayerScript {
    pub log: RefCell<Vec<(String, PlayerCall)>>,
    pub opened: RefCell<Vec<(String, SurfaceId, Rect, MediaSpec)>>,
    pub started_at: RefCell<Vec<Duration>>,
    failing: RefCell<HashSet<(String, PlayerCall)>>,
}

impl PlayerScript {
    pub fn fail(&self, event: &str, call: PlayerCall) {
        self.failing.borrow_mut().insert((event.to_string(), call));
    }

    pub fn calls_for(&self, event: &str) -> Vec<PlayerCall> {
        self.log
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, call)| *call)
            .collect()
    }

    pub fn factory(self: &Rc<Self>) -> PlayerFactory {
        let script = Rc::clone(self);
        Rc::new(move |event: &str| {
            Box::new(ScriptedPlayer {
                event: event.to_string(),
                script: Rc::clone(&script),
            }) as Box<dyn MediaPlayer>
        })
    }

    fn record(&self, event: &str, call: PlayerCall) -> Result<(), MediaError> {
        self.log.borrow_mut().push((event.to_string(), call));
        if self.failing.borrow().contains(&(event.to_string(), call)) {
            return Err(MediaError::PlaybackFailed {
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) struct ScriptedPlayer {
    event: String,
    script: Rc<PlayerScript>,
}

impl MediaPlayer for ScriptedPlayer {
    fn open(
        &mut self,
        surface: SurfaceId,
        region: Rect,
        media: &MediaSpec,
    ) -> Result<(), MediaError> {
        self.script.record(&self.event, PlayerCall::Open)?;
        self.script
            .opened
            .borrow_mut()
            .push((self.event.clone(), surface, region, media.clone()));
        Ok(())
    }

    fn play(&mut self, from: Duration) -> Result<(), MediaError> {
        self.script.record(&self.event, PlayerCall::Play)?;
        self.script.started_at.borrow_mut().push(from);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MediaError> {
        self.script.record(&self.event, PlayerCall::Stop)
    }

    fn close(&mut self) -> Result<(), MediaError> {
        self.script.record(&self.event, PlayerCall::Close)
    }
}
