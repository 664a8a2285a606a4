//! The closed set of event types and their construction from descriptors.

use crate::descriptor::EventDescriptor;
use crate::display_bound::DisplayBound;
use crate::error::LoadError;
use crate::lifecycle::{Event, HookResult, Hooks};
use crate::media::PlayerFactory;
use crate::video::{PlayVideo, PlayVideoSettings};
use marquee_core::SurfaceId;
use marquee_display::Display;
use rootcause::prelude::Report;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Shared resources handed to event constructors.
#[derive(Clone)]
pub struct EventContext {
    pub display: Rc<RefCell<Display>>,
    pub players: PlayerFactory,
}

impl EventContext {
    #[must_use]
    pub fn new(display: Rc<RefCell<Display>>, players: PlayerFactory) -> Self {
        Self { display, players }
    }
}

/// Every concrete event type.
#[derive(Debug)]
pub enum EventKind {
    /// Plays a video into a display surface.
    PlayVideo(DisplayBound<PlayVideo>),
}

type Constructor = fn(&EventContext, &EventDescriptor) -> Result<EventKind, Report<LoadError>>;

/// Type tags accepted in descriptors, with their constructors.
const EVENT_TYPES: &[(&str, Constructor)] = &[("PlayVideo", EventKind::play_video)];

impl EventKind {
    #[must_use]
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::PlayVideo(_) => "PlayVideo",
        }
    }

    /// The display surface owned by this event, if it has one.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceId> {
        match self {
            Self::PlayVideo(bound) => Some(bound.surface()),
        }
    }

    fn play_video(
        context: &EventContext,
        descriptor: &EventDescriptor,
    ) -> Result<Self, Report<LoadError>> {
        let settings: PlayVideoSettings = descriptor.settings_as()?;
        let playback = settings
            .resolve()
            .map_err(|reason| LoadError::InvalidSettings {
                name: descriptor.name.clone(),
                reason,
            })?;

        let player = (context.players)(&descriptor.name);
        let placement = playback.placement;
        let bound = DisplayBound::new(
            Rc::clone(&context.display),
            placement,
            |surface, region| PlayVideo::new(playback, surface, region, player),
        );
        Ok(Self::PlayVideo(bound))
    }
}

impl Hooks for EventKind {
    fn do_initialize(&mut self) -> HookResult {
        match self {
            Self::PlayVideo(bound) => bound.do_initialize(),
        }
    }

    fn do_run(&mut self) -> HookResult {
        match self {
            Self::PlayVideo(bound) => bound.do_run(),
        }
    }

    fn do_stop(&mut self) -> HookResult {
        match self {
            Self::PlayVideo(bound) => bound.do_stop(),
        }
    }

    fn do_reset(&mut self) -> HookResult {
        match self {
            Self::PlayVideo(bound) => bound.do_reset(),
        }
    }
}

/// Lists the registered type tags.
pub fn event_types() -> impl Iterator<Item = &'static str> {
    EVENT_TYPES.iter().map(|(tag, _)| *tag)
}

/// Builds an event of the given type from its descriptor.
///
/// # Errors
///
/// Returns `LoadError::UnknownEventType` if no type is registered under
/// `event_type`, or `LoadError::InvalidSettings` if the type rejects the
/// descriptor's settings.
pub fn create(
    event_type: &str,
    context: &EventContext,
    descriptor: &EventDescriptor,
) -> Result<Event<EventKind>, Report<LoadError>> {
    let Some((_, construct)) = EVENT_TYPES.iter().find(|(tag, _)| *tag == event_type) else {
        return Err(LoadError::UnknownEventType {
            name: descriptor.name.clone(),
            event_type: event_type.to_string(),
        }
        .into());
    };

    let kind = construct(context, descriptor)?;
    debug!(event = %descriptor.name, event_type, surface = ?kind.surface(), "event created");

    Ok(Event::new(descriptor.name.clone(), kind)
        .with_tags(descriptor.tags.iter().cloned())
        .with_cancel_on_error(descriptor.cancel_on_error))
}
