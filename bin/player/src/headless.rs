//! A media player that renders nothing and logs what it would do.

use marquee_core::SurfaceId;
use marquee_display::Rect;
use marquee_event::{MediaError, MediaPlayer, MediaSpec, PlayerFactory};
use std::rc::Rc;
use std::time::Duration;
use tracing::info;

/// Tracks playback state for one event without rendering anything.
#[derive(Debug)]
pub struct HeadlessPlayer {
    event: String,
    loaded: Option<Loaded>,
}

#[derive(Debug)]
struct Loaded {
    surface: SurfaceId,
    media: MediaSpec,
    playing: bool,
}

impl HeadlessPlayer {
    #[must_use]
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            loaded: None,
        }
    }

    /// Creates a headless player for each event.
    #[must_use]
    pub fn factory() -> PlayerFactory {
        Rc::new(|event: &str| Box::new(Self::new(event)) as Box<dyn MediaPlayer>)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.loaded.is_some()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.loaded.as_ref().is_some_and(|loaded| loaded.playing)
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, MediaError> {
        self.loaded.as_mut().ok_or(MediaError::NotOpen)
    }
}

impl MediaPlayer for HeadlessPlayer {
    fn open(
        &mut self,
        surface: SurfaceId,
        region: Rect,
        media: &MediaSpec,
    ) -> Result<(), MediaError> {
        if media.url.is_empty() {
            return Err(MediaError::OpenFailed {
                url: media.url.clone(),
                reason: "empty url".to_string(),
            });
        }
        info!(
            event = %self.event,
            %surface,
            %region,
            url = %media.url,
            looping = media.looping,
            volume = media.volume,
            playback_rate = media.playback_rate,
            "media opened"
        );
        self.loaded = Some(Loaded {
            surface,
            media: media.clone(),
            playing: false,
        });
        Ok(())
    }

    fn play(&mut self, from: Duration) -> Result<(), MediaError> {
        let event = self.event.clone();
        let loaded = self.loaded_mut()?;
        loaded.playing = true;
        info!(
            %event,
            surface = %loaded.surface,
            url = %loaded.media.url,
            from_secs = from.as_secs_f64(),
            duration_secs = loaded.media.duration.map(|d| d.as_secs_f64()),
            "playing"
        );
        Ok(())
    }

    fn stop(&mut self) -> Result<(), MediaError> {
        let event = self.event.clone();
        let loaded = self.loaded_mut()?;
        loaded.playing = false;
        info!(%event, url = %loaded.media.url, "stopped");
        Ok(())
    }

    fn close(&mut self) -> Result<(), MediaError> {
        let loaded = self.loaded.take().ok_or(MediaError::NotOpen)?;
        info!(event = %self.event, url = %loaded.media.url, "media closed");
        Ok(())
    }
}
