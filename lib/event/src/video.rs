//! The `PlayVideo` event type.

use crate::error::HookError;
use crate::lifecycle::{HookResult, Hooks};
use crate::media::{MediaPlayer, MediaSpec};
use crate::state::Hook;
use marquee_core::SurfaceId;
use marquee_display::{Placement, Rect};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Settings for a `PlayVideo` event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayVideoSettings {
    pub url: String,
    /// Where playback starts, in seconds.
    #[serde(default)]
    pub start: f64,
    /// How long to play, in seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default = "default_looping", rename = "loop")]
    pub looping: bool,
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default = "default_playback_rate", alias = "playbackRate")]
    pub playback_rate: f64,
    /// `[x, y, width, height]`; when absent the video fills the display.
    #[serde(default)]
    pub geometry: Option<Rect>,
}

fn default_looping() -> bool {
    true
}

fn default_volume() -> u8 {
    100
}

fn default_playback_rate() -> f64 {
    1.0
}

impl PlayVideoSettings {
    /// Checks ranges that deserialization cannot express and converts the
    /// settings into what the player needs.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn resolve(&self) -> Result<Playback, String> {
        let start = seconds("start", self.start)?;
        let duration = self
            .duration
            .map(|duration| seconds("duration", duration))
            .transpose()?;
        if duration.is_some_and(|duration| duration.is_zero()) {
            return Err("duration must be positive".to_string());
        }
        if self.volume > 100 {
            return Err(format!("volume must be between 0 and 100, got {}", self.volume));
        }
        if !self.playback_rate.is_finite() || self.playback_rate <= 0.0 {
            return Err(format!("playback_rate must be positive, got {}", self.playback_rate));
        }

        Ok(Playback {
            media: MediaSpec {
                url: self.url.clone(),
                looping: self.looping,
                volume: self.volume,
                playback_rate: self.playback_rate,
                duration,
            },
            start,
            placement: match self.geometry {
                Some(rect) => Placement::Absolute { rect },
                None => Placement::Stacked,
            },
        })
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration, String> {
    Duration::try_from_secs_f64(value)
        .map_err(|e| format!("{name} must be a non-negative number of seconds, got {value}: {e}"))
}

/// Validated `PlayVideo` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    pub media: MediaSpec,
    /// Where playback starts.
    pub start: Duration,
    pub placement: Placement,
}

/// Plays a video into the event's surface.
pub struct PlayVideo {
    surface: SurfaceId,
    region: Rect,
    media: MediaSpec,
    start: Duration,
    player: Box<dyn MediaPlayer>,
}

impl PlayVideo {
    #[must_use]
    pub fn new(
        playback: Playback,
        surface: SurfaceId,
        region: Rect,
        player: Box<dyn MediaPlayer>,
    ) -> Self {
        Self {
            surface,
            region,
            media: playback.media,
            start: playback.start,
            player,
        }
    }

    #[must_use]
    pub fn media(&self) -> &MediaSpec {
        &self.media
    }

    #[must_use]
    pub fn region(&self) -> Rect {
        self.region
    }
}

impl fmt::Debug for PlayVideo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayVideo")
            .field("surface", &self.surface)
            .field("region", &self.region)
            .field("media", &self.media)
            .field("start", &self.start)
            .finish_non_exhaustive()
    }
}

fn media_failure(hook: Hook) -> impl FnOnce(crate::error::MediaError) -> HookError {
    move |e| HookError::Media {
        hook,
        reason: e.to_string(),
    }
}

impl Hooks for PlayVideo {
    fn do_initialize(&mut self) -> HookResult {
        self.player
            .open(self.surface, self.region, &self.media)
            .map_err(media_failure(Hook::Initialize))?;
        Ok(())
    }

    fn do_run(&mut self) -> HookResult {
        self.player
            .play(self.start)
            .map_err(media_failure(Hook::Run))?;
        Ok(())
    }

    fn do_stop(&mut self) -> HookResult {
        self.player.stop().map_err(media_failure(Hook::Stop))?;
        Ok(())
    }

    fn do_reset(&mut self) -> HookResult {
        self.player.close().map_err(media_failure(Hook::Reset))?;
        Ok(())
    }
}
