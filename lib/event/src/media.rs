//! The boundary to whatever actually renders media.

use crate::error::MediaError;
use marquee_core::SurfaceId;
use marquee_display::Rect;
use std::rc::Rc;
use std::time::Duration;

/// What a player should load.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSpec {
    pub url: String,
    /// Restart from the beginning when the end is reached.
    pub looping: bool,
    /// Percentage, 0 to 100.
    pub volume: u8,
    pub playback_rate: f64,
    /// Stop after this much playback, if set.
    pub duration: Option<Duration>,
}

/// A media player drawing into one display surface.
///
/// Implementations are supplied by the embedding application. They are only
/// called from lifecycle hooks, on the ticking thread.
pub trait MediaPlayer {
    /// Loads media into the given surface region.
    fn open(&mut self, surface: SurfaceId, region: Rect, media: &MediaSpec)
    -> Result<(), MediaError>;

    /// Starts playback at `from`.
    fn play(&mut self, from: Duration) -> Result<(), MediaError>;

    /// Stops playback, keeping the media loaded.
    fn stop(&mut self) -> Result<(), MediaError>;

    /// Releases the media.
    fn close(&mut self) -> Result<(), MediaError>;
}

/// Creates a player for the named event.
pub type PlayerFactory = Rc<dyn Fn(&str) -> Box<dyn MediaPlayer>>;
