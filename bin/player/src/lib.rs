//! The marquee player: configuration, a headless media player and the tick
//! driver that runs a programme against the wall clock.

pub mod config;
pub mod headless;
pub mod show;
