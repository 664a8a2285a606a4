//! The shared display surface.
//!
//! A [`Display`] owns every surface that events may show, and a
//! [`VisibilityStack`] that decides which one is on top. At most one surface
//! is visible at a time: the most recently pushed surface that has not been
//! popped, or the permanent floor surface when none remain.

pub mod display;
pub mod error;
pub mod geometry;
pub mod stack;

pub use display::{Display, Surface};
pub use error::DisplayError;
pub use geometry::{Placement, Rect};
pub use stack::VisibilityStack;
