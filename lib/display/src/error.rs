//! Error types for the display crate.

use marquee_core::SurfaceId;
use std::fmt;

/// Errors from display and visibility stack operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The surface is already on the visibility stack.
    AlreadyPresent { surface: SurfaceId },
    /// The surface was not created by this display.
    UnknownSurface { surface: SurfaceId },
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPresent { surface } => {
                write!(f, "surface {surface} is already on the visibility stack")
            }
            Self::UnknownSurface { surface } => {
                write!(f, "surface {surface} is not registered with this display")
            }
        }
    }
}

impl std::error::Error for DisplayError {}
