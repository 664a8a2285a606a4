//! The display container.

use crate::error::DisplayError;
use crate::geometry::{Placement, Rect};
use crate::stack::VisibilityStack;
use marquee_core::SurfaceId;
use rootcause::prelude::Report;
use std::collections::HashMap;
use tracing::debug;

/// A region of the display owned by one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub id: SurfaceId,
    pub placement: Placement,
}

/// The single shared display.
///
/// Surfaces are registered with [`create_surface`](Self::create_surface) and
/// only registered surfaces may be pushed onto the visibility stack.
#[derive(Debug)]
pub struct Display {
    area: Rect,
    surfaces: HashMap<SurfaceId, Surface>,
    stack: VisibilityStack,
}

impl Display {
    /// Creates a display covering `area`, showing an empty floor surface.
    #[must_use]
    pub fn new(area: Rect) -> Self {
        let floor = Surface {
            id: SurfaceId::new(),
            placement: Placement::Stacked,
        };
        let stack = VisibilityStack::new(floor.id);
        Self {
            area,
            surfaces: HashMap::from([(floor.id, floor)]),
            stack,
        }
    }

    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// The permanent background surface.
    #[must_use]
    pub fn floor(&self) -> SurfaceId {
        self.stack.floor()
    }

    /// Registers a new surface without showing it.
    pub fn create_surface(&mut self, placement: Placement) -> SurfaceId {
        let surface = Surface {
            id: SurfaceId::new(),
            placement,
        };
        let id = surface.id;
        self.surfaces.insert(id, surface);
        debug!(surface = %id, ?placement, "created surface");
        id
    }

    /// Number of registered surfaces, including the floor.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Resolves where a surface's content is drawn.
    #[must_use]
    pub fn region(&self, id: SurfaceId) -> Option<Rect> {
        self.surfaces.get(&id).map(|surface| match surface.placement {
            Placement::Stacked => self.area,
            Placement::Absolute { rect } => rect,
        })
    }

    /// Pushes a surface onto the visibility stack, making it visible.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError::UnknownSurface` for surfaces this display did
    /// not create, and `DisplayError::AlreadyPresent` for surfaces already
    /// stacked.
    pub fn push(&mut self, id: SurfaceId) -> Result<(), Report<DisplayError>> {
        if !self.surfaces.contains_key(&id) {
            return Err(DisplayError::UnknownSurface { surface: id }.into());
        }
        self.stack.push(id)?;
        debug!(surface = %id, depth = self.stack.len(), "pushed surface");
        Ok(())
    }

    /// Removes a surface from the visibility stack, wherever it is.
    ///
    /// Returns the position it held, if it was present.
    pub fn pop(&mut self, id: SurfaceId) -> Option<usize> {
        let removed = self.stack.pop(id);
        if let Some(index) = removed {
            debug!(surface = %id, index, current = %self.stack.current(), "popped surface");
        }
        removed
    }

    /// Puts a popped surface back at the position it held.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError::UnknownSurface` for surfaces this display did
    /// not create, and `DisplayError::AlreadyPresent` for surfaces already
    /// stacked.
    pub fn restore(&mut self, id: SurfaceId, index: usize) -> Result<(), Report<DisplayError>> {
        if !self.surfaces.contains_key(&id) {
            return Err(DisplayError::UnknownSurface { surface: id }.into());
        }
        self.stack.restore(id, index)?;
        debug!(surface = %id, index, current = %self.stack.current(), "restored surface");
        Ok(())
    }

    /// The surface currently shown.
    #[must_use]
    pub fn current(&self) -> SurfaceId {
        self.stack.current()
    }

    #[must_use]
    pub fn is_visible(&self, id: SurfaceId) -> bool {
        self.current() == id
    }

    #[must_use]
    pub fn stack(&self) -> &VisibilityStack {
        &self.stack
    }
}
