//! The visibility stack.
//!
//! Despite the name this is not a strict LIFO: surfaces are removed by
//! identity from wherever they sit, and the top is recomputed as the last
//! remaining entry. An event stopped out of push order therefore leaves
//! cleanly, and the next most recently pushed surface becomes visible.

use crate::error::DisplayError;
use marquee_core::SurfaceId;
use rootcause::prelude::Report;

/// Ordered surfaces, with the last one shown.
///
/// The first entry is a permanent floor surface, so [`current`](Self::current)
/// is always defined. Each surface appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityStack {
    entries: Vec<SurfaceId>,
}

impl VisibilityStack {
    /// Creates a stack holding only `floor`.
    #[must_use]
    pub fn new(floor: SurfaceId) -> Self {
        Self {
            entries: vec![floor],
        }
    }

    /// Puts `surface` on top.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError::AlreadyPresent` if the surface is already
    /// stacked; the stack is left unchanged.
    pub fn push(&mut self, surface: SurfaceId) -> Result<(), Report<DisplayError>> {
        if self.contains(surface) {
            return Err(DisplayError::AlreadyPresent { surface }.into());
        }
        self.entries.push(surface);
        Ok(())
    }

    /// Removes `surface` from wherever it sits.
    ///
    /// Returns the position it was removed from, for [`restore`](Self::restore).
    /// Absent surfaces and the floor are ignored.
    pub fn pop(&mut self, surface: SurfaceId) -> Option<usize> {
        if surface == self.floor() {
            return None;
        }
        let index = self.entries.iter().position(|entry| *entry == surface)?;
        self.entries.remove(index);
        Some(index)
    }

    /// Puts a popped surface back at the position [`pop`](Self::pop)
    /// reported, so the surfaces around it keep their order.
    ///
    /// The position is clamped to lie above the floor and at most on top.
    ///
    /// # Errors
    ///
    /// Returns `DisplayError::AlreadyPresent` if the surface is already
    /// stacked; the stack is left unchanged.
    pub fn restore(&mut self, surface: SurfaceId, index: usize) -> Result<(), Report<DisplayError>> {
        if self.contains(surface) {
            return Err(DisplayError::AlreadyPresent { surface }.into());
        }
        let index = index.clamp(1, self.entries.len());
        self.entries.insert(index, surface);
        Ok(())
    }

    /// The surface currently shown.
    #[must_use]
    pub fn current(&self) -> SurfaceId {
        self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn floor(&self) -> SurfaceId {
        self.entries[0]
    }

    #[must_use]
    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.entries.contains(&surface)
    }

    /// All entries, floor first.
    #[must_use]
    pub fn entries(&self) -> &[SurfaceId] {
        &self.entries
    }

    /// Number of entries, including the floor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether only the floor remains.
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.entries.len() == 1
    }
}
