// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region and element identity types.

use core::fmt;

use crate::orchestrator::ElementIndex;

/// A handle to a mounted region in a [`Stage`](super::Stage).
///
/// Contains both a slot index and a generation counter so that a handle kept
/// across an unmount never resolves to the region mounted into the reused
/// slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId {
    /// Slot index into the stage's arrays.
    pub(crate) idx: u32,
    /// Must match the stage's generation for this slot.
    pub(crate) generation: u32,
}

impl RegionId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionId({}@gen{})", self.idx, self.generation)
    }
}

/// An element of a specific mounted region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementRef {
    /// The owning region.
    pub region: RegionId,
    /// The element within that region.
    pub element: ElementIndex,
}
