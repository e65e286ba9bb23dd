// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascading entrance delays.
//!
//! Sibling elements inside a revealed region do not all start at once; each
//! one waits `base + index * step` after the reveal, where `base` and `step`
//! come from the [`Stagger`] of the group the element sits in.
//!
//! Groups nest. A group (for example a grid of cards) is itself placed in
//! its parent's cascade, and the delay it receives there becomes the
//! `group_delay_base` of everything inside it. An element's full delay is
//! therefore the sum of one `base + index * step` term per nesting level,
//! outermost first:
//!
//! ```text
//! region stagger    base 0,   step 100   ┐
//!   └─ skills grid  order 2             ─┤ 0 + 2*100           = 200
//!        stagger    base 100, step 50    ┐
//!          └─ card  order 3             ─┘ 200 + 100 + 3*50    = 450
//! ```
//!
//! [`StaggerSequencer`] evaluates a [`StaggerPath`] without holding any
//! state, so recomputing it on every render is free of flicker: the same
//! path always yields the same delay, and two elements with equal
//! `(group index, intra index)` under equal staggers start together.

use crate::time::Millis;
use crate::variant::AnimationVariant;

/// Per-group delay parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stagger {
    /// Delay before the first child starts.
    pub base: Millis,
    /// Extra delay per child position.
    pub step: Millis,
}

impl Stagger {
    /// All children start together, immediately.
    pub const NONE: Self = Self {
        base: Millis::ZERO,
        step: Millis::ZERO,
    };

    /// Creates a stagger from millisecond values.
    #[must_use]
    pub const fn new(base_ms: u32, step_ms: u32) -> Self {
        Self {
            base: Millis(base_ms),
            step: Millis(step_ms),
        }
    }

    /// Returns the delay of the child at `index`.
    #[inline]
    #[must_use]
    pub const fn delay_for(self, index: u32) -> Millis {
        self.base.saturating_add(self.step.saturating_mul(index))
    }
}

/// Where an element sits in its region's cascade.
///
/// Built once when the element is added; see [`StaggerPath::root`] and
/// [`StaggerPath::nested`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StaggerPath {
    /// Accumulated delay of every enclosing group.
    pub group_delay_base: Millis,
    /// Stagger of the innermost enclosing group.
    pub stagger: Stagger,
    /// Position among siblings in that group.
    pub index: u32,
    /// Number of enclosing groups below the region (0 for direct children).
    pub depth: u8,
}

impl StaggerPath {
    /// Path of a direct child of the region at position `index`.
    #[must_use]
    pub const fn root(stagger: Stagger, index: u32) -> Self {
        Self {
            group_delay_base: Millis::ZERO,
            stagger,
            index,
            depth: 0,
        }
    }

    /// Path of the child at `index` inside a group whose own path is
    /// `group` and whose children follow `stagger`.
    #[must_use]
    pub const fn nested(group: &Self, stagger: Stagger, index: u32) -> Self {
        Self {
            group_delay_base: StaggerSequencer::compute_delay(group),
            stagger,
            index,
            depth: group.depth.saturating_add(1),
        }
    }
}

/// Stateless delay calculator.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaggerSequencer;

impl StaggerSequencer {
    /// Returns the stagger offset of the element at `path`, measured from
    /// the region's reveal.
    #[inline]
    #[must_use]
    pub const fn compute_delay(path: &StaggerPath) -> Millis {
        path.group_delay_base
            .saturating_add(path.stagger.delay_for(path.index))
    }

    /// Returns the delay a renderer should wait before animating the element
    /// toward its current target.
    ///
    /// A pending region has nothing scheduled, so the delay is zero. Once
    /// revealed, the variant's own delay is added in front of the stagger
    /// offset.
    #[inline]
    #[must_use]
    pub fn effective_delay(revealed: bool, path: &StaggerPath, variant: &AnimationVariant) -> Millis {
        if revealed {
            variant.delay + Self::compute_delay(path)
        } else {
            Millis::ZERO
        }
    }
}
