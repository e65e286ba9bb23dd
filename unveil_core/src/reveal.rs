// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot reveal latch.
//!
//! A [`RevealLatch`] is a two-state machine, `Pending → Revealed`, with
//! `Revealed` terminal. Every visibility signal is folded in as
//! `revealed := revealed || intersecting`, so a late or stale "not visible"
//! signal can never undo a reveal, and a region that was seen once keeps its
//! revealed pose when scrolled back out of view.
//!
//! [`observe`](RevealLatch::observe) reports the flip as a
//! [`RevealTransition`] exactly once; later calls return `None` no matter
//! what they are fed.

/// The two states of a [`RevealLatch`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// The region has not been visible yet.
    #[default]
    Pending,
    /// The region has been visible at least once. Terminal.
    Revealed,
}

/// Proof that a latch flipped from [`Pending`](RevealPhase::Pending) to
/// [`Revealed`](RevealPhase::Revealed) on a particular observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RevealTransition {
    /// Number of signals the latch had observed before the one that
    /// revealed it.
    pub after_signals: u32,
}

/// Monotonic per-region reveal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealLatch {
    phase: RevealPhase,
    observed: u32,
}

impl RevealLatch {
    /// Creates a latch in the [`Pending`](RevealPhase::Pending) phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: RevealPhase::Pending,
            observed: 0,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Returns `true` once the latch has been revealed.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        matches!(self.phase, RevealPhase::Revealed)
    }

    /// Returns how many signals have been observed.
    #[must_use]
    pub const fn observed(&self) -> u32 {
        self.observed
    }

    /// Folds one visibility signal into the latch.
    ///
    /// Returns `Some` only for the signal that moves the latch from pending
    /// to revealed.
    pub fn observe(&mut self, intersecting: bool) -> Option<RevealTransition> {
        let before = self.observed;
        self.observed = self.observed.saturating_add(1);
        if self.is_revealed() || !intersecting {
            return None;
        }
        self.phase = RevealPhase::Revealed;
        Some(RevealTransition {
            after_signals: before,
        })
    }

    /// Maps a stream of visibility signals to the stream of revealed states.
    ///
    /// Each output item is the latch state after folding in the matching
    /// input. The latch is updated as the iterator is consumed.
    pub fn observe_stream<'a, I>(&'a mut self, signals: I) -> impl Iterator<Item = bool> + 'a
    where
        I: IntoIterator<Item = bool>,
        I::IntoIter: 'a,
    {
        signals.into_iter().map(move |intersecting| {
            let _ = self.observe(intersecting);
            self.is_revealed()
        })
    }
}
