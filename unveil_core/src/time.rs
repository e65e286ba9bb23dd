// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timestamps and animation durations.
//!
//! [`HostTime`] is a monotonic point in time in microsecond ticks, as read
//! from `performance.now()` by the web backend. It only stamps trace events;
//! the reveal logic itself never reads a clock.
//!
//! [`Millis`] is a non-negative span in whole milliseconds. Every delay and
//! duration in an [`AnimationVariant`](crate::variant::AnimationVariant) or a
//! [`Stagger`](crate::stagger::Stagger) is expressed in it. Arithmetic
//! saturates instead of wrapping.

use core::fmt;
use core::ops::{Add, Mul};

/// A point in time expressed as monotonic microsecond ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the value in (fractional) milliseconds.
    #[inline]
    #[must_use]
    pub fn as_millis_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Returns the elapsed time since an earlier instant, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sub-millisecond precision is dropped and spans beyond u32::MAX ms saturate"
    )]
    pub const fn saturating_millis_since(self, earlier: Self) -> Millis {
        let micros = self.0.saturating_sub(earlier.0);
        let ms = micros / 1000;
        if ms > u32::MAX as u64 {
            Millis(u32::MAX)
        } else {
            Millis(ms as u32)
        }
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}µs)", self.0)
    }
}

/// A span of whole milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(pub u32);

impl Millis {
    /// Zero milliseconds.
    pub const ZERO: Self = Self(0);

    /// Returns the raw millisecond count.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the span in seconds, as used by CSS `transition-*` properties.
    #[inline]
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.0) / 1000.0
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating multiplication by an element index.
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, n: u32) -> Self {
        Self(self.0.saturating_mul(n))
    }
}

impl Add for Millis {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl Mul<u32> for Millis {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: u32) -> Self {
        self.saturating_mul(rhs)
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
