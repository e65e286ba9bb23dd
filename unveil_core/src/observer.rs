// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport intersection measurement.
//!
//! A [`VisibilityObserver`] turns raw geometry (a region's bounds and the
//! current viewport, both in the same coordinate space) into a stream of
//! [`VisibilitySignal`]s. It is driven from the outside: the host calls
//! [`measure`](VisibilityObserver::measure) when something that could change
//! the answer happened (scroll, resize, layout), never on a timer.
//!
//! # Margin and threshold
//!
//! The viewport is first adjusted by the observer's margin using
//! [`Rect::inset`]: a positive margin grows the effective viewport (regions
//! count as visible before they scroll in), a negative margin shrinks it
//! (regions must be well inside the viewport). The region is then visible
//! when it overlaps the effective viewport with positive area and the
//! overlapping fraction of the region's own area is at least `threshold`.
//!
//! A threshold of `0.0` therefore means "any overlap".
//!
//! # Emission
//!
//! Like a browser `IntersectionObserver`, the observer emits on its first
//! measurement and afterwards only when the intersecting state flips.
//! Bounds that are missing or have zero area are measured as "not
//! intersecting". A [disconnected](VisibilityObserver::disconnect) observer
//! never emits again.

use kurbo::{Insets, Rect};

/// One emission of a [`VisibilityObserver`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilitySignal {
    /// Whether the region counts as visible under the observer's margin and
    /// threshold.
    pub intersecting: bool,
    /// Fraction of the region's area inside the effective viewport
    /// (`0.0..=1.0`). Zero when the bounds are missing.
    pub ratio: f64,
}

/// Margin/threshold-configured intersection detector for one region.
#[derive(Clone, Debug)]
pub struct VisibilityObserver {
    margin: Insets,
    threshold: f64,
    last: Option<bool>,
    connected: bool,
}

impl VisibilityObserver {
    /// Creates an observer with a uniform margin (in px) on all four sides.
    ///
    /// `threshold` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(margin: f64, threshold: f64) -> Self {
        Self::with_insets(Insets::uniform(margin), threshold)
    }

    /// Creates an observer with per-side margins.
    ///
    /// `threshold` is clamped to `0.0..=1.0`; a NaN threshold is treated as
    /// `0.0`.
    #[must_use]
    pub fn with_insets(margin: Insets, threshold: f64) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self {
            margin,
            threshold,
            last: None,
            connected: true,
        }
    }

    /// Returns the configured margin.
    #[must_use]
    pub fn margin(&self) -> Insets {
        self.margin
    }

    /// Returns the configured threshold fraction.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the viewport after the margin has been applied.
    #[must_use]
    pub fn effective_viewport(&self, viewport: Rect) -> Rect {
        viewport.inset(self.margin)
    }

    /// Measures the region against the viewport.
    ///
    /// Returns a signal on the first measurement and whenever the
    /// intersecting state differs from the previous measurement; `None`
    /// otherwise, or when the observer is disconnected.
    pub fn measure(&mut self, bounds: Option<Rect>, viewport: Rect) -> Option<VisibilitySignal> {
        if !self.connected {
            return None;
        }
        let signal = self.evaluate(bounds, viewport);
        if self.last == Some(signal.intersecting) {
            return None;
        }
        self.last = Some(signal.intersecting);
        Some(signal)
    }

    /// Computes the signal for the given geometry without recording it.
    #[must_use]
    pub fn evaluate(&self, bounds: Option<Rect>, viewport: Rect) -> VisibilitySignal {
        let ratio = match bounds {
            Some(bounds) => intersection_ratio(bounds, self.effective_viewport(viewport)),
            None => 0.0,
        };
        VisibilitySignal {
            intersecting: ratio > 0.0 && ratio >= self.threshold,
            ratio,
        }
    }

    /// Returns the intersecting state of the most recent emission.
    #[must_use]
    pub fn last_intersecting(&self) -> Option<bool> {
        self.last
    }

    /// Stops all further emission.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Returns `true` until [`disconnect`](Self::disconnect) is called.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Returns the fraction of `bounds` that lies inside `root`.
///
/// Zero-area (or inverted) bounds and an empty root both yield `0.0`.
#[must_use]
pub fn intersection_ratio(bounds: Rect, root: Rect) -> f64 {
    // Written as negated `>` so NaN coordinates fall through to zero.
    if !(bounds.width() > 0.0 && bounds.height() > 0.0) {
        return 0.0;
    }
    if !(root.width() > 0.0 && root.height() > 0.0) {
        return 0.0;
    }
    let area = bounds.width() * bounds.height();
    let w = bounds.x1.min(root.x1) - bounds.x0.max(root.x0);
    let h = bounds.y1.min(root.y1) - bounds.y0.max(root.y0);
    if w <= 0.0 || h <= 0.0 {
        return 0.0;
    }
    (w * h / area).min(1.0)
}
