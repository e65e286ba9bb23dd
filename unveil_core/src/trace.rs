// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for stage evaluation.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`Stage::evaluate_traced`](crate::stage::Stage::evaluate_traced) calls for
//! every change it reports. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Events carry raw slot indices and generations rather than
//! [`RegionId`]s so that sinks can store and serialize them directly.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`ElementTargetEvent`] and the
//!   corresponding `TraceSink` method.

use crate::stage::RegionId;
use crate::time::HostTime;

#[cfg(feature = "trace-rich")]
use crate::orchestrator::{ElementIndex, ElementTarget};
#[cfg(feature = "trace-rich")]
use crate::time::Millis;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Identifies a region at a point in time. Emitted on mount and unmount, and
/// embedded in the other region events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionEvent {
    /// Slot index of the region.
    pub region_index: u32,
    /// Generation of the slot.
    pub generation: u32,
    /// Host time of the evaluation that reported the event.
    pub now: HostTime,
}

impl RegionEvent {
    /// Creates an event for `id` at `now`.
    #[must_use]
    pub const fn new(id: RegionId, now: HostTime) -> Self {
        Self {
            region_index: id.index(),
            generation: id.generation(),
            now,
        }
    }
}

/// Emitted for every observer emission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    /// The measured region.
    pub region: RegionEvent,
    /// Whether the region counts as visible.
    pub intersecting: bool,
    /// Fraction of the region inside the effective viewport.
    pub ratio: f64,
}

/// Emitted when a region's latch flips to revealed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealEvent {
    /// The revealed region.
    pub region: RegionEvent,
    /// Number of elements that start their entrance.
    pub elements: u32,
}

/// Per-evaluate summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvaluateSummary {
    /// Monotonic evaluation counter.
    pub evaluation: u64,
    /// Host time of the evaluation.
    pub now: HostTime,
    /// Regions mounted after the evaluation.
    pub live_regions: u32,
    /// Observer emissions during the evaluation.
    pub measured: u32,
    /// Regions revealed during the evaluation.
    pub revealed: u32,
    /// Regions reported as mounted.
    pub mounted: u32,
    /// Regions reported as unmounted.
    pub unmounted: u32,
    /// Elements with a changed gesture target.
    pub interactions: u32,
    /// Measurements performed since the stage was created.
    pub total_measurements: u64,
}

/// The target an element received when its region was revealed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementTargetEvent {
    /// Index of the element within its region.
    pub element_index: u32,
    /// Delay before the element starts moving.
    pub delay: Millis,
    /// Length of the move.
    pub duration: Millis,
    /// Target opacity.
    pub opacity: f32,
}

#[cfg(feature = "trace-rich")]
impl ElementTargetEvent {
    /// Creates an event from an element's resolved target.
    #[must_use]
    pub fn new(element: ElementIndex, target: &ElementTarget) -> Self {
        Self {
            element_index: element.get(),
            delay: target.delay,
            duration: target.duration,
            opacity: target.pose.opacity,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from stage evaluation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for each region reported as mounted.
    fn on_region_mounted(&mut self, e: &RegionEvent) {
        _ = e;
    }

    /// Called for each region reported as unmounted.
    fn on_region_unmounted(&mut self, e: &RegionEvent) {
        _ = e;
    }

    /// Called for each observer emission.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called when a region is revealed.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// Called once at the end of every traced evaluation.
    fn on_evaluate_summary(&mut self, s: &EvaluateSummary) {
        _ = s;
    }

    /// Called with the element targets of a freshly revealed region
    /// (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_element_targets(&mut self, region: &RegionEvent, targets: &[ElementTargetEvent]) {
        _ = (region, targets);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a mount [`RegionEvent`].
    #[inline]
    pub fn region_mounted(&mut self, e: &RegionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_region_mounted(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an unmount [`RegionEvent`].
    #[inline]
    pub fn region_unmounted(&mut self, e: &RegionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_region_unmounted(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisibilityEvent`].
    #[inline]
    pub fn visibility(&mut self, e: &VisibilityEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visibility(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RevealEvent`].
    #[inline]
    pub fn reveal(&mut self, e: &RevealEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reveal(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EvaluateSummary`].
    #[inline]
    pub fn evaluate_summary(&mut self, s: &EvaluateSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_evaluate_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits element targets (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn element_targets(&mut self, region: &RegionEvent, targets: &[ElementTargetEvent]) {
        if let Some(s) = &mut self.sink {
            s.on_element_targets(region, targets);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
