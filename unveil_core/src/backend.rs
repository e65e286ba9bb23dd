// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for rendering integrations.
//!
//! Unveil splits platform-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Geometry source**: produces the viewport rectangle and region bounds
//!   in response to scroll, resize, and layout events (e.g. DOM listeners
//!   coalesced into one `requestAnimationFrame`). This is backend-specific
//!   and not abstracted by a trait because the event plumbing differs
//!   fundamentally across platforms.
//!
//! - **Time**: a `now() -> HostTime` free function used to stamp trace
//!   events.
//!
//! - **Presenter**: implements the [`Presenter`] trait to apply stage changes
//!   to the native element tree (e.g. inline styles on DOM elements).
//!
//! # Crate boundaries
//!
//! `unveil_core` owns the data model, evaluation, and this contract module.
//! Backend crates depend on `unveil_core` and provide platform glue.
//! Application code depends on both and wires them together in a frame
//! loop.

use crate::stage::{Stage, StageChanges};

/// Applies evaluated stage changes to a native presentation tree.
///
/// The DOM presenter and the headless harness both implement this trait,
/// enabling generic frame loops and test doubles.
///
/// # Frame loop pseudocode
///
/// A typical scroll-frame callback wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_frame(viewport: Rect, now: HostTime) {
///     // Geometry: feed the new viewport and any changed bounds.
///     stage.set_viewport(viewport);
///     for (region, bounds) in layout.changed_bounds() {
///         stage.set_bounds(region, bounds);
///     }
///
///     // Evaluate: measure dirty regions, flip latches.
///     let changes = stage.evaluate_traced(now, &mut tracer);
///
///     // Present: start entrance transitions for revealed regions.
///     presenter.apply(&stage, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`StageChanges`] to the backing presentation tree,
    /// reading current element targets from `stage` as needed.
    fn apply(&mut self, stage: &Stage, changes: &StageChanges);
}
