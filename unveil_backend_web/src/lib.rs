// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for unveil.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`ScrollSource`]: scroll and resize listeners coalesced into one
//!   `requestAnimationFrame` callback per burst, reporting the viewport in
//!   document coordinates
//! - [`DomPresenter`]: applies element targets as CSS transitions
//!
//! Both viewport and region bounds are expressed in document coordinates,
//! so scrolling only moves the viewport and region bounds only change on
//! layout.

#![no_std]

extern crate alloc;

mod presenter;
mod scroll;

pub use presenter::DomPresenter;
pub use scroll::{ScrollFrame, ScrollSource};
pub use unveil_core::backend::Presenter;

use kurbo::Rect;
use unveil_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks.
#[must_use]
pub fn now() -> HostTime {
    host_time_from_millis(scroll::performance_now())
}

/// Returns the current viewport in document coordinates, or `None` outside
/// a browsing context.
#[must_use]
pub fn viewport() -> Option<Rect> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    let x = window.scroll_x().ok()?;
    let y = window.scroll_y().ok()?;
    Some(viewport_rect(x, y, width, height))
}

/// Converts a `DOMHighResTimeStamp` (ms) to microsecond ticks.
pub(crate) fn host_time_from_millis(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Builds the document-space viewport from scroll offsets and window size.
pub(crate) fn viewport_rect(scroll_x: f64, scroll_y: f64, width: f64, height: f64) -> Rect {
    Rect::new(scroll_x, scroll_y, scroll_x + width, scroll_y + height)
}
