// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page-level region store.
//!
//! A *region* is one mounted [`SectionOrchestrator`]. The [`Stage`] owns all
//! of them and adds what a single orchestrator cannot know about:
//!
//! - Identity: a [`RegionId`] is a generational handle that becomes stale
//!   when the region is unmounted, so a remount with the same key never
//!   inherits the old region's revealed state.
//! - The shared viewport, updated on scroll and resize.
//! - Dirty tracking (see [`dirty`](crate::dirty)): geometry changes only
//!   schedule a measurement, and [`evaluate`](Stage::evaluate) performs all
//!   pending measurements in slot order.
//!
//! ```rust,ignore
//! let about = stage.mount(about_section);
//! stage.set_viewport(Rect::new(0.0, 0.0, 1280.0, 800.0));
//! stage.set_bounds(about, Some(Rect::new(0.0, 0.0, 1280.0, 900.0)));
//! let changes = stage.evaluate();
//! assert_eq!(changes.revealed, [about]);
//! ```
//!
//! [`SectionOrchestrator`]: crate::orchestrator::SectionOrchestrator

mod evaluate;
mod id;
mod store;

pub use evaluate::StageChanges;
pub use id::{ElementRef, RegionId};
pub use store::Stage;
