// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport-triggered reveal orchestration.
//!
//! `unveil_core` decides when each section of a scrolling page plays its
//! one-shot entrance animation, and which pose every element inside it
//! should animate toward, after what delay. It owns no renderer and reads
//! no clock; a backend feeds it geometry and applies its answers. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Backend (scroll / resize / layout)
//!       │ viewport, bounds
//!       ▼
//!   Stage::set_viewport() / set_bounds() ──► dirty GEOMETRY
//!                                                │
//!                 ┌──────────────────────────────┘
//!                 ▼
//!   Stage::evaluate() ──► VisibilityObserver ──► RevealLatch
//!                 │
//!                 ▼
//!   StageChanges ──► Presenter::apply() ──► ElementTarget per element
//!                                              (StaggerSequencer)
//! ```
//!
//! **[`observer`]**: margin-adjusted intersection test that emits a
//! [`VisibilitySignal`](observer::VisibilitySignal) on change.
//!
//! **[`reveal`]**: the one-shot `pending → revealed` latch.
//!
//! **[`variant`]**: immutable start/end poses with duration, delay, and
//! easing, plus hover/press gesture poses.
//!
//! **[`stagger`]**: stateless delay computation for nested cascades.
//!
//! **[`orchestrator`]**: composes the above for one section of the page.
//!
//! **[`stage`]**: all mounted sections behind generational handles, with
//! incremental evaluation.
//!
//! **[`dirty`]**: dirty-tracking channels via `understory_dirty`.
//!
//! **[`backend`]**: the [`Presenter`](backend::Presenter) trait that
//! rendering backends implement.
//!
//! **[`time`]**: host timestamps and millisecond spans.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! evaluation instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-element
//!   target events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod dirty;
pub mod observer;
pub mod orchestrator;
pub mod reveal;
pub mod stage;
pub mod stagger;
pub mod time;
pub mod trace;
pub mod variant;
