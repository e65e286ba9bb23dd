// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`Stage`](crate::stage::Stage) tracks pending work per region slot
//! with [`understory_dirty`]. Every channel is local to the marked region;
//! regions never depend on each other.
//!
//! - [`GEOMETRY`]: the region's bounds or the viewport changed, so the
//!   region must be measured again. Marked by
//!   [`set_viewport`](crate::stage::Stage::set_viewport) (every region that
//!   is still observing), [`set_bounds`](crate::stage::Stage::set_bounds),
//!   and [`mount`](crate::stage::Stage::mount).
//! - [`REVEAL`]: the region's latch flipped during the current
//!   evaluation. Drained into
//!   [`StageChanges::revealed`](crate::stage::StageChanges::revealed).
//! - [`TOPOLOGY`]: a region was mounted or unmounted.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`Stage::evaluate`](crate::stage::Stage::evaluate) call drains all
//! channels and surfaces the results as
//! [`StageChanges`](crate::stage::StageChanges), which presenters
//! [consume](crate::backend::Presenter::apply).

use understory_dirty::Channel;

/// Bounds or viewport changed; the region needs measuring.
pub const GEOMETRY: Channel = Channel::new(0);

/// The region's reveal latch flipped.
pub const REVEAL: Channel = Channel::new(1);

/// A region was mounted or unmounted.
pub const TOPOLOGY: Channel = Channel::new(2);
