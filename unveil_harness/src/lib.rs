// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless harness for reveal scenarios.
//!
//! - [`SimulatedPage`] stacks sections vertically in document space, drives a
//!   [`Stage`](unveil_core::stage::Stage) from scroll and resize input, and
//!   advances a fixed-step clock one frame per [`frame`](SimulatedPage::frame).
//! - [`RecordingPresenter`] implements
//!   [`Presenter`](unveil_core::backend::Presenter) by recording every target
//!   it is asked to apply, so tests can check delays and sample poses.
//! - [`portfolio`] builds the sections of a single-page portfolio.

#![no_std]

extern crate alloc;

mod page;
pub mod portfolio;
mod presenter;

pub use page::{Block, RevealRecord, SimulatedPage};
pub use presenter::{AppliedTarget, RecordingPresenter};
