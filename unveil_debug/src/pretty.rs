// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in milliseconds.

use std::io::Write;

use unveil_core::time::HostTime;
use unveil_core::trace::{
    ElementTargetEvent, EvaluateSummary, RegionEvent, RevealEvent, TraceSink, VisibilityEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    verbose: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            verbose: false,
        }
    }

    /// Also prints per-evaluate summaries that report no change, and one
    /// line per element target.
    #[must_use]
    pub fn verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.as_millis_f64()
}

fn region(e: &RegionEvent) -> String {
    format!("region={}@gen{}", e.region_index, e.generation)
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_region_mounted(&mut self, e: &RegionEvent) {
        let _ = writeln!(self.writer, "[mount] {} at {:.1}ms", region(e), ms(e.now));
    }

    fn on_region_unmounted(&mut self, e: &RegionEvent) {
        let _ = writeln!(self.writer, "[unmount] {} at {:.1}ms", region(e), ms(e.now));
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        let state = if e.intersecting { "in" } else { "out" };
        let _ = writeln!(
            self.writer,
            "[visibility] {} {state} ratio={:.3} at {:.1}ms",
            region(&e.region),
            e.ratio,
            ms(e.region.now),
        );
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let _ = writeln!(
            self.writer,
            "[reveal] {} elements={} at {:.1}ms",
            region(&e.region),
            e.elements,
            ms(e.region.now),
        );
    }

    fn on_evaluate_summary(&mut self, s: &EvaluateSummary) {
        let quiet = s.measured == 0
            && s.revealed == 0
            && s.mounted == 0
            && s.unmounted == 0
            && s.interactions == 0;
        if quiet && !self.verbose {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[summary] eval={} live={} measured={} revealed={} mounted={} \
             unmounted={} interactions={} total_measurements={}",
            s.evaluation,
            s.live_regions,
            s.measured,
            s.revealed,
            s.mounted,
            s.unmounted,
            s.interactions,
            s.total_measurements,
        );
    }

    fn on_element_targets(&mut self, r: &RegionEvent, targets: &[ElementTargetEvent]) {
        let last = targets.iter().map(|t| t.delay.saturating_add(t.duration)).max();
        let _ = writeln!(
            self.writer,
            "[targets] {} elements={} settles_after={:?}",
            region(r),
            targets.len(),
            last.unwrap_or_default(),
        );
        if self.verbose {
            for t in targets {
                let _ = writeln!(
                    self.writer,
                    "  element={} delay={:?} duration={:?} opacity={}",
                    t.element_index, t.delay, t.duration, t.opacity,
                );
            }
        }
    }
}
