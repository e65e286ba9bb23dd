// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage evaluation and change tracking.
//!
//! Evaluation drains each dirty channel in a fixed order:
//!
//! 1. **GEOMETRY**: Measure every marked region against the viewport and
//!    fold the signal into its latch. Skipped entirely until a viewport has
//!    been set, so marks made before that are kept.
//! 2. **REVEAL**: Collect the regions whose latch flipped in step 1.
//! 3. **TOPOLOGY**: Drain and discard; mounts and unmounts are reported
//!    from the lifecycle lists.
//!
//! Within a channel regions are visited in slot order, so two regions that
//! become visible in the same frame are always reported the same way.

use alloc::vec::Vec;

use super::id::{ElementRef, RegionId};
use super::store::Stage;
use crate::dirty;
use crate::observer::VisibilitySignal;
use crate::time::HostTime;
use crate::trace::{EvaluateSummary, RegionEvent, RevealEvent, Tracer, VisibilityEvent};

/// The set of changes produced by a single [`Stage::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct StageChanges {
    /// Regions mounted since the last evaluate.
    pub mounted: Vec<RegionId>,
    /// Regions unmounted since the last evaluate.
    pub unmounted: Vec<RegionId>,
    /// Regions revealed during this evaluate. Every element of these regions
    /// has a new target.
    pub revealed: Vec<RegionId>,
    /// Elements whose gesture target changed since the last evaluate.
    pub interactions: Vec<ElementRef>,
    /// Observer emissions of this evaluate, in slot order.
    pub measured: Vec<(RegionId, VisibilitySignal)>,
    /// Whether any region was mounted or unmounted.
    pub topology_changed: bool,
}

impl StageChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.mounted.clear();
        self.unmounted.clear();
        self.revealed.clear();
        self.interactions.clear();
        self.measured.clear();
        self.topology_changed = false;
    }

    /// Whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
            && self.unmounted.is_empty()
            && self.revealed.is_empty()
            && self.interactions.is_empty()
            && self.measured.is_empty()
            && !self.topology_changed
    }
}

impl Stage {
    /// Evaluates the stage, measuring dirty regions and returning the set of
    /// changes.
    pub fn evaluate(&mut self) -> StageChanges {
        let mut changes = StageChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut StageChanges) {
        changes.clear();
        self.evaluations += 1;

        // Drain GEOMETRY channel, measuring each region.
        if let Some(viewport) = self.viewport {
            let dirty_geometry: Vec<u32> = self
                .dirty
                .drain(dirty::GEOMETRY)
                .deterministic()
                .run()
                .collect();
            for idx in dirty_geometry {
                let Some(section) = self.sections[idx as usize].as_mut() else {
                    continue;
                };
                let measurement = section.measure(viewport);
                self.measurements += 1;
                let id = RegionId {
                    idx,
                    generation: self.generation[idx as usize],
                };
                if let Some(signal) = measurement.signal {
                    changes.measured.push((id, signal));
                }
                if measurement.transition.is_some() {
                    self.dirty.mark(idx, dirty::REVEAL);
                }
            }
        }

        // Drain REVEAL channel.
        changes.revealed = self
            .dirty
            .drain(dirty::REVEAL)
            .deterministic()
            .run()
            .map(|idx| RegionId {
                idx,
                generation: self.generation[idx as usize],
            })
            .collect();

        // Drain TOPOLOGY channel (just consume, changes are structural).
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_mounted, &mut changes.mounted);
        core::mem::swap(&mut self.pending_unmounted, &mut changes.unmounted);
        core::mem::swap(&mut self.pending_interactions, &mut changes.interactions);
    }

    /// Like [`evaluate`](Self::evaluate), additionally reporting every change
    /// to `tracer`, stamped with `now`.
    pub fn evaluate_traced(&mut self, now: HostTime, tracer: &mut Tracer<'_>) -> StageChanges {
        let mut changes = StageChanges::default();
        self.evaluate_into(&mut changes);

        for &id in &changes.mounted {
            tracer.region_mounted(&RegionEvent::new(id, now));
        }
        for &id in &changes.unmounted {
            tracer.region_unmounted(&RegionEvent::new(id, now));
        }
        for &(id, signal) in &changes.measured {
            tracer.visibility(&VisibilityEvent {
                region: RegionEvent::new(id, now),
                intersecting: signal.intersecting,
                ratio: signal.ratio,
            });
        }
        for &id in &changes.revealed {
            let elements = self.get(id).map_or(0, |s| s.element_count());
            tracer.reveal(&RevealEvent {
                region: RegionEvent::new(id, now),
                elements: count_u32(elements),
            });
            #[cfg(feature = "trace-rich")]
            if let Some(section) = self.get(id) {
                let targets: Vec<_> = section
                    .targets()
                    .map(|(idx, t)| crate::trace::ElementTargetEvent::new(idx, &t))
                    .collect();
                tracer.element_targets(&RegionEvent::new(id, now), &targets);
            }
        }
        tracer.evaluate_summary(&EvaluateSummary {
            evaluation: self.evaluations,
            now,
            live_regions: count_u32(self.len()),
            measured: count_u32(changes.measured.len()),
            revealed: count_u32(changes.revealed.len()),
            mounted: count_u32(changes.mounted.len()),
            unmounted: count_u32(changes.unmounted.len()),
            interactions: count_u32(changes.interactions.len()),
            total_measurements: self.measurements,
        });
        changes
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "per-evaluate counts are bounded by the number of regions and elements"
)]
const fn count_u32(n: usize) -> u32 {
    n as u32
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use kurbo::Rect;

    use super::*;
    use crate::orchestrator::{ElementConfig, ElementIndex, Interaction, RegionConfig, SectionOrchestrator};
    use crate::time::Millis;
    use crate::variant::{AnimationVariant, GesturePoses, Pose};

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

    fn cards(key: &str) -> SectionOrchestrator {
        let mut s = SectionOrchestrator::new(key, RegionConfig::section());
        let card = AnimationVariant::fade_rise(40.0).shared();
        let _ = s.add_element(ElementConfig::new(0, Rc::clone(&card)));
        let _ = s.add_element(
            ElementConfig::new(1, card).with_gestures(GesturePoses::scale(1.05, 0.95)),
        );
        s
    }

    fn at(top: f64) -> Option<Rect> {
        Some(Rect::new(0.0, top, 1280.0, top + 600.0))
    }

    #[test]
    fn nothing_is_measured_without_viewport() {
        let mut stage = Stage::new();
        let id = stage.mount(cards("about"));
        let _ = stage.set_bounds(id, at(0.0));
        let changes = stage.evaluate();
        assert_eq!(changes.mounted, [id]);
        assert!(changes.measured.is_empty());

        // The mount mark survives until a viewport arrives.
        stage.set_viewport(VIEWPORT);
        let changes = stage.evaluate();
        assert_eq!(changes.revealed, [id]);
    }

    #[test]
    fn region_in_view_at_mount_reveals_without_scroll() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("about"));
        let _ = stage.set_bounds(id, at(0.0));
        let changes = stage.evaluate();
        assert!(changes.topology_changed);
        assert_eq!(changes.revealed, [id]);
        assert!(stage.is_revealed(id));
    }

    #[test]
    fn reveal_is_reported_once() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("projects"));
        let _ = stage.set_bounds(id, at(2000.0));
        assert!(stage.evaluate().revealed.is_empty());

        let _ = stage.set_bounds(id, at(500.0));
        assert_eq!(stage.evaluate().revealed, [id]);

        for top in [3000.0, 500.0, -2000.0, 0.0] {
            let _ = stage.set_bounds(id, at(top));
            let changes = stage.evaluate();
            assert!(changes.revealed.is_empty(), "re-fired at top {top}");
            assert!(changes.measured.is_empty(), "revealed regions are not measured");
        }
    }

    #[test]
    fn evaluate_twice_is_empty() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("projects"));
        let _ = stage.set_bounds(id, at(0.0));
        let _ = stage.evaluate();
        assert!(stage.evaluate().is_empty());
    }

    #[test]
    fn reveals_are_in_slot_order() {
        let mut stage = Stage::new();
        let a = stage.mount(cards("a"));
        let b = stage.mount(cards("b"));
        let _ = stage.set_bounds(b, at(0.0));
        let _ = stage.set_bounds(a, at(100.0));
        stage.set_viewport(VIEWPORT);
        assert_eq!(stage.evaluate().revealed, [a, b]);
    }

    #[test]
    fn unmount_discards_state() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let first = stage.mount(cards("projects"));
        let _ = stage.set_bounds(first, at(0.0));
        let _ = stage.evaluate();
        assert!(stage.is_revealed(first));

        assert!(stage.unmount(first));
        let changes = stage.evaluate();
        assert_eq!(changes.unmounted, [first]);
        assert!(changes.revealed.is_empty());

        let second = stage.mount(cards("projects"));
        assert!(!stage.is_revealed(second), "remount starts pending");
        let target = stage.target(ElementRef {
            region: second,
            element: ElementIndex(1),
        });
        assert_eq!(target.map(|t| t.delay), Some(Millis::ZERO));
    }

    #[test]
    fn mount_then_unmount_before_evaluate_is_silent() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("contact"));
        let _ = stage.set_bounds(id, at(0.0));
        assert!(stage.unmount(id));
        let changes = stage.evaluate();
        assert!(changes.mounted.is_empty());
        assert!(changes.unmounted.is_empty());
        assert!(changes.revealed.is_empty());
        assert!(changes.measured.is_empty());
    }

    #[test]
    fn interactions_are_reported() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("projects"));
        let _ = stage.set_bounds(id, at(0.0));
        let _ = stage.evaluate();

        let card = ElementRef {
            region: id,
            element: ElementIndex(1),
        };
        assert!(stage.set_interaction(card, Interaction::Hover));
        let changes = stage.evaluate();
        assert_eq!(changes.interactions, [card]);
        let pose = stage.target(card).map(|t| t.pose);
        assert_eq!(pose, Some(Pose::SHOWN.scaled(1.05)));
    }

    #[test]
    fn interactions_of_unmounted_regions_are_dropped() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("projects"));
        let _ = stage.set_bounds(id, at(0.0));
        let _ = stage.evaluate();
        let card = ElementRef {
            region: id,
            element: ElementIndex(1),
        };
        assert!(stage.set_interaction(card, Interaction::Press));
        assert!(stage.unmount(id));
        assert!(stage.evaluate().interactions.is_empty());
    }

    #[test]
    fn traced_evaluate_matches_plain() {
        let mut stage = Stage::new();
        stage.set_viewport(VIEWPORT);
        let id = stage.mount(cards("projects"));
        let _ = stage.set_bounds(id, at(0.0));
        let mut tracer = Tracer::none();
        let changes = stage.evaluate_traced(HostTime(1_000), &mut tracer);
        assert_eq!(changes.mounted, [id]);
        assert_eq!(changes.revealed, [id]);
        assert_eq!(changes.measured.len(), 1);
    }
}
