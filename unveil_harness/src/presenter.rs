// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`Presenter`] that records instead of rendering.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use unveil_core::backend::Presenter;
use unveil_core::orchestrator::ElementTarget;
use unveil_core::stage::{ElementRef, RegionId, Stage, StageChanges};
use unveil_core::time::Millis;
use unveil_core::variant::Pose;

/// One target handed to the presenter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedTarget {
    /// The element the target was applied to.
    pub element: ElementRef,
    /// The resolved target.
    pub target: ElementTarget,
    /// The pose the element was heading to before this target.
    pub from: Pose,
    /// `false` when the element snapped to `target.pose`.
    pub animated: bool,
    /// Index of the [`apply`](Presenter::apply) call that produced it.
    pub seq: u64,
}

impl AppliedTarget {
    /// The pose shown `elapsed` after the target was applied.
    #[must_use]
    pub fn pose_at(&self, elapsed: Millis) -> Pose {
        if self.animated {
            self.target.sample(self.from, elapsed)
        } else {
            self.target.pose
        }
    }
}

/// Records every target it is asked to apply.
///
/// Applies changes in the same order as a rendering backend: unmounts,
/// then mounts (snapped to the start pose), then reveals and gestures
/// (animated).
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    log: Vec<AppliedTarget>,
    current: BTreeMap<ElementRef, AppliedTarget>,
    reveals: Vec<RegionId>,
    seq: u64,
}

impl RecordingPresenter {
    /// Creates an empty presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every target applied so far, oldest first.
    #[must_use]
    pub fn log(&self) -> &[AppliedTarget] {
        &self.log
    }

    /// The most recent target of a live element.
    #[must_use]
    pub fn latest(&self, element: ElementRef) -> Option<&AppliedTarget> {
        self.current.get(&element)
    }

    /// The most recent targets of every element of `region`, in element
    /// order.
    pub fn region_targets(&self, region: RegionId) -> impl Iterator<Item = &AppliedTarget> + '_ {
        self.current
            .values()
            .filter(move |a| a.element.region == region)
    }

    /// How many times `region` was revealed.
    #[must_use]
    pub fn reveal_count(&self, region: RegionId) -> usize {
        self.reveals.iter().filter(|&&r| r == region).count()
    }

    /// Regions in the order they were revealed.
    #[must_use]
    pub fn reveals(&self) -> &[RegionId] {
        &self.reveals
    }

    /// Number of [`apply`](Presenter::apply) calls so far.
    #[must_use]
    pub fn applies(&self) -> u64 {
        self.seq
    }

    fn record(&mut self, element: ElementRef, target: ElementTarget, animated: bool) {
        let from = self
            .current
            .get(&element)
            .map_or(target.pose, |prev| prev.target.pose);
        let applied = AppliedTarget {
            element,
            target,
            from,
            animated,
            seq: self.seq,
        };
        self.log.push(applied);
        self.current.insert(element, applied);
    }

    fn snap_region(&mut self, stage: &Stage, region: RegionId) {
        let Some(section) = stage.get(region) else {
            return;
        };
        for (element, target) in section.start_targets() {
            self.record(ElementRef { region, element }, target, false);
        }
    }

    fn animate_region(&mut self, stage: &Stage, region: RegionId) {
        let Some(section) = stage.get(region) else {
            return;
        };
        for (element, target) in section.targets() {
            self.record(ElementRef { region, element }, target, true);
        }
    }
}

impl Presenter for RecordingPresenter {
    fn apply(&mut self, stage: &Stage, changes: &StageChanges) {
        self.seq += 1;
        for &id in &changes.unmounted {
            self.current.retain(|e, _| e.region != id);
        }
        for &id in &changes.mounted {
            self.snap_region(stage, id);
        }
        for &id in &changes.revealed {
            self.reveals.push(id);
            self.animate_region(stage, id);
        }
        for &element in &changes.interactions {
            if let Some(target) = stage.target(element) {
                self.record(element, target, true);
            }
        }
    }
}
