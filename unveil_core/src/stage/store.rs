// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage for mounted regions with lifecycle and geometry management.

use alloc::vec::Vec;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker};

use super::id::{ElementRef, RegionId};
use crate::dirty;
use crate::orchestrator::{ElementTarget, Interaction, SectionOrchestrator};

/// All regions currently mounted on the page.
///
/// Regions are addressed by [`RegionId`] handles. Each mounted region
/// occupies a slot; unmounted slots are recycled via a free list, and
/// generation counters make old handles resolve to nothing.
///
/// Every mutator tolerates stale handles: it does nothing and reports
/// `false`/`None`. The rendering layer may legitimately race an unmount
/// against a late layout or pointer event.
#[derive(Debug)]
pub struct Stage {
    // -- Slots --
    pub(crate) sections: Vec<Option<SectionOrchestrator>>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,

    // -- Geometry --
    pub(crate) viewport: Option<Rect>,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_mounted: Vec<RegionId>,
    pub(crate) pending_unmounted: Vec<RegionId>,
    pub(crate) pending_interactions: Vec<ElementRef>,

    // -- Counters --
    pub(crate) evaluations: u64,
    pub(crate) measurements: u64,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Creates an empty stage with no viewport.
    ///
    /// Nothing is measured until [`set_viewport`](Self::set_viewport) has
    /// been called once.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            viewport: None,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_mounted: Vec::new(),
            pending_unmounted: Vec::new(),
            pending_interactions: Vec::new(),
            evaluations: 0,
            measurements: 0,
        }
    }

    // -- Lifecycle API --

    /// Mounts a region and returns its handle.
    ///
    /// The region is measured on the next [`evaluate`](Self::evaluate), so a
    /// region that is already in view reveals without any scroll.
    pub fn mount(&mut self, section: SectionOrchestrator) -> RegionId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on unmount.
            self.sections[idx as usize] = Some(section);
            idx
        } else {
            let idx = slot_u32(self.sections.len());
            self.sections.push(Some(section));
            self.generation.push(0);
            idx
        };

        let id = RegionId {
            idx,
            generation: self.generation[idx as usize],
        };
        self.pending_mounted.push(id);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::GEOMETRY);
        id
    }

    /// Unmounts a region, discarding its latch, observer, and elements.
    ///
    /// Returns `false` if the handle is stale. A region mounted and
    /// unmounted between two evaluations is reported in neither list.
    pub fn unmount(&mut self, id: RegionId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.idx;
        self.sections[idx as usize] = None;

        // Drop dirty state so nothing fires for the dead region.
        self.dirty.remove_key(idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);

        self.pending_interactions.retain(|e| e.region != id);
        if let Some(pos) = self.pending_mounted.iter().position(|&m| m == id) {
            let _ = self.pending_mounted.remove(pos);
        } else {
            self.pending_unmounted.push(id);
            self.dirty.mark(idx, dirty::TOPOLOGY);
        }
        true
    }

    /// Returns whether the handle refers to a mounted region.
    #[must_use]
    pub fn is_alive(&self, id: RegionId) -> bool {
        self.generation.get(id.idx as usize) == Some(&id.generation)
            && self.sections[id.idx as usize].is_some()
    }

    /// Finds the mounted region with the given key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<RegionId> {
        self.regions()
            .find(|&id| self.get(id).is_some_and(|s| s.key() == key))
    }

    /// Iterates the handles of all mounted regions in slot order.
    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| RegionId {
                idx: slot_u32(i),
                generation: self.generation[i],
            })
    }

    /// Number of mounted regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.iter().filter(|s| s.is_some()).count()
    }

    /// Whether no region is mounted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Queries --

    /// Returns the orchestrator of a mounted region.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&SectionOrchestrator> {
        if !self.is_alive(id) {
            return None;
        }
        self.sections[id.idx as usize].as_ref()
    }

    /// Whether the region has been revealed. `false` for stale handles.
    #[must_use]
    pub fn is_revealed(&self, id: RegionId) -> bool {
        self.get(id).is_some_and(SectionOrchestrator::is_revealed)
    }

    /// Resolves the current target of an element.
    #[must_use]
    pub fn target(&self, element: ElementRef) -> Option<ElementTarget> {
        self.get(element.region)?.target(element.element)
    }

    /// The current viewport, if one has been set.
    #[must_use]
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Number of evaluations run so far.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    // -- Mutation API (auto-marks dirty) --

    /// Sets the viewport (scroll or resize).
    ///
    /// Marks every region that is still observing for re-measurement.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport == Some(viewport) {
            return;
        }
        self.viewport = Some(viewport);
        for idx in 0..self.sections.len() {
            if self.sections[idx]
                .as_ref()
                .is_some_and(SectionOrchestrator::is_observing)
            {
                self.dirty.mark(slot_u32(idx), dirty::GEOMETRY);
            }
        }
    }

    /// Updates a region's bounds (layout or mutation).
    ///
    /// `None` means the region currently has no layout box; it is then
    /// measured as not visible. Returns `false` for stale handles.
    pub fn set_bounds(&mut self, id: RegionId, bounds: Option<Rect>) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let Some(section) = self.sections[id.idx as usize].as_mut() else {
            return false;
        };
        if section.bounds() == bounds {
            return true;
        }
        section.set_bounds(bounds);
        if section.is_observing() {
            self.dirty.mark(id.idx, dirty::GEOMETRY);
        }
        true
    }

    /// Updates an element's pointer interaction.
    ///
    /// Returns `true` if the element's target may have changed; the element
    /// is then reported in the next
    /// [`StageChanges::interactions`](super::StageChanges::interactions).
    pub fn set_interaction(&mut self, element: ElementRef, interaction: Interaction) -> bool {
        if !self.is_alive(element.region) {
            return false;
        }
        let Some(section) = self.sections[element.region.idx as usize].as_mut() else {
            return false;
        };
        let changed = section.set_interaction(element.element, interaction);
        if changed && !self.pending_interactions.contains(&element) {
            self.pending_interactions.push(element);
        }
        changed
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot count is bounded by the number of sections on a page"
)]
const fn slot_u32(idx: usize) -> u32 {
    idx as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{ElementConfig, RegionConfig};
    use crate::variant::AnimationVariant;

    fn section(key: &str) -> SectionOrchestrator {
        let mut s = SectionOrchestrator::new(key, RegionConfig::section());
        let _ = s.add_element(ElementConfig::new(0, AnimationVariant::fade_rise(30.0).shared()));
        s
    }

    #[test]
    fn mount_and_unmount() {
        let mut stage = Stage::new();
        let id = stage.mount(section("about"));
        assert!(stage.is_alive(id));
        assert_eq!(stage.len(), 1);
        assert!(stage.unmount(id));
        assert!(!stage.is_alive(id));
        assert!(stage.is_empty());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut stage = Stage::new();
        let id1 = stage.mount(section("projects"));
        assert!(stage.unmount(id1));
        let id2 = stage.mount(section("projects"));
        assert!(!stage.is_alive(id1));
        assert!(stage.is_alive(id2));
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
        assert!(stage.get(id1).is_none());
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut stage = Stage::new();
        let id = stage.mount(section("contact"));
        assert!(stage.unmount(id));
        assert!(!stage.unmount(id), "double unmount is a no-op");
        assert!(!stage.set_bounds(id, Some(Rect::new(0.0, 0.0, 10.0, 10.0))));
        let element = ElementRef {
            region: id,
            element: crate::orchestrator::ElementIndex(0),
        };
        assert!(!stage.set_interaction(element, Interaction::Hover));
        assert!(stage.target(element).is_none());
        assert!(!stage.is_revealed(id));
    }

    #[test]
    fn find_by_key() {
        let mut stage = Stage::new();
        let about = stage.mount(section("about"));
        let projects = stage.mount(section("projects"));
        assert_eq!(stage.find("projects"), Some(projects));
        assert_eq!(stage.find("about"), Some(about));
        assert_eq!(stage.find("footer"), None);
        let ids: Vec<_> = stage.regions().collect();
        assert_eq!(ids, [about, projects]);
    }

    #[test]
    fn viewport_starts_unset() {
        let mut stage = Stage::new();
        assert_eq!(stage.viewport(), None);
        let vp = Rect::new(0.0, 0.0, 800.0, 600.0);
        stage.set_viewport(vp);
        assert_eq!(stage.viewport(), Some(vp));
    }
}
