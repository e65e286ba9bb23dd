// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element management.
//!
//! Translates [`Stage`] state into inline styles on existing page elements
//! by applying incremental updates from [`StageChanges`]. The browser runs
//! the actual interpolation through CSS transitions: the presenter only
//! writes the target pose together with `transition-delay`,
//! `transition-duration`, and `transition-timing-function`.
//!
//! [`Stage`]: unveil_core::stage::Stage
//! [`StageChanges`]: unveil_core::stage::StageChanges

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use unveil_core::backend::Presenter;
use unveil_core::orchestrator::ElementTarget;
use unveil_core::stage::{ElementRef, RegionId, Stage, StageChanges};
use unveil_core::variant::{Easing, Pose};
use web_sys::{Element, HtmlElement};

/// DOM nodes of one mounted region.
struct RegionNodes {
    id: RegionId,
    root: Element,
    elements: Vec<Option<HtmlElement>>,
}

/// Maps stage regions and elements to live DOM nodes, applying incremental
/// updates from [`StageChanges`].
///
/// After [`Stage::mount`] returns a handle, attach the section's root node
/// with [`attach_region`](Self::attach_region) and each animated node with
/// [`attach_element`](Self::attach_element). Call [`apply`](Presenter::apply)
/// after every evaluation.
pub struct DomPresenter {
    regions: Vec<Option<RegionNodes>>,
}

impl core::fmt::Debug for DomPresenter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomPresenter")
            .field("regions_len", &self.regions.iter().flatten().count())
            .finish()
    }
}

impl Default for DomPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl DomPresenter {
    /// Creates a presenter with no attached nodes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regions: Vec::new(),
        }
    }

    /// Attaches the node whose bounds are observed for `region`.
    ///
    /// Replaces whatever was attached to the same slot before.
    pub fn attach_region(&mut self, region: RegionId, root: Element) {
        let slot = region.index() as usize;
        if self.regions.len() <= slot {
            self.regions.resize_with(slot + 1, || None);
        }
        self.regions[slot] = Some(RegionNodes {
            id: region,
            root,
            elements: Vec::new(),
        });
    }

    /// Attaches the node animated for `element`.
    ///
    /// Does nothing if the element's region is not attached.
    pub fn attach_element(&mut self, element: ElementRef, node: HtmlElement) {
        let Some(nodes) = self.region_mut(element.region) else {
            return;
        };
        let slot = element.element.get() as usize;
        if nodes.elements.len() <= slot {
            nodes.elements.resize_with(slot + 1, || None);
        }
        nodes.elements[slot] = Some(node);
    }

    /// Returns the DOM node of an element, if attached.
    #[must_use]
    pub fn element(&self, element: ElementRef) -> Option<&HtmlElement> {
        self.region(element.region)?
            .elements
            .get(element.element.get() as usize)?
            .as_ref()
    }

    /// Reads the document-space bounds of every attached region that is
    /// still observing and reports them to `stage`.
    ///
    /// Call after a layout change (see
    /// [`ScrollFrame::layout_changed`](crate::ScrollFrame::layout_changed)).
    pub fn sync_bounds(&self, stage: &mut Stage) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let scroll = Vec2::new(
            window.scroll_x().unwrap_or(0.0),
            window.scroll_y().unwrap_or(0.0),
        );
        for nodes in self.regions.iter().flatten() {
            if !stage.get(nodes.id).is_some_and(|s| s.is_observing()) {
                continue;
            }
            let _ = stage.set_bounds(nodes.id, document_bounds(&nodes.root, scroll));
        }
    }

    fn region(&self, id: RegionId) -> Option<&RegionNodes> {
        self.regions
            .get(id.index() as usize)?
            .as_ref()
            .filter(|n| n.id == id)
    }

    fn region_mut(&mut self, id: RegionId) -> Option<&mut RegionNodes> {
        self.regions
            .get_mut(id.index() as usize)?
            .as_mut()
            .filter(|n| n.id == id)
    }

    /// Snaps every element of `region` to its start pose.
    fn snap_region(&self, stage: &Stage, region: RegionId) {
        let (Some(section), Some(nodes)) = (stage.get(region), self.region(region)) else {
            return;
        };
        for (idx, target) in section.start_targets() {
            if let Some(Some(el)) = nodes.elements.get(idx.get() as usize) {
                apply_target(el, &target, false);
            }
        }
    }

    /// Starts the transition of every element of `region` toward its
    /// current target.
    fn animate_region(&self, stage: &Stage, region: RegionId, flush: bool) {
        let (Some(section), Some(nodes)) = (stage.get(region), self.region(region)) else {
            return;
        };
        if flush {
            // Commit the snapped start styles, or the browser skips the transition.
            let _ = nodes.root.get_bounding_client_rect();
        }
        for (idx, target) in section.targets() {
            if let Some(Some(el)) = nodes.elements.get(idx.get() as usize) {
                apply_target(el, &target, true);
            }
        }
    }
}

impl Presenter for DomPresenter {
    /// Applies incremental changes from a [`StageChanges`] to the DOM.
    fn apply(&mut self, stage: &Stage, changes: &StageChanges) {
        // 1. Unmounts: forget the nodes, leave the page as it is.
        for &id in &changes.unmounted {
            if let Some(slot) = self.regions.get_mut(id.index() as usize)
                && slot.as_ref().is_some_and(|n| n.id == id)
            {
                *slot = None;
            }
        }

        // 2. Mounts: snap every element to its start pose.
        for &id in &changes.mounted {
            self.snap_region(stage, id);
        }

        // 3. Reveals: start the staggered entrance.
        for &id in &changes.revealed {
            self.animate_region(stage, id, changes.mounted.contains(&id));
        }

        // 4. Gestures.
        for &element in &changes.interactions {
            if let (Some(el), Some(target)) = (self.element(element), stage.target(element)) {
                apply_target(el, &target, true);
            }
        }
    }
}

/// Returns the element's border box in document coordinates, or `None` if
/// it has no layout box.
fn document_bounds(el: &Element, scroll: Vec2) -> Option<Rect> {
    let r = el.get_bounding_client_rect();
    if !(r.width() > 0.0 && r.height() > 0.0) {
        return None;
    }
    Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()) + scroll)
}

/// Writes a target pose and its transition timing as inline styles.
fn apply_target(el: &HtmlElement, target: &ElementTarget, animate: bool) {
    let s = el.style();
    if animate {
        let _ = s.set_property("transition-property", "opacity, transform");
        let _ = s.set_property("transition-duration", &css_ms(target.duration.get()));
        let _ = s.set_property("transition-delay", &css_ms(target.delay.get()));
        let _ = s.set_property("transition-timing-function", &css_easing(target.easing));
    } else {
        let _ = s.set_property("transition", "none");
    }
    let _ = s.set_property("transform", &css_transform(&target.pose));
    let _ = s.set_property("opacity", &format!("{}", target.pose.opacity));
}

fn css_ms(ms: u32) -> String {
    format!("{ms}ms")
}

/// Formats an [`Easing`] as a CSS `<easing-function>`.
fn css_easing(easing: Easing) -> String {
    match easing {
        Easing::Linear => String::from("linear"),
        Easing::Ease => String::from("ease"),
        Easing::EaseIn => String::from("ease-in"),
        Easing::EaseOut => String::from("ease-out"),
        Easing::EaseInOut => String::from("ease-in-out"),
        Easing::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
    }
}

/// Formats a pose's offset and scale as a CSS `transform` value.
fn css_transform(pose: &Pose) -> String {
    format!(
        "translate({}px, {}px) scale({})",
        pose.offset.x, pose.offset.y, pose.scale
    )
}
