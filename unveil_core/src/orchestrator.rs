// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-section reveal orchestration.
//!
//! A [`SectionOrchestrator`] owns everything one region of the page needs:
//! its [`VisibilityObserver`], its [`RevealLatch`], its stagger groups, and
//! its [`AnimatedElement`]s. The rendering layer only ever asks it one
//! question per element, answered by [`ElementTarget`]: which pose should
//! this element be animating toward right now, after what delay, for how
//! long, and along which curve.
//!
//! ```text
//!   bounds + viewport ─► VisibilityObserver ─► RevealLatch
//!                                                   │ revealed?
//!   ElementConfig ─► StaggerPath ─► StaggerSequencer ┤
//!                                                   ▼
//!                                  ElementTarget { pose, delay, duration, easing }
//! ```
//!
//! While pending every element targets its variant's start pose with no
//! delay. Once revealed, each element targets its end pose after
//! `variant.delay + stagger offset`. An element with [`GesturePoses`] that
//! is hovered or pressed after the reveal targets the gesture pose
//! immediately instead.
//!
//! The observer is disconnected as soon as the latch flips: a revealed
//! section never needs measuring again.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::observer::{VisibilityObserver, VisibilitySignal};
use crate::reveal::{RevealLatch, RevealPhase, RevealTransition};
use crate::stagger::{Stagger, StaggerPath, StaggerSequencer};
use crate::time::Millis;
use crate::variant::{AnimationVariant, Easing, GesturePoses, Pose, SharedVariant};

/// Static configuration of a region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionConfig {
    /// Uniform viewport margin in px. Negative values require the region to
    /// be that far inside the viewport before it counts as visible.
    pub margin: f64,
    /// Fraction of the region's area that must be inside the effective
    /// viewport. `0.0` means any overlap.
    pub threshold: f64,
    /// Stagger applied to the region's direct children.
    pub stagger: Stagger,
}

impl RegionConfig {
    /// Preset for a full-width page section: triggers 100px inside the
    /// viewport, children staggered by 100ms.
    #[must_use]
    pub const fn section() -> Self {
        Self {
            margin: -100.0,
            threshold: 0.0,
            stagger: Stagger::new(0, 100),
        }
    }

    /// Returns a copy with a different child stagger.
    #[must_use]
    pub const fn with_stagger(self, stagger: Stagger) -> Self {
        Self { stagger, ..self }
    }

    /// Returns a copy with a different margin.
    #[must_use]
    pub const fn with_margin(self, margin: f64) -> Self {
        Self { margin, ..self }
    }

    /// Returns a copy with a different threshold.
    #[must_use]
    pub const fn with_threshold(self, threshold: f64) -> Self {
        Self { threshold, ..self }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self::section()
    }
}

/// Handle to a stagger group inside one [`SectionOrchestrator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupIndex(pub(crate) u32);

/// Handle to an element inside one [`SectionOrchestrator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementIndex(pub(crate) u32);

impl ElementIndex {
    /// Returns the position of the element in insertion order.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Where a group or element is attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Parent {
    /// Directly inside the region; uses [`RegionConfig::stagger`].
    #[default]
    Region,
    /// Inside a stagger group; uses that group's child stagger.
    Group(GroupIndex),
}

/// Static configuration of a stagger group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupConfig {
    /// Enclosing group, or the region itself.
    pub parent: Parent,
    /// Position of the group among its parent's children.
    pub order: u32,
    /// Stagger applied to the group's own children.
    pub stagger: Stagger,
}

/// Static configuration of an animated element.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementConfig {
    /// Enclosing group, or the region itself.
    pub parent: Parent,
    /// Position among its parent's children.
    pub order: u32,
    /// Entrance transition.
    pub variant: SharedVariant,
    /// Hover/press poses, if the element reacts to the pointer.
    pub gestures: Option<GesturePoses>,
}

impl ElementConfig {
    /// A direct child of the region at position `order`.
    #[must_use]
    pub fn new(order: u32, variant: SharedVariant) -> Self {
        Self {
            parent: Parent::Region,
            order,
            variant,
            gestures: None,
        }
    }

    /// Returns a copy attached to `group` instead of the region.
    #[must_use]
    pub fn in_group(self, group: GroupIndex) -> Self {
        Self {
            parent: Parent::Group(group),
            ..self
        }
    }

    /// Returns a copy with pointer gesture poses.
    #[must_use]
    pub fn with_gestures(self, gestures: GesturePoses) -> Self {
        Self {
            gestures: Some(gestures),
            ..self
        }
    }
}

/// Pointer interaction state of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// No pointer interaction.
    #[default]
    Idle,
    /// Pointer is over the element.
    Hover,
    /// Pointer is pressing the element.
    Press,
}

/// One visual unit inside a region.
#[derive(Clone, Debug)]
pub struct AnimatedElement {
    path: StaggerPath,
    variant: SharedVariant,
    gestures: Option<GesturePoses>,
    interaction: Interaction,
    gestured: bool,
}

impl AnimatedElement {
    /// Position among siblings.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.path.index
    }

    /// Accumulated delay of the enclosing groups.
    #[must_use]
    pub fn group_delay_base(&self) -> Millis {
        self.path.group_delay_base
    }

    /// Full placement in the region's cascade.
    #[must_use]
    pub fn path(&self) -> &StaggerPath {
        &self.path
    }

    /// The (shared) entrance transition.
    #[must_use]
    pub fn variant(&self) -> &SharedVariant {
        &self.variant
    }

    /// Current pointer interaction.
    #[must_use]
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }
}

/// What the rendering layer should do with an element right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementTarget {
    /// Pose to animate toward.
    pub pose: Pose,
    /// Wait before starting.
    pub delay: Millis,
    /// Length of the move.
    pub duration: Millis,
    /// Timing curve of the move.
    pub easing: Easing,
}

impl ElementTarget {
    /// Samples the move toward this target from `from`, `elapsed` after the
    /// target was applied.
    #[must_use]
    pub fn sample(&self, from: Pose, elapsed: Millis) -> Pose {
        AnimationVariant {
            start: from,
            end: self.pose,
            duration: self.duration,
            easing: self.easing,
            delay: Millis::ZERO,
        }
        .sample(elapsed, self.delay)
    }
}

/// A group's place in its parent cascade plus the stagger of its children.
#[derive(Clone, Copy, Debug)]
struct StaggerGroup {
    path: StaggerPath,
    children: Stagger,
}

/// Result of one [`SectionOrchestrator::measure`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Measurement {
    /// The observer's emission, if it emitted.
    pub signal: Option<VisibilitySignal>,
    /// Set when this measurement revealed the region.
    pub transition: Option<RevealTransition>,
}

/// Observer, latch, and stagger sequencing for one section of the page.
#[derive(Clone, Debug)]
pub struct SectionOrchestrator {
    key: String,
    config: RegionConfig,
    observer: VisibilityObserver,
    latch: RevealLatch,
    bounds: Option<Rect>,
    groups: Vec<StaggerGroup>,
    elements: Vec<AnimatedElement>,
}

impl SectionOrchestrator {
    /// Creates a pending orchestrator for the region named `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, config: RegionConfig) -> Self {
        Self {
            key: key.into(),
            config,
            observer: VisibilityObserver::new(config.margin, config.threshold),
            latch: RevealLatch::new(),
            bounds: None,
            groups: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// The region's stable key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The region's configuration.
    #[must_use]
    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    /// Adds a stagger group.
    ///
    /// # Panics
    ///
    /// Panics if `config.parent` names a group of another orchestrator.
    pub fn add_group(&mut self, config: GroupConfig) -> GroupIndex {
        let path = self.path_for(config.parent, config.order);
        self.groups.push(StaggerGroup {
            path,
            children: config.stagger,
        });
        GroupIndex(index_u32(self.groups.len() - 1))
    }

    /// Adds an animated element.
    ///
    /// # Panics
    ///
    /// Panics if `config.parent` names a group of another orchestrator.
    pub fn add_element(&mut self, config: ElementConfig) -> ElementIndex {
        let path = self.path_for(config.parent, config.order);
        self.elements.push(AnimatedElement {
            path,
            variant: config.variant,
            gestures: config.gestures,
            interaction: Interaction::Idle,
            gestured: false,
        });
        ElementIndex(index_u32(self.elements.len() - 1))
    }

    /// Updates the region's bounds. `None` means the region currently has
    /// no layout box.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
    }

    /// The most recently reported bounds.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Measures the region against `viewport` and folds the result into the
    /// latch.
    pub fn measure(&mut self, viewport: Rect) -> Measurement {
        let Some(signal) = self.observer.measure(self.bounds, viewport) else {
            return Measurement::default();
        };
        let transition = self.latch.observe(signal.intersecting);
        if transition.is_some() {
            self.observer.disconnect();
        }
        Measurement {
            signal: Some(signal),
            transition,
        }
    }

    /// Whether the observer still wants measurements.
    #[must_use]
    pub fn is_observing(&self) -> bool {
        self.observer.is_connected()
    }

    /// Current latch phase.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.latch.phase()
    }

    /// Whether the region has been revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.latch.is_revealed()
    }

    /// Number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Returns an element by index.
    #[must_use]
    pub fn element(&self, idx: ElementIndex) -> Option<&AnimatedElement> {
        self.elements.get(idx.0 as usize)
    }

    /// Iterates elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementIndex, &AnimatedElement)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementIndex(index_u32(i)), e))
    }

    /// Updates an element's pointer interaction.
    ///
    /// Returns `true` if the element's target may have changed.
    pub fn set_interaction(&mut self, idx: ElementIndex, interaction: Interaction) -> bool {
        let Some(element) = self.elements.get_mut(idx.0 as usize) else {
            return false;
        };
        if element.interaction == interaction {
            return false;
        }
        element.interaction = interaction;
        if element.gestures.is_none() {
            return false;
        }
        if self.latch.is_revealed() {
            element.gestured = true;
        }
        self.latch.is_revealed()
    }

    /// Resolves the current target of an element.
    #[must_use]
    pub fn target(&self, idx: ElementIndex) -> Option<ElementTarget> {
        self.elements
            .get(idx.0 as usize)
            .map(|e| resolve(self.latch.is_revealed(), e))
    }

    /// Resolves every element's current target, in insertion order.
    pub fn targets(&self) -> impl Iterator<Item = (ElementIndex, ElementTarget)> + '_ {
        let revealed = self.latch.is_revealed();
        self.elements()
            .map(move |(idx, e)| (idx, resolve(revealed, e)))
    }

    /// Resolves every element's pending target (start pose, no delay) even
    /// after the reveal. Presenters snap to these when a region mounts.
    pub fn start_targets(&self) -> impl Iterator<Item = (ElementIndex, ElementTarget)> + '_ {
        self.elements().map(|(idx, e)| (idx, resolve(false, e)))
    }

    fn path_for(&self, parent: Parent, order: u32) -> StaggerPath {
        match parent {
            Parent::Region => StaggerPath::root(self.config.stagger, order),
            Parent::Group(GroupIndex(g)) => {
                let group = self
                    .groups
                    .get(g as usize)
                    .unwrap_or_else(|| panic!("unknown group {g} in region {:?}", self.key));
                StaggerPath::nested(&group.path, group.children, order)
            }
        }
    }
}

fn resolve(revealed: bool, element: &AnimatedElement) -> ElementTarget {
    let variant: &AnimationVariant = &element.variant;
    if !revealed {
        return ElementTarget {
            pose: variant.start,
            delay: Millis::ZERO,
            duration: variant.duration,
            easing: variant.easing,
        };
    }
    if let Some(gestures) = element.gestures {
        let gesture_pose = match element.interaction {
            Interaction::Press => gestures.press.or(gestures.hover),
            Interaction::Hover => gestures.hover,
            Interaction::Idle => None,
        };
        if let Some(pose) = gesture_pose {
            return ElementTarget {
                pose,
                delay: Millis::ZERO,
                duration: gestures.duration,
                easing: Easing::EaseOut,
            };
        }
        if element.gestured {
            // Settling back after a gesture; the entrance already played.
            return ElementTarget {
                pose: variant.end,
                delay: Millis::ZERO,
                duration: gestures.duration,
                easing: Easing::EaseOut,
            };
        }
    }
    ElementTarget {
        pose: variant.end,
        delay: StaggerSequencer::effective_delay(true, &element.path, variant),
        duration: variant.duration,
        easing: variant.easing,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "per-region element and group counts are far below u32::MAX"
)]
const fn index_u32(idx: usize) -> u32 {
    idx as u32
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;

    use super::*;
    use crate::variant::Side;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1280.0, 800.0);

    fn projects() -> SectionOrchestrator {
        let mut section = SectionOrchestrator::new("projects", RegionConfig::section());
        let card = AnimationVariant::fade_rise(40.0).shared();
        let _ = section.add_element(ElementConfig::new(0, Rc::clone(&card)));
        let _ = section.add_element(ElementConfig::new(1, card));
        section
    }

    fn bounds_at(top: f64) -> Option<Rect> {
        Some(Rect::new(0.0, top, 1280.0, top + 900.0))
    }

    #[test]
    fn pending_targets_start_pose_without_delay() {
        let section = projects();
        for (_, target) in section.targets() {
            assert_eq!(target.pose, AnimationVariant::fade_rise(40.0).start);
            assert_eq!(target.delay, Millis::ZERO);
        }
    }

    #[test]
    fn reveal_switches_targets_and_staggers() {
        let mut section = projects();
        section.set_bounds(bounds_at(1200.0));
        let m = section.measure(VIEWPORT);
        assert!(m.transition.is_none());
        assert!(!section.is_revealed());

        section.set_bounds(bounds_at(650.0));
        let m = section.measure(VIEWPORT);
        assert!(m.transition.is_some(), "crossing the margin must reveal");
        assert!(!section.is_observing(), "observer disconnects after reveal");

        let targets: Vec<_> = section.targets().map(|(_, t)| t).collect();
        assert_eq!(targets[0].pose, Pose::SHOWN);
        assert_eq!(targets[0].delay, Millis(0));
        assert_eq!(targets[1].delay, Millis(100));
    }

    #[test]
    fn scrolling_away_keeps_revealed() {
        let mut section = projects();
        section.set_bounds(bounds_at(0.0));
        assert!(section.measure(VIEWPORT).transition.is_some());
        for top in [2000.0, 0.0, -3000.0, 400.0] {
            section.set_bounds(bounds_at(top));
            let m = section.measure(VIEWPORT);
            assert_eq!(m, Measurement::default(), "no emission after reveal");
            assert!(section.is_revealed());
        }
    }

    #[test]
    fn missing_bounds_withhold_reveal() {
        let mut section = projects();
        let m = section.measure(VIEWPORT);
        assert_eq!(m.signal.map(|s| s.intersecting), Some(false));
        assert_eq!(section.phase(), RevealPhase::Pending);
    }

    #[test]
    fn nested_groups_cascade() {
        // About section: header, left column with stats, right column with
        // a skills grid.
        let mut about = SectionOrchestrator::new("about", RegionConfig::section());
        let rise = AnimationVariant::fade_rise(30.0).shared();
        let pop = AnimationVariant::fade_rise(20.0)
            .with_duration(Millis(400))
            .shared();
        let _ = about.add_element(ElementConfig::new(0, Rc::clone(&rise)));
        let left = about.add_group(GroupConfig {
            parent: Parent::Region,
            order: 1,
            stagger: Stagger::new(200, 100),
        });
        let right = about.add_group(GroupConfig {
            parent: Parent::Region,
            order: 2,
            stagger: Stagger::new(100, 50),
        });
        let stats: Vec<_> = (0..4)
            .map(|i| about.add_element(ElementConfig::new(i, Rc::clone(&pop)).in_group(left)))
            .collect();
        let skills: Vec<_> = (0..6)
            .map(|i| about.add_element(ElementConfig::new(i, Rc::clone(&pop)).in_group(right)))
            .collect();

        about.set_bounds(bounds_at(0.0));
        let _ = about.measure(VIEWPORT);

        let delay = |idx| about.target(idx).map(|t| t.delay);
        assert_eq!(delay(stats[0]), Some(Millis(300)));
        assert_eq!(delay(stats[3]), Some(Millis(600)));
        assert_eq!(delay(skills[0]), Some(Millis(300)));
        assert_eq!(delay(skills[5]), Some(Millis(550)));
        assert_eq!(about.element(skills[5]).map(AnimatedElement::group_delay_base), Some(Millis(200)));
    }

    #[test]
    fn variant_delay_is_added() {
        let mut s = SectionOrchestrator::new("projects", RegionConfig::section());
        let more = s.add_element(ElementConfig::new(
            0,
            AnimationVariant::fade_rise(20.0)
                .with_delay(Millis(500))
                .shared(),
        ));
        s.set_bounds(bounds_at(0.0));
        let _ = s.measure(VIEWPORT);
        assert_eq!(s.target(more).map(|t| t.delay), Some(Millis(500)));
    }

    #[test]
    fn gestures_apply_only_after_reveal() {
        let mut s = SectionOrchestrator::new("contact", RegionConfig::section());
        let link = s.add_element(
            ElementConfig::new(0, AnimationVariant::fade_slide(Side::Left, 30.0).shared())
                .with_gestures(GesturePoses::scale(1.1, 0.95)),
        );
        assert!(!s.set_interaction(link, Interaction::Hover), "hidden elements ignore hover");
        assert_eq!(s.target(link).map(|t| t.pose.scale), Some(1.0));

        s.set_bounds(bounds_at(0.0));
        let _ = s.measure(VIEWPORT);
        let hovered = s.target(link).map(|t| t.pose.scale);
        assert_eq!(hovered, Some(Pose::SHOWN.scaled(1.1).scale));

        assert!(s.set_interaction(link, Interaction::Press));
        let pressed = s.target(link).unwrap();
        assert!((pressed.pose.scale - 0.95).abs() < 1e-12);
        assert_eq!(pressed.delay, Millis::ZERO);

        assert!(s.set_interaction(link, Interaction::Idle));
        let settled = s.target(link).unwrap();
        assert_eq!(settled.pose, Pose::SHOWN);
        assert_eq!(settled.delay, Millis::ZERO, "no stagger replay after a gesture");
    }

    #[test]
    fn interaction_without_gestures_is_inert() {
        let mut s = projects();
        s.set_bounds(bounds_at(0.0));
        let _ = s.measure(VIEWPORT);
        assert!(!s.set_interaction(ElementIndex(0), Interaction::Hover));
        assert!(!s.set_interaction(ElementIndex(9), Interaction::Hover));
        assert_eq!(s.target(ElementIndex(0)).map(|t| t.pose), Some(Pose::SHOWN));
    }

    #[test]
    fn start_targets_ignore_reveal() {
        let mut s = projects();
        s.set_bounds(bounds_at(0.0));
        let _ = s.measure(VIEWPORT);
        assert!(s.is_revealed());
        for (_, target) in s.start_targets() {
            assert_eq!(target.pose, AnimationVariant::fade_rise(40.0).start);
        }
    }

    #[test]
    fn target_sampling_waits_for_delay() {
        let mut s = projects();
        s.set_bounds(bounds_at(0.0));
        let _ = s.measure(VIEWPORT);
        let second = s.target(ElementIndex(1)).unwrap();
        let start = AnimationVariant::fade_rise(40.0).start;
        assert_eq!(second.sample(start, Millis(50)), start, "still waiting at 50ms");
        assert_eq!(second.sample(start, Millis(700)), Pose::SHOWN);
        let moving = second.sample(start, Millis(400));
        assert!(moving.opacity > 0.0 && moving.opacity < 1.0);
    }

    #[test]
    #[should_panic(expected = "unknown group")]
    fn foreign_group_panics() {
        let mut s = projects();
        let _ = s.add_element(ElementConfig::new(0, AnimationVariant::fade().shared()).in_group(GroupIndex(3)));
    }
}
