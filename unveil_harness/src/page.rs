// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scrollable page of stacked blocks.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use unveil_core::backend::Presenter;
use unveil_core::orchestrator::{Interaction, SectionOrchestrator};
use unveil_core::stage::{ElementRef, RegionId, Stage, StageChanges};
use unveil_core::time::HostTime;
use unveil_core::variant::Pose;

use crate::presenter::RecordingPresenter;

/// Microseconds per simulated frame (60 Hz).
const FRAME_TICKS: u64 = 16_667;

/// One vertical slice of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Block {
    /// Unobserved content, such as a hero banner.
    Spacer(f64),
    /// A mounted section.
    Section {
        /// The section's handle.
        region: RegionId,
        /// Layout height in px.
        height: f64,
    },
}

impl Block {
    fn height(self) -> f64 {
        match self {
            Self::Spacer(h) | Self::Section { height: h, .. } => h,
        }
    }
}

/// A reveal as seen from the page.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealRecord {
    /// Key of the revealed section.
    pub key: String,
    /// Frame on which the reveal was applied.
    pub frame: u64,
    /// Scroll offset at that frame.
    pub scroll_y: f64,
    /// Clock at that frame.
    pub at: HostTime,
}

/// A page that stacks blocks top to bottom and scrolls vertically.
///
/// Sections are laid out in document coordinates, so scrolling only moves
/// the viewport. Nothing reaches the [`Stage`] until [`frame`](Self::frame)
/// runs, which mirrors a browser coalescing input into the next animation
/// frame.
#[derive(Debug)]
pub struct SimulatedPage {
    stage: Stage,
    presenter: RecordingPresenter,
    blocks: Vec<Block>,
    width: f64,
    viewport_height: f64,
    scroll_y: f64,
    layout_dirty: bool,
    viewport_dirty: bool,
    now: HostTime,
    frame: u64,
    apply_times: Vec<HostTime>,
    reveal_log: Vec<RevealRecord>,
}

impl SimulatedPage {
    /// Creates an empty page with a `width` by `viewport_height` viewport,
    /// scrolled to the top.
    #[must_use]
    pub fn new(width: f64, viewport_height: f64) -> Self {
        Self {
            stage: Stage::new(),
            presenter: RecordingPresenter::new(),
            blocks: Vec::new(),
            width,
            viewport_height,
            scroll_y: 0.0,
            layout_dirty: true,
            viewport_dirty: true,
            now: HostTime(0),
            frame: 0,
            apply_times: Vec::new(),
            reveal_log: Vec::new(),
        }
    }

    /// Appends unobserved content.
    pub fn push_spacer(&mut self, height: f64) {
        self.blocks.push(Block::Spacer(height));
        self.layout_dirty = true;
    }

    /// Mounts `section` below everything else.
    pub fn push_section(&mut self, section: SectionOrchestrator, height: f64) -> RegionId {
        let region = self.stage.mount(section);
        self.blocks.push(Block::Section { region, height });
        self.layout_dirty = true;
        region
    }

    /// Unmounts a section and closes the gap it leaves.
    ///
    /// Returns `false` if `region` is not on the page.
    pub fn remove_section(&mut self, region: RegionId) -> bool {
        let before = self.blocks.len();
        self.blocks
            .retain(|b| !matches!(b, Block::Section { region: r, .. } if *r == region));
        if self.blocks.len() == before {
            return false;
        }
        self.layout_dirty = true;
        self.scroll_to(self.scroll_y);
        self.stage.unmount(region)
    }

    /// Scrolls to `y`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: f64) {
        let y = y.clamp(0.0, self.max_scroll());
        if y != self.scroll_y {
            self.scroll_y = y;
            self.viewport_dirty = true;
        }
    }

    /// Scrolls by `dy`, clamped to the scrollable range.
    pub fn scroll_by(&mut self, dy: f64) {
        self.scroll_to(self.scroll_y + dy);
    }

    /// Scrolls so that the top of `region` sits at the top of the viewport.
    ///
    /// Returns `false` if `region` is not on the page.
    pub fn scroll_to_section(&mut self, region: RegionId) -> bool {
        let Some(top) = self.section_top(region) else {
            return false;
        };
        self.scroll_to(top);
        true
    }

    /// Resizes the viewport.
    pub fn resize(&mut self, width: f64, viewport_height: f64) {
        self.width = width;
        self.viewport_height = viewport_height;
        self.layout_dirty = true;
        self.scroll_to(self.scroll_y);
    }

    /// Sets the pointer interaction of an element.
    pub fn hover(&mut self, element: ElementRef, interaction: Interaction) -> bool {
        self.stage.set_interaction(element, interaction)
    }

    /// Runs one animation frame: flushes layout and scroll into the stage,
    /// evaluates it, applies the changes, and advances the clock.
    pub fn frame(&mut self) -> StageChanges {
        if self.layout_dirty {
            self.relayout();
            self.layout_dirty = false;
            self.viewport_dirty = true;
        }
        if self.viewport_dirty {
            self.stage.set_viewport(self.viewport());
            self.viewport_dirty = false;
        }

        let changes = self.stage.evaluate();
        self.presenter.apply(&self.stage, &changes);
        self.apply_times.push(self.now);
        for &id in &changes.revealed {
            if let Some(section) = self.stage.get(id) {
                self.reveal_log.push(RevealRecord {
                    key: String::from(section.key()),
                    frame: self.frame,
                    scroll_y: self.scroll_y,
                    at: self.now,
                });
            }
        }

        self.frame += 1;
        self.now = HostTime(self.now.ticks() + FRAME_TICKS);
        changes
    }

    /// Runs `n` frames, discarding their changes.
    pub fn frames(&mut self, n: u32) {
        for _ in 0..n {
            let _ = self.frame();
        }
    }

    /// The pose an element shows right now.
    #[must_use]
    pub fn pose(&self, element: ElementRef) -> Option<Pose> {
        let applied = self.presenter.latest(element)?;
        let seq = usize::try_from(applied.seq).ok()?;
        let applied_at = *self.apply_times.get(seq.checked_sub(1)?)?;
        Some(applied.pose_at(self.now.saturating_millis_since(applied_at)))
    }

    /// The stage driven by this page.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The presenter recording what the page shows.
    #[must_use]
    pub fn presenter(&self) -> &RecordingPresenter {
        &self.presenter
    }

    /// The page's blocks, top to bottom.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Every reveal so far, oldest first.
    #[must_use]
    pub fn reveal_log(&self) -> &[RevealRecord] {
        &self.reveal_log
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Number of frames run so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame
    }

    /// The viewport in document coordinates.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        Rect::new(
            0.0,
            self.scroll_y,
            self.width,
            self.scroll_y + self.viewport_height,
        )
    }

    /// Total height of all blocks.
    #[must_use]
    pub fn document_height(&self) -> f64 {
        self.blocks.iter().map(|b| b.height()).sum()
    }

    /// Document-space top edge of a section.
    #[must_use]
    pub fn section_top(&self, region: RegionId) -> Option<f64> {
        let mut top = 0.0;
        for block in &self.blocks {
            if let Block::Section { region: r, .. } = block
                && *r == region
            {
                return Some(top);
            }
            top += block.height();
        }
        None
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }

    fn relayout(&mut self) {
        let mut top = 0.0;
        for block in &self.blocks {
            let height = block.height();
            if let Block::Section { region, .. } = *block {
                let _ = self
                    .stage
                    .set_bounds(region, Some(Rect::new(0.0, top, self.width, top + height)));
            }
            top += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::orchestrator::RegionConfig;

    fn empty(key: &str) -> SectionOrchestrator {
        SectionOrchestrator::new(key, RegionConfig::section())
    }

    #[test]
    fn layout_stacks_blocks() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        page.push_spacer(800.0);
        let a = page.push_section(empty("a"), 600.0);
        let b = page.push_section(empty("b"), 400.0);
        assert_eq!(page.section_top(a), Some(800.0));
        assert_eq!(page.section_top(b), Some(1400.0));
        assert!((page.document_height() - 1800.0).abs() < f64::EPSILON);

        let _ = page.frame();
        assert_eq!(
            page.stage().get(b).unwrap().bounds(),
            Some(Rect::new(0.0, 1400.0, 1280.0, 1800.0))
        );
    }

    #[test]
    fn scrolling_is_clamped() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        page.push_spacer(2000.0);
        page.scroll_to(5000.0);
        assert!((page.scroll_y() - 1200.0).abs() < f64::EPSILON);
        page.scroll_by(-9000.0);
        assert!(page.scroll_y().abs() < f64::EPSILON);
    }

    #[test]
    fn clock_advances_per_frame() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        page.frames(3);
        assert_eq!(page.frame_index(), 3);
        assert_eq!(page.now(), HostTime(3 * FRAME_TICKS));
    }

    #[test]
    fn removing_a_section_closes_the_gap() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        let a = page.push_section(empty("a"), 600.0);
        let b = page.push_section(empty("b"), 400.0);
        let _ = page.frame();
        assert!(page.remove_section(a));
        assert!(!page.remove_section(a), "second removal is a no-op");
        assert_eq!(page.section_top(b), Some(0.0));
        let changes = page.frame();
        assert_eq!(changes.unmounted, [a]);
        assert!(!page.stage().is_alive(a));
    }
}
