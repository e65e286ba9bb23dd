// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sections of a single-page portfolio.
//!
//! Every section uses the page preset (trigger 100px inside the viewport)
//! except the footer, which triggers on any overlap. Absolute delays come
//! from variant delays and stagger groups, so the region stagger is
//! [`Stagger::NONE`].
//!
//! Element insertion order is documented on each builder; tests rely on it.

use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::Vec2;
use unveil_core::orchestrator::{
    ElementConfig, GroupConfig, Parent, RegionConfig, SectionOrchestrator,
};
use unveil_core::stage::RegionId;
use unveil_core::stagger::Stagger;
use unveil_core::time::Millis;
use unveil_core::variant::{AnimationVariant, GesturePoses, Side};

use crate::page::SimulatedPage;

/// Height of the unobserved hero banner at the top of the page.
pub const HERO_HEIGHT: f64 = 800.0;

const STATS: u32 = 3;
const SKILLS: u32 = 6;
const EXPERIENCE_ENTRIES: u32 = 3;
const CONTACT_ITEMS: u32 = 2;
const SOCIAL_ICONS: u32 = 3;

fn config() -> RegionConfig {
    RegionConfig::section().with_stagger(Stagger::NONE)
}

fn header() -> ElementConfig {
    ElementConfig::new(0, AnimationVariant::fade_rise(30.0).shared())
}

fn icon() -> ElementConfig {
    ElementConfig::new(0, AnimationVariant::still().shared())
        .with_gestures(GesturePoses::scale(1.1, 0.95))
}

fn columns(section: &mut SectionOrchestrator) {
    let left = AnimationVariant::fade_slide(Side::Left, 30.0).with_delay(Millis(100));
    let right = AnimationVariant::fade_slide(Side::Right, 30.0).with_delay(Millis(200));
    let _ = section.add_element(ElementConfig::new(0, left.shared()));
    let _ = section.add_element(ElementConfig::new(0, right.shared()));
}

/// Adds `count` elements sharing `variant` to a new group whose children
/// follow `stagger`.
fn cascade(section: &mut SectionOrchestrator, stagger: Stagger, count: u32, variant: AnimationVariant) {
    let group = section.add_group(GroupConfig {
        parent: Parent::Region,
        order: 0,
        stagger,
    });
    let variant = variant.shared();
    for i in 0..count {
        let _ = section.add_element(ElementConfig::new(i, Rc::clone(&variant)).in_group(group));
    }
}

/// Header, left column (100ms), right column (200ms), three stats from
/// 300ms every 100ms, six skills from 300ms every 50ms.
#[must_use]
pub fn about() -> SectionOrchestrator {
    let mut section = SectionOrchestrator::new("about", config());
    let _ = section.add_element(header());
    columns(&mut section);
    let chip = AnimationVariant::fade_rise(20.0).with_duration(Millis(400));
    cascade(&mut section, Stagger::new(300, 100), STATS, chip);
    cascade(&mut section, Stagger::new(300, 50), SKILLS, chip);
    section
}

/// Header, then `cards` cards every 100ms, then two links per card that
/// only react to gestures, then a "view more" button at 500ms.
#[must_use]
pub fn projects(cards: u32) -> SectionOrchestrator {
    let mut section = SectionOrchestrator::new("projects", config());
    let _ = section.add_element(header());
    cascade(
        &mut section,
        Stagger::new(0, 100),
        cards,
        AnimationVariant::fade_rise(40.0),
    );
    for _ in 0..cards * 2 {
        let _ = section.add_element(icon());
    }
    let more = AnimationVariant::fade_rise(20.0).with_delay(Millis(500));
    let _ = section.add_element(ElementConfig::new(0, more.shared()));
    section
}

/// Header, then three entries every 150ms.
#[must_use]
pub fn experience() -> SectionOrchestrator {
    let mut section = SectionOrchestrator::new("experience", config());
    let _ = section.add_element(header());
    cascade(
        &mut section,
        Stagger::new(0, 150),
        EXPERIENCE_ENTRIES,
        AnimationVariant::fade_rise(40.0),
    );
    section
}

/// Header, left and right columns, two contact items that nudge right on
/// hover, three social icons that lift and grow on hover.
#[must_use]
pub fn contact() -> SectionOrchestrator {
    let mut section = SectionOrchestrator::new("contact", config());
    let _ = section.add_element(header());
    columns(&mut section);
    let still = AnimationVariant::still().shared();
    for _ in 0..CONTACT_ITEMS {
        let item = ElementConfig::new(0, Rc::clone(&still))
            .with_gestures(GesturePoses::nudge(Vec2::new(5.0, 0.0)));
        let _ = section.add_element(item);
    }
    for _ in 0..SOCIAL_ICONS {
        let icon = ElementConfig::new(0, Rc::clone(&still))
            .with_gestures(GesturePoses::scale(1.1, 0.95).lifted(2.0));
        let _ = section.add_element(icon);
    }
    section
}

/// Three social icons with no entrance.
#[must_use]
pub fn footer() -> SectionOrchestrator {
    let mut section = SectionOrchestrator::new("footer", config().with_margin(0.0));
    for _ in 0..SOCIAL_ICONS {
        let _ = section.add_element(icon());
    }
    section
}

/// Lays out the whole page below a hero banner and returns the section
/// handles, top to bottom.
pub fn portfolio(page: &mut SimulatedPage) -> Vec<RegionId> {
    page.push_spacer(HERO_HEIGHT);
    [
        (about(), 1100.0),
        (projects(4), 1400.0),
        (experience(), 1000.0),
        (contact(), 900.0),
        (footer(), 200.0),
    ]
    .into_iter()
    .map(|(section, height)| page.push_section(section, height))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::orchestrator::Interaction;
    use unveil_core::reveal::RevealPhase;
    use unveil_core::stage::ElementRef;
    use unveil_core::variant::Pose;

    fn element(page: &SimulatedPage, region: RegionId, nth: usize) -> ElementRef {
        let (element, _) = page
            .stage()
            .get(region)
            .and_then(|s| s.elements().nth(nth))
            .expect("element exists");
        ElementRef { region, element }
    }

    fn delays(page: &SimulatedPage, region: RegionId) -> Vec<u32> {
        page.presenter()
            .region_targets(region)
            .map(|a| a.target.delay.get())
            .collect()
    }

    /// A 1280x800 page with the hero, about, and a two-card projects
    /// section starting at 1900.
    fn two_card_page() -> (SimulatedPage, RegionId) {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        page.push_spacer(HERO_HEIGHT);
        let _ = page.push_section(about(), 1100.0);
        let projects = page.push_section(projects(2), 1400.0);
        (page, projects)
    }

    #[test]
    fn projects_reveal_once_with_staggered_cards() {
        let (mut page, projects) = two_card_page();
        let _ = page.frame();
        assert_eq!(page.stage().get(projects).unwrap().phase(), RevealPhase::Pending);

        // Top edge touching the margin line is not an intersection.
        page.scroll_to(1200.0);
        let _ = page.frame();
        assert!(!page.stage().is_revealed(projects));

        page.scroll_to(1250.0);
        let changes = page.frame();
        assert_eq!(changes.revealed.last(), Some(&projects));

        let cards = [element(&page, projects, 1), element(&page, projects, 2)];
        let card_delays: Vec<_> = cards
            .iter()
            .map(|&c| page.presenter().latest(c).unwrap().target.delay)
            .collect();
        assert_eq!(card_delays, [Millis(0), Millis(100)]);

        for y in [0.0, 3000.0, 1250.0, 0.0] {
            page.scroll_to(y);
            page.frames(5);
        }
        assert_eq!(page.presenter().reveal_count(projects), 1);
        assert!(page.stage().is_revealed(projects));
        let records: Vec<_> = page
            .reveal_log()
            .iter()
            .filter(|r| r.key == "projects")
            .collect();
        assert_eq!(records.len(), 1);
        assert!((records[0].scroll_y - 1250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sections_in_the_initial_viewport_reveal_on_first_frame() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        let about = page.push_section(about(), 1100.0);
        let _ = page.push_section(experience(), 1000.0);
        let changes = page.frame();
        assert_eq!(changes.revealed, [about]);
        assert_eq!(page.reveal_log()[0].frame, 0);
    }

    #[test]
    fn remounted_section_starts_pending() {
        let (mut page, first) = two_card_page();
        page.scroll_to(1900.0);
        let _ = page.frame();
        assert!(page.stage().is_revealed(first));

        assert!(page.remove_section(first));
        page.scroll_to(0.0);
        let second = page.push_section(projects(2), 1400.0);
        let changes = page.frame();
        assert!(changes.unmounted.contains(&first));
        assert!(changes.mounted.contains(&second));
        assert_ne!(first, second);
        assert!(!page.stage().is_revealed(second));

        let card = page.presenter().latest(element(&page, second, 1)).unwrap();
        assert!(!card.animated);
        assert_eq!(card.target.pose, AnimationVariant::fade_rise(40.0).start);

        assert!(page.scroll_to_section(second));
        let _ = page.frame();
        assert_eq!(page.presenter().reveal_count(second), 1);
    }

    #[test]
    fn regions_reveal_independently() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        let regions = portfolio(&mut page);
        page.scroll_to(400.0);
        let _ = page.frame();
        let revealed: Vec<_> = regions
            .iter()
            .map(|&r| page.stage().is_revealed(r))
            .collect();
        assert_eq!(revealed, [true, false, false, false, false]);

        let projects = regions[1];
        let card = page.presenter().latest(element(&page, projects, 1)).unwrap();
        assert!(!card.animated, "projects still shows its start pose");

        page.scroll_to(page.document_height());
        let _ = page.frame();
        let keys: Vec<_> = page.reveal_log().iter().map(|r| r.key.as_str()).collect();
        assert_eq!(
            keys,
            ["about", "contact", "footer"],
            "a jump skips what was never seen"
        );
    }

    #[test]
    fn about_cascade_delays() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        let about = page.push_section(about(), 1100.0);
        let _ = page.frame();
        assert_eq!(
            delays(&page, about),
            [0, 100, 200, 300, 400, 500, 300, 350, 400, 450, 500, 550]
        );
    }

    #[test]
    fn poses_hold_until_their_delay() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        let about = page.push_section(about(), 1100.0);
        let _ = page.frame();

        let right = element(&page, about, 2);
        let start = AnimationVariant::fade_slide(Side::Right, 30.0).start;
        assert_eq!(page.pose(right), Some(start));

        page.frames(60);
        assert_eq!(page.pose(right), Some(Pose::SHOWN));
    }

    #[test]
    fn gestures_follow_the_reveal() {
        let (mut page, projects) = two_card_page();
        let link = element(&page, projects, 3);
        let _ = page.frame();
        assert!(!page.hover(link, Interaction::Hover), "pending regions ignore gestures");
        assert!(!page.hover(link, Interaction::Idle));

        page.scroll_to(1900.0);
        let _ = page.frame();
        assert!(page.hover(link, Interaction::Hover));
        let changes = page.frame();
        assert_eq!(changes.interactions, [link]);
        let applied = page.presenter().latest(link).unwrap();
        assert_eq!(applied.target.pose, Pose::SHOWN.scaled(1.1));
        assert_eq!(applied.target.delay, Millis::ZERO);
    }

    #[test]
    fn footer_triggers_on_any_overlap() {
        let mut page = SimulatedPage::new(1280.0, 800.0);
        let regions = portfolio(&mut page);
        let footer = regions[4];
        let top = page.section_top(footer).unwrap();
        page.scroll_to(top - 790.0);
        let _ = page.frame();
        assert!(page.stage().is_revealed(footer));
    }
}
