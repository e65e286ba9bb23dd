// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative entrance transitions.
//!
//! An [`AnimationVariant`] is pure data: a hidden [`Pose`] to start from, a
//! shown [`Pose`] to end at, and the timing ([`Millis`] duration, [`Easing`]
//! curve, base delay) of the move between them. Variants are immutable once
//! built and are meant to be shared between many elements (see
//! [`SharedVariant`]).
//!
//! Three shapes cover the sections of a typical single-page site:
//!
//! - [`fade_rise`](AnimationVariant::fade_rise): fade in while moving up
//!   from a vertical offset;
//! - [`fade_slide`](AnimationVariant::fade_slide): fade in while sliding in
//!   from the left or right;
//! - [`fade`](AnimationVariant::fade): plain fade.

use alloc::rc::Rc;

use kurbo::{CubicBez, ParamCurve, Point, Vec2};

use crate::time::Millis;

/// A visual snapshot of an element: opacity, translation, and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// Opacity in `0.0..=1.0`.
    pub opacity: f32,
    /// Translation from the element's layout position, in px.
    pub offset: Vec2,
    /// Uniform scale factor.
    pub scale: f64,
}

impl Pose {
    /// Fully opaque, untransformed.
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        offset: Vec2::ZERO,
        scale: 1.0,
    };

    /// Fully transparent, untransformed.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        offset: Vec2::ZERO,
        scale: 1.0,
    };

    /// Returns this pose translated by `offset`.
    #[must_use]
    pub fn offset_by(self, offset: Vec2) -> Self {
        Self {
            offset: self.offset + offset,
            ..self
        }
    }

    /// Returns this pose with its scale multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            scale: self.scale * factor,
            ..self
        }
    }

    /// Linearly interpolates between two poses.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "opacity is stored as f32; interpolation happens in f64"
    )]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let opacity = f64::from(self.opacity) + (f64::from(other.opacity) - f64::from(self.opacity)) * t;
        Self {
            opacity: opacity as f32,
            offset: self.offset.lerp(other.offset, t),
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::SHOWN
    }
}

/// Which edge a [`fade_slide`](AnimationVariant::fade_slide) enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Starts left of its resting position and moves right.
    Left,
    /// Starts right of its resting position and moves left.
    Right,
}

/// Timing curve for a transition.
///
/// The named curves use the CSS definitions, so a presenter can hand them to
/// the browser unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// CSS `ease`.
    Ease,
    /// CSS `ease-in`.
    EaseIn,
    /// CSS `ease-out`.
    #[default]
    EaseOut,
    /// CSS `ease-in-out`.
    EaseInOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Returns the `(x1, y1, x2, y2)` control points of the equivalent
    /// cubic Bézier timing function.
    #[must_use]
    pub const fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            Self::Linear => (0.0, 0.0, 1.0, 1.0),
            Self::Ease => (0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => (0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => (0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => (0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier(x1, y1, x2, y2) => (x1, y1, x2, y2),
        }
    }

    /// Evaluates the curve at progress `t`.
    ///
    /// `t` is clamped to `0.0..=1.0`. The endpoints map exactly to `0.0`
    /// and `1.0`.
    #[must_use]
    pub fn evaluate(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        if let Self::Linear = self {
            return t;
        }
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let (x1, y1, x2, y2) = self.control_points();
        // x1/x2 are clamped so the curve stays a function of x.
        let curve = CubicBez::new(
            Point::ZERO,
            (x1.clamp(0.0, 1.0), y1),
            (x2.clamp(0.0, 1.0), y2),
            (1.0, 1.0),
        );
        // x(s) is monotonic on 0..=1, so bisection always converges.
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..32 {
            let mid = 0.5 * (lo + hi);
            if curve.eval(mid).x < t {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        curve.eval(0.5 * (lo + hi)).y
    }
}

/// An immutable start/end pose pair with timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationVariant {
    /// Pose held while the owning region is pending.
    pub start: Pose,
    /// Pose animated to once the owning region is revealed.
    pub end: Pose,
    /// Length of the transition.
    pub duration: Millis,
    /// Timing curve.
    pub easing: Easing,
    /// Delay added in front of the element's stagger offset.
    pub delay: Millis,
}

/// A variant shared by reference between elements.
pub type SharedVariant = Rc<AnimationVariant>;

impl AnimationVariant {
    /// Default transition length for section-level entrances.
    pub const DEFAULT_DURATION: Millis = Millis(600);

    /// A plain fade from transparent to opaque.
    #[must_use]
    pub const fn fade() -> Self {
        Self {
            start: Pose::HIDDEN,
            end: Pose::SHOWN,
            duration: Self::DEFAULT_DURATION,
            easing: Easing::EaseOut,
            delay: Millis::ZERO,
        }
    }

    /// No entrance at all: the element is shown from the start.
    ///
    /// For elements that only react to gestures.
    #[must_use]
    pub const fn still() -> Self {
        Self {
            start: Pose::SHOWN,
            duration: Millis::ZERO,
            ..Self::fade()
        }
    }

    /// Fades in while rising `distance` px into place.
    #[must_use]
    pub const fn fade_rise(distance: f64) -> Self {
        Self {
            start: Pose {
                opacity: 0.0,
                offset: Vec2::new(0.0, distance),
                scale: 1.0,
            },
            ..Self::fade()
        }
    }

    /// Fades in while sliding `distance` px in from `side`.
    #[must_use]
    pub const fn fade_slide(side: Side, distance: f64) -> Self {
        let dx = match side {
            Side::Left => -distance,
            Side::Right => distance,
        };
        Self {
            start: Pose {
                opacity: 0.0,
                offset: Vec2::new(dx, 0.0),
                scale: 1.0,
            },
            ..Self::fade()
        }
    }

    /// Returns a copy with a different duration.
    #[must_use]
    pub const fn with_duration(self, duration: Millis) -> Self {
        Self { duration, ..self }
    }

    /// Returns a copy with a different base delay.
    #[must_use]
    pub const fn with_delay(self, delay: Millis) -> Self {
        Self { delay, ..self }
    }

    /// Returns a copy with a different easing curve.
    #[must_use]
    pub const fn with_easing(self, easing: Easing) -> Self {
        Self { easing, ..self }
    }

    /// Wraps the variant for sharing.
    #[must_use]
    pub fn shared(self) -> SharedVariant {
        Rc::new(self)
    }

    /// Samples the transition `elapsed` after it was triggered, for an
    /// element whose effective delay is `delay`.
    ///
    /// Before the delay has passed the start pose is returned; after
    /// `delay + duration` the end pose.
    #[must_use]
    pub fn sample(&self, elapsed: Millis, delay: Millis) -> Pose {
        if elapsed < delay {
            return self.start;
        }
        let running = elapsed.get() - delay.get();
        if self.duration == Millis::ZERO || running >= self.duration.get() {
            return self.end;
        }
        let t = f64::from(running) / f64::from(self.duration.get());
        self.start.lerp(self.end, self.easing.evaluate(t))
    }
}

/// Optional poses applied on top of the shown pose while the pointer hovers
/// or presses an element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GesturePoses {
    /// Pose while hovered.
    pub hover: Option<Pose>,
    /// Pose while pressed. Takes precedence over `hover`.
    pub press: Option<Pose>,
    /// Transition length for gesture changes.
    pub duration: Millis,
}

impl GesturePoses {
    /// Scale up on hover and down on press, around the shown pose.
    #[must_use]
    pub fn scale(hover: f64, press: f64) -> Self {
        Self {
            hover: Some(Pose::SHOWN.scaled(hover)),
            press: Some(Pose::SHOWN.scaled(press)),
            duration: Millis(200),
        }
    }

    /// Shifts by `offset` on hover; no press pose.
    #[must_use]
    pub fn nudge(offset: Vec2) -> Self {
        Self {
            hover: Some(Pose::SHOWN.offset_by(offset)),
            press: None,
            duration: Millis(200),
        }
    }

    /// Returns a copy whose hover pose is also lifted by `dy` px.
    #[must_use]
    pub fn lifted(self, dy: f64) -> Self {
        Self {
            hover: self.hover.map(|p| p.offset_by(Vec2::new(0.0, -dy))),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_rise_starts_below_and_hidden() {
        let v = AnimationVariant::fade_rise(30.0);
        assert_eq!(v.start.offset, Vec2::new(0.0, 30.0));
        assert!(v.start.opacity.abs() < f32::EPSILON);
        assert_eq!(v.end, Pose::SHOWN);
        assert_eq!(v.duration, Millis(600));
    }

    #[test]
    fn fade_slide_direction() {
        let left = AnimationVariant::fade_slide(Side::Left, 30.0);
        let right = AnimationVariant::fade_slide(Side::Right, 30.0);
        assert!(left.start.offset.x < 0.0, "left entrance starts left of rest");
        assert!(right.start.offset.x > 0.0, "right entrance starts right of rest");
        assert_ne!(left, right);
    }

    #[test]
    fn variants_compare_by_value() {
        let a = AnimationVariant::fade_rise(20.0).with_duration(Millis(400));
        let b = AnimationVariant::fade_rise(20.0).with_duration(Millis(400));
        assert_eq!(a, b);
        assert_ne!(a, b.with_delay(Millis(500)));
        let shared = a.shared();
        let other = Rc::clone(&shared);
        assert!(Rc::ptr_eq(&shared, &other));
    }

    #[test]
    fn easing_endpoints_are_exact() {
        for e in [
            Easing::Linear,
            Easing::Ease,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::CubicBezier(0.2, 0.8, 0.2, 1.0),
        ] {
            assert!(e.evaluate(0.0).abs() < f64::EPSILON, "{e:?} at 0");
            assert!((e.evaluate(1.0) - 1.0).abs() < f64::EPSILON, "{e:?} at 1");
        }
    }

    #[test]
    fn ease_out_is_ahead_of_linear() {
        let mid = Easing::EaseOut.evaluate(0.5);
        assert!(mid > 0.5, "ease-out should be past halfway at t=0.5, got {mid}");
        let mid = Easing::EaseIn.evaluate(0.5);
        assert!(mid < 0.5, "ease-in should lag at t=0.5, got {mid}");
    }

    #[test]
    fn easing_is_monotonic() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let y = Easing::EaseInOut.evaluate(f64::from(i) / 100.0);
            assert!(y + 1e-9 >= prev, "ease-in-out decreased at step {i}");
            prev = y;
        }
    }

    #[test]
    fn sample_respects_delay_and_duration() {
        let v = AnimationVariant::fade_rise(40.0)
            .with_duration(Millis(400))
            .with_easing(Easing::Linear);
        assert_eq!(v.sample(Millis(50), Millis(100)), v.start);
        assert_eq!(v.sample(Millis(500), Millis(100)), v.end);
        let halfway = v.sample(Millis(300), Millis(100));
        assert!((halfway.offset.y - 20.0).abs() < 1e-9);
        assert!((halfway.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_duration_jumps_to_end() {
        let v = AnimationVariant::fade().with_duration(Millis::ZERO);
        assert_eq!(v.sample(Millis(0), Millis(0)), v.end);
    }

    #[test]
    fn still_never_moves() {
        let v = AnimationVariant::still();
        assert_eq!(v.start, v.end);
        assert_eq!(v.sample(Millis(0), Millis(0)), Pose::SHOWN);
    }

    #[test]
    fn gesture_poses() {
        let g = GesturePoses::scale(1.1, 0.95).lifted(2.0);
        let hover = g.hover.unwrap();
        assert!((hover.scale - 1.1).abs() < 1e-12);
        assert_eq!(hover.offset, Vec2::new(0.0, -2.0));
        assert!((g.press.unwrap().scale - 0.95).abs() < 1e-12);

        let nudge = GesturePoses::nudge(Vec2::new(5.0, 0.0));
        assert_eq!(nudge.hover.map(|p| p.offset), Some(Vec2::new(5.0, 0.0)));
        assert_eq!(nudge.press, None);
    }
}
