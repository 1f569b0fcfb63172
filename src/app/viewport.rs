use eframe::egui::{Pos2, Rect, Vec2};

use crate::util::{ease_cubic_in_out, lerp};

pub(in crate::app) const MIN_SCALE: f32 = 0.5;
pub(in crate::app) const MAX_SCALE: f32 = 12.0;

pub(in crate::app) const TRANSITION_SECS: f64 = 0.75;
pub(in crate::app) const FAST_TRANSITION_SECS: f64 = 0.45;
const KEY_ZOOM_SECS: f64 = 0.25;

const KEY_ZOOM_IN: f32 = 1.25;
const KEY_ZOOM_OUT: f32 = 0.8;

const FOCUS_MAX_SCALE: f32 = 1.3;
const FOCUS_FILL: f32 = 0.9;

/// `screen = translate + world * scale`, relative to the viewport's top-left
/// corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ViewTransform {
    pub translate: Vec2,
    pub scale: f32,
}

impl ViewTransform {
    pub(in crate::app) const IDENTITY: Self = Self {
        translate: Vec2::ZERO,
        scale: 1.0,
    };

    pub(in crate::app) fn apply(self, world: Pos2) -> Pos2 {
        (self.translate + world.to_vec2() * self.scale).to_pos2()
    }

    pub(in crate::app) fn invert(self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.translate) / self.scale).to_pos2()
    }

    pub(in crate::app) fn apply_rect(self, world: Rect) -> Rect {
        Rect::from_min_max(self.apply(world.min), self.apply(world.max))
    }

    fn interpolate(self, to: Self, t: f32) -> Self {
        Self {
            translate: self.translate + (to.translate - self.translate) * t,
            scale: lerp(self.scale, to.scale, t),
        }
    }

    fn scaled_about(self, anchor: Pos2, scale: f32) -> Self {
        let world = self.invert(anchor);
        Self {
            translate: anchor.to_vec2() - world.to_vec2() * scale,
            scale,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    from: ViewTransform,
    to: ViewTransform,
    started: f64,
    duration: f64,
}

#[derive(Clone, Debug)]
pub(in crate::app) struct Viewport {
    size: Vec2,
    current: ViewTransform,
    transition: Option<Transition>,
}

impl Viewport {
    pub(in crate::app) fn new(size: Vec2) -> Self {
        Self {
            size,
            current: ViewTransform::IDENTITY,
            transition: None,
        }
    }

    pub(in crate::app) fn size(&self) -> Vec2 {
        self.size
    }

    pub(in crate::app) fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub(in crate::app) fn transform(&self) -> ViewTransform {
        self.current
    }

    pub(in crate::app) fn scale(&self) -> f32 {
        self.current.scale
    }

    #[cfg(test)]
    pub(in crate::app) fn target(&self) -> ViewTransform {
        self.transition
            .map_or(self.current, |transition| transition.to)
    }

    #[cfg(test)]
    pub(in crate::app) fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub(in crate::app) fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.transition = None;
        let scale = (self.current.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.current = self.current.scaled_about(anchor, scale);
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.transition = None;
        self.current.translate += delta;
    }

    pub(in crate::app) fn zoom_by_key(&mut self, zoom_in: bool, now: f64) -> bool {
        let factor = if zoom_in { KEY_ZOOM_IN } else { KEY_ZOOM_OUT };
        let scale = self.current.scale * factor;
        if !(MIN_SCALE..=MAX_SCALE).contains(&scale) {
            return false;
        }

        let to = self.current.scaled_about((self.size * 0.5).to_pos2(), scale);
        self.animate_to(to, now, KEY_ZOOM_SECS);
        true
    }

    pub(in crate::app) fn focus_scale(&self, world: Rect) -> f32 {
        let ratio = (world.width() / self.size.x).max(world.height() / self.size.y);
        if !ratio.is_finite() || ratio <= 0.0 {
            return FOCUS_MAX_SCALE;
        }
        FOCUS_MAX_SCALE.min(FOCUS_FILL / ratio)
    }

    pub(in crate::app) fn center_on(&mut self, world: Rect, scale: Option<f32>, now: f64) {
        let scale = scale
            .unwrap_or_else(|| self.focus_scale(world))
            .clamp(MIN_SCALE, MAX_SCALE);
        let to = ViewTransform {
            translate: self.size * 0.5 - world.center().to_vec2() * scale,
            scale,
        };
        self.animate_to(to, now, TRANSITION_SECS);
    }

    pub(in crate::app) fn reset(&mut self, now: f64) {
        self.animate_to(ViewTransform::IDENTITY, now, TRANSITION_SECS);
    }

    pub(in crate::app) fn jump_to(&mut self, transform: ViewTransform) {
        self.transition = None;
        self.current = ViewTransform {
            scale: transform.scale.clamp(MIN_SCALE, MAX_SCALE),
            ..transform
        };
    }

    pub(in crate::app) fn animate_to(&mut self, to: ViewTransform, now: f64, duration: f64) {
        let to = ViewTransform {
            scale: to.scale.clamp(MIN_SCALE, MAX_SCALE),
            ..to
        };
        self.transition = Some(Transition {
            from: self.current,
            to,
            started: now,
            duration,
        });
    }

    pub(in crate::app) fn update(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };

        let progress = if transition.duration <= 0.0 {
            1.0
        } else {
            ((now - transition.started) / transition.duration).clamp(0.0, 1.0) as f32
        };
        self.current = transition
            .from
            .interpolate(transition.to, ease_cubic_in_out(progress));

        if progress >= 1.0 {
            self.current = transition.to;
            self.transition = None;
        }
        self.transition.is_some()
    }

    #[cfg(test)]
    pub(in crate::app) fn world_center(&self) -> Pos2 {
        self.current.invert((self.size * 0.5).to_pos2())
    }
}
