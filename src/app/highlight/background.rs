use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::util::{ease_cubic_in_out, lerp};

use super::super::viewport::TRANSITION_SECS;

const PADDING_X: f32 = 100.0;
const PADDING_TOP: f32 = 50.0;

pub(in crate::app) const BACKGROUND_OPACITY: f32 = 0.35;
pub(in crate::app) const BACKGROUND_ROUNDING: f32 = 5.0;

const BUTTON_SIZE: Vec2 = vec2(100.0, 60.0);
const BUTTON_MARGIN_BOTTOM: f32 = 10.0;
const BUTTON_MARGIN_RIGHT: f32 = 40.0;
const BUTTON_ROUNDING: f32 = 5.0;
const BUTTON_FONT_SIZE: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct GroupBackground {
    pub rect: Rect,
    pub scale: f32,
}

pub(in crate::app) fn find_group_background_dimension(
    labels: impl IntoIterator<Item = Rect>,
    fit_scale: impl FnOnce(Rect) -> f32,
) -> Option<GroupBackground> {
    let bounds = labels
        .into_iter()
        .filter(|rect| rect.is_finite())
        .reduce(|bounds, rect| bounds.union(rect))?;

    let mut rect = Rect::from_min_max(
        Pos2::new(bounds.left() - PADDING_X, bounds.top() - PADDING_TOP),
        Pos2::new(bounds.right() + PADDING_X, bounds.bottom()),
    );
    let scale = fit_scale(rect);
    let button = DetailsButton::at_scale(scale);
    rect.max.y += button.size.y + 4.0 * button.margin_bottom;

    Some(GroupBackground { rect, scale })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct DetailsButton {
    pub size: Vec2,
    pub margin_bottom: f32,
    pub margin_right: f32,
    pub rounding: f32,
    pub font_size: f32,
}

impl DetailsButton {
    pub(in crate::app) const LABEL: &'static str = "Details";

    pub(in crate::app) fn at_scale(scale: f32) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Self {
            size: BUTTON_SIZE / scale,
            margin_bottom: BUTTON_MARGIN_BOTTOM / scale,
            margin_right: BUTTON_MARGIN_RIGHT / scale,
            rounding: BUTTON_ROUNDING / scale,
            font_size: BUTTON_FONT_SIZE / scale,
        }
    }

    pub(in crate::app) fn rect_in(&self, background: Rect) -> Rect {
        let min = Pos2::new(
            background.right() - self.size.x - self.margin_right,
            background.bottom() - self.size.y - self.margin_bottom,
        );
        Rect::from_min_size(min, self.size)
    }
}

#[derive(Clone, Copy, Debug)]
struct Fade {
    from_rect: Rect,
    from_opacity: f32,
    started: f64,
}

#[derive(Clone, Debug)]
pub(in crate::app) struct HighlightBackground {
    rect: Rect,
    scale: f32,
    opacity: f32,
    visible: bool,
    fade: Option<Fade>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct BackgroundFrame {
    pub rect: Rect,
    pub opacity: f32,
    pub button: DetailsButton,
}

impl Default for HighlightBackground {
    fn default() -> Self {
        Self {
            rect: Rect::NOTHING,
            scale: 1.0,
            opacity: 0.0,
            visible: false,
            fade: None,
        }
    }
}

impl HighlightBackground {
    pub(in crate::app) fn show(&mut self, group: GroupBackground, now: f64) {
        let from_rect = if self.visible { self.rect } else { group.rect };
        self.fade = Some(Fade {
            from_rect,
            from_opacity: self.opacity,
            started: now,
        });
        self.rect = group.rect;
        self.scale = group.scale;
        self.visible = true;
    }

    pub(in crate::app) fn hide(&mut self, now: f64) {
        if !self.visible && self.fade.is_none() {
            return;
        }
        self.fade = Some(Fade {
            from_rect: self.rect,
            from_opacity: self.opacity,
            started: now,
        });
        self.visible = false;
    }

    pub(in crate::app) fn update(&mut self, now: f64) -> bool {
        let Some(fade) = self.fade else {
            return false;
        };

        let progress = ((now - fade.started) / TRANSITION_SECS).clamp(0.0, 1.0) as f32;
        let target = if self.visible { BACKGROUND_OPACITY } else { 0.0 };
        self.opacity = lerp(fade.from_opacity, target, progress);
        if progress >= 1.0 {
            self.opacity = target;
            self.fade = None;
        }
        self.fade.is_some()
    }

    pub(in crate::app) fn frame(&self, now: f64) -> Option<BackgroundFrame> {
        if !self.visible && self.fade.is_none() {
            return None;
        }

        let rect = match self.fade {
            Some(fade) if self.visible => {
                let t = ease_cubic_in_out(((now - fade.started) / TRANSITION_SECS) as f32);
                Rect::from_min_max(
                    fade.from_rect.min.lerp(self.rect.min, t),
                    fade.from_rect.max.lerp(self.rect.max, t),
                )
            }
            _ => self.rect,
        };

        Some(BackgroundFrame {
            rect,
            opacity: self.opacity,
            button: DetailsButton::at_scale(self.scale),
        })
    }

    pub(in crate::app) fn button_contains(&self, world: Pos2) -> bool {
        self.visible && DetailsButton::at_scale(self.scale).rect_in(self.rect).contains(world)
    }
}
