use eframe::egui::{Pos2, Vec2, vec2};

const LABEL_MARGIN: f32 = 15.0;
const VERTICAL_SPREAD: f32 = 50.0;
const BELOW_OFFSET: f32 = 5.0;

const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LinkPath {
    pub start: Pos2,
    pub end: Pos2,
}

impl LinkPath {
    pub(in crate::app) fn arrowhead(&self) -> Option<[Pos2; 3]> {
        let direction = (self.end - self.start).normalized();
        if !direction.is_finite() || direction == Vec2::ZERO {
            return None;
        }

        let base = self.end - direction * ARROW_LENGTH;
        let side = direction.rot90() * ARROW_HALF_WIDTH;
        Some([self.end, base + side, base - side])
    }
}

/// Anchors are pushed out horizontally by half the label width plus a margin
/// and shifted vertically by `50 sin(angle)`, so links leave labels at their
/// sides rather than their centres. The side below the other endpoint gets
/// an extra nudge so links in opposite directions don't overlap.
pub(in crate::app) fn route_link(
    source: Pos2,
    source_width: f32,
    target: Pos2,
    target_width: f32,
) -> LinkPath {
    let diff = source - target;
    let angle = diff.y.abs().atan2(diff.x.abs());
    let (sin, cos) = angle.sin_cos();

    let source_reach = (source_width / 2.0 + LABEL_MARGIN) * cos;
    let target_reach = (target_width / 2.0 + LABEL_MARGIN) * cos;
    let offset_y = VERTICAL_SPREAD * sin;
    let offset_y_below = -offset_y - BELOW_OFFSET;

    let source_left = diff.x < 0.0;
    let source_below = diff.y > 0.0;

    let start = source
        + vec2(
            if source_left { source_reach } else { -source_reach },
            if source_below { offset_y_below } else { offset_y },
        );
    let end = target
        + vec2(
            if source_left { -target_reach } else { target_reach },
            if source_below { offset_y } else { offset_y_below },
        );

    LinkPath { start, end }
}
