use eframe::egui::{Color32, Id, Painter, Pos2, Rect, Vec2, vec2};

use super::viewport::ViewTransform;
use crate::network::{NodeId, Role};

const NODE_ID: &str = "node";
pub(super) const TOOLTIP_ID: &str = "tooltip";
const DETAILS_BUTTON_ID: &str = "details-button";
pub(super) const LOADER_ID: &str = "loader";
pub(super) const ENVIRONMENT_SELECT_ID: &str = "environment-select";

pub(super) fn node_id(node: NodeId) -> Id {
    Id::new(NODE_ID).with(node)
}

pub(super) fn details_button_id() -> Id {
    Id::new(DETAILS_BUTTON_ID)
}

pub(super) const CANVAS: Color32 = Color32::from_rgb(250, 250, 251);
pub(super) const FOCUSED: Color32 = Color32::from_rgb(0x4c, 0xa3, 0xe5);
pub(super) const PROVIDER: Color32 = Color32::from_rgb(0x00, 0xbf, 0xc2);
pub(super) const CONSUMER: Color32 = Color32::from_rgb(0x03, 0x98, 0x81);
pub(super) const PROVIDER_CONSUMER: Color32 = Color32::from_rgb(0x03, 0x93, 0x9f);
pub(super) const LABEL_DEFAULT: Color32 = Color32::from_rgb(0xdc, 0xde, 0xe0);
pub(super) const TEXT_DEFAULT: Color32 = Color32::from_rgb(0x5e, 0x60, 0x63);
pub(super) const TEXT_HIGHLIGHTED: Color32 = Color32::WHITE;
pub(super) const LINK: Color32 = Color32::from_rgb(0xc4, 0xc7, 0xcc);
pub(super) const ARROW: Color32 = Color32::from_rgb(0xdc, 0xde, 0xe0);
pub(super) const HIGHLIGHT_BACKGROUND: Color32 = Color32::from_rgb(0xa9, 0xae, 0xb6);
pub(super) const DETAILS_LINK: Color32 = Color32::from_rgb(0x00, 0x76, 0xeb);

pub(super) const LABEL_FONT_SIZE: f32 = 15.0;
pub(super) const FALLBACK_TEXT_SIZE: Vec2 = vec2(200.0, 25.0);

const LABEL_HEIGHT: f32 = 29.18;
const LABEL_PADDING: f32 = 45.0;
const PLAIN_EXTRA_PADDING: f32 = 10.0;
const NOTCH_DEPTH: f32 = 9.37;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;
    let mix = |from: u8, to: u8| (from as f32 * inverse + to as f32 * amount).round() as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn role_color(role: Role) -> Color32 {
    match role {
        Role::Provider => PROVIDER,
        Role::Consumer => CONSUMER,
        Role::ProviderConsumer => PROVIDER_CONSUMER,
        Role::Plain => LABEL_DEFAULT,
    }
}

pub(super) fn highlighted_fill(role: Role, level: u32) -> Color32 {
    if level == 1 { FOCUSED } else { role_color(role) }
}

pub(super) fn label_size(text_size: Option<Vec2>, role: Role) -> Vec2 {
    let text_width = text_size.unwrap_or(FALLBACK_TEXT_SIZE).x;
    let padding = match role {
        Role::Plain => LABEL_PADDING + PLAIN_EXTRA_PADDING,
        _ => LABEL_PADDING,
    };
    vec2(text_width + padding, LABEL_HEIGHT)
}

pub(super) fn label_parts(rect: Rect, role: Role) -> Vec<Vec<Pos2>> {
    let (notch, point) = label_features(role);
    let left = if notch { rect.left() + NOTCH_DEPTH } else { rect.left() };
    let right = if point { rect.right() - NOTCH_DEPTH } else { rect.right() };
    let middle = rect.center().y;

    let mut body = vec![
        Pos2::new(left, rect.top()),
        Pos2::new(right, rect.top()),
    ];
    if point {
        body.push(Pos2::new(rect.right(), middle));
    }
    body.extend([Pos2::new(right, rect.bottom()), Pos2::new(left, rect.bottom())]);

    let mut parts = vec![body];
    if notch {
        parts.push(vec![
            rect.left_top(),
            Pos2::new(left, rect.top()),
            Pos2::new(left, middle),
        ]);
        parts.push(vec![
            Pos2::new(left, middle),
            Pos2::new(left, rect.bottom()),
            rect.left_bottom(),
        ]);
    }
    parts
}

pub(super) fn label_outline(rect: Rect, role: Role) -> Vec<Pos2> {
    let (notch, point) = label_features(role);
    let right = if point { rect.right() - NOTCH_DEPTH } else { rect.right() };
    let middle = rect.center().y;

    let mut outline = vec![rect.left_top(), Pos2::new(right, rect.top())];
    if point {
        outline.push(Pos2::new(rect.right(), middle));
    }
    outline.extend([Pos2::new(right, rect.bottom()), rect.left_bottom()]);
    if notch {
        outline.push(Pos2::new(rect.left() + NOTCH_DEPTH, middle));
    }
    outline
}

fn label_features(role: Role) -> (bool, bool) {
    match role {
        Role::Provider => (true, false),
        Role::Consumer => (false, true),
        Role::ProviderConsumer => (true, true),
        Role::Plain => (false, false),
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, CANVAS);
}

pub(super) fn world_to_screen(rect: Rect, transform: ViewTransform, world: Pos2) -> Pos2 {
    rect.min + transform.apply(world).to_vec2()
}

pub(super) fn screen_to_world(rect: Rect, transform: ViewTransform, screen: Pos2) -> Pos2 {
    transform.invert((screen - rect.min).to_pos2())
}

pub(super) fn world_rect_to_screen(rect: Rect, transform: ViewTransform, world: Rect) -> Rect {
    transform.apply_rect(world).translate(rect.min.to_vec2())
}

pub(super) fn segment_visible(clip: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    Rect::from_two_pos(start, end)
        .expand(padding)
        .intersects(clip)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(0.0, 0.0), vec2(100.0, 30.0))
    }

    #[test]
    fn ids_are_unique_per_node_index() {
        assert_ne!(node_id(0), node_id(1));
        assert_eq!(node_id(3), node_id(3));
        for node in 0..8 {
            assert_ne!(node_id(node), details_button_id());
            assert_ne!(node_id(node), Id::new(TOOLTIP_ID));
        }
    }

    #[test]
    fn label_width_pads_the_text() {
        let text = Some(vec2(80.0, 18.0));

        assert_abs_diff_eq!(label_size(text, Role::Provider).x, 125.0);
        assert_abs_diff_eq!(label_size(text, Role::Plain).x, 135.0);
        assert_abs_diff_eq!(label_size(None, Role::Consumer).x, 245.0);
        assert_abs_diff_eq!(label_size(None, Role::Consumer).y, LABEL_HEIGHT);
    }

    #[test]
    fn plain_label_is_a_rectangle() {
        let parts = label_parts(rect(), Role::Plain);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].len(), 4);
        assert_eq!(label_outline(rect(), Role::Plain).len(), 4);
    }

    #[test]
    fn consumer_label_points_right() {
        let outline = label_outline(rect(), Role::Consumer);
        assert!(outline.contains(&Pos2::new(100.0, 15.0)));
        assert_eq!(label_parts(rect(), Role::Consumer).len(), 1);
    }

    #[test]
    fn provider_label_has_left_notch() {
        let outline = label_outline(rect(), Role::Provider);
        assert_eq!(outline.last(), Some(&Pos2::new(NOTCH_DEPTH, 15.0)));

        let parts = label_parts(rect(), Role::Provider);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().flatten().all(|point| rect().contains(*point)));
    }

    #[test]
    fn both_roles_combine_notch_and_point() {
        assert_eq!(label_outline(rect(), Role::ProviderConsumer).len(), 6);
        assert_eq!(label_parts(rect(), Role::ProviderConsumer).len(), 3);
    }

    #[test]
    fn root_level_uses_focus_colour() {
        assert_eq!(highlighted_fill(Role::Consumer, 1), FOCUSED);
        assert_eq!(highlighted_fill(Role::Consumer, 2), CONSUMER);
        assert_eq!(highlighted_fill(Role::ProviderConsumer, 3), PROVIDER_CONSUMER);
    }

    #[test]
    fn blending_reaches_both_ends() {
        assert_eq!(blend_color(LABEL_DEFAULT, FOCUSED, 0.0), LABEL_DEFAULT);
        assert_eq!(blend_color(LABEL_DEFAULT, FOCUSED, 1.0), FOCUSED);
    }

    #[test]
    fn screen_mapping_is_relative_to_the_canvas() {
        let canvas = Rect::from_min_size(Pos2::new(200.0, 40.0), vec2(800.0, 600.0));
        let transform = ViewTransform {
            translate: vec2(10.0, 20.0),
            scale: 2.0,
        };

        let screen = world_to_screen(canvas, transform, Pos2::new(5.0, 5.0));
        assert_eq!(screen, Pos2::new(220.0, 70.0));
        assert_eq!(screen_to_world(canvas, transform, screen), Pos2::new(5.0, 5.0));
    }

    #[test]
    fn offscreen_segment_is_culled() {
        let clip = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(segment_visible(clip, Pos2::new(-50.0, 50.0), Pos2::new(150.0, 50.0), 1.0));
        assert!(!segment_visible(clip, Pos2::new(200.0, 0.0), Pos2::new(300.0, 90.0), 1.0));
    }
}
