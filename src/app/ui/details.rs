use eframe::egui::{
    Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, epaint::CubicBezierShape, vec2,
};

use super::super::details::{DetailsView, Diagram, EXIT_BUTTON_RADIUS};
use super::super::render_utils::{
    DETAILS_LINK, FOCUSED, LABEL_FONT_SIZE, TEXT_DEFAULT, TEXT_HIGHLIGHTED, label_outline,
    label_parts, with_opacity, world_rect_to_screen, world_to_screen,
};
use super::super::viewport::ViewTransform;

const LINK_WIDTH: f32 = 2.0;
const NODE_RADIUS: f32 = 4.0;
const TEXT_GAP: f32 = 8.0;
const HALO_WIDTH: f32 = 2.0;
const EXIT_CROSS_HALF: f32 = 5.0;

pub(in crate::app) fn paint_details(painter: &Painter, rect: Rect, details: &DetailsView, now: f64) {
    let opacity = details.opacity(now);
    if opacity <= 0.0 {
        return;
    }

    painter.rect_filled(rect, 0.0, with_opacity(Color32::WHITE, opacity));

    if let Some(layout) = details.layout() {
        let transform = details.viewport().transform();
        let side = DiagramSide { painter, rect, transform, opacity };
        if let Some(consumers) = &layout.consumers {
            side.paint(consumers, Align2::RIGHT_CENTER);
        }
        if let Some(providers) = &layout.providers {
            side.paint(providers, Align2::LEFT_CENTER);
        }

        let root = world_rect_to_screen(rect, transform, layout.root_label);
        for part in label_parts(root, layout.root_role) {
            painter.add(Shape::convex_polygon(
                part,
                with_opacity(FOCUSED, opacity),
                Stroke::NONE,
            ));
        }
        painter.add(Shape::closed_line(
            label_outline(root, layout.root_role),
            Stroke::new(1.0, with_opacity(FOCUSED, opacity)),
        ));
        painter.text(
            root.center(),
            Align2::CENTER_CENTER,
            layout.root_name.as_str(),
            FontId::proportional(LABEL_FONT_SIZE * transform.scale),
            with_opacity(TEXT_HIGHLIGHTED, opacity),
        );
    }

    paint_exit_button(painter, rect.min + details.exit_button_center().to_vec2(), opacity);
}

struct DiagramSide<'a> {
    painter: &'a Painter,
    rect: Rect,
    transform: ViewTransform,
    opacity: f32,
}

impl DiagramSide<'_> {
    fn paint(&self, diagram: &Diagram, anchor: Align2) {
        let scale = self.transform.scale;
        let link = Stroke::new(LINK_WIDTH * scale, with_opacity(DETAILS_LINK, self.opacity));

        for points in diagram.links() {
            let points = points.map(|point| self.to_screen(point));
            self.painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                link,
            ));
        }

        let font = FontId::proportional(LABEL_FONT_SIZE * scale);
        let gap = (if anchor == Align2::RIGHT_CENTER { -TEXT_GAP } else { TEXT_GAP }) * scale;
        for node in diagram.labelled_nodes() {
            let center = self.to_screen(node.position);
            if !self.rect.expand(200.0 * scale).contains(center) {
                continue;
            }

            self.painter.circle_filled(
                center,
                NODE_RADIUS * scale,
                with_opacity(DETAILS_LINK, self.opacity),
            );
            self.halo_text(center + vec2(gap, 0.0), anchor, &node.name, font.clone());
        }
    }

    fn halo_text(&self, position: Pos2, anchor: Align2, text: &str, font: FontId) {
        let halo = with_opacity(Color32::WHITE, self.opacity);
        for offset in [
            vec2(-HALO_WIDTH, 0.0),
            vec2(HALO_WIDTH, 0.0),
            vec2(0.0, -HALO_WIDTH),
            vec2(0.0, HALO_WIDTH),
        ] {
            self.painter
                .text(position + offset, anchor, text, font.clone(), halo);
        }
        self.painter.text(
            position,
            anchor,
            text,
            font,
            with_opacity(TEXT_DEFAULT, self.opacity),
        );
    }

    fn to_screen(&self, world: Pos2) -> Pos2 {
        world_to_screen(self.rect, self.transform, world)
    }
}

fn paint_exit_button(painter: &Painter, center: Pos2, opacity: f32) {
    painter.circle(
        center,
        EXIT_BUTTON_RADIUS,
        with_opacity(Color32::WHITE, opacity),
        Stroke::new(1.0, with_opacity(TEXT_DEFAULT, opacity)),
    );

    let stroke = Stroke::new(1.5, with_opacity(TEXT_DEFAULT, opacity));
    let diagonal = vec2(EXIT_CROSS_HALF, EXIT_CROSS_HALF);
    let anti_diagonal = vec2(EXIT_CROSS_HALF, -EXIT_CROSS_HALF);
    painter.line_segment([center - diagonal, center + diagonal], stroke);
    painter.line_segment([center - anti_diagonal, center + anti_diagonal], stroke);
}
