use eframe::egui::{
    Align2, Color32, CursorIcon, FontId, Painter, Rect, Response, Sense, Shape, Stroke, Ui,
};

use super::super::highlight::{BACKGROUND_OPACITY, BACKGROUND_ROUNDING, DetailsButton};
use super::super::render_utils::{
    ARROW, HIGHLIGHT_BACKGROUND, LABEL_DEFAULT, LABEL_FONT_SIZE, LINK, TEXT_DEFAULT,
    TEXT_HIGHLIGHTED, blend_color, details_button_id, draw_background, highlighted_fill,
    label_parts, node_id, screen_to_world, segment_visible, with_opacity, world_rect_to_screen,
    world_to_screen,
};
use super::super::ui::{paint_details, show_tooltip};
use super::super::viewport::FAST_TRANSITION_SECS;
use super::GraphView;
use crate::network::NodeId;

const LINK_WIDTH: f32 = 1.5;

impl GraphView {
    pub(in crate::app) fn show(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);
        self.resize(rect.size());

        let font = FontId::proportional(LABEL_FONT_SIZE);
        self.measure_labels(|text| {
            painter
                .layout_no_wrap(text.to_owned(), font.clone(), TEXT_DEFAULT)
                .size()
        });

        let now = ui.input(|input| input.time);
        if self.details().is_shown() {
            self.handle_details_input(ui, rect, &response, now);
        } else {
            self.handle_graph_input(ui, rect, &response, now);
        }

        if self.step(now) {
            ui.ctx().request_repaint();
        }

        self.paint_links(&painter, rect);
        if let Some(button) = self.paint_highlight_background(&painter, rect, now) {
            let button = ui.interact(button, details_button_id(), Sense::hover());
            if button.hovered() && !self.details().is_shown() {
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
        }
        if self.paint_nodes(ui, &painter, rect) {
            ui.ctx().request_repaint();
        }

        if self.details().is_shown() {
            paint_details(&painter, rect, self.details(), now);
        } else if let Some(pointer) = response.hover_pos() {
            let tooltip = self
                .hovered_node(rect, &response)
                .and_then(|id| self.tooltip(id));
            if let Some(tooltip) = tooltip {
                show_tooltip(ui, &tooltip, pointer);
            }
        }
    }

    fn paint_links(&self, painter: &Painter, rect: Rect) {
        let transform = self.viewport().transform();
        let stroke = Stroke::new(LINK_WIDTH * transform.scale, LINK);

        for route in self.routes() {
            let start = world_to_screen(rect, transform, route.start);
            let end = world_to_screen(rect, transform, route.end);
            if !segment_visible(rect, start, end, 2.0) {
                continue;
            }

            painter.line_segment([start, end], stroke);
            if let Some(arrow) = route.arrowhead() {
                let points = arrow
                    .iter()
                    .map(|&point| world_to_screen(rect, transform, point))
                    .collect();
                painter.add(Shape::convex_polygon(points, ARROW, Stroke::NONE));
            }
        }
    }

    fn paint_highlight_background(&self, painter: &Painter, rect: Rect, now: f64) -> Option<Rect> {
        let frame = self.background.frame(now)?;
        let transform = self.viewport().transform();
        let scale = transform.scale;

        let background = world_rect_to_screen(rect, transform, frame.rect);
        painter.rect_filled(
            background,
            BACKGROUND_ROUNDING * scale,
            with_opacity(HIGHLIGHT_BACKGROUND, frame.opacity),
        );

        let button_opacity = frame.opacity / BACKGROUND_OPACITY;
        let button = world_rect_to_screen(rect, transform, frame.button.rect_in(frame.rect));
        painter.rect_filled(
            button,
            frame.button.rounding * scale,
            with_opacity(Color32::BLACK, button_opacity),
        );
        painter.text(
            button.center(),
            Align2::CENTER_CENTER,
            DetailsButton::LABEL,
            FontId::proportional(frame.button.font_size * scale),
            with_opacity(Color32::WHITE, button_opacity),
        );
        Some(button)
    }

    fn paint_nodes(&self, ui: &Ui, painter: &Painter, rect: Rect) -> bool {
        let transform = self.viewport().transform();
        let font = FontId::proportional(LABEL_FONT_SIZE * self.viewport().scale());
        let highlight = self.highlight();
        let mut animating = false;

        for (id, (node, label)) in self.network().nodes.iter().zip(self.labels()).enumerate() {
            let highlighted = highlight.is_some_and(|state| state.is_visible(node.level));
            let mix = ui.ctx().animate_bool_with_time(
                node_id(id),
                highlighted,
                FAST_TRANSITION_SECS as f32,
            );
            animating |= mix > 0.0 && mix < 1.0;

            let screen = world_rect_to_screen(rect, transform, label.rect);
            if !screen.intersects(rect) {
                continue;
            }

            let role = node.role();
            let fill = blend_color(LABEL_DEFAULT, highlighted_fill(role, node.level), mix);
            for part in label_parts(screen, role) {
                painter.add(Shape::convex_polygon(part, fill, Stroke::NONE));
            }

            painter.text(
                screen.center(),
                Align2::CENTER_CENTER,
                node.name.as_str(),
                font.clone(),
                blend_color(TEXT_DEFAULT, TEXT_HIGHLIGHTED, mix),
            );
        }

        animating
    }

    pub(super) fn hovered_node(&self, rect: Rect, response: &Response) -> Option<NodeId> {
        let pointer = response.hover_pos()?;
        self.node_at(screen_to_world(rect, self.viewport().transform(), pointer))
    }
}
