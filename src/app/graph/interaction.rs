use eframe::egui::{self, CursorIcon, Key, Pos2, Rect, Ui};

use super::super::render_utils::screen_to_world;
use super::{GraphKey, GraphView};

const KEY_BINDINGS: [(Key, GraphKey); 5] = [
    (Key::ArrowUp, GraphKey::ZoomIn),
    (Key::ArrowDown, GraphKey::ZoomOut),
    (Key::ArrowRight, GraphKey::Expand),
    (Key::ArrowLeft, GraphKey::Contract),
    (Key::Escape, GraphKey::Close),
];

fn scroll_zoom_factor(ui: &Ui, response: &egui::Response) -> Option<f32> {
    if !response.hovered() {
        return None;
    }

    let scroll = ui.input(|input| input.raw_scroll_delta.y);
    if scroll.abs() <= f32::EPSILON {
        return None;
    }
    Some((1.0 + (scroll * 0.0018)).clamp(0.85, 1.15))
}

fn local_pointer(ui: &Ui, rect: Rect) -> Pos2 {
    let pointer = ui
        .input(|input| input.pointer.hover_pos())
        .unwrap_or_else(|| rect.center());
    (pointer - rect.min).to_pos2()
}

impl GraphView {
    pub(super) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        now: f64,
    ) {
        if let Some(factor) = scroll_zoom_factor(ui, response) {
            self.viewport.zoom_at(local_pointer(ui, rect), factor);
        }

        if response.drag_started() {
            let grabbed = ui
                .input(|input| input.pointer.press_origin())
                .map(|origin| screen_to_world(rect, self.viewport.transform(), origin))
                .and_then(|world| self.node_at(world));
            if let Some(id) = grabbed {
                self.begin_drag(id);
            }
        }

        if response.dragged() {
            if self.is_dragging() {
                if let Some(pointer) = response.interact_pointer_pos() {
                    let world = screen_to_world(rect, self.viewport.transform(), pointer);
                    self.drag_to(world);
                }
            } else {
                self.viewport.pan_by(response.drag_delta());
            }
        }

        if response.drag_stopped() {
            self.end_drag();
        }

        if response.clicked() || response.double_clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let world = screen_to_world(rect, self.viewport.transform(), pointer);
                if response.double_clicked() {
                    self.handle_double_click(world, now);
                } else {
                    self.handle_click(world, now);
                }
            }
        }

        self.handle_keys(ui, now);

        if self.is_dragging() {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        } else if response.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::Move);
        } else if self.hovered_node(rect, response).is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }
    }

    pub(super) fn handle_details_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        now: f64,
    ) {
        if let Some(factor) = scroll_zoom_factor(ui, response) {
            self.details
                .viewport_mut()
                .zoom_at(local_pointer(ui, rect), factor);
        }

        if response.dragged() {
            self.details.viewport_mut().pan_by(response.drag_delta());
        }

        let over_exit = response
            .hover_pos()
            .is_some_and(|pointer| self.details.exit_button_contains((pointer - rect.min).to_pos2()));
        if over_exit {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        if response.clicked() {
            let on_exit = response
                .interact_pointer_pos()
                .is_some_and(|pointer| self.details.exit_button_contains((pointer - rect.min).to_pos2()));
            if on_exit {
                self.close_details(now);
            }
        }

        if ui.input(|input| input.key_pressed(Key::Escape)) {
            self.key(GraphKey::Close, now);
        }
    }

    pub(super) fn handle_click(&mut self, world: Pos2, now: f64) {
        if self.background.button_contains(world) && self.open_details(now) {
            return;
        }

        match self.node_at(world) {
            Some(id) => {
                self.click_node(id, now);
            }
            None => {
                self.click_background(now);
            }
        }
    }

    pub(super) fn handle_double_click(&mut self, world: Pos2, now: f64) {
        if self.node_at(world).is_none() {
            self.double_click_background(now);
        }
    }

    fn handle_keys(&mut self, ui: &Ui, now: f64) {
        let unfocused = ui.ctx().memory(|memory| memory.focused().is_none());
        if !unfocused {
            return;
        }

        for (key, action) in KEY_BINDINGS {
            if ui.input(|input| input.key_pressed(key)) {
                self.key(action, now);
            }
        }
    }
}
