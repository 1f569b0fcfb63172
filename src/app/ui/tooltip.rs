use eframe::egui::{self, Color32, CornerRadius, Id, Margin, Order, Pos2, RichText, Ui, vec2};

use super::super::graph::Tooltip;
use super::super::render_utils::TOOLTIP_ID;

pub(in crate::app) fn show_tooltip(ui: &Ui, tooltip: &Tooltip, pointer: Pos2) {
    egui::Area::new(Id::new(TOOLTIP_ID))
        .order(Order::Tooltip)
        .interactable(false)
        .fixed_pos(pointer + vec2(14.0, 14.0))
        .show(ui.ctx(), |ui| {
            egui::Frame::new()
                .fill(Color32::BLACK)
                .corner_radius(CornerRadius::same(5))
                .inner_margin(Margin::symmetric(10, 6))
                .show(ui, |ui| {
                    ui.label(RichText::new(tooltip.name.as_str()).strong().color(Color32::WHITE));
                    ui.label(
                        RichText::new(format!("Version: {}", tooltip.version))
                            .color(Color32::WHITE),
                    );
                    ui.label(
                        RichText::new(format!("Type: {}", tooltip.role.label()))
                            .color(Color32::WHITE),
                    );
                });
        });
}
