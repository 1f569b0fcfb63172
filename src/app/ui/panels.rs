use eframe::egui::{self, Context, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::super::render_utils::ENVIRONMENT_SELECT_ID;
use super::super::{ViewModel, show_loader};

const MAX_SEARCH_MATCHES: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn search_matches<'a>(names: impl Iterator<Item = &'a str>, query: &str) -> Vec<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = names
        .filter_map(|name| fuzzy_match_score(&matcher, name, query).map(|score| (score, name)))
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored
        .into_iter()
        .take(MAX_SEARCH_MATCHES)
        .map(|(_, name)| name)
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::SidePanel::left("drawer")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_drawer(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if self.is_loading() {
                    show_loader(ui, "Loading services...");
                } else {
                    self.graph.show(ui);
                }
            });
    }

    fn draw_drawer(&mut self, ui: &mut Ui) {
        ui.heading("Contract graph");
        ui.add_space(6.0);

        let mut chosen = None;
        let selected_text = self
            .selected_environment
            .clone()
            .unwrap_or_else(|| "No environment".to_owned());
        egui::ComboBox::from_id_salt(ENVIRONMENT_SELECT_ID)
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                for environment in &self.environments {
                    let current = self.selected_environment.as_ref() == Some(environment);
                    if ui.selectable_label(current, environment.as_str()).clicked() && !current {
                        chosen = Some(environment.clone());
                    }
                }
            });
        if let Some(environment) = chosen {
            self.select_environment(environment);
        }

        if ui
            .checkbox(&mut self.show_all, "Show services without links")
            .changed()
            && !self.is_loading()
        {
            self.redraw();
        }

        ui.separator();
        self.draw_search(ui);

        ui.separator();
        self.draw_status(ui);
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Find service").strong());
        ui.add_enabled(
            !self.graph.is_empty(),
            egui::TextEdit::singleline(&mut self.search).hint_text("name"),
        );

        let names = self
            .graph
            .network()
            .nodes
            .iter()
            .map(|node| node.name.as_str());
        let matches = search_matches(names, &self.search)
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        if matches.is_empty() {
            if !self.search.trim().is_empty() {
                ui.weak("No matching service");
            }
            return;
        }

        let now = ui.input(|input| input.time);
        for name in matches {
            let highlighted = self
                .highlighted
                .as_ref()
                .is_some_and(|highlighted| highlighted.root == name);
            if ui.selectable_label(highlighted, name.as_str()).clicked() {
                self.graph.highlight_service(&name, now);
            }
        }
    }

    fn draw_status(&self, ui: &mut Ui) {
        let network = self.graph.network();
        ui.label(format!("services: {}", network.nodes.len()));
        ui.label(format!("links: {}", network.links.len()));

        match &self.highlighted {
            Some(highlighted) => {
                ui.label(format!(
                    "highlighted: {} ({} shown)",
                    highlighted.root, highlighted.visible
                ));
                ui.weak("Arrow right/left widens or narrows the range");
            }
            None => {
                ui.weak("Click a service to highlight its dependencies");
            }
        }

        if let Some(service) = &self.details_service {
            ui.label(format!("details: {service}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 4] = ["billing-api", "user-service", "billing-worker", "gateway"];

    #[test]
    fn empty_query_matches_nothing() {
        assert!(search_matches(NAMES.into_iter(), "  ").is_empty());
    }

    #[test]
    fn fuzzy_query_finds_all_candidates() {
        let matches = search_matches(NAMES.into_iter(), "bill");
        assert_eq!(matches.len(), 2);
        assert!(matches.contains(&"billing-api"));
        assert!(matches.contains(&"billing-worker"));
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(search_matches(NAMES.into_iter(), "GATE"), vec!["gateway"]);
    }

    #[test]
    fn results_are_capped() {
        let names = (0..40).map(|index| format!("svc-{index}")).collect::<Vec<_>>();
        let matches = search_matches(names.iter().map(String::as_str), "svc");
        assert_eq!(matches.len(), MAX_SEARCH_MATCHES);
    }
}
