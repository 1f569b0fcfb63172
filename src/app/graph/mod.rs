mod interaction;
mod view;

use std::sync::mpsc::Sender;

use eframe::egui::{Pos2, Rect, Vec2};
use tracing::{debug, info, trace};

use crate::network::{Network, NodeId, Role};

use super::details::{DetailsView, initialize_details_view};
use super::highlight::{
    HighlightBackground, HighlightState, clear_levels, find_group_background_dimension,
};
use super::physics::{Body, Simulation};
use super::render_utils::label_size;
use super::routing::{LinkPath, route_link};
use super::viewport::Viewport;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) enum GraphEvent {
    HighlightChanged { root: String, visible: Vec<String> },
    HighlightReset,
    DetailsOpened { service: String },
    DetailsClosed,
}

pub(in crate::app) trait GraphObserver {
    fn on_event(&mut self, event: &GraphEvent);
}

impl GraphObserver for Sender<GraphEvent> {
    fn on_event(&mut self, event: &GraphEvent) {
        if self.send(event.clone()).is_err() {
            trace!("graph event receiver is gone");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum GraphKey {
    ZoomIn,
    ZoomOut,
    Expand,
    Contract,
    Close,
}

#[derive(Clone, Copy, Debug, Default)]
struct Subscriptions {
    highlight: bool,
    reset_highlight: bool,
    zoom_on_arrow_key: bool,
    open_details: bool,
    close_details: bool,
    tooltip: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct NodeLabel {
    pub text_size: Option<Vec2>,
    pub rect: Rect,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct Tooltip {
    pub name: String,
    pub version: String,
    pub role: Role,
}

pub(in crate::app) struct GraphView {
    network: Network,
    simulation: Simulation,
    viewport: Viewport,
    highlight: Option<HighlightState>,
    background: HighlightBackground,
    focus_region: Option<Rect>,
    details: DetailsView,
    labels: Vec<NodeLabel>,
    routes: Vec<LinkPath>,
    dragging: Option<NodeId>,
    subscriptions: Subscriptions,
    observers: Vec<Box<dyn GraphObserver>>,
}

impl GraphView {
    pub(in crate::app) fn new(size: Vec2) -> Self {
        let mut view = Self {
            network: Network::default(),
            simulation: Simulation::new(0, &[], size),
            viewport: Viewport::new(size),
            highlight: None,
            background: HighlightBackground::default(),
            focus_region: None,
            details: DetailsView::default(),
            labels: Vec::new(),
            routes: Vec::new(),
            dragging: None,
            subscriptions: Subscriptions::default(),
            observers: Vec::new(),
        };
        view.draw(Network::default(), size);
        view
    }

    pub(in crate::app) fn draw(&mut self, mut network: Network, size: Vec2) {
        clear_levels(&mut network.nodes);
        let pairs = network
            .links
            .iter()
            .map(|link| (link.source, link.target))
            .collect::<Vec<_>>();

        self.simulation = Simulation::new(network.nodes.len(), &pairs, size);
        self.viewport = Viewport::new(size);
        self.highlight = None;
        self.background = HighlightBackground::default();
        self.focus_region = None;
        self.details = DetailsView::default();
        self.labels = vec![
            NodeLabel {
                text_size: None,
                rect: Rect::NOTHING,
            };
            network.nodes.len()
        ];
        self.routes.clear();
        self.dragging = None;
        self.subscriptions = Subscriptions::default();
        self.network = network;

        place_labels(self.simulation.bodies(), &self.network, &mut self.labels);
        route_links(&self.network, &self.labels, &mut self.routes);
        debug!(
            nodes = self.network.nodes.len(),
            links = self.network.links.len(),
            "graph drawn"
        );
    }

    pub(in crate::app) fn subscribe_to_highlight(&mut self) {
        self.subscriptions.highlight = true;
    }

    pub(in crate::app) fn subscribe_to_reset_highlight(&mut self) {
        self.subscriptions.reset_highlight = true;
    }

    pub(in crate::app) fn subscribe_to_zoom_on_arrow_key(&mut self) {
        self.subscriptions.zoom_on_arrow_key = true;
    }

    pub(in crate::app) fn subscribe_to_open_details(&mut self) {
        self.subscriptions.open_details = true;
    }

    pub(in crate::app) fn subscribe_to_close_details(&mut self) {
        self.subscriptions.close_details = true;
    }

    pub(in crate::app) fn subscribe_to_show_tooltip_on_node_hover(&mut self) {
        self.subscriptions.tooltip = true;
    }

    pub(in crate::app) fn add_observer(&mut self, observer: Box<dyn GraphObserver>) {
        self.observers.push(observer);
    }

    pub(in crate::app) fn network(&self) -> &Network {
        &self.network
    }

    pub(in crate::app) fn is_empty(&self) -> bool {
        self.network.is_empty()
    }

    pub(in crate::app) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(in crate::app) fn highlight(&self) -> Option<HighlightState> {
        self.highlight
    }

    pub(in crate::app) fn labels(&self) -> &[NodeLabel] {
        &self.labels
    }

    pub(in crate::app) fn routes(&self) -> &[LinkPath] {
        &self.routes
    }

    pub(in crate::app) fn details(&self) -> &DetailsView {
        &self.details
    }

    pub(in crate::app) fn resize(&mut self, size: Vec2) {
        if self.viewport.size() != size {
            self.viewport.set_size(size);
            self.details.viewport_mut().set_size(size);
            self.simulation.set_center(size);
        }
    }

    pub(in crate::app) fn step(&mut self, now: f64) -> bool {
        let network = &self.network;
        let labels = &mut self.labels;
        let routes = &mut self.routes;
        let ticked = self.simulation.advance(|bodies| {
            place_labels(bodies, network, labels);
            route_links(network, labels, routes);
        });

        let camera = self.viewport.update(now);
        let background = self.background.update(now);
        let details = self.details.update(now);
        ticked || camera || background || details
    }

    pub(in crate::app) fn measure_labels(&mut self, mut measure: impl FnMut(&str) -> Vec2) -> bool {
        let mut changed = false;
        for (label, node) in self.labels.iter_mut().zip(&self.network.nodes) {
            if label.text_size.is_none() {
                label.text_size = Some(measure(&node.name));
                changed = true;
            }
        }

        if changed {
            place_labels(self.simulation.bodies(), &self.network, &mut self.labels);
            route_links(&self.network, &self.labels, &mut self.routes);
        }
        changed
    }

    pub(in crate::app) fn node_at(&self, world: Pos2) -> Option<NodeId> {
        self.labels
            .iter()
            .rposition(|label| label.rect.contains(world))
    }

    pub(in crate::app) fn click_node(&mut self, id: NodeId, now: f64) -> bool {
        if !self.subscriptions.highlight || id >= self.network.nodes.len() {
            return false;
        }

        let Some(state) = HighlightState::start(id, &mut self.network.nodes) else {
            debug!(service = %self.network.nodes[id].name, "nothing connected to highlight");
            return false;
        };

        self.highlight = Some(state);
        self.zoom_to_highlighted(now);
        info!(
            service = %self.network.nodes[id].name,
            depth = state.max_level(),
            "highlighted"
        );
        self.emit_highlight();
        true
    }

    pub(in crate::app) fn highlight_service(&mut self, name: &str, now: f64) -> bool {
        self.network
            .node_by_name(name)
            .is_some_and(|id| self.click_node(id, now))
    }

    pub(in crate::app) fn click_background(&mut self, now: f64) -> bool {
        if !self.clear_highlight(now) {
            return false;
        }
        if let Some(region) = self.focus_region.take() {
            self.viewport.center_on(region, Some(1.0), now);
        }
        true
    }

    pub(in crate::app) fn double_click_background(&mut self, now: f64) {
        self.clear_highlight(now);
        self.focus_region = None;
        self.viewport.reset(now);
    }

    pub(in crate::app) fn key(&mut self, key: GraphKey, now: f64) -> bool {
        match key {
            GraphKey::ZoomIn | GraphKey::ZoomOut => {
                self.subscriptions.zoom_on_arrow_key
                    && self.viewport.zoom_by_key(key == GraphKey::ZoomIn, now)
            }
            GraphKey::Expand | GraphKey::Contract => {
                if !self.subscriptions.highlight {
                    return false;
                }
                let Some(state) = self.highlight.as_mut() else {
                    return false;
                };

                let changed = if key == GraphKey::Expand {
                    state.expand()
                } else {
                    state.contract()
                };
                if changed {
                    debug!(level = state.current_level(), "highlight range changed");
                    self.zoom_to_highlighted(now);
                    self.emit_highlight();
                }
                changed
            }
            GraphKey::Close => self.close_details(now),
        }
    }

    pub(in crate::app) fn begin_drag(&mut self, id: NodeId) -> bool {
        if self.highlight.is_some() || self.details.is_shown() || id >= self.network.nodes.len() {
            return false;
        }
        self.simulation.drag_start(id);
        self.dragging = Some(id);
        true
    }

    pub(in crate::app) fn drag_to(&mut self, world: Pos2) {
        if let Some(id) = self.dragging {
            self.simulation.drag_to(id, world);
        }
    }

    pub(in crate::app) fn end_drag(&mut self) {
        if let Some(id) = self.dragging.take() {
            self.simulation.drag_end(id);
        }
    }

    pub(in crate::app) fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    pub(in crate::app) fn tooltip(&self, id: NodeId) -> Option<Tooltip> {
        if !self.subscriptions.tooltip || self.dragging.is_some() || self.details.is_shown() {
            return None;
        }
        let node = self.network.nodes.get(id)?;
        Some(Tooltip {
            name: node.name.clone(),
            version: node.version.clone(),
            role: node.role(),
        })
    }

    pub(in crate::app) fn open_details(&mut self, now: f64) -> bool {
        if !self.subscriptions.open_details || self.details.is_open() {
            return false;
        }
        let Some(root) = self.highlight.map(|state| state.root()) else {
            return false;
        };

        let name = self.network.nodes[root].name.clone();
        let layout = self.network.details_index(&name).and_then(|index| {
            initialize_details_view(
                &self.network.details_nodes,
                index,
                self.labels[root].text_size,
            )
        });
        let Some(layout) = layout else {
            return false;
        };

        self.details.open(layout, self.viewport.size(), now);
        info!(service = %name, "details opened");
        self.emit(GraphEvent::DetailsOpened { service: name });
        true
    }

    pub(in crate::app) fn close_details(&mut self, now: f64) -> bool {
        if !self.subscriptions.close_details || !self.details.close(now) {
            return false;
        }
        info!("details closed");
        self.emit(GraphEvent::DetailsClosed);
        true
    }

    fn clear_highlight(&mut self, now: f64) -> bool {
        if !self.subscriptions.reset_highlight || self.highlight.take().is_none() {
            return false;
        }
        clear_levels(&mut self.network.nodes);
        self.background.hide(now);
        info!("highlight reset");
        self.emit(GraphEvent::HighlightReset);
        true
    }

    fn zoom_to_highlighted(&mut self, now: f64) {
        let Some(state) = self.highlight else {
            return;
        };

        let viewport = &self.viewport;
        let group = find_group_background_dimension(
            state
                .visible_nodes(&self.network.nodes)
                .map(|id| self.labels[id].rect),
            |region| viewport.focus_scale(region),
        );
        let Some(group) = group else {
            return;
        };

        self.viewport.center_on(group.rect, None, now);
        self.background.show(group, now);
        self.focus_region = Some(group.rect);
    }

    fn emit_highlight(&mut self) {
        let Some(state) = self.highlight else {
            return;
        };
        let nodes = &self.network.nodes;
        let event = GraphEvent::HighlightChanged {
            root: nodes[state.root()].name.clone(),
            visible: state
                .visible_nodes(nodes)
                .map(|id| nodes[id].name.clone())
                .collect(),
        };
        self.emit(event);
    }

    fn emit(&mut self, event: GraphEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

fn place_labels(bodies: &[Body], network: &Network, labels: &mut [NodeLabel]) {
    for ((label, body), node) in labels.iter_mut().zip(bodies).zip(&network.nodes) {
        let size = label_size(label.text_size, node.role());
        label.rect = Rect::from_center_size(body.position.to_pos2(), size);
    }
}

fn route_links(network: &Network, labels: &[NodeLabel], routes: &mut Vec<LinkPath>) {
    routes.clear();
    routes.extend(network.links.iter().filter_map(|link| {
        let source = labels.get(link.source)?.rect;
        let target = labels.get(link.target)?.rect;
        Some(route_link(
            source.center(),
            source.width(),
            target.center(),
            target.width(),
        ))
    }));
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use approx::assert_abs_diff_eq;
    use eframe::egui::{self, Event, Modifiers, PointerButton, RawInput, pos2, vec2};

    use super::super::render_utils::{screen_to_world, world_to_screen};
    use super::super::viewport::ViewTransform;
    use super::*;
    use crate::network::{DependencyLink, DependencyNode, TreeNode};

    const SIZE: Vec2 = vec2(1200.0, 800.0);

    fn node(name: &str, is_provider: bool, is_consumer: bool, links: &[NodeId]) -> DependencyNode {
        DependencyNode {
            name: name.to_owned(),
            version: "1.0.0".to_owned(),
            is_provider,
            is_consumer,
            links: links.to_vec(),
            level: 0,
        }
    }

    fn link(source: NodeId, target: NodeId) -> DependencyLink {
        DependencyLink {
            source,
            target,
            kind: "rest".to_owned(),
        }
    }

    // service-2 -> service-1, service-3 -> service-2, service-4 alone
    fn network() -> Network {
        Network {
            nodes: vec![
                node("service-1", true, false, &[1]),
                node("service-2", true, true, &[0, 2]),
                node("service-3", false, true, &[1]),
                node("service-4", true, false, &[]),
            ],
            links: vec![link(1, 0), link(2, 1)],
            details_nodes: vec![
                TreeNode {
                    name: "service-1".to_owned(),
                    consumers: vec![1],
                    providers: vec![],
                },
                TreeNode {
                    name: "service-2".to_owned(),
                    consumers: vec![2],
                    providers: vec![0],
                },
                TreeNode {
                    name: "service-3".to_owned(),
                    consumers: vec![],
                    providers: vec![1],
                },
                TreeNode {
                    name: "service-4".to_owned(),
                    consumers: vec![],
                    providers: vec![],
                },
            ],
        }
    }

    fn subscribed() -> (GraphView, Receiver<GraphEvent>) {
        let mut view = GraphView::new(SIZE);
        view.draw(network(), SIZE);
        view.subscribe_to_highlight();
        view.subscribe_to_reset_highlight();
        view.subscribe_to_zoom_on_arrow_key();
        view.subscribe_to_open_details();
        view.subscribe_to_close_details();
        view.subscribe_to_show_tooltip_on_node_hover();

        let (sender, receiver) = mpsc::channel();
        view.add_observer(Box::new(sender));
        (view, receiver)
    }

    fn levels(view: &GraphView) -> Vec<u32> {
        view.network().nodes.iter().map(|node| node.level).collect()
    }

    fn settle(view: &mut GraphView, now: f64) {
        let mut frames = 0;
        while view.step(now) {
            frames += 1;
            assert!(frames < 1000);
        }
    }

    fn canvas() -> Rect {
        Rect::from_min_size(Pos2::ZERO, SIZE)
    }

    fn run_frame(ctx: &egui::Context, view: &mut GraphView, time: f64, events: Vec<Event>) {
        let input = RawInput {
            screen_rect: Some(canvas()),
            time: Some(time),
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| view.show(ui));
        });
    }

    fn double_click_at(ctx: &egui::Context, view: &mut GraphView, start: f64, pos: Pos2) {
        for (index, pressed) in [true, false, true, false].into_iter().enumerate() {
            let events = vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    modifiers: Modifiers::NONE,
                },
            ];
            run_frame(ctx, view, start + (index + 1) as f64 / 60.0, events);
        }
    }

    // Highlights service-1 through a measured, settled frame.
    fn highlighted_on_screen() -> (egui::Context, GraphView, Receiver<GraphEvent>) {
        let ctx = egui::Context::default();
        let (mut view, events) = subscribed();
        run_frame(&ctx, &mut view, 0.0, Vec::new());
        view.click_node(0, 0.0);
        settle(&mut view, 5.0);
        run_frame(&ctx, &mut view, 5.0, Vec::new());
        while events.try_recv().is_ok() {}
        (ctx, view, events)
    }

    #[test]
    fn double_click_on_a_node_keeps_its_highlight() {
        let (ctx, mut view, events) = highlighted_on_screen();
        let node = world_to_screen(
            canvas(),
            view.viewport().transform(),
            view.labels()[0].rect.center(),
        );

        double_click_at(&ctx, &mut view, 5.0, node);

        assert_eq!(view.highlight().map(|state| state.root()), Some(0));
        assert!(events.try_iter().all(|event| event != GraphEvent::HighlightReset));
    }

    #[test]
    fn double_click_on_empty_canvas_resets_the_view() {
        let (ctx, mut view, events) = highlighted_on_screen();
        let transform = view.viewport().transform();
        let empty = [
            pos2(4.0, 4.0),
            pos2(1196.0, 4.0),
            pos2(4.0, 796.0),
            pos2(1196.0, 796.0),
        ]
        .into_iter()
        .find(|&pos| {
            let world = screen_to_world(canvas(), transform, pos);
            view.node_at(world).is_none() && !view.background.button_contains(world)
        })
        .unwrap();

        double_click_at(&ctx, &mut view, 5.0, empty);
        settle(&mut view, 10.0);

        assert!(view.highlight().is_none());
        assert_eq!(view.viewport().transform(), ViewTransform::IDENTITY);
        assert!(events.try_iter().any(|event| event == GraphEvent::HighlightReset));
    }

    #[test]
    fn second_click_on_a_node_is_not_a_reset() {
        let (mut view, events) = subscribed();
        view.click_node(1, 0.0);
        events.try_recv().unwrap();

        let node = view.labels()[1].rect.center();
        view.handle_double_click(node, 0.1);
        assert_eq!(view.highlight().map(|state| state.root()), Some(1));
        assert!(events.try_recv().is_err());

        view.handle_double_click(Pos2::new(-10_000.0, -10_000.0), 0.2);
        assert!(view.highlight().is_none());
        assert_eq!(events.try_recv().unwrap(), GraphEvent::HighlightReset);
    }

    #[test]
    fn resizing_recentres_the_layout() {
        let (mut view, _events) = subscribed();
        settle(&mut view, 0.0);

        view.resize(vec2(1600.0, 1000.0));
        settle(&mut view, 0.0);

        let labels = view.labels();
        let mean_x = labels.iter().map(|label| label.rect.center().x).sum::<f32>()
            / labels.len() as f32;
        assert_abs_diff_eq!(mean_x, 800.0, epsilon = 1.0);
        assert_eq!(view.viewport().size(), vec2(1600.0, 1000.0));
    }

    #[test]
    fn clicking_a_node_highlights_its_neighbourhood() {
        let (mut view, events) = subscribed();

        assert!(view.click_node(0, 0.0));

        assert_eq!(levels(&view), vec![1, 2, 3, 0]);
        assert!(view.viewport().is_animating());
        assert_eq!(
            events.try_recv().unwrap(),
            GraphEvent::HighlightChanged {
                root: "service-1".to_owned(),
                visible: vec!["service-1".to_owned(), "service-2".to_owned()],
            }
        );
    }

    #[test]
    fn clicking_an_isolated_node_does_nothing() {
        let (mut view, events) = subscribed();

        assert!(!view.click_node(3, 0.0));

        assert_eq!(levels(&view), vec![0, 0, 0, 0]);
        assert!(view.highlight().is_none());
        assert!(!view.viewport().is_animating());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn interactions_need_a_subscription() {
        let mut view = GraphView::new(SIZE);
        view.draw(network(), SIZE);

        assert!(!view.click_node(0, 0.0));
        assert!(!view.key(GraphKey::ZoomIn, 0.0));
        assert!(view.tooltip(0).is_none());

        view.subscribe_to_highlight();
        assert!(view.click_node(0, 0.0));
        assert!(!view.click_background(0.0));
        assert!(view.highlight().is_some());
    }

    #[test]
    fn drawing_again_starts_from_scratch() {
        let (mut view, _events) = subscribed();
        view.click_node(0, 0.0);

        view.draw(network(), SIZE);

        assert!(view.highlight().is_none());
        assert_eq!(levels(&view), vec![0, 0, 0, 0]);
        assert_eq!(view.labels().len(), 4);
        assert_eq!(view.routes().len(), 2);
        assert!(!view.click_node(0, 0.0));
    }

    #[test]
    fn arrow_keys_walk_the_highlight_range() {
        let (mut view, events) = subscribed();
        view.click_node(0, 0.0);
        events.try_recv().unwrap();

        assert!(!view.key(GraphKey::Contract, 0.1));
        assert!(view.key(GraphKey::Expand, 0.1));
        match events.try_recv().unwrap() {
            GraphEvent::HighlightChanged { visible, .. } => assert_eq!(visible.len(), 3),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!view.key(GraphKey::Expand, 0.2));
        assert!(view.key(GraphKey::Contract, 0.3));
        assert!(events.try_recv().is_ok());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn arrow_zoom_moves_the_camera() {
        let (mut view, _events) = subscribed();

        assert!(view.key(GraphKey::ZoomIn, 0.0));
        settle(&mut view, 5.0);
        assert_abs_diff_eq!(view.viewport().scale(), 1.25, epsilon = 1e-5);
        assert!(view.key(GraphKey::ZoomOut, 5.0));
    }

    #[test]
    fn background_click_clears_and_recentres_at_scale_one() {
        let (mut view, events) = subscribed();
        view.click_node(1, 0.0);
        settle(&mut view, 2.0);
        let region = view.focus_region.unwrap();
        events.try_recv().unwrap();

        assert!(view.click_background(2.0));
        assert_eq!(events.try_recv().unwrap(), GraphEvent::HighlightReset);
        assert_eq!(levels(&view), vec![0, 0, 0, 0]);
        settle(&mut view, 4.0);

        assert_eq!(view.viewport().scale(), 1.0);
        let center = view.viewport().transform().apply(region.center());
        assert_abs_diff_eq!(center.x, SIZE.x / 2.0, epsilon = 1e-2);
        assert_abs_diff_eq!(center.y, SIZE.y / 2.0, epsilon = 1e-2);
        assert!(!view.click_background(4.0));
    }

    #[test]
    fn double_click_resets_to_identity() {
        let (mut view, events) = subscribed();
        view.click_node(0, 0.0);
        events.try_recv().unwrap();

        view.double_click_background(0.5);
        settle(&mut view, 3.0);

        assert!(view.highlight().is_none());
        assert_eq!(view.viewport().transform(), ViewTransform::IDENTITY);
        assert_eq!(events.try_recv().unwrap(), GraphEvent::HighlightReset);
    }

    #[test]
    fn dragging_is_refused_while_highlighted() {
        let (mut view, _events) = subscribed();
        view.click_node(0, 0.0);
        assert!(!view.begin_drag(2));

        view.click_background(0.1);
        assert!(view.begin_drag(2));
        assert!(view.tooltip(2).is_none());

        view.drag_to(Pos2::new(50.0, 70.0));
        view.step(0.2);
        let center = view.labels()[2].rect.center();
        assert_abs_diff_eq!(center.x, 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(center.y, 70.0, epsilon = 1e-3);

        view.end_drag();
        assert!(!view.is_dragging());
        assert!(view.tooltip(2).is_some());
    }

    #[test]
    fn details_open_for_the_highlighted_service() {
        let (mut view, events) = subscribed();
        assert!(!view.open_details(0.0));

        view.click_node(1, 0.0);
        events.try_recv().unwrap();
        assert!(view.open_details(0.5));
        assert_eq!(
            events.try_recv().unwrap(),
            GraphEvent::DetailsOpened {
                service: "service-2".to_owned()
            }
        );

        let layout = view.details().layout().unwrap();
        assert!(layout.consumers.is_some());
        assert!(layout.providers.is_some());

        assert!(view.key(GraphKey::Close, 1.0));
        assert_eq!(events.try_recv().unwrap(), GraphEvent::DetailsClosed);
        settle(&mut view, 2.0);
        assert!(view.details().layout().is_none());
    }

    #[test]
    fn steps_keep_links_attached_to_labels() {
        let (mut view, _events) = subscribed();
        view.measure_labels(|name| vec2(name.len() as f32 * 8.0, 18.0));
        for frame in 0..20 {
            view.step(frame as f64 / 60.0);
        }

        let labels = view.labels();
        let route = view.routes()[0];
        let source = labels[1].rect;
        let target = labels[0].rect;
        assert!(route.start.distance(source.center()) <= source.width() / 2.0 + 15.0 + 50.0 + 5.0);
        assert!(route.end.distance(target.center()) <= target.width() / 2.0 + 15.0 + 50.0 + 5.0);
        assert_abs_diff_eq!(labels[0].rect.width(), 72.0 + 45.0);
    }

    #[test]
    fn labels_can_be_found_by_position() {
        let (mut view, _events) = subscribed();
        view.begin_drag(2);
        view.drag_to(Pos2::new(5_000.0, 5_000.0));
        view.step(0.0);

        assert_eq!(view.node_at(Pos2::new(5_010.0, 4_995.0)), Some(2));
        assert!(view.node_at(Pos2::new(-10_000.0, -10_000.0)).is_none());
    }

    #[test]
    fn search_highlights_by_name() {
        let (mut view, _events) = subscribed();

        assert!(view.highlight_service("service-3", 0.0));
        assert_eq!(view.highlight().map(|state| state.root()), Some(2));
        assert!(!view.highlight_service("missing", 0.0));
    }
}
