use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use eframe::egui::{self, Context, Vec2, vec2};
use tracing::{debug, error, info};

use crate::contracts::ServiceSource;
use crate::network::{Network, build_network};

use self::graph::{GraphEvent, GraphView};
use self::render_utils::LOADER_ID;

mod details;
mod graph;
mod highlight;
mod physics;
mod render_utils;
mod routing;
mod ui;
mod viewport;

const INITIAL_CANVAS: Vec2 = vec2(1200.0, 800.0);

pub struct ContractGraphApp {
    source: Arc<dyn ServiceSource>,
    preferred_environment: Option<String>,
    show_all: bool,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Vec<String>, String>>,
    },
    Ready(Box<ViewModel>),
}

struct ViewModel {
    source: Arc<dyn ServiceSource>,
    environments: Vec<String>,
    selected_environment: Option<String>,
    show_all: bool,
    search: String,
    network: Network,
    graph: GraphView,
    pending: Option<PendingLoad>,
    events: Receiver<GraphEvent>,
    highlighted: Option<Highlighted>,
    details_service: Option<String>,
}

struct PendingLoad {
    environment: String,
    rx: Receiver<Result<Network, String>>,
}

struct Highlighted {
    root: String,
    visible: usize,
}

impl ContractGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        source: Arc<dyn ServiceSource>,
        preferred_environment: Option<String>,
        show_all: bool,
    ) -> Self {
        info!(source = %source.describe(), "loading environments");
        let state = AppState::Loading {
            rx: spawn_environments(Arc::clone(&source)),
        };
        Self {
            source,
            preferred_environment,
            show_all,
            state,
        }
    }
}

fn spawn_environments(source: Arc<dyn ServiceSource>) -> Receiver<Result<Vec<String>, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = source
            .environments()
            .with_context(|| format!("failed to list environments from {}", source.describe()))
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(result);
    });

    rx
}

fn spawn_services(source: Arc<dyn ServiceSource>, environment: String) -> Receiver<Result<Network, String>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = source
            .services(&environment)
            .with_context(|| format!("failed to load services of environment {environment}"))
            .map(|services| build_network(&services))
            .map_err(|error| format!("{error:#}"));
        let _ = tx.send(result);
    });

    rx
}

impl ViewModel {
    fn new(
        source: Arc<dyn ServiceSource>,
        environments: Vec<String>,
        preferred_environment: Option<&str>,
        show_all: bool,
    ) -> Self {
        let (sender, events) = mpsc::channel::<GraphEvent>();
        let mut graph = GraphView::new(INITIAL_CANVAS);
        graph.add_observer(Box::new(sender));

        let mut model = Self {
            source,
            environments,
            selected_environment: None,
            show_all,
            search: String::new(),
            network: Network::default(),
            graph,
            pending: None,
            events,
            highlighted: None,
            details_service: None,
        };

        let initial = preferred_environment
            .filter(|preferred| model.environments.iter().any(|name| name == preferred))
            .map(str::to_owned)
            .or_else(|| model.environments.first().cloned());
        if let Some(environment) = initial {
            model.select_environment(environment);
        }
        model
    }

    fn select_environment(&mut self, environment: String) {
        if let Some(superseded) = self.pending.take() {
            debug!(environment = %superseded.environment, "dropping superseded load");
        }

        info!(environment = %environment, "loading services");
        self.pending = Some(PendingLoad {
            rx: spawn_services(Arc::clone(&self.source), environment.clone()),
            environment: environment.clone(),
        });
        self.selected_environment = Some(environment);
    }

    fn poll_load(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(Ok(network)) => {
                info!(
                    environment = %pending.environment,
                    services = network.nodes.len(),
                    links = network.links.len(),
                    "services loaded"
                );
                self.network = network;
                self.redraw();
            }
            Ok(Err(message)) => {
                error!(environment = %pending.environment, "{message}");
                self.network = Network::default();
                self.redraw();
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                error!(environment = %pending.environment, "background load worker disconnected");
                self.network = Network::default();
                self.redraw();
            }
        }
    }

    fn redraw(&mut self) {
        let shown = if self.show_all {
            self.network.clone()
        } else {
            self.network.connected_only()
        };
        let size = self.graph.viewport().size();
        self.graph.draw(shown, size);

        self.graph.subscribe_to_highlight();
        self.graph.subscribe_to_reset_highlight();
        self.graph.subscribe_to_zoom_on_arrow_key();
        self.graph.subscribe_to_open_details();
        self.graph.subscribe_to_close_details();
        self.graph.subscribe_to_show_tooltip_on_node_hover();

        self.highlighted = None;
        self.details_service = None;
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            debug!(?event, "graph event");
            match event {
                GraphEvent::HighlightChanged { root, visible } => {
                    self.highlighted = Some(Highlighted {
                        root,
                        visible: visible.len(),
                    });
                }
                GraphEvent::HighlightReset => self.highlighted = None,
                GraphEvent::DetailsOpened { service } => self.details_service = Some(service),
                GraphEvent::DetailsClosed => self.details_service = None,
            }
        }
    }

    fn is_loading(&self) -> bool {
        self.pending.is_some()
    }
}

fn show_loader(ui: &mut egui::Ui, text: &str) {
    ui.push_id(LOADER_ID, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(120.0);
            ui.heading(text);
            ui.add_space(8.0);
            ui.spinner();
        });
    });
}

impl eframe::App for ContractGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => {
                        let environments = result.unwrap_or_else(|message| {
                            error!("{message}");
                            Vec::new()
                        });
                        info!(count = environments.len(), "environments loaded");
                        transition = Some(environments);
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        error!("background load worker disconnected");
                        transition = Some(Vec::new());
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    show_loader(ui, "Loading environments...");
                });
            }
            AppState::Ready(model) => {
                model.poll_load();
                model.drain_events();
                model.show(ctx);
            }
        }

        if let Some(environments) = transition {
            self.state = AppState::Ready(Box::new(ViewModel::new(
                Arc::clone(&self.source),
                environments,
                self.preferred_environment.as_deref(),
                self.show_all,
            )));
        }
    }
}
