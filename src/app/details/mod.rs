mod tidy;
mod tree;

use eframe::egui::{Pos2, Rect, Vec2, vec2};
use tracing::debug;

use crate::network::{Role, TreeNode};

use self::tidy::{NODE_BREADTH, TidyNode, layout_tree};
use self::tree::{TreeDirection, TreeStructure, map_node_to_tree_structure};
use super::render_utils::label_size;
use super::viewport::{FAST_TRANSITION_SECS, ViewTransform, Viewport};

const ROOT_OFFSET_DIVISOR: f32 = 7.0;
const EXIT_BUTTON_CENTER: Pos2 = Pos2::new(17.0, 17.0);
pub(in crate::app) const EXIT_BUTTON_RADIUS: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct DiagramNode {
    pub name: String,
    pub parent: Option<usize>,
    pub position: Pos2,
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct Diagram {
    pub nodes: Vec<DiagramNode>,
}

impl Diagram {
    fn place(tree: &TreeStructure, origin: Pos2, mirrored: bool) -> Option<Self> {
        if tree.children.is_empty() {
            return None;
        }

        let sign = if mirrored { -1.0 } else { 1.0 };
        let nodes = layout_tree(tree)
            .into_iter()
            .map(|TidyNode { name, parent, breadth, depth }| DiagramNode {
                name,
                parent,
                position: origin + vec2(depth, breadth) * sign,
            })
            .collect();
        Some(Self { nodes })
    }

    pub(in crate::app) fn links(&self) -> impl Iterator<Item = [Pos2; 4]> + '_ {
        self.nodes.iter().filter_map(|node| {
            let parent = self.nodes.get(node.parent?)?.position;
            let child = node.position;
            let middle = (parent.x + child.x) / 2.0;
            Some([
                parent,
                Pos2::new(middle, parent.y),
                Pos2::new(middle, child.y),
                child,
            ])
        })
    }

    pub(in crate::app) fn labelled_nodes(&self) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter().filter(|node| node.parent.is_some())
    }

    fn bounds(&self) -> Rect {
        self.nodes
            .iter()
            .fold(Rect::NOTHING, |bounds, node| bounds.union(Rect::from_pos(node.position)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct DetailsLayout {
    pub root_name: String,
    pub root_role: Role,
    pub root_label: Rect,
    pub consumers: Option<Diagram>,
    pub providers: Option<Diagram>,
}

impl DetailsLayout {
    pub(in crate::app) fn root_position(&self) -> Pos2 {
        self.root_label.center()
    }

    pub(in crate::app) fn bounds(&self) -> Rect {
        [&self.consumers, &self.providers]
            .into_iter()
            .flatten()
            .fold(self.root_label, |bounds, diagram| bounds.union(diagram.bounds()))
    }
}

pub(in crate::app) fn initialize_details_view(
    details_nodes: &[TreeNode],
    root: usize,
    root_text_size: Option<Vec2>,
) -> Option<DetailsLayout> {
    let root_node = details_nodes.get(root)?;
    let consumers = map_node_to_tree_structure(details_nodes, root, TreeDirection::Consumers);
    let providers = map_node_to_tree_structure(details_nodes, root, TreeDirection::Providers);

    let consumer_rows = layout_tree(&consumers);
    let provider_rows = layout_tree(&providers);
    let root_y = root_y_offset(&consumer_rows).max(root_y_offset(&provider_rows));

    // A service with providers consumes, one with consumers provides.
    let root_role = Role::from_flags(!consumers.children.is_empty(), !providers.children.is_empty());
    let root_size = label_size(root_text_size, root_role);
    let root_center = Pos2::new(0.0, root_y);
    let side_offset = root_size.x / ROOT_OFFSET_DIVISOR;

    let layout = DetailsLayout {
        root_name: root_node.name.clone(),
        root_role,
        root_label: Rect::from_center_size(root_center, root_size),
        consumers: Diagram::place(&consumers, root_center - vec2(side_offset, 0.0), true),
        providers: Diagram::place(&providers, root_center + vec2(side_offset, 0.0), false),
    };

    debug!(
        service = %layout.root_name,
        consumers = consumers.len() - 1,
        providers = providers.len() - 1,
        width = layout.bounds().width(),
        "details laid out"
    );
    Some(layout)
}

fn root_y_offset(rows: &[TidyNode]) -> f32 {
    let highest = rows.iter().map(|node| node.breadth).fold(0.0, f32::min);
    NODE_BREADTH - highest
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Hidden,
    Opening { started: f64 },
    Open,
    Closing { started: f64 },
}

#[derive(Clone, Debug)]
pub(in crate::app) struct DetailsView {
    phase: Phase,
    layout: Option<DetailsLayout>,
    viewport: Viewport,
}

impl Default for DetailsView {
    fn default() -> Self {
        Self {
            phase: Phase::Hidden,
            layout: None,
            viewport: Viewport::new(Vec2::splat(1.0)),
        }
    }
}

impl DetailsView {
    pub(in crate::app) fn open(&mut self, layout: DetailsLayout, size: Vec2, now: f64) {
        self.viewport = Viewport::new(size);
        self.viewport.jump_to(ViewTransform {
            translate: size * 0.5 - layout.root_position().to_vec2(),
            scale: 1.0,
        });
        self.layout = Some(layout);
        self.phase = Phase::Opening { started: now };
    }

    pub(in crate::app) fn close(&mut self, now: f64) -> bool {
        match self.phase {
            Phase::Opening { .. } | Phase::Open => {
                self.phase = Phase::Closing { started: now };
                true
            }
            Phase::Hidden | Phase::Closing { .. } => false,
        }
    }

    pub(in crate::app) fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Opening { .. } | Phase::Open)
    }

    pub(in crate::app) fn is_shown(&self) -> bool {
        self.phase != Phase::Hidden
    }

    pub(in crate::app) fn layout(&self) -> Option<&DetailsLayout> {
        self.layout.as_ref()
    }

    pub(in crate::app) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(in crate::app) fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub(in crate::app) fn opacity(&self, now: f64) -> f32 {
        let progress = |started: f64| ((now - started) / FAST_TRANSITION_SECS).clamp(0.0, 1.0) as f32;
        match self.phase {
            Phase::Hidden => 0.0,
            Phase::Opening { started } => progress(started),
            Phase::Open => 1.0,
            Phase::Closing { started } => 1.0 - progress(started),
        }
    }

    pub(in crate::app) fn update(&mut self, now: f64) -> bool {
        let viewport_animating = self.viewport.update(now);
        match self.phase {
            Phase::Opening { started } if now - started >= FAST_TRANSITION_SECS => {
                self.phase = Phase::Open;
            }
            Phase::Closing { started } if now - started >= FAST_TRANSITION_SECS => {
                self.phase = Phase::Hidden;
                self.layout = None;
            }
            _ => {}
        }
        viewport_animating || matches!(self.phase, Phase::Opening { .. } | Phase::Closing { .. })
    }

    pub(in crate::app) fn exit_button_contains(&self, local: Pos2) -> bool {
        self.is_open() && local.distance(EXIT_BUTTON_CENTER) <= EXIT_BUTTON_RADIUS
    }

    pub(in crate::app) fn exit_button_center(&self) -> Pos2 {
        EXIT_BUTTON_CENTER
    }
}
