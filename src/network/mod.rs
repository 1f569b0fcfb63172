mod build;

pub use build::{build_network, filter_connected_nodes};

pub type NodeId = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Provider,
    Consumer,
    ProviderConsumer,
    Plain,
}

impl Role {
    pub fn from_flags(is_provider: bool, is_consumer: bool) -> Self {
        match (is_provider, is_consumer) {
            (true, true) => Self::ProviderConsumer,
            (true, false) => Self::Provider,
            (false, true) => Self::Consumer,
            (false, false) => Self::Plain,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Consumer => "consumer",
            Self::ProviderConsumer => "provider & consumer",
            Self::Plain => "no contracts",
        }
    }
}

/// One service drawn in the overview graph.
///
/// `links` holds every service this one is connected to by a contract, in
/// either direction, each at most once. `level` is written by the highlight
/// pass and is 0 when the node is not highlighted.
#[derive(Clone, Debug, PartialEq)]
pub struct DependencyNode {
    pub name: String,
    pub version: String,
    pub is_provider: bool,
    pub is_consumer: bool,
    pub links: Vec<NodeId>,
    pub level: u32,
}

impl DependencyNode {
    pub fn role(&self) -> Role {
        Role::from_flags(self.is_provider, self.is_consumer)
    }

    pub fn same_service(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyLink {
    pub source: NodeId,
    pub target: NodeId,
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub name: String,
    pub consumers: Vec<usize>,
    pub providers: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Network {
    pub nodes: Vec<DependencyNode>,
    pub links: Vec<DependencyLink>,
    pub details_nodes: Vec<TreeNode>,
}

impl Network {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.name == name)
    }

    pub fn details_index(&self, name: &str) -> Option<usize> {
        self.details_nodes.iter().position(|node| node.name == name)
    }

    pub fn connected_only(&self) -> Self {
        let kept = filter_connected_nodes(self);
        let mut remap = vec![None; self.nodes.len()];
        for (new_id, &old_id) in kept.iter().enumerate() {
            remap[old_id] = Some(new_id);
        }

        let nodes = kept
            .iter()
            .map(|&old_id| {
                let node = &self.nodes[old_id];
                DependencyNode {
                    links: node
                        .links
                        .iter()
                        .filter_map(|&neighbour| remap[neighbour])
                        .collect(),
                    ..node.clone()
                }
            })
            .collect();

        let links = self
            .links
            .iter()
            .filter_map(|link| {
                Some(DependencyLink {
                    source: remap[link.source]?,
                    target: remap[link.target]?,
                    kind: link.kind.clone(),
                })
            })
            .collect();

        Self {
            nodes,
            links,
            details_nodes: self.details_nodes.clone(),
        }
    }
}
