mod background;
mod levels;

use crate::network::{DependencyNode, NodeId};

pub(in crate::app) use self::background::{
    BACKGROUND_OPACITY, BACKGROUND_ROUNDING, DetailsButton, HighlightBackground,
    find_group_background_dimension,
};
pub(in crate::app) use self::levels::clear_levels;
use self::levels::set_dependency_level_on_each_node;

/// Which hops around the clicked node are currently emphasised.
///
/// Levels live on the nodes themselves; this only tracks the reveal range.
/// `current_level` starts at 1, so the root and its direct neighbours show
/// first, and moves within `1..=max_level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct HighlightState {
    root: NodeId,
    current_level: u32,
    max_level: u32,
}

impl HighlightState {
    /// Runs the level pass from `root`. An isolated root is a no-op: the
    /// levels that were on the nodes before are put back and `None` returned.
    pub(in crate::app) fn start(root: NodeId, nodes: &mut [DependencyNode]) -> Option<Self> {
        let previous = nodes.iter().map(|node| node.level).collect::<Vec<_>>();
        let visited = set_dependency_level_on_each_node(root, nodes);
        if visited.len() <= 1 {
            for (node, level) in nodes.iter_mut().zip(previous) {
                node.level = level;
            }
            return None;
        }

        let deepest = visited
            .iter()
            .map(|&index| nodes[index].level)
            .max()
            .unwrap_or(1);

        Some(Self {
            root,
            current_level: 1,
            max_level: deepest - 1,
        })
    }

    pub(in crate::app) fn root(&self) -> NodeId {
        self.root
    }

    pub(in crate::app) fn current_level(&self) -> u32 {
        self.current_level
    }

    pub(in crate::app) fn max_level(&self) -> u32 {
        self.max_level
    }

    pub(in crate::app) fn expand(&mut self) -> bool {
        if self.current_level >= self.max_level {
            return false;
        }
        self.current_level += 1;
        true
    }

    pub(in crate::app) fn contract(&mut self) -> bool {
        if self.current_level <= 1 {
            return false;
        }
        self.current_level -= 1;
        true
    }

    pub(in crate::app) fn is_visible(&self, level: u32) -> bool {
        level > 0 && level - 1 <= self.current_level
    }

    pub(in crate::app) fn visible_nodes<'a>(
        &'a self,
        nodes: &'a [DependencyNode],
    ) -> impl Iterator<Item = NodeId> + 'a {
        nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| self.is_visible(node.level))
            .map(|(index, _)| index)
    }
}
