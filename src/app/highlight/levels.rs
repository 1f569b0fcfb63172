use std::collections::VecDeque;

use crate::network::{DependencyNode, NodeId};

/// Breadth-first walk over `links` from `root`. Every node gets its hop
/// distance plus one as `level`, unreachable nodes get 0. Returns the visited
/// nodes in visiting order, `root` first.
pub(in crate::app) fn set_dependency_level_on_each_node(
    root: NodeId,
    nodes: &mut [DependencyNode],
) -> Vec<NodeId> {
    for node in nodes.iter_mut() {
        node.level = 0;
    }

    let Some(node) = nodes.get_mut(root) else {
        return Vec::new();
    };
    node.level = 1;

    let mut visited = vec![root];
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        let next_level = nodes[current].level + 1;
        for index in 0..nodes[current].links.len() {
            let neighbour = nodes[current].links[index];
            let Some(next) = nodes.get_mut(neighbour) else {
                continue;
            };
            if next.level != 0 {
                continue;
            }

            next.level = next_level;
            visited.push(neighbour);
            queue.push_back(neighbour);
        }
    }

    visited
}

pub(in crate::app) fn clear_levels(nodes: &mut [DependencyNode]) {
    for node in nodes {
        node.level = 0;
    }
}
