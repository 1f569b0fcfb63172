use crate::network::TreeNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum TreeDirection {
    Consumers,
    Providers,
}

impl TreeDirection {
    fn edges(self, node: &TreeNode) -> &[usize] {
        match self {
            Self::Consumers => &node.consumers,
            Self::Providers => &node.providers,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(in crate::app) struct TreeStructure {
    pub name: String,
    pub children: Vec<TreeStructure>,
}

impl TreeStructure {
    pub(in crate::app) fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }
}

/// Unfolds the consumer or provider graph below `root` into a tree. A service
/// never appears twice on the same root-to-leaf path, so cycles end there;
/// it may still appear on several sibling branches.
pub(in crate::app) fn map_node_to_tree_structure(
    nodes: &[TreeNode],
    root: usize,
    direction: TreeDirection,
) -> TreeStructure {
    let mut on_path = vec![false; nodes.len()];
    unfold(nodes, root, direction, &mut on_path)
}

fn unfold(
    nodes: &[TreeNode],
    index: usize,
    direction: TreeDirection,
    on_path: &mut [bool],
) -> TreeStructure {
    on_path[index] = true;
    let node = &nodes[index];
    let children = direction
        .edges(node)
        .iter()
        .copied()
        .filter(|&next| next < nodes.len() && !on_path[next])
        .collect::<Vec<_>>()
        .into_iter()
        .map(|next| unfold(nodes, next, direction, on_path))
        .collect();
    on_path[index] = false;

    TreeStructure {
        name: node.name.clone(),
        children,
    }
}
