use super::tree::TreeStructure;

pub(in crate::app) const NODE_BREADTH: f32 = 40.0;
pub(in crate::app) const NODE_DEPTH: f32 = 300.0;

const SIBLING_SEPARATION: f32 = 1.0;
const COUSIN_SEPARATION: f32 = 4.0;

#[derive(Clone, Debug, PartialEq)]
pub(in crate::app) struct TidyNode {
    pub name: String,
    pub parent: Option<usize>,
    pub breadth: f32,
    pub depth: f32,
}

#[derive(Clone, Debug, Default)]
struct Walker {
    parent: usize,
    children: Vec<usize>,
    number: usize,
    ancestor: usize,
    default_ancestor: Option<usize>,
    prelim: f32,
    modifier: f32,
    change: f32,
    shift: f32,
    thread: Option<usize>,
    x: f32,
    level: u32,
}

struct Arena {
    walkers: Vec<Walker>,
    names: Vec<String>,
}

/// Tidy layout of `tree` with fixed node spacing: siblings one row apart,
/// cousins four rows apart, depth levels 300 units apart. Nodes come back in
/// pre-order, root first.
pub(in crate::app) fn layout_tree(tree: &TreeStructure) -> Vec<TidyNode> {
    let mut arena = Arena {
        walkers: vec![Walker::default()],
        names: vec![String::new()],
    };
    arena.push(tree, 0, 0, 0);

    arena.first_walk(1);
    arena.walkers[0].modifier = -arena.walkers[1].prelim;
    for index in 1..arena.walkers.len() {
        let parent = arena.walkers[index].parent;
        let parent_modifier = arena.walkers[parent].modifier;
        let walker = &mut arena.walkers[index];
        walker.x = walker.prelim + parent_modifier;
        walker.modifier += parent_modifier;
    }

    arena
        .walkers
        .iter()
        .zip(arena.names)
        .skip(1)
        .map(|(walker, name)| TidyNode {
            name,
            parent: (walker.parent > 0).then(|| walker.parent - 1),
            breadth: walker.x * NODE_BREADTH,
            depth: walker.level as f32 * NODE_DEPTH,
        })
        .collect()
}

impl Arena {
    fn push(&mut self, tree: &TreeStructure, parent: usize, number: usize, level: u32) {
        let index = self.walkers.len();
        self.walkers.push(Walker {
            parent,
            number,
            ancestor: index,
            level,
            ..Walker::default()
        });
        self.names.push(tree.name.clone());
        self.walkers[parent].children.push(index);

        for (number, child) in tree.children.iter().enumerate() {
            self.push(child, index, number, level + 1);
        }
    }

    fn separation(&self, first: usize, second: usize) -> f32 {
        if self.walkers[first].parent == self.walkers[second].parent {
            SIBLING_SEPARATION
        } else {
            COUSIN_SEPARATION
        }
    }

    fn next_left(&self, index: usize) -> Option<usize> {
        let walker = &self.walkers[index];
        walker.children.first().copied().or(walker.thread)
    }

    fn next_right(&self, index: usize) -> Option<usize> {
        let walker = &self.walkers[index];
        walker.children.last().copied().or(walker.thread)
    }

    fn first_walk(&mut self, index: usize) {
        for child in self.walkers[index].children.clone() {
            self.first_walk(child);
        }

        let parent = self.walkers[index].parent;
        let number = self.walkers[index].number;
        let first_sibling = self.walkers[parent].children[0];
        let left_sibling = (number > 0).then(|| self.walkers[parent].children[number - 1]);

        let children = &self.walkers[index].children;
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(index);
            let midpoint = (self.walkers[first].prelim + self.walkers[last].prelim) / 2.0;
            match left_sibling {
                Some(left) => {
                    let prelim = self.walkers[left].prelim + self.separation(index, left);
                    self.walkers[index].prelim = prelim;
                    self.walkers[index].modifier = prelim - midpoint;
                }
                None => self.walkers[index].prelim = midpoint,
            }
        } else if let Some(left) = left_sibling {
            self.walkers[index].prelim = self.walkers[left].prelim + self.separation(index, left);
        }

        let default_ancestor = self.walkers[parent].default_ancestor.unwrap_or(first_sibling);
        let ancestor = self.apportion(index, left_sibling, default_ancestor);
        self.walkers[parent].default_ancestor = Some(ancestor);
    }

    fn execute_shifts(&mut self, index: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for child in self.walkers[index].children.clone().into_iter().rev() {
            let walker = &mut self.walkers[child];
            walker.prelim += shift;
            walker.modifier += shift;
            change += walker.change;
            shift += walker.shift + change;
        }
    }

    fn move_subtree(&mut self, left: usize, right: usize, shift: f32) {
        let span = self.walkers[right].number as f32 - self.walkers[left].number as f32;
        let change = shift / span;
        self.walkers[right].change -= change;
        self.walkers[right].shift += shift;
        self.walkers[left].change += change;
        self.walkers[right].prelim += shift;
        self.walkers[right].modifier += shift;
    }

    fn next_ancestor(&self, inner_left: usize, index: usize, ancestor: usize) -> usize {
        let candidate = self.walkers[inner_left].ancestor;
        if self.walkers[candidate].parent == self.walkers[index].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn apportion(&mut self, index: usize, left_sibling: Option<usize>, ancestor: usize) -> usize {
        let Some(left_sibling) = left_sibling else {
            return ancestor;
        };
        let mut ancestor = ancestor;

        let parent = self.walkers[index].parent;
        let mut inner_right = index;
        let mut outer_right = index;
        let mut inner_left = left_sibling;
        let mut outer_left = self.walkers[parent].children[0];
        let mut sum_inner_right = self.walkers[inner_right].modifier;
        let mut sum_outer_right = self.walkers[outer_right].modifier;
        let mut sum_inner_left = self.walkers[inner_left].modifier;
        let mut sum_outer_left = self.walkers[outer_left].modifier;

        let (next_inner_left, next_inner_right) = loop {
            let next_inner_left = self.next_right(inner_left);
            let next_inner_right = self.next_left(inner_right);
            let (Some(left), Some(right)) = (next_inner_left, next_inner_right) else {
                break (next_inner_left, next_inner_right);
            };
            inner_left = left;
            inner_right = right;
            outer_left = self.next_left(outer_left).unwrap_or(outer_left);
            outer_right = self.next_right(outer_right).unwrap_or(outer_right);
            self.walkers[outer_right].ancestor = index;

            let shift = self.walkers[inner_left].prelim + sum_inner_left
                - self.walkers[inner_right].prelim
                - sum_inner_right
                + self.separation(inner_left, inner_right);
            if shift > 0.0 {
                let moved = self.next_ancestor(inner_left, index, ancestor);
                self.move_subtree(moved, index, shift);
                sum_inner_right += shift;
                sum_outer_right += shift;
            }

            sum_inner_left += self.walkers[inner_left].modifier;
            sum_inner_right += self.walkers[inner_right].modifier;
            sum_outer_left += self.walkers[outer_left].modifier;
            sum_outer_right += self.walkers[outer_right].modifier;
        };

        if let Some(left) = next_inner_left
            && self.next_right(outer_right).is_none()
        {
            self.walkers[outer_right].thread = Some(left);
            self.walkers[outer_right].modifier += sum_inner_left - sum_outer_right;
        }
        if let Some(right) = next_inner_right
            && self.next_left(outer_left).is_none()
        {
            self.walkers[outer_left].thread = Some(right);
            self.walkers[outer_left].modifier += sum_inner_right - sum_outer_left;
            ancestor = index;
        }

        ancestor
    }
}
