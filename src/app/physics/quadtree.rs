use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct Square {
    pub(super) center: Vec2,
    pub(super) half: f32,
}

impl Square {
    fn around(points: &[Vec2]) -> Option<Self> {
        let mut min = vec2(f32::INFINITY, f32::INFINITY);
        let mut max = vec2(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min = min.min(*point);
            max = max.max(*point);
        }

        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite()) {
            return None;
        }

        let span = (max - min).max_elem().max(1.0);
        Some(Self {
            center: (min + max) * 0.5,
            half: span * 0.5 + 1.0,
        })
    }

    pub(super) fn side(self) -> f32 {
        self.half * 2.0
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        let offset = (point - self.center).abs();
        offset.x <= self.half && offset.y <= self.half
    }

    pub(super) fn gap_sq(self, other: Self) -> f32 {
        let reach = self.half + other.half;
        let gap = ((self.center - other.center).abs() - vec2(reach, reach)).max(Vec2::ZERO);
        gap.length_sq()
    }

    fn quadrant(self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) | (usize::from(point.y >= self.center.y) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let quarter = self.half * 0.5;
        let sign_x = if quadrant & 1 == 0 { -1.0 } else { 1.0 };
        let sign_y = if quadrant & 2 == 0 { -1.0 } else { 1.0 };
        Self {
            center: self.center + vec2(sign_x * quarter, sign_y * quarter),
            half: quarter,
        }
    }
}

pub(super) struct QuadNode {
    pub(super) square: Square,
    pub(super) center_of_mass: Vec2,
    pub(super) count: usize,
    pub(super) bodies: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(points: &[Vec2]) -> Option<Self> {
        let square = Square::around(points)?;
        Some(Self::split(square, (0..points.len()).collect(), points, 0))
    }

    fn split(square: Square, bodies: Vec<usize>, points: &[Vec2], depth: usize) -> Self {
        let count = bodies.len();
        let center_of_mass = if count == 0 {
            square.center
        } else {
            bodies
                .iter()
                .fold(Vec2::ZERO, |sum, &index| sum + points[index])
                / count as f32
        };

        let mut node = Self {
            square,
            center_of_mass,
            count,
            bodies,
            children: std::array::from_fn(|_| None),
        };
        if depth >= MAX_DEPTH || count <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &node.bodies {
            buckets[square.quadrant(points[index])].push(index);
        }
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() < 2 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if !bucket.is_empty() {
                let child = Self::split(square.child(quadrant), bucket, points, depth + 1);
                node.children[quadrant] = Some(Box::new(child));
            }
        }
        node.bodies.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
        self.children.iter().filter_map(|child| child.as_deref())
    }

    /// Calls `visit(i, j)` with `i < j` for every pair of bodies whose cells
    /// are within `reach` of each other.
    pub(super) fn for_each_near_pair(&self, reach: f32, visit: &mut impl FnMut(usize, usize)) {
        self.near_pairs(self, true, reach * reach, visit);
    }

    fn near_pairs(
        &self,
        other: &QuadNode,
        same: bool,
        reach_sq: f32,
        visit: &mut impl FnMut(usize, usize),
    ) {
        if self.square.gap_sq(other.square) > reach_sq {
            return;
        }

        if self.is_leaf() && other.is_leaf() {
            if same {
                for (offset, &first) in self.bodies.iter().enumerate() {
                    for &second in &self.bodies[offset + 1..] {
                        visit(first.min(second), first.max(second));
                    }
                }
            } else {
                for &first in &self.bodies {
                    for &second in &other.bodies {
                        visit(first.min(second), first.max(second));
                    }
                }
            }
            return;
        }

        if same {
            let children = self.children().collect::<Vec<_>>();
            for (offset, first) in children.iter().enumerate() {
                first.near_pairs(first, true, reach_sq, visit);
                for second in &children[offset + 1..] {
                    first.near_pairs(second, false, reach_sq, visit);
                }
            }
            return;
        }

        let split_self = !self.is_leaf() && (other.is_leaf() || self.square.half >= other.square.half);
        if split_self {
            for child in self.children() {
                child.near_pairs(other, false, reach_sq, visit);
            }
        } else {
            for child in other.children() {
                self.near_pairs(child, false, reach_sq, visit);
            }
        }
    }
}
