use eframe::egui::{Vec2, vec2};

use super::Body;
use super::quadtree::QuadNode;
use crate::util::jiggle;

pub(super) const CHARGE_STRENGTH: f32 = -30.0;
pub(super) const THETA_SQ: f32 = 0.81;
const DISTANCE_MIN_SQ: f32 = 1.0;

pub(super) const LINK_DISTANCE: f32 = 180.0;

pub(super) const VERTICAL_TARGET: f32 = 0.5;
pub(super) const VERTICAL_STRENGTH: f32 = 0.1;

pub(super) const COLLIDE_RADIUS: f32 = 140.0;

#[derive(Clone, Copy, Debug)]
pub(super) struct Spring {
    pub(super) source: usize,
    pub(super) target: usize,
    pub(super) strength: f32,
    pub(super) bias: f32,
}

impl Spring {
    pub(super) fn between(pairs: &[(usize, usize)], body_count: usize) -> Vec<Self> {
        let mut degree = vec![0u32; body_count];
        for &(source, target) in pairs {
            degree[source] += 1;
            degree[target] += 1;
        }

        pairs
            .iter()
            .map(|&(source, target)| {
                let source_degree = degree[source] as f32;
                let target_degree = degree[target] as f32;
                Self {
                    source,
                    target,
                    strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect()
    }
}

fn nonzero(value: f32, seed: &mut u64) -> f32 {
    if value != 0.0 {
        return value;
    }
    *seed = seed.wrapping_add(1);
    jiggle(*seed)
}

pub(super) fn apply_charge(
    tree: &QuadNode,
    index: usize,
    points: &[Vec2],
    alpha: f32,
    seed: &mut u64,
    velocity: &mut Vec2,
) {
    if tree.count == 0 {
        return;
    }

    let point = points[index];
    if tree.is_leaf() {
        for &other in &tree.bodies {
            if other == index {
                continue;
            }

            let mut delta = points[other] - point;
            delta.x = nonzero(delta.x, seed);
            delta.y = nonzero(delta.y, seed);
            let mut distance_sq = delta.length_sq();
            if distance_sq < DISTANCE_MIN_SQ {
                distance_sq = (DISTANCE_MIN_SQ * distance_sq).sqrt();
            }
            *velocity += delta * (CHARGE_STRENGTH * alpha / distance_sq);
        }
        return;
    }

    let mut delta = tree.center_of_mass - point;
    let distance_sq = delta.length_sq();
    let side = tree.square.side();
    if !tree.square.contains(point) && side * side / THETA_SQ < distance_sq {
        delta.x = nonzero(delta.x, seed);
        delta.y = nonzero(delta.y, seed);
        let distance_sq = if distance_sq < DISTANCE_MIN_SQ {
            (DISTANCE_MIN_SQ * distance_sq).sqrt()
        } else {
            distance_sq
        };
        *velocity += delta * (CHARGE_STRENGTH * tree.count as f32 * alpha / distance_sq);
        return;
    }

    for child in tree.children() {
        apply_charge(child, index, points, alpha, seed, velocity);
    }
}

pub(super) fn apply_springs(springs: &[Spring], bodies: &mut [Body], alpha: f32, seed: &mut u64) {
    for spring in springs {
        let source = &bodies[spring.source];
        let target = &bodies[spring.target];
        let mut delta = (target.position + target.velocity) - (source.position + source.velocity);
        delta.x = nonzero(delta.x, seed);
        delta.y = nonzero(delta.y, seed);

        let distance = delta.length();
        let stretch = (distance - LINK_DISTANCE) / distance * alpha * spring.strength;
        let pull = delta * stretch;

        bodies[spring.target].velocity -= pull * spring.bias;
        bodies[spring.source].velocity += pull * (1.0 - spring.bias);
    }
}

pub(super) fn apply_centering(bodies: &mut [Body], center: Vec2) {
    if bodies.is_empty() {
        return;
    }

    let mean = bodies
        .iter()
        .fold(Vec2::ZERO, |sum, body| sum + body.position)
        / bodies.len() as f32;
    let shift = center - mean;
    for body in bodies {
        body.position += shift;
    }
}

pub(super) fn apply_vertical(bodies: &mut [Body], alpha: f32) {
    for body in bodies {
        body.velocity.y += (VERTICAL_TARGET - body.position.y) * VERTICAL_STRENGTH * alpha;
    }
}

pub(super) fn apply_collision(bodies: &mut [Body], predicted: &mut Vec<Vec2>, seed: &mut u64) {
    predicted.clear();
    predicted.extend(bodies.iter().map(|body| body.position + body.velocity));
    let Some(tree) = QuadNode::build(predicted) else {
        return;
    };

    let reach = COLLIDE_RADIUS * 2.0;
    let reach_sq = reach * reach;
    tree.for_each_near_pair(reach, &mut |first, second| {
        let mut delta = (bodies[first].position + bodies[first].velocity)
            - (bodies[second].position + bodies[second].velocity);
        let mut distance_sq = delta.length_sq();
        if distance_sq >= reach_sq {
            return;
        }

        if delta.x == 0.0 {
            delta.x = nonzero(0.0, seed);
            distance_sq += delta.x * delta.x;
        }
        if delta.y == 0.0 {
            delta.y = nonzero(0.0, seed);
            distance_sq += delta.y * delta.y;
        }

        let distance = distance_sq.sqrt();
        let push = delta * ((reach - distance) / distance) * 0.5;
        bodies[first].velocity += push;
        bodies[second].velocity -= push;
    });
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn body(x: f32, y: f32) -> Body {
        Body {
            position: vec2(x, y),
            velocity: Vec2::ZERO,
            pinned: None,
        }
    }

    #[test]
    fn spring_strength_uses_smaller_degree() {
        let springs = Spring::between(&[(0, 1), (0, 2), (0, 3)], 4);

        assert_abs_diff_eq!(springs[0].strength, 1.0);
        assert_abs_diff_eq!(springs[0].bias, 0.75);
    }

    #[test]
    fn spring_pulls_distant_bodies_together() {
        let mut bodies = vec![body(0.0, 0.0), body(400.0, 0.0)];
        let springs = Spring::between(&[(0, 1)], 2);
        let mut seed = 0;

        apply_springs(&springs, &mut bodies, 1.0, &mut seed);

        assert_abs_diff_eq!(bodies[0].velocity.x, 110.0, epsilon = 1e-3);
        assert_abs_diff_eq!(bodies[1].velocity.x, -110.0, epsilon = 1e-3);
    }

    #[test]
    fn spring_pushes_close_bodies_apart() {
        let mut bodies = vec![body(0.0, 0.0), body(100.0, 0.0)];
        let springs = Spring::between(&[(0, 1)], 2);
        let mut seed = 0;

        apply_springs(&springs, &mut bodies, 1.0, &mut seed);

        assert!(bodies[0].velocity.x < 0.0);
        assert!(bodies[1].velocity.x > 0.0);
    }

    #[test]
    fn centering_moves_mean_to_center() {
        let mut bodies = vec![body(0.0, 0.0), body(10.0, 20.0)];
        apply_centering(&mut bodies, vec2(100.0, 50.0));

        assert_abs_diff_eq!(bodies[0].position.x, 95.0);
        assert_abs_diff_eq!(bodies[0].position.y, 40.0);
        assert_abs_diff_eq!(bodies[1].position.x, 105.0);
        assert_abs_diff_eq!(bodies[1].position.y, 60.0);
    }

    #[test]
    fn vertical_force_pulls_towards_target() {
        let mut bodies = vec![body(0.0, 100.5), body(0.0, -9.5)];
        apply_vertical(&mut bodies, 0.5);

        assert_abs_diff_eq!(bodies[0].velocity.y, -5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(bodies[1].velocity.y, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn charge_repels_neighbours() {
        let points = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let tree = QuadNode::build(&points).unwrap();
        let mut seed = 0;
        let mut velocity = Vec2::ZERO;

        apply_charge(&tree, 0, &points, 1.0, &mut seed, &mut velocity);

        // delta (10, jiggle) over 100 times -30
        assert_abs_diff_eq!(velocity.x, -3.0, epsilon = 1e-3);
    }

    #[test]
    fn far_cluster_is_approximated_by_its_mass() {
        let mut points = (0..20)
            .map(|index| vec2(1000.0 + (index % 5) as f32, (index / 5) as f32))
            .collect::<Vec<_>>();
        points.push(vec2(0.0, 0.0));
        points.extend((0..20).map(|index| vec2(-1000.0 - (index % 5) as f32, (index / 5) as f32)));
        let tree = QuadNode::build(&points).unwrap();
        let mut seed = 0;
        let mut velocity = Vec2::ZERO;

        apply_charge(&tree, 20, &points, 1.0, &mut seed, &mut velocity);

        assert_abs_diff_eq!(velocity.x, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn collision_separates_overlapping_bodies() {
        let mut bodies = vec![body(0.0, 0.0), body(100.0, 0.0), body(5000.0, 0.0)];
        let mut predicted = Vec::new();
        let mut seed = 0;

        apply_collision(&mut bodies, &mut predicted, &mut seed);

        assert_abs_diff_eq!(bodies[0].velocity.x, -90.0, epsilon = 1e-3);
        assert_abs_diff_eq!(bodies[1].velocity.x, 90.0, epsilon = 1e-3);
        assert_eq!(bodies[2].velocity, Vec2::ZERO);
    }
}
