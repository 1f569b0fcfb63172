mod forces;
mod quadtree;

use std::f32::consts::PI;

use eframe::egui::{Pos2, Vec2, vec2};
use tracing::trace;

use forces::{
    Spring, apply_centering, apply_charge, apply_collision, apply_springs, apply_vertical,
};
use quadtree::QuadNode;

const ALPHA_MIN: f32 = 0.001;
const ALPHA_TARGET_DRAGGING: f32 = 0.3;
const VELOCITY_DECAY: f32 = 0.4;
const COLLIDE_PASSES: usize = 2;
const INITIAL_RADIUS: f32 = 10.0;

fn alpha_decay() -> f32 {
    1.0 - ALPHA_MIN.powf(1.0 / 300.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub pinned: Option<Vec2>,
}

pub(in crate::app) struct Simulation {
    bodies: Vec<Body>,
    springs: Vec<Spring>,
    center: Vec2,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    seed: u64,
    points: Vec<Vec2>,
}

impl Simulation {
    pub(in crate::app) fn new(body_count: usize, links: &[(usize, usize)], size: Vec2) -> Self {
        let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
        let bodies = (0..body_count)
            .map(|index| {
                let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
                let angle = index as f32 * golden_angle;
                Body {
                    position: vec2(radius * angle.cos(), radius * angle.sin()),
                    velocity: Vec2::ZERO,
                    pinned: None,
                }
            })
            .collect();

        let pairs = links
            .iter()
            .copied()
            .filter(|&(source, target)| {
                source != target && source < body_count && target < body_count
            })
            .collect::<Vec<_>>();

        Self {
            bodies,
            springs: Spring::between(&pairs, body_count),
            center: size * 0.5,
            alpha: 1.0,
            alpha_target: 0.0,
            running: body_count > 0,
            seed: 0,
            points: Vec::new(),
        }
    }

    pub(in crate::app) fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[cfg(test)]
    pub(in crate::app) fn position(&self, index: usize) -> Option<Pos2> {
        self.bodies.get(index).map(|body| body.position.to_pos2())
    }

    #[cfg(test)]
    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }

    #[cfg(test)]
    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn set_center(&mut self, size: Vec2) {
        let center = size * 0.5;
        if self.center != center {
            self.center = center;
            self.restart();
        }
    }

    pub(in crate::app) fn restart(&mut self) {
        self.running = !self.bodies.is_empty();
    }

    pub(in crate::app) fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * alpha_decay();

        self.points.clear();
        self.points
            .extend(self.bodies.iter().map(|body| body.position));
        if let Some(tree) = QuadNode::build(&self.points) {
            for index in 0..self.bodies.len() {
                let mut velocity = self.bodies[index].velocity;
                apply_charge(
                    &tree,
                    index,
                    &self.points,
                    self.alpha,
                    &mut self.seed,
                    &mut velocity,
                );
                self.bodies[index].velocity = velocity;
            }
        }

        apply_springs(&self.springs, &mut self.bodies, self.alpha, &mut self.seed);
        apply_centering(&mut self.bodies, self.center);
        apply_vertical(&mut self.bodies, self.alpha);
        for _ in 0..COLLIDE_PASSES {
            apply_collision(&mut self.bodies, &mut self.points, &mut self.seed);
        }

        let retain = 1.0 - VELOCITY_DECAY;
        for body in &mut self.bodies {
            if let Some(pin) = body.pinned {
                body.position = pin;
                body.velocity = Vec2::ZERO;
            } else {
                body.velocity *= retain;
                body.position += body.velocity;
            }
        }
    }

    pub(in crate::app) fn advance(&mut self, mut on_tick: impl FnMut(&[Body])) -> bool {
        if !self.running {
            return false;
        }

        self.tick();
        on_tick(&self.bodies);

        if self.alpha < ALPHA_MIN {
            self.running = false;
            trace!(alpha = self.alpha, "simulation cooled");
        }
        true
    }

    pub(in crate::app) fn drag_start(&mut self, index: usize) {
        let Some(body) = self.bodies.get_mut(index) else {
            return;
        };
        body.pinned = Some(body.position);
        self.alpha_target = ALPHA_TARGET_DRAGGING;
        self.restart();
    }

    pub(in crate::app) fn drag_to(&mut self, index: usize, position: Pos2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.pinned = Some(position.to_vec2());
        }
    }

    pub(in crate::app) fn drag_end(&mut self, index: usize) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.pinned = None;
        }
        self.alpha_target = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn settle(simulation: &mut Simulation) -> usize {
        let mut ticks = 0;
        while simulation.advance(|_| {}) {
            ticks += 1;
            assert!(ticks < 1000, "simulation never cooled");
        }
        ticks
    }

    #[test]
    fn alpha_decays_to_rest_in_about_three_hundred_ticks() {
        let mut simulation = Simulation::new(3, &[(0, 1), (1, 2)], vec2(800.0, 600.0));

        let ticks = settle(&mut simulation);

        assert!((295..=305).contains(&ticks), "cooled after {ticks} ticks");
        assert!(!simulation.is_running());
        assert!(!simulation.advance(|_| panic!("ticked while cold")));
    }

    #[test]
    fn initial_positions_follow_phyllotaxis() {
        let simulation = Simulation::new(3, &[], vec2(100.0, 100.0));
        let bodies = simulation.bodies();

        assert_abs_diff_eq!(bodies[0].position.x, 10.0 * 0.5_f32.sqrt(), epsilon = 1e-4);
        assert_abs_diff_eq!(bodies[0].position.y, 0.0);
        assert_abs_diff_eq!(bodies[1].position.length(), 10.0 * 1.5_f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn layout_centres_on_viewport() {
        let size = vec2(1000.0, 700.0);
        let mut simulation = Simulation::new(6, &[(0, 1), (1, 2), (3, 4)], size);
        settle(&mut simulation);

        let bodies = simulation.bodies();
        let mean = bodies.iter().fold(Vec2::ZERO, |sum, body| sum + body.position)
            / bodies.len() as f32;
        assert_abs_diff_eq!(mean.x, 500.0, epsilon = 1.0);
    }

    #[test]
    fn new_center_pulls_a_cooled_layout_along() {
        let mut simulation = Simulation::new(4, &[(0, 1), (2, 3)], vec2(800.0, 600.0));
        settle(&mut simulation);

        simulation.set_center(vec2(1400.0, 600.0));
        assert!(simulation.is_running());
        settle(&mut simulation);

        let bodies = simulation.bodies();
        let mean = bodies.iter().fold(Vec2::ZERO, |sum, body| sum + body.position)
            / bodies.len() as f32;
        assert_abs_diff_eq!(mean.x, 700.0, epsilon = 1.0);

        simulation.set_center(vec2(1400.0, 600.0));
        assert!(!simulation.is_running());
    }

    #[test]
    fn settled_bodies_keep_collision_distance() {
        let mut simulation = Simulation::new(5, &[(0, 1), (0, 2), (0, 3), (0, 4)], vec2(800.0, 600.0));
        settle(&mut simulation);

        let bodies = simulation.bodies();
        for first in 0..bodies.len() {
            for second in first + 1..bodies.len() {
                let distance = (bodies[first].position - bodies[second].position).length();
                assert!(distance > 200.0, "{first} and {second} overlap at {distance}");
            }
        }
    }

    #[test]
    fn self_links_are_ignored() {
        let mut simulation = Simulation::new(2, &[(0, 0), (0, 1)], vec2(400.0, 400.0));
        assert_eq!(simulation.springs.len(), 1);
        simulation.tick();
        assert!(simulation.bodies().iter().all(|body| body.position.is_finite()));
    }

    #[test]
    fn dragging_pins_and_reheats() {
        let mut simulation = Simulation::new(3, &[(0, 1), (1, 2)], vec2(800.0, 600.0));
        settle(&mut simulation);

        simulation.drag_start(1);
        assert!(simulation.is_running());
        simulation.drag_to(1, Pos2::new(40.0, 60.0));
        for _ in 0..50 {
            simulation.advance(|_| {});
        }
        assert_eq!(simulation.position(1), Some(Pos2::new(40.0, 60.0)));
        assert_eq!(simulation.bodies()[1].velocity, Vec2::ZERO);
        assert!(simulation.alpha() > 0.15);

        simulation.drag_end(1);
        assert_eq!(simulation.bodies()[1].pinned, None);
        settle(&mut simulation);
        assert!(!simulation.is_running());
    }

    #[test]
    fn empty_simulation_never_ticks() {
        let mut simulation = Simulation::new(0, &[], vec2(100.0, 100.0));
        assert!(!simulation.advance(|_| {}));
        simulation.drag_start(0);
        assert!(!simulation.is_running());
    }

    #[test]
    fn tick_callback_sees_every_body() {
        let mut simulation = Simulation::new(4, &[(0, 1)], vec2(100.0, 100.0));
        let mut seen = 0;
        assert!(simulation.advance(|bodies| seen = bodies.len()));
        assert_eq!(seen, 4);
    }
}
