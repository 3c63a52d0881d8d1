//! Force simulation over a segmented [`Bundle`].
//!
//! Follows d3-force: alpha cools geometrically every tick, the many-body
//! ("charge") force is evaluated with a Barnes-Hut quadtree, every segment
//! link acts as a spring, and velocities are damped before integration.
//! Pinned nodes are snapped back to their pinned position after each tick.

use tracing::{debug, trace};

use crate::quadtree::QuadTree;
use crate::{Bundle, BundleConfig, Point};

/// Current state of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Alpha is still above the halting threshold.
    Running,
    /// The last tick cooled alpha below `alpha_min`; further steps are no-ops.
    Converged,
}

/// d3's linear congruential generator, used only for jiggling coincident points.
#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed),
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }

    fn jiggle(&mut self) -> f64 {
        (self.next_f64() - 0.5) * 1e-6
    }
}

/// A running force-directed layout of one bundle.
pub struct Simulation {
    bundle: Bundle,
    config: BundleConfig,
    state: SimulationState,
    alpha: f64,
    iteration: u32,
    /// Per link: share of the correction applied to the target.
    bias: Vec<f64>,
    random: Lcg,
}

impl Simulation {
    /// Create a simulation over `bundle`. Pinned nodes are placed at their
    /// pinned coordinates and all velocities start at zero.
    pub fn new(mut bundle: Bundle, config: BundleConfig) -> Self {
        for node in &mut bundle.nodes {
            if let Some(fx) = node.fx {
                node.x = fx;
            }
            if let Some(fy) = node.fy {
                node.y = fy;
            }
            node.vx = 0.0;
            node.vy = 0.0;
        }

        let mut degree = vec![0usize; bundle.nodes.len()];
        for link in &bundle.links {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }
        let bias = bundle
            .links
            .iter()
            .map(|l| degree[l.source] as f64 / (degree[l.source] + degree[l.target]) as f64)
            .collect();

        debug!(
            nodes = bundle.nodes.len(),
            links = bundle.links.len(),
            "simulation initialized"
        );

        let random = Lcg::new(config.seed);
        Self {
            bundle,
            config,
            state: SimulationState::Running,
            alpha: 1.0,
            iteration: 0,
            bias,
            random,
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of ticks run so far.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Run one tick: cool, apply forces, integrate.
    pub fn step(&mut self) -> SimulationState {
        if self.state == SimulationState::Converged {
            return self.state;
        }

        self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;
        self.apply_charge();
        for _ in 0..self.config.link_iterations {
            self.apply_links();
        }
        self.integrate();
        self.iteration += 1;

        trace!(tick = self.iteration, alpha = self.alpha, "tick");

        if self.alpha < self.config.alpha_min {
            self.state = SimulationState::Converged;
        }
        self.state
    }

    /// Step until the simulation converges.
    pub fn run(&mut self) {
        while self.step() == SimulationState::Running {}
    }

    fn apply_charge(&mut self) {
        let positions: Vec<Point> = self.bundle.nodes.iter().map(|n| n.position()).collect();
        let tree = QuadTree::build(&positions, self.config.max_tree_depth);
        let Some(root) = tree.root() else {
            return;
        };

        let strength = self.config.charge_strength * self.alpha;
        let theta2 = self.config.theta * self.config.theta;
        let min2 = self.config.charge_distance_min * self.config.charge_distance_min;
        let max2 = self.config.charge_distance_max * self.config.charge_distance_max;

        let mut stack = Vec::new();
        for i in 0..positions.len() {
            let here = positions[i];
            let mut vx = 0.0;
            let mut vy = 0.0;

            stack.clear();
            stack.push(root);
            while let Some(cell) = stack.pop() {
                let mut dx = cell.center_x - here.x;
                let mut dy = cell.center_y - here.y;
                let mut l = dx * dx + dy * dy;

                // Far enough away: treat the whole cell as one body. A leaf
                // holding node i is always summed point by point.
                if !cell.points.contains(&i) && cell.width * cell.width / theta2 < l {
                    if l < max2 {
                        if dx == 0.0 {
                            dx = self.random.jiggle();
                            l += dx * dx;
                        }
                        if dy == 0.0 {
                            dy = self.random.jiggle();
                            l += dy * dy;
                        }
                        if l < min2 {
                            l = (min2 * l).sqrt();
                        }
                        let w = strength * cell.mass / l;
                        vx += dx * w;
                        vy += dy * w;
                    }
                    continue;
                }

                if !cell.is_leaf() {
                    stack.extend(cell.children.iter().flatten().map(|&c| &tree.cells()[c]));
                    continue;
                }

                for &j in &cell.points {
                    if j == i {
                        continue;
                    }
                    let mut dx = positions[j].x - here.x;
                    let mut dy = positions[j].y - here.y;
                    let mut l = dx * dx + dy * dy;
                    if l >= max2 {
                        continue;
                    }
                    if dx == 0.0 {
                        dx = self.random.jiggle();
                        l += dx * dx;
                    }
                    if dy == 0.0 {
                        dy = self.random.jiggle();
                        l += dy * dy;
                    }
                    if l < min2 {
                        l = (min2 * l).sqrt();
                    }
                    let w = strength / l;
                    vx += dx * w;
                    vy += dy * w;
                }
            }

            let node = &mut self.bundle.nodes[i];
            node.vx += vx;
            node.vy += vy;
        }
    }

    fn apply_links(&mut self) {
        let strength = self.config.link_strength * self.alpha;
        let distance = self.config.link_distance;

        for (k, link) in self.bundle.links.iter().enumerate() {
            let source = self.bundle.nodes[link.source];
            let target = self.bundle.nodes[link.target];

            let mut x = target.x + target.vx - source.x - source.vx;
            let mut y = target.y + target.vy - source.y - source.vy;
            if x == 0.0 {
                x = self.random.jiggle();
            }
            if y == 0.0 {
                y = self.random.jiggle();
            }

            let l = (x * x + y * y).sqrt();
            let scale = (l - distance) / l * strength;
            x *= scale;
            y *= scale;

            let b = self.bias[k];
            let target = &mut self.bundle.nodes[link.target];
            target.vx -= x * b;
            target.vy -= y * b;
            let source = &mut self.bundle.nodes[link.source];
            source.vx += x * (1.0 - b);
            source.vy += y * (1.0 - b);
        }
    }

    fn integrate(&mut self) {
        let keep = 1.0 - self.config.velocity_decay;
        for node in &mut self.bundle.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= keep;
                    node.y += node.vy;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{segment, GraphInput, InputLink, InputNode, SimNode};

    fn line_bundle() -> Bundle {
        let input = GraphInput {
            nodes: vec![InputNode::new(0.0, 0.0), InputNode::new(100.0, 0.0)],
            links: vec![InputLink::new(0, 1)],
            diagonal_length: 100.0,
        };
        segment(&input, &BundleConfig::default())
    }

    #[test]
    fn test_lcg_matches_d3_sequence() {
        let mut lcg = Lcg::new(1);
        // (1664525 * 1 + 1013904223) % 2^32 = 1015568748
        assert!((lcg.next_f64() - 1_015_568_748.0 / 4_294_967_296.0).abs() < 1e-15);
        let jiggle = lcg.jiggle();
        assert!(jiggle.abs() <= 5e-7);
    }

    #[test]
    fn test_default_run_halts_after_31_ticks() {
        let mut sim = Simulation::new(line_bundle(), BundleConfig::default());
        sim.run();
        assert_eq!(sim.state(), SimulationState::Converged);
        assert_eq!(sim.iteration(), 31);
        assert!(sim.alpha() < 0.001);
    }

    #[test]
    fn test_step_after_convergence_is_noop() {
        let mut sim = Simulation::new(line_bundle(), BundleConfig::default());
        sim.run();
        let before = sim.bundle().nodes.clone();
        assert_eq!(sim.step(), SimulationState::Converged);
        assert_eq!(sim.iteration(), 31);
        assert_eq!(sim.bundle().nodes, before);
    }

    #[test]
    fn test_pinned_nodes_never_move() {
        let mut sim = Simulation::new(line_bundle(), BundleConfig::default());
        sim.run();
        let nodes = &sim.bundle().nodes;
        assert_eq!(nodes[0].position(), Point::new(0.0, 0.0));
        assert_eq!(nodes[1].position(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_straight_chain_stays_on_its_line() {
        let mut sim = Simulation::new(line_bundle(), BundleConfig::default());
        sim.run();
        for node in &sim.bundle().nodes[2..] {
            assert!(node.x.is_finite());
            assert!(node.y.abs() < 1e-3);
            assert!(node.x > 0.0 && node.x < 100.0);
        }
    }

    #[test]
    fn test_positive_charge_pulls_free_nodes_together() {
        let bundle = Bundle {
            nodes: vec![SimNode::free(0.0, 0.0), SimNode::free(4.0, 0.0)],
            links: Vec::new(),
            paths: Vec::new(),
            original_count: 0,
        };
        let mut sim = Simulation::new(bundle, BundleConfig::default());
        sim.step();
        let nodes = &sim.bundle().nodes;
        assert!(nodes[0].x > 0.0);
        assert!(nodes[1].x < 4.0);
    }

    #[test]
    fn test_depth_limited_leaf_excludes_the_node_itself() {
        // Nodes 1 and 2 share a leaf whose center of mass passes the far test
        // from node 2; node 2 must still only feel nodes 0 and 1.
        let bundle = Bundle {
            nodes: vec![
                SimNode::pinned(0.0, 0.0),
                SimNode::pinned(8.0, 8.0),
                SimNode::free(4.1, 4.1),
            ],
            links: Vec::new(),
            paths: Vec::new(),
            original_count: 0,
        };
        let config = BundleConfig {
            theta: 2.0,
            max_tree_depth: 1,
            ..Default::default()
        };
        let mut sim = Simulation::new(bundle, config);
        sim.step();

        let strength = 5.0 * 0.8;
        let l0 = 4.1 * 4.1 * 2.0;
        let l1 = 3.9 * 3.9 * 2.0;
        let v = -4.1 * strength / l0 + 3.9 * strength / l1;
        let expected = 4.1 + 0.6 * v;
        let node = sim.bundle().nodes[2];
        assert!((node.x - expected).abs() < 1e-9, "{} vs {}", node.x, expected);
        assert!((node.y - expected).abs() < 1e-9, "{} vs {}", node.y, expected);
    }

    #[test]
    fn test_charge_ignores_pairs_beyond_distance_max() {
        let bundle = Bundle {
            nodes: vec![SimNode::free(0.0, 0.0), SimNode::free(50.0, 0.0)],
            links: Vec::new(),
            paths: Vec::new(),
            original_count: 0,
        };
        let mut sim = Simulation::new(bundle, BundleConfig::default());
        sim.run();
        let nodes = &sim.bundle().nodes;
        assert_eq!(nodes[0].position(), Point::new(0.0, 0.0));
        assert_eq!(nodes[1].position(), Point::new(50.0, 0.0));
    }
}
