//! Tuning parameters for segmentation, simulation and curve sampling.

use serde::{Deserialize, Serialize};

use crate::{BundleError, Result};

/// Upper bound for `max_segments`.
pub const MAX_SEGMENTS: usize = 1000;
/// Upper bound for `link_iterations`.
pub const MAX_LINK_ITERATIONS: u32 = 100;
/// Upper bound for `max_tree_depth`; the quadtree is built recursively.
pub const MAX_TREE_DEPTH: usize = 32;

/// Configuration for an edge bundling run.
///
/// The defaults were tuned by hand against chart canvases of a few hundred
/// pixels. Partial JSON objects are accepted; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Fraction of the remaining distance to `alpha_target` removed each tick.
    /// 0.2 halts after 31 ticks.
    pub alpha_decay: f64,
    /// The simulation stops after the first tick that leaves alpha below this.
    pub alpha_min: f64,
    /// Value alpha cools towards.
    pub alpha_target: f64,
    /// Friction: velocities are scaled by `1 - velocity_decay` every tick.
    pub velocity_decay: f64,
    /// Many-body strength. Positive values attract (d3 sign convention).
    /// 0.7, 9 and 12 were too weak to form visible bundles.
    pub charge_strength: f64,
    /// Pairs closer than this are treated as this far apart.
    pub charge_distance_min: f64,
    /// Pairs farther apart than this do not interact at all.
    /// At 100 everything collapses to the centre, at 50 whole clusters merge.
    pub charge_distance_max: f64,
    /// Barnes-Hut accuracy; larger is faster and coarser.
    pub theta: f64,
    /// Spring strength of every segment link.
    /// Breaks at 100 and fills the screen from about 6.5; 0.7 and 5.0 look the same.
    pub link_strength: f64,
    /// Rest length of every segment link.
    pub link_distance: f64,
    /// Link relaxation passes per tick.
    pub link_iterations: u32,
    /// Segment count for a zero-length edge.
    pub min_segments: usize,
    /// Segment count for an edge as long as the canvas diagonal.
    pub max_segments: usize,
    /// Bundle spline tension in `[0, 1]`; 0 draws the straight chord.
    pub curve_beta: f64,
    /// Maximum quadtree depth.
    pub max_tree_depth: usize,
    /// Seed of the jiggle generator used to separate coincident points.
    pub seed: u32,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            alpha_decay: 0.2,
            alpha_min: 0.001,
            alpha_target: 0.0,
            velocity_decay: 0.4,
            charge_strength: 5.0,
            charge_distance_min: 1.0,
            charge_distance_max: 8.0,
            theta: 0.9,
            link_strength: 0.7,
            link_distance: 0.0,
            link_iterations: 1,
            min_segments: 1,
            max_segments: 20,
            curve_beta: 0.85,
            max_tree_depth: 16,
            seed: 1,
        }
    }
}

impl BundleConfig {
    /// Check that the parameters describe a simulation that halts.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(BundleError::InvalidConfig(msg.to_string()));

        if !(self.alpha_decay > 0.0 && self.alpha_decay <= 1.0) {
            return invalid("alpha_decay must be in (0, 1]");
        }
        if !(self.alpha_min > 0.0) {
            return invalid("alpha_min must be positive");
        }
        if !(self.alpha_target >= 0.0 && self.alpha_target < self.alpha_min) {
            return invalid("alpha_target must be non-negative and below alpha_min");
        }
        if !(0.0..=1.0).contains(&self.velocity_decay) {
            return invalid("velocity_decay must be in [0, 1]");
        }
        if !self.charge_strength.is_finite() || !self.link_strength.is_finite() {
            return invalid("force strengths must be finite");
        }
        if !(self.charge_distance_min >= 0.0)
            || !(self.charge_distance_max >= self.charge_distance_min)
        {
            return invalid("charge distances must satisfy 0 <= min <= max");
        }
        if !(self.theta > 0.0) {
            return invalid("theta must be positive");
        }
        if !(self.link_distance >= 0.0) {
            return invalid("link_distance must be non-negative");
        }
        if self.min_segments == 0 || self.min_segments > self.max_segments {
            return invalid("segments must satisfy 1 <= min_segments <= max_segments");
        }
        if self.max_segments > MAX_SEGMENTS {
            return invalid(&format!("max_segments must be at most {}", MAX_SEGMENTS));
        }
        if self.link_iterations > MAX_LINK_ITERATIONS {
            return invalid(&format!("link_iterations must be at most {}", MAX_LINK_ITERATIONS));
        }
        if self.max_tree_depth > MAX_TREE_DEPTH {
            return invalid(&format!("max_tree_depth must be at most {}", MAX_TREE_DEPTH));
        }
        if !(0.0..=1.0).contains(&self.curve_beta) {
            return invalid("curve_beta must be in [0, 1]");
        }
        Ok(())
    }
}
