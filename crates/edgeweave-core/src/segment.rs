//! Edge segmentation.
//!
//! Each input edge becomes a chain `source, c1, ..., cn, target` of evenly
//! spaced control points. Longer edges (relative to the canvas diagonal) get
//! more control points and can therefore bend more finely.

use tracing::debug;

use crate::{BundleConfig, GraphInput, Point};

/// A node of the physics graph.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimNode {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Pinned x coordinate; pinned nodes never move.
    pub fx: Option<f64>,
    /// Pinned y coordinate.
    pub fy: Option<f64>,
}

impl SimNode {
    /// A free node at rest.
    pub fn free(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// A node pinned at its position.
    pub fn pinned(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            fx: Some(x),
            fy: Some(y),
            ..Default::default()
        }
    }

    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A spring between two consecutive points of one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLink {
    pub source: usize,
    pub target: usize,
}

/// The expanded physics graph.
///
/// Indices `0..original_count` of `nodes` are the input nodes, in input
/// order; control nodes follow. Links and paths hold arena indices, so an
/// endpoint shared by several edges is a single pinned entry.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    pub nodes: Vec<SimNode>,
    pub links: Vec<SegmentLink>,
    /// One chain per input link, in input order.
    pub paths: Vec<Vec<usize>>,
    pub original_count: usize,
}

impl Bundle {
    /// Number of generated control nodes.
    pub fn control_count(&self) -> usize {
        self.nodes.len() - self.original_count
    }

    /// Current positions of one path's points.
    pub fn path_points(&self, path: usize) -> Vec<Point> {
        self.paths[path]
            .iter()
            .map(|&i| self.nodes[i].position())
            .collect()
    }
}

/// Number of control points for an edge of `length` on a canvas whose
/// diagonal is `diagonal`.
///
/// Linear map of `[0, diagonal]` onto `[min_segments, max_segments]`, rounded
/// half up and clamped to that range for edges longer than the diagonal.
pub fn segment_count(length: f64, diagonal: f64, config: &BundleConfig) -> usize {
    let lo = config.min_segments as f64;
    let hi = config.max_segments as f64;
    let scaled = lo + (hi - lo) * (length / diagonal);
    let rounded = (scaled + 0.5).floor();

    if rounded.is_nan() {
        return config.min_segments;
    }
    rounded.clamp(lo, hi) as usize
}

/// Split every link of `input` into a chain of control points.
///
/// Input nodes are pinned at their current coordinates. The caller validates
/// `input` first; link indices are trusted here.
pub fn segment(input: &GraphInput, config: &BundleConfig) -> Bundle {
    let mut bundle = Bundle {
        nodes: input.nodes.iter().map(|n| SimNode::pinned(n.x, n.y)).collect(),
        links: Vec::new(),
        paths: Vec::with_capacity(input.links.len()),
        original_count: input.nodes.len(),
    };

    for link in &input.links {
        let source = bundle.nodes[link.source].position();
        let target = bundle.nodes[link.target].position();
        let total = segment_count(source.distance(&target), input.diagonal_length, config);

        let mut local = Vec::with_capacity(total.saturating_add(2));
        local.push(link.source);

        let mut prev = link.source;
        for j in 1..=total {
            let t = j as f64 / total.saturating_add(1) as f64;
            let next = bundle.nodes.len();
            bundle.nodes.push(SimNode::free(
                source.x * (1.0 - t) + target.x * t,
                source.y * (1.0 - t) + target.y * t,
            ));
            bundle.links.push(SegmentLink {
                source: prev,
                target: next,
            });
            local.push(next);
            prev = next;
        }

        bundle.links.push(SegmentLink {
            source: prev,
            target: link.target,
        });
        local.push(link.target);
        bundle.paths.push(local);
    }

    debug!(
        edges = input.links.len(),
        control_nodes = bundle.control_count(),
        links = bundle.links.len(),
        "segmented edges"
    );

    bundle
}
