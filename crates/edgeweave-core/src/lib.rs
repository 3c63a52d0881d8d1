//! Force-directed edge bundling for chart canvases.
//!
//! Every input edge is cut into a chain of control points, a small physics
//! simulation pulls neighbouring chains together, and each chain is finally
//! drawn as a bundle spline.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Segmenter                            │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │ Graph Input │───▶│  Segment    │───▶│   Bundle    │     │
//! │  │ (nodes/links│    │  scale      │    │   (arena)   │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Layout Simulator                         │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐     │
//! │  │   Charge    │───▶│    Link     │───▶│  Integrate  │     │
//! │  │ (BH approx) │    │  (springs)  │    │ (free only) │     │
//! │  └─────────────┘    └─────────────┘    └─────────────┘     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ every tick
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Curve Emitter                          │
//! │  Paths sampled through the bundle spline into SVG paths     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edgeweave_core::{EdgeBundler, GraphInput, InputLink, InputNode};
//!
//! # async fn run() -> edgeweave_core::Result<()> {
//! let input = GraphInput {
//!     nodes: vec![InputNode::new(0.0, 0.0), InputNode::new(100.0, 0.0)],
//!     links: vec![InputLink::new(0, 1)],
//!     diagonal_length: 100.0,
//! };
//! let edges = EdgeBundler::default().bundle(&input).await?;
//! println!("{}", edges[0].path);
//! # Ok(())
//! # }
//! ```

mod bundler;
mod chart;
mod config;
mod connector;
mod curve;
mod error;
mod graph;
mod quadtree;
mod segment;
mod simulation;
mod svg;

pub use bundler::{calculate_edge_bundling, emit, BundleEvent, BundledEdge, EdgeBundler};
pub use chart::{ChartOptions, EdgeLayerOptions};
pub use config::BundleConfig;
pub use connector::{Connector, Rect};
pub use curve::{bundle_curve, PathCommand, PathData};
pub use error::BundleError;
pub use graph::{GraphInput, InputLink, InputNode};
pub use quadtree::{QuadCell, QuadTree};
pub use segment::{segment, segment_count, Bundle, SegmentLink, SimNode};
pub use simulation::{Simulation, SimulationState};
pub use svg::{render_chart_svg, render_svg, SvgOptions};

/// Result type for bundling operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// A 2D position.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
