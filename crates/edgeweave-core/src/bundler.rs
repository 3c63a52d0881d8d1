//! Entry points tying segmentation, simulation and curve emission together.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::curve::bundle_curve;
use crate::{
    segment, Bundle, BundleConfig, GraphInput, InputLink, InputNode, PathData, Point, Result,
    Simulation, SimulationState,
};

/// One input edge drawn as a bundled curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundledEdge {
    /// Index of the originating link in the input.
    pub link: usize,
    /// Index of the source node in the input.
    pub source_index: usize,
    /// Index of the target node in the input.
    pub target_index: usize,
    /// Position of the source node.
    pub source: Point,
    /// Position of the target node.
    pub target: Point,
    /// SVG path data of the smoothed chain.
    pub path: PathData,
}

/// Progress of a bundling run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BundleEvent {
    /// Curves after one simulation tick, for live rendering.
    Tick {
        tick: u32,
        alpha: f64,
        edges: Vec<BundledEdge>,
    },
    /// The simulation halted; `edges` is the authoritative result.
    Complete {
        ticks: u32,
        edges: Vec<BundledEdge>,
    },
}

/// Sample every path of `bundle` through the bundle spline.
///
/// The first and last entry of a path are always the input endpoints, so each
/// result maps back to its link by endpoint identity as well as by index.
pub fn emit(bundle: &Bundle, beta: f64) -> Vec<BundledEdge> {
    bundle
        .paths
        .iter()
        .enumerate()
        .map(|(link, path)| {
            let points = bundle.path_points(link);
            let source_index = path[0];
            let target_index = path[path.len() - 1];
            BundledEdge {
                link,
                source_index,
                target_index,
                source: points[0],
                target: points[points.len() - 1],
                path: bundle_curve(&points, beta),
            }
        })
        .collect()
}

/// Runs force-directed edge bundling with a fixed configuration.
///
/// Every call builds its own bundle and simulation, so one bundler can serve
/// any number of concurrent runs.
#[derive(Debug, Clone, Default)]
pub struct EdgeBundler {
    config: BundleConfig,
}

impl EdgeBundler {
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Bundle the edges of `input` and return the final curves.
    ///
    /// Yields to the scheduler between ticks. Inputs without links resolve
    /// immediately with no curves.
    pub async fn bundle(&self, input: &GraphInput) -> Result<Vec<BundledEdge>> {
        let Some(mut sim) = self.prepare(input)? else {
            return Ok(Vec::new());
        };

        while sim.step() == SimulationState::Running {
            tokio::task::yield_now().await;
        }

        info!(ticks = sim.iteration(), edges = input.links.len(), "layout complete");
        Ok(emit(sim.bundle(), self.config.curve_beta))
    }

    /// Like [`bundle`](Self::bundle), reporting a [`BundleEvent::Tick`] after
    /// every tick and a single [`BundleEvent::Complete`] at the end.
    pub async fn bundle_with<F>(
        &self,
        input: &GraphInput,
        mut on_event: F,
    ) -> Result<Vec<BundledEdge>>
    where
        F: FnMut(&BundleEvent),
    {
        match self.prepare(input)? {
            Some(sim) => Ok(drive(sim, self.config.curve_beta, &mut on_event).await),
            None => {
                on_event(&BundleEvent::Complete {
                    ticks: 0,
                    edges: Vec::new(),
                });
                Ok(Vec::new())
            }
        }
    }

    /// Start a run on the Tokio runtime and stream its events.
    ///
    /// Input errors are reported before anything is spawned. The channel
    /// closes after [`BundleEvent::Complete`]; dropping the receiver discards
    /// events but does not stop the run.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn stream(&self, input: &GraphInput) -> Result<mpsc::UnboundedReceiver<BundleEvent>> {
        let prepared = self.prepare(input)?;
        let (tx, rx) = mpsc::unbounded_channel();

        match prepared {
            Some(sim) => {
                let beta = self.config.curve_beta;
                tokio::spawn(async move {
                    let mut forward = |event: &BundleEvent| {
                        let _ = tx.send(event.clone());
                    };
                    drive(sim, beta, &mut forward).await;
                });
            }
            None => {
                let _ = tx.send(BundleEvent::Complete {
                    ticks: 0,
                    edges: Vec::new(),
                });
            }
        }

        Ok(rx)
    }

    /// Validate, segment and set up a simulation; `None` when there is nothing to bundle.
    fn prepare(&self, input: &GraphInput) -> Result<Option<Simulation>> {
        self.config.validate()?;
        input.validate()?;

        if input.links.is_empty() {
            debug!("no links to bundle");
            return Ok(None);
        }

        let bundle = segment(input, &self.config);
        Ok(Some(Simulation::new(bundle, self.config.clone())))
    }
}

async fn drive<F>(mut sim: Simulation, beta: f64, on_event: &mut F) -> Vec<BundledEdge>
where
    F: FnMut(&BundleEvent),
{
    loop {
        let state = sim.step();
        let edges = emit(sim.bundle(), beta);
        on_event(&BundleEvent::Tick {
            tick: sim.iteration(),
            alpha: sim.alpha(),
            edges: edges.clone(),
        });

        if state == SimulationState::Converged {
            info!(ticks = sim.iteration(), edges = edges.len(), "layout complete");
            on_event(&BundleEvent::Complete {
                ticks: sim.iteration(),
                edges: edges.clone(),
            });
            return edges;
        }

        tokio::task::yield_now().await;
    }
}

/// Bundle `links` between `nodes` with the default configuration.
pub async fn calculate_edge_bundling(
    nodes: Vec<InputNode>,
    links: Vec<InputLink>,
    diagonal_length: f64,
) -> Result<Vec<BundledEdge>> {
    let input = GraphInput {
        nodes,
        links,
        diagonal_length,
    };
    EdgeBundler::default().bundle(&input).await
}
