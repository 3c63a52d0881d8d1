//! Bundle command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use edgeweave_api::BundleResponse;
use edgeweave_core::{render_svg, BundleEvent, EdgeBundler, GraphInput, Rect, SvgOptions};
use tracing::info;

use crate::config::Config;

/// Output format for bundled edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Svg,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "svg" => Ok(Self::Svg),
            _ => anyhow::bail!("Unknown format: {}. Use 'json' or 'svg'", s),
        }
    }
}

/// Bundle the graph in `input` and write the result.
///
/// `canvas` is the drawing surface (width, height); it supplies the diagonal
/// when the input has none and sizes the SVG.
pub async fn execute(
    config: &Config,
    input: &Path,
    output: Option<PathBuf>,
    format: OutputFormat,
    canvas: Option<(f64, f64)>,
) -> Result<()> {
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read graph from {}", input.display()))?;
    let mut graph: GraphInput = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse graph from {}", input.display()))?;

    if graph.diagonal_length == 0.0 {
        if let Some((width, height)) = canvas {
            graph.diagonal_length = Rect::new(0.0, 0.0, width, height).diagonal();
        }
    }

    info!(
        nodes = graph.nodes.len(),
        links = graph.links.len(),
        diagonal = graph.diagonal_length,
        "Bundling graph"
    );

    let mut ticks = 0;
    let edges = EdgeBundler::new(config.bundle.clone())
        .bundle_with(&graph, |event| {
            if let BundleEvent::Complete { ticks: total, .. } = event {
                ticks = *total;
            }
        })
        .await
        .with_context(|| format!("Failed to bundle {}", input.display()))?;

    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&BundleResponse { edges, ticks })? + "\n"
        }
        OutputFormat::Svg => {
            let mut options = SvgOptions::default();
            if let Some((width, height)) = canvas {
                options.width = width;
                options.height = height;
            }
            render_svg(&edges, &graph.nodes, &options)
        }
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} bundled edges to {}", graph.links.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
