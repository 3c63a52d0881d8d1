//! Standalone SVG rendering of bundled edges.

use std::fmt::Write;

use crate::{BundledEdge, ChartOptions, EdgeLayerOptions, InputNode, PathCommand, PathData};

/// Canvas and style for [`render_svg`].
#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub width: f64,
    pub height: f64,
    /// Layer switches and styles; nodes use `default_node_size`.
    pub chart: ChartOptions,
    /// Links of the first layer (by input index) drawn with the highlight style, on top.
    pub highlighted: Vec<usize>,
}

impl Default for SvgOptions {
    /// The first layer is shown bundled, the second stays off.
    fn default() -> Self {
        let mut chart = ChartOptions::default();
        chart.first_edges.enabled = true;
        chart.first_edges.visible = true;
        chart.first_edges.bundled = true;

        Self {
            width: 800.0,
            height: 600.0,
            chart,
            highlighted: Vec::new(),
        }
    }
}

/// Render one layer of edges and their nodes as an SVG document.
pub fn render_svg(edges: &[BundledEdge], nodes: &[InputNode], options: &SvgOptions) -> String {
    render_chart_svg(edges, &[], nodes, options)
}

/// Render both edge layers of a chart.
///
/// A layer is drawn only when it is `enabled` and `visible`. Layers that are
/// not `bundled` are drawn as straight lines between their endpoints.
pub fn render_chart_svg(
    first: &[BundledEdge],
    second: &[BundledEdge],
    nodes: &[InputNode],
    options: &SvgOptions,
) -> String {
    let chart = &options.chart;
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = options.width,
        h = options.height
    );

    write_edge_group(&mut out, "second-edges", second, &chart.second_edges);

    let (plain, highlighted): (Vec<BundledEdge>, Vec<BundledEdge>) = first
        .iter()
        .cloned()
        .partition(|e| !options.highlighted.contains(&e.link));
    write_edge_group(&mut out, "edges", &plain, &chart.first_edges);

    // Highlights keep the first layer's switches and shape, with their own stroke
    let highlight_style = EdgeLayerOptions {
        color: chart.highlighted_edges.color.clone(),
        stroke_width: chart.highlighted_edges.stroke_width,
        ..chart.first_edges.clone()
    };
    write_edge_group(&mut out, "highlighted-edges", &highlighted, &highlight_style);

    let _ = writeln!(out, r#"  <g class="nodes">"#);
    for node in nodes {
        let _ = write!(
            out,
            r#"    <circle cx="{}" cy="{}" r="{}""#,
            node.x, node.y, chart.default_node_size
        );
        if let Some(id) = &node.id {
            let _ = write!(out, r#" data-id="{}""#, escape(id));
        }
        out.push_str("/>\n");
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

fn write_edge_group(
    out: &mut String,
    class: &str,
    edges: &[BundledEdge],
    style: &EdgeLayerOptions,
) {
    if edges.is_empty() || !style.enabled || !style.visible {
        return;
    }
    let _ = writeln!(
        out,
        r#"  <g class="{}" fill="none" stroke="{}" stroke-width="{}">"#,
        class,
        escape(&style.color),
        style.stroke_width
    );
    for edge in edges {
        let _ = write!(out, r#"    <path data-link="{}" d=""#, edge.link);
        if style.bundled {
            let _ = write!(out, "{}", edge.path);
        } else {
            let _ = write!(out, "{}", straight(edge));
        }
        out.push_str("\"/>\n");
    }
    out.push_str("  </g>\n");
}

fn straight(edge: &BundledEdge) -> PathData {
    let mut path = PathData::new();
    path.push(PathCommand::MoveTo(edge.source));
    path.push(PathCommand::LineTo(edge.target));
    path
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
