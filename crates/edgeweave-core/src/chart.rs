//! Per-chart drawing options.
//!
//! A chart carries two independent edge layers plus a highlight style. The
//! editor persists these inside its setup file; here they only drive SVG output.

use serde::{Deserialize, Serialize};

/// Style and switches for one edge layer of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeLayerOptions {
    pub title: String,
    /// The layer is loaded at all.
    pub enabled: bool,
    /// The layer is drawn.
    pub visible: bool,
    /// Edges are bundled instead of drawn straight.
    pub bundled: bool,
    /// Any CSS colour.
    pub color: String,
    pub stroke_width: f64,
}

impl EdgeLayerOptions {
    fn with_style(color: &str, stroke_width: f64) -> Self {
        Self {
            title: String::new(),
            enabled: false,
            visible: false,
            bundled: false,
            color: color.to_string(),
            stroke_width,
        }
    }

    /// Defaults of the first edge layer.
    pub fn first() -> Self {
        Self::with_style("rgba(200,0,0,0.5)", 0.5)
    }

    /// Defaults of the second edge layer.
    pub fn second() -> Self {
        Self::with_style("rgba(0,0,200,0.5)", 0.5)
    }

    /// Style of highlighted edges.
    pub fn highlighted() -> Self {
        Self::with_style("rgba(0,155,100,0.75)", 3.0)
    }
}

impl Default for EdgeLayerOptions {
    fn default() -> Self {
        Self::first()
    }
}

/// Options of one chart on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub title: String,
    pub show_tooltip: bool,
    /// Node circle radius.
    pub default_node_size: f64,
    pub show_axis: bool,
    pub first_edges: EdgeLayerOptions,
    pub second_edges: EdgeLayerOptions,
    pub highlighted_edges: EdgeLayerOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            show_tooltip: true,
            default_node_size: 4.0,
            show_axis: true,
            first_edges: EdgeLayerOptions::first(),
            second_edges: EdgeLayerOptions::second(),
            highlighted_edges: EdgeLayerOptions::highlighted(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ChartOptions::default();
        assert_eq!(options.title, "Chart");
        assert_eq!(options.first_edges.color, "rgba(200,0,0,0.5)");
        assert_eq!(options.second_edges.color, "rgba(0,0,200,0.5)");
        assert_eq!(options.highlighted_edges.stroke_width, 3.0);
        assert!(!options.first_edges.bundled);
    }

    #[test]
    fn test_partial_layer_override() {
        let options: ChartOptions =
            serde_json::from_str(r#"{"second_edges":{"bundled":true,"stroke_width":2}}"#).unwrap();
        assert!(options.second_edges.bundled);
        assert_eq!(options.second_edges.stroke_width, 2.0);
        // Missing layer fields fall back to the generic layer default
        assert_eq!(options.second_edges.color, "rgba(200,0,0,0.5)");
        assert_eq!(options.first_edges, EdgeLayerOptions::first());
    }
}
