//! Input graph supplied by the rendering layer.

use serde::{Deserialize, Serialize};

use crate::{BundleError, Point, Result};

/// A node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputNode {
    /// Optional caller-side identifier, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl InputNode {
    pub fn new(x: f64, y: f64) -> Self {
        Self { id: None, x, y }
    }

    pub fn with_id(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Some(id.into()),
            x,
            y,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// An edge between two nodes, by index into [`GraphInput::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputLink {
    pub source: usize,
    pub target: usize,
}

impl InputLink {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// Everything needed for one bundling run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub nodes: Vec<InputNode>,
    #[serde(default)]
    pub links: Vec<InputLink>,
    /// Diagonal of the drawing surface, used to normalize edge lengths.
    #[serde(default)]
    pub diagonal_length: f64,
}

impl GraphInput {
    /// Reject inputs that would otherwise turn into NaN positions.
    pub fn validate(&self) -> Result<()> {
        if !(self.diagonal_length.is_finite() && self.diagonal_length > 0.0) {
            return Err(BundleError::InvalidDiagonal(self.diagonal_length));
        }

        if let Some(node) = self
            .nodes
            .iter()
            .position(|n| !(n.x.is_finite() && n.y.is_finite()))
        {
            return Err(BundleError::NonFiniteCoordinate { node });
        }

        let node_count = self.nodes.len();
        for (link, l) in self.links.iter().enumerate() {
            for node in [l.source, l.target] {
                if node >= node_count {
                    return Err(BundleError::DanglingLink {
                        link,
                        node,
                        node_count,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> GraphInput {
        GraphInput {
            nodes: vec![InputNode::new(0.0, 0.0), InputNode::new(10.0, 0.0)],
            links: vec![InputLink::new(0, 1)],
            diagonal_length: 100.0,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(two_nodes().validate().is_ok());
    }

    #[test]
    fn test_dangling_link() {
        let mut input = two_nodes();
        input.links.push(InputLink::new(1, 7));
        assert_eq!(
            input.validate(),
            Err(BundleError::DanglingLink {
                link: 1,
                node: 7,
                node_count: 2
            })
        );
    }

    #[test]
    fn test_non_positive_diagonal() {
        let mut input = two_nodes();
        input.diagonal_length = 0.0;
        assert!(matches!(
            input.validate(),
            Err(BundleError::InvalidDiagonal(_))
        ));

        input.diagonal_length = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_non_finite_coordinate() {
        let mut input = two_nodes();
        input.nodes[1].y = f64::INFINITY;
        assert_eq!(
            input.validate(),
            Err(BundleError::NonFiniteCoordinate { node: 1 })
        );
    }

    #[test]
    fn test_deserialize_from_editor_json() {
        let input: GraphInput = serde_json::from_str(
            r#"{"nodes":[{"id":"a","x":1,"y":2},{"x":3,"y":4}],"links":[{"source":0,"target":1}],"diagonal_length":50}"#,
        )
        .unwrap();
        assert_eq!(input.nodes[0].id.as_deref(), Some("a"));
        assert_eq!(input.links[0], InputLink::new(0, 1));
    }
}
