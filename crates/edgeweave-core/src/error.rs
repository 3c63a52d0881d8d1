//! Error types for edge bundling.

use thiserror::Error;

/// Errors reported before a bundling run starts.
///
/// Once the input passes validation the simulation itself cannot fail: it
/// always cools down to its halting threshold.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BundleError {
    /// The drawing surface diagonal is not a positive finite number.
    #[error("diagonal length must be positive and finite, got {0}")]
    InvalidDiagonal(f64),

    /// A link references a node index outside the node list.
    #[error("link {link} references node {node}, but only {node_count} nodes were given")]
    DanglingLink {
        link: usize,
        node: usize,
        node_count: usize,
    },

    /// A node has a NaN or infinite coordinate.
    #[error("node {node} has a non-finite coordinate")]
    NonFiniteCoordinate { node: usize },

    /// The tuning parameters cannot produce a halting simulation.
    #[error("invalid bundle configuration: {0}")]
    InvalidConfig(String),
}
