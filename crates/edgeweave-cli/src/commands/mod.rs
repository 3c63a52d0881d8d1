//! CLI command implementations.

pub mod bundle;
pub mod config;
pub mod serve;
