//! CLI command implementations.

pub mod cast;
pub mod config;
