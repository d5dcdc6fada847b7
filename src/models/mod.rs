//! Typed models backing the bootstrap.
pub mod config;
pub mod environment;
