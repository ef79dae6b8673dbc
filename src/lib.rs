//! Core library for the `albums-load` CLI.
//!
//! Provides the building blocks the binary is assembled from: album payload
//! generation, the weighted user behavior, CLI and config parsing, the HTTP
//! user swarm, and per-task metrics aggregation. The primary interface is the
//! `albums-load` command-line application.
pub mod albums;
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod shutdown;
pub mod user;
