//! HTTP client construction, album request execution, and the user swarm.
mod client;
mod execution;
mod swarm;


pub use client::{AlbumsEndpoint, build_client};
pub use execution::{Observation, TaskOutcome, execute_action};
pub use swarm::{SwarmSettings, setup_swarm};
