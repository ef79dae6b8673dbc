//! Simulated user behavior: the weighted task table, the wait-time policy,
//! and the per-profile response handling.
mod behavior;
mod profile;
mod task;
mod wait;


pub use behavior::{TaskAction, UserBehavior};
pub use profile::UserProfile;
pub use task::{AlbumIds, TaskKind, TaskSet, TaskWeights};
pub use wait::WaitTime;
