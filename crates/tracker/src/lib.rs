//! Job tracking: submission, background polling, and persistence.
//!
//! [`JobTracker`] submits a job to the generation service, persists its
//! first observation, and hands the job to a background poll task owned by
//! the [`PollRegistry`]. Each poll task is the only writer for its job id
//! and runs until the job settles, repeated failures make it give up, or the
//! registry is shut down.

pub mod config;
pub mod error;
pub mod poller;
pub mod registry;
pub mod tracker;

pub use config::PollConfig;
pub use error::{PollError, TrackerError};
pub use poller::PollOutcome;
pub use registry::PollRegistry;
pub use tracker::JobTracker;
