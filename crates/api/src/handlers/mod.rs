//! Request handlers.
//!
//! Handlers delegate to the [`vidgen_tracker::JobTracker`] held in
//! [`crate::state::AppState`] and map errors via [`crate::error::AppError`].

pub mod tasks;
