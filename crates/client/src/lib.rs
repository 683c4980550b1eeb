//! Client side of the vidgen job API.
//!
//! [`ApiClient`] wraps the server's `/api/v1/tasks` endpoints and
//! [`watch_until_settled`] keeps re-reading the job list until every job
//! has reached a terminal status. The `vidgen` binary is a thin CLI over
//! both.

pub mod api;
pub mod display;
pub mod watch;

pub use api::{ApiClient, ClientError};
pub use watch::{pending_count, watch_until_settled, WatchOutcome};
