use std::time::Duration;

/// Default delay between two status reads of the same job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of consecutive failed poll iterations before giving up.
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Tunable parameters for background polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay before each status read.
    pub interval: Duration,
    /// A job is marked `ERROR` after this many failures in a row.
    /// Values below 1 behave as 1.
    pub max_consecutive_failures: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}
