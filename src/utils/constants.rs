use std::time::Duration;

pub const DEFAULT_QUEUE_KEY: &str = "jobs";
pub const DEFAULT_REDIS_ADDR: &str = "localhost:6379";
pub const DEFAULT_REDIS_DB: i64 = 0;

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);
pub const DEFAULT_JOB_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_MAX_RETRY: u32 = 3;

/// Wait before a failed job is tried again. Constant, not per attempt.
pub const FALLBACK_DELAY: Duration = Duration::from_secs(2);
/// How long the binary waits for the worker after a stop signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub const DEFAULT_PAYLOAD: &str = "Hello from scheduler failed";
