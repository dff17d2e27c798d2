//! Typed configuration from environment variables.
//!
//! Every value has a fallback default. Malformed numbers and durations fall
//! back too, with a warning; an unknown `FETCH_MODE` is an error.

use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::utils::constants::{
    DEFAULT_INTERVAL, DEFAULT_JOB_DELAY, DEFAULT_MAX_RETRY, DEFAULT_QUEUE_KEY, DEFAULT_REDIS_ADDR,
    DEFAULT_REDIS_DB, FALLBACK_DELAY,
};
use crate::utils::duration::parse_duration;
use crate::worker::{FetchMode, WorkerConfig};

#[derive(Debug, Clone)]
pub struct Config {
    /// `host:port`, or a complete `redis://` / `rediss://` URL.
    pub redis_addr: String,
    pub redis_db: i64,
    /// Sorted-set key holding the queue.
    pub queue_key: String,
    pub interval: Duration,
    pub job_delay: Duration,
    pub job_max_retry: u32,
    pub fetch_mode: FetchMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_addr: DEFAULT_REDIS_ADDR.to_string(),
            redis_db: DEFAULT_REDIS_DB,
            queue_key: DEFAULT_QUEUE_KEY.to_string(),
            interval: DEFAULT_INTERVAL,
            job_delay: DEFAULT_JOB_DELAY,
            job_max_retry: DEFAULT_MAX_RETRY,
            fetch_mode: FetchMode::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any name → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let fetch_mode = match lookup("FETCH_MODE") {
            Some(value) => value.parse()?,
            None => defaults.fetch_mode,
        };

        Ok(Self {
            redis_addr: lookup("REDIS_ADDR").unwrap_or(defaults.redis_addr),
            redis_db: parsed(&lookup, "REDIS_DB", defaults.redis_db, |v| v.parse().ok()),
            queue_key: lookup("QUEUE_KEY")
                .filter(|key| !key.trim().is_empty())
                .unwrap_or(defaults.queue_key),
            interval: parsed(&lookup, "INTERVAL", defaults.interval, parse_duration),
            job_delay: parsed(&lookup, "JOB_DELAY", defaults.job_delay, parse_duration),
            job_max_retry: parsed(&lookup, "JOB_MAX_RETRY", defaults.job_max_retry, |v| {
                v.parse().ok()
            }),
            fetch_mode,
        })
    }

    /// Connection URL for [`crate::RedisStore::connect`].
    pub fn redis_url(&self) -> String {
        if self.redis_addr.starts_with("redis://") || self.redis_addr.starts_with("rediss://") {
            self.redis_addr.clone()
        } else {
            format!("redis://{}/{}", self.redis_addr, self.redis_db)
        }
    }

    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            key: self.queue_key.clone(),
            poll_interval: self.interval,
            fallback_delay: FALLBACK_DELAY,
            fetch_mode: self.fetch_mode,
        }
    }
}

fn parsed<F, T, P>(lookup: &F, name: &str, default: T, parse: P) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::fmt::Debug,
    P: Fn(&str) -> Option<T>,
{
    let Some(raw) = lookup(name) else {
        return default;
    };
    match parse(raw.trim()) {
        Some(value) => value,
        None => {
            warn!(name, value = %raw, fallback = ?default, "invalid config value, using default");
            default
        }
    }
}
