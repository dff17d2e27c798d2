//! Error types for delayq.

use thiserror::Error;

/// Failure talking to the ordered store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Why a producer could not enqueue a job.
#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("failed to encode job: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to insert job: {0}")]
    Store(#[from] StoreError),
}

/// A stored entry that does not decode into a job.
#[derive(Debug, Error)]
#[error("corrupt queue entry: {source}")]
pub struct DecodeError {
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
