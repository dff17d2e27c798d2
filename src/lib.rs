//! # delayq
//!
//! Minimal delayed-job scheduler backed by a score-ordered store.
//!
//! Producers ([`Scheduler`]) insert serialized [`Job`]s into a sorted set with
//! a due-time score. A single [`Worker`] polls for the earliest due entry,
//! removes it, runs it through an [`Executor`] and, on failure, reinserts it
//! with a fixed fallback delay until its retry budget runs out.

pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod scheduler;
pub mod shutdown;
pub mod store;
pub mod telemetry;
pub mod utils;
pub mod worker;

pub use config::Config;
pub use error::{ConfigError, DecodeError, EnqueueError, StoreError};
pub use executor::{Executor, FnExecutor, SentinelExecutor};
pub use job::Job;
pub use scheduler::Scheduler;
pub use shutdown::{Shutdown, ShutdownSignal};
pub use store::{DelayStore, MemoryStore, RedisStore, ScoreBound};
pub use worker::{FetchMode, Step, Worker, WorkerConfig};
