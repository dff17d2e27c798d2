// src/worker.rs
use std::str::FromStr;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{ConfigError, StoreError};
use crate::executor::Executor;
use crate::job::{due_score, now_millis, Job};
use crate::shutdown::ShutdownSignal;
use crate::store::{DelayStore, ScoreBound};
use crate::utils::constants::{DEFAULT_INTERVAL, DEFAULT_QUEUE_KEY, FALLBACK_DELAY};

/// How the worker takes an entry off the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Range query for the earliest due entry, then remove it by value.
    ///
    /// The two calls are not atomic: two workers polling the same key can both
    /// read an entry before either removes it. Only safe with one worker per
    /// key. A worker that loses the remove skips the entry.
    #[default]
    TwoStep,
    /// Single atomic pop of the earliest due entry. Safe with several workers.
    AtomicPop,
}

impl FromStr for FetchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-step" | "two_step" | "twostep" => Ok(FetchMode::TwoStep),
            "atomic" | "atomic-pop" | "atomic_pop" => Ok(FetchMode::AtomicPop),
            _ => Err(ConfigError::Invalid {
                name: "FETCH_MODE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub key: String,
    /// Sleep between polls while nothing is ready or the store is failing.
    pub poll_interval: Duration,
    /// Delay before a failed job becomes ready again. Same for every attempt.
    pub fallback_delay: Duration,
    pub fetch_mode: FetchMode,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            key: DEFAULT_QUEUE_KEY.to_string(),
            poll_interval: DEFAULT_INTERVAL,
            fallback_delay: FALLBACK_DELAY,
            fetch_mode: FetchMode::default(),
        }
    }
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing due.
    Idle,
    /// Another consumer removed the fetched entry first; nothing was run.
    Lost,
    /// Entry could not be decoded and was dropped.
    Corrupt,
    Succeeded,
    /// Execution failed and the job was reinserted with this budget left.
    Retried { retries_remaining: u32 },
    /// Execution failed with no budget left; the job is gone.
    Exhausted,
    /// Execution failed but the retry could not be stored; the job is gone.
    Dropped,
    /// The store failed while fetching.
    StoreError,
}

enum Fetch {
    Empty,
    Lost(String),
    Taken(String),
}

/// Single-task consumer of the delay queue.
pub struct Worker<S, E> {
    store: S,
    executor: E,
    config: WorkerConfig,
}

impl<S: DelayStore, E: Executor> Worker<S, E> {
    pub fn new(store: S, executor: E, config: WorkerConfig) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Poll until `shutdown` fires. Only sleeps when nothing was due or the
    /// store failed; every other outcome polls again straight away.
    pub async fn run(&self, mut shutdown: ShutdownSignal) {
        info!(
            key = %self.config.key,
            interval = ?self.config.poll_interval,
            mode = ?self.config.fetch_mode,
            "worker started"
        );

        while !shutdown.is_triggered() {
            match self.poll_once().await {
                Step::Idle | Step::StoreError => {
                    tokio::select! {
                        _ = shutdown.triggered() => break,
                        _ = sleep(self.config.poll_interval) => {}
                    }
                }
                _ => {}
            }
        }

        info!(key = %self.config.key, "worker stopped");
    }

    /// One fetch / decode / execute / retry cycle.
    pub async fn poll_once(&self) -> Step {
        let raw = match self.fetch().await {
            Ok(Fetch::Taken(raw)) => raw,
            Ok(Fetch::Empty) => {
                debug!(key = %self.config.key, "no job ready");
                return Step::Idle;
            }
            Ok(Fetch::Lost(raw)) => {
                warn!(raw = %raw, "entry removed by another consumer, skipping");
                return Step::Lost;
            }
            Err(e) => {
                error!(error = %e, key = %self.config.key, "failed to read jobs");
                return Step::StoreError;
            }
        };

        let job = match Job::decode(&raw) {
            Ok(job) => job,
            Err(e) => {
                error!(error = %e, raw = %e.raw, "dropping corrupt job");
                return Step::Corrupt;
            }
        };

        match self.executor.execute(&job).await {
            Ok(()) => {
                info!(id = %job.id, "job succeeded");
                Step::Succeeded
            }
            Err(e) => {
                warn!(
                    id = %job.id,
                    error = %e,
                    retries_remaining = job.retries_remaining,
                    "job failed"
                );
                self.retry(job).await
            }
        }
    }

    async fn fetch(&self) -> Result<Fetch, StoreError> {
        let key = &self.config.key;
        let due = ScoreBound::Value(now_millis());

        match self.config.fetch_mode {
            FetchMode::AtomicPop => Ok(match self.store.pop_due(key, due).await? {
                Some(raw) => Fetch::Taken(raw),
                None => Fetch::Empty,
            }),
            FetchMode::TwoStep => {
                let Some(raw) = self
                    .store
                    .range_by_score(key, ScoreBound::NegInf, due, 0, 1)
                    .await?
                    .into_iter()
                    .next()
                else {
                    return Ok(Fetch::Empty);
                };

                // Remove before running so a slow job is not picked up again.
                if self.store.remove_by_value(key, &raw).await? == 0 {
                    return Ok(Fetch::Lost(raw));
                }
                Ok(Fetch::Taken(raw))
            }
        }
    }

    async fn retry(&self, mut job: Job) -> Step {
        if job.retries_remaining == 0 {
            error!(id = %job.id, attempts = job.attempts + 1, "job exhausted retries");
            return Step::Exhausted;
        }

        job.retries_remaining -= 1;
        job.attempts += 1;
        job.delay = self.config.fallback_delay;

        let data = match job.encode() {
            Ok(data) => data,
            Err(e) => {
                error!(id = %job.id, error = %e, "failed to encode job for retry, dropping");
                return Step::Dropped;
            }
        };

        let score = due_score(now_millis(), job.delay);
        if let Err(e) = self.store.insert(&self.config.key, &data, score).await {
            error!(id = %job.id, error = %e, "failed to reinsert job for retry, dropping");
            return Step::Dropped;
        }

        info!(
            id = %job.id,
            delay = ?job.delay,
            retries_remaining = job.retries_remaining,
            "retrying job"
        );
        Step::Retried {
            retries_remaining: job.retries_remaining,
        }
    }
}
