// src/scheduler.rs
use chrono::{DateTime, Utc};
use nanoid::nanoid;
use tracing::debug;

use crate::error::{EnqueueError, StoreError};
use crate::job::{due_score, now_millis, Job};
use crate::store::{DelayStore, ScoreBound};

/// Producer side of the delay queue. Holds no state besides the store handle,
/// so clones can enqueue concurrently.
#[derive(Clone)]
pub struct Scheduler<S> {
    store: S,
    key: String,
}

impl<S: DelayStore> Scheduler<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Enqueues a job to become ready `job.delay` from now.
    ///
    /// Generates an id when `job.id` is empty and returns the id the job was
    /// stored under.
    pub async fn enqueue(&self, mut job: Job) -> Result<String, EnqueueError> {
        if job.id.is_empty() {
            job.id = nanoid!();
        }

        let score = due_score(now_millis(), job.delay);
        let data = job.encode().map_err(EnqueueError::Encode)?;
        self.store.insert(&self.key, &data, score).await?;

        debug!(id = %job.id, score, delay = ?job.delay, "enqueued job");
        Ok(job.id)
    }

    /// Enqueues a job to become ready at `due`. Times in the past make the job
    /// ready immediately.
    pub async fn enqueue_at(&self, job: Job, due: DateTime<Utc>) -> Result<String, EnqueueError> {
        let delay = (due - Utc::now()).to_std().unwrap_or_default();
        self.enqueue(job.with_delay(delay)).await
    }

    /// Entries in the queue, due or not.
    pub async fn pending(&self) -> Result<usize, StoreError> {
        self.store.len(&self.key).await
    }

    /// Entries whose due time has passed.
    pub async fn ready(&self) -> Result<usize, StoreError> {
        self.store
            .count_by_score(&self.key, ScoreBound::NegInf, ScoreBound::Value(now_millis()))
            .await
    }
}
