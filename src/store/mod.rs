//! The ordered store behind the delay queue.
//!
//! Producers and the worker share nothing but a sorted set: members are
//! serialized jobs, scores are due times in epoch milliseconds. Everything
//! they need goes through [`DelayStore`], so the queue runs the same against
//! Redis ([`RedisStore`]) or in process ([`MemoryStore`]).

mod memory_store;
mod redis_store;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;

use crate::error::StoreError;

/// One end of an inclusive score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBound {
    NegInf,
    PosInf,
    Value(i64),
}

impl ScoreBound {
    /// Redis syntax for this bound (`-inf`, `+inf` or the number).
    pub fn as_arg(&self) -> String {
        match self {
            ScoreBound::NegInf => "-inf".to_string(),
            ScoreBound::PosInf => "+inf".to_string(),
            ScoreBound::Value(v) => v.to_string(),
        }
    }

    /// True when `score` is not below this bound used as a minimum.
    pub(crate) fn admits_from_below(&self, score: i64) -> bool {
        match self {
            ScoreBound::NegInf => true,
            ScoreBound::PosInf => false,
            ScoreBound::Value(v) => *v <= score,
        }
    }

    /// True when `score` is not above this bound used as a maximum.
    pub(crate) fn admits_from_above(&self, score: i64) -> bool {
        match self {
            ScoreBound::NegInf => false,
            ScoreBound::PosInf => true,
            ScoreBound::Value(v) => *v >= score,
        }
    }
}

#[async_trait]
pub trait DelayStore: Send + Sync {
    /// Add `value` to the set at `key` with `score`. An existing identical
    /// member only has its score updated.
    async fn insert(&self, key: &str, value: &str, score: i64) -> Result<(), StoreError>;

    /// Members with `min <= score <= max` in ascending score order, skipping
    /// `offset` and returning at most `limit`.
    async fn range_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, StoreError>;

    /// Remove `value` from the set. Returns how many members were removed.
    async fn remove_by_value(&self, key: &str, value: &str) -> Result<usize, StoreError>;

    /// Atomically remove and return the lowest-scored member whose score is
    /// at most `max`.
    async fn pop_due(&self, key: &str, max: ScoreBound) -> Result<Option<String>, StoreError>;

    async fn len(&self, key: &str) -> Result<usize, StoreError>;

    async fn count_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Result<usize, StoreError>;
}

#[async_trait]
impl<S: DelayStore + ?Sized> DelayStore for std::sync::Arc<S> {
    async fn insert(&self, key: &str, value: &str, score: i64) -> Result<(), StoreError> {
        (**self).insert(key, value, score).await
    }

    async fn range_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        (**self).range_by_score(key, min, max, offset, limit).await
    }

    async fn remove_by_value(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        (**self).remove_by_value(key, value).await
    }

    async fn pop_due(&self, key: &str, max: ScoreBound) -> Result<Option<String>, StoreError> {
        (**self).pop_due(key, max).await
    }

    async fn len(&self, key: &str) -> Result<usize, StoreError> {
        (**self).len(key).await
    }

    async fn count_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Result<usize, StoreError> {
        (**self).count_by_score(key, min, max).await
    }
}
