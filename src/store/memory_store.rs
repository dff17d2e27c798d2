// src/store/memory_store.rs
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{DelayStore, ScoreBound};
use crate::error::StoreError;

/// In-process sorted sets with Redis ordering rules: ascending score, ties
/// broken by member bytes. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    sets: Arc<Mutex<HashMap<String, SortedSet>>>,
}

#[derive(Default)]
struct SortedSet {
    scores: HashMap<String, i64>,
    ordered: BTreeSet<(i64, String)>,
}

impl SortedSet {
    fn insert(&mut self, member: &str, score: i64) {
        if let Some(old) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&(old, member.to_string()));
        }
        self.ordered.insert((score, member.to_string()));
    }

    fn remove(&mut self, member: &str) -> usize {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&(score, member.to_string()));
                1
            }
            None => 0,
        }
    }

    fn range(&self, min: ScoreBound, max: ScoreBound) -> impl Iterator<Item = &(i64, String)> {
        self.ordered
            .iter()
            .skip_while(move |(score, _)| !min.admits_from_below(*score))
            .take_while(move |(score, _)| max.admits_from_above(*score))
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score of `member` in the set at `key`, if present.
    pub fn score(&self, key: &str, member: &str) -> Option<i64> {
        let sets = self.sets.lock().ok()?;
        sets.get(key)?.scores.get(member).copied()
    }

    /// Snapshot of `(score, member)` pairs in store order.
    pub fn entries(&self, key: &str) -> Vec<(i64, String)> {
        self.sets
            .lock()
            .ok()
            .and_then(|sets| sets.get(key).map(|set| set.ordered.iter().cloned().collect()))
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SortedSet>>, StoreError> {
        self.sets
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DelayStore for MemoryStore {
    async fn insert(&self, key: &str, value: &str, score: i64) -> Result<(), StoreError> {
        self.lock()?
            .entry(key.to_string())
            .or_default()
            .insert(value, score);
        Ok(())
    }

    async fn range_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<String>, StoreError> {
        let sets = self.lock()?;
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };
        Ok(set
            .range(min, max)
            .skip(offset)
            .take(limit)
            .map(|(_, member)| member.clone())
            .collect())
    }

    async fn remove_by_value(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        Ok(self
            .lock()?
            .get_mut(key)
            .map_or(0, |set| set.remove(value)))
    }

    async fn pop_due(&self, key: &str, max: ScoreBound) -> Result<Option<String>, StoreError> {
        let mut sets = self.lock()?;
        let Some(set) = sets.get_mut(key) else {
            return Ok(None);
        };
        let first = set
            .range(ScoreBound::NegInf, max)
            .next()
            .map(|(_, member)| member.clone());
        if let Some(member) = &first {
            set.remove(member);
        }
        Ok(first)
    }

    async fn len(&self, key: &str) -> Result<usize, StoreError> {
        Ok(self.lock()?.get(key).map_or(0, |set| set.scores.len()))
    }

    async fn count_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Result<usize, StoreError> {
        Ok(self
            .lock()?
            .get(key)
            .map_or(0, |set| set.range(min, max).count()))
    }
}
