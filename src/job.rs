// src/job.rs
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A unit of delayed work.
///
/// Stored as JSON, so a job pulled out of Redis by hand stays readable:
/// `{"id":"…","payload":"…","delay_ms":3000,"retries_remaining":3,"attempts":0}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Left empty by callers that want the scheduler to generate one.
    #[serde(default)]
    pub id: String,
    pub payload: String,
    #[serde(rename = "delay_ms", with = "duration_ms")]
    pub delay: Duration,
    pub retries_remaining: u32,
    /// Failed executions so far.
    #[serde(default)]
    pub attempts: u32,
}

impl Job {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            payload: payload.into(),
            delay: Duration::ZERO,
            retries_remaining: 0,
            attempts: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_retry(mut self, max_retry: u32) -> Self {
        self.retries_remaining = max_retry;
        self
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(raw).map_err(|source| DecodeError {
            raw: raw.to_string(),
            source,
        })
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Score for an entry that becomes ready `delay` after `now`.
pub fn due_score(now: i64, delay: Duration) -> i64 {
    let delay = i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);
    now.saturating_add(delay)
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
