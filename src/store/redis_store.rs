// src/store/redis_store.rs
use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, Script};

use super::{DelayStore, ScoreBound};
use crate::error::StoreError;

const POP_DUE_SCRIPT: &str = r"
local items = redis.call('ZRANGEBYSCORE', KEYS[1], '-inf', ARGV[1], 'LIMIT', 0, 1)
if #items == 0 then
    return false
end
redis.call('ZREM', KEYS[1], items[1])
return items[1]
";

/// Sorted-set store on a shared multiplexed Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
}

impl RedisStore {
    /// Open a multiplexed connection. `rediss://` URLs go over TLS.
    pub async fn connect(redis_url: &str) -> Result<Self, StoreError> {
        let client = Client::open(redis_url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, ()>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl DelayStore for RedisStore {
    async fn insert(&self, key: &str, value: &str, score: i64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.zadd::<_, _, _, ()>(key, value, score).await?;
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
        let mut conn = self.conn.clone();
        let offset = isize::try_from(offset).unwrap_or(isize::MAX);
        let limit = isize::try_from(limit).unwrap_or(isize::MAX);
        let members: Vec<String> = conn
            .zrangebyscore_limit(key, min.as_arg(), max.as_arg(), offset, limit)
            .await?;
        Ok(members)
    }

    async fn remove_by_value(&self, key: &str, value: &str) -> Result<usize, StoreError> {
        let mut conn = self.conn.clone();
        let removed: usize = conn.zrem(key, value).await?;
        Ok(removed)
    }

    async fn pop_due(&self, key: &str, max: ScoreBound) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let member: Option<String> = Script::new(POP_DUE_SCRIPT)
            .key(key)
            .arg(max.as_arg())
            .invoke_async(&mut conn)
            .await?;
        Ok(member)
    }

    async fn len(&self, key: &str) -> Result<usize, StoreError> {
        let mut conn = self.conn.clone();
        let count: usize = conn.zcard(key).await?;
        Ok(count)
    }

    async fn count_by_score(
        &self,
        key: &str,
        min: ScoreBound,
        max: ScoreBound,
    ) -> Result<usize, StoreError> {
        let mut conn = self.conn.clone();
        let count: usize = conn.zcount(key, min.as_arg(), max.as_arg()).await?;
        Ok(count)
    }
}
