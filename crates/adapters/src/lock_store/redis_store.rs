// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis lock store
//!
//! `SET key token NX PX ttl` for acquisition and a compare-and-delete Lua
//! script for release, both single round-trips executed atomically by Redis.

use super::{LockStore, LockStoreError};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{Client, RedisError, Script};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

const RELEASE_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
else
    return 0
end
"#;

/// One Redis instance used as a lock store
#[derive(Clone)]
pub struct RedisLockStore {
    name: String,
    client: Client,
    release: Arc<Script>,
    // Connected lazily so a store that is down at startup can join later
    conn: Arc<Mutex<Option<MultiplexedConnection>>>,
}

impl RedisLockStore {
    /// Parse `url` without connecting
    pub fn open(url: &str) -> Result<Self, LockStoreError> {
        let client = Client::open(url).map_err(|e| LockStoreError::Protocol {
            store: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: url.to_string(),
            client,
            release: Arc::new(Script::new(RELEASE_SCRIPT)),
            conn: Arc::new(Mutex::new(None)),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, LockStoreError> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| LockStoreError::Unreachable {
                store: self.name.clone(),
                reason: e.to_string(),
            })?;
        *slot = Some(conn.clone());
        Ok(conn)
    }

    /// Map a command error; drops the cached connection on I/O failures
    async fn command_error(&self, e: RedisError) -> LockStoreError {
        if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
            *self.conn.lock().await = None;
            LockStoreError::Unreachable {
                store: self.name.clone(),
                reason: e.to_string(),
            }
        } else {
            LockStoreError::Protocol {
                store: self.name.clone(),
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn try_set(
        &self,
        key: &str,
        token: &str,
        ttl: Duration,
    ) -> Result<bool, LockStoreError> {
        let mut conn = self.connection().await?;
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);

        let reply: Result<Option<String>, RedisError> = redis::cmd("SET")
            .arg(key)
            .arg(token)
            .arg("NX")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await;

        match reply {
            Ok(reply) => Ok(reply.is_some()),
            Err(e) => Err(self.command_error(e).await),
        }
    }

    async fn try_delete(&self, key: &str, token: &str) -> Result<bool, LockStoreError> {
        let mut conn = self.connection().await?;

        let deleted: Result<i64, RedisError> = self
            .release
            .key(key)
            .arg(token)
            .invoke_async(&mut conn)
            .await;

        match deleted {
            Ok(deleted) => Ok(deleted == 1),
            Err(e) => Err(self.command_error(e).await),
        }
    }
}
