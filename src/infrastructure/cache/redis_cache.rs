use anyhow::Result;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use serde::{Serialize, de::DeserializeOwned};
use std::{future::Future, time::Duration};
use tracing::{debug, error, warn};

/// Short so a crashed fill cannot wedge the key.
const FILL_LOCK_TTL_SECONDS: u64 = 10;

/// 40 polls of 50ms: a peer gets two seconds to fill the key.
const FILL_POLL_INTERVAL: Duration = Duration::from_millis(50);
const FILL_POLL_ATTEMPTS: u32 = 40;

/// The fallback copy outlives the fresh key by this much.
const FALLBACK_GRACE_SECONDS: u64 = 60;

fn fallback_key(key: &str) -> String {
    format!("{}:fallback", key)
}

fn fill_lock_key(key: &str) -> String {
    format!("{}:filling", key)
}

/// JSON values in Redis with TTLs, plus a fetch-through helper.
///
/// Holds the client only; each call opens a multiplexed connection so an
/// unreachable Redis fails the call instead of the whole service.
pub struct RedisCache {
    client: Client,
}

impl RedisCache {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn.get(key).await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(Into::into)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn
            .set_ex(key, serde_json::to_string(value)?, ttl_seconds)
            .await?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    /// Writes the fresh value and its longer-lived fallback in one round trip.
    async fn store_with_fallback<T: Serialize>(
        &self,
        conn: &mut MultiplexedConnection,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let _: () = redis::pipe()
            .set_ex(key, &json, ttl_seconds)
            .ignore()
            .set_ex(fallback_key(key), &json, ttl_seconds + FALLBACK_GRACE_SECONDS)
            .ignore()
            .query_async(conn)
            .await?;
        Ok(())
    }

    /// `SET NX EX` on the fill lock. A Redis error counts as not acquired.
    async fn try_claim_fill(&self, conn: &mut MultiplexedConnection, key: &str) -> bool {
        let claimed: redis::RedisResult<Option<String>> = redis::cmd("SET")
            .arg(fill_lock_key(key))
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(FILL_LOCK_TTL_SECONDS)
            .query_async(conn)
            .await;
        match claimed {
            Ok(reply) => reply.is_some(),
            Err(e) => {
                error!(key, error = %e, "fill lock unavailable");
                false
            }
        }
    }

    /// Polls until a peer fills `key`, then tries the fallback copy.
    async fn wait_for_peer<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        for attempt in 0..FILL_POLL_ATTEMPTS {
            tokio::time::sleep(FILL_POLL_INTERVAL).await;
            match self.get::<T>(key).await {
                Ok(Some(value)) => {
                    debug!(key, attempt, "filled by peer");
                    return Some(value);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(key, attempt, error = %e, "redis failed while waiting for peer");
                    break;
                }
            }
        }

        match self.get::<T>(&fallback_key(key)).await {
            Ok(Some(value)) => {
                warn!(key, "serving fallback copy");
                Some(value)
            }
            Ok(None) => None,
            Err(e) => {
                error!(key, error = %e, "fallback read failed");
                None
            }
        }
    }

    /// Fetch-through read where only one caller refills a missing key.
    ///
    /// Callers that lose the fill lock wait for the winner, then use the
    /// fallback copy, then fetch on their own. Any Redis failure degrades to
    /// a direct fetch; errors from `fetch` always propagate.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl_seconds: u64, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut conn = match self.connection().await {
            Ok(conn) => conn,
            Err(e) => {
                error!(key, error = %e, "redis unreachable, bypassing cache");
                return fetch().await;
            }
        };

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    debug!(key, "cache hit");
                    return Ok(value);
                }
                Err(e) => warn!(key, error = %e, "cached value unreadable, refilling"),
            },
            Ok(None) => debug!(key, "cache miss"),
            Err(e) => {
                error!(key, error = %e, "redis read failed, bypassing cache");
                return fetch().await;
            }
        }

        if !self.try_claim_fill(&mut conn, key).await {
            if let Some(value) = self.wait_for_peer(key).await {
                return Ok(value);
            }
            warn!(key, "no peer fill, fetching directly");
            return fetch().await;
        }

        let fetched = fetch().await;
        if let Ok(value) = &fetched {
            if let Err(e) = self
                .store_with_fallback(&mut conn, key, value, ttl_seconds)
                .await
            {
                error!(key, error = %e, "cache write failed, value served uncached");
            }
        }
        if let Err(e) = conn.del::<_, ()>(fill_lock_key(key)).await {
            warn!(key, error = %e, "fill lock release failed, expires in {}s", FILL_LOCK_TTL_SECONDS);
        }
        fetched
    }
}
