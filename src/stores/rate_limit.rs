//! Sliding-window rate limiting for Redis.

use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

/// Rate limiter trait for per-client windowed counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check the counter for `client_key` in the current window and, if
    /// under `limit`, record this request. A rejected request is not
    /// counted. `now_epoch_secs` determines the window index.
    async fn check(
        &self,
        client_key: &str,
        limit: i64,
        window_secs: u64,
        now_epoch_secs: i64,
    ) -> Result<RateLimitResult>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Under the limit, includes count after this request.
    Allowed(i64),
    /// Over the limit, includes the standing count.
    Exceeded(i64),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }
}

/// Redis implementation of RateLimiter.
#[derive(Clone)]
pub struct RedisRateLimiter {
    client: redis::Client,
}

impl RedisRateLimiter {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn window_key(client_key: &str, window_secs: u64, now_epoch_secs: i64) -> String {
        let window_idx = now_epoch_secs / window_secs as i64;
        format!("ratelimit:{}:{}", client_key, window_idx)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        client_key: &str,
        limit: i64,
        window_secs: u64,
        now_epoch_secs: i64,
    ) -> Result<RateLimitResult> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::window_key(client_key, window_secs, now_epoch_secs);

        // Read first: a rejected request must not advance the counter.
        let standing: Option<i64> = conn.get(&key).await?;
        if standing.unwrap_or(0) >= limit {
            return Ok(RateLimitResult::Exceeded(standing.unwrap_or(0)));
        }

        let count: i64 = redis::cmd("INCR").arg(&key).query_async(&mut conn).await?;
        if count == 1 {
            // Counter outlives its window so late stragglers still see it
            let _: () = redis::cmd("EXPIRE")
                .arg(&key)
                .arg(window_secs * 2)
                .query_async(&mut conn)
                .await?;
        }

        Ok(RateLimitResult::Allowed(count))
    }
}
