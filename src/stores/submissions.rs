//! Submission storage for Redis.

use anyhow::Result;
use async_trait::async_trait;
use redis::AsyncCommands;

use crate::models::Submission;

/// Store for submission records and slot claims.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Health check - verify store connectivity.
    async fn health_check(&self) -> Result<bool>;

    /// Store a submission with a retention TTL.
    async fn put(&self, submission: &Submission, ttl_secs: u64) -> Result<()>;

    /// Get a submission by id.
    async fn get(&self, id: &str) -> Result<Option<Submission>>;

    /// Delete a submission by id (returns true if it existed).
    async fn delete(&self, id: &str) -> Result<bool>;

    /// List all live submissions, in no particular order.
    async fn list(&self) -> Result<Vec<Submission>>;

    /// Atomically claim a time slot for a submission. Returns false when
    /// the slot is already held - the conditional insert is the
    /// double-booking guard, there is no separate scan.
    async fn claim_slot(&self, slot: &str, submission_id: &str, ttl_secs: u64) -> Result<bool>;

    /// Release a previously claimed slot.
    async fn release_slot(&self, slot: &str) -> Result<()>;
}

/// Redis implementation of SubmissionStore.
#[derive(Clone)]
pub struct RedisSubmissionStore {
    client: redis::Client,
}

impl RedisSubmissionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn submission_key(id: &str) -> String {
        format!("submission:{}", id)
    }

    fn slot_key(slot: &str) -> String {
        format!("slot:{}", slot)
    }
}

#[async_trait]
impl SubmissionStore for RedisSubmissionStore {
    async fn health_check(&self) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let result: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(result == "PONG")
    }

    async fn put(&self, submission: &Submission, ttl_secs: u64) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::submission_key(&submission.id);
        let json = serde_json::to_string(submission)?;

        let _: () = conn.set(&key, &json).await?;
        let _: () = conn.expire(&key, ttl_secs as i64).await?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Submission>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json: Option<String> = conn.get(Self::submission_key(id)).await?;

        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let deleted: i64 = conn.del(Self::submission_key(id)).await?;
        Ok(deleted > 0)
    }

    async fn list(&self) -> Result<Vec<Submission>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut keys: Vec<String> = Vec::new();
        {
            let mut iter = conn.scan_match::<_, String>("submission:*").await?;
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<Option<String>> = conn.mget(&keys).await?;
        let mut submissions = Vec::with_capacity(values.len());
        for json in values.into_iter().flatten() {
            // A record expiring mid-listing is not an error
            match serde_json::from_str(&json) {
                Ok(s) => submissions.push(s),
                Err(e) => tracing::warn!("skipping unparseable submission record: {}", e),
            }
        }
        Ok(submissions)
    }

    async fn claim_slot(&self, slot: &str, submission_id: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        // SET NX EX: succeeds only when no one holds the slot
        let claimed: Option<String> = redis::cmd("SET")
            .arg(Self::slot_key(slot))
            .arg(submission_id)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;

        Ok(claimed.is_some())
    }

    async fn release_slot(&self, slot: &str) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(Self::slot_key(slot)).await?;
        Ok(())
    }
}
