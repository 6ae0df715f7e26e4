//! Best-effort notification of new submissions.
//!
//! Delivery is fire-and-forget: failures are logged and never affect the
//! submission result.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Submission;

/// Outbound notification sink.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn submission_received(&self, submission: &Submission) -> Result<()>;
}

/// Posts a JSON summary of each submission to a configured webhook.
/// With no URL configured, notifications are silently skipped.
pub struct WebhookNotifier {
    http: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifier {
    pub fn new(url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn submission_received(&self, submission: &Submission) -> Result<()> {
        let Some(url) = &self.url else {
            return Ok(());
        };

        self.http
            .post(url)
            .json(&serde_json::json!({
                "event": "submission_received",
                "submissionId": submission.id,
                "name": submission.name,
                "communication": submission.communication,
                "timeSlot": submission.time_slot,
                "createdAt": submission.created_at,
            }))
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
