//! Shared test utilities for handler tests.
//!
//! `TestStateBuilder` constructs an `AppState` from mocks, defaulting any
//! collaborator a test does not care about. The default rate limiter
//! allows everything and the default notifier succeeds silently, so only
//! the mocks under test need expectations.

use std::sync::Arc;

use crate::config::Config;
use crate::cors::CorsPolicy;
use crate::models::{Communication, Submission};
use crate::services::{MockNotifier, PinSession, TokenVerifier};
use crate::state::AppState;
use crate::stores::{MockRateLimiter, MockSubmissionStore, RateLimitResult, Stores};

/// Creates a test configuration with dummy values.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        redis_url: "redis://test".to_string(),
        api_key: "test-api-key".to_string(),
        admin_pin: "2468".to_string(),
        session_secret: "test-session-secret".to_string(),
        session_ttl_secs: 3600,
        cognito_pool_id: None,
        cognito_region: None,
        rate_limit_window_secs: 300,
        rate_limit_max: 5,
        rate_limit_fail_open: true,
        max_body_bytes: 64 * 1024,
        slot_check_fail_open: true,
        allowed_origins: vec![
            "https://tesconnections.com".to_string(),
            "https://www.tesconnections.com".to_string(),
        ],
        default_origin: "https://tesconnections.com".to_string(),
        booking_dates: vec![
            "2025-09-12".to_string(),
            "2025-09-13".to_string(),
            "2025-09-14".to_string(),
            "2025-09-15".to_string(),
        ],
        booking_open_hour: 9,
        booking_close_hour: 17,
        submission_ttl_secs: 90 * 24 * 60 * 60,
        notify_webhook_url: None,
        env: "test".to_string(),
        sentry_dsn: None,
    }
}

/// Creates a minimal submission record for store and handler tests.
pub fn test_submission(id: &str, time_slot: Option<&str>) -> Submission {
    Submission {
        id: id.to_string(),
        name: "Alice Smith".to_string(),
        communication: Communication::Email,
        info: String::new(),
        comments: String::new(),
        time_slot: time_slot.map(str::to_string),
        timestamp: "2025-09-01T12:00:00Z".to_string(),
        user_agent: "test-agent".to_string(),
        referrer: String::new(),
        ip_address: "203.0.113.9".to_string(),
        created_at: "2025-09-01T12:00:00Z".to_string(),
        status: "new".to_string(),
    }
}

/// Builder for constructing test `AppState` with custom mocks.
pub struct TestStateBuilder {
    pub config: Config,
    submission_store: Option<MockSubmissionStore>,
    rate_limiter: Option<MockRateLimiter>,
    verifiers: Option<Vec<Arc<dyn TokenVerifier>>>,
    notifier: Option<MockNotifier>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            submission_store: None,
            rate_limiter: None,
            verifiers: None,
            notifier: None,
        }
    }

    pub fn with_submission_store(mut self, store: MockSubmissionStore) -> Self {
        self.submission_store = Some(store);
        self
    }

    pub fn with_rate_limiter(mut self, limiter: MockRateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    pub fn with_verifiers(mut self, verifiers: Vec<Arc<dyn TokenVerifier>>) -> Self {
        self.verifiers = Some(verifiers);
        self
    }

    #[allow(dead_code)]
    pub fn with_notifier(mut self, notifier: MockNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the `AppState` using configured mocks or defaults.
    pub fn build(self) -> AppState {
        let pin_session = PinSession::new(
            self.config.session_secret.as_bytes(),
            self.config.session_ttl_secs,
        );

        let verifiers = self
            .verifiers
            .unwrap_or_else(|| vec![Arc::new(pin_session.clone()) as Arc<dyn TokenVerifier>]);

        let stores = Stores {
            submissions: Arc::new(
                self.submission_store
                    .unwrap_or_else(MockSubmissionStore::new),
            ),
            rate_limiter: Arc::new(self.rate_limiter.unwrap_or_else(default_rate_limiter)),
        };

        let cors = Arc::new(CorsPolicy::new(
            self.config.allowed_origins.clone(),
            self.config.default_origin.clone(),
        ));

        AppState {
            config: self.config,
            stores,
            cors,
            pin_session,
            verifiers: Arc::new(verifiers),
            notifier: Arc::new(self.notifier.unwrap_or_else(default_notifier)),
        }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate limiter mock that admits every request.
fn default_rate_limiter() -> MockRateLimiter {
    let mut limiter = MockRateLimiter::new();
    limiter
        .expect_check()
        .returning(|_, _, _, _| Ok(RateLimitResult::Allowed(1)));
    limiter
}

/// Notifier mock that accepts every notification.
fn default_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_submission_received().returning(|_| Ok(()));
    notifier
}
