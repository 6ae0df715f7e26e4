use std::sync::Arc;

use crate::{
    config::Config,
    cors::CorsPolicy,
    services::{Notifier, PinSession, TokenVerifier},
    stores::Stores,
};

#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Submission and rate-limit stores (Redis).
    pub stores: Stores,
    /// CORS allow-list policy.
    pub cors: Arc<CorsPolicy>,
    /// PIN session issuer (also first entry in `verifiers`).
    pub pin_session: PinSession,
    /// Ordered credential verifiers for privileged endpoints.
    pub verifiers: Arc<Vec<Arc<dyn TokenVerifier>>>,
    /// Best-effort submission notifier.
    pub notifier: Arc<dyn Notifier>,
}
