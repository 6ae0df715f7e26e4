//! External-facing services: token verification and notifications.
//!
//! Admin authentication is an ordered chain of [`TokenVerifier`]
//! implementations - the PIN-session verifier first, then the external
//! identity verifier. The first scheme to accept the token wins; callers
//! never learn which scheme failed.

mod identity;
mod notify;
mod pin_session;

pub use identity::CognitoVerifier;
pub use notify::{Notifier, WebhookNotifier};
pub use pin_session::PinSession;

#[cfg(test)]
pub use notify::MockNotifier;

use anyhow::Result;
use async_trait::async_trait;

/// Claims accepted for admin access, whatever scheme produced them.
#[derive(Debug, Clone)]
pub struct AdminClaims {
    pub subject: String,
    /// Short scheme label for audit logging only.
    pub scheme: &'static str,
}

/// A credential verifier. Implementations are tried in order until one
/// accepts the token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AdminClaims>;
}
