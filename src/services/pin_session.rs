//! PIN session tokens: short-lived HS256 credentials minted after a
//! successful PIN match.
//!
//! Tokens are self-contained - validity is purely signature + expiry, so
//! there is no server-side session state and no revocation short of
//! rotating the secret.

use anyhow::{bail, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AdminClaims, TokenVerifier};

const TOKEN_KIND: &str = "pin_session";
const SUBJECT: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    /// Token kind discriminator; must equal `pin_session`.
    kind: String,
    jti: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies PIN session tokens with a shared symmetric secret.
#[derive(Clone)]
pub struct PinSession {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl PinSession {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Mint a fresh session token. Returns the token and its lifetime.
    pub fn issue(&self) -> Result<(String, i64)> {
        let now = now_secs();
        let claims = SessionClaims {
            sub: SUBJECT.to_string(),
            kind: TOKEN_KIND.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, self.ttl_secs))
    }

    fn decode(&self, token: &str) -> Result<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        if data.claims.kind != TOKEN_KIND {
            bail!("unexpected token kind");
        }
        Ok(data.claims)
    }
}

#[async_trait]
impl TokenVerifier for PinSession {
    async fn verify(&self, token: &str) -> Result<AdminClaims> {
        let claims = self.decode(token)?;
        Ok(AdminClaims {
            subject: claims.sub,
            scheme: "pin_session",
        })
    }
}

fn now_secs() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
