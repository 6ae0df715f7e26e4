//! External identity token verification against a provider's JWKS.
//!
//! Keys are fetched per verification (no cache) with an explicit request
//! timeout - a slow provider is a verification failure, not a hang.
//! Audience validation is intentionally disabled: the pool serves a single
//! consumer. Issuer, signature and expiry are always enforced.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::{AdminClaims, TokenVerifier};

const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: String,
    #[serde(default)]
    kty: String,
    #[serde(default)]
    n: String,
    #[serde(default)]
    e: String,
}

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    sub: String,
}

/// Verifies Cognito-issued RS256 tokens against the pool's published keys.
pub struct CognitoVerifier {
    http: reqwest::Client,
    issuer: String,
    jwks_url: String,
}

impl CognitoVerifier {
    pub fn new(issuer: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .context("building JWKS http client")?;
        let jwks_url = format!("{issuer}/.well-known/jwks.json");
        Ok(Self {
            http,
            issuer,
            jwks_url,
        })
    }

    async fn fetch_key(&self, kid: &str) -> Result<DecodingKey> {
        let jwks: Jwks = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .context("fetching JWKS")?
            .error_for_status()
            .context("JWKS endpoint returned an error")?
            .json()
            .await
            .context("parsing JWKS")?;

        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid == kid && k.kty == "RSA")
            .context("no matching signing key")?;

        DecodingKey::from_rsa_components(&jwk.n, &jwk.e).context("building RSA key")
    }
}

#[async_trait]
impl TokenVerifier for CognitoVerifier {
    async fn verify(&self, token: &str) -> Result<AdminClaims> {
        let header = jsonwebtoken::decode_header(token).context("unparseable token header")?;
        let Some(kid) = header.kid else {
            bail!("token header has no key id");
        };

        let key = self.fetch_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // Single-consumer pool; tokens carry no audience we can pin.
        validation.validate_aud = false;

        let data = jsonwebtoken::decode::<IdentityClaims>(token, &key, &validation)?;
        Ok(AdminClaims {
            subject: data.claims.sub,
            scheme: "cognito",
        })
    }
}
