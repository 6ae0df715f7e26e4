//! CORS resolution against an exact-match origin allow-list.
//!
//! Every response, errors included, carries the headers resolved for the
//! request. Allowed origins are echoed back with full permissions; anything
//! else gets a restrictive set naming the canonical origin - never a
//! wildcard - and the rejected origin is logged for audit.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::state::AppState;

const ALLOW_METHODS: &str = "GET,POST,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type,Authorization,X-Api-Key";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Allow-list policy resolved once at startup from config.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed: Vec<String>,
    fallback: String,
}

impl CorsPolicy {
    pub fn new(allowed: Vec<String>, fallback: String) -> Self {
        Self { allowed, fallback }
    }

    /// Resolve response headers for the given request headers.
    ///
    /// The declared origin comes from `Origin`, falling back to the
    /// scheme+host of `Referer` when absent (some invoking transports drop
    /// the Origin header). Header lookup is case-insensitive.
    pub fn resolve(&self, request_headers: &HeaderMap) -> HeaderMap {
        let origin = declared_origin(request_headers);

        let mut headers = HeaderMap::new();
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );

        match origin {
            Some(origin) if self.allowed.iter().any(|a| a == &origin) => {
                if let Ok(value) = HeaderValue::from_str(&origin) {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                }
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
                headers.insert(
                    header::ACCESS_CONTROL_MAX_AGE,
                    HeaderValue::from_static(PREFLIGHT_MAX_AGE),
                );
            }
            other => {
                if let Some(rejected) = other {
                    tracing::warn!(origin = %rejected, "request from disallowed origin");
                }
                if let Ok(value) = HeaderValue::from_str(&self.fallback) {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                }
            }
        }

        headers
    }
}

/// Origin from the `Origin` header, else scheme+host parsed from `Referer`.
fn declared_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok()) {
        return Some(origin.to_string());
    }

    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let scheme_end = referer.find("://")?;
    let rest = &referer[scheme_end + 3..];
    let host_end = rest.find('/').unwrap_or(rest.len());
    Some(format!("{}{}", &referer[..scheme_end + 3], &rest[..host_end]))
}

/// Middleware stamping resolved CORS headers on every response and
/// short-circuiting OPTIONS preflight with an empty success body.
pub async fn apply(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let cors_headers = state.cors.resolve(request.headers());

    let mut response = if request.method() == Method::OPTIONS {
        Json(serde_json::json!({ "message": "CORS preflight successful" })).into_response()
    } else {
        next.run(request).await
    };

    for (name, value) in cors_headers.iter() {
        response.headers_mut().insert(name, value.clone());
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(
            vec![
                "https://tesconnections.com".to_string(),
                "https://www.tesconnections.com".to_string(),
            ],
            "https://tesconnections.com".to_string(),
        )
    }

    fn headers_with_origin(origin: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_str(origin).unwrap());
        headers
    }

    #[test]
    fn allowed_origin_is_echoed_exactly() {
        let resolved = policy().resolve(&headers_with_origin("https://www.tesconnections.com"));
        assert_eq!(
            resolved.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://www.tesconnections.com"
        );
        assert_eq!(
            resolved
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
        assert_eq!(
            resolved.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(),
            "86400"
        );
    }

    #[test]
    fn unknown_origin_gets_restrictive_default() {
        let resolved = policy().resolve(&headers_with_origin("https://evil.example"));
        assert_eq!(
            resolved.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://tesconnections.com"
        );
        assert!(resolved
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
    }

    #[test]
    fn never_emits_wildcard() {
        let resolved = policy().resolve(&HeaderMap::new());
        assert_ne!(
            resolved.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[test]
    fn falls_back_to_referer_scheme_and_host() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://www.tesconnections.com/admin.html?x=1"),
        );
        let resolved = policy().resolve(&headers);
        assert_eq!(
            resolved.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://www.tesconnections.com"
        );
    }

    #[test]
    fn origin_header_takes_precedence_over_referer() {
        let mut headers = headers_with_origin("https://tesconnections.com");
        headers.insert(
            header::REFERER,
            HeaderValue::from_static("https://other.example/page"),
        );
        let resolved = policy().resolve(&headers);
        assert_eq!(
            resolved.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://tesconnections.com"
        );
    }

    #[test]
    fn substring_origins_do_not_match() {
        let resolved = policy().resolve(&headers_with_origin("https://tesconnections.com.evil.example"));
        assert!(resolved
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .is_none());
    }
}
