mod config;
mod cors;
mod error;
mod handlers;
mod middleware;
mod models;
mod sanitize;
mod services;
mod state;
mod stores;
#[cfg(test)]
mod test_utils;
mod validate;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::Config,
    cors::CorsPolicy,
    services::{CognitoVerifier, PinSession, TokenVerifier, WebhookNotifier},
    state::AppState,
    stores::{RedisRateLimiter, RedisSubmissionStore, Stores},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = envy::prefixed("TES_").from_env::<Config>()?;

    // Initialize Sentry for error tracking (must be done early, guard must stay alive)
    let _sentry_guard = config.sentry_dsn.as_ref().map(|dsn| {
        sentry::init((
            dsn.as_str(),
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(config.env.clone().into()),
                ..Default::default()
            },
        ))
    });

    // Set up tracing: JSON in production, human-readable otherwise
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .init();
    }

    let redis = redis::Client::open(config.redis_url.as_str())?;

    let stores = Stores {
        submissions: Arc::new(RedisSubmissionStore::new(redis.clone())),
        rate_limiter: Arc::new(RedisRateLimiter::new(redis)),
    };

    // PIN sessions first, external identity second; first match wins
    let pin_session = PinSession::new(config.session_secret.as_bytes(), config.session_ttl_secs);
    let mut verifiers: Vec<Arc<dyn TokenVerifier>> = vec![Arc::new(pin_session.clone())];
    if let Some(issuer) = config.cognito_issuer() {
        verifiers.push(Arc::new(CognitoVerifier::new(issuer)?));
    } else {
        tracing::info!("no identity pool configured, external admin tokens disabled");
    }

    let cors = Arc::new(CorsPolicy::new(
        config.allowed_origins.clone(),
        config.default_origin.clone(),
    ));

    let notifier = Arc::new(WebhookNotifier::new(config.notify_webhook_url.clone()));

    let state = AppState {
        config: config.clone(),
        stores,
        cors,
        pin_session,
        verifiers: Arc::new(verifiers),
        notifier,
    };

    // Request ID header name
    let x_request_id = http::HeaderName::from_static("x-request-id");

    let app = handlers::router(state)
        // Request ID: generate UUID, include in logs, return in response
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &http::Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            },
        ))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
        // Transport-level backstop; the submit handler enforces the
        // configured per-request byte limit with a JSON error body
        .layer(RequestBodyLimitLayer::new(1024 * 1024));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
