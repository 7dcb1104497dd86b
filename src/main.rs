mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;

use axum::{
    routing::{get, post},
    Router,
    extract::DefaultBodyLimit,
};
use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use std::sync::Arc;
use std::time::Duration;
use crate::{
    config::{AuthBackend, Config},
    handlers::AppState,
    services::{
        Authenticator, LocalQueue, Lifecycle, RedisAuthenticator, SessionStore,
        StaticAuthenticator, TcpConnector, session_sweeper,
    },
};

pub fn app(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        // Session routes
        .route("/api/login", post(handlers::handle_login))
        .route("/api/logout", get(handlers::handle_logout))

        // Tool routes
        .route("/api/tools", get(handlers::list_tools))
        .route("/api/tools/:id", get(handlers::get_tool))

        // Resource routes
        .route("/api/resources", get(handlers::list_resources).post(handlers::create_resource))
        .route(
            "/api/resources/:id",
            get(handlers::read_resource)
                .put(handlers::update_resource)
                .delete(handlers::delete_resource),
        )

        // Job routes
        .route("/api/jobs", get(handlers::list_jobs).post(handlers::create_job))
        .route(
            "/api/jobs/:id",
            get(handlers::read_job)
                .put(handlers::update_job)
                .delete(handlers::delete_job),
        )

        // Request size limit from config
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::disable())
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = Config::load().context("Failed to load configuration")?;

    // Session store, with a sweeper when sessions expire
    let ttl = config.session.ttl().context("Invalid session configuration")?;
    let sessions = SessionStore::new(ttl);
    if ttl.is_some() {
        tokio::spawn(session_sweeper(sessions.clone(), config.session.sweep_interval_secs));
    }

    let authenticator: Arc<dyn Authenticator> = match config.auth.backend {
        AuthBackend::Static => Arc::new(StaticAuthenticator::new(config.auth.users.clone())),
        AuthBackend::Redis => {
            let url = config.auth.redis_url.clone().context("auth.redis_url not configured")?;
            let client = redis::Client::open(url).context("Failed to connect to Redis")?;
            Arc::new(RedisAuthenticator::new(Arc::new(client)))
        }
    };
    tracing::info!(backend = ?config.auth.backend, "Authenticator configured");

    let connector = Arc::new(TcpConnector::new(
        Duration::from_millis(config.queue.connect_timeout_ms),
        config.queue.tools.clone(),
    ));
    let queue = Arc::new(LocalQueue::new(connector, config.queue.max_jobs));

    let state = AppState::new(sessions, authenticator, Lifecycle::new(queue));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Queue server running on {}", addr);
    axum::serve(listener, app(state, config.server.max_body_size).into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
