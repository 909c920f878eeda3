//! Application startup and lifecycle management.

use crate::config::BridgeConfig;
use crate::handlers;
use crate::middleware::require_conversation_id;
use crate::services::{ChatwootDb, LibreChatDb};
use axum::{middleware::from_fn, middleware::from_fn_with_state, routing::get, Router};
use service_core::error::AppError;
use service_core::middleware::{
    api_key_middleware, metrics_middleware, request_id_middleware, security_headers_middleware,
    ApiKeyGuard, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BridgeConfig>,
    pub chatwoot: ChatwootDb,
    pub librechat: LibreChatDb,
}

impl AppState {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            chatwoot: ChatwootDb::new(&config.postgres),
            librechat: LibreChatDb::new(&config.mongodb),
            config: Arc::new(config),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let guard = ApiKeyGuard::new(state.config.security.api_key.clone());

    // A malformed numeric id is a 404 regardless of the key, so the id check
    // wraps the guard on this route.
    let chatwoot_messages = Router::new()
        .route(
            "/chatwoot/messages/:conversation_id",
            get(handlers::chatwoot::list_messages),
        )
        .route_layer(from_fn_with_state(guard.clone(), api_key_middleware))
        .route_layer(from_fn(require_conversation_id));

    let protected = Router::new()
        .route(
            "/chatwoot/conversations",
            get(handlers::chatwoot::list_conversations),
        )
        .route(
            "/librechat/conversations",
            get(handlers::librechat::list_conversations),
        )
        .route(
            "/librechat/messages/:conversation_id",
            get(handlers::librechat::list_messages),
        )
        .route("/librechat/users", get(handlers::librechat::list_users))
        .route_layer(from_fn_with_state(guard, api_key_middleware))
        .merge(chatwoot_messages);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .merge(protected)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Binds the listener (port 0 picks a free port) and assembles the router.
    pub async fn build(config: BridgeConfig) -> Result<Self, AppError> {
        if config.uses_default_api_key() {
            tracing::warn!("BRIDGE_API_KEY is not set; using the built-in default key");
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            postgres_host = %config.postgres.host,
            postgres_port = config.postgres.port,
            postgres_database = %config.postgres.database,
            mongodb_host = %config.mongodb.host,
            mongodb_port = config.mongodb.port,
            mongodb_database = %config.mongodb.database,
            encoding = ?config.document_encoding,
            "Bridge configured"
        );

        let router = build_router(AppState::new(config));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Listening on {}", self.port);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
