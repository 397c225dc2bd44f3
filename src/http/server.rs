//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and stop on shutdown signal

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::coordinator::EndorsementCoordinator;
use crate::fabric::FabricClient;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::ShutdownListener;

/// Application state injected into handlers.
pub struct AppState<C> {
    pub coordinator: EndorsementCoordinator<C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
        }
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router<C: FabricClient + 'static>(
    coordinator: EndorsementCoordinator<C>,
    request_timeout: Duration,
) -> Router {
    Router::new()
        .route("/health", get(handlers::health::<C>))
        .route("/api/v1/query", post(handlers::query::<C>))
        .route("/api/v1/transactions", post(handlers::propose::<C>))
        .route(
            "/api/v1/transactions/transient",
            post(handlers::propose_transient::<C>),
        )
        .route("/api/v1/transactions/commit", post(handlers::commit::<C>))
        .route(
            "/api/v1/users/{username}/status",
            get(handlers::enrollment_status::<C>),
        )
        .with_state(AppState { coordinator })
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                // Must wrap the timeout so the stack stays infallible.
                .layer(HandleErrorLayer::new(handlers::handle_layer_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
}

/// HTTP front end of the chaincode gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new<C: FabricClient + 'static>(
        config: GatewayConfig,
        coordinator: EndorsementCoordinator<C>,
    ) -> Self {
        let router = build_router(
            coordinator,
            Duration::from_secs(config.timeouts.request_secs),
        );
        Self { router, config }
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            channel = %self.config.network.channel_name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.triggered().await;
                tracing::info!("Draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
