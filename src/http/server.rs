//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all broker endpoints
//! - Wire up middleware (request ID, tracing, timeout, metrics, auth)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::broker::ServiceBroker;
use crate::config::BrokerConfig;
use crate::http::handlers;
use crate::http::middleware::{api_version_middleware, basic_auth_middleware, BrokerCredentials};
use crate::http::request::make_request_span;
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn ServiceBroker>,
}

/// HTTP server for the broker API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `broker`.
    pub fn new(broker: Arc<dyn ServiceBroker>, config: &BrokerConfig) -> Self {
        let credentials = Arc::new(BrokerCredentials::new(
            &config.broker_username,
            &config.broker_password,
        ));
        let state = AppState { broker };
        let timeout = Duration::from_secs(config.listener.request_timeout_secs);

        Self {
            router: Self::build_router(state, credentials, timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, credentials: Arc<BrokerCredentials>, timeout: Duration) -> Router {
        let broker_api = Router::new()
            .route("/v2/catalog", get(handlers::catalog))
            .route(
                "/v2/service_instances/{instance_id}",
                put(handlers::provision)
                    .patch(handlers::update)
                    .delete(handlers::deprovision),
            )
            .route(
                "/v2/service_instances/{instance_id}/last_operation",
                get(handlers::last_operation),
            )
            .route(
                "/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
                put(handlers::bind).delete(handlers::unbind),
            )
            .route_layer(middleware::from_fn(api_version_middleware))
            .route_layer(middleware::from_fn_with_state(credentials, basic_auth_middleware))
            .with_state(state);

        Router::new()
            .route("/health", get(handlers::health))
            .merge(broker_api)
            .route_layer(middleware::from_fn(metrics::track_metrics))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
