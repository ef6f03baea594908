//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with introspection routes and the proxy fallback
//! - Wire up middleware (access log, CORS)
//! - Bind server to listener
//! - Dispatch requests through the path matcher to the proxy dispatcher
//! - Observability (metrics, access log)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::middleware::{cors_middleware, CorsPolicy};
use crate::http::proxy::Dispatcher;
use crate::introspection::introspection_router;
use crate::lifecycle::{build_registry, StartupError};
use crate::observability::{access_log_layer, metrics};
use crate::registry::ServiceRegistry;
use crate::routing;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    registry: Arc<ServiceRegistry>,
}

impl HttpServer {
    /// Build the registry and router. Fails on any invalid service definition.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let registry = Arc::new(build_registry(&config.services)?);
        let cors = Arc::new(CorsPolicy::from_config(&config.cors)?);
        let dispatcher = Arc::new(Dispatcher::new(&config.timeouts));

        let state = AppState {
            registry: registry.clone(),
            dispatcher,
        };

        let router = Self::build_router(state, cors);
        Ok(Self {
            router,
            config,
            registry,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState, cors: Arc<CorsPolicy>) -> Router {
        Router::new()
            .merge(introspection_router())
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(cors, cors_middleware))
            .layer(access_log_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            services = self.registry.len(),
            upstream_timeout_ms = self.config.timeouts.upstream_ms,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A handle to the router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Main proxy handler.
/// Looks up the owning service and forwards the request to it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let route = match routing::match_route(&state.registry, &path) {
        Ok(route) => route,
        Err(err) => {
            tracing::debug!(path = %path, "No service matched");
            metrics::record_request(&method, err.status().as_u16(), "none", start_time);
            return err.into_response();
        }
    };

    match state.dispatcher.forward(route, request).await {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), route.name(), start_time);
            response
        }
        Err(err) => {
            report_dispatch_error(&err);
            metrics::record_request(&method, err.status().as_u16(), route.name(), start_time);
            err.into_response()
        }
    }
}

fn report_dispatch_error(err: &GatewayError) {
    match err {
        GatewayError::Upstream { service, source } if source.is_caller_side() => {
            tracing::info!(
                service = %service,
                error = ?source,
                "Caller aborted request before upstream responded"
            );
        }
        GatewayError::Upstream { service, source } => {
            tracing::warn!(
                service = %service,
                kind = source.kind(),
                error = ?source,
                "Upstream request failed"
            );
            metrics::record_upstream_error(service, source.kind());
        }
        GatewayError::Internal(detail) => {
            tracing::error!(detail = %detail, "Internal gateway error");
        }
        GatewayError::RouteNotFound { .. } => {}
    }
}
