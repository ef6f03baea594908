//! Upstream dispatch.
//!
//! # Responsibilities
//! - Execute one upstream round trip per matched request
//! - Bound the round trip with a deadline
//! - Classify transport failures for operators
//!
//! # Design Decisions
//! - No retries: proxied requests are not assumed idempotent
//! - Connect, timeout and parse failures all surface as 502
//! - A relayed body that goes idle for `body_idle_ms` is aborted
//! - Dropping the returned future cancels the upstream call

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::TimeoutConfig;
use crate::error::{GatewayError, UpstreamError};
use crate::http::request::build_upstream_request;
use crate::http::response::relay;
use crate::registry::RouteEntry;

/// Forwards requests to upstream services over a pooled HTTP client.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    body_idle: Duration,
}

impl Dispatcher {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_timer(TokioTimer::new())
            .pool_idle_timeout(timeouts.pool_idle())
            .build(connector);

        Self {
            client,
            timeout: timeouts.upstream(),
            body_idle: timeouts.body_idle(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forward `request` to the upstream of `route` and relay its response.
    pub async fn forward(
        &self,
        route: &RouteEntry,
        request: Request<Body>,
    ) -> Result<Response, GatewayError> {
        let outbound = build_upstream_request(route, request)?;

        tracing::debug!(
            service = %route.name(),
            method = %outbound.method(),
            upstream = %outbound.uri(),
            "Forwarding request"
        );

        let result = tokio::time::timeout(self.timeout, self.client.request(outbound)).await;

        let upstream_error = match result {
            Ok(Ok(response)) => return Ok(relay::<Incoming>(response, self.body_idle)),
            Ok(Err(e)) => UpstreamError::from_client(e),
            Err(_) => UpstreamError::Timeout(self.timeout),
        };

        Err(GatewayError::Upstream {
            service: route.name().to_string(),
            source: upstream_error,
        })
    }
}
