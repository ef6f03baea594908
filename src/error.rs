//! Request-time error taxonomy and its HTTP mapping.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Failure of one upstream round trip.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// DNS resolution or TCP connect failed.
    #[error("connection failed: {0}")]
    Connect(#[source] hyper_util::client::legacy::Error),

    /// No response head within the configured deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The upstream answered with something that is not valid HTTP, or hung up mid-response.
    #[error("malformed response: {0}")]
    Malformed(#[source] hyper_util::client::legacy::Error),

    /// The inbound request body failed while it was being streamed upstream.
    #[error("caller aborted request body: {0}")]
    CallerAborted(#[source] hyper_util::client::legacy::Error),
}

impl UpstreamError {
    pub fn from_client(err: hyper_util::client::legacy::Error) -> Self {
        if err.is_connect() {
            UpstreamError::Connect(err)
        } else if caused_by_request_body(&err) {
            UpstreamError::CallerAborted(err)
        } else {
            UpstreamError::Malformed(err)
        }
    }

    /// True when the failure says nothing about the health of the upstream.
    pub fn is_caller_side(&self) -> bool {
        matches!(self, UpstreamError::CallerAborted(_))
    }

    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Connect(_) => "connect",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Malformed(_) => "malformed",
            UpstreamError::CallerAborted(_) => "caller_aborted",
        }
    }
}

/// Walk the source chain to the hyper error and check whether writing the
/// request body is what failed.
fn caused_by_request_body(err: &hyper_util::client::legacy::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(hyper_err) = cause.downcast_ref::<hyper::Error>() {
            return hyper_err.is_user() || hyper_err.is_body_write_aborted();
        }
        source = cause.source();
    }
    false
}

/// Every failure the gateway reports to a caller.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("no service registered for path `{path}`")]
    RouteNotFound { path: String },

    #[error("upstream `{service}` unavailable: {source}")]
    Upstream {
        service: String,
        #[source]
        source: UpstreamError,
    },

    #[error("internal gateway error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            GatewayError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            GatewayError::RouteNotFound { path } => json!({
                "error": "service not found",
                "path": path,
            }),
            GatewayError::Upstream { service, .. } => json!({
                "error": "upstream unavailable",
                "service": service,
            }),
            GatewayError::Internal(_) => json!({
                "error": "internal gateway error",
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_route_not_found_body() {
        let response = GatewayError::RouteNotFound {
            path: "/api/v1/unknown/1".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({"error": "service not found", "path": "/api/v1/unknown/1"})
        );
    }

    #[tokio::test]
    async fn test_upstream_error_hides_kind() {
        let response = GatewayError::Upstream {
            service: "orders".into(),
            source: UpstreamError::Timeout(Duration::from_millis(5)),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            body_json(response).await,
            json!({"error": "upstream unavailable", "service": "orders"})
        );
    }

    #[tokio::test]
    async fn test_internal_error_status() {
        let response = GatewayError::Internal("bad target".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "internal gateway error"})
        );
    }

    #[test]
    fn test_timeout_kind() {
        assert_eq!(UpstreamError::Timeout(Duration::from_secs(1)).kind(), "timeout");
    }
}
