//! Response relay.
//!
//! # Responsibilities
//! - Relay the upstream status, headers and body to the caller
//! - Strip hop-by-hop headers
//! - Abort bodies that stop producing frames
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - The idle deadline resets on every frame, so long healthy streams are unaffected
//! - Gateway-generated errors are rendered by `GatewayError::into_response`

use std::time::Duration;

use axum::body::{Body, Bytes, HttpBody};
use axum::http::Response;
use tower_http::timeout::TimeoutBody;

use crate::http::headers::strip_hop_by_hop;

/// Convert an upstream response into the response returned to the caller.
///
/// The body fails with a timeout error if no frame arrives within
/// `body_idle`; the caller's connection is then aborted and the upstream
/// body dropped.
pub fn relay<B>(upstream: Response<B>, body_idle: Duration) -> Response<Body>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let (mut parts, body) = upstream.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(TimeoutBody::new(body_idle, body)))
}
