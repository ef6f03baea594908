//! Outbound request construction.
//!
//! # Responsibilities
//! - Point the inbound request at the matched upstream
//! - Strip hop-by-hop headers and rewrite `Host`
//! - Hand the inbound body through without buffering
//!
//! # Design Decisions
//! - Original path and query are forwarded verbatim
//! - Outbound requests are always HTTP/1.1; inbound HTTP/2 is accepted
//! - Extensions of the inbound request are not carried over

use axum::body::Body;
use axum::http::{header, Request, Version};

use crate::error::GatewayError;
use crate::http::headers::strip_hop_by_hop;
use crate::registry::RouteEntry;

/// Turn an inbound request into the request sent to `route`'s upstream.
pub fn build_upstream_request(
    route: &RouteEntry,
    request: Request<Body>,
) -> Result<Request<Body>, GatewayError> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let uri = route.upstream().uri_for(path_and_query).map_err(|e| {
        GatewayError::Internal(format!(
            "cannot build upstream uri for service `{}`: {}",
            route.name(),
            e
        ))
    })?;

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.insert(header::HOST, route.upstream().host_header().clone());

    let mut outbound = Request::new(body);
    *outbound.method_mut() = parts.method;
    *outbound.uri_mut() = uri;
    *outbound.version_mut() = Version::HTTP_11;
    *outbound.headers_mut() = headers;

    Ok(outbound)
}
