//! Hop-by-hop header handling.
//!
//! # Responsibilities
//! - Strip headers that only apply to a single connection
//! - Honor headers nominated by the `Connection` header
//!
//! # Design Decisions
//! - Applied identically to outbound requests and relayed responses
//! - Every other header passes through untouched

use axum::http::header::{self, HeaderMap, HeaderName};

/// Headers never relayed across the gateway.
pub const HOP_BY_HOP: [HeaderName; 4] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let nominated: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    for name in nominated.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_strip_keeps_end_to_end_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::UPGRADE, HeaderValue::from_static("websocket"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append("x-trace", HeaderValue::from_static("a"));
        headers.append("x-trace", HeaderValue::from_static("b"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 3);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        let traces: Vec<_> = headers.get_all("x-trace").iter().collect();
        assert_eq!(traces, ["a", "b"]);
    }

    #[test]
    fn test_strip_connection_nominated() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("close, X-Internal-Hop"));
        headers.insert("x-internal-hop", HeaderValue::from_static("1"));
        headers.insert("x-public", HeaderValue::from_static("1"));

        strip_hop_by_hop(&mut headers);

        assert!(headers.get("x-internal-hop").is_none());
        assert!(headers.get(header::CONNECTION).is_none());
        assert_eq!(headers["x-public"], "1");
    }
}
