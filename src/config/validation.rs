//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep service prefixes clear of the introspection endpoints
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Route-level checks (names, overlaps, targets) belong to the registry

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::routing::PathPrefix;

/// Paths served by the gateway itself.
pub const RESERVED_PATHS: &[&str] = &["/health", "/services"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("unknown log format `{0}` (expected `pretty` or `json`)")]
    UnknownLogFormat(String),

    #[error("service `{name}` prefix `{prefix}` shadows reserved path `{reserved}`")]
    ReservedPrefix {
        name: String,
        prefix: String,
        reserved: &'static str,
    },
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            obs.metrics_address.clone(),
        ));
    }
    if !matches!(obs.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::UnknownLogFormat(obs.log_format.clone()));
    }

    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_ms"));
    }
    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_ms"));
    }
    if config.timeouts.body_idle_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("body_idle_ms"));
    }

    for service in &config.services {
        // malformed prefixes are reported by the registry
        let Ok(prefix) = PathPrefix::parse(&service.path_prefix) else {
            continue;
        };
        for &reserved in RESERVED_PATHS {
            if prefix.matches(reserved) {
                errors.push(ValidationError::ReservedPrefix {
                    name: service.name.clone(),
                    prefix: service.path_prefix.clone(),
                    reserved,
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
