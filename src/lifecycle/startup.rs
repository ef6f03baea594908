//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the service registry from configuration
//! - Compile the CORS policy
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, the gateway never serves a partial registry
//! - Services register in configuration order

use axum::http::header::InvalidHeaderValue;
use thiserror::Error;

use crate::observability::metrics;
use crate::registry::{ConfigError, ServiceRegistry, ServiceRoute};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("service registry: {0}")]
    Registry(#[from] ConfigError),

    #[error("cors policy: {0}")]
    Cors(#[from] InvalidHeaderValue),
}

/// Register every configured service, stopping at the first invalid one.
pub fn build_registry(services: &[ServiceRoute]) -> Result<ServiceRegistry, ConfigError> {
    let mut builder = ServiceRegistry::builder();

    for service in services {
        builder.register(service.clone())?;
        tracing::info!(
            service = %service.name,
            base_path = %service.path_prefix,
            target = %service.upstream_base,
            "Registered service"
        );
    }

    let registry = builder.build();
    if registry.is_empty() {
        tracing::warn!("No services registered; every proxied request will return 404");
    }
    metrics::record_registered_services(registry.len());

    Ok(registry)
}
