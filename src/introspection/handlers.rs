use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::Uri, Json};
use serde::Serialize;

use crate::error::GatewayError;
use crate::http::server::AppState;
use crate::registry::ServiceRoute;

pub const SERVICE_NAME: &str = "api-gateway";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: u64,
    pub services: usize,
}

#[derive(Debug, Serialize)]
pub struct ServiceList {
    pub services: Vec<ServiceRoute>,
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    Json(HealthStatus {
        status: "ok",
        service: SERVICE_NAME,
        timestamp,
        services: state.registry.len(),
    })
}

pub async fn get_services(State(state): State<AppState>) -> Json<ServiceList> {
    Json(ServiceList {
        services: state.registry.list().cloned().collect(),
    })
}

/// Introspection paths only answer `GET`.
pub async fn not_served(uri: Uri) -> GatewayError {
    GatewayError::RouteNotFound {
        path: uri.path().to_string(),
    }
}
