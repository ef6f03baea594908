//! API gateway: a static service registry and streaming reverse-proxy dispatcher.

pub mod config;
pub mod error;
pub mod http;
pub mod introspection;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::GatewayConfig;
pub use error::{GatewayError, UpstreamError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::{ServiceRegistry, ServiceRoute};
