//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, access log, CORS)
//!     → introspection routes, or the proxy fallback:
//!         → [routing layer decides service]
//!         → proxy.rs (deadline-bounded upstream round trip)
//!             → request.rs (rewrite URI and Host, strip hop-by-hop)
//!             → response.rs (strip hop-by-hop, stream body back)
//!     → Send to client
//! ```

pub mod headers;
pub mod middleware;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use proxy::Dispatcher;
pub use server::{AppState, HttpServer};
