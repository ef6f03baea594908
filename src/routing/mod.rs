//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, without query)
//!     → match_route (composed with the ServiceRegistry)
//!     → router.rs (prefix tree lookup)
//!     → matcher.rs (segment splitting)
//!     → Return: matched RouteEntry or RouteNotFound
//!
//! Route Compilation (at startup):
//!     ServiceRoute[]
//!     → matcher.rs (parse prefixes into segments)
//!     → router.rs (insert into prefix tree)
//!     → Freeze as immutable ServiceRegistry
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: longest segment prefix wins, never iteration order

pub mod matcher;
pub mod router;

pub use matcher::{path_segments, PathPrefix, PrefixError};
pub use router::PrefixTree;

use crate::error::GatewayError;
use crate::registry::{RouteEntry, ServiceRegistry};

/// Select the route that owns `path`, or report that no service does.
pub fn match_route<'a>(
    registry: &'a ServiceRegistry,
    path: &str,
) -> Result<&'a RouteEntry, GatewayError> {
    registry
        .resolve(path)
        .ok_or_else(|| GatewayError::RouteNotFound {
            path: path.to_string(),
        })
}
