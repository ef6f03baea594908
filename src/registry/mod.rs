//! Service registry.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ServiceRoute (from config)
//!     → RegistryBuilder::register (validate name, prefix, target; reject overlaps)
//!     → RegistryBuilder::build
//!     → ServiceRegistry (immutable, shared via Arc)
//!
//! Per request:
//!     path → ServiceRegistry::resolve → RouteEntry
//! ```
//!
//! # Design Decisions
//! - Single writer at startup, many readers at runtime; no locks
//! - Overlapping prefixes are rejected, never resolved by precedence
//! - `list()` preserves insertion order for reproducible output

pub mod error;
pub mod route;

pub use error::ConfigError;
pub use route::{RouteEntry, ServiceRoute, UpstreamTarget};

use crate::routing::PrefixTree;

/// Accumulates routes during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RouteEntry>,
    tree: PrefixTree<usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and add a route.
    pub fn register(&mut self, route: ServiceRoute) -> Result<(), ConfigError> {
        if self.entries.iter().any(|e| e.name() == route.name) {
            return Err(ConfigError::DuplicateName(route.name));
        }

        let entry = RouteEntry::compile(route)?;

        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.prefix().overlaps(entry.prefix()))
        {
            return Err(ConfigError::DuplicatePrefix {
                name: entry.name().to_string(),
                prefix: entry.prefix().to_string(),
                existing: existing.name().to_string(),
                existing_prefix: existing.prefix().to_string(),
            });
        }

        self.tree.insert(entry.prefix(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    /// Freeze into an immutable registry.
    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry {
            entries: self.entries,
            tree: self.tree,
        }
    }
}

/// Immutable mapping from path prefix to backend service.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    entries: Vec<RouteEntry>,
    tree: PrefixTree<usize>,
}

impl ServiceRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Longest segment-prefix match for a request path (without query).
    pub fn resolve(&self, path: &str) -> Option<&RouteEntry> {
        self.tree
            .longest_match(path)
            .and_then(|&index| self.entries.get(index))
    }

    /// Registered routes in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &ServiceRoute> {
        self.entries.iter().map(RouteEntry::route)
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
