//! Registration errors.

use thiserror::Error;

use crate::routing::PrefixError;

/// A route that cannot be registered. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("service name must not be empty")]
    EmptyName,

    #[error("service `{0}` is already registered")]
    DuplicateName(String),

    #[error("invalid path prefix `{prefix}` for service `{name}`: {reason}")]
    InvalidPrefix {
        name: String,
        prefix: String,
        reason: PrefixError,
    },

    #[error("path prefix `{prefix}` of service `{name}` overlaps `{existing_prefix}` of service `{existing}`")]
    DuplicatePrefix {
        name: String,
        prefix: String,
        existing: String,
        existing_prefix: String,
    },

    #[error("invalid upstream target `{target}` for service `{name}`: {reason}")]
    InvalidTarget {
        name: String,
        target: String,
        reason: String,
    },
}
