//! Service route definitions.

use std::str::FromStr;

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{HeaderValue, Uri};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::registry::error::ConfigError;
use crate::routing::PathPrefix;

/// One backend service as supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceRoute {
    /// Logical identifier for logging and introspection.
    pub name: String,

    /// Path prefix owned by this service (e.g. `/api/v1/users`).
    #[serde(rename = "base_path")]
    pub path_prefix: String,

    /// Upstream base URL (`http://host[:port]`).
    #[serde(rename = "target")]
    pub upstream_base: String,
}

impl ServiceRoute {
    pub fn new(
        name: impl Into<String>,
        path_prefix: impl Into<String>,
        upstream_base: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path_prefix: path_prefix.into(),
            upstream_base: upstream_base.into(),
        }
    }
}

/// Parsed upstream location used to build outbound requests.
#[derive(Debug, Clone)]
pub struct UpstreamTarget {
    scheme: Scheme,
    authority: Authority,
    host_header: HeaderValue,
}

impl UpstreamTarget {
    /// Parse an upstream base URL.
    ///
    /// Only plain `http` targets without path, query, fragment or
    /// credentials are accepted.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let url = Url::parse(raw).map_err(|e| e.to_string())?;

        if url.scheme() != "http" {
            return Err(format!("unsupported scheme `{}`", url.scheme()));
        }
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| "missing host".to_string())?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err("credentials are not allowed".to_string());
        }
        if url.path() != "/" {
            return Err(format!("unexpected path `{}`", url.path()));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err("query and fragment are not allowed".to_string());
        }

        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let host_header = HeaderValue::from_str(&authority).map_err(|e| e.to_string())?;
        let authority = Authority::from_str(&authority).map_err(|e| e.to_string())?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            host_header,
        })
    }

    /// Value for the outbound `Host` header.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// Join the upstream base with an inbound path and query.
    pub fn uri_for(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        let path_and_query = PathAndQuery::from_str(path_and_query)?;
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
    }
}

/// A registered route: the configured triple plus its compiled forms.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    route: ServiceRoute,
    prefix: PathPrefix,
    upstream: UpstreamTarget,
}

impl RouteEntry {
    /// Validate and compile a route.
    pub(crate) fn compile(route: ServiceRoute) -> Result<Self, ConfigError> {
        if route.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let prefix =
            PathPrefix::parse(&route.path_prefix).map_err(|reason| ConfigError::InvalidPrefix {
                name: route.name.clone(),
                prefix: route.path_prefix.clone(),
                reason,
            })?;

        let upstream =
            UpstreamTarget::parse(&route.upstream_base).map_err(|reason| ConfigError::InvalidTarget {
                name: route.name.clone(),
                target: route.upstream_base.clone(),
                reason,
            })?;

        Ok(Self {
            route,
            prefix,
            upstream,
        })
    }

    pub fn name(&self) -> &str {
        &self.route.name
    }

    pub fn route(&self) -> &ServiceRoute {
        &self.route
    }

    pub fn prefix(&self) -> &PathPrefix {
        &self.prefix
    }

    pub fn upstream(&self) -> &UpstreamTarget {
        &self.upstream
    }
}
