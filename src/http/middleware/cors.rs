//! CORS middleware.
//! Answers preflight requests and decorates every other response.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{self, HeaderMap, HeaderValue, InvalidHeaderValue},
        Method, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;

/// Compiled CORS policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    any_origin: bool,
    origins: Vec<HeaderValue>,
    methods: HeaderValue,
    headers: HeaderValue,
    expose: Option<HeaderValue>,
    max_age: HeaderValue,
    allow_credentials: bool,
}

fn join(values: &[String]) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&values.join(", "))
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        let any_origin = config.allowed_origins.iter().any(|o| o == "*");
        let origins = config
            .allowed_origins
            .iter()
            .filter(|o| o.as_str() != "*")
            .map(|o| HeaderValue::from_str(o))
            .collect::<Result<Vec<_>, _>>()?;

        let expose = if config.expose_headers.is_empty() {
            None
        } else {
            Some(join(&config.expose_headers)?)
        };

        Ok(Self {
            any_origin,
            origins,
            methods: join(&config.allowed_methods)?,
            headers: join(&config.allowed_headers)?,
            expose,
            max_age: HeaderValue::from(config.max_age_secs),
            allow_credentials: config.allow_credentials,
        })
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` if the origin is refused.
    ///
    /// Only explicitly listed origins are reflected. A wildcard policy always
    /// answers with a literal `*`, which browsers refuse to combine with
    /// credentials.
    fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<(HeaderValue, bool)> {
        match origin {
            Some(origin) if self.origins.contains(origin) => Some((origin.clone(), true)),
            _ if self.any_origin => Some((HeaderValue::from_static("*"), false)),
            _ => None,
        }
    }

    fn apply_common(&self, headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
        if let Some((allow, reflected)) = self.allow_origin(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow);
            if reflected {
                headers.append(header::VARY, HeaderValue::from_static("Origin"));
            }
            if self.allow_credentials {
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                );
            }
        }
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, self.methods.clone());
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.headers.clone());
    }

    /// Headers for a preflight (`OPTIONS`) answer.
    pub fn apply_preflight(&self, headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
        self.apply_common(headers, origin);
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
    }

    /// Headers appended to a dispatched response.
    pub fn apply_simple(&self, headers: &mut HeaderMap, origin: Option<&HeaderValue>) {
        self.apply_common(headers, origin);
        if let Some(expose) = &self.expose {
            headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, expose.clone());
        }
    }
}

pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    if *request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        policy.apply_preflight(response.headers_mut(), origin.as_ref());
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply_simple(response.headers_mut(), origin.as_ref());
    response
}
