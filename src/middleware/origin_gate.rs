//! Origin gate: allow-list CORS policy for browser clients.
//!
//! Policy:
//! - No `Origin` header (same-origin, server-to-server, health checks): allow.
//! - `Origin` in the allow-list: allow, with CORS response headers.
//! - Anything else: reject with `GatewayError::OriginRejected` (403), before any handler runs.
//! - Credentials are never allowed.
//!
//! Preflight (`OPTIONS`, any path) gets the same decision. Allowed preflights are answered
//! by the `CorsLayer` with an empty body and never reach the router.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, header},
    middleware::{self, Next},
    response::Response,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::error::GatewayError;

pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

/// Static allow-list, fixed for the process lifetime.
#[derive(Clone, Debug)]
pub struct AllowedOrigins {
    origins: Arc<HashSet<String>>,
}

impl AllowedOrigins {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            origins: Arc::new(origins.into_iter().map(Into::into).collect()),
        }
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }

    /// Pure decision on the raw `Origin` header.
    pub fn check(&self, origin: Option<&HeaderValue>) -> Result<(), GatewayError> {
        let Some(origin) = origin else {
            return Ok(());
        };

        // An empty header counts as absent. Non-UTF-8 can never match.
        match origin.to_str() {
            Ok("") => Ok(()),
            Ok(s) if self.contains(s) => Ok(()),
            _ => Err(GatewayError::OriginRejected),
        }
    }

    fn cors_layer(&self) -> CorsLayer {
        let allowed: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(ALLOWED_METHODS)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(false)
    }
}

async fn origin_gate(
    State(allowed): State<AllowedOrigins>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, GatewayError> {
    allowed.check(req.headers().get(header::ORIGIN))?;
    Ok(next.run(req).await)
}

/// Apply the gate (outer) and the CORS header layer (inner) to the given Router.
pub fn apply(router: Router, allowed: AllowedOrigins) -> Router {
    let cors = allowed.cors_layer();
    router
        .layer(cors)
        .layer(middleware::from_fn_with_state(allowed, origin_gate))
}
