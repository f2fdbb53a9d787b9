/*
 * Responsibility
 * - リクエストパイプラインの組み立て (順序をここで固定する)
 */
pub mod http;
pub mod origin_gate;
pub mod security_headers;

use axum::Router;

use crate::config::Config;
use origin_gate::AllowedOrigins;

/// Wraps the routes in the request pipeline.
///
/// A request passes the stages in this order:
/// 1. request id, tracing, panic capture, timeout (`http`)
/// 2. security response headers
/// 3. origin gate, then CORS headers / preflight answer
/// 4. routes (JSON body parsing happens in the `ApiJson` extractor)
///
/// Every failure along the way is a `GatewayError`, whose `IntoResponse` is the single
/// place error responses are written. Layers are applied innermost first.
pub fn apply(router: Router, config: &Config) -> Router {
    let allowed = AllowedOrigins::new(config.cors_allowed_origins.iter().cloned());

    let router = origin_gate::apply(router, allowed);
    let router = security_headers::apply(router);
    http::apply(router)
}
