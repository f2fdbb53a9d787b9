//! Extractors whose rejections go through `GatewayError` instead of axum's plain-text
//! responses, so body and query parsing failures reach the error normalizer.
use axum::extract::{FromRequest, FromRequestParts, Query, rejection::QueryRejection};

use crate::error::GatewayError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(GatewayError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(GatewayError))]
pub struct ApiQuery<T>(pub T);

impl From<QueryRejection> for GatewayError {
    fn from(rejection: QueryRejection) -> Self {
        GatewayError::unhandled(rejection.body_text())
    }
}
