/*
 * Responsibility
 * - リクエスト経路で共通の GatewayError 定義
 * - IntoResponse 実装 = エラー正規化 (HTTP status / {"error": ...} JSON)
 * - RepoError / JsonRejection / CheckoutError などを統一的に変換
 */
use std::any::Any;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::checkout::CheckoutError;

pub const ORIGIN_REJECTED_MESSAGE: &str = "Not allowed by CORS";
pub const FALLBACK_MESSAGE: &str = "Something went wrong!";

type Source = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Not allowed by CORS")]
    OriginRejected,
    #[error("{message}")]
    Unhandled {
        message: String,
        #[source]
        source: Option<Source>,
    },
}

impl GatewayError {
    pub fn unhandled(message: impl Into<String>) -> Self {
        Self::Unhandled {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(message: impl Into<String>, source: impl Into<Source>) -> Self {
        Self::Unhandled {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::OriginRejected => StatusCode::FORBIDDEN,
            GatewayError::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client sees. Never includes the source chain.
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::OriginRejected => ORIGIN_REJECTED_MESSAGE.to_string(),
            GatewayError::Unhandled { message, .. } if !message.trim().is_empty() => {
                message.clone()
            }
            GatewayError::Unhandled { .. } => FALLBACK_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();

        // full detail goes to the log only
        match &self {
            GatewayError::OriginRejected => tracing::warn!(error = ?self, "request rejected"),
            GatewayError::Unhandled { .. } => tracing::error!(error = ?self, "request failed"),
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for GatewayError {
    fn from(e: RepoError) -> Self {
        let message = e.to_string();
        GatewayError::with_source(message, e)
    }
}

impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::unhandled(rejection.body_text())
    }
}

impl From<CheckoutError> for GatewayError {
    fn from(e: CheckoutError) -> Self {
        GatewayError::unhandled(e.to_string())
    }
}

/// Panics caught by the HTTP layer end up here. The payload is logged, not returned.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "handler panicked");

    GatewayError::unhandled(FALLBACK_MESSAGE).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn origin_rejection_is_403_with_fixed_message() {
        let res = GatewayError::OriginRejected.into_response();

        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(res).await,
            serde_json::json!({"error": "Not allowed by CORS"})
        );
    }

    #[tokio::test]
    async fn unhandled_keeps_its_message_as_500() {
        let res = GatewayError::unhandled("Cart is empty").into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "Cart is empty");
    }

    #[tokio::test]
    async fn blank_message_falls_back() {
        let res = GatewayError::unhandled("  ").into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], FALLBACK_MESSAGE);
    }

    // status comes from the kind, not from the wording
    #[tokio::test]
    async fn unhandled_with_cors_wording_is_still_500() {
        let res = GatewayError::unhandled(ORIGIN_REJECTED_MESSAGE).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn store_errors_do_not_leak_driver_detail() {
        let err: GatewayError = RepoError::Db(sqlx::Error::PoolTimedOut).into();
        let res = err.into_response();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "db error");
    }

    #[tokio::test]
    async fn panic_payload_is_not_exposed() {
        let res = panic_response(Box::new("secret detail"));

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], FALLBACK_MESSAGE);
    }
}
