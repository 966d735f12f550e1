use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;

use crate::types::Envelope;

/// Every failure a request can end in.
///
/// `Auth` renders as 401, everything else as 400. The rendered body is always
/// the `FAIL` envelope carrying the `Display` text of the error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or rejected caller credentials, missing CSRF state, or a
    /// failed token exchange.
    #[error("{0}")]
    Auth(String),

    /// A required identifier is missing or the request could not be parsed.
    #[error("{0}")]
    Validation(String),

    /// The Spotify API answered with a non-2xx status, timed out, or could
    /// not be reached.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
        body: Option<Value>,
    },

    /// A reply could not be assembled: a fan-out task could not be joined or
    /// the result could not be encoded.
    #[error("{0}")]
    Aggregation(String),
}

impl ApiError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::Upstream { .. } | Self::Aggregation(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Re-tags an upstream failure as an auth failure, keeping its message.
    /// Used where the upstream call is itself a credential exchange.
    pub fn into_auth(self) -> Self {
        match self {
            Self::Upstream { message, .. } => Self::Auth(message),
            other => other,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Upstream {
                status: upstream, ..
            } => tracing::warn!(upstream_status = ?upstream, error = %self, "upstream call failed"),
            _ => tracing::debug!(status = status.as_u16(), error = %self, "request rejected"),
        }

        (status, Json(Envelope::fail(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_unauthorized() {
        assert_eq!(ApiError::auth("denied").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Aggregation("join".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn into_auth_keeps_upstream_message() {
        let err = ApiError::Upstream {
            status: Some(400),
            message: "invalid_grant".into(),
            body: None,
        };
        let err = err.into_auth();
        assert!(matches!(err, ApiError::Auth(ref m) if m == "invalid_grant"));
    }
}
