//! The single 401 payload shared by every authentication and authorization
//! failure.
//!
//! Callers cannot tell a missing cookie from a forged token or a missing role:
//! the body is byte-identical and only the server log records the reason.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blog_auth::TokenError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use utoipa::ToSchema;

use crate::metrics::track_auth_rejection;

pub const UNAUTHORIZED_ERROR_TYPE: &str = "Unauthorized";
pub const UNAUTHORIZED_MESSAGE: &str = "You are not allowed to access this path";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UnauthorizedBody {
    #[schema(example = "Unauthorized")]
    pub error_type: String,
    #[schema(example = "You are not allowed to access this path")]
    pub message: String,
    #[schema(example = 401)]
    pub status: u16,
}

impl Default for UnauthorizedBody {
    fn default() -> Self {
        Self {
            error_type: UNAUTHORIZED_ERROR_TYPE.to_string(),
            message: UNAUTHORIZED_MESSAGE.to_string(),
            status: StatusCode::UNAUTHORIZED.as_u16(),
        }
    }
}

pub fn unauthorized_response() -> Response {
    (StatusCode::UNAUTHORIZED, Json(UnauthorizedBody::default())).into_response()
}

/// Why a request was turned away. Logged, never serialized.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error("no session cookie")]
    MissingCredential,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("session lacks a required role")]
    InsufficientRole,
}

impl AuthFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::Token(err) => err.reason(),
            Self::InsufficientRole => "insufficient_role",
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let reason = self.reason();
        warn!(reason, error = %self, "Rejected request");
        track_auth_rejection(reason);
        unauthorized_response()
    }
}
