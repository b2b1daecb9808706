//! Unified application error model for the HTTP layer.
//! Identity-layer failures arrive as [`StoreError`] and are folded into [`AppError`]
//! before they reach a response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::identity::{SessionError, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Auth { code: String, message: String },
    Io { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Auth { code, .. }
            | AppError::Io { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::NotFound { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::Auth { message, .. }
            | AppError::Io { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn not_found<S: Into<String>>(code: S, msg: S) -> Self { AppError::NotFound { code: code.into(), message: msg.into() } }
    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Map to HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::NotFound { .. } => 404,
            AppError::Conflict { .. } => 409,
            AppError::Auth { .. } => 401,
            AppError::Io { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::AccountNotFound(_) => AppError::NotFound { code: "account_not_found".into(), message },
            StoreError::DuplicateUsername(_) | StoreError::DuplicateEmail(_) => {
                AppError::Conflict { code: "duplicate_account".into(), message }
            }
            StoreError::Credentials(_) => AppError::Internal { code: "credentials".into(), message },
            StoreError::Unavailable(_) => AppError::Io { code: "store_unavailable".into(), message },
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        AppError::Internal { code: "session_issue".into(), message: err.to_string() }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal".into(), message: err.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = self.code_str(), "request failed: {}", self.message());
        }
        (status, Json(serde_json::json!({"status":"error","code": self.code_str(),"message": self.message()}))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_mapping() {
        assert_eq!(AppError::not_found("not_found", "missing").http_status(), 404);
        assert_eq!(AppError::auth("auth", "no").http_status(), 401);
        assert_eq!(AppError::internal("internal", "panic").http_status(), 500);
    }

    #[test]
    fn store_errors_fold_into_app_errors() {
        let e: AppError = StoreError::DuplicateEmail("a@b.c".into()).into();
        assert_eq!(e.http_status(), 409);
        assert_eq!(e.code_str(), "duplicate_account");
        assert!(e.message().contains("a@b.c"));

        let e: AppError = StoreError::AccountNotFound(7).into();
        assert_eq!(e.http_status(), 404);

        let e: AppError = StoreError::Unavailable("down".into()).into();
        assert_eq!(e.http_status(), 503);

        let e: AppError = SessionError::TtlOutOfRange(std::time::Duration::MAX).into();
        assert_eq!((e.http_status(), e.code_str()), (500, "session_issue"));
    }

    #[test]
    fn display_joins_code_and_message() {
        assert_eq!(AppError::auth("invalid_credentials", "no match").to_string(), "invalid_credentials: no match");
    }
}
