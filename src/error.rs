use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error surface shared by every handler. Serialized as a JSON body of the
/// shape `{ "error": "...", "code": "..."? }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Unauthorized with a machine-readable code the frontend dispatches on
    /// (account status gating).
    #[error("{message}")]
    UnauthorizedCode { message: String, code: &'static str },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// Duplicate writes surface to the caller as a plain bad request.
    #[error("{0}")]
    Conflict(String),

    #[error("terjadi kesalahan pada server")]
    Database(#[from] sea_orm::DbErr),

    #[error("gagal menghubungi layanan pembayaran")]
    Gateway(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            Self::UnauthorizedCode { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl actix_web::error::ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::UnauthorizedCode { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::Database(err) => error!(%err, "database error"),
            Self::Gateway(err) => error!(%err, "payment gateway error"),
            _ => {}
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: &self.to_string(),
            code: self.code(),
        })
    }
}
