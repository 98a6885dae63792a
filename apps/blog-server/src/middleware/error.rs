//! Handler error type.
//!
//! 403, 404 and 500 bodies are plain text here; [`super::error_pages`]
//! replaces them with the site's HTML pages.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use thiserror::Error;

use blogicum_core::error::{DomainError, RepoError};
use blogicum_core::ports::AuthError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// CSRF cookie and form token missing or different.
    #[error("CSRF verification failed")]
    CsrfFailure,
    /// The page needs a session; carries the URL to come back to.
    #[error("Login required for {0}")]
    LoginRequired(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// `/auth/login?next=<path>`.
pub fn login_url(next: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("/auth/login?next={}", encoded)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::CsrfFailure => StatusCode::FORBIDDEN,
            AppError::LoginRequired(_) => StatusCode::FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired(next) => HttpResponse::Found()
                .insert_header((header::LOCATION, login_url(next)))
                .finish(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError().body("Server error")
            }
            other => HttpResponse::build(other.status_code()).body(other.to_string()),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation(errors) => AppError::BadRequest(errors.to_string()),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                AppError::BadRequest("The data conflicts with existing records".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        // Tera keeps the useful part in the source chain.
        let mut detail = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        AppError::Internal(detail)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(login_url("/posts/1/edit"), "/auth/login?next=%2Fposts%2F1%2Fedit");
        assert_eq!(login_url("/?page=2"), "/auth/login?next=%2F%3Fpage%3D2");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::CsrfFailure.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::from(RepoError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(DomainError::not_found("post", 3)).status_code(),
            StatusCode::NOT_FOUND
        );

        let conflict = AppError::from(RepoError::Constraint("users_username_key".into()));
        assert_eq!(conflict.status_code(), StatusCode::BAD_REQUEST);
        assert!(!conflict.to_string().contains("users_username_key"));

        let redirect = AppError::LoginRequired("/posts/create".into()).error_response();
        assert_eq!(redirect.status(), StatusCode::FOUND);
        assert_eq!(
            redirect.headers().get(header::LOCATION).unwrap(),
            "/auth/login?next=%2Fposts%2Fcreate"
        );
    }
}
