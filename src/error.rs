use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::templates::{self, NotFoundTemplate, PageContext, ServerErrorTemplate};

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A connection pool error.
    #[error("Pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    /// A connection pool could not be built.
    #[error("Pool creation error: {0}")]
    CreatePool(#[from] deadpool_postgres::CreatePoolError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A row came back without an expected column.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// A password hashing error.
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Registration with a login that is already taken.
    #[error("Login already taken: {0}")]
    DuplicateLogin(String),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown login or wrong password.
    #[error("Invalid login or password")]
    InvalidCredentials,

    /// No valid session for a protected route.
    #[error("Authentication required")]
    Unauthenticated,

    /// A resource not found error.
    #[error("Resource not found")]
    NotFound,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthenticated => {
                tracing::debug!("Authentication required");
                StatusCode::UNAUTHORIZED.into_response()
            }

            AppError::InvalidCredentials => {
                tracing::warn!("Invalid credentials");
                StatusCode::UNAUTHORIZED.into_response()
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                error_page(StatusCode::NOT_FOUND, &NotFoundTemplate {
                    page: PageContext::default(),
                })
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone()).into_response()
            }

            AppError::DuplicateLogin(ref login) => {
                tracing::debug!("Login already taken: {}", login);
                (StatusCode::CONFLICT, "Login already taken").into_response()
            }

            ref e => {
                tracing::error!("❌ {}", e);
                error_page(StatusCode::INTERNAL_SERVER_ERROR, &ServerErrorTemplate {
                    page: PageContext::default(),
                })
            }
        }
    }
}

fn error_page<T: askama::Template>(status: StatusCode, template: &T) -> Response {
    match templates::render(template) {
        Ok(html) => (status, html).into_response(),
        Err(e) => {
            tracing::error!("❌ Failed to render error page: {}", e);
            (status, Html(status.to_string())).into_response()
        }
    }
}
