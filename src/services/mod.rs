use thiserror::Error;

use crate::auth::password::PasswordError;
use crate::auth::TokenError;
use crate::database::DatabaseError;

pub mod auth_service;
pub mod organization_service;

pub use auth_service::AuthService;
pub use organization_service::OrganizationService;

/// Failure taxonomy shared by the lifecycle and authentication services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Translate a store-level unique-constraint violation into `AlreadyExists`.
/// The constraint is the actual invariant guardian; the services' existence
/// checks beforehand only produce the same answer earlier.
pub(crate) fn map_unique_violation(err: sqlx::Error, message: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ServiceError::AlreadyExists(message.to_string())
        }
        _ => ServiceError::Sqlx(err),
    }
}
