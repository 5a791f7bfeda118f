//! Service layer between routes and the hosted backend.

use thiserror::Error;

use crate::domain::feature_flag::FeatureFlag;
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod engagement;
pub mod feature_flags;
pub mod selection;
pub mod submit;
pub mod suppliers;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("feature disabled: {0}")]
    FeatureDisabled(FeatureFlag),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}
