use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Maps a non-success HTTP status returned by the hosted backend.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            404 => RepositoryError::NotFound,
            409 => RepositoryError::ConstraintViolation(format!(
                "This record already exists: {body}"
            )),
            400 | 422 => RepositoryError::ValidationError(body.to_string()),
            500..=599 => RepositoryError::BackendError(format!("status {status}: {body}")),
            _ => RepositoryError::Unexpected(format!("status {status}: {body}")),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::ValidationError(format!("Deserialization error: {err}"))
    }
}

#[cfg(feature = "server")]
impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return RepositoryError::from_status(status.as_u16(), &err.to_string());
        }
        if err.is_timeout() || err.is_connect() || err.is_request() {
            return RepositoryError::ConnectionError(format!("Connection error: {err}"));
        }
        if err.is_decode() || err.is_body() {
            return RepositoryError::ValidationError(format!("Deserialization error: {err}"));
        }
        RepositoryError::Unexpected(format!("Unexpected HTTP error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            RepositoryError::from_status(404, ""),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            RepositoryError::from_status(409, "slug"),
            RepositoryError::ConstraintViolation(_)
        ));
        assert!(matches!(
            RepositoryError::from_status(503, "down"),
            RepositoryError::BackendError(_)
        ));
        assert!(matches!(
            RepositoryError::from_status(418, ""),
            RepositoryError::Unexpected(_)
        ));
    }
}
