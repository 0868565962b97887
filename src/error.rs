use serde::Serialize;
use thiserror::Error;

/// A user-correctable problem with one submitted field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Referenced row is absent
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Input rejected before anything was written
    #[error("invalid input: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Pool exhausted or closed; callers map this to "service unavailable"
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed)
        )
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for startup and CLI paths, where any failure ends the command
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = StoreError::Validation(vec![
            FieldError::new("name", "is required"),
            FieldError::new("city", "is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid input: name: is required; city: is required"
        );
    }

    #[test]
    fn test_pool_timeout_is_unavailable() {
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_unavailable());
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_unavailable());
        assert!(!StoreError::NotFound {
            entity: "venue",
            id: 1
        }
        .is_unavailable());
    }
}
