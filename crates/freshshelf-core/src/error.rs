//! Domain errors
//!
//! Outcomes the user needs to see. Storage problems never show up here;
//! they are absorbed by the storage layer.

use thiserror::Error;

/// Errors returned by user and item operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A user with this name already exists (names compare case-insensitively)
    #[error("Username '{0}' already exists. Please choose another.")]
    DuplicateUsername(String),

    /// A field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// No record matched
    #[error("{0} not found")]
    RecordNotFound(String),
}

impl DomainError {
    pub(crate) fn too_short(field: &'static str, min: usize) -> Self {
        DomainError::InvalidInput {
            field,
            reason: format!("must be at least {} characters long", min),
        }
    }

    pub(crate) fn empty(field: &'static str) -> Self {
        DomainError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DomainError::too_short("username", 3).to_string(),
            "Invalid username: must be at least 3 characters long"
        );
        assert_eq!(
            DomainError::DuplicateUsername("alice".into()).to_string(),
            "Username 'alice' already exists. Please choose another."
        );
        assert_eq!(
            DomainError::RecordNotFound("Item 5".into()).to_string(),
            "Item 5 not found"
        );
    }
}
