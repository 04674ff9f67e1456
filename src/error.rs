//! Error types for store and authentication failures.

use serde::Serialize;
use thiserror::Error;

/// Failure surfaced by an account or session store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint rejected an insert.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    /// The store could not be reached or the call did not complete.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field the message belongs to.
    pub field: &'static str,
    /// Human-readable message, ready for form rendering.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Caller-visible authentication outcome.
///
/// Every variant except `Store` is a normal, recoverable response to user
/// input; none of them abort the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown identifier, identifier-field mismatch, or wrong password.
    /// Deliberately collapsed into a single message so responses never
    /// reveal which part failed.
    #[error("invalid login credentials")]
    InvalidCredentials,
    /// An account with the requested identifier already exists.
    #[error("an account with that identifier already exists")]
    AccountExists,
    /// Field-level input errors, in form order.
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    /// The password-hashing primitive rejected its inputs.
    #[error("password hashing failed")]
    Hash,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Ordered, human-readable messages for form rendering.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors.iter().map(|error| error.message.clone()).collect(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_preserve_order() {
        let error = AuthError::Validation(vec![
            FieldError {
                field: "username",
                message: "first".to_string(),
            },
            FieldError {
                field: "password",
                message: "second".to_string(),
            },
        ]);
        assert_eq!(error.messages(), vec!["first", "second"]);
    }

    #[test]
    fn store_errors_convert_transparently() {
        let error = AuthError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(error.to_string(), "store unavailable: connection refused");
    }

    #[test]
    fn invalid_credentials_is_a_single_generic_message() {
        assert_eq!(
            AuthError::InvalidCredentials.messages(),
            vec!["invalid login credentials"]
        );
    }
}
