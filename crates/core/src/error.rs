//! Error model for the identity and access-control subsystem.

use thiserror::Error;

/// Result type used across guardpost crates.
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-level error.
///
/// Every variant carries a stable, user-presentable message. Infrastructure
/// failures (storage, hashing, signing) surface as `Internal` and are never
/// rewritten into authorization failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Bad credentials, or a missing/expired/invalid/revoked/malformed token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Valid identity, insufficient permission.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness violation (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A referenced principal or role does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input rejected at the boundary.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Collaborator or infrastructure failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`AuthError`], handy for transport mapping and assertions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    Forbidden,
    Conflict,
    NotFound,
    Validation,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Internal => "internal_error",
        }
    }
}

impl AuthError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthorized(_) => ErrorKind::Unauthorized,
            AuthError::Forbidden(_) => ErrorKind::Forbidden,
            AuthError::Conflict(_) => ErrorKind::Conflict,
            AuthError::NotFound(_) => ErrorKind::NotFound,
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            AuthError::Unauthorized(m)
            | AuthError::Forbidden(m)
            | AuthError::Conflict(m)
            | AuthError::NotFound(m)
            | AuthError::Validation(m)
            | AuthError::Internal(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_message_are_stable() {
        let err = AuthError::unauthorized("Invalid credentials");
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.kind().code(), "unauthorized");
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.to_string(), "unauthorized: Invalid credentials");
    }

    #[test]
    fn forbidden_is_distinct_from_unauthorized() {
        assert_ne!(
            AuthError::forbidden("x").kind(),
            AuthError::unauthorized("x").kind()
        );
    }
}
