//! # DomainError
//!
//! Centralized error handling for the Rusty-Blog ecosystem.
//! Every variant aborts the operation with no partial persistence.

use thiserror::Error;
use uuid::Uuid;

/// The primary error type for all domain operations and store ports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed registration fields. Carries a human-readable reason.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} does not exist")]
    UserNotFound(String),

    #[error("post {0} does not exist")]
    PostNotFound(Uuid),

    #[error("comment {0} does not exist")]
    CommentNotFound(Uuid),

    /// The user exists but is logged out.
    #[error("session locked: {0}")]
    SessionLocked(String),

    #[error("invalid login details")]
    InvalidCredentials,

    /// Identified, but not permitted (e.g. deleting someone else's comment).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Infrastructure failure (e.g. DB down, poisoned lock).
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// A specialized Result type for Rusty-Blog logic.
pub type Result<T> = std::result::Result<T, DomainError>;
