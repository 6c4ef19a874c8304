//! The module contains the error the engine can throw.
//!
//! Every variant except [`Database`] is raised before anything is written, so
//! callers can rely on the ledger being untouched when they see one. A
//! [`Database`] error aborts the surrounding database transaction.
//!
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A required field is missing or invalid (e.g. a non-positive amount).
    #[error("Invalid input: {0}")]
    Validation(String),
    /// A referenced row does not exist.
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    /// The row exists but belongs to another user.
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    /// The row cannot be deleted while other rows reference it.
    #[error("Still in use: {0}")]
    InUse(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InUse(a), Self::InUse(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
