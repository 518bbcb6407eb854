//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`Validation`] returned by the boundary helpers when user input is malformed.
//! - [`NotFound`] returned when an expense id has no matching record.
//! - [`InvalidRecord`] returned when a stored row cannot be decoded.
//! - [`Database`] returned when the underlying storage fails.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`InvalidRecord`]: EngineError::InvalidRecord
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Preferences io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preferences format error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
