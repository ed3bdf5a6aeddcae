//! Core error types for currex.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::fmt;
use std::str::FromStr;

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the rate engine.
///
/// Every CRUD failure is normalized into one of the identity/constraint variants
/// so callers can branch on [`ErrorKind`] instead of inspecting messages.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No identity field given to address {0}")]
    IdentityMissing(String),

    #[error("Required field '{0}' is missing")]
    RequiredFieldMissing(String),

    #[error("Record of such identity already exists: {0}")]
    DuplicateIdentity(String),

    #[error("No record to modify: {0}")]
    NoRecordToModify(String),

    #[error("Referenced record does not exist: {0}")]
    ReferentialIntegrity(String),

    #[error("Invalid usage: {0}")]
    InvalidUsage(String),

    #[error("Rates updater error: {0}")]
    Updater(#[from] UpdaterError),

    #[error("Failed to fetch rates: {0}")]
    Fetch(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

impl Error {
    /// Returns the discriminant used by callers that need to branch on the
    /// failure category (e.g. the updater's soft-failure policy).
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Database(DatabaseError::QueryFailed(_))
            | Error::Database(DatabaseError::NotFound(_)) => ErrorKind::Query,
            Error::Database(_) => ErrorKind::Database,
            Error::Validation(_) => ErrorKind::Validation,
            Error::IdentityMissing(_) => ErrorKind::IdentityMissing,
            Error::RequiredFieldMissing(_) => ErrorKind::RequiredFieldMissing,
            Error::DuplicateIdentity(_) => ErrorKind::DuplicateIdentity,
            Error::NoRecordToModify(_) => ErrorKind::NoRecordToModify,
            Error::ReferentialIntegrity(_) => ErrorKind::ReferentialIntegrity,
            Error::InvalidUsage(_) => ErrorKind::InvalidUsage,
            Error::Updater(_) => ErrorKind::Updater,
            Error::Fetch(_) => ErrorKind::Fetch,
            Error::ConfigIO(_) | Error::InvalidConfigValue(_) => ErrorKind::Config,
        }
    }
}

/// Error categories, independent of the message payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    IdentityMissing,
    RequiredFieldMissing,
    DuplicateIdentity,
    NoRecordToModify,
    ReferentialIntegrity,
    InvalidUsage,
    /// A store query failed without matching a known constraint.
    Query,
    Database,
    Updater,
    Fetch,
    Config,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 12] = [
        ErrorKind::Validation,
        ErrorKind::IdentityMissing,
        ErrorKind::RequiredFieldMissing,
        ErrorKind::DuplicateIdentity,
        ErrorKind::NoRecordToModify,
        ErrorKind::ReferentialIntegrity,
        ErrorKind::InvalidUsage,
        ErrorKind::Query,
        ErrorKind::Database,
        ErrorKind::Updater,
        ErrorKind::Fetch,
        ErrorKind::Config,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::IdentityMissing => "identity_missing",
            ErrorKind::RequiredFieldMissing => "required_field_missing",
            ErrorKind::DuplicateIdentity => "duplicate_identity",
            ErrorKind::NoRecordToModify => "no_record_to_modify",
            ErrorKind::ReferentialIntegrity => "referential_integrity",
            ErrorKind::InvalidUsage => "invalid_usage",
            ErrorKind::Query => "query",
            ErrorKind::Database => "database",
            ErrorKind::Updater => "updater",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::InvalidConfigValue(format!("Unknown error kind '{}'", s)))
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid currency code '{0}' (expected exactly 3 uppercase letters)")]
    InvalidCurrencyCode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

/// Errors raised by the scheduled updater and its registry.
#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("An updater for source {0} is already registered")]
    AlreadyRegistered(i32),

    #[error("No rate source with id {0}")]
    UnknownSource(i32),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_database_errors() {
        let query = Error::Database(DatabaseError::QueryFailed("boom".into()));
        assert_eq!(query.kind(), ErrorKind::Query);

        let pool = Error::Database(DatabaseError::PoolCreationFailed("boom".into()));
        assert_eq!(pool.kind(), ErrorKind::Database);
    }

    #[test]
    fn test_error_kind_parses_its_own_name() {
        for kind in ErrorKind::ALL {
            assert_eq!(kind.as_str().parse::<ErrorKind>().unwrap(), kind);
        }
        assert_eq!(
            "No-Record-To-Modify".parse::<ErrorKind>().unwrap(),
            ErrorKind::NoRecordToModify
        );
        assert!("nonsense".parse::<ErrorKind>().is_err());
    }
}
