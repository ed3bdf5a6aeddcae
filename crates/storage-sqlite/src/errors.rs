//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap Diesel-specific errors and convert
//! them to the database-agnostic error types defined in `currex_core`.
//! Constraint violations become the CRUD taxonomy variants of the core error.

use currex_core::errors::{DatabaseError, Error};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `currex_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A core error raised inside a transaction; handed back unchanged.
    #[error(transparent)]
    Core(#[from] Error),
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::Database(DatabaseError::NotFound("Record not found".to_string()))
            }
            StorageError::QueryFailed(DieselError::DatabaseError(kind, info)) => {
                constraint_error(kind, info.as_ref())
            }
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::Core(e) => e,
        }
    }
}

fn constraint_error(kind: DatabaseErrorKind, info: &dyn DatabaseErrorInformation) -> Error {
    let message = info.message().to_string();
    match kind {
        DatabaseErrorKind::UniqueViolation => Error::DuplicateIdentity(message),
        DatabaseErrorKind::ForeignKeyViolation => Error::ReferentialIntegrity(message),
        DatabaseErrorKind::NotNullViolation => Error::RequiredFieldMissing(
            info.column_name()
                .map(str::to_string)
                .unwrap_or_else(|| not_null_column(&message)),
        ),
        _ => Error::Database(DatabaseError::QueryFailed(message)),
    }
}

/// Extracts `column` from SQLite's `NOT NULL constraint failed: table.column`.
fn not_null_column(message: &str) -> String {
    message
        .rsplit(['.', ' '])
        .next()
        .filter(|column| !column.is_empty())
        .unwrap_or(message)
        .to_string()
}

/// Extension trait for easily converting Diesel Results to core Results.
///
/// This provides a `.into_core()` method on any `Result<T, diesel::result::Error>`
/// which handles the conversion through StorageError.
pub trait IntoCore<T> {
    fn into_core(self) -> currex_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> currex_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> currex_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, StorageError> {
    fn into_core(self) -> currex_core::Result<T> {
        self.map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use currex_core::ErrorKind;

    #[test]
    fn test_not_null_column_is_extracted() {
        assert_eq!(
            not_null_column("NOT NULL constraint failed: currency.full_name"),
            "full_name"
        );
        assert_eq!(not_null_column("weird"), "weird");
    }

    #[test]
    fn test_core_error_passes_through_unchanged() {
        let err: Error = StorageError::from(Error::NoRecordToModify("x".into())).into();
        assert_eq!(err.kind(), ErrorKind::NoRecordToModify);
    }

    #[test]
    fn test_not_found_maps_to_query_kind() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert_eq!(err.kind(), ErrorKind::Query);
    }
}
