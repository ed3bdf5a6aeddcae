//! SQLite storage implementation for currex.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `currex-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for currencies, exchange rates and rate sources
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod currencies;
pub mod fx;
pub mod rate_sources;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, verify_columns, DbConnection, DbPool,
    DbTransactionExecutor,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from currex-core for convenience
pub use currex_core::errors::{DatabaseError, Error, Result};
