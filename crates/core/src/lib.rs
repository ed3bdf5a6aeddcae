//! Currex Core - Domain entities, services, and traits.
//!
//! This crate contains the currency and exchange-rate engine: validated
//! models, identity and field mapping, rate resolution and the scheduled
//! rates updater. It is database-agnostic and defines traits that are
//! implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod currencies;
pub mod errors;
pub mod fields;
pub mod fx;
pub mod updater;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
