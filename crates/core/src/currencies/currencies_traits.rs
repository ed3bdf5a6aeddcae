//! Currency repository and service traits.
//!
//! These traits define the contract for currency operations without any
//! database-specific types, allowing for different storage implementations.

use super::currencies_model::Currency;
use crate::errors::Result;

/// Trait defining the contract for Currency repository operations.
///
/// Mutating operations are expected to run inside a single transaction each:
/// a failed call must leave the store untouched.
pub trait CurrencyRepositoryTrait: Send + Sync {
    /// Looks up one currency by the identity fields present on `query`
    /// (`id` and/or `code`, combined as a conjunction).
    ///
    /// Absence is `Ok(None)`. A query without identity fields fails with
    /// `Error::IdentityMissing`.
    fn get(&self, query: &Currency) -> Result<Option<Currency>>;

    /// Lists every currency ordered by id.
    fn list(&self) -> Result<Vec<Currency>>;

    /// Inserts a new currency and returns the stored record.
    fn add(&self, currency: &Currency) -> Result<Currency>;

    /// Applies the mutable fields of `delta` to the addressed currency and
    /// returns the post-update record.
    fn update(&self, delta: &Currency) -> Result<Currency>;
}

/// Trait defining the contract for Currency service operations.
pub trait CurrencyServiceTrait: Send + Sync {
    fn get_currency(&self, query: &Currency) -> Result<Option<Currency>>;

    fn get_all_currencies(&self) -> Result<Vec<Currency>>;

    fn add_currency(&self, currency: &Currency) -> Result<Currency>;

    fn update_currency(&self, delta: &Currency) -> Result<Currency>;

    /// Inserts the catalog entries whose code is not stored yet.
    ///
    /// Returns the number of inserted currencies.
    fn seed_currencies(&self, catalog: &[Currency]) -> Result<usize>;
}
