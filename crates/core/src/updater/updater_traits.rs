use chrono::NaiveDate;

use super::updater_model::{AppealState, RateSource, SourceSchema};
use crate::errors::Result;
use crate::fx::ExchangeRate;

/// Trait defining the contract for rate-source metadata storage.
///
/// Every query goes through the table and columns named by [`Self::schema`].
pub trait RateSourceRepositoryTrait: Send + Sync {
    fn schema(&self) -> &SourceSchema;

    fn source_exists(&self, source_id: i32) -> Result<bool>;

    /// Ids of every registered source, ascending.
    fn source_ids(&self) -> Result<Vec<i32>>;

    fn get_appeal_state(&self, source_id: i32) -> Result<Option<AppealState>>;

    fn get_source_path(&self, source_id: i32) -> Result<Option<String>>;

    /// Sets the last-appeal date of a source.
    ///
    /// With `commit` the write runs in its own immediate transaction;
    /// otherwise it is a single autocommit statement. There is no
    /// caller-held transaction, so `commit = false` cannot defer the stamp:
    /// both forms take a fresh pooled connection and are durable on return.
    fn stamp_last_appeal(&self, source_id: i32, date: NaiveDate, commit: bool) -> Result<()>;

    /// Registers a source and returns the stored row.
    fn add_source(&self, src_path: &str, days_valid: i32) -> Result<RateSource>;
}

/// Supplies raw rate records for a source location.
pub trait RateFetcher: Send + Sync {
    fn fetch(&self, path: &str) -> Result<Vec<ExchangeRate>>;
}

impl<F> RateFetcher for F
where
    F: Fn(&str) -> Result<Vec<ExchangeRate>> + Send + Sync,
{
    fn fetch(&self, path: &str) -> Result<Vec<ExchangeRate>> {
        self(path)
    }
}
