use rust_decimal::Decimal;

use super::fx_model::{Conversion, ExchangeRate, ExchangeRateQuery, RateEdge};
use super::rate_resolution::ResolutionStrategy;
use crate::currencies::CurrencyCode;
use crate::errors::Result;

/// Trait defining the contract for exchange-rate repository operations.
///
/// Stored rates are normalized to one unit: `add` and `update` persist
/// `reduced_rate()` and reads return `units = Some(1)`.
pub trait ExchangeRateRepositoryTrait: Send + Sync {
    /// Looks up one rate by the conjunction of the identity fields present on
    /// `query`. Absence is `Ok(None)`.
    fn get(&self, query: &ExchangeRateQuery) -> Result<Option<ExchangeRate>>;

    fn list(&self) -> Result<Vec<ExchangeRate>>;

    fn add(&self, rate: &ExchangeRate) -> Result<ExchangeRate>;

    /// Applies `delta.rate` (reduced) and/or `delta.info_source` to the
    /// addressed rate and returns the post-update record.
    fn update(&self, delta: &ExchangeRate) -> Result<ExchangeRate>;

    /// Stored edges leaving the given currency.
    fn edges_from(&self, currency_id: i32) -> Result<Vec<RateEdge>>;
}

/// Trait defining the contract for exchange-rate service operations.
pub trait ExchangeRateServiceTrait: Send + Sync {
    /// Resolves a rate, deriving it with the requested strategies when no
    /// direct edge exists.
    fn get_rate(
        &self,
        query: &ExchangeRateQuery,
        strategy: ResolutionStrategy,
    ) -> Result<Option<ExchangeRate>>;

    fn get_all_rates(&self) -> Result<Vec<ExchangeRate>>;

    fn add_rate(&self, rate: &ExchangeRate) -> Result<ExchangeRate>;

    fn update_rate(&self, delta: &ExchangeRate) -> Result<ExchangeRate>;

    /// Converts `amount` of `base` into `target` using every resolution
    /// strategy. `Ok(None)` when no rate can be found.
    fn convert(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Option<Conversion>>;
}
