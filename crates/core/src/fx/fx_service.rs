use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;

use super::fx_model::{Conversion, ExchangeRate, ExchangeRateQuery};
use super::fx_traits::{ExchangeRateRepositoryTrait, ExchangeRateServiceTrait};
use super::rate_resolution::{RateResolver, ResolutionStrategy};
use crate::constants::CONVERSION_PRECISION;
use crate::currencies::{CurrencyCode, CurrencyRepositoryTrait};
use crate::errors::{Result, ValidationError};

#[derive(Clone)]
pub struct ExchangeRateService {
    repository: Arc<dyn ExchangeRateRepositoryTrait>,
    resolver: RateResolver,
}

impl ExchangeRateService {
    pub fn new(
        currencies: Arc<dyn CurrencyRepositoryTrait>,
        repository: Arc<dyn ExchangeRateRepositoryTrait>,
    ) -> Self {
        Self {
            resolver: RateResolver::new(currencies, repository.clone()),
            repository,
        }
    }
}

impl ExchangeRateServiceTrait for ExchangeRateService {
    fn get_rate(
        &self,
        query: &ExchangeRateQuery,
        strategy: ResolutionStrategy,
    ) -> Result<Option<ExchangeRate>> {
        self.resolver.resolve(query, strategy)
    }

    fn get_all_rates(&self) -> Result<Vec<ExchangeRate>> {
        self.repository.list()
    }

    fn add_rate(&self, rate: &ExchangeRate) -> Result<ExchangeRate> {
        debug!(
            "Adding rate {}->{}",
            rate.base_currency_code, rate.target_currency_code
        );
        self.repository.add(rate)
    }

    fn update_rate(&self, delta: &ExchangeRate) -> Result<ExchangeRate> {
        self.repository.update(delta)
    }

    fn convert(
        &self,
        base: &CurrencyCode,
        target: &CurrencyCode,
        amount: Decimal,
    ) -> Result<Option<Conversion>> {
        let query = ExchangeRateQuery::for_pair(base.clone(), target.clone());
        let Some(rate) = self.resolver.resolve(&query, ResolutionStrategy::ALL)? else {
            return Ok(None);
        };
        let Some(reduced) = rate.reduced_rate() else {
            return Ok(None);
        };
        let converted_amount = amount
            .checked_mul(reduced)
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "converting {} {} to {} overflows",
                    amount, base, target
                ))
            })?
            .round_dp(CONVERSION_PRECISION);
        Ok(Some(Conversion {
            base: base.clone(),
            target: target.clone(),
            rate,
            amount,
            converted_amount,
        }))
    }
}
