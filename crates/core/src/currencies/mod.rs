//! Currencies module - domain models, services, and traits.

mod currencies_model;
mod currencies_service;
mod currencies_traits;
mod currency_catalog;

#[cfg(test)]
mod currencies_model_tests;

pub use currencies_model::{is_valid_currency_code, Currency, CurrencyCode};
pub use currencies_service::CurrencyService;
pub use currencies_traits::{CurrencyRepositoryTrait, CurrencyServiceTrait};
pub use currency_catalog::parse_currency_catalog;
