//! FX module - exchange-rate models, resolution, services, and traits.

mod fx_model;
mod fx_service;
mod fx_traits;
mod rate_calculations;
mod rate_resolution;


pub use fx_model::{Conversion, ExchangeRate, ExchangeRateQuery, RateEdge};
pub use fx_service::ExchangeRateService;
pub use fx_traits::{ExchangeRateRepositoryTrait, ExchangeRateServiceTrait};
pub use rate_calculations::{complete_rate_set, cross_rate, reciprocal_rate, round_rate};
pub use rate_resolution::{RateResolver, ResolutionStrategy};
