//! SQLite storage implementation for exchange rates.

mod model;
mod repository;

pub use model::{ExchangeRateChangesetDB, ExchangeRateDB, NewExchangeRateDB};
pub use repository::ExchangeRateRepository;
