//! SQLite storage implementation for currencies.

mod model;
mod repository;

pub use model::{CurrencyChangesetDB, CurrencyDB, NewCurrencyDB};
pub use repository::CurrencyRepository;

pub(crate) use repository::currency_id_by_code;
