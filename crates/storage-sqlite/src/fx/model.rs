//! Database models for exchange rates.

use std::str::FromStr;

use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use currex_core::constants::DEFAULT_UNITS;
use currex_core::currencies::CurrencyCode;
use currex_core::fx::ExchangeRate;
use currex_core::Result;

/// Database model for exchange rates.
///
/// `rate` holds the reduced (one unit) rate as canonical decimal text.
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(primary_key(exchange_rate_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateDB {
    pub exchange_rate_id: i32,
    pub base_currency_id: i32,
    pub target_currency_id: i32,
    pub rate: String,
    pub source_id: Option<i32>,
}

impl ExchangeRateDB {
    /// Builds the domain value; the row only knows currency ids, so the
    /// caller supplies the codes.
    pub fn into_domain(self, base: CurrencyCode, target: CurrencyCode) -> Result<ExchangeRate> {
        ExchangeRate::from_codes(
            Some(self.exchange_rate_id),
            base,
            target,
            Some(DEFAULT_UNITS),
            Some(Decimal::from_str(&self.rate)?),
            self.source_id,
        )
    }
}

/// Database model for inserting an exchange rate.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::exchange_rates)]
pub struct NewExchangeRateDB {
    pub exchange_rate_id: Option<i32>,
    pub base_currency_id: i32,
    pub target_currency_id: i32,
    pub rate: Option<String>,
    pub source_id: Option<i32>,
}

/// Mutable exchange-rate columns; `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::exchange_rates)]
pub struct ExchangeRateChangesetDB {
    pub rate: Option<String>,
    pub source_id: Option<i32>,
}

impl From<&ExchangeRate> for ExchangeRateChangesetDB {
    fn from(delta: &ExchangeRate) -> Self {
        Self {
            rate: delta.reduced_rate().map(decimal_to_text),
            source_id: delta.info_source,
        }
    }
}

/// Canonical text form of a persisted rate.
pub(crate) fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}
