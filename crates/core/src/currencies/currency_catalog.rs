//! Parsing of the bundled currency catalog.
//!
//! The catalog is a JSON object keyed by currency code:
//! `{ "USD": { "name": "US Dollar", "units": { "major": { "symbol": "$" } } } }`.

use std::collections::BTreeMap;

use log::warn;
use serde::Deserialize;

use super::currencies_model::{Currency, CurrencyCode};
use crate::errors::Result;

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    units: CatalogUnits,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogUnits {
    major: Option<CatalogUnit>,
}

#[derive(Debug, Deserialize)]
struct CatalogUnit {
    symbol: Option<String>,
}

/// Parses a currency catalog into currencies ordered by code.
///
/// Entries whose key is not a valid currency code are skipped with a warning.
pub fn parse_currency_catalog(json: &str) -> Result<Vec<Currency>> {
    let entries: BTreeMap<String, CatalogEntry> = serde_json::from_str(json)?;

    let mut currencies = Vec::with_capacity(entries.len());
    for (key, entry) in entries {
        let code = match CurrencyCode::parse(&key) {
            Ok(code) => code,
            Err(e) => {
                warn!("Skipping catalog entry: {}", e);
                continue;
            }
        };
        currencies.push(Currency {
            id: None,
            code: Some(code),
            full_name: Some(entry.name),
            sign: entry.units.major.and_then(|unit| unit.symbol),
        });
    }
    Ok(currencies)
}
