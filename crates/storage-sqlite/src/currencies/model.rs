//! Database models for currencies.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use currex_core::currencies::{Currency, CurrencyCode};
use currex_core::Error;

/// Database model for currencies
#[derive(Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::currency)]
#[diesel(primary_key(currency_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CurrencyDB {
    pub currency_id: i32,
    pub code: String,
    pub full_name: String,
    pub currency_sign: Option<String>,
}

/// Database model for inserting a currency.
///
/// Absent values are left out of the statement so the table constraints
/// decide whether they are required.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::currency)]
pub struct NewCurrencyDB {
    pub currency_id: Option<i32>,
    pub code: Option<String>,
    pub full_name: Option<String>,
    pub currency_sign: Option<String>,
}

/// Mutable currency columns; `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::currency)]
pub struct CurrencyChangesetDB {
    pub full_name: Option<String>,
    pub currency_sign: Option<String>,
}

impl TryFrom<CurrencyDB> for Currency {
    type Error = Error;

    fn try_from(db: CurrencyDB) -> Result<Self, Self::Error> {
        Ok(Currency {
            id: Some(db.currency_id),
            code: Some(CurrencyCode::parse(&db.code)?),
            full_name: Some(db.full_name),
            sign: db.currency_sign,
        })
    }
}

impl From<&Currency> for NewCurrencyDB {
    fn from(currency: &Currency) -> Self {
        Self {
            currency_id: currency.id,
            code: currency.code.as_ref().map(|code| code.to_string()),
            full_name: currency.full_name.clone(),
            currency_sign: currency.sign.clone(),
        }
    }
}

impl From<&Currency> for CurrencyChangesetDB {
    fn from(delta: &Currency) -> Self {
        Self {
            full_name: delta.full_name.clone(),
            currency_sign: delta.sign.clone(),
        }
    }
}
