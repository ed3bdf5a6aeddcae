use std::collections::HashMap;
use std::sync::Arc;

use currex_core::currencies::CurrencyCode;
use currex_core::errors::DatabaseError;
use currex_core::fields::{describe_identity, require_identity};
use currex_core::fx::{ExchangeRate, ExchangeRateQuery, ExchangeRateRepositoryTrait, RateEdge};
use currex_core::{Error, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use super::model::{decimal_to_text, ExchangeRateChangesetDB, ExchangeRateDB, NewExchangeRateDB};
use crate::currencies::currency_id_by_code;
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{currency, exchange_rates};

#[derive(Clone)]
pub struct ExchangeRateRepository {
    pool: Arc<DbPool>,
}

impl ExchangeRateRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

/// Codes of every currency, keyed by id.
fn currency_codes(
    conn: &mut SqliteConnection,
    ids: Option<&[i32]>,
) -> std::result::Result<HashMap<i32, String>, StorageError> {
    let mut statement = currency::table
        .select((currency::currency_id, currency::code))
        .into_boxed();
    if let Some(ids) = ids {
        statement = statement.filter(currency::currency_id.eq_any(ids.to_vec()));
    }
    Ok(statement.load::<(i32, String)>(conn)?.into_iter().collect())
}

fn code_of(
    codes: &HashMap<i32, String>,
    id: i32,
) -> std::result::Result<CurrencyCode, StorageError> {
    let code = codes.get(&id).ok_or_else(|| {
        Error::Database(DatabaseError::Internal(format!(
            "exchange rate references missing currency {}",
            id
        )))
    })?;
    Ok(CurrencyCode::parse(code).map_err(Error::from)?)
}

fn row_to_domain(
    codes: &HashMap<i32, String>,
    row: ExchangeRateDB,
) -> std::result::Result<ExchangeRate, StorageError> {
    let base = code_of(codes, row.base_currency_id)?;
    let target = code_of(codes, row.target_currency_id)?;
    Ok(row.into_domain(base, target)?)
}

fn load_domain(
    conn: &mut SqliteConnection,
    row: ExchangeRateDB,
) -> std::result::Result<ExchangeRate, StorageError> {
    let codes = currency_codes(conn, Some(&[row.base_currency_id, row.target_currency_id]))?;
    row_to_domain(&codes, row)
}

fn find_rate(
    conn: &mut SqliteConnection,
    query: &ExchangeRateQuery,
) -> std::result::Result<Option<ExchangeRate>, StorageError> {
    let mut statement = exchange_rates::table
        .select(ExchangeRateDB::as_select())
        .into_boxed();
    if let Some(id) = query.id {
        statement = statement.filter(exchange_rates::exchange_rate_id.eq(id));
    }
    if let Some((base, target)) = query.pair() {
        let (Some(base_id), Some(target_id)) = (
            currency_id_by_code(conn, base)?,
            currency_id_by_code(conn, target)?,
        ) else {
            return Ok(None);
        };
        statement = statement
            .filter(exchange_rates::base_currency_id.eq(base_id))
            .filter(exchange_rates::target_currency_id.eq(target_id));
    }

    match statement.first::<ExchangeRateDB>(conn).optional()? {
        Some(row) => Ok(Some(load_domain(conn, row)?)),
        None => Ok(None),
    }
}

fn required_currency_id(
    conn: &mut SqliteConnection,
    code: &CurrencyCode,
) -> std::result::Result<i32, StorageError> {
    currency_id_by_code(conn, code)?.ok_or_else(|| {
        StorageError::from(Error::ReferentialIntegrity(format!(
            "currency {} does not exist",
            code
        )))
    })
}

impl ExchangeRateRepositoryTrait for ExchangeRateRepository {
    fn get(&self, query: &ExchangeRateQuery) -> Result<Option<ExchangeRate>> {
        require_identity(query)?;
        let mut conn = get_connection(&self.pool)?;
        find_rate(&mut conn, query).into_core()
    }

    fn list(&self) -> Result<Vec<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;
        let codes = currency_codes(&mut conn, None).into_core()?;
        exchange_rates::table
            .select(ExchangeRateDB::as_select())
            .order(exchange_rates::exchange_rate_id.asc())
            .load::<ExchangeRateDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|row| row_to_domain(&codes, row).into_core())
            .collect()
    }

    fn add(&self, rate: &ExchangeRate) -> Result<ExchangeRate> {
        self.pool.execute(|conn| {
            let row = NewExchangeRateDB {
                exchange_rate_id: rate.id,
                base_currency_id: required_currency_id(conn, &rate.base_currency_code)?,
                target_currency_id: required_currency_id(conn, &rate.target_currency_code)?,
                rate: rate.reduced_rate().map(decimal_to_text),
                source_id: rate.info_source,
            };
            let stored = diesel::insert_into(exchange_rates::table)
                .values(&row)
                .returning(ExchangeRateDB::as_returning())
                .get_result::<ExchangeRateDB>(conn)?;
            debug!(
                "Inserted rate {}->{} = {}",
                rate.base_currency_code, rate.target_currency_code, stored.rate
            );
            Ok(stored.into_domain(
                rate.base_currency_code.clone(),
                rate.target_currency_code.clone(),
            )?)
        })
    }

    fn update(&self, delta: &ExchangeRate) -> Result<ExchangeRate> {
        require_identity(delta)?;
        self.pool.execute(|conn| {
            let current = find_rate(conn, &ExchangeRateQuery::from(delta))?
                .ok_or_else(|| Error::NoRecordToModify(describe_identity(delta)))?;
            if !delta.has_changes() {
                return Err(Error::RequiredFieldMissing("rate".to_string()).into());
            }
            let current_id = current
                .id
                .ok_or_else(|| Error::NoRecordToModify(describe_identity(delta)))?;

            let stored = diesel::update(exchange_rates::table.find(current_id))
                .set(&ExchangeRateChangesetDB::from(delta))
                .returning(ExchangeRateDB::as_returning())
                .get_result::<ExchangeRateDB>(conn)?;
            Ok(stored.into_domain(current.base_currency_code, current.target_currency_code)?)
        })
    }

    fn edges_from(&self, currency_id: i32) -> Result<Vec<RateEdge>> {
        let mut conn = get_connection(&self.pool)?;
        let on_target = currency::currency_id.eq(exchange_rates::target_currency_id);
        exchange_rates::table
            .inner_join(currency::table.on(on_target))
            .filter(exchange_rates::base_currency_id.eq(currency_id))
            .select((
                exchange_rates::target_currency_id,
                currency::code,
                exchange_rates::rate,
            ))
            .order(exchange_rates::target_currency_id.asc())
            .load::<(i32, String, String)>(&mut conn)
            .into_core()?
            .into_iter()
            .map(|(target_currency_id, code, rate)| {
                Ok(RateEdge {
                    target_currency_id,
                    target_currency_code: CurrencyCode::parse(&code)?,
                    rate: rate.parse()?,
                })
            })
            .collect()
    }
}
