use std::sync::Arc;

use currex_core::currencies::{Currency, CurrencyRepositoryTrait};
use currex_core::fields::{describe_identity, require_identity};
use currex_core::{Error, Result};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

use super::model::{CurrencyChangesetDB, CurrencyDB, NewCurrencyDB};
use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::{IntoCore, StorageError};
use crate::schema::currency;

pub struct CurrencyRepository {
    pool: Arc<DbPool>,
}

impl CurrencyRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        CurrencyRepository { pool }
    }
}

/// Looks up a currency by the conjunction of the identity fields present on
/// `query`. Callers check that at least one is present.
pub(crate) fn find_currency(
    conn: &mut SqliteConnection,
    query: &Currency,
) -> std::result::Result<Option<Currency>, StorageError> {
    let mut statement = currency::table.select(CurrencyDB::as_select()).into_boxed();
    if let Some(id) = query.id {
        statement = statement.filter(currency::currency_id.eq(id));
    }
    if let Some(code) = &query.code {
        statement = statement.filter(currency::code.eq(code.to_string()));
    }

    let row = statement.first::<CurrencyDB>(conn).optional()?;
    Ok(row.map(Currency::try_from).transpose()?)
}

pub(crate) fn currency_id_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> QueryResult<Option<i32>> {
    currency::table
        .filter(currency::code.eq(code))
        .select(currency::currency_id)
        .first::<i32>(conn)
        .optional()
}

impl CurrencyRepositoryTrait for CurrencyRepository {
    fn get(&self, query: &Currency) -> Result<Option<Currency>> {
        require_identity(query)?;
        let mut conn = get_connection(&self.pool)?;
        find_currency(&mut conn, query).into_core()
    }

    fn list(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)?;
        currency::table
            .select(CurrencyDB::as_select())
            .order(currency::currency_id.asc())
            .load::<CurrencyDB>(&mut conn)
            .into_core()?
            .into_iter()
            .map(Currency::try_from)
            .collect()
    }

    fn add(&self, new_currency: &Currency) -> Result<Currency> {
        let row = NewCurrencyDB::from(new_currency);
        self.pool.execute(move |conn| {
            let stored = diesel::insert_into(currency::table)
                .values(&row)
                .returning(CurrencyDB::as_returning())
                .get_result::<CurrencyDB>(conn)?;
            debug!("Inserted currency {} ({})", stored.code, stored.currency_id);
            Ok(Currency::try_from(stored)?)
        })
    }

    fn update(&self, delta: &Currency) -> Result<Currency> {
        require_identity(delta)?;
        self.pool.execute(|conn| {
            let current = find_currency(conn, delta)?
                .ok_or_else(|| Error::NoRecordToModify(describe_identity(delta)))?;
            if !delta.has_changes() {
                return Err(Error::RequiredFieldMissing("full_name or sign".to_string()).into());
            }
            let current_id = current
                .id
                .ok_or_else(|| Error::NoRecordToModify(describe_identity(delta)))?;

            let stored = diesel::update(currency::table.find(current_id))
                .set(&CurrencyChangesetDB::from(delta))
                .returning(CurrencyDB::as_returning())
                .get_result::<CurrencyDB>(conn)?;
            Ok(Currency::try_from(stored)?)
        })
    }
}
