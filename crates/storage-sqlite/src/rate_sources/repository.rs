use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Date, Integer, Nullable, Text};
use diesel::sqlite::SqliteConnection;
use log::debug;

use currex_core::errors::UpdaterError;
use currex_core::updater::{AppealState, RateSource, RateSourceRepositoryTrait, SourceSchema};
use currex_core::Result;

use crate::db::{get_connection, verify_columns, DbPool};
use crate::errors::IntoCore;

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[derive(QueryableByName)]
struct IdRow {
    #[diesel(sql_type = Integer)]
    source_id: i32,
}

#[derive(QueryableByName)]
struct AppealRow {
    #[diesel(sql_type = Nullable<Date>)]
    last_appeal: Option<NaiveDate>,
    #[diesel(sql_type = Integer)]
    days_valid: i32,
}

#[derive(QueryableByName)]
struct PathRow {
    #[diesel(sql_type = Text)]
    src_path: String,
}

#[derive(QueryableByName)]
struct SourceRow {
    #[diesel(sql_type = Integer)]
    source_id: i32,
    #[diesel(sql_type = Text)]
    src_path: String,
    #[diesel(sql_type = Integer)]
    days_valid: i32,
    #[diesel(sql_type = Nullable<Date>)]
    last_appeal: Option<NaiveDate>,
}

/// Rate-source storage. Table and column names come from the
/// [`SourceSchema`] and are checked against the live database on creation.
pub struct RateSourceRepository {
    pool: Arc<DbPool>,
    schema: SourceSchema,
}

impl RateSourceRepository {
    pub fn new(pool: Arc<DbPool>, schema: SourceSchema) -> Result<Self> {
        schema.validate()?;
        let mut conn = get_connection(&pool)?;
        verify_columns(
            &mut conn,
            schema.table(),
            &[
                schema.id_column(),
                schema.last_appeal_column(),
                schema.days_valid_column(),
                schema.path_column(),
            ],
        )?;
        Ok(Self { pool, schema })
    }

    fn stamp_sql(&self) -> String {
        format!(
            r#"UPDATE "{table}" SET "{last_appeal}" = ? WHERE "{id}" = ?"#,
            table = self.schema.table(),
            last_appeal = self.schema.last_appeal_column(),
            id = self.schema.id_column(),
        )
    }

    fn execute_stamp(
        &self,
        conn: &mut SqliteConnection,
        source_id: i32,
        date: NaiveDate,
    ) -> QueryResult<usize> {
        diesel::sql_query(self.stamp_sql())
            .bind::<Date, _>(date)
            .bind::<Integer, _>(source_id)
            .execute(conn)
    }
}

impl RateSourceRepositoryTrait for RateSourceRepository {
    fn schema(&self) -> &SourceSchema {
        &self.schema
    }

    fn source_exists(&self, source_id: i32) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let sql = format!(
            r#"SELECT COUNT(*) AS count FROM "{}" WHERE "{}" = ?"#,
            self.schema.table(),
            self.schema.id_column(),
        );
        let row = diesel::sql_query(sql)
            .bind::<Integer, _>(source_id)
            .get_result::<CountRow>(&mut conn)
            .into_core()?;
        Ok(row.count > 0)
    }

    fn source_ids(&self) -> Result<Vec<i32>> {
        let mut conn = get_connection(&self.pool)?;
        let sql = format!(
            r#"SELECT "{id}" AS source_id FROM "{table}" ORDER BY "{id}""#,
            id = self.schema.id_column(),
            table = self.schema.table(),
        );
        let rows = diesel::sql_query(sql).load::<IdRow>(&mut conn).into_core()?;
        Ok(rows.into_iter().map(|row| row.source_id).collect())
    }

    fn get_appeal_state(&self, source_id: i32) -> Result<Option<AppealState>> {
        let mut conn = get_connection(&self.pool)?;
        let sql = format!(
            r#"SELECT "{last_appeal}" AS last_appeal, "{days_valid}" AS days_valid
               FROM "{table}" WHERE "{id}" = ?"#,
            last_appeal = self.schema.last_appeal_column(),
            days_valid = self.schema.days_valid_column(),
            table = self.schema.table(),
            id = self.schema.id_column(),
        );
        let row = diesel::sql_query(sql)
            .bind::<Integer, _>(source_id)
            .get_result::<AppealRow>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(|row| AppealState {
            last_appeal: row.last_appeal,
            days_valid: row.days_valid,
        }))
    }

    fn get_source_path(&self, source_id: i32) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let sql = format!(
            r#"SELECT "{}" AS src_path FROM "{}" WHERE "{}" = ?"#,
            self.schema.path_column(),
            self.schema.table(),
            self.schema.id_column(),
        );
        let row = diesel::sql_query(sql)
            .bind::<Integer, _>(source_id)
            .get_result::<PathRow>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(|row| row.src_path))
    }

    fn stamp_last_appeal(&self, source_id: i32, date: NaiveDate, commit: bool) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let result = if commit {
            conn.immediate_transaction(|conn| self.execute_stamp(conn, source_id, date))
        } else {
            self.execute_stamp(&mut conn, source_id, date)
        };
        let affected = result.into_core()?;

        if affected == 0 {
            return Err(UpdaterError::UnknownSource(source_id).into());
        }
        debug!("Stamped source {} with {}", source_id, date);
        Ok(())
    }

    fn add_source(&self, src_path: &str, days_valid: i32) -> Result<RateSource> {
        let mut conn = get_connection(&self.pool)?;
        let sql = format!(
            r#"INSERT INTO "{table}" ("{path}", "{days_valid}") VALUES (?, ?)
               RETURNING "{id}" AS source_id, "{path}" AS src_path,
                         "{days_valid}" AS days_valid, "{last_appeal}" AS last_appeal"#,
            table = self.schema.table(),
            path = self.schema.path_column(),
            days_valid = self.schema.days_valid_column(),
            id = self.schema.id_column(),
            last_appeal = self.schema.last_appeal_column(),
        );
        let row = diesel::sql_query(sql)
            .bind::<Text, _>(src_path)
            .bind::<Integer, _>(days_valid)
            .get_result::<SourceRow>(&mut conn)
            .into_core()?;
        Ok(RateSource {
            source_id: row.source_id,
            src_path: row.src_path,
            days_valid: row.days_valid,
            last_appeal: row.last_appeal,
        })
    }
}
