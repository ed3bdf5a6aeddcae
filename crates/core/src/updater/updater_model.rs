use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ErrorKind, Result, ValidationError};

/// Names the table and columns holding rate-source metadata.
///
/// Identifiers end up spliced into SQL, so every one of them is checked
/// against `[A-Za-z_][A-Za-z0-9_]*` by [`SourceSchema::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSchema {
    table: String,
    id_column: String,
    last_appeal_column: String,
    days_valid_column: String,
    path_column: String,
}

impl Default for SourceSchema {
    fn default() -> Self {
        Self {
            table: "rates_info_source".to_string(),
            id_column: "source_id".to_string(),
            last_appeal_column: "last_appeal".to_string(),
            days_valid_column: "days_valid".to_string(),
            path_column: "src_path".to_string(),
        }
    }
}

impl SourceSchema {
    pub fn new(
        table: &str,
        id_column: &str,
        last_appeal_column: &str,
        days_valid_column: &str,
        path_column: &str,
    ) -> Result<Self> {
        let schema = Self {
            table: table.to_string(),
            id_column: id_column.to_string(),
            last_appeal_column: last_appeal_column.to_string(),
            days_valid_column: days_valid_column.to_string(),
            path_column: path_column.to_string(),
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Checks every identifier. Deserialized schemas must be validated
    /// before use.
    pub fn validate(&self) -> Result<()> {
        for identifier in [
            &self.table,
            &self.id_column,
            &self.last_appeal_column,
            &self.days_valid_column,
            &self.path_column,
        ] {
            if !is_sql_identifier(identifier) {
                return Err(ValidationError::InvalidIdentifier(identifier.clone()).into());
            }
        }
        Ok(())
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn last_appeal_column(&self) -> &str {
        &self.last_appeal_column
    }

    pub fn days_valid_column(&self) -> &str {
        &self.days_valid_column
    }

    pub fn path_column(&self) -> &str {
        &self.path_column
    }
}

fn is_sql_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Freshness metadata of one rate source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealState {
    pub last_appeal: Option<NaiveDate>,
    pub days_valid: i32,
}

impl AppealState {
    /// Due when `last_appeal + days_valid <= today`, or when the source was
    /// never refreshed.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        let Some(last_appeal) = self.last_appeal else {
            return true;
        };
        match last_appeal.checked_add_signed(Duration::days(i64::from(self.days_valid))) {
            Some(expires) => expires <= today,
            // Window reaches past the calendar.
            None => false,
        }
    }
}

/// A rate source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSource {
    pub source_id: i32,
    pub src_path: String,
    pub days_valid: i32,
    pub last_appeal: Option<NaiveDate>,
}

/// What happened to one fetched record.
#[derive(Debug)]
pub enum RecordOutcome {
    Applied,
    /// Failed with the configured soft-failure kind; skipped.
    SoftFailure(Error),
    /// Any other failure; aborts the run.
    HardFailure(Error),
}

impl RecordOutcome {
    pub fn classify<T>(result: Result<T>, soft_failure_kind: ErrorKind) -> Self {
        match result {
            Ok(_) => RecordOutcome::Applied,
            Err(e) if e.kind() == soft_failure_kind => RecordOutcome::SoftFailure(e),
            Err(e) => RecordOutcome::HardFailure(e),
        }
    }
}

/// Summary of a completed updater run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReport {
    pub source_id: i32,
    pub applied: usize,
    pub skipped: usize,
    pub stamped: bool,
}
