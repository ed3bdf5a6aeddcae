use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{error, info, warn};

use super::updater_model::{RecordOutcome, UpdateReport};
use super::updater_traits::{RateFetcher, RateSourceRepositoryTrait};
use crate::errors::{ErrorKind, Result, UpdaterError};
use crate::fx::{ExchangeRate, ExchangeRateServiceTrait};

/// Applies one fetched record to the store.
pub type ApplyFn = Arc<dyn Fn(&ExchangeRate) -> Result<()> + Send + Sync>;

/// Keeps the rates of one source fresh: checks staleness, fetches, applies
/// every record and stamps the source.
pub struct RatesUpdater {
    source_id: i32,
    sources: Arc<dyn RateSourceRepositoryTrait>,
    fetcher: Arc<dyn RateFetcher>,
    apply: ApplyFn,
}

impl fmt::Debug for RatesUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatesUpdater")
            .field("source_id", &self.source_id)
            .field("schema", self.sources.schema())
            .finish_non_exhaustive()
    }
}

impl RatesUpdater {
    /// Fails with [`UpdaterError::UnknownSource`] when the source has no
    /// metadata row.
    pub fn new(
        source_id: i32,
        sources: Arc<dyn RateSourceRepositoryTrait>,
        fetcher: Arc<dyn RateFetcher>,
        apply: ApplyFn,
    ) -> Result<Self> {
        if !sources.source_exists(source_id)? {
            return Err(UpdaterError::UnknownSource(source_id).into());
        }
        Ok(Self {
            source_id,
            sources,
            fetcher,
            apply,
        })
    }

    /// Updater applying each record through [`ExchangeRateServiceTrait::update_rate`].
    pub fn with_rate_service(
        source_id: i32,
        sources: Arc<dyn RateSourceRepositoryTrait>,
        fetcher: Arc<dyn RateFetcher>,
        rates: Arc<dyn ExchangeRateServiceTrait>,
    ) -> Result<Self> {
        let apply: ApplyFn =
            Arc::new(move |rate: &ExchangeRate| rates.update_rate(rate).map(|_| ()));
        Self::new(source_id, sources, fetcher, apply)
    }

    pub fn source_id(&self) -> i32 {
        self.source_id
    }

    pub fn is_update_due(&self) -> Result<bool> {
        self.is_update_due_on(Local::now().date_naive())
    }

    pub fn is_update_due_on(&self, today: NaiveDate) -> Result<bool> {
        let state = self
            .sources
            .get_appeal_state(self.source_id)?
            .ok_or(UpdaterError::UnknownSource(self.source_id))?;
        Ok(state.is_due(today))
    }

    /// Fetches and applies the source's records.
    ///
    /// Records failing with `soft_failure_kind` are skipped; any other failure
    /// aborts the run before stamping. The source is stamped with today's
    /// date when at least one record was applied.
    pub fn run(&self, soft_failure_kind: ErrorKind, commit_stamp: bool) -> Result<UpdateReport> {
        self.run_on(Local::now().date_naive(), soft_failure_kind, commit_stamp)
    }

    pub fn run_on(
        &self,
        today: NaiveDate,
        soft_failure_kind: ErrorKind,
        commit_stamp: bool,
    ) -> Result<UpdateReport> {
        let path = self
            .sources
            .get_source_path(self.source_id)?
            .ok_or(UpdaterError::UnknownSource(self.source_id))?;

        let records = self.fetcher.fetch(&path)?;
        info!(
            "Fetched {} rate records for source {} from {}",
            records.len(),
            self.source_id,
            path
        );

        let mut report = UpdateReport {
            source_id: self.source_id,
            ..UpdateReport::default()
        };
        for record in records {
            let record = record.with_info_source(self.source_id);
            match RecordOutcome::classify((self.apply)(&record), soft_failure_kind) {
                RecordOutcome::Applied => report.applied += 1,
                RecordOutcome::SoftFailure(e) => {
                    warn!(
                        "Skipping rate {}->{} from source {}: {}",
                        record.base_currency_code, record.target_currency_code, self.source_id, e
                    );
                    report.skipped += 1;
                }
                RecordOutcome::HardFailure(e) => {
                    error!(
                        "Aborting update of source {} on rate {}->{}: {}",
                        self.source_id, record.base_currency_code, record.target_currency_code, e
                    );
                    return Err(e);
                }
            }
        }

        if report.applied > 0 {
            self.sources
                .stamp_last_appeal(self.source_id, today, commit_stamp)?;
            report.stamped = true;
        }
        info!(
            "Source {} updated: {} applied, {} skipped, stamped={}",
            self.source_id, report.applied, report.skipped, report.stamped
        );
        Ok(report)
    }
}
