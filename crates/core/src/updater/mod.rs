//! Updater module - scheduled refresh of rates from external sources.

mod rates_updater;
mod registry;
mod updater_model;
mod updater_traits;

pub use rates_updater::{ApplyFn, RatesUpdater};
pub use registry::UpdaterRegistry;
pub use updater_model::{AppealState, RateSource, RecordOutcome, SourceSchema, UpdateReport};
pub use updater_traits::{RateFetcher, RateSourceRepositoryTrait};
