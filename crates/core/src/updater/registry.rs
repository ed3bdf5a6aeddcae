use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::warn;

use super::rates_updater::RatesUpdater;
use crate::errors::{Result, UpdaterError};

/// Holds at most one updater per rate source.
#[derive(Debug, Default)]
pub struct UpdaterRegistry {
    updaters: BTreeMap<i32, Arc<RatesUpdater>>,
}

impl UpdaterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an updater, failing with [`UpdaterError::AlreadyRegistered`]
    /// when its source already has one.
    pub fn register(&mut self, updater: RatesUpdater) -> Result<Arc<RatesUpdater>> {
        let source_id = updater.source_id();
        if self.updaters.contains_key(&source_id) {
            return Err(UpdaterError::AlreadyRegistered(source_id).into());
        }
        let updater = Arc::new(updater);
        self.updaters.insert(source_id, updater.clone());
        Ok(updater)
    }

    pub fn get(&self, source_id: i32) -> Option<Arc<RatesUpdater>> {
        self.updaters.get(&source_id).cloned()
    }

    pub fn source_ids(&self) -> Vec<i32> {
        self.updaters.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.updaters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }

    pub fn due_updaters(&self) -> Result<Vec<Arc<RatesUpdater>>> {
        self.due_updaters_on(Local::now().date_naive())
    }

    /// Updaters whose source is stale on `today`, in source id order.
    pub fn due_updaters_on(&self, today: NaiveDate) -> Result<Vec<Arc<RatesUpdater>>> {
        let mut due = Vec::new();
        for updater in self.updaters.values() {
            match updater.is_update_due_on(today) {
                Ok(true) => due.push(updater.clone()),
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        "Cannot check staleness of source {}: {}",
                        updater.source_id(),
                        e
                    );
                    return Err(e);
                }
            }
        }
        Ok(due)
    }
}
