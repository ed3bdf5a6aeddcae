//! Background loop refreshing stale rate sources.
//!
//! Every tick checks each registered updater and runs the due ones on the
//! blocking pool, since fetching and storage are synchronous.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use currex_core::updater::UpdateReport;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::main_lib::AppState;

/// Runs until Ctrl-C. Shutdown does not wait for an update in flight.
pub async fn run_scheduler(state: Arc<AppState>) {
    let mut ticker = interval(state.check_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = state.clone();
                let today = Local::now().date_naive();
                let update = tokio::task::spawn_blocking(move || run_due_updaters(&state, today));
                match join_or_shutdown(update, shutdown.as_mut()).await {
                    Some(joined) => log_update(joined),
                    None => {
                        info!("Shutting down rates scheduler during an update");
                        break;
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Shutting down rates scheduler");
                break;
            }
        }
    }
}

/// Waits for `update` unless `shutdown` completes first, in which case the
/// task is left to finish on the blocking pool and `None` is returned.
async fn join_or_shutdown<T, S>(
    update: JoinHandle<T>,
    shutdown: Pin<&mut S>,
) -> Option<Result<T, JoinError>>
where
    S: Future,
{
    tokio::select! {
        joined = update => Some(joined),
        _ = shutdown => None,
    }
}

fn log_update(joined: Result<Vec<UpdateReport>, JoinError>) {
    match joined {
        Ok(reports) if !reports.is_empty() => {
            info!("Refreshed {} rate source(s)", reports.len());
        }
        Ok(_) => debug!("No rate source due"),
        Err(e) => error!("Rates update task failed: {}", e),
    }
}

/// Runs every updater due on `today` and returns the reports of the
/// successful runs. Failed runs are logged and left for the next tick.
pub fn run_due_updaters(state: &AppState, today: NaiveDate) -> Vec<UpdateReport> {
    let due = match state.registry.due_updaters_on(today) {
        Ok(due) => due,
        Err(e) => {
            error!("Cannot determine due rate sources: {}", e);
            return Vec::new();
        }
    };

    let mut reports = Vec::with_capacity(due.len());
    for updater in due {
        match updater.run_on(today, state.soft_failure_kind, state.commit_stamp) {
            Ok(report) => reports.push(report),
            Err(e) => error!("Update of source {} failed: {}", updater.source_id(), e),
        }
    }

    if !reports.is_empty() {
        match state.rate_service.get_all_rates() {
            Ok(rates) => info!("Store now holds {} exchange rates", rates.len()),
            Err(e) => error!("Cannot count stored rates: {}", e),
        }
    }
    reports
}
