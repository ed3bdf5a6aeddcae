mod config;
mod feed;
mod main_lib;
mod scheduler;

use config::Config;
use main_lib::{build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.json_logs);
    let state = build_state(&config)?;

    tracing::info!(
        "Watching {} rate source(s) over {} currencies, checking every {}s",
        state.registry.len(),
        state.currency_service.get_all_currencies()?.len(),
        config.check_interval.as_secs()
    );
    scheduler::run_scheduler(state).await;
    Ok(())
}
