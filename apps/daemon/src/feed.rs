//! JSON rate feeds read from local files or fetched over HTTP(S).

use std::time::Duration;

use currex_core::fx::{complete_rate_set, ExchangeRate};
use currex_core::updater::RateFetcher;
use currex_core::{Error, Result};
use tracing::debug;

/// Reads a JSON array of `{ baseCurrencyCode, targetCurrencyCode, units, rate }`
/// records and completes it with the cross rates the batch implies.
pub struct JsonFeedFetcher {
    timeout: Duration,
}

impl JsonFeedFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn read_payload(&self, path: &str) -> Result<String> {
        if path.starts_with("http://") || path.starts_with("https://") {
            // Built per call: the blocking client may only live outside the async runtime.
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| Error::Fetch(e.to_string()))?;
            client
                .get(path)
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text())
                .map_err(|e| Error::Fetch(format!("{}: {}", path, e)))
        } else {
            std::fs::read_to_string(path).map_err(|e| Error::Fetch(format!("{}: {}", path, e)))
        }
    }
}

impl RateFetcher for JsonFeedFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<ExchangeRate>> {
        let payload = self.read_payload(path)?;
        let rates = parse_feed(&payload)?;
        debug!(
            "Feed {} yielded {} rates after completion",
            path,
            rates.len()
        );
        Ok(rates)
    }
}

pub fn parse_feed(payload: &str) -> Result<Vec<ExchangeRate>> {
    let rates: Vec<ExchangeRate> = serde_json::from_str(payload)?;
    Ok(complete_rate_set(rates))
}
