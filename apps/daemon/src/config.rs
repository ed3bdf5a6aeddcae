use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use currex_core::{Error, ErrorKind, Result};

pub struct Config {
    pub db_path: String,
    pub check_interval: Duration,
    pub soft_failure_kind: ErrorKind,
    pub commit_stamp: bool,
    pub seed_catalog: Option<PathBuf>,
    /// Feed registered as a rate source on startup when no source uses it yet.
    pub feed_path: Option<String>,
    pub feed_days_valid: i32,
    pub feed_timeout: Duration,
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let db_path = var("CURREX_DB_PATH").unwrap_or_else(|| "./db/currex.db".into());
        let check_secs: u64 = parse_or(&var, "CURREX_CHECK_INTERVAL_SECS", 3600)?;
        if check_secs == 0 {
            return Err(Error::InvalidConfigValue(
                "CURREX_CHECK_INTERVAL_SECS must be positive".into(),
            ));
        }
        let soft_failure_kind = match var("CURREX_SOFT_FAILURE_KIND") {
            Some(kind) => kind.parse()?,
            None => ErrorKind::ReferentialIntegrity,
        };
        let commit_stamp = parse_bool(&var, "CURREX_COMMIT_STAMP", true)?;
        let feed_days_valid: i32 = parse_or(&var, "CURREX_FEED_DAYS_VALID", 1)?;
        let timeout_ms: u64 = parse_or(&var, "CURREX_FEED_TIMEOUT_MS", 30000)?;
        let json_logs = var("CURREX_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            db_path,
            check_interval: Duration::from_secs(check_secs),
            soft_failure_kind,
            commit_stamp,
            seed_catalog: var("CURREX_SEED_CATALOG").map(PathBuf::from),
            feed_path: var("CURREX_FEED_PATH"),
            feed_days_valid,
            feed_timeout: Duration::from_millis(timeout_ms),
            json_logs,
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::InvalidConfigValue(format!("{}={}", key, raw))),
        None => Ok(default),
    }
}

fn parse_bool<F>(var: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).map(|value| value.to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(Error::InvalidConfigValue(format!("{}={}", key, other))),
    }
}
