//! Environment-driven configuration.
//!
//! Values are read once at start-up after `dotenvy` has loaded `.env`.

use std::env;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Default interval between scheduled rate refreshes (6 hours)
const DEFAULT_RATE_SYNC_INTERVAL_SECS: u64 = 21600;

const ENV_DATABASE_URL: &str = "DATABASE_URL";
const ENV_BIND_ADDR: &str = "BIND_ADDR";
const ENV_FEED_URL: &str = "METAL_PRICE_API_URL";
const ENV_FEED_KEY: &str = "METAL_PRICE_API_KEY";
const ENV_RATE_SYNC_INTERVAL: &str = "METAL_RATE_SYNC_INTERVAL_SECS";

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Live spot-price feed; `None` means refreshes use the static dataset
    pub feed: Option<FeedConfig>,
    /// 0 disables the scheduled refresh
    pub rate_sync_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(ENV_DATABASE_URL)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("{} must be set", ENV_DATABASE_URL))?;

        let bind_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let feed = match (lookup(ENV_FEED_URL), lookup(ENV_FEED_KEY)) {
            (Some(base_url), Some(api_key)) if !base_url.is_empty() && !api_key.is_empty() => {
                Some(FeedConfig { base_url, api_key })
            }
            _ => None,
        };

        let rate_sync_interval_secs = match lookup(ENV_RATE_SYNC_INTERVAL) {
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("{} must be a whole number of seconds", ENV_RATE_SYNC_INTERVAL))?,
            None => DEFAULT_RATE_SYNC_INTERVAL_SECS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            feed,
            rate_sync_interval_secs,
        })
    }
}
