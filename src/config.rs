use crate::api::{MLB_API_BASE_URL, ODDS_API_BASE_URL};
use crate::error::ConfigError;
use crate::utils::nationality::Country;
use std::path::PathBuf;
use std::time::Duration;

/// Placeholder key meaning "no key configured"
const DEMO_KEY: &str = "DEMO";

const DEFAULT_REFRESH_SECS: u64 = 30;
/// The Odds API quota is small, so the feed is reused for this long
const DEFAULT_ODDS_REFRESH_SECS: u64 = 300;
const MIN_ODDS_REFRESH_SECS: u64 = 60;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_CACHE_DIR: &str = "cache";

/// Runtime configuration, read from the environment (and `.env`)
#[derive(Debug, Clone)]
pub struct Config {
    pub odds_api_key: Option<String>,
    pub mlb_api_base_url: String,
    pub odds_api_base_url: String,
    pub refresh_interval: Duration,
    pub odds_refresh_interval: Duration,
    pub country: Country,
    pub bind_addr: String,
    pub use_cache: bool,
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            odds_api_key: None,
            mlb_api_base_url: MLB_API_BASE_URL.to_string(),
            odds_api_base_url: ODDS_API_BASE_URL.to_string(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            odds_refresh_interval: Duration::from_secs(DEFAULT_ODDS_REFRESH_SECS),
            country: Country::DominicanRepublic,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            use_cache: false,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.odds_api_key = lookup("ODDS_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != DEMO_KEY);

        if let Some(url) = lookup("MLB_API_BASE_URL") {
            config.mlb_api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = lookup("ODDS_API_BASE_URL") {
            config.odds_api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(secs) = lookup("REFRESH_INTERVAL_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "REFRESH_INTERVAL_SECS",
                value: secs.clone(),
            })?;
            config.refresh_interval = Duration::from_secs(secs.max(5));
        }

        if let Some(secs) = lookup("ODDS_REFRESH_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "ODDS_REFRESH_SECS",
                value: secs.clone(),
            })?;
            config.odds_refresh_interval = Duration::from_secs(secs.max(MIN_ODDS_REFRESH_SECS));
        }

        if let Some(country) = lookup("COUNTRY") {
            config.country = country.parse().map_err(|_| ConfigError::InvalidValue {
                key: "COUNTRY",
                value: country.clone(),
            })?;
        }

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }

        config.use_cache = lookup("USE_CACHE").unwrap_or_default() == "1";

        if let Some(dir) = lookup("CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    pub fn has_odds_api_key(&self) -> bool {
        self.odds_api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert!(!config.has_odds_api_key());
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.odds_refresh_interval, Duration::from_secs(300));
        assert_eq!(config.country, Country::DominicanRepublic);
        assert_eq!(config.mlb_api_base_url, MLB_API_BASE_URL);
        assert!(!config.use_cache);
    }

    #[test]
    fn test_demo_key_means_no_key() {
        assert!(!from_pairs(&[("ODDS_API_KEY", "DEMO")]).unwrap().has_odds_api_key());
        assert!(!from_pairs(&[("ODDS_API_KEY", "  ")]).unwrap().has_odds_api_key());
        assert!(from_pairs(&[("ODDS_API_KEY", "abc123")]).unwrap().has_odds_api_key());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("COUNTRY", "ve"),
            ("REFRESH_INTERVAL_SECS", "60"),
            ("USE_CACHE", "1"),
            ("ODDS_REFRESH_SECS", "10"),
            ("MLB_API_BASE_URL", "http://localhost:8080/api/v1/"),
        ])
        .unwrap();
        assert_eq!(config.country, Country::Venezuela);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert!(config.use_cache);
        assert_eq!(config.odds_refresh_interval, Duration::from_secs(60));
        assert_eq!(config.mlb_api_base_url, "http://localhost:8080/api/v1");
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            from_pairs(&[("REFRESH_INTERVAL_SECS", "soon")]),
            Err(ConfigError::InvalidValue { key: "REFRESH_INTERVAL_SECS", .. })
        ));
        assert!(from_pairs(&[("COUNTRY", "MX")]).is_err());
    }
}
