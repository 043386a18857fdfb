use std::{env, net::SocketAddr, str::FromStr, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub api_base_url: String,
    pub api_token: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_initial_interval: Duration,
    pub dedupe_authors: bool,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let api_base_url = lookup("MEME_API_BASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("MEME_API_BASE_URL".into()))?;
        let api_token = lookup("MEME_API_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("MEME_API_TOKEN".into()))?;

        let request_timeout = Duration::from_secs(parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 10)?);
        let max_retries = parse_var(&lookup, "FEED_MAX_RETRIES", 3)?;
        let retry_initial_interval =
            Duration::from_millis(parse_var(&lookup, "FEED_RETRY_INITIAL_MS", 1000)?);
        let dedupe_authors = parse_var(&lookup, "FEED_DEDUPE_AUTHORS", false)?;

        Ok(Config {
            bind_address,
            api_base_url,
            api_token,
            request_timeout,
            max_retries,
            retry_initial_interval,
            dedupe_authors,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = Config::from_lookup(lookup_from(&[
            ("MEME_API_BASE_URL", "http://localhost:4000"),
            ("MEME_API_TOKEN", "dummy_token"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_initial_interval, Duration::from_millis(1000));
        assert!(!config.dedupe_authors);
    }

    #[test]
    fn missing_token_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("MEME_API_BASE_URL", "http://localhost:4000")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "MEME_API_TOKEN"));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("MEME_API_BASE_URL", "http://localhost:4000"),
            ("MEME_API_TOKEN", "dummy_token"),
            ("FEED_MAX_RETRIES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidVar(var, _) if var == "FEED_MAX_RETRIES"));
    }

    #[test]
    fn dedupe_flag_is_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("MEME_API_BASE_URL", "http://localhost:4000"),
            ("MEME_API_TOKEN", "dummy_token"),
            ("FEED_DEDUPE_AUTHORS", "true"),
        ]))
        .unwrap();
        assert!(config.dedupe_authors);
    }
}
