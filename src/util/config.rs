//! Runtime configuration read from the process environment.

use thiserror::Error;
use url::Url;

pub const BACKEND_URL_VAR: &str = "TECH_TRADER_PUBLIC_BACKEND_URL";
pub const BACKEND_ANON_KEY_VAR: &str = "TECH_TRADER_PUBLIC_BACKEND_ANON_KEY";
pub const LOG_FILTER_VAR: &str = "TECH_TRADER_LOG";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),
}

/// Location of the hosted backend and the public key sent with every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: Url,
    pub anon_key: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` runs the app against the built-in demo accounts.
    pub backend: Option<BackendConfig>,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = match (read(BACKEND_URL_VAR), read(BACKEND_ANON_KEY_VAR)) {
            (Some(raw_url), Some(anon_key)) => Some(BackendConfig {
                url: parse_base_url(&raw_url)?,
                anon_key: anon_key.trim().to_string(),
            }),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete(BACKEND_URL_VAR, BACKEND_ANON_KEY_VAR))
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete(BACKEND_ANON_KEY_VAR, BACKEND_URL_VAR))
            }
            (None, None) => None,
        };

        let log_filter = read(LOG_FILTER_VAR)
            .or_else(|| read("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            backend,
            log_filter,
        })
    }
}

/// Parses the backend URL so that relative joins keep its path.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        var: BACKEND_URL_VAR,
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_runs_in_demo_mode() {
        let config = load(&[]).unwrap();
        assert_eq!(config.backend, None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn backend_url_gains_a_trailing_slash() {
        let config = load(&[
            (BACKEND_URL_VAR, "https://abc.example.co"),
            (BACKEND_ANON_KEY_VAR, " anon "),
        ])
        .unwrap();
        let backend = config.backend.unwrap();
        assert_eq!(backend.url.as_str(), "https://abc.example.co/");
        assert_eq!(backend.anon_key, "anon");
        assert_eq!(
            backend.url.join("auth/v1/user").unwrap().as_str(),
            "https://abc.example.co/auth/v1/user"
        );
    }

    #[test]
    fn half_configured_backend_is_an_error() {
        let err = load(&[(BACKEND_URL_VAR, "https://abc.example.co")]).unwrap_err();
        assert!(matches!(err, ConfigError::Incomplete(BACKEND_URL_VAR, _)));
    }

    #[test]
    fn bad_url_is_reported() {
        let err = load(&[
            (BACKEND_URL_VAR, "not a url"),
            (BACKEND_ANON_KEY_VAR, "key"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn app_log_filter_wins_over_rust_log() {
        let config = load(&[(LOG_FILTER_VAR, "debug"), ("RUST_LOG", "warn")]).unwrap();
        assert_eq!(config.log_filter, "debug");
        let config = load(&[("RUST_LOG", "warn")]).unwrap();
        assert_eq!(config.log_filter, "warn");
    }
}
