//! Client configuration loaded from environment variables.
//!
//! Every setting has a default so the portal runs with zero configuration.

use std::path::PathBuf;
use std::time::Duration;

use clinic_shared::constants::{DEFAULT_API_URL, REQUEST_TIMEOUT_SECS};

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    /// Env: `CLINIC_API_URL`
    /// Default: [`DEFAULT_API_URL`]
    pub api_url: String,

    /// Per-request timeout.
    /// Env: `CLINIC_TIMEOUT_SECS`
    /// Default: 60 seconds
    pub timeout: Duration,

    /// Directory holding the persisted storage database.
    /// Env: `CLINIC_DATA_DIR`
    /// Default: `None` (platform data directory).
    pub data_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            data_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("CLINIC_API_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.starts_with("http://") || url.starts_with("https://") {
                config.api_url = url.to_string();
            } else {
                tracing::warn!(value = %url, "Invalid CLINIC_API_URL, using default");
            }
        }

        if let Some(val) = lookup("CLINIC_TIMEOUT_SECS") {
            match val.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %val, "Invalid CLINIC_TIMEOUT_SECS, using default"),
            }
        }

        if let Some(dir) = lookup("CLINIC_DATA_DIR") {
            if !dir.trim().is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ClientConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("CLINIC_API_URL", "http://localhost:8000/api/"),
            ("CLINIC_TIMEOUT_SECS", "5"),
            ("CLINIC_DATA_DIR", "/tmp/clinic"),
        ]);
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/clinic")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_with(&[
            ("CLINIC_API_URL", "localhost:8000"),
            ("CLINIC_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(config, ClientConfig::default());
    }
}
