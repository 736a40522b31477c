use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_DATA_DIR: &str = ".apt-search";

/// Runtime settings, overridable through `APT_SEARCH_*` environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the real-estate API
    pub api_url: String,
    /// Bearer token sent with search requests
    pub api_token: Option<String>,
    /// Where search history and recent views are stored
    pub data_dir: PathBuf,
    /// HTTP client timeout
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timeout_secs: 30,
            user_agent: format!("apt-search/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with whatever is set in the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("APT_SEARCH_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(token) = lookup("APT_SEARCH_TOKEN").filter(|t| !t.is_empty()) {
            config.api_token = Some(token);
        }
        if let Some(dir) = lookup("APT_SEARCH_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("APT_SEARCH_TIMEOUT_SECS") {
            config.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid APT_SEARCH_TIMEOUT_SECS: {:?}", secs))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_token, None);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APT_SEARCH_API_URL", "https://api.example.com/"),
            ("APT_SEARCH_TOKEN", "secret"),
            ("APT_SEARCH_DATA_DIR", "/tmp/apt"),
            ("APT_SEARCH_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/apt"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("APT_SEARCH_TIMEOUT_SECS", "soon")]));
        assert!(result.is_err());
    }
}
