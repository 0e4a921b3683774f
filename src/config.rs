use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    /// Bearer token supplied up front, bypassing the token file.
    pub api_token: Option<String>,
    pub token_file: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process
    /// environment in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = lookup("SUPERLISTA_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid SUPERLISTA_HTTP_TIMEOUT_SECS: {e}"))?;

        Ok(Self {
            api_base_url: lookup("SUPERLISTA_API_URL")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:8080".into()),
            api_token: lookup("SUPERLISTA_TOKEN").filter(|s| !s.is_empty()),
            token_file: lookup("SUPERLISTA_TOKEN_FILE")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| ".superlista-token".into())
                .into(),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn for_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: None,
            token_file: ".superlista-token".into(),
            http_timeout: Duration::from_secs(30),
        }
    }
}
