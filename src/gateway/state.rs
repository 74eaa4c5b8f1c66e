//! Shared state for gateway handlers

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;

/// Largest request body forwarded upstream (media uploads included)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct GatewayState {
    /// Pooled client used for every forwarded request
    pub http: reqwest::Client,
    /// Backend origin, without a trailing slash
    pub backend: Arc<str>,
    /// Directory holding the built web UI
    pub ui_dir: PathBuf,
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(backend: impl Into<String>, ui_dir: impl Into<PathBuf>, timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let backend: String = backend.into();
        Ok(Self {
            http,
            backend: Arc::from(backend.trim_end_matches('/')),
            ui_dir: ui_dir.into(),
            start_time: Instant::now(),
        })
    }

    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        Self::new(
            config.api.base_url.clone(),
            &config.portal.ui_dir,
            Duration::from_secs(config.api.timeout_secs),
        )
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Upstream URL for a path-and-query received by the gateway
    pub fn upstream_url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.backend, path_and_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_url_joins_without_double_slash() {
        let state = GatewayState::new("https://api.example.org/", "dist", Duration::from_secs(5)).unwrap();
        assert_eq!(
            state.upstream_url("/api/v1/members?page=2"),
            "https://api.example.org/api/v1/members?page=2"
        );
    }
}
