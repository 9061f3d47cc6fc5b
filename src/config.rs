use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Fetch from the backend instead of serving the fixture.
    pub use_backend: bool,
    pub backend_url: String,
    pub request_timeout: Duration,
    pub listen_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            use_backend: false,
            backend_url: "http://localhost:3000".into(),
            request_timeout: Duration::from_secs(10),
            listen_addr: "0.0.0.0:8080".into(),
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("USE_BACKEND") {
            config.use_backend = parse_flag(&value)
                .with_context(|| format!("USE_BACKEND is not a boolean: {:?}", value))?;
        }
        if let Some(url) = lookup("BACKEND_URL") {
            reqwest::Url::parse(&url).with_context(|| format!("BACKEND_URL is malformed: {}", url))?;
            config.backend_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("BACKEND_TIMEOUT_SECS") {
            let secs = secs
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| {
                    format!("BACKEND_TIMEOUT_SECS must be a positive number: {:?}", secs)
                })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(addr) = lookup("LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
