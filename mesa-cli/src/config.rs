//! CLI configuration
//!
//! Values come from the environment (a `.env` file is loaded first) and can
//! be overridden by command line flags.

use mesa_client::{ClientConfig, Session};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Backend base URL (MESA_API_URL)
    pub api_url: String,
    /// Access token (MESA_TOKEN)
    pub token: Option<String>,
    /// Request timeout in seconds (MESA_TIMEOUT_SECS)
    pub timeout_secs: u64,
    /// Notification bus address (MESA_NOTIFY_ADDR)
    pub notify_addr: Option<String>,
    /// Log level (MESA_LOG_LEVEL)
    pub log_level: String,
    /// JSON log output (MESA_LOG_JSON)
    pub log_json: bool,
    /// Directory for rolling log files (MESA_LOG_DIR)
    pub log_dir: Option<String>,
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_url: non_empty("MESA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            token: non_empty("MESA_TOKEN"),
            timeout_secs: non_empty("MESA_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            notify_addr: non_empty("MESA_NOTIFY_ADDR"),
            log_level: non_empty("MESA_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
            log_json: non_empty("MESA_LOG_JSON")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_dir: non_empty("MESA_LOG_DIR"),
        }
    }

    /// Apply command line overrides
    pub fn merge_overrides(
        mut self,
        api_url: Option<String>,
        token: Option<String>,
        notify_addr: Option<String>,
    ) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if token.is_some() {
            self.token = token;
        }
        if notify_addr.is_some() {
            self.notify_addr = notify_addr;
        }
        self
    }

    /// Session seeded with the configured access token, if any
    pub fn session(&self) -> Session {
        match &self.token {
            Some(token) => Session::with_token(token.clone()),
            None => Session::new(),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.api_url).with_timeout(self.timeout_secs);
        if let Some(addr) = &self.notify_addr {
            config = config.with_notify_addr(addr);
        }
        config
    }
}
