//! Client configuration

use std::time::Duration;

/// Token refresh schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Refresh this long before the token expires
    pub margin: Duration,
    /// Retries after the first failed refresh
    pub max_retries: u32,
    /// Fixed delay between retries
    pub retry_delay: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            margin: Duration::from_secs(5 * 60),
            max_retries: 3,
            retry_delay: Duration::from_secs(5),
        }
    }
}

/// Notification reconnect schedule
///
/// Delays double from `initial_delay` up to `max_delay`. After
/// `max_attempts` consecutive failures the listener gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.initial_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_delay)
    }
}

/// Client configuration for connecting to the Mesa backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:3000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Notification bus TCP address
    pub notify_addr: Option<String>,

    /// Name sent in the notification handshake
    pub client_name: String,

    pub refresh: RefreshPolicy,

    pub reconnect: ReconnectPolicy,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            notify_addr: None,
            client_name: "mesa-desk".to_string(),
            refresh: RefreshPolicy::default(),
            reconnect: ReconnectPolicy::default(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the notification bus address
    pub fn with_notify_addr(mut self, addr: impl Into<String>) -> Self {
        self.notify_addr = Some(addr.into());
        self
    }

    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = name.into();
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh = policy;
        self
    }

    pub fn with_reconnect_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://pos.local")
            .with_timeout(5)
            .with_notify_addr("127.0.0.1:9100");

        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.notify_addr.as_deref(), Some("127.0.0.1:9100"));
        assert_eq!(config.refresh.margin, Duration::from_secs(300));
    }

    #[test]
    fn test_reconnect_backoff_doubles_and_caps() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for(2), Duration::from_secs(2));
        assert_eq!(policy.delay_for(3), Duration::from_secs(4));
        assert_eq!(policy.delay_for(5), Duration::from_secs(16));
        assert_eq!(policy.delay_for(6), Duration::from_secs(30));
        assert_eq!(policy.delay_for(40), Duration::from_secs(30));
    }
}
