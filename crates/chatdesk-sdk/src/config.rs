//! Client configuration.
//!
//! Built from environment variables; the CLI layers its own flags on top.

use chatdesk_models::DEFAULT_FALLBACK_USER_ID;

/// Backend URL used when `CHATDESK_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Number of turns requested from `/history`.
pub const HISTORY_LIMIT: u32 = 20;

/// Number of records requested from `/pulse` and `/alerts`.
pub const FEED_LIMIT: u32 = 50;

/// Settings shared by the transport and the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin the endpoint paths are appended to.
    pub base_url: String,
    /// Identifier used when the identifier field is blank.
    pub fallback_user_id: String,
    /// `limit` sent to `/history`.
    pub history_limit: u32,
    /// `limit` sent to `/pulse` and `/alerts`.
    pub feed_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fallback_user_id: DEFAULT_FALLBACK_USER_ID.to_string(),
            history_limit: HISTORY_LIMIT,
            feed_limit: FEED_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                 | Default                 | Description                       |
    /// |--------------------------|-------------------------|-----------------------------------|
    /// | `CHATDESK_URL`           | `http://localhost:8000` | Backend origin                    |
    /// | `CHATDESK_FALLBACK_USER` | `test`                  | Identifier used for a blank field |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("CHATDESK_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let fallback_user_id = std::env::var("CHATDESK_FALLBACK_USER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.fallback_user_id);

        Self {
            base_url,
            fallback_user_id,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.history_limit, 20);
        assert_eq!(cfg.feed_limit, 50);
    }

    #[test]
    fn default_fallback_user() {
        assert_eq!(ClientConfig::default().fallback_user_id, "test");
    }

    #[test]
    fn from_env_keeps_fixed_limits() {
        let cfg = ClientConfig::from_env();
        assert_eq!(cfg.history_limit, HISTORY_LIMIT);
        assert_eq!(cfg.feed_limit, FEED_LIMIT);
        assert!(!cfg.base_url.is_empty());
    }
}
