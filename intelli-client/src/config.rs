//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default request timeout (15 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Client configuration for connecting to the IntelliHub gateway
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, gateway prefix included (e.g., "http://localhost:8080/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the persisted session
    pub storage_dir: PathBuf,

    /// Product name used in page titles
    pub app_name: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            storage_dir: PathBuf::from(".intellihub"),
            app_name: "IntelliHub".to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `INTELLI_API_BASE_URL` (default `http://localhost:8080/api`)
    /// - `INTELLI_TIMEOUT_SECS` (default 15)
    /// - `INTELLI_STORAGE_DIR` (default `.intellihub`)
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("INTELLI_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
        );
        if let Some(timeout) = std::env::var("INTELLI_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(dir) = std::env::var("INTELLI_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the session storage directory
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Set the product name used in page titles
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, 15);
        assert_eq!(config.timeout_duration(), Duration::from_secs(15));
        assert_eq!(config.app_name, "IntelliHub");
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::new("http://gw:9000/api/")
            .with_timeout(3)
            .with_storage_dir("/tmp/ih")
            .with_app_name("Hub");
        assert_eq!(config.timeout, 3);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/ih"));
        assert_eq!(config.app_name, "Hub");
    }
}
