use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use std::time::Duration;

/// HTTP transport configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// TCP connection timeout (default: 10 seconds)
    pub connect_timeout: Duration,
    /// Whether to log request bodies at debug level
    pub verbose: bool,
    /// Default User-Agent header value
    pub user_agent: String,
    /// Optional proxy configuration
    pub proxy: Option<ProxyConfig>,
    /// Maximum response body size in bytes (default: 10MB)
    ///
    /// Responses exceeding this limit are rejected with an `InvalidRequest` error.
    pub max_response_size: usize,
    /// Maximum request body size in bytes (default: 10MB)
    pub max_request_size: usize,
    /// Maximum number of idle connections per host in the connection pool.
    ///
    /// Default: 10
    pub pool_max_idle_per_host: usize,
    /// Timeout for idle connections in the pool.
    ///
    /// Default: 90 seconds
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
            verbose: false,
            user_agent: format!("bitex-rust/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            max_response_size: 10 * 1024 * 1024,
            max_request_size: 10 * 1024 * 1024,
            pool_max_idle_per_host: 10,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl HttpConfig {
    /// Validates the configuration.
    ///
    /// Returns warnings for suboptimal but valid settings.
    ///
    /// # Validation Rules
    ///
    /// - `timeout` of zero or above 5 minutes is an error
    /// - `timeout` below 1 second produces a warning
    /// - `max_request_size` of zero or above 100MB is an error
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitex_core::http_client::HttpConfig;
    /// use std::time::Duration;
    ///
    /// assert!(HttpConfig::default().validate().unwrap().is_empty());
    ///
    /// let invalid = HttpConfig {
    ///     timeout: Duration::from_secs(600),
    ///     ..Default::default()
    /// };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<Vec<String>> {
        const MAX_REASONABLE_REQUEST_SIZE: usize = 100 * 1024 * 1024;

        let mut warnings = Vec::new();
        if self.timeout.is_zero() {
            return Err(Error::config("timeout cannot be zero"));
        }
        if self.timeout > Duration::from_secs(300) {
            return Err(Error::config(format!(
                "timeout {:?} exceeds 5 minutes",
                self.timeout
            )));
        }
        if self.timeout < Duration::from_secs(1) {
            warnings.push(format!(
                "timeout {:?} is very short, may cause frequent timeouts",
                self.timeout
            ));
        }

        if self.max_request_size == 0 {
            return Err(Error::config("max_request_size cannot be zero"));
        }
        if self.max_request_size > MAX_REASONABLE_REQUEST_SIZE {
            return Err(Error::config(format!(
                "max_request_size {} exceeds 100MB",
                self.max_request_size
            )));
        }

        Ok(warnings)
    }
}
