//! Client configuration structures and builders

use crate::config::{ApiSettings, ConfigSource, DotenvConfigSource, IniConfigSource, ProxyConfig};
use crate::credential_store::ExplicitCredentials;
use crate::credentials::CredentialField;
use crate::http_client::HttpConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Format of the optional credentials file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// INI file with `[AUTH]` and `[API]` sections.
    #[default]
    Ini,
    /// Dotenv file with `<PREFIX>_KEY`, `<PREFIX>_SECRET`, ... entries.
    Dotenv {
        /// Key prefix, usually the exchange name.
        prefix: String,
    },
}

impl ConfigFormat {
    pub(crate) fn source(&self) -> Box<dyn ConfigSource> {
        match self {
            Self::Ini => Box::new(IniConfigSource),
            Self::Dotenv { prefix } => Box::new(DotenvConfigSource::new(prefix.clone())),
        }
    }
}

/// Client configuration.
///
/// Explicit values here take precedence over the config file, which takes
/// precedence over the exchange defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Credentials passed directly by the caller
    pub credentials: ExplicitCredentials,
    /// Optional credentials file
    pub config_path: Option<PathBuf>,
    /// Format of `config_path`
    pub config_format: ConfigFormat,
    /// Base address override
    pub address: Option<String>,
    /// Version segment override
    pub version: Option<String>,
    /// Request timeout override (default: 10 seconds)
    pub timeout: Option<Duration>,
    /// TCP connection timeout (default: 10 seconds)
    pub connect_timeout: Option<Duration>,
    /// Custom user agent string
    pub user_agent: Option<String>,
    /// HTTP proxy configuration
    pub proxy: Option<ProxyConfig>,
    /// Log request bodies at debug level
    pub verbose: bool,
}

impl ClientConfig {
    /// Create a new configuration builder
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitex_core::client::ClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::builder()
    ///     .key("panda")
    ///     .secret("shadow")
    ///     .timeout(Duration::from_secs(5))
    ///     .build();
    /// assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    /// ```
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Applies explicit address and version overrides on top of `api`.
    pub fn apply_api_overrides(&self, mut api: ApiSettings) -> ApiSettings {
        if let Some(address) = &self.address {
            api.address = address.trim_end_matches('/').to_string();
        }
        if let Some(version) = &self.version {
            api.version = Some(version.clone());
        }
        api
    }

    /// Transport settings, taking the timeout from `api` unless set explicitly.
    pub fn http_config(&self, api: &ApiSettings) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout: self.timeout.or(api.timeout).unwrap_or(defaults.timeout),
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            verbose: self.verbose,
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            proxy: self.proxy.clone(),
            ..defaults
        }
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.key(key);
        self
    }

    /// Set the API secret
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.secret(secret);
        self
    }

    /// Set an identity field (user id, passphrase, ...)
    pub fn credential(mut self, field: CredentialField, value: impl Into<String>) -> Self {
        self.config.credentials = self.config.credentials.with(field, value);
        self
    }

    /// Read missing credentials from an INI file
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.config_path = Some(path.into());
        self.config.config_format = ConfigFormat::Ini;
        self
    }

    /// Read missing credentials from a dotenv file with `prefix`ed keys
    pub fn dotenv_file(mut self, path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.config.config_path = Some(path.into());
        self.config.config_format = ConfigFormat::Dotenv {
            prefix: prefix.into(),
        };
        self
    }

    /// Override the base address
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = Some(address.into());
        self
    }

    /// Override the version segment
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.version = Some(version.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the TCP connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set a custom user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Set the HTTP proxy
    pub fn proxy(mut self, proxy: ProxyConfig) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Enable or disable verbose request logging
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .key("panda")
            .secret("shadow")
            .credential(CredentialField::UserId, "42")
            .address("http://localhost:9000/")
            .version("v9")
            .verbose(true)
            .build();
        assert_eq!(config.credentials.get(CredentialField::UserId), Some("42"));
        assert!(config.verbose);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_api_overrides() {
        let config = ClientConfig::builder()
            .address("http://localhost:9000/")
            .build();
        let api = config
            .apply_api_overrides(ApiSettings::new("https://www.bitstamp.net/api", Some("v2")));
        assert_eq!(api.address, "http://localhost:9000");
        assert_eq!(api.version.as_deref(), Some("v2"));
    }

    #[test]
    fn test_http_config_timeout_precedence() {
        let mut api = ApiSettings::new("https://x", None);
        api.timeout = Some(Duration::from_secs(3));

        let from_file = ClientConfig::default().http_config(&api);
        assert_eq!(from_file.timeout, Duration::from_secs(3));

        let explicit = ClientConfig::builder()
            .timeout(Duration::from_secs(7))
            .build()
            .http_config(&api);
        assert_eq!(explicit.timeout, Duration::from_secs(7));

        let default = ClientConfig::default().http_config(&ApiSettings::new("https://x", None));
        assert_eq!(default.timeout, Duration::from_secs(10));
        assert!(default.user_agent.starts_with("bitex-rust/"));
    }

    #[test]
    fn test_dotenv_format() {
        let config = ClientConfig::builder().dotenv_file(".env", "KRAKEN").build();
        assert_eq!(
            config.config_format,
            ConfigFormat::Dotenv {
                prefix: "KRAKEN".into()
            }
        );
    }
}
