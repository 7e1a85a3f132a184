use crate::config::ProxyConfig;
use crate::error::{Error, NetworkError, Result};
use reqwest::{Client, Proxy};
use tracing::{debug, warn};

use super::config::HttpConfig;

/// `reqwest`-backed [`Transport`](super::Transport).
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
}

fn proxy(settings: &ProxyConfig) -> Result<Proxy> {
    let proxy = Proxy::all(&settings.url)
        .map_err(|e| Error::config(format!("invalid proxy '{}': {e}", settings.url)))?;
    Ok(match (&settings.username, &settings.password) {
        (Some(user), Some(password)) => proxy.basic_auth(user, password),
        _ => proxy,
    })
}

impl HttpClient {
    /// Builds the connection pool described by `config`.
    ///
    /// Fails on an invalid configuration or proxy URL; suboptimal settings
    /// are only logged.
    pub fn new(config: HttpConfig) -> Result<Self> {
        config
            .validate()?
            .iter()
            .for_each(|warning| warn!(%warning, "questionable HTTP setting"));

        let builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            .gzip(true);
        let builder = match &config.proxy {
            Some(settings) => builder.proxy(proxy(settings)?),
            None => builder,
        };
        let client = builder
            .build()
            .map_err(|e| NetworkError::Setup(e.to_string()))?;

        debug!(timeout_ms = config.timeout.as_millis(), "HTTP client ready");
        Ok(Self { client, config })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}
