//! Configuration sources and API settings.
//!
//! A [`ConfigSource`] turns a path into a [`ConfigFile`]: named sections, each a flat
//! key/value mapping. The core only ever consumes those mappings: the `AUTH` section
//! feeds the credential store and the `API` section feeds [`ApiSettings`].
//!
//! ```text
//! [AUTH]
//! key = panda
//! secret = shadow
//! user_id = 267705
//!
//! [API]
//! address = https://www.bitstamp.net/api
//! version = v2
//! ```

use crate::error::{Error, Result};
use ini::Ini;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Section holding key, secret and identity fields.
pub const AUTH_SECTION: &str = "AUTH";
/// Section holding address and version overrides.
pub const API_SECTION: &str = "API";

/// Flat key/value mapping of one config section. Keys are lower-case.
pub type ConfigValues = BTreeMap<String, String>;

/// A loaded configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
    sections: BTreeMap<String, ConfigValues>,
}

impl ConfigFile {
    /// Creates a config file from already-parsed sections.
    pub fn new(path: impl Into<PathBuf>, sections: BTreeMap<String, ConfigValues>) -> Self {
        let sections = sections
            .into_iter()
            .map(|(name, values)| {
                let values = values
                    .into_iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v))
                    .collect();
                (name.to_ascii_uppercase(), values)
            })
            .collect();
        Self {
            path: path.into(),
            sections,
        }
    }

    /// Path the file was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a section by name (case-insensitive).
    pub fn section(&self, name: &str) -> Option<&ConfigValues> {
        self.sections.get(&name.to_ascii_uppercase())
    }

    /// The `AUTH` section, empty if absent.
    pub fn auth(&self) -> ConfigValues {
        self.section(AUTH_SECTION).cloned().unwrap_or_default()
    }

    /// The `API` section, empty if absent.
    pub fn api(&self) -> ConfigValues {
        self.section(API_SECTION).cloned().unwrap_or_default()
    }
}

/// Loads configuration files.
pub trait ConfigSource: Send + Sync {
    /// Reads `path` into sections.
    fn load(&self, path: &Path) -> Result<ConfigFile>;
}

/// INI-style config files (`[SECTION]` headers, `key = value` or `key: value` lines,
/// `#`/`;` comments), read with `rust-ini`. Values are taken verbatim: backslashes
/// in secrets are not escape sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct IniConfigSource;

impl IniConfigSource {
    /// Parses INI text.
    pub fn parse(path: &Path, text: &str) -> Result<ConfigFile> {
        let ini = Ini::load_from_str_noescape(text)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;

        let mut sections: BTreeMap<String, ConfigValues> = BTreeMap::new();
        for (name, properties) in ini.iter() {
            let mut values = ConfigValues::new();
            for (key, value) in properties.iter() {
                // A line without a separator runs into the next key.
                if key.contains('\n') {
                    return Err(Error::config(format!(
                        "{}: expected 'key = value', found '{}'",
                        path.display(),
                        key.lines().next().unwrap_or_default().trim()
                    )));
                }
                values.insert(key.trim().to_string(), value.trim().to_string());
            }
            match name {
                Some(name) => {
                    sections.entry(name.trim().to_string()).or_default().extend(values);
                }
                None => {
                    if let Some(key) = values.keys().next() {
                        return Err(Error::config(format!(
                            "{}: '{key}' appears before any section header",
                            path.display()
                        )));
                    }
                }
            }
        }

        Ok(ConfigFile::new(path, sections))
    }
}

impl ConfigSource for IniConfigSource {
    fn load(&self, path: &Path) -> Result<ConfigFile> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(path, &text)
    }
}

/// Dotenv files with prefixed keys, e.g. `BITSTAMP_KEY`, `BITSTAMP_USER_ID`,
/// `BITSTAMP_API_VERSION`.
///
/// `<PREFIX>_API_ADDRESS` / `<PREFIX>_API_VERSION` land in the `API` section,
/// every other `<PREFIX>_<NAME>` in `AUTH`.
#[derive(Debug, Clone)]
pub struct DotenvConfigSource {
    prefix: String,
}

impl DotenvConfigSource {
    /// Creates a source reading keys that start with `prefix` (case-insensitive).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_uppercase(),
        }
    }
}

impl ConfigSource for DotenvConfigSource {
    fn load(&self, path: &Path) -> Result<ConfigFile> {
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;

        let mut auth = ConfigValues::new();
        let mut api = ConfigValues::new();
        let prefix = format!("{}_", self.prefix);

        for item in iter {
            let (key, value) =
                item.map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
            let upper = key.to_ascii_uppercase();
            let Some(name) = upper.strip_prefix(&prefix) else {
                continue;
            };
            match name.strip_prefix("API_") {
                Some(setting) => api.insert(setting.to_ascii_lowercase(), value),
                None => auth.insert(name.to_ascii_lowercase(), value),
            };
        }

        let mut sections = BTreeMap::new();
        sections.insert(AUTH_SECTION.to_string(), auth);
        sections.insert(API_SECTION.to_string(), api);
        Ok(ConfigFile::new(path, sections))
    }
}

/// Keys read from the `API` section.
pub const API_KEYS: [&str; 2] = ["address", "version"];

/// Base address and optional version segment of an exchange's REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    /// Base address, e.g. `https://api.kraken.com`.
    pub address: String,
    /// Version path segment, e.g. `0` or `v1.1`.
    pub version: Option<String>,
    /// Request timeout override from the `API` section.
    pub timeout: Option<Duration>,
}

impl ApiSettings {
    /// Creates API settings.
    pub fn new(address: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            address: address.into().trim_end_matches('/').to_string(),
            version: version.map(str::to_string),
            timeout: None,
        }
    }

    /// Request path for `endpoint`: `/{version}/{endpoint}` or `/{endpoint}`.
    pub fn uri(&self, endpoint: &str) -> String {
        let endpoint = endpoint.trim_start_matches('/');
        match &self.version {
            Some(version) if !version.is_empty() => format!("/{version}/{endpoint}"),
            _ => format!("/{endpoint}"),
        }
    }

    /// Absolute URL for `endpoint`. Absolute endpoints are returned unchanged.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}{}", self.address, self.uri(endpoint))
    }

    /// Applies `address`, `version` and `timeout` (seconds) overrides from an `API`
    /// config section.
    pub fn with_overrides(mut self, api: &ConfigValues) -> Result<Self> {
        if let Some(address) = api.get("address") {
            self.address = address.trim_end_matches('/').to_string();
        }
        if let Some(version) = api.get("version") {
            self.version = Some(version.clone());
        }
        if let Some(timeout) = api.get("timeout") {
            let secs: f64 = timeout
                .parse()
                .map_err(|_| Error::config(format!("invalid API timeout '{timeout}'")))?;
            self.timeout = Some(
                Duration::try_from_secs_f64(secs)
                    .map_err(|_| Error::config(format!("invalid API timeout '{timeout}'")))?,
            );
        }
        Ok(self)
    }
}

/// Proxy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Proxy URL (e.g., "http://127.0.0.1:8080").
    pub url: String,
    /// Optional username for authentication.
    pub username: Option<String>,
    /// Optional password for authentication.
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Create a new proxy configuration with just a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }

    /// Set credentials for the proxy.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BITSTAMP_INI: &str = "\
# bitstamp credentials
[AUTH]
key = SomeKey
secret: SomeSecret
user_id = 267705

[API]
version = v2
";

    #[test]
    fn test_parse_ini_sections() {
        let file = IniConfigSource::parse(Path::new("bitstamp.ini"), BITSTAMP_INI).unwrap();
        let auth = file.auth();
        assert_eq!(auth.get("key").unwrap(), "SomeKey");
        assert_eq!(auth.get("secret").unwrap(), "SomeSecret");
        assert_eq!(auth.get("user_id").unwrap(), "267705");
        assert_eq!(file.api().get("version").unwrap(), "v2");
        assert_eq!(file.path(), Path::new("bitstamp.ini"));
    }

    #[test]
    fn test_parse_ini_case_insensitive_sections() {
        let file = IniConfigSource::parse(Path::new("x.ini"), "[auth]\nKEY=a\n").unwrap();
        assert_eq!(file.auth().get("key").unwrap(), "a");
        assert!(file.section("Api").is_none());
    }

    #[test]
    fn test_parse_ini_rejects_orphan_keys() {
        let err = IniConfigSource::parse(Path::new("x.ini"), "key = a\n[AUTH]\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_ini_rejects_garbage_line() {
        let err = IniConfigSource::parse(Path::new("x.ini"), "[AUTH]\njust words\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("x.ini"));
    }

    #[test]
    fn test_parse_ini_rejects_garbage_line_before_a_key() {
        let text = "[AUTH]\njust words\nkey = a\n";
        let err = IniConfigSource::parse(Path::new("x.ini"), text).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("x.ini"), "{err}");
    }

    #[test]
    fn test_parse_ini_skips_comments_and_keeps_backslashes() {
        let text = "; header\n[AUTH]\n# note\nkey = a\\b\nsecret:  s3cr3t  \n";
        let file = IniConfigSource::parse(Path::new("x.ini"), text).unwrap();
        let auth = file.auth();
        assert_eq!(auth.get("key").unwrap(), "a\\b");
        assert_eq!(auth.get("secret").unwrap(), "s3cr3t");
        assert_eq!(auth.len(), 2);
    }

    #[test]
    fn test_load_ini_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BITSTAMP_INI.as_bytes()).unwrap();

        let loaded = IniConfigSource.load(file.path()).unwrap();
        assert_eq!(loaded.auth().get("user_id").unwrap(), "267705");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = IniConfigSource
            .load(Path::new("/definitely/not/here.ini"))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_dotenv_with_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GDAX_KEY=panda").unwrap();
        writeln!(file, "GDAX_SECRET=shadow").unwrap();
        writeln!(file, "GDAX_PASSPHRASE=shadow_panda").unwrap();
        writeln!(file, "GDAX_API_ADDRESS=https://api-public.sandbox.gdax.com").unwrap();
        writeln!(file, "KRAKEN_KEY=other").unwrap();

        let loaded = DotenvConfigSource::new("gdax").load(file.path()).unwrap();
        let auth = loaded.auth();
        assert_eq!(auth.get("key").unwrap(), "panda");
        assert_eq!(auth.get("passphrase").unwrap(), "shadow_panda");
        assert_eq!(auth.len(), 3);
        assert_eq!(
            loaded.api().get("address").unwrap(),
            "https://api-public.sandbox.gdax.com"
        );
    }

    #[test]
    fn test_api_settings_uri() {
        let versioned = ApiSettings::new("https://bittrex.com/api/", Some("v1.1"));
        assert_eq!(versioned.uri("testing/signature"), "/v1.1/testing/signature");
        assert_eq!(
            versioned.url("testing/signature"),
            "https://bittrex.com/api/v1.1/testing/signature"
        );

        let bare = ApiSettings::new("https://poloniex.com", None);
        assert_eq!(bare.uri("/tradingApi"), "/tradingApi");
    }

    #[test]
    fn test_api_settings_absolute_endpoint() {
        let api = ApiSettings::new("https://www.bitstamp.net/api", Some("v2"));
        let url = "https://www.bitstamp.net/api/v2/trading-pairs-info/";
        assert_eq!(api.url(url), url);
    }

    #[test]
    fn test_api_settings_overrides() {
        let mut overrides = ConfigValues::new();
        overrides.insert("version".into(), "v3".into());
        overrides.insert("timeout".into(), "2.5".into());
        let api = ApiSettings::new("https://api.bitfinex.com", Some("v1"))
            .with_overrides(&overrides)
            .unwrap();
        assert_eq!(api.version.as_deref(), Some("v3"));
        assert_eq!(api.address, "https://api.bitfinex.com");
        assert_eq!(api.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_api_settings_rejects_bad_timeout() {
        let mut overrides = ConfigValues::new();
        overrides.insert("timeout".into(), "soon".into());
        let err = ApiSettings::new("https://api.gdax.com", None)
            .with_overrides(&overrides)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_proxy_config() {
        let proxy = ProxyConfig::new("http://127.0.0.1:8080").with_credentials("u", "p");
        assert_eq!(proxy.username.as_deref(), Some("u"));
        assert_eq!(proxy.password.as_deref(), Some("p"));
    }
}
