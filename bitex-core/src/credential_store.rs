//! Credential resolution.
//!
//! Each field resolves independently: an explicit value wins over the config
//! file's `AUTH` section, which wins over "absent". Gaps are reported as
//! [`CredentialFinding`]s rather than errors so public endpoints stay usable;
//! authenticated calls re-check via
//! [`CredentialSet::check_auth_requirements`](crate::credentials::CredentialSet::check_auth_requirements).
//!
//! The only hard failure at construction time is an explicitly supplied empty
//! string for a field the exchange requires.

use crate::config::{API_KEYS, ApiSettings, ConfigFile, ConfigSource, ConfigValues};
use crate::credentials::{CredentialField, CredentialSet, SecretString};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Credential values supplied directly by the caller.
#[derive(Clone, Default)]
pub struct ExplicitCredentials {
    values: BTreeMap<CredentialField, String>,
}

impl ExplicitCredentials {
    /// No explicit values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` explicitly. An empty string counts as "supplied but empty".
    #[must_use]
    pub fn with(mut self, field: CredentialField, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn key(self, key: impl Into<String>) -> Self {
        self.with(CredentialField::Key, key)
    }

    /// Sets the API secret.
    #[must_use]
    pub fn secret(self, secret: impl Into<String>) -> Self {
        self.with(CredentialField::Secret, secret)
    }

    /// Explicit value for `field`, if one was supplied.
    pub fn get(&self, field: CredentialField) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }
}

impl fmt::Debug for ExplicitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.values.keys().map(CredentialField::as_str))
            .finish()
    }
}

/// A gap or problem noticed while resolving credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialFinding {
    /// Field was supplied explicitly as an empty string but is required.
    EmptyRequiredField(CredentialField),
    /// A config file was given but does not contain this field.
    IncompleteCredentialConfiguration(CredentialField),
    /// Field is absent and no config file was given.
    IncompleteCredentials(CredentialField),
    /// A config file was given but its `API` section lacks this setting; the
    /// exchange default is used.
    IncompleteApiConfiguration(&'static str),
}

impl CredentialFinding {
    /// Whether this finding must abort construction.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::EmptyRequiredField(_))
    }

    /// Name of the field or setting this finding is about.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::EmptyRequiredField(field)
            | Self::IncompleteCredentialConfiguration(field)
            | Self::IncompleteCredentials(field) => field.as_str(),
            Self::IncompleteApiConfiguration(setting) => setting,
        }
    }
}

impl fmt::Display for CredentialFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRequiredField(field) => write!(f, "'{field}' was supplied but is empty"),
            Self::IncompleteCredentialConfiguration(field) => {
                write!(f, "'{field}' not found in config!")
            }
            Self::IncompleteCredentials(field) => {
                write!(f, "'{field}' is missing; authenticated calls will fail")
            }
            Self::IncompleteApiConfiguration(setting) => {
                write!(f, "API '{setting}' not found in config, using default")
            }
        }
    }
}

/// Output of [`resolve`]: the credential set plus everything noticed on the way.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Resolved credentials.
    pub credentials: CredentialSet,
    /// Warnings and errors, in field order.
    pub findings: Vec<CredentialFinding>,
}

impl Resolution {
    /// Returns the credentials, or an input error for the first fatal finding.
    pub fn into_result(self) -> Result<CredentialSet> {
        match self.findings.iter().find(|f| f.is_error()) {
            Some(finding) => Err(Error::invalid_request(finding.to_string())),
            None => Ok(self.credentials),
        }
    }
}

/// Resolves credentials field by field. Pure: emits no logs.
///
/// `required` lists the identity fields the exchange needs beyond key and secret.
/// Optional fields that end up absent produce no finding.
pub fn resolve(
    explicit: &ExplicitCredentials,
    config: Option<&ConfigValues>,
    required: &[CredentialField],
) -> Resolution {
    let mut fields = BTreeMap::new();
    let mut findings = Vec::new();

    for field in CredentialField::ALL {
        let is_required = matches!(field, CredentialField::Key | CredentialField::Secret)
            || required.contains(&field);

        if let Some(value) = explicit.get(field) {
            if value.is_empty() && is_required {
                findings.push(CredentialFinding::EmptyRequiredField(field));
            } else {
                fields.insert(field, SecretString::new(value));
            }
            continue;
        }

        let from_config = config.and_then(|values| values.get(field.as_str()));
        match (from_config, config.is_some()) {
            (Some(value), _) => {
                fields.insert(field, SecretString::new(value.as_str()));
            }
            (None, true) if is_required => {
                findings.push(CredentialFinding::IncompleteCredentialConfiguration(field));
            }
            (None, false) if is_required => {
                findings.push(CredentialFinding::IncompleteCredentials(field));
            }
            _ => {}
        }
    }

    Resolution {
        credentials: CredentialSet::from_fields(fields),
        findings,
    }
}

/// Everything a client needs from its credential sources.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    credentials: CredentialSet,
    api: ApiSettings,
    findings: Vec<CredentialFinding>,
}

impl CredentialStore {
    /// Resolves credentials and API settings, logging every warning.
    ///
    /// `config` is an optional path read through `source`. `defaults` are the
    /// exchange's address and version, overridable from the `API` section.
    pub fn load(
        explicit: &ExplicitCredentials,
        config: Option<(&dyn ConfigSource, &Path)>,
        required: &[CredentialField],
        defaults: ApiSettings,
    ) -> Result<Self> {
        let file = config
            .map(|(source, path)| source.load(path))
            .transpose()?;
        Self::from_config_file(explicit, file.as_ref(), required, defaults)
    }

    /// Like [`load`](Self::load) with an already loaded config file.
    pub fn from_config_file(
        explicit: &ExplicitCredentials,
        file: Option<&ConfigFile>,
        required: &[CredentialField],
        defaults: ApiSettings,
    ) -> Result<Self> {
        let auth = file.map(ConfigFile::auth);
        let resolution = resolve(explicit, auth.as_ref(), required);
        let mut findings = resolution.findings.clone();
        let credentials = resolution.into_result()?;

        let api = match file {
            Some(file) => {
                let section = file.api();
                findings.extend(
                    API_KEYS
                        .into_iter()
                        .filter(|key| !section.contains_key(*key))
                        .map(CredentialFinding::IncompleteApiConfiguration),
                );
                defaults.with_overrides(&section)?
            }
            None => defaults,
        };

        for finding in &findings {
            warn!(subject = finding.subject(), "{finding}");
        }

        Ok(Self {
            credentials,
            api,
            findings,
        })
    }

    /// Resolved credentials.
    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Resolved API settings.
    pub fn api(&self) -> &ApiSettings {
        &self.api
    }

    /// Non-fatal findings produced during resolution.
    pub fn findings(&self) -> &[CredentialFinding] {
        &self.findings
    }

    /// Splits into credentials and API settings.
    pub fn into_parts(self) -> (CredentialSet, ApiSettings) {
        (self.credentials, self.api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IniConfigSource;
    use std::io::Write;

    fn config(pairs: &[(&str, &str)]) -> ConfigValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn defaults() -> ApiSettings {
        ApiSettings::new("https://www.bitstamp.net/api", Some("v2"))
    }

    #[test]
    fn test_explicit_wins_over_config() {
        let explicit = ExplicitCredentials::new().key("explicit");
        let cfg = config(&[("key", "from_file"), ("secret", "file_secret")]);
        let res = resolve(&explicit, Some(&cfg), &[]);

        assert!(res.findings.is_empty());
        assert_eq!(res.credentials.key().unwrap().expose_secret(), "explicit");
        assert_eq!(
            res.credentials.secret().unwrap().expose_secret(),
            "file_secret"
        );
    }

    #[test]
    fn test_missing_without_config_warns_incomplete_credentials() {
        let res = resolve(&ExplicitCredentials::new(), None, &[CredentialField::UserId]);
        assert_eq!(
            res.findings,
            vec![
                CredentialFinding::IncompleteCredentials(CredentialField::Key),
                CredentialFinding::IncompleteCredentials(CredentialField::Secret),
                CredentialFinding::IncompleteCredentials(CredentialField::UserId),
            ]
        );
        assert!(res.into_result().is_ok());
    }

    #[test]
    fn test_missing_with_config_warns_incomplete_configuration() {
        let cfg = config(&[("key", "panda"), ("secret", "shadow")]);
        let res = resolve(&ExplicitCredentials::new(), Some(&cfg), &[CredentialField::UserId]);
        assert_eq!(
            res.findings,
            vec![CredentialFinding::IncompleteCredentialConfiguration(
                CredentialField::UserId
            )]
        );
        assert_eq!(
            res.findings[0].to_string(),
            "'user_id' not found in config!"
        );
    }

    #[test]
    fn test_optional_fields_produce_no_findings() {
        let explicit = ExplicitCredentials::new().key("panda").secret("shadow");
        let res = resolve(&explicit, None, &[]);
        assert!(res.findings.is_empty());
        assert!(res.credentials.get(CredentialField::Passphrase).is_none());
    }

    #[test]
    fn test_explicit_empty_required_field_is_input_error() {
        let explicit = ExplicitCredentials::new()
            .key("panda")
            .secret("shadow")
            .with(CredentialField::Passphrase, "");
        let res = resolve(&explicit, None, &[CredentialField::Passphrase]);
        assert!(res.findings[0].is_error());

        let err = res.into_result().unwrap_err();
        assert!(err.is_invalid_request());
        assert!(err.to_string().contains("passphrase"));
    }

    #[test]
    fn test_explicit_empty_optional_field_is_kept() {
        let explicit = ExplicitCredentials::new()
            .key("panda")
            .secret("shadow")
            .with(CredentialField::AccountId, "");
        let res = resolve(&explicit, None, &[]);
        assert!(res.findings.is_empty());
        assert!(res.credentials.get(CredentialField::AccountId).unwrap().is_empty());
    }

    #[test]
    fn test_explicit_debug_hides_values() {
        let explicit = ExplicitCredentials::new().key("panda");
        let debug = format!("{explicit:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("panda"));
    }

    #[test]
    fn test_store_load_from_ini() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[AUTH]\nkey = panda\nsecret = shadow\nuser_id = 267705").unwrap();
        writeln!(file, "[API]\nversion = v3").unwrap();

        let store = CredentialStore::load(
            &ExplicitCredentials::new(),
            Some((&IniConfigSource, file.path())),
            &[CredentialField::UserId],
            defaults(),
        )
        .unwrap();

        assert_eq!(
            store.findings(),
            &[CredentialFinding::IncompleteApiConfiguration("address")]
        );
        assert_eq!(
            store
                .credentials()
                .get(CredentialField::UserId)
                .unwrap()
                .expose_secret(),
            "267705"
        );
        assert_eq!(store.api().version.as_deref(), Some("v3"));
        assert_eq!(store.api().address, "https://www.bitstamp.net/api");
    }

    #[test]
    fn test_store_load_without_config_keeps_defaults() {
        let store = CredentialStore::load(
            &ExplicitCredentials::new(),
            None,
            &[],
            defaults(),
        )
        .unwrap();
        assert_eq!(store.findings().len(), 2);
        let (creds, api) = store.into_parts();
        assert!(creds.key().is_none());
        assert_eq!(api, defaults());
    }

    #[test]
    fn test_store_load_unreadable_config() {
        let err = CredentialStore::load(
            &ExplicitCredentials::new(),
            Some((&IniConfigSource, Path::new("/no/such/file.ini"))),
            &[],
            defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
