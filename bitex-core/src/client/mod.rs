//! Authenticated REST client.
//!
//! [`ApiClient`] owns everything one exchange connection needs: the signing
//! strategy, the resolved credentials and API settings, a nonce generator and a
//! transport. Each call runs the same pipeline:
//!
//! ```text
//! descriptor ─┬─ authenticated ─> check_auth_requirements ─> nonce ─> sign ─┐
//!             └─ public ───────────────────────────────────────> unsigned ─┴─> transport
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use bitex_core::client::{ApiClient, ClientConfig};
//!
//! let config = ClientConfig::builder().key("panda").secret("shadow").build();
//! let client = ApiClient::new(KrakenSigner, &config)?;
//! let descriptor = client.descriptor("public/Ticker").param("pair", "XBTUSD").build(&client.rules())?;
//! let response = client.request(&descriptor).await?;
//! ```

mod config;

pub use config::{ClientConfig, ClientConfigBuilder, ConfigFormat};

use crate::config::ApiSettings;
use crate::credential_store::{CredentialFinding, CredentialStore};
use crate::credentials::CredentialSet;
use crate::envelope::{ResponseEnvelope, ResponseFormatter};
use crate::error::Result;
use crate::http_client::{HttpClient, RawResponse, Transport};
use crate::nonce::NonceGenerator;
use crate::request::{Params, RequestDescriptor, RequestDescriptorBuilder, SigningRules};
use crate::signed_request::{SignedRequest, SigningContext, SigningStrategy};
use crate::types::Verb;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// One exchange connection.
///
/// Cheap to share behind an `Arc`; nonce issuance is safe from many tasks at once.
pub struct ApiClient<S: SigningStrategy> {
    strategy: S,
    credentials: CredentialSet,
    api: ApiSettings,
    nonce: NonceGenerator,
    transport: Arc<dyn Transport>,
    findings: Vec<CredentialFinding>,
}

impl<S: SigningStrategy> ApiClient<S> {
    /// Resolves credentials and API settings from `config` and builds an
    /// [`HttpClient`] transport.
    ///
    /// # Errors
    ///
    /// Fails if an explicitly supplied required field is empty, if the config
    /// file cannot be read, or if the transport settings are invalid.
    pub fn new(strategy: S, config: &ClientConfig) -> Result<Self> {
        let store = Self::load_store(&strategy, config)?;
        let transport = HttpClient::new(config.http_config(store.api()))?;
        Ok(Self::from_store(strategy, store, config, Arc::new(transport)))
    }

    /// Like [`new`](Self::new) with a caller-supplied transport.
    pub fn with_transport(
        strategy: S,
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let store = Self::load_store(&strategy, config)?;
        Ok(Self::from_store(strategy, store, config, transport))
    }

    /// Assembles a client from already resolved parts.
    pub fn from_parts(
        strategy: S,
        credentials: CredentialSet,
        api: ApiSettings,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let nonce = NonceGenerator::new(strategy.nonce_kind());
        Self {
            strategy,
            credentials,
            api,
            nonce,
            transport,
            findings: Vec::new(),
        }
    }

    fn load_store(strategy: &S, config: &ClientConfig) -> Result<CredentialStore> {
        let source = config.config_format.source();
        let file = config
            .config_path
            .as_deref()
            .map(|path| (source.as_ref(), path));
        CredentialStore::load(
            &config.credentials,
            file,
            strategy.required_fields(),
            strategy.default_api(),
        )
    }

    fn from_store(
        strategy: S,
        store: CredentialStore,
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let findings = store.findings().to_vec();
        let (credentials, api) = store.into_parts();
        let mut client = Self::from_parts(
            strategy,
            credentials,
            config.apply_api_overrides(api),
            transport,
        );
        client.findings = findings;
        client
    }

    /// Signing strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Resolved credentials.
    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Resolved address and version.
    pub fn api(&self) -> &ApiSettings {
        &self.api
    }

    /// Warnings produced while resolving credentials.
    pub fn findings(&self) -> &[CredentialFinding] {
        &self.findings
    }

    /// Nonce generator shared by every call on this client.
    pub fn nonces(&self) -> &NonceGenerator {
        &self.nonce
    }

    /// Descriptor rules of this exchange.
    pub fn rules(&self) -> SigningRules {
        self.strategy.rules()
    }

    /// Starts a descriptor for `endpoint`.
    pub fn descriptor(&self, endpoint: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptor::builder(endpoint)
    }

    /// Re-validates credentials for an authenticated call.
    pub fn check_auth_requirements(&self) -> Result<()> {
        self.credentials
            .check_auth_requirements(self.strategy.required_fields())
    }

    /// Builds the request for `descriptor`.
    ///
    /// Authenticated descriptors are checked, given a fresh nonce and signed;
    /// the others go out unsigned.
    pub fn prepare(&self, descriptor: &RequestDescriptor) -> Result<SignedRequest> {
        if !descriptor.is_authenticated() {
            return Ok(self.strategy.unsigned(&self.api, descriptor));
        }
        self.check_auth_requirements()?;
        let ctx = SigningContext::new(self.nonce.next());
        debug!(
            exchange = self.strategy.exchange(),
            endpoint = descriptor.endpoint(),
            nonce = %ctx.nonce,
            "Signing request"
        );
        self.strategy
            .sign(&self.api, descriptor, &self.credentials, &ctx)
    }

    /// Prepares and sends `descriptor`.
    #[instrument(
        name = "api_request",
        skip(self, descriptor),
        fields(exchange = self.strategy.exchange(), endpoint = descriptor.endpoint())
    )]
    pub async fn request(&self, descriptor: &RequestDescriptor) -> Result<RawResponse> {
        let request = self.prepare(descriptor)?;
        self.transport.execute(request).await
    }

    /// Sends `descriptor` and wraps the response for `formatter`, with this
    /// exchange's repair hook attached.
    pub async fn fetch(
        &self,
        verb: Verb,
        args: Params,
        descriptor: &RequestDescriptor,
        formatter: Arc<dyn ResponseFormatter>,
    ) -> Result<ResponseEnvelope> {
        let response = self.request(descriptor).await?;
        Ok(ResponseEnvelope::new(verb, args, response, formatter)
            .with_repair(self.strategy.response_repair()))
    }
}

impl<S: SigningStrategy> fmt::Debug for ApiClient<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("strategy", &self.strategy)
            .field("api", &self.api)
            .field("credentials", &self.credentials)
            .field("last_nonce", &self.nonce.last())
            .finish_non_exhaustive()
    }
}
