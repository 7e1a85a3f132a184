//! bitex core library
//!
//! Exchange-agnostic building blocks for talking to cryptocurrency exchange REST
//! APIs: credential resolution, nonce issuance, request descriptors, the
//! [`SigningStrategy`](signed_request::SigningStrategy) capability, an HTTP
//! transport, response envelopes and the canonical records they normalize to.
//!
//! # Features
//!
//! - **Exact numbers**: prices and sizes stay the strings the exchange sent
//! - **Replay safety**: nonces are strictly increasing per client, even across tasks
//! - **Typed errors**: input, authentication, fetch, unsupported and malformed
//!   response failures are distinct [`Error`] variants
//!
//! # Example
//!
//! ```rust
//! use bitex_core::prelude::*;
//!
//! # fn example() -> Result<()> {
//! let descriptor = RequestDescriptor::builder("testing/signature")
//!     .method(HttpMethod::Post)
//!     .param("param_1", "abc")
//!     .authenticated(true)
//!     .build(&SigningRules::DEFAULT)?;
//!
//! let nonces = NonceGenerator::new(NonceKind::Counter);
//! let ctx = SigningContext::new(nonces.next());
//! assert_eq!(ctx.nonce.to_string(), "1");
//! assert!(descriptor.is_authenticated());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]

// Re-exports of external dependencies
pub use rust_decimal;
pub use serde_json;

pub mod auth;
pub mod client;
pub mod config;
pub mod credential_store;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod exchange;
pub mod http_client;
pub mod logging;
pub mod nonce;
pub mod pair;
pub mod parser_utils;
pub mod request;
pub mod signed_request;
pub mod time;
pub mod types;

pub use client::{ApiClient, ClientConfig};
pub use credentials::{CredentialField, CredentialSet, SecretString};
pub use envelope::{ResponseEnvelope, ResponseFormatter};
pub use error::{ContextExt, Error, NetworkError, ParseError, Result};
pub use exchange::{ArcInterface, BoxedInterface, RestInterface};
pub use pair::Pair;
pub use signed_request::{SignedRequest, SigningStrategy};
pub use types::{CanonicalRecord, DecimalString, Verb};

/// Prelude module for convenient imports
///
/// ```rust
/// use bitex_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{DigestFormat, HashAlgorithm, hash, hmac_sign, jwt_sign};
    pub use crate::client::{ApiClient, ClientConfig, ClientConfigBuilder, ConfigFormat};
    pub use crate::config::{
        ApiSettings, ConfigSource, DotenvConfigSource, IniConfigSource, ProxyConfig,
    };
    pub use crate::credential_store::{CredentialFinding, CredentialStore, ExplicitCredentials};
    pub use crate::credentials::{CredentialField, CredentialSet, SecretString};
    pub use crate::envelope::{RepairFn, ResponseEnvelope, ResponseFormatter};
    pub use crate::error::{ContextExt, Error, Result};
    pub use crate::exchange::{ArcInterface, BoxedInterface, RestInterface};
    pub use crate::http_client::{HttpClient, HttpConfig, RawResponse, Transport};
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::nonce::{Nonce, NonceGenerator, NonceKind};
    pub use crate::pair::Pair;
    pub use crate::request::{HttpMethod, ParamOrdering, Params, RequestDescriptor, SigningRules};
    pub use crate::signed_request::{RequestBody, SignedRequest, SigningContext, SigningStrategy};
    pub use crate::time::{iso8601, milliseconds, parse_iso8601, seconds};
    pub use crate::types::{
        CancelledOrder, CanonicalRecord, DecimalString, OpenOrder, OpenOrders, OrderBook,
        OrderPlacement, OrderSide, OrderStatus, OrderType, PriceLevel, Ticker, Timestamp, Trade,
        Trades, Verb, Wallet,
    };
    pub use rust_decimal::Decimal;
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
