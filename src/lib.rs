//! # bitex
//!
//! One REST client core for many cryptocurrency exchanges. Each exchange
//! supplies a signing strategy, and the six with a normalized verb set also
//! supply a response formatter and an interface facade; everything else
//! (credentials, nonces, request descriptors, transport, response envelopes)
//! is shared.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bitex::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> bitex::Result<()> {
//!     let config = ClientConfig::builder()
//!         .config_file("bitstamp.ini")
//!         .build();
//!     let bitstamp = Bitstamp::new(&config)?;
//!
//!     let book = bitstamp.order_book(&"BTC/USD".parse()?).await?;
//!     println!("best bid: {:?}", book.best_bid());
//!
//!     let wallet = bitstamp.wallet().await?;
//!     println!("USD available: {:?}", wallet.get("USD"));
//!     Ok(())
//! }
//! ```
//!
//! Signing without a facade goes through [`Signer`] and [`ApiClient`]:
//!
//! ```rust,no_run
//! use bitex::prelude::*;
//!
//! # async fn example() -> bitex::Result<()> {
//! let signer: Signer = "kraken".parse()?;
//! let client = ApiClient::new(signer, &ClientConfig::builder().key("k").secret("s").build())?;
//! let descriptor = client
//!     .descriptor("private/Balance")
//!     .method(HttpMethod::Post)
//!     .authenticated(true)
//!     .build(&client.rules())?;
//! let raw = client.request(&descriptor).await?;
//! println!("{}", String::from_utf8_lossy(&raw.body));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub use bitex_core::{
    ApiClient, ClientConfig, DecimalString, Error, Pair, RestInterface, Result, Verb,
};
pub use bitex_exchanges::Signer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use bitex_core::prelude::*;
    pub use bitex_exchanges::prelude::*;
}
