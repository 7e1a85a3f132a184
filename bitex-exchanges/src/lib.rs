//! bitex exchange implementations
//!
//! One signing strategy per supported exchange, plus response formatters and
//! [`RestInterface`](bitex_core::exchange::RestInterface) facades for the
//! exchanges with a normalized verb set.
//!
//! # Supported Exchanges
//!
//! | Exchange | Signing | Facade |
//! |---|---|---|
//! | Bitstamp, Coinone, Cryptopia, Gate.io, HitBTC, OKEx | ✅ | ✅ |
//! | Bitfinex, Bithumb, Bittrex, C-CEX, Coincheck, Exmo, GDAX, Gemini | ✅ | |
//! | itBit, Kraken, OKCoin, Poloniex, QuadrigaCX, Quoine, The Rock Trading, Vaultoro | ✅ | |
//!
//! # Example
//!
//! ```rust,no_run
//! use bitex_core::client::ClientConfig;
//! use bitex_core::exchange::RestInterface;
//! use bitex_exchanges::bitstamp::Bitstamp;
//!
//! # async fn example() -> bitex_core::Result<()> {
//! let config = ClientConfig::builder().build();
//! let bitstamp = Bitstamp::new(&config)?;
//! let ticker = bitstamp.ticker(&"BTC/USD".parse()?).await?;
//! println!("last: {:?}", ticker.last);
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
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::unused_self)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unnecessary_literal_bound)]

pub mod bitfinex;
pub mod bithumb;
pub mod bitstamp;
pub mod bittrex;
pub mod ccex;
pub mod coincheck;
pub mod coinone;
pub mod cryptopia;
pub mod exmo;
pub mod gateio;
pub mod gdax;
pub mod gemini;
pub mod hitbtc;
pub mod itbit;
pub mod kraken;
pub mod okcoin;
pub mod okex;
pub mod poloniex;
pub mod quadrigacx;
pub mod quoine;
pub mod rocktrading;
pub mod vaultoro;

mod listing;
mod signer;

#[cfg(test)]
pub(crate) mod fixture;

pub use signer::Signer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::Signer;
    pub use crate::bitstamp::{Bitstamp, BitstampFormatter, BitstampSigner};
    pub use crate::coinone::{Coinone, CoinoneFormatter, CoinoneSigner};
    pub use crate::cryptopia::{Cryptopia, CryptopiaFormatter, CryptopiaSigner};
    pub use crate::gateio::{Gateio, GateioFormatter, GateioSigner};
    pub use crate::hitbtc::{HitBtc, HitBtcFormatter, HitBtcSigner};
    pub use crate::okex::{Okex, OkexFormatter, OkexSigner};
}
