//! Ticker record

use serde::Serialize;

use super::{DecimalString, Timestamp};

/// Ticker data structure.
///
/// Fields an exchange does not report stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticker {
    /// Best bid price
    pub bid: Option<DecimalString>,

    /// Best ask price
    pub ask: Option<DecimalString>,

    /// Highest price in 24h
    pub high: Option<DecimalString>,

    /// Lowest price in 24h
    pub low: Option<DecimalString>,

    /// Last traded price
    pub last: Option<DecimalString>,

    /// 24h volume
    pub volume: Option<DecimalString>,

    /// Timestamp in milliseconds
    pub timestamp: Timestamp,

    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

impl Ticker {
    /// Creates an empty ticker at `timestamp`.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            bid: None,
            ask: None,
            high: None,
            low: None,
            last: None,
            volume: None,
            timestamp,
            error: None,
        }
    }

    /// Ask minus bid, if both are known.
    pub fn spread(&self) -> Option<DecimalString> {
        match (&self.bid, &self.ask) {
            (Some(bid), Some(ask)) => Some((ask.as_decimal() - bid.as_decimal()).into()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_spread() {
        let mut ticker = Ticker::new(1_234_567_890);
        assert!(ticker.spread().is_none());

        ticker.bid = Some(DecimalString::parse("50000").unwrap());
        ticker.ask = Some(DecimalString::parse("50100.5").unwrap());
        assert_eq!(ticker.spread().unwrap(), "100.5");
    }
}
