//! Order book record

use serde::Serialize;

use super::{DecimalString, Timestamp};

/// One price level: `[price, size]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    /// Price
    pub price: DecimalString,
    /// Total size at this price
    pub size: DecimalString,
}

impl PriceLevel {
    /// Create a new price level
    pub fn new(price: DecimalString, size: DecimalString) -> Self {
        Self { price, size }
    }
}

/// Complete order book.
///
/// `bids` are sorted highest price first, `asks` lowest price first, whatever
/// order the exchange delivered them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBook {
    /// Bid side, best (highest) first
    pub bids: Vec<PriceLevel>,

    /// Ask side, best (lowest) first
    pub asks: Vec<PriceLevel>,

    /// Timestamp in milliseconds
    pub timestamp: Timestamp,

    /// Error message reported inside an otherwise successful response
    pub error: Option<String>,
}

impl OrderBook {
    /// Builds a book and sorts both sides best-first.
    ///
    /// Sorting is stable, so equal prices keep their feed order.
    pub fn new(mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>, timestamp: Timestamp) -> Self {
        bids.sort_by(|a, b| b.price.cmp_value(&a.price));
        asks.sort_by(|a, b| a.price.cmp_value(&b.price));
        Self {
            bids,
            asks,
            timestamp,
            error: None,
        }
    }

    /// Best bid
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Best ask
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(price: &str, size: &str) -> PriceLevel {
        PriceLevel::new(
            DecimalString::parse(price).unwrap(),
            DecimalString::parse(size).unwrap(),
        )
    }

    #[test]
    fn test_sides_sorted_best_first() {
        let book = OrderBook::new(
            vec![level("99.5", "1"), level("100", "2"), level("9.99", "3")],
            vec![level("101", "1"), level("100.25", "2"), level("1000", "3")],
            0,
        );
        let bids: Vec<_> = book.bids.iter().map(|l| l.price.as_str()).collect();
        let asks: Vec<_> = book.asks.iter().map(|l| l.price.as_str()).collect();
        assert_eq!(bids, ["100", "99.5", "9.99"]);
        assert_eq!(asks, ["100.25", "101", "1000"]);
        assert_eq!(book.best_bid().unwrap().size, "2");
        assert_eq!(book.best_ask().unwrap().size, "2");
    }

    #[test]
    fn test_empty_book() {
        let book = OrderBook::new(Vec::new(), Vec::new(), 5);
        assert!(book.best_bid().is_none());
        assert!(book.best_ask().is_none());
    }
}
