//! Nonce generation.
//!
//! One [`NonceGenerator`] lives in each client instance and is shared by every
//! request that instance signs. Issuance is lock-free: a compare-and-swap loop
//! on an [`AtomicU64`] guarantees strictly increasing, never-repeated values
//! under concurrent callers.
//!
//! Nonce state is per instance. Two clients built with the same key keep
//! independent counters.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// How an exchange expects its nonces to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonceKind {
    /// Integer counter starting at 1.
    #[default]
    Counter,
    /// Milliseconds since the Unix epoch, bumped past the previous value when the
    /// clock has not moved.
    Milliseconds,
}

/// A single issued nonce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    /// Wraps a raw value. Used for fixtures and exchange-supplied nonces.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing nonces.
///
/// # Example
///
/// ```rust
/// use bitex_core::nonce::{NonceGenerator, NonceKind};
///
/// let nonces = NonceGenerator::new(NonceKind::Counter);
/// assert_eq!(nonces.next().value(), 1);
/// assert_eq!(nonces.next().value(), 2);
/// ```
#[derive(Debug)]
pub struct NonceGenerator {
    kind: NonceKind,
    last: AtomicU64,
}

impl NonceGenerator {
    /// Creates a generator that has not issued anything yet.
    pub fn new(kind: NonceKind) -> Self {
        Self {
            kind,
            last: AtomicU64::new(0),
        }
    }

    /// The kind of nonce this generator issues.
    pub fn kind(&self) -> NonceKind {
        self.kind
    }

    /// Last value issued, or 0 if none.
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }

    /// Issues the next nonce.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Nonce {
        match self.kind {
            NonceKind::Counter => self.next_at(0),
            NonceKind::Milliseconds => self.next_at(now_ms()),
        }
    }

    /// Issues the next nonce given the current clock reading.
    ///
    /// The result is `max(now, last + 1)`. Counter generators pass `now = 0`.
    pub fn next_at(&self, now: u64) -> Nonce {
        let mut current = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(current.saturating_add(1));
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Nonce(candidate),
                Err(observed) => current = observed,
            }
        }
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(NonceKind::default())
    }
}

fn now_ms() -> u64 {
    u64::try_from(crate::time::milliseconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counter_starts_at_one() {
        let nonces = NonceGenerator::new(NonceKind::Counter);
        assert_eq!(nonces.last(), 0);
        assert_eq!(nonces.next(), Nonce::new(1));
        assert_eq!(nonces.next(), Nonce::new(2));
        assert_eq!(nonces.last(), 2);
    }

    #[test]
    fn test_milliseconds_tracks_clock() {
        let nonces = NonceGenerator::new(NonceKind::Milliseconds);
        let before = now_ms();
        let nonce = nonces.next().value();
        assert!(nonce >= before);
    }

    #[test]
    fn test_milliseconds_bumps_when_clock_stalls() {
        let nonces = NonceGenerator::new(NonceKind::Milliseconds);
        assert_eq!(nonces.next_at(1_000).value(), 1_000);
        assert_eq!(nonces.next_at(1_000).value(), 1_001);
        assert_eq!(nonces.next_at(999).value(), 1_002);
        assert_eq!(nonces.next_at(5_000).value(), 5_000);
    }

    #[test]
    fn test_display_is_decimal() {
        assert_eq!(Nonce::new(100).to_string(), "100");
    }

    #[test]
    fn test_concurrent_issuance_is_unique_and_ordered() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 500;

        let nonces = Arc::new(NonceGenerator::new(NonceKind::Milliseconds));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let nonces = Arc::clone(&nonces);
                thread::spawn(move || {
                    (0..PER_THREAD)
                        .map(|_| nonces.next().value())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            let issued = handle.join().unwrap();
            assert!(issued.windows(2).all(|w| w[0] < w[1]));
            all.extend(issued);
        }
        assert_eq!(all.len(), THREADS * PER_THREAD);
    }

    proptest! {
        #[test]
        fn prop_next_at_strictly_increasing(
            clock in proptest::collection::vec(0u64..10_000, 1..64)
        ) {
            let nonces = NonceGenerator::new(NonceKind::Milliseconds);
            let mut previous = 0;
            for now in clock {
                let nonce = nonces.next_at(now).value();
                prop_assert!(nonce > previous);
                prop_assert!(nonce >= now);
                previous = nonce;
            }
        }
    }
}
