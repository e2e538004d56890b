//! Sequence counters: one per sequenced record kind.
//!
//! A counter's `current` value is the next sequence number to hand out.
//! It only ever moves forward by one, and it is the sole source of sequence
//! numbers for its kind, so the issued set is always `0..current`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BazaarError, Result, codec::Record};

/// The record kinds that draw sequence numbers from a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum CounterKind {
    User,
    Store,
    Request,
    Offer,
}

impl CounterKind {
    /// Every counter kind, in initialization order.
    pub const ALL: [Self; 4] = [Self::User, Self::Store, Self::Request, Self::Offer];

    /// Derivation part naming this counter.
    #[must_use]
    pub fn seed(self) -> &'static [u8] {
        match self {
            Self::User => b"user",
            Self::Store => b"store",
            Self::Request => b"request",
            Self::Offer => b"offer",
        }
    }
}

impl fmt::Display for CounterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Store => write!(f, "STORE"),
            Self::Request => write!(f, "REQUEST"),
            Self::Offer => write!(f, "OFFER"),
        }
    }
}

/// A persisted sequence counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounter {
    pub kind: CounterKind,
    /// Next sequence number to allocate; also the count of numbers issued.
    pub current: u64,
}

impl SequenceCounter {
    #[must_use]
    pub fn new(kind: CounterKind) -> Self {
        Self { kind, current: 0 }
    }

    /// Hand out `current` and advance by one.
    ///
    /// # Errors
    /// Returns [`BazaarError::SequenceExhausted`] instead of wrapping.
    pub fn allocate(&mut self) -> Result<u64> {
        let sequence = self.current;
        self.current = sequence
            .checked_add(1)
            .ok_or(BazaarError::SequenceExhausted(self.kind))?;
        Ok(sequence)
    }
}

/// Body layout: `kind` @9 (u32 tag), `current` @13.
impl Record for SequenceCounter {
    const DISCRIMINATOR: [u8; 8] = *b"bzr:cntr";
    const KIND: &'static str = "counter";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_is_dense() {
        let mut counter = SequenceCounter::new(CounterKind::Store);
        let issued: Vec<u64> = (0..5).map(|_| counter.allocate().unwrap()).collect();
        assert_eq!(issued, vec![0, 1, 2, 3, 4]);
        assert_eq!(counter.current, 5);
    }

    #[test]
    fn allocate_refuses_to_wrap() {
        let mut counter = SequenceCounter {
            kind: CounterKind::Offer,
            current: u64::MAX,
        };
        let err = counter.allocate().unwrap_err();
        assert!(matches!(err, BazaarError::SequenceExhausted(CounterKind::Offer)));
        assert_eq!(counter.current, u64::MAX);
    }

    #[test]
    fn encoded_counter_is_fixed_width() {
        let counter = SequenceCounter {
            kind: CounterKind::Request,
            current: 42,
        };
        let bytes = counter.encode().unwrap();
        assert_eq!(bytes.len(), crate::codec::HEADER_LEN + 4 + 8);
        assert_eq!(&bytes[9..13], &[2, 0, 0, 0]);
        assert_eq!(SequenceCounter::decode(&bytes).unwrap(), counter);
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", CounterKind::Request), "REQUEST");
    }
}
