//! Identifiers used throughout Bazaar.
//!
//! Owners are raw 32-byte public keys, records are addressed by the 32-byte
//! output of [`crate::address::derive`], and ledger events carry UUIDv7 ids
//! for time-ordered sorting.

use std::fmt;

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Pubkey
// ---------------------------------------------------------------------------

/// The signing identity of a record owner or operation authority.
///
/// Raw ed25519 public key bytes. Key management lives outside the ledger;
/// the ledger only compares keys for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Pubkey(pub [u8; 32]);

impl Pubkey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<VerifyingKey> for Pubkey {
    fn from(key: VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl From<&VerifyingKey> for Pubkey {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key:{}", hex::encode(&self.0[..8]))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Pubkey {
    /// A random key, distinct from every other key with overwhelming probability.
    pub fn new_unique() -> Self {
        Self(rand::random())
    }
}

// ---------------------------------------------------------------------------
// RecordAddress
// ---------------------------------------------------------------------------

/// The address of a persisted record (user, store, request, offer, counter).
///
/// Always produced by the address deriver; never chosen by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RecordAddress(pub [u8; 32]);

impl RecordAddress {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RecordAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rec:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// EventId
// ---------------------------------------------------------------------------

/// Unique identifier of a ledger event. Uses UUIDv7 for time-ordered sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
