//! Deterministic record addressing.
//!
//! Every record lives at `derive(tag, parts)`: a SHA-256 over a versioned
//! domain prefix, the length-prefixed namespace tag, and each length-prefixed
//! part. The tag separates kinds; the length prefixes keep part boundaries
//! unambiguous, so distinct `(tag, parts)` inputs never share a preimage.
//!
//! Sequence numbers enter as fixed-width 8-byte little-endian parts.
//! Derivation holds no state, so callers (and tests) can predict any
//! record's address without touching the ledger.

use sha2::{Digest, Sha256};

use crate::{CounterKind, Pubkey, RecordAddress, constants};

/// Derive the address for `tag` and the ordered key-material `parts`.
///
/// Total for inputs within the seed limits: at most
/// [`constants::MAX_SEEDS`] parts, each (and the tag) at most
/// [`constants::MAX_SEED_LEN`] bytes. Staying inside those limits is the
/// caller's responsibility.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn derive(tag: &[u8], parts: &[&[u8]]) -> RecordAddress {
    debug_assert!(tag.len() <= constants::MAX_SEED_LEN, "tag exceeds seed limit");
    debug_assert!(parts.len() <= constants::MAX_SEEDS, "too many seed parts");

    let mut hasher = Sha256::new();
    hasher.update(constants::ADDRESS_DOMAIN);
    hasher.update([tag.len() as u8]);
    hasher.update(tag);
    for part in parts {
        debug_assert!(part.len() <= constants::MAX_SEED_LEN, "seed part too long");
        hasher.update([part.len() as u8]);
        hasher.update(part);
    }
    let digest = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&digest);
    RecordAddress(address)
}

/// Fixed-width encoding of a sequence number for use as a derivation part.
#[must_use]
pub fn sequence_seed(sequence: u64) -> [u8; 8] {
    sequence.to_le_bytes()
}

/// `derive("USER_STATE", owner)`: one user per owner key.
#[must_use]
pub fn user_address(owner: &Pubkey) -> RecordAddress {
    derive(constants::USER_TAG, &[owner.as_bytes()])
}

/// `derive("STORE_STATE", owner, sequence)`.
#[must_use]
pub fn store_address(owner: &Pubkey, sequence: u64) -> RecordAddress {
    derive(constants::STORE_TAG, &[owner.as_bytes(), &sequence_seed(sequence)])
}

/// `derive("REQUEST_STATE", owner, sequence)`.
#[must_use]
pub fn request_address(owner: &Pubkey, sequence: u64) -> RecordAddress {
    derive(constants::REQUEST_TAG, &[owner.as_bytes(), &sequence_seed(sequence)])
}

/// `derive("OFFER_STATE", owner, sequence)`.
#[must_use]
pub fn offer_address(owner: &Pubkey, sequence: u64) -> RecordAddress {
    derive(constants::OFFER_TAG, &[owner.as_bytes(), &sequence_seed(sequence)])
}

/// `derive("COUNTER_STATE", kind)`: the singleton counter of one kind.
#[must_use]
pub fn counter_address(kind: CounterKind) -> RecordAddress {
    derive(constants::COUNTER_TAG, &[kind.seed()])
}
