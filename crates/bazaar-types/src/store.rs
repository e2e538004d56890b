//! Store records: a seller's shop front.

use serde::{Deserialize, Serialize};

use crate::{Location, Pubkey, codec::Record};

/// Caller-supplied fields of a new store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreParams {
    pub name: String,
    pub description: String,
    pub phone: String,
    pub location: Location,
}

/// A persisted store, addressed by `derive("STORE_STATE", owner, sequence)`.
/// Immutable once created.
///
/// Body layout: `owner` @9, `sequence` @41, `location` @49 (2 × i128),
/// `created_at` @81, then `name`, `description`, `phone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub owner: Pubkey,
    pub sequence: u64,
    pub location: Location,
    pub created_at: i64,
    pub name: String,
    pub description: String,
    pub phone: String,
}

impl Store {
    #[must_use]
    pub fn new(owner: Pubkey, sequence: u64, params: StoreParams, now: i64) -> Self {
        Self {
            owner,
            sequence,
            name: params.name,
            description: params.description,
            phone: params.phone,
            location: params.location,
            created_at: now,
        }
    }
}

impl Record for Store {
    const DISCRIMINATOR: [u8; 8] = *b"bzr:stor";
    const KIND: &'static str = "store";
}
