//! Ledger events.
//!
//! Every committed operation appends one or more events to the ledger's
//! event log. Events staged by an operation that fails are discarded along
//! with its record writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountType, CounterKind, EventId, Location, Pubkey, RecordAddress};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEventKind {
    CounterInitialized {
        kind: CounterKind,
        counter: RecordAddress,
    },
    UserCreated {
        owner: Pubkey,
        user: RecordAddress,
        account_type: AccountType,
    },
    UserUpdated {
        owner: Pubkey,
        user: RecordAddress,
        account_type: AccountType,
    },
    LocationEnabled {
        owner: Pubkey,
        user: RecordAddress,
        enabled: bool,
    },
    StoreCreated {
        owner: Pubkey,
        store: RecordAddress,
        sequence: u64,
        name: String,
        location: Location,
    },
    RequestCreated {
        owner: Pubkey,
        request: RecordAddress,
        sequence: u64,
        name: String,
        location: Location,
        images: Vec<String>,
    },
    RequestDeleted {
        owner: Pubkey,
        request: RecordAddress,
    },
    OfferCreated {
        owner: Pubkey,
        offer: RecordAddress,
        request: RecordAddress,
        sequence: u64,
        price: u64,
        store_name: String,
    },
    OfferAccepted {
        buyer: Pubkey,
        offer: RecordAddress,
        request: RecordAddress,
    },
    OfferRejected {
        offer: RecordAddress,
        request: RecordAddress,
    },
    RequestAccepted {
        request: RecordAddress,
        offer: RecordAddress,
        seller: Pubkey,
        price_quote: u64,
    },
    RequestCompleted {
        request: RecordAddress,
        offer: Option<RecordAddress>,
    },
}

/// A committed event with its identity and commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub id: EventId,
    pub kind: LedgerEventKind,
    pub emitted_at: DateTime<Utc>,
}

impl LedgerEvent {
    #[must_use]
    pub fn new(kind: LedgerEventKind, emitted_at: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            kind,
            emitted_at,
        }
    }
}
