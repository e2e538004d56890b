//! Offer records: a seller's priced answer to a request.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  accept_offer (target)   ┌──────────┐
//!   │ PENDING ├─────────────────────────▶│ ACCEPTED │
//!   └────┬────┘                          └──────────┘
//!        │ accept_offer (sibling)
//!        ▼
//!   ┌──────────┐
//!   │ REJECTED │
//!   └──────────┘
//! ```
//!
//! Both terminal states are irreversible. Only the matching engine moves an
//! offer out of `Pending`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    BazaarError, Pubkey, RecordAddress, Result,
    codec::{HEADER_LEN, Record},
};

/// Byte offset of `request_id` in an encoded offer.
///
/// Sibling discovery filters offers by comparing the 32 bytes at this offset
/// against a request address, without decoding the record.
pub const OFFER_REQUEST_ID_OFFSET: usize = HEADER_LEN + 32 + 8;

/// Byte offset of the `status` variant tag (`u32` little-endian) in an
/// encoded offer.
pub const OFFER_STATUS_OFFSET: usize = OFFER_REQUEST_ID_OFFSET + 32;

/// Lifecycle of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OfferStatus {
    /// Eligible for acceptance.
    #[default]
    Pending,
    /// Chosen by the buyer. Terminal.
    Accepted,
    /// Closed because a sibling was accepted. Terminal.
    Rejected,
}

impl OfferStatus {
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Accepted | Self::Rejected))
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Caller-supplied fields of a new offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferParams {
    pub price: u64,
    pub images: Vec<String>,
    pub store_name: String,
    /// The request this offer answers.
    pub request: RecordAddress,
}

/// A persisted offer, addressed by `derive("OFFER_STATE", owner, sequence)`.
///
/// Field order is the body layout; `request_id` and `status` must stay at
/// [`OFFER_REQUEST_ID_OFFSET`] and [`OFFER_STATUS_OFFSET`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub owner: Pubkey,
    pub sequence: u64,
    /// Back-reference to the targeted request. Does not own it.
    pub request_id: RecordAddress,
    pub status: OfferStatus,
    pub price: u64,
    pub created_at: i64,
    pub updated_at: i64,
    pub store_name: String,
    pub images: Vec<String>,
}

impl Offer {
    #[must_use]
    pub fn new(owner: Pubkey, sequence: u64, params: OfferParams, now: i64) -> Self {
        Self {
            owner,
            sequence,
            request_id: params.request,
            status: OfferStatus::Pending,
            price: params.price,
            store_name: params.store_name,
            images: params.images,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == OfferStatus::Accepted
    }

    /// Close the offer at `address` into `target`.
    ///
    /// # Errors
    /// Returns [`BazaarError::AlreadyAccepted`] if the offer already reached
    /// a terminal state.
    pub fn transition(
        &mut self,
        address: RecordAddress,
        target: OfferStatus,
        now: i64,
    ) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(BazaarError::AlreadyAccepted {
                offer: address,
                status: self.status,
            });
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}

impl Record for Offer {
    const DISCRIMINATOR: [u8; 8] = *b"bzr:offr";
    const KIND: &'static str = "offer";
}
