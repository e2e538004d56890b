//! Request records: a buyer's want-ad that sellers make offers against.
//!
//! ## Lifecycle
//!
//! ```text
//!   ┌─────────┐  accept_offer   ┌───────────────────┐  complete   ┌───────────┐
//!   │ PENDING ├────────────────▶│ ACCEPTED_BY_BUYER ├────────────▶│ COMPLETED │
//!   └─────────┘                 └───────────────────┘             └───────────┘
//! ```
//!
//! Only a `Pending` request takes new offers or an acceptance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{BazaarError, Location, Pubkey, RecordAddress, Result, codec::Record};

/// Where a request stands in the buyer/seller handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestLifecycle {
    /// Open for offers.
    #[default]
    Pending,
    /// The buyer accepted exactly one offer; every sibling was rejected.
    AcceptedByBuyer,
    /// The buyer closed the deal. Terminal.
    Completed,
}

impl RequestLifecycle {
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::AcceptedByBuyer) | (Self::AcceptedByBuyer, Self::Completed)
        )
    }
}

impl fmt::Display for RequestLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::AcceptedByBuyer => write!(f, "ACCEPTED_BY_BUYER"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// Caller-supplied fields of a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub location: Location,
}

/// A persisted request, addressed by `derive("REQUEST_STATE", owner, sequence)`.
///
/// Body layout: `owner` @9, `sequence` @41, `lifecycle` @49 (u32 tag),
/// `accepted_offer` @53 (option tag + 32 bytes when present), then
/// `price_quote`, `offer_count`, `location` (2 × i128), `created_at`,
/// `updated_at`, `name`, `description`, `images`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub owner: Pubkey,
    pub sequence: u64,
    pub lifecycle: RequestLifecycle,
    /// The offer the buyer accepted, once `lifecycle` left `Pending`.
    pub accepted_offer: Option<RecordAddress>,
    /// Price of the accepted offer; zero until acceptance.
    pub price_quote: u64,
    /// Offers ever created against this request.
    pub offer_count: u64,
    pub location: Location,
    pub created_at: i64,
    pub updated_at: i64,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
}

impl Request {
    #[must_use]
    pub fn new(owner: Pubkey, sequence: u64, params: RequestParams, now: i64) -> Self {
        Self {
            owner,
            sequence,
            name: params.name,
            description: params.description,
            images: params.images,
            location: params.location,
            lifecycle: RequestLifecycle::Pending,
            accepted_offer: None,
            price_quote: 0,
            offer_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lifecycle == RequestLifecycle::Pending
    }

    /// Move to `target`, refusing transitions the lifecycle forbids.
    ///
    /// # Errors
    /// Returns [`BazaarError::InvalidLifecycleTransition`].
    pub fn transition(&mut self, target: RequestLifecycle, now: i64) -> Result<()> {
        if !self.lifecycle.can_transition_to(target) {
            return Err(BazaarError::InvalidLifecycleTransition {
                from: self.lifecycle,
                to: target,
            });
        }
        self.lifecycle = target;
        self.updated_at = now;
        Ok(())
    }
}

impl Record for Request {
    const DISCRIMINATOR: [u8; 8] = *b"bzr:reqs";
    const KIND: &'static str = "request";
}
