//! # bazaar-types
//!
//! Shared types, addressing, and binary layouts for the **Bazaar**
//! marketplace ledger.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`Pubkey`], [`RecordAddress`], [`EventId`]
//! - **Addressing**: [`address::derive`] and the per-kind helpers
//! - **Records**: [`User`], [`Store`], [`Request`], [`Offer`], [`SequenceCounter`]
//! - **State machines**: [`OfferStatus`], [`RequestLifecycle`]
//! - **Binary layout**: [`codec::Record`], a versioned header over a `bincode` body
//! - **Events**: [`LedgerEvent`], [`LedgerEventKind`]
//! - **Configuration**: [`LedgerConfig`]
//! - **Errors**: [`BazaarError`] with `BZ_ERR_` prefix codes
//! - **Constants**: namespace tags, seed limits, default input limits

pub mod address;
pub mod codec;
pub mod config;
pub mod constants;
pub mod counter;
pub mod error;
pub mod event;
pub mod ids;
pub mod location;
pub mod offer;
pub mod request;
pub mod store;
pub mod user;

// Re-export all primary types at crate root for ergonomic imports:
//   use bazaar_types::{Offer, OfferStatus, Request, Pubkey, ...};

pub use codec::Record;
pub use config::*;
pub use counter::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use location::*;
pub use offer::*;
pub use request::*;
pub use store::*;
pub use user::*;

// Addressing helpers are accessed via `bazaar_types::address::store_address`
// and constants via `bazaar_types::constants::FOO` (not re-exported).
