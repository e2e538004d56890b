//! # bazaar-ledger
//!
//! The **Bazaar** marketplace ledger: buyers post requests, sellers answer
//! them with priced offers, and the buyer accepts exactly one.
//!
//! - [`RecordStore`]: encoded records by address, mutated only through a
//!   [`Transaction`] that commits or rolls back as a whole
//! - [`sequence`]: per-kind counters feeding address derivation
//! - [`factory`]: create users, stores, requests, offers
//! - [`mutator`]: owner-gated updates
//! - [`matching`]: accept one offer, reject its siblings
//! - [`index`]: sibling discovery by byte-range filters
//! - [`Ledger`]: the facade running each operation in its own transaction
//!
//! ## Operation Flow
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ init counters├──▶│ create users ├──▶│create request├──▶│ create offers│
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                                 │
//!                    ┌──────────────┐   ┌──────────────┐          │
//!                    │   complete   │◀──┤ accept offer │◀─────────┘
//!                    └──────────────┘   └──────────────┘
//! ```

pub mod factory;
pub mod index;
pub mod ledger;
pub mod matching;
pub mod mutator;
pub mod record_store;
pub mod sequence;
pub mod validation;

pub use ledger::Ledger;
pub use matching::Acceptance;
pub use record_store::{RecordStore, Transaction};
