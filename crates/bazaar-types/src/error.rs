//! Error types for the Bazaar ledger.
//!
//! All errors use the `BZ_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Record errors
//! - 2xx: Sequence counter errors
//! - 3xx: Authority errors
//! - 4xx: Matching errors
//! - 9xx: General / internal errors
//!
//! Every error rejects exactly one operation. None of them leaves a
//! partially applied mutation behind.

use thiserror::Error;

use crate::{CounterKind, OfferStatus, Pubkey, RecordAddress, RequestLifecycle};

/// Central error enum for all Bazaar operations.
#[derive(Debug, Error)]
pub enum BazaarError {
    // =================================================================
    // Record Errors (1xx)
    // =================================================================
    /// No user record exists for this owner.
    #[error("BZ_ERR_100: User not found for owner {0}")]
    UserNotFound(Pubkey),

    /// No store record exists at this address.
    #[error("BZ_ERR_101: Store not found: {0}")]
    StoreNotFound(RecordAddress),

    /// No request record exists at this address.
    #[error("BZ_ERR_102: Request not found: {0}")]
    RequestNotFound(RecordAddress),

    /// No offer record exists at this address.
    #[error("BZ_ERR_103: Offer not found: {0}")]
    OfferNotFound(RecordAddress),

    /// The owner already has a user record.
    #[error("BZ_ERR_104: User already exists for owner {0}")]
    DuplicateUser(Pubkey),

    /// A record already occupies the derived address.
    #[error("BZ_ERR_105: Address already in use: {0}")]
    AddressInUse(RecordAddress),

    /// An input field failed validation (length limits, empty names, etc.).
    #[error("BZ_ERR_106: Invalid input: {reason}")]
    InvalidInput { reason: String },

    // =================================================================
    // Sequence Counter Errors (2xx)
    // =================================================================
    /// The counter for this kind has already been created.
    #[error("BZ_ERR_200: Counter already initialized: {0}")]
    AlreadyInitialized(CounterKind),

    /// The counter for this kind has not been created yet.
    #[error("BZ_ERR_201: Counter not initialized: {0}")]
    CounterNotInitialized(CounterKind),

    /// The counter reached `u64::MAX`.
    #[error("BZ_ERR_202: Sequence space exhausted for {0}")]
    SequenceExhausted(CounterKind),

    // =================================================================
    // Authority Errors (3xx)
    // =================================================================
    /// The operation's signer is not the required authority.
    #[error("BZ_ERR_300: Unauthorized: expected {expected}, got {actual}")]
    Unauthorized { expected: Pubkey, actual: Pubkey },

    /// Only seller accounts may perform this operation.
    #[error("BZ_ERR_301: Only sellers allowed")]
    OnlySellersAllowed,

    /// Only buyer accounts may perform this operation.
    #[error("BZ_ERR_302: Only buyers allowed")]
    OnlyBuyersAllowed,

    // =================================================================
    // Matching Errors (4xx)
    // =================================================================
    /// The offer does not reference the request it was accepted against.
    #[error("BZ_ERR_400: Offer {offer} references request {actual}, not {expected}")]
    RequestMismatch {
        offer: RecordAddress,
        expected: RecordAddress,
        actual: RecordAddress,
    },

    /// The offer already reached a terminal state.
    #[error("BZ_ERR_401: Offer {offer} already closed ({status})")]
    AlreadyAccepted {
        offer: RecordAddress,
        status: OfferStatus,
    },

    /// The request no longer takes offers or acceptances.
    #[error("BZ_ERR_402: Request {request} is locked ({lifecycle})")]
    RequestLocked {
        request: RecordAddress,
        lifecycle: RequestLifecycle,
    },

    /// A request lifecycle transition that the state machine forbids.
    #[error("BZ_ERR_403: Invalid request transition: {from} -> {to}")]
    InvalidLifecycleTransition {
        from: RequestLifecycle,
        to: RequestLifecycle,
    },

    /// The accepted request is still inside its lock window.
    #[error("BZ_ERR_404: Request {request} cannot complete before {unlocks_at}")]
    RequestNotLocked {
        request: RecordAddress,
        unlocks_at: i64,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("BZ_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Record encoding / decoding error.
    #[error("BZ_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad limits, etc.).
    #[error("BZ_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BazaarError>;

impl From<serde_json::Error> for BazaarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<bincode::Error> for BazaarError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
