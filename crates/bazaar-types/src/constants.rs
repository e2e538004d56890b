//! System-wide constants for the Bazaar ledger.

/// Address namespace tag for user records.
pub const USER_TAG: &[u8] = b"USER_STATE";

/// Address namespace tag for store records.
pub const STORE_TAG: &[u8] = b"STORE_STATE";

/// Address namespace tag for request records.
pub const REQUEST_TAG: &[u8] = b"REQUEST_STATE";

/// Address namespace tag for offer records.
pub const OFFER_TAG: &[u8] = b"OFFER_STATE";

/// Address namespace tag for sequence counter records.
pub const COUNTER_TAG: &[u8] = b"COUNTER_STATE";

/// Domain prefix hashed ahead of every derivation.
pub const ADDRESS_DOMAIN: &[u8] = b"bazaar:address:v1:";

/// Maximum number of key-material parts per derivation.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single part (and of the tag).
pub const MAX_SEED_LEN: usize = 32;

/// Decimal places of the fixed-point coordinate encoding.
pub const COORDINATE_DECIMALS: u32 = 18;

/// Default maximum username length in bytes.
pub const DEFAULT_MAX_USERNAME_LEN: usize = 32;

/// Default maximum phone number length in bytes.
pub const DEFAULT_MAX_PHONE_LEN: usize = 20;

/// Default maximum store / request / offer-store name length in bytes.
pub const DEFAULT_MAX_NAME_LEN: usize = 64;

/// Default maximum description length in bytes.
pub const DEFAULT_MAX_DESCRIPTION_LEN: usize = 512;

/// Default maximum number of images attached to a request or offer.
pub const DEFAULT_MAX_IMAGES: usize = 8;

/// Default maximum length of a single image reference in bytes.
pub const DEFAULT_MAX_IMAGE_LEN: usize = 256;

/// Default seconds an accepted request stays open before it can be completed.
pub const DEFAULT_LOCK_WINDOW_SECS: i64 = 60;
