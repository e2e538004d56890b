//! Versioned binary layout for persisted records.
//!
//! ```text
//!   offset 0   [u8; 8]  discriminator (one per record kind)
//!   offset 8   u8       layout version
//!   offset 9   ...      bincode body
//! ```
//!
//! The body is `bincode` with fixed-width little-endian integers: fields
//! appear in declaration order, enum variants as a `u32` tag, `Option` as a
//! one-byte tag then the value, strings and lists behind a `u64` length.
//! Each record kind declares its fixed-width fields first, so fields such as
//! an offer's `request_id` sit at a stable byte offset that external
//! indexers can compare directly.

use bincode::Options;
use serde::{Serialize, de::DeserializeOwned};

use crate::{BazaarError, Result};

/// Current layout version written into every record header.
pub const LAYOUT_VERSION: u8 = 1;

/// Bytes taken by the discriminator plus the version byte.
pub const HEADER_LEN: usize = 9;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// The body encoding of a single field, for byte-range filters.
pub fn field_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(options().serialize(value)?)
}

/// A record kind with a persisted binary layout.
pub trait Record: Serialize + DeserializeOwned {
    /// Eight bytes identifying the kind at offset 0.
    const DISCRIMINATOR: [u8; 8];

    /// Human-readable kind name for errors and logs.
    const KIND: &'static str;

    /// Full encoding: header followed by body.
    fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(128);
        bytes.extend_from_slice(&Self::DISCRIMINATOR);
        bytes.push(LAYOUT_VERSION);
        options().serialize_into(&mut bytes, self)?;
        Ok(bytes)
    }

    /// Decode a full record, rejecting foreign kinds, unknown versions,
    /// truncation, and trailing bytes.
    fn decode(bytes: &[u8]) -> Result<Self> {
        if !Self::matches(bytes) {
            return Err(BazaarError::Serialization(format!(
                "bytes do not hold a {} record",
                Self::KIND
            )));
        }
        let version = bytes[8];
        if version != LAYOUT_VERSION {
            return Err(BazaarError::Serialization(format!(
                "unsupported {} layout version {version}",
                Self::KIND
            )));
        }
        options()
            .deserialize(&bytes[HEADER_LEN..])
            .map_err(|e| BazaarError::Serialization(format!("{} record: {e}", Self::KIND)))
    }

    /// Whether `bytes` starts with this kind's header.
    fn matches(bytes: &[u8]) -> bool {
        bytes.len() >= HEADER_LEN && bytes[..8] == Self::DISCRIMINATOR
    }
}
