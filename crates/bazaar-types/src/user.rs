//! User records: one per owner key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Location, Pubkey, codec::Record};

/// Whether a user shops (posts requests) or sells (opens stores, makes offers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Buyer,
    Seller,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Seller => write!(f, "SELLER"),
        }
    }
}

/// The mutable part of a user: everything `update_user` replaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub phone: String,
    pub location: Location,
    pub account_type: AccountType,
}

/// A persisted user, addressed by `derive("USER_STATE", owner)`.
///
/// Body layout: `owner` @9, `id` @41, `account_type` @49 (u32 tag),
/// `location_enabled` @53, `location` @54 (2 × i128), then `username`,
/// `phone`, `created_at`, `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub owner: Pubkey,
    /// Position in user creation order, drawn from the User counter.
    pub id: u64,
    pub account_type: AccountType,
    /// Whether the user shares their location; on at creation.
    pub location_enabled: bool,
    pub location: Location,
    pub username: String,
    pub phone: String,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds.
    pub updated_at: i64,
}

impl User {
    /// Full replace of every mutable field.
    pub fn apply_profile(&mut self, profile: UserProfile, now: i64) {
        self.username = profile.username;
        self.phone = profile.phone;
        self.location = profile.location;
        self.account_type = profile.account_type;
        self.updated_at = now;
    }

    #[must_use]
    pub fn is_seller(&self) -> bool {
        self.account_type == AccountType::Seller
    }

    #[must_use]
    pub fn is_buyer(&self) -> bool {
        self.account_type == AccountType::Buyer
    }
}

impl Record for User {
    const DISCRIMINATOR: [u8; 8] = *b"bzr:user";
    const KIND: &'static str = "user";
}
