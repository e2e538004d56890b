//! Input and role checks shared by factories and mutators.

use bazaar_types::{
    AccountType, BazaarError, LedgerConfig, OfferParams, Pubkey, RequestParams, Result,
    StoreParams, User, UserProfile, address,
};

use crate::record_store::Transaction;

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(BazaarError::InvalidInput {
            reason: format!("{field} is {} bytes, limit {max}", value.len()),
        });
    }
    Ok(())
}

fn check_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BazaarError::InvalidInput {
            reason: format!("{field} must not be empty"),
        });
    }
    Ok(())
}

fn check_images(images: &[String], config: &LedgerConfig) -> Result<()> {
    if images.len() > config.max_images {
        return Err(BazaarError::InvalidInput {
            reason: format!("{} images, limit {}", images.len(), config.max_images),
        });
    }
    images
        .iter()
        .try_for_each(|image| check_len("image", image, config.max_image_len))
}

pub fn user_profile(profile: &UserProfile, config: &LedgerConfig) -> Result<()> {
    check_non_empty("username", &profile.username)?;
    check_len("username", &profile.username, config.max_username_len)?;
    check_len("phone", &profile.phone, config.max_phone_len)
}

pub fn store_params(params: &StoreParams, config: &LedgerConfig) -> Result<()> {
    check_non_empty("store name", &params.name)?;
    check_len("store name", &params.name, config.max_name_len)?;
    check_len("description", &params.description, config.max_description_len)?;
    check_len("phone", &params.phone, config.max_phone_len)
}

pub fn request_params(params: &RequestParams, config: &LedgerConfig) -> Result<()> {
    check_non_empty("request name", &params.name)?;
    check_len("request name", &params.name, config.max_name_len)?;
    check_len("description", &params.description, config.max_description_len)?;
    check_images(&params.images, config)
}

pub fn offer_params(params: &OfferParams, config: &LedgerConfig) -> Result<()> {
    check_len("store name", &params.store_name, config.max_name_len)?;
    check_images(&params.images, config)
}

/// Require `owner` to hold a user record of `role`, when roles are enforced.
///
/// # Errors
/// - `UserNotFound` if `owner` has no user record
/// - `OnlySellersAllowed` / `OnlyBuyersAllowed` on a role mismatch
pub fn require_role(
    tx: &Transaction<'_>,
    config: &LedgerConfig,
    owner: &Pubkey,
    role: AccountType,
) -> Result<()> {
    if !config.enforce_account_roles {
        return Ok(());
    }
    let user: User = tx
        .load(&address::user_address(owner))?
        .ok_or(BazaarError::UserNotFound(*owner))?;
    match role {
        AccountType::Seller if !user.is_seller() => Err(BazaarError::OnlySellersAllowed),
        AccountType::Buyer if !user.is_buyer() => Err(BazaarError::OnlyBuyersAllowed),
        _ => Ok(()),
    }
}
