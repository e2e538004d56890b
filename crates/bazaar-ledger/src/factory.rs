//! Record factories: create users, stores, requests, and offers.
//!
//! Sequenced kinds follow one pattern inside the caller's transaction:
//!
//! ```text
//! validate → sequence = next_sequence(kind) → address = derive(tag, owner, sequence)
//!          → create record → emit event
//! ```
//!
//! Any failure drops the transaction, including the counter increment, so a
//! rejected create never consumes a sequence number.

use bazaar_types::{
    AccountType, BazaarError, CounterKind, LedgerConfig, LedgerEventKind, Offer, OfferParams,
    Pubkey, RecordAddress, Request, RequestParams, Result, Store, StoreParams, User, UserProfile,
    address,
};

use crate::{record_store::Transaction, sequence, validation};

/// Create the user record for `owner`.
///
/// # Errors
/// - `InvalidInput` if the profile breaks the configured limits
/// - `DuplicateUser` if `owner` already has a user
/// - `CounterNotInitialized` if the User counter is missing
pub fn create_user(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    owner: Pubkey,
    profile: UserProfile,
    now: i64,
) -> Result<RecordAddress> {
    validation::user_profile(&profile, config)?;

    let user_address = address::user_address(&owner);
    if tx.contains(&user_address) {
        return Err(BazaarError::DuplicateUser(owner));
    }

    let id = sequence::next_sequence(tx, CounterKind::User)?;
    let user = User {
        owner,
        id,
        account_type: profile.account_type,
        location_enabled: true,
        location: profile.location,
        username: profile.username,
        phone: profile.phone,
        created_at: now,
        updated_at: now,
    };
    tx.create(user_address, &user)?;
    tx.emit(LedgerEventKind::UserCreated {
        owner,
        user: user_address,
        account_type: user.account_type,
    });

    tracing::info!(
        owner = %owner,
        user = %user_address,
        id,
        account_type = %user.account_type,
        "User created"
    );
    Ok(user_address)
}

/// Create a store owned by `owner`.
pub fn create_store(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    owner: Pubkey,
    params: StoreParams,
    now: i64,
) -> Result<RecordAddress> {
    validation::store_params(&params, config)?;
    validation::require_role(tx, config, &owner, AccountType::Seller)?;

    let sequence = sequence::next_sequence(tx, CounterKind::Store)?;
    let store_address = address::store_address(&owner, sequence);
    let store = Store::new(owner, sequence, params, now);
    tx.create(store_address, &store)?;
    tx.emit(LedgerEventKind::StoreCreated {
        owner,
        store: store_address,
        sequence,
        name: store.name.clone(),
        location: store.location,
    });

    tracing::info!(
        owner = %owner,
        store = %store_address,
        sequence,
        name = %store.name,
        "Store created"
    );
    Ok(store_address)
}

/// Create a request owned by `owner`.
pub fn create_request(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    owner: Pubkey,
    params: RequestParams,
    now: i64,
) -> Result<RecordAddress> {
    validation::request_params(&params, config)?;
    validation::require_role(tx, config, &owner, AccountType::Buyer)?;

    let sequence = sequence::next_sequence(tx, CounterKind::Request)?;
    let request_address = address::request_address(&owner, sequence);
    let request = Request::new(owner, sequence, params, now);
    tx.create(request_address, &request)?;
    tx.emit(LedgerEventKind::RequestCreated {
        owner,
        request: request_address,
        sequence,
        name: request.name.clone(),
        location: request.location,
        images: request.images.clone(),
    });

    tracing::info!(
        owner = %owner,
        request = %request_address,
        sequence,
        name = %request.name,
        "Request created"
    );
    Ok(request_address)
}

/// Create an offer by `owner` against `params.request`.
///
/// Bumps the request's `offer_count` in the same transaction.
///
/// # Errors
/// - `RequestNotFound` if no request lives at `params.request`
/// - `RequestLocked` if the request already accepted an offer
pub fn create_offer(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    owner: Pubkey,
    params: OfferParams,
    now: i64,
) -> Result<RecordAddress> {
    validation::offer_params(&params, config)?;

    let request_address = params.request;
    let mut request: Request = tx
        .load(&request_address)?
        .ok_or(BazaarError::RequestNotFound(request_address))?;
    validation::require_role(tx, config, &owner, AccountType::Seller)?;
    if !request.is_open() {
        return Err(BazaarError::RequestLocked {
            request: request_address,
            lifecycle: request.lifecycle,
        });
    }

    let sequence = sequence::next_sequence(tx, CounterKind::Offer)?;
    let offer_address = address::offer_address(&owner, sequence);
    let offer = Offer::new(owner, sequence, params, now);
    tx.create(offer_address, &offer)?;

    request.offer_count += 1;
    request.updated_at = now;
    tx.update(request_address, &request)?;

    tx.emit(LedgerEventKind::OfferCreated {
        owner,
        offer: offer_address,
        request: request_address,
        sequence,
        price: offer.price,
        store_name: offer.store_name.clone(),
    });

    tracing::info!(
        owner = %owner,
        offer = %offer_address,
        request = %request_address,
        sequence,
        price = offer.price,
        "Offer created"
    );
    Ok(offer_address)
}
