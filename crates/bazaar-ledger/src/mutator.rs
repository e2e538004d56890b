//! Owner-gated in-place updates.

use bazaar_types::{
    BazaarError, LedgerConfig, LedgerEventKind, Pubkey, RecordAddress, Request, RequestLifecycle,
    Result, User, UserProfile, address,
};

use crate::{record_store::Transaction, validation};

/// Replace every mutable field of `owner`'s user record.
///
/// # Errors
/// - `UserNotFound` if `owner` has no user record
/// - `Unauthorized` if `authority` is not `owner`
/// - `InvalidInput` if the new profile breaks the configured limits
pub fn update_user(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    authority: Pubkey,
    owner: Pubkey,
    profile: UserProfile,
    now: i64,
) -> Result<()> {
    let user_address = address::user_address(&owner);
    let mut user: User = tx
        .load(&user_address)?
        .ok_or(BazaarError::UserNotFound(owner))?;

    if authority != user.owner {
        tracing::warn!(
            user = %user_address,
            owner = %user.owner,
            authority = %authority,
            "User update by non-owner refused"
        );
        return Err(BazaarError::Unauthorized {
            expected: user.owner,
            actual: authority,
        });
    }
    validation::user_profile(&profile, config)?;

    user.apply_profile(profile, now);
    tx.update(user_address, &user)?;
    tx.emit(LedgerEventKind::UserUpdated {
        owner,
        user: user_address,
        account_type: user.account_type,
    });

    tracing::info!(owner = %owner, user = %user_address, "User updated");
    Ok(())
}

/// Turn location sharing on or off for `owner`'s user record.
///
/// # Errors
/// - `UserNotFound` if `owner` has no user record
/// - `Unauthorized` if `authority` is not `owner`
pub fn toggle_location(
    tx: &mut Transaction<'_>,
    authority: Pubkey,
    owner: Pubkey,
    enabled: bool,
    now: i64,
) -> Result<()> {
    let user_address = address::user_address(&owner);
    let mut user: User = tx
        .load(&user_address)?
        .ok_or(BazaarError::UserNotFound(owner))?;
    if authority != user.owner {
        return Err(BazaarError::Unauthorized {
            expected: user.owner,
            actual: authority,
        });
    }

    user.location_enabled = enabled;
    user.updated_at = now;
    tx.update(user_address, &user)?;
    tx.emit(LedgerEventKind::LocationEnabled {
        owner,
        user: user_address,
        enabled,
    });

    tracing::info!(owner = %owner, enabled, "Location preference set");
    Ok(())
}

/// Withdraw a request that has not been accepted.
///
/// Offers already made against it stay on the ledger; they can no longer
/// be accepted because the request is gone.
///
/// # Errors
/// - `RequestNotFound` if absent
/// - `Unauthorized` if `authority` is not the request's owner
/// - `RequestLocked` once the request left `Pending`
pub fn delete_request(
    tx: &mut Transaction<'_>,
    authority: Pubkey,
    request_address: RecordAddress,
) -> Result<()> {
    let request: Request = tx
        .load(&request_address)?
        .ok_or(BazaarError::RequestNotFound(request_address))?;
    if authority != request.owner {
        return Err(BazaarError::Unauthorized {
            expected: request.owner,
            actual: authority,
        });
    }
    if !request.is_open() {
        return Err(BazaarError::RequestLocked {
            request: request_address,
            lifecycle: request.lifecycle,
        });
    }

    tx.delete::<Request>(request_address)?;
    tx.emit(LedgerEventKind::RequestDeleted {
        owner: request.owner,
        request: request_address,
    });

    tracing::info!(request = %request_address, offers = request.offer_count, "Request deleted");
    Ok(())
}

/// Close out an accepted request: `AcceptedByBuyer → Completed`.
///
/// The request must have sat in `AcceptedByBuyer` for at least
/// `config.lock_window_secs`.
///
/// # Errors
/// - `RequestNotFound` if absent
/// - `Unauthorized` if `authority` is not the request's owner
/// - `InvalidLifecycleTransition` unless the request is `AcceptedByBuyer`
/// - `RequestNotLocked` while the lock window is still open
pub fn complete_request(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    authority: Pubkey,
    request_address: RecordAddress,
    now: i64,
) -> Result<()> {
    let mut request: Request = tx
        .load(&request_address)?
        .ok_or(BazaarError::RequestNotFound(request_address))?;
    if authority != request.owner {
        return Err(BazaarError::Unauthorized {
            expected: request.owner,
            actual: authority,
        });
    }
    if request.lifecycle == RequestLifecycle::AcceptedByBuyer {
        let unlocks_at = request.updated_at.saturating_add(config.lock_window_secs);
        if now < unlocks_at {
            return Err(BazaarError::RequestNotLocked {
                request: request_address,
                unlocks_at,
            });
        }
    }

    request.transition(RequestLifecycle::Completed, now)?;
    tx.update(request_address, &request)?;
    tx.emit(LedgerEventKind::RequestCompleted {
        request: request_address,
        offer: request.accepted_offer,
    });

    tracing::info!(request = %request_address, "Request completed");
    Ok(())
}
