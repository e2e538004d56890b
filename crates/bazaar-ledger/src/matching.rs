//! Offer acceptance: the matching engine.
//!
//! A buyer accepts exactly one offer against their request. In the same
//! transaction every sibling offer (any offer whose `request_id` is that
//! request) is closed as `Rejected`:
//!
//! ```text
//! accept_offer(request, target, siblings, caller)
//!   1. load request                      → RequestNotFound
//!   2. caller == request.owner           → Unauthorized
//!   3. load target, target.request_id,   → OfferNotFound / RequestMismatch
//!      target still Pending              → AlreadyAccepted
//!      request still Pending             → RequestLocked
//!   4. load siblings; skip foreign ones
//!   5. target → Accepted, siblings → Rejected, request → AcceptedByBuyer
//!   6. return the accepted target
//! ```
//!
//! ## Sibling completeness
//!
//! The engine keeps no reverse index from requests to offers. Callers
//! discover siblings themselves (see [`crate::index`]) and must pass the
//! complete set. A sibling left out stays `Pending`; it can never be
//! accepted afterwards, because step 3 refuses any request that has left
//! `Pending`, but it is not marked `Rejected` either.

use std::collections::BTreeSet;

use bazaar_types::{
    AccountType, BazaarError, LedgerConfig, LedgerEventKind, Offer, OfferStatus, Pubkey,
    RecordAddress, Request, RequestLifecycle, Result, codec::Record,
};

use crate::{record_store::Transaction, validation};

/// Result of a successful acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acceptance {
    /// The target offer, now `Accepted`.
    pub offer: Offer,
    /// Siblings moved from `Pending` to `Rejected`, in address order.
    pub rejected: Vec<RecordAddress>,
    /// Supplied addresses that were not offers on this request.
    pub skipped: Vec<RecordAddress>,
}

/// What step 4 decided for one supplied sibling address.
enum SiblingPlan {
    Reject(Offer),
    AlreadyRejected,
    Skip,
}

/// Accept `target` against `request_address` on behalf of `caller`,
/// rejecting every pending offer in `siblings` that references the request.
///
/// All writes are staged in `tx`; the caller commits them as one batch, and
/// an error leaves nothing staged that would be committed.
///
/// # Errors
/// - `RequestNotFound` if no request lives at `request_address`
/// - `Unauthorized` if `caller` does not own the request
/// - `OnlyBuyersAllowed` if roles are enforced and `caller` is a seller
/// - `OfferNotFound` if no offer lives at `target`
/// - `RequestMismatch` if `target` answers a different request
/// - `AlreadyAccepted` if `target` (or a supplied sibling) already reached
///   `Accepted`, or `target` was already `Rejected`
/// - `RequestLocked` if the request already accepted another offer
pub fn accept_offer(
    tx: &mut Transaction<'_>,
    config: &LedgerConfig,
    caller: Pubkey,
    request_address: RecordAddress,
    target: RecordAddress,
    siblings: &[RecordAddress],
    now: i64,
) -> Result<Acceptance> {
    // 1. Request
    let mut request: Request = tx
        .load(&request_address)?
        .ok_or(BazaarError::RequestNotFound(request_address))?;

    // 2. Authority
    if caller != request.owner {
        tracing::warn!(
            request = %request_address,
            owner = %request.owner,
            caller = %caller,
            "Offer acceptance by non-owner refused"
        );
        return Err(BazaarError::Unauthorized {
            expected: request.owner,
            actual: caller,
        });
    }
    validation::require_role(tx, config, &caller, AccountType::Buyer)?;

    // 3. Target
    let mut offer: Offer = tx
        .load(&target)?
        .ok_or(BazaarError::OfferNotFound(target))?;
    if offer.request_id != request_address {
        return Err(BazaarError::RequestMismatch {
            offer: target,
            expected: request_address,
            actual: offer.request_id,
        });
    }
    if offer.status.is_terminal() {
        return Err(BazaarError::AlreadyAccepted {
            offer: target,
            status: offer.status,
        });
    }
    if request.lifecycle != RequestLifecycle::Pending {
        return Err(BazaarError::RequestLocked {
            request: request_address,
            lifecycle: request.lifecycle,
        });
    }

    // 4. Siblings, deduplicated, target excluded
    let supplied: BTreeSet<RecordAddress> = siblings
        .iter()
        .copied()
        .filter(|address| *address != target)
        .collect();
    let mut plans = Vec::with_capacity(supplied.len());
    for address in supplied {
        let plan = plan_sibling(tx, request_address, address)?;
        plans.push((address, plan));
    }

    // 5. Stage the whole batch
    let mut rejected = Vec::new();
    let mut skipped = Vec::new();
    for (address, plan) in plans {
        match plan {
            SiblingPlan::Reject(mut sibling) => {
                sibling.transition(address, OfferStatus::Rejected, now)?;
                tx.update(address, &sibling)?;
                tx.emit(LedgerEventKind::OfferRejected {
                    offer: address,
                    request: request_address,
                });
                tracing::debug!(offer = %address, request = %request_address, "Sibling offer rejected");
                rejected.push(address);
            }
            SiblingPlan::AlreadyRejected => {}
            SiblingPlan::Skip => skipped.push(address),
        }
    }

    offer.transition(target, OfferStatus::Accepted, now)?;
    tx.update(target, &offer)?;

    request.transition(RequestLifecycle::AcceptedByBuyer, now)?;
    request.accepted_offer = Some(target);
    request.price_quote = offer.price;
    tx.update(request_address, &request)?;

    tx.emit(LedgerEventKind::OfferAccepted {
        buyer: caller,
        offer: target,
        request: request_address,
    });
    tx.emit(LedgerEventKind::RequestAccepted {
        request: request_address,
        offer: target,
        seller: offer.owner,
        price_quote: offer.price,
    });

    tracing::info!(
        request = %request_address,
        offer = %target,
        seller = %offer.owner,
        price = offer.price,
        rejected = rejected.len(),
        skipped = skipped.len(),
        "Offer accepted"
    );

    // 6. Result
    Ok(Acceptance {
        offer,
        rejected,
        skipped,
    })
}

fn plan_sibling(
    tx: &Transaction<'_>,
    request_address: RecordAddress,
    address: RecordAddress,
) -> Result<SiblingPlan> {
    let Some(bytes) = tx.raw(&address) else {
        tracing::warn!(sibling = %address, "Supplied sibling does not exist, skipped");
        return Ok(SiblingPlan::Skip);
    };
    if !Offer::matches(bytes) {
        tracing::warn!(sibling = %address, "Supplied sibling is not an offer, skipped");
        return Ok(SiblingPlan::Skip);
    }
    let sibling = Offer::decode(bytes)?;
    if sibling.request_id != request_address {
        tracing::warn!(
            sibling = %address,
            request = %request_address,
            actual = %sibling.request_id,
            "Supplied sibling answers another request, skipped"
        );
        return Ok(SiblingPlan::Skip);
    }
    match sibling.status {
        OfferStatus::Pending => Ok(SiblingPlan::Reject(sibling)),
        OfferStatus::Rejected => Ok(SiblingPlan::AlreadyRejected),
        OfferStatus::Accepted => Err(BazaarError::AlreadyAccepted {
            offer: address,
            status: sibling.status,
        }),
    }
}
