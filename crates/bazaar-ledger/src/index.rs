//! Sibling discovery by byte-range filters over encoded offers.
//!
//! Nothing on the ledger links a request to its offers. Callers building an
//! `accept_offer` call find the siblings here, comparing the fixed
//! `request_id` and `status` ranges of each encoded offer without decoding
//! it.

use bazaar_types::{
    Offer, OfferStatus, RecordAddress, Result,
    codec::{Record, field_bytes},
    offer::{OFFER_REQUEST_ID_OFFSET, OFFER_STATUS_OFFSET},
};

use crate::record_store::{RecordStore, Transaction};

fn answers(bytes: &[u8], request: &RecordAddress) -> bool {
    Offer::matches(bytes)
        && bytes
            .get(OFFER_REQUEST_ID_OFFSET..OFFER_REQUEST_ID_OFFSET + 32)
            .is_some_and(|id| id == request.as_bytes())
}

/// Every committed offer that answers `request`, in address order.
pub fn offers_for_request(store: &RecordStore, request: &RecordAddress) -> Result<Vec<RecordAddress>> {
    store.scan(|bytes| answers(bytes, request))
}

/// Every offer on `request` as seen inside `tx`, staged writes included.
pub fn offers_in(tx: &Transaction<'_>, request: &RecordAddress) -> Vec<RecordAddress> {
    tx.scan(|bytes| answers(bytes, request))
}

/// Committed offers on `request` that are still `Pending`.
pub fn pending_offers_for_request(
    store: &RecordStore,
    request: &RecordAddress,
) -> Result<Vec<RecordAddress>> {
    let pending = field_bytes(&OfferStatus::Pending)?;
    let status = OFFER_STATUS_OFFSET..OFFER_STATUS_OFFSET + pending.len();
    store.scan(|bytes| {
        answers(bytes, request) && bytes.get(status.clone()) == Some(pending.as_slice())
    })
}

#[cfg(test)]
mod tests {
    use bazaar_types::{OfferParams, Pubkey};

    use super::*;

    fn put(store: &RecordStore, at: u8, request: RecordAddress, status: OfferStatus) -> RecordAddress {
        let address = RecordAddress([at; 32]);
        let mut offer = Offer::new(
            Pubkey([at; 32]),
            u64::from(at),
            OfferParams {
                price: 5,
                images: vec![],
                store_name: "s".into(),
                request,
            },
            0,
        );
        offer.status = status;
        let mut tx = store.begin().unwrap();
        tx.create(address, &offer).unwrap();
        tx.commit();
        address
    }

    #[test]
    fn filters_by_request_and_status() {
        let store = RecordStore::new();
        let request = RecordAddress([0xAA; 32]);
        let other = RecordAddress([0xBB; 32]);
        let a = put(&store, 1, request, OfferStatus::Pending);
        let b = put(&store, 2, request, OfferStatus::Rejected);
        put(&store, 3, other, OfferStatus::Pending);

        assert_eq!(offers_for_request(&store, &request).unwrap(), vec![a, b]);
        assert_eq!(pending_offers_for_request(&store, &request).unwrap(), vec![a]);
        assert!(offers_for_request(&store, &RecordAddress([0xCC; 32])).unwrap().is_empty());
    }

    #[test]
    fn transaction_view_includes_staged_offers() {
        let store = RecordStore::new();
        let request = RecordAddress([0xAA; 32]);
        let committed = put(&store, 1, request, OfferStatus::Pending);

        let mut tx = store.begin().unwrap();
        let staged = RecordAddress([9; 32]);
        let offer = Offer::new(
            Pubkey([9; 32]),
            9,
            OfferParams {
                price: 1,
                images: vec![],
                store_name: "s".into(),
                request,
            },
            0,
        );
        tx.create(staged, &offer).unwrap();
        assert_eq!(offers_in(&tx, &request), vec![committed, staged]);
    }
}
