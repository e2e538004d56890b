//! Integration test: concurrent operations against one ledger
//!
//! Every operation holds the store's write guard from first read to commit,
//! so racing allocations on one counter must yield a dense, repeat-free
//! run of sequence numbers.

use std::{collections::BTreeSet, sync::Arc, thread};

use bazaar_ledger::Ledger;
use bazaar_types::*;

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

fn seller_ledger() -> (Arc<Ledger>, Pubkey) {
    let ledger = Ledger::with_defaults();
    ledger.initialize_counters().unwrap();
    let seller = Pubkey::new_unique();
    ledger
        .create_user(
            seller,
            UserProfile {
                username: "seller".into(),
                phone: String::new(),
                location: Location::default(),
                account_type: AccountType::Seller,
            },
        )
        .unwrap();
    (Arc::new(ledger), seller)
}

fn store_params(n: usize) -> StoreParams {
    StoreParams {
        name: format!("Store {n}"),
        description: String::new(),
        phone: String::new(),
        location: Location::default(),
    }
}

#[test]
fn concurrent_create_store_yields_dense_sequences() {
    let (ledger, seller) = seller_ledger();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let ledger = Arc::clone(&ledger);
            thread::spawn(move || {
                (0..PER_THREAD)
                    .map(|i| ledger.create_store(seller, store_params(t * PER_THREAD + i)).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let addresses: Vec<RecordAddress> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let total = THREADS * PER_THREAD;
    assert_eq!(addresses.len(), total);

    let sequences: BTreeSet<u64> = addresses
        .iter()
        .map(|a| ledger.fetch_store(a).unwrap().sequence)
        .collect();
    let expected: BTreeSet<u64> = (0..total as u64).collect();
    assert_eq!(sequences, expected, "sequences must be exactly 0..N-1");

    for addr in &addresses {
        let store = ledger.fetch_store(addr).unwrap();
        assert_eq!(*addr, address::store_address(&seller, store.sequence));
    }
    assert_eq!(
        ledger.fetch_counter(CounterKind::Store).unwrap().current,
        total as u64
    );
}

#[test]
fn racing_acceptances_pick_exactly_one_winner() {
    let (ledger, seller) = seller_ledger();
    let buyer = Pubkey::new_unique();
    ledger
        .create_user(
            buyer,
            UserProfile {
                username: "buyer".into(),
                phone: String::new(),
                location: Location::default(),
                account_type: AccountType::Buyer,
            },
        )
        .unwrap();
    let request = ledger
        .create_request(
            buyer,
            RequestParams {
                name: "Sofa".into(),
                description: String::new(),
                images: vec![],
                location: Location::default(),
            },
        )
        .unwrap();
    let offers: Vec<RecordAddress> = (0..THREADS as u64)
        .map(|price| {
            ledger
                .create_offer(
                    seller,
                    OfferParams {
                        price: price + 1,
                        images: vec![],
                        store_name: "Store".into(),
                        request,
                    },
                )
                .unwrap()
        })
        .collect();

    let outcomes: Vec<bool> = thread::scope(|s| {
        let handles: Vec<_> = offers
            .iter()
            .map(|target| {
                let ledger = &ledger;
                let offers = &offers;
                s.spawn(move || {
                    let siblings: Vec<_> = offers.iter().copied().filter(|o| o != target).collect();
                    ledger.accept_offer(buyer, request, *target, &siblings).is_ok()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|won| **won).count(), 1);
    let accepted: Vec<_> = offers
        .iter()
        .filter(|o| ledger.fetch_offer(o).unwrap().is_accepted())
        .collect();
    assert_eq!(accepted.len(), 1);
    let rejected = offers
        .iter()
        .filter(|o| ledger.fetch_offer(o).unwrap().status == OfferStatus::Rejected)
        .count();
    assert_eq!(rejected, THREADS - 1);
}
