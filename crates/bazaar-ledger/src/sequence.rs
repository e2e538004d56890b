//! Sequence counter operations.
//!
//! Counters are ordinary records at `derive("COUNTER_STATE", kind)`. The
//! read-increment in [`next_sequence`] runs inside the caller's transaction,
//! which holds the store's write guard, so two allocations against the same
//! counter can never observe the same `current`. The increment commits or
//! rolls back together with the record that consumed the number.

use bazaar_types::{
    BazaarError, CounterKind, LedgerEventKind, RecordAddress, Result, SequenceCounter, address,
};

use crate::record_store::Transaction;

/// Create the counter for `kind` with `current = 0`.
///
/// # Errors
/// Returns [`BazaarError::AlreadyInitialized`] if it already exists.
pub fn initialize(tx: &mut Transaction<'_>, kind: CounterKind) -> Result<RecordAddress> {
    let counter_address = address::counter_address(kind);
    if tx.contains(&counter_address) {
        return Err(BazaarError::AlreadyInitialized(kind));
    }
    tx.create(counter_address, &SequenceCounter::new(kind))?;
    tx.emit(LedgerEventKind::CounterInitialized {
        kind,
        counter: counter_address,
    });
    tracing::info!(%kind, counter = %counter_address, "Sequence counter initialized");
    Ok(counter_address)
}

/// Allocate the next sequence number of `kind`: returns `current`, then
/// advances the counter by one.
///
/// # Errors
/// - `CounterNotInitialized` if the counter was never created
/// - `SequenceExhausted` if the counter is at `u64::MAX`
pub fn next_sequence(tx: &mut Transaction<'_>, kind: CounterKind) -> Result<u64> {
    let counter_address = address::counter_address(kind);
    let mut counter: SequenceCounter = tx
        .load(&counter_address)?
        .ok_or(BazaarError::CounterNotInitialized(kind))?;
    let sequence = counter.allocate()?;
    tx.update(counter_address, &counter)?;
    tracing::debug!(%kind, sequence, "Sequence allocated");
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::RecordStore;

    #[test]
    fn initialize_then_allocate() {
        let store = RecordStore::new();
        let mut tx = store.begin().unwrap();
        let addr = initialize(&mut tx, CounterKind::Store).unwrap();
        assert_eq!(addr, address::counter_address(CounterKind::Store));
        assert_eq!(next_sequence(&mut tx, CounterKind::Store).unwrap(), 0);
        assert_eq!(next_sequence(&mut tx, CounterKind::Store).unwrap(), 1);
        tx.commit();

        let counter: SequenceCounter = store.load(&addr).unwrap().unwrap();
        assert_eq!(counter.current, 2);
    }

    #[test]
    fn double_initialize_fails() {
        let store = RecordStore::new();
        let mut tx = store.begin().unwrap();
        initialize(&mut tx, CounterKind::Offer).unwrap();
        let err = initialize(&mut tx, CounterKind::Offer).unwrap_err();
        assert!(matches!(err, BazaarError::AlreadyInitialized(CounterKind::Offer)));
    }

    #[test]
    fn uninitialized_counter_errors() {
        let store = RecordStore::new();
        let mut tx = store.begin().unwrap();
        let err = next_sequence(&mut tx, CounterKind::Request).unwrap_err();
        assert!(matches!(err, BazaarError::CounterNotInitialized(CounterKind::Request)));
    }

    #[test]
    fn rolled_back_allocation_is_not_consumed() {
        let store = RecordStore::new();
        let mut tx = store.begin().unwrap();
        initialize(&mut tx, CounterKind::Store).unwrap();
        tx.commit();

        {
            let mut tx = store.begin().unwrap();
            assert_eq!(next_sequence(&mut tx, CounterKind::Store).unwrap(), 0);
            // dropped without commit
        }

        let mut tx = store.begin().unwrap();
        assert_eq!(next_sequence(&mut tx, CounterKind::Store).unwrap(), 0);
    }

    #[test]
    fn counters_are_independent() {
        let store = RecordStore::new();
        let mut tx = store.begin().unwrap();
        for kind in CounterKind::ALL {
            initialize(&mut tx, kind).unwrap();
        }
        next_sequence(&mut tx, CounterKind::Store).unwrap();
        next_sequence(&mut tx, CounterKind::Store).unwrap();
        assert_eq!(next_sequence(&mut tx, CounterKind::Offer).unwrap(), 0);
        assert_eq!(next_sequence(&mut tx, CounterKind::Store).unwrap(), 2);
    }
}
