//! The record store and its transactions.
//!
//! Records are kept in their encoded binary form, keyed by address. Every
//! mutation goes through a [`Transaction`], which holds the store's write
//! guard for its whole life:
//!
//! 1. Reads see committed state overlaid with the transaction's own writes
//! 2. Writes, deletions, and events are staged, never applied in place
//! 3. [`Transaction::commit`] applies everything in one step
//! 4. Dropping an uncommitted transaction discards everything
//!
//! Holding the write guard makes every operation serializable and makes the
//! read-increment on a sequence counter indivisible. Plain reads take the
//! shared guard and never observe a half-applied operation.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use bazaar_types::{
    BazaarError, LedgerEvent, LedgerEventKind, RecordAddress, Result, codec::Record,
};
use chrono::Utc;

#[derive(Debug, Default)]
struct StoreState {
    /// Encoded records by address.
    records: BTreeMap<RecordAddress, Vec<u8>>,
    /// Committed events in commit order.
    events: Vec<LedgerEvent>,
}

/// All persisted records plus the committed event log.
#[derive(Debug, Default)]
pub struct RecordStore {
    state: RwLock<StoreState>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| BazaarError::Internal("record store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| BazaarError::Internal("record store lock poisoned".to_string()))
    }

    /// Open a transaction. Blocks until no other transaction is open.
    pub fn begin(&self) -> Result<Transaction<'_>> {
        Ok(Transaction {
            guard: self.write()?,
            staged: BTreeMap::new(),
            events: Vec::new(),
        })
    }

    /// Decode the committed record of kind `R` at `address`.
    ///
    /// # Errors
    /// Returns `Serialization` if the address holds a different kind.
    pub fn load<R: Record>(&self, address: &RecordAddress) -> Result<Option<R>> {
        self.read()?
            .records
            .get(address)
            .map(|bytes| R::decode(bytes))
            .transpose()
    }

    /// Committed encoded bytes at `address`.
    pub fn raw(&self, address: &RecordAddress) -> Result<Option<Vec<u8>>> {
        Ok(self.read()?.records.get(address).cloned())
    }

    /// Addresses of every committed record whose encoding satisfies `filter`,
    /// in address order.
    pub fn scan<F>(&self, filter: F) -> Result<Vec<RecordAddress>>
    where
        F: Fn(&[u8]) -> bool,
    {
        Ok(self
            .read()?
            .records
            .iter()
            .filter(|(_, bytes)| filter(bytes))
            .map(|(address, _)| *address)
            .collect())
    }

    /// Number of committed records.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.records.is_empty())
    }

    /// Snapshot of the committed event log.
    pub fn events(&self) -> Result<Vec<LedgerEvent>> {
        Ok(self.read()?.events.clone())
    }

    /// Committed events from position `cursor` onward.
    pub fn events_since(&self, cursor: usize) -> Result<Vec<LedgerEvent>> {
        Ok(self
            .read()?
            .events
            .get(cursor..)
            .map(<[LedgerEvent]>::to_vec)
            .unwrap_or_default())
    }
}

/// One all-or-nothing batch of reads and writes.
pub struct Transaction<'a> {
    guard: RwLockWriteGuard<'a, StoreState>,
    /// `None` marks a staged deletion.
    staged: BTreeMap<RecordAddress, Option<Vec<u8>>>,
    events: Vec<LedgerEventKind>,
}

impl Transaction<'_> {
    /// Encoded bytes at `address`, staged writes first.
    #[must_use]
    pub fn raw(&self, address: &RecordAddress) -> Option<&[u8]> {
        match self.staged.get(address) {
            Some(staged) => staged.as_deref(),
            None => self.guard.records.get(address).map(Vec::as_slice),
        }
    }

    #[must_use]
    pub fn contains(&self, address: &RecordAddress) -> bool {
        self.raw(address).is_some()
    }

    /// Decode the record of kind `R` at `address`, staged writes first.
    pub fn load<R: Record>(&self, address: &RecordAddress) -> Result<Option<R>> {
        self.raw(address).map(R::decode).transpose()
    }

    /// Addresses whose current encoding (staged or committed) satisfies
    /// `filter`, in address order.
    pub fn scan<F>(&self, filter: F) -> Vec<RecordAddress>
    where
        F: Fn(&[u8]) -> bool,
    {
        let mut hits: BTreeSet<RecordAddress> = self
            .guard
            .records
            .iter()
            .filter(|(address, _)| !self.staged.contains_key(*address))
            .filter(|(_, bytes)| filter(bytes))
            .map(|(address, _)| *address)
            .collect();
        hits.extend(
            self.staged
                .iter()
                .filter_map(|(address, bytes)| bytes.as_deref().map(|bytes| (address, bytes)))
                .filter(|(_, bytes)| filter(bytes))
                .map(|(address, _)| *address),
        );
        hits.into_iter().collect()
    }

    /// Stage a brand-new record.
    ///
    /// # Errors
    /// Returns [`BazaarError::AddressInUse`] if anything already lives there.
    pub fn create<R: Record>(&mut self, address: RecordAddress, record: &R) -> Result<()> {
        if self.contains(&address) {
            return Err(BazaarError::AddressInUse(address));
        }
        self.staged.insert(address, Some(record.encode()?));
        Ok(())
    }

    /// Stage an in-place overwrite of an existing record of the same kind.
    pub fn update<R: Record>(&mut self, address: RecordAddress, record: &R) -> Result<()> {
        self.expect_kind::<R>(&address)?;
        self.staged.insert(address, Some(record.encode()?));
        Ok(())
    }

    /// Stage removal of an existing record of kind `R`.
    pub fn delete<R: Record>(&mut self, address: RecordAddress) -> Result<()> {
        self.expect_kind::<R>(&address)?;
        self.staged.insert(address, None);
        Ok(())
    }

    fn expect_kind<R: Record>(&self, address: &RecordAddress) -> Result<()> {
        match self.raw(address).map(R::matches) {
            Some(true) => Ok(()),
            Some(false) => Err(BazaarError::Internal(format!(
                "{address} does not hold a {} record",
                R::KIND
            ))),
            None => Err(BazaarError::Internal(format!(
                "missing {} record {address}",
                R::KIND
            ))),
        }
    }

    /// Stage an event; it reaches the log only if the transaction commits.
    pub fn emit(&mut self, kind: LedgerEventKind) {
        self.events.push(kind);
    }

    /// Number of staged record writes and deletions.
    #[must_use]
    pub fn staged_writes(&self) -> usize {
        self.staged.len()
    }

    /// Apply every staged write and event. Returns the number of records
    /// written or removed.
    pub fn commit(self) -> usize {
        let Self {
            mut guard,
            staged,
            events,
        } = self;
        let written = staged.len();
        let now = Utc::now();
        for (address, bytes) in staged {
            match bytes {
                Some(bytes) => guard.records.insert(address, bytes),
                None => guard.records.remove(&address),
            };
        }
        guard
            .events
            .extend(events.into_iter().map(|kind| LedgerEvent::new(kind, now)));
        written
    }
}
