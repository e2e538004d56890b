//! The ledger: one record store, one config, one transaction per operation.
//!
//! Every write operation runs inside a single [`Transaction`]. On `Ok` the
//! transaction commits; on `Err` it is dropped and nothing it staged
//! (records, counter increments, events) survives.
//!
//! `Ledger` is `Sync`; share it across threads behind an `Arc`.

use bazaar_types::{
    BazaarError, CounterKind, LedgerConfig, LedgerEvent, Offer, OfferParams, Pubkey,
    RecordAddress, Request, RequestParams, Result, SequenceCounter, Store, StoreParams, User,
    UserProfile, address,
};
use chrono::Utc;

use crate::{
    factory, index, matching, mutator,
    record_store::{RecordStore, Transaction},
    sequence,
};

/// A marketplace ledger instance.
#[derive(Debug, Default)]
pub struct Ledger {
    config: LedgerConfig,
    store: RecordStore,
}

impl Ledger {
    /// Create an empty ledger.
    ///
    /// # Errors
    /// Returns `Configuration` if `config` fails validation.
    pub fn new(config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            enforce_account_roles = config.enforce_account_roles,
            lock_window_secs = config.lock_window_secs,
            "Ledger created"
        );
        Ok(Self {
            config,
            store: RecordStore::new(),
        })
    }

    /// Create an empty ledger with default limits.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The underlying record store, for raw scans.
    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    fn execute<T, F>(&self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_>, &LedgerConfig, i64) -> Result<T>,
    {
        let mut tx = self.store.begin()?;
        let now = Utc::now().timestamp();
        match f(&mut tx, &self.config, now) {
            Ok(value) => {
                let written = tx.commit();
                tracing::debug!(operation, written, "Transaction committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(operation, error = %err, "Transaction rolled back");
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------

    /// Create the counter for one kind.
    pub fn initialize_counter(&self, kind: CounterKind) -> Result<RecordAddress> {
        self.execute("initialize_counter", |tx, _, _| sequence::initialize(tx, kind))
    }

    /// Create all four counters in one batch.
    ///
    /// # Errors
    /// `AlreadyInitialized` if any one of them exists; none are created then.
    pub fn initialize_counters(&self) -> Result<[RecordAddress; 4]> {
        self.execute("initialize_counters", |tx, _, _| {
            Ok([
                sequence::initialize(tx, CounterKind::User)?,
                sequence::initialize(tx, CounterKind::Store)?,
                sequence::initialize(tx, CounterKind::Request)?,
                sequence::initialize(tx, CounterKind::Offer)?,
            ])
        })
    }

    // -----------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------

    pub fn create_user(&self, owner: Pubkey, profile: UserProfile) -> Result<RecordAddress> {
        self.execute("create_user", |tx, config, now| {
            factory::create_user(tx, config, owner, profile, now)
        })
    }

    /// Replace `owner`'s profile, signed by `authority`.
    pub fn update_user(&self, authority: Pubkey, owner: Pubkey, profile: UserProfile) -> Result<()> {
        self.execute("update_user", |tx, config, now| {
            mutator::update_user(tx, config, authority, owner, profile, now)
        })
    }

    /// Turn location sharing on or off for `owner`, signed by `authority`.
    pub fn toggle_location(&self, authority: Pubkey, owner: Pubkey, enabled: bool) -> Result<()> {
        self.execute("toggle_location", |tx, _, now| {
            mutator::toggle_location(tx, authority, owner, enabled, now)
        })
    }

    pub fn create_store(&self, owner: Pubkey, params: StoreParams) -> Result<RecordAddress> {
        self.execute("create_store", |tx, config, now| {
            factory::create_store(tx, config, owner, params, now)
        })
    }

    pub fn create_request(&self, owner: Pubkey, params: RequestParams) -> Result<RecordAddress> {
        self.execute("create_request", |tx, config, now| {
            factory::create_request(tx, config, owner, params, now)
        })
    }

    /// Remove a request that is still `Pending`.
    pub fn delete_request(&self, authority: Pubkey, request: RecordAddress) -> Result<()> {
        self.execute("delete_request", |tx, _, _| {
            mutator::delete_request(tx, authority, request)
        })
    }

    pub fn create_offer(&self, owner: Pubkey, params: OfferParams) -> Result<RecordAddress> {
        self.execute("create_offer", |tx, config, now| {
            factory::create_offer(tx, config, owner, params, now)
        })
    }

    /// Accept `target` on `request`, rejecting the supplied `siblings`.
    ///
    /// `siblings` must list every other offer on the request; see
    /// [`Ledger::offers_for_request`]. Returns the accepted offer.
    pub fn accept_offer(
        &self,
        caller: Pubkey,
        request: RecordAddress,
        target: RecordAddress,
        siblings: &[RecordAddress],
    ) -> Result<Offer> {
        self.execute("accept_offer", |tx, config, now| {
            matching::accept_offer(tx, config, caller, request, target, siblings, now)
        })
        .map(|acceptance| acceptance.offer)
    }

    /// Accept `target`, discovering its siblings from committed state.
    ///
    /// Discovery and acceptance run under one write guard, so no offer can
    /// land on the request in between.
    pub fn accept_offer_closing_all(
        &self,
        caller: Pubkey,
        request: RecordAddress,
        target: RecordAddress,
    ) -> Result<matching::Acceptance> {
        self.execute("accept_offer", |tx, config, now| {
            let siblings = index::offers_in(tx, &request);
            matching::accept_offer(tx, config, caller, request, target, &siblings, now)
        })
    }

    /// Move an accepted request to `Completed` once its lock window passed.
    pub fn complete_request(&self, authority: Pubkey, request: RecordAddress) -> Result<()> {
        self.execute("complete_request", |tx, config, now| {
            mutator::complete_request(tx, config, authority, request, now)
        })
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    pub fn fetch_user(&self, owner: &Pubkey) -> Result<User> {
        self.store
            .load(&address::user_address(owner))?
            .ok_or(BazaarError::UserNotFound(*owner))
    }

    /// Whether `owner` shares their location.
    pub fn location_preference(&self, owner: &Pubkey) -> Result<bool> {
        self.fetch_user(owner).map(|user| user.location_enabled)
    }

    pub fn fetch_store(&self, store: &RecordAddress) -> Result<Store> {
        self.store
            .load(store)?
            .ok_or(BazaarError::StoreNotFound(*store))
    }

    pub fn fetch_request(&self, request: &RecordAddress) -> Result<Request> {
        self.store
            .load(request)?
            .ok_or(BazaarError::RequestNotFound(*request))
    }

    pub fn fetch_offer(&self, offer: &RecordAddress) -> Result<Offer> {
        self.store
            .load(offer)?
            .ok_or(BazaarError::OfferNotFound(*offer))
    }

    pub fn fetch_counter(&self, kind: CounterKind) -> Result<SequenceCounter> {
        self.store
            .load(&address::counter_address(kind))?
            .ok_or(BazaarError::CounterNotInitialized(kind))
    }

    /// Every committed offer on `request`, in address order.
    pub fn offers_for_request(&self, request: &RecordAddress) -> Result<Vec<RecordAddress>> {
        index::offers_for_request(&self.store, request)
    }

    /// Committed offers on `request` still awaiting a decision.
    pub fn pending_offers_for_request(&self, request: &RecordAddress) -> Result<Vec<RecordAddress>> {
        index::pending_offers_for_request(&self.store, request)
    }

    /// Snapshot of the committed event log.
    pub fn events(&self) -> Result<Vec<LedgerEvent>> {
        self.store.events()
    }

    /// Committed events from position `cursor` onward.
    pub fn events_since(&self, cursor: usize) -> Result<Vec<LedgerEvent>> {
        self.store.events_since(cursor)
    }
}

#[cfg(test)]
mod tests {
    use bazaar_types::{AccountType, LedgerEventKind, Location, OfferStatus, RequestLifecycle};

    use super::*;

    fn profile(account_type: AccountType) -> UserProfile {
        UserProfile {
            username: "trader".into(),
            phone: String::new(),
            location: Location::default(),
            account_type,
        }
    }

    fn request_params() -> RequestParams {
        RequestParams {
            name: "Bike".into(),
            description: String::new(),
            images: vec![],
            location: Location::default(),
        }
    }

    fn offer_params(request: RecordAddress, price: u64) -> OfferParams {
        OfferParams {
            price,
            images: vec![],
            store_name: "Wheels".into(),
            request,
        }
    }

    fn ready() -> (Ledger, Pubkey, Pubkey) {
        ready_with(LedgerConfig::default())
    }

    fn ready_with(config: LedgerConfig) -> (Ledger, Pubkey, Pubkey) {
        let ledger = Ledger::new(config).unwrap();
        ledger.initialize_counters().unwrap();
        let buyer = Pubkey::new_unique();
        let seller = Pubkey::new_unique();
        ledger.create_user(buyer, profile(AccountType::Buyer)).unwrap();
        ledger.create_user(seller, profile(AccountType::Seller)).unwrap();
        (ledger, buyer, seller)
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = LedgerConfig {
            max_name_len: 0,
            ..LedgerConfig::default()
        };
        assert!(matches!(
            Ledger::new(config).unwrap_err(),
            BazaarError::Configuration(_)
        ));
    }

    #[test]
    fn initialize_counters_is_all_or_nothing() {
        let ledger = Ledger::with_defaults();
        ledger.initialize_counter(CounterKind::Offer).unwrap();
        let err = ledger.initialize_counters().unwrap_err();
        assert!(matches!(err, BazaarError::AlreadyInitialized(CounterKind::Offer)));
        assert!(matches!(
            ledger.fetch_counter(CounterKind::User).unwrap_err(),
            BazaarError::CounterNotInitialized(CounterKind::User)
        ));
    }

    #[test]
    fn failed_operation_leaves_no_trace() {
        let (ledger, buyer, _) = ready();
        let records = ledger.store().len().unwrap();
        let events = ledger.events().unwrap().len();

        let err = ledger.create_store(buyer, StoreParams {
            name: "Nope".into(),
            description: String::new(),
            phone: String::new(),
            location: Location::default(),
        });
        assert!(matches!(err.unwrap_err(), BazaarError::OnlySellersAllowed));
        assert_eq!(ledger.store().len().unwrap(), records);
        assert_eq!(ledger.events().unwrap().len(), events);
        assert_eq!(ledger.fetch_counter(CounterKind::Store).unwrap().current, 0);
    }

    #[test]
    fn closing_all_discovers_siblings() {
        let (ledger, buyer, seller) = ready();
        let request = ledger.create_request(buyer, request_params()).unwrap();
        let a = ledger.create_offer(seller, offer_params(request, 1)).unwrap();
        let b = ledger.create_offer(seller, offer_params(request, 2)).unwrap();
        let c = ledger.create_offer(seller, offer_params(request, 3)).unwrap();
        assert_eq!(ledger.pending_offers_for_request(&request).unwrap().len(), 3);

        let outcome = ledger.accept_offer_closing_all(buyer, request, b).unwrap();
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(ledger.fetch_offer(&a).unwrap().status, OfferStatus::Rejected);
        assert_eq!(ledger.fetch_offer(&c).unwrap().status, OfferStatus::Rejected);
        assert!(ledger.pending_offers_for_request(&request).unwrap().is_empty());
    }

    #[test]
    fn full_lifecycle_emits_events_in_order() {
        let (ledger, buyer, seller) = ready_with(LedgerConfig {
            lock_window_secs: 0,
            ..LedgerConfig::default()
        });
        let cursor = ledger.events().unwrap().len();
        let request = ledger.create_request(buyer, request_params()).unwrap();
        let offer = ledger.create_offer(seller, offer_params(request, 90)).unwrap();
        let accepted = ledger.accept_offer(buyer, request, offer, &[]).unwrap();
        assert_eq!(accepted.price, 90);
        ledger.complete_request(buyer, request).unwrap();

        let stored = ledger.fetch_request(&request).unwrap();
        assert_eq!(stored.lifecycle, RequestLifecycle::Completed);
        assert_eq!(stored.price_quote, 90);

        let kinds: Vec<_> = ledger
            .events_since(cursor)
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds.len(), 5);
        assert!(matches!(kinds[0], LedgerEventKind::RequestCreated { .. }));
        assert!(matches!(kinds[1], LedgerEventKind::OfferCreated { .. }));
        assert!(matches!(kinds[2], LedgerEventKind::OfferAccepted { .. }));
        assert!(matches!(kinds[3], LedgerEventKind::RequestAccepted { .. }));
        assert!(matches!(kinds[4], LedgerEventKind::RequestCompleted { offer: Some(o), .. } if o == offer));
    }

    #[test]
    fn completion_inside_lock_window_is_refused() {
        let (ledger, buyer, seller) = ready();
        let request = ledger.create_request(buyer, request_params()).unwrap();
        let offer = ledger.create_offer(seller, offer_params(request, 5)).unwrap();
        ledger.accept_offer(buyer, request, offer, &[]).unwrap();
        let cursor = ledger.events().unwrap().len();

        let err = ledger.complete_request(buyer, request).unwrap_err();
        let accepted_at = ledger.fetch_request(&request).unwrap().updated_at;
        assert!(matches!(
            err,
            BazaarError::RequestNotLocked { unlocks_at, .. } if unlocks_at == accepted_at + 60
        ));
        assert_eq!(
            ledger.fetch_request(&request).unwrap().lifecycle,
            RequestLifecycle::AcceptedByBuyer
        );
        assert_eq!(ledger.events().unwrap().len(), cursor);
    }

    #[test]
    fn delete_request_only_while_pending() {
        let (ledger, buyer, seller) = ready();
        let withdrawn = ledger.create_request(buyer, request_params()).unwrap();
        let orphan = ledger.create_offer(seller, offer_params(withdrawn, 4)).unwrap();
        ledger.delete_request(buyer, withdrawn).unwrap();
        assert!(matches!(
            ledger.fetch_request(&withdrawn).unwrap_err(),
            BazaarError::RequestNotFound(a) if a == withdrawn
        ));
        assert!(matches!(
            ledger.accept_offer(buyer, withdrawn, orphan, &[]).unwrap_err(),
            BazaarError::RequestNotFound(_)
        ));

        let kept = ledger.create_request(buyer, request_params()).unwrap();
        assert_ne!(kept, withdrawn);
        let offer = ledger.create_offer(seller, offer_params(kept, 4)).unwrap();
        ledger.accept_offer(buyer, kept, offer, &[]).unwrap();
        assert!(matches!(
            ledger.delete_request(buyer, kept).unwrap_err(),
            BazaarError::RequestLocked { .. }
        ));
        assert!(ledger.fetch_request(&kept).is_ok());
    }

    #[test]
    fn location_preference_follows_toggle() {
        let (ledger, buyer, seller) = ready();
        assert!(ledger.location_preference(&buyer).unwrap());

        ledger.toggle_location(buyer, buyer, false).unwrap();
        assert!(!ledger.location_preference(&buyer).unwrap());
        assert!(matches!(
            ledger.toggle_location(seller, buyer, true).unwrap_err(),
            BazaarError::Unauthorized { .. }
        ));
        assert!(!ledger.location_preference(&buyer).unwrap());

        let stranger = Pubkey::new_unique();
        assert!(matches!(
            ledger.location_preference(&stranger).unwrap_err(),
            BazaarError::UserNotFound(_)
        ));
    }
}
