//! # Connection State Store
//!
//! Process-wide connection state, written only through [`ConnectionStore::activate`]
//! and [`ConnectionStore::deactivate`] (plus the provider events of an active
//! session, which end up in the same two transitions or in an in-place
//! account/chain update).
//!
//! ## Invariants
//!
//! - `active` is derived: true iff `account` and `provider` are both present.
//! - An activation result is applied in one transition after the connector
//!   resolves, and only if no `deactivate()` happened since it started.
//! - Observers run after every transition, outside of any internal borrow.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use alloy_primitives::Address;
use shared::ConnectionSnapshot;

use crate::connector::{Activation, ActivationMode, InjectedConnector};
use crate::error::{Result, WalletError};
use crate::provider::{subscribe, Eip1193Provider, EventKind, ProviderEvent, Subscription};

#[derive(Clone, Default)]
pub struct ConnectionState {
    pub chain_id: Option<u64>,
    pub account: Option<Address>,
    pub provider: Option<Rc<dyn Eip1193Provider>>,
}

impl ConnectionState {
    pub fn is_active(&self) -> bool {
        self.account.is_some() && self.provider.is_some()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        ConnectionSnapshot {
            chain_id: self.chain_id,
            account: self.account,
            active: self.is_active(),
        }
    }
}

impl fmt::Debug for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionState")
            .field("chain_id", &self.chain_id)
            .field("account", &self.account)
            .field("active", &self.is_active())
            .finish()
    }
}

type Observer = Rc<dyn Fn(&ConnectionState)>;

struct StoreInner {
    state: ConnectionState,
    /// Bumped by every `deactivate()`; in-flight activations from an older epoch are discarded.
    epoch: u64,
    /// Provider events of the active session.
    session: Vec<Subscription>,
    observers: Vec<(u64, Observer)>,
    next_observer: u64,
}

/// Cheap, cloneable handle to the shared connection state.
#[derive(Clone)]
pub struct ConnectionStore {
    inner: Rc<RefCell<StoreInner>>,
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                state: ConnectionState::default(),
                epoch: 0,
                session: Vec::new(),
                observers: Vec::new(),
                next_observer: 0,
            })),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.borrow().state.clone()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.inner.borrow().state.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().state.is_active()
    }

    pub fn account(&self) -> Option<Address> {
        self.inner.borrow().state.account
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.inner.borrow().state.chain_id
    }

    /// Interactive activation (may prompt). Errors propagate, state is untouched on failure.
    pub async fn activate(&self, connector: &InjectedConnector) -> Result<()> {
        self.activate_with(connector, ActivationMode::Interactive).await
    }

    pub async fn activate_with(&self, connector: &InjectedConnector, mode: ActivationMode) -> Result<()> {
        self.activate_since(connector, mode, self.epoch()).await
    }

    /// Current deactivation epoch.
    pub fn epoch(&self) -> u64 {
        self.inner.borrow().epoch
    }

    /// Like [`ConnectionStore::activate_with`], but superseded by any
    /// `deactivate()` after `started_in` was read, not only by those during the call.
    pub async fn activate_since(
        &self,
        connector: &InjectedConnector,
        mode: ActivationMode,
        started_in: u64,
    ) -> Result<()> {
        if self.epoch() != started_in {
            return Err(WalletError::Superseded);
        }
        let activation = connector.activate(mode).await?;

        if self.epoch() != started_in {
            log::debug!(
                "[STORE] Dropping activation for {} resolved after deactivate",
                activation.account
            );
            return Err(WalletError::Superseded);
        }

        self.apply(connector, activation);
        Ok(())
    }

    /// Reset every field. Idempotent.
    pub fn deactivate(&self) {
        let (released, was_active) = {
            let mut inner = self.inner.borrow_mut();
            inner.epoch += 1;
            let was_active = inner.state.is_active() || inner.state.chain_id.is_some();
            inner.state = ConnectionState::default();
            (std::mem::take(&mut inner.session), was_active)
        };
        drop(released);

        if was_active {
            log::info!("[STORE] Session deactivated");
            self.notify();
        }
    }

    /// Stop following provider events for the current session. State is kept.
    pub fn release_session(&self) {
        let released = std::mem::take(&mut self.inner.borrow_mut().session);
        if !released.is_empty() {
            log::debug!("[STORE] Released {} session subscriptions", released.len());
        }
        drop(released);
    }

    /// Register an observer called after every state transition.
    pub fn observe(&self, observer: impl Fn(&ConnectionState) + 'static) -> StoreObserver {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_observer;
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        StoreObserver {
            store: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn apply(&self, connector: &InjectedConnector, activation: Activation) {
        let session = self.session_subscriptions(connector, &activation.provider);

        let released = {
            let mut inner = self.inner.borrow_mut();
            inner.state = ConnectionState {
                chain_id: Some(activation.chain_id),
                account: Some(activation.account),
                provider: Some(activation.provider),
            };
            std::mem::replace(&mut inner.session, session)
        };
        drop(released);

        log::info!(
            "[STORE] Session active: account={} chain_id={}",
            activation.account,
            activation.chain_id
        );
        self.notify();
    }

    /// Provider events that keep an active session in sync with the wallet.
    fn session_subscriptions(
        &self,
        connector: &InjectedConnector,
        provider: &Rc<dyn Eip1193Provider>,
    ) -> Vec<Subscription> {
        [EventKind::AccountsChanged, EventKind::ChainChanged, EventKind::Disconnect]
            .into_iter()
            .map(|kind| {
                let store = Rc::downgrade(&self.inner);
                let connector = connector.clone();
                subscribe(provider, kind, move |event| {
                    if let Some(inner) = store.upgrade() {
                        ConnectionStore { inner }.on_session_event(&connector, event);
                    }
                })
            })
            .collect()
    }

    fn on_session_event(&self, connector: &InjectedConnector, event: &ProviderEvent) {
        if !self.is_active() {
            return;
        }
        match event {
            ProviderEvent::AccountsChanged(accounts) => match accounts.first() {
                Some(account) => {
                    log::info!("[STORE] Account changed to {}", account);
                    self.update(|state| state.account = Some(*account));
                }
                None => {
                    log::info!("[STORE] Wallet reported no accounts");
                    self.deactivate();
                }
            },
            ProviderEvent::ChainChanged(chain_id) if connector.is_supported(*chain_id) => {
                log::info!("[STORE] Chain changed to {}", chain_id);
                self.update(|state| state.chain_id = Some(*chain_id));
            }
            ProviderEvent::ChainChanged(chain_id) => {
                log::warn!("[STORE] Wallet switched to unsupported chain {}", chain_id);
                self.deactivate();
            }
            ProviderEvent::Disconnect => {
                log::info!("[STORE] Provider disconnected");
                self.deactivate();
            }
            ProviderEvent::Connect { .. } => {}
        }
    }

    fn update(&self, change: impl FnOnce(&mut ConnectionState)) {
        change(&mut self.inner.borrow_mut().state);
        self.notify();
    }

    fn notify(&self) {
        let (state, observers) = {
            let inner = self.inner.borrow();
            let observers: Vec<Observer> = inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect();
            (inner.state.clone(), observers)
        };
        for observer in observers {
            observer(&state);
        }
    }
}

/// Observer registration; dropping it stops notifications.
pub struct StoreObserver {
    store: Weak<RefCell<StoreInner>>,
    id: u64,
}

impl Drop for StoreObserver {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.observers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockProvider, SECOND_ACCOUNT};
    use std::cell::Cell;

    fn setup(mock: &Rc<MockProvider>) -> (ConnectionStore, InjectedConnector) {
        (ConnectionStore::new(), InjectedConnector::with_default_chains(mock.clone()))
    }

    fn assert_invariant(store: &ConnectionStore) {
        let state = store.state();
        assert_eq!(state.is_active(), state.account.is_some() && state.provider.is_some());
        assert_eq!(store.snapshot().active, state.is_active());
    }

    #[test]
    fn test_initial_state_is_empty() {
        let store = ConnectionStore::new();
        let state = store.state();
        assert!(!state.is_active());
        assert!(state.account.is_none());
        assert!(state.chain_id.is_none());
        assert!(state.provider.is_none());
    }

    #[tokio::test]
    async fn test_activate_sets_all_fields() {
        let mock = MockProvider::new().with_chain_id(4);
        let (store, connector) = setup(&mock);

        store.activate(&connector).await.unwrap();

        assert!(store.is_active());
        assert_eq!(store.chain_id(), Some(4));
        assert_eq!(store.account(), Some(mock.account()));
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_failed_activation_leaves_state_unchanged() {
        let mock = MockProvider::new().with_chain_id(56);
        let (store, connector) = setup(&mock);

        let err = store.activate(&connector).await.unwrap_err();

        assert_eq!(err, WalletError::UnsupportedChain { chain_id: 56 });
        assert!(!store.is_active());
        assert!(store.chain_id().is_none());
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_invariant_over_activate_deactivate_sequences() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);

        for step in 0..6 {
            if step % 3 == 2 {
                store.deactivate();
            } else {
                store.activate(&connector).await.unwrap();
            }
            assert_invariant(&store);
        }
        store.deactivate();
        store.deactivate();
        assert_invariant(&store);
        assert!(!store.is_active());
    }

    #[tokio::test]
    async fn test_late_activation_after_deactivate_is_discarded() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);

        let release = mock.hold_next_request();
        let activation = store.activate(&connector);
        let interrupt = async {
            store.deactivate();
            release.send(()).unwrap();
        };
        let (result, ()) = futures::join!(activation, interrupt);

        assert_eq!(result.unwrap_err(), WalletError::Superseded);
        assert!(!store.is_active());
        assert_eq!(mock.total_handlers(), 0);
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_activation_since_older_epoch_is_superseded() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);

        let epoch = store.epoch();
        store.deactivate();
        let err = store
            .activate_since(&connector, ActivationMode::Interactive, epoch)
            .await
            .unwrap_err();

        assert_eq!(err, WalletError::Superseded);
        assert_eq!(mock.total_calls(), 0);
        assert!(!store.is_active());
    }

    #[tokio::test]
    async fn test_observers_see_every_transition() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);
        let seen = Rc::new(Cell::new(0));

        let counter = Rc::clone(&seen);
        let observer = store.observe(move |_| counter.set(counter.get() + 1));

        store.activate(&connector).await.unwrap();
        store.deactivate();
        store.deactivate();
        assert_eq!(seen.get(), 2);

        drop(observer);
        store.activate(&connector).await.unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[tokio::test]
    async fn test_session_follows_account_and_chain_changes() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);
        store.activate(&connector).await.unwrap();

        mock.emit(ProviderEvent::AccountsChanged(vec![SECOND_ACCOUNT]));
        assert_eq!(store.account(), Some(SECOND_ACCOUNT));

        mock.emit(ProviderEvent::ChainChanged(1337));
        assert_eq!(store.chain_id(), Some(1337));
        assert!(store.is_active());
    }

    #[tokio::test]
    async fn test_session_ends_on_empty_accounts() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);
        store.activate(&connector).await.unwrap();
        assert_eq!(mock.total_handlers(), 3);

        mock.emit(ProviderEvent::AccountsChanged(vec![]));

        assert!(!store.is_active());
        assert!(store.account().is_none());
        assert!(store.chain_id().is_none());
        assert_eq!(mock.total_handlers(), 0);
    }

    #[tokio::test]
    async fn test_session_ends_on_unsupported_chain_or_disconnect() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);

        store.activate(&connector).await.unwrap();
        mock.emit(ProviderEvent::ChainChanged(56));
        assert!(!store.is_active());

        store.activate(&connector).await.unwrap();
        mock.emit(ProviderEvent::Disconnect);
        assert!(!store.is_active());
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_release_session_stops_following_events() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);
        store.activate(&connector).await.unwrap();

        store.release_session();
        assert_eq!(mock.total_handlers(), 0);

        mock.emit(ProviderEvent::AccountsChanged(vec![]));
        assert!(store.is_active());
        assert_invariant(&store);
    }

    #[tokio::test]
    async fn test_reactivation_replaces_session_subscriptions() {
        let mock = MockProvider::new();
        let (store, connector) = setup(&mock);

        store.activate(&connector).await.unwrap();
        store.activate(&connector).await.unwrap();

        assert_eq!(mock.handler_count(EventKind::AccountsChanged), 1);
        assert_eq!(mock.handler_count(EventKind::ChainChanged), 1);
        assert_eq!(mock.handler_count(EventKind::Disconnect), 1);
    }
}
