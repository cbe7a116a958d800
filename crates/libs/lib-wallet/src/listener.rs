//! # Inactive Listener
//!
//! While no session is active and eager reconnection has finished, listen
//! for `chainChanged`, `accountsChanged` and `connect` on the injected
//! provider and try to activate when one fires.
//!
//! ```text
//!          eager complete && !active
//!   Disabled ───────────────────────▶ Listening
//!      ▲                                  │ event ─▶ activate(connector)
//!      └──────────────────────────────────┘
//!      eager pending || active || stopped (unsubscribe, drop queued events)
//! ```
//!
//! Event handlers only enqueue; [`InactiveListener::run`] (or
//! [`InactiveListener::process_pending`]) performs the activations so that
//! no handler awaits while the provider is dispatching.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_channel::{Receiver, Sender};

use crate::connector::InjectedConnector;
use crate::eager::EagerConnect;
use crate::provider::{subscribe, EventKind, ProviderEvent, Subscription};
use crate::store::ConnectionStore;

const LISTENED_EVENTS: [EventKind; 3] = [
    EventKind::ChainChanged,
    EventKind::AccountsChanged,
    EventKind::Connect,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Disabled,
    Listening,
}

struct ListenerInner {
    connector: InjectedConnector,
    store: ConnectionStore,
    eager: EagerConnect,
    subscriptions: RefCell<Vec<Subscription>>,
    stopped: Cell<bool>,
    events_tx: Sender<ProviderEvent>,
    events_rx: Receiver<ProviderEvent>,
}

#[derive(Clone)]
pub struct InactiveListener {
    inner: Rc<ListenerInner>,
}

impl InactiveListener {
    pub fn new(connector: InjectedConnector, store: ConnectionStore, eager: EagerConnect) -> Self {
        let (events_tx, events_rx) = async_channel::unbounded();
        Self {
            inner: Rc::new(ListenerInner {
                connector,
                store,
                eager,
                subscriptions: RefCell::new(Vec::new()),
                stopped: Cell::new(false),
                events_tx,
                events_rx,
            }),
        }
    }

    /// Gate: listening is suppressed until the eager attempt has resolved,
    /// while a session is active, and after [`InactiveListener::stop`].
    pub fn is_suspended(&self) -> bool {
        self.inner.stopped.get() || !self.inner.eager.is_complete() || self.inner.store.is_active()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }

    /// Allow subscriptions again after [`InactiveListener::stop`].
    pub fn start(&self) {
        self.inner.stopped.set(false);
    }

    /// Release everything and keep it released until [`InactiveListener::start`].
    pub fn stop(&self) {
        self.inner.stopped.set(true);
        self.teardown();
    }

    pub fn state(&self) -> ListenerState {
        if self.inner.subscriptions.borrow().is_empty() {
            ListenerState::Disabled
        } else {
            ListenerState::Listening
        }
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }

    /// Reconcile subscriptions with the gate. Safe to call any number of times.
    pub fn refresh(&self) {
        if self.is_suspended() || !self.inner.connector.provider().is_available() {
            self.teardown();
            return;
        }
        if self.state() == ListenerState::Listening {
            return;
        }

        let provider = self.inner.connector.provider();
        let subscriptions: Vec<Subscription> = LISTENED_EVENTS
            .into_iter()
            .map(|kind| {
                let tx = self.inner.events_tx.clone();
                subscribe(provider, kind, move |event| {
                    if tx.try_send(event.clone()).is_err() {
                        log::warn!("[LISTENER] Event queue closed, dropping {}", event.kind());
                    }
                })
            })
            .collect();

        let stale = std::mem::replace(&mut *self.inner.subscriptions.borrow_mut(), subscriptions);
        drop(stale);
        log::debug!("[LISTENER] Listening for provider events");
    }

    /// Release every subscription and discard queued events.
    pub fn teardown(&self) {
        let released = std::mem::take(&mut *self.inner.subscriptions.borrow_mut());
        if !released.is_empty() {
            log::debug!("[LISTENER] Stopped listening ({} subscriptions)", released.len());
        }
        drop(released);
        while self.inner.events_rx.try_recv().is_ok() {}
    }

    /// Handle every queued event. Returns how many were taken off the queue.
    pub async fn process_pending(&self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.inner.events_rx.try_recv() {
            self.handle(event).await;
            handled += 1;
        }
        handled
    }

    /// Event loop for the browser: waits for events for as long as the listener lives.
    pub async fn run(&self) {
        while let Ok(event) = self.inner.events_rx.recv().await {
            self.handle(event).await;
        }
    }

    async fn handle(&self, event: ProviderEvent) {
        if self.is_suspended() {
            return;
        }
        if let ProviderEvent::AccountsChanged(accounts) = &event {
            if accounts.is_empty() {
                return;
            }
        }

        log::info!("[LISTENER] Handling {}, activating", event.kind());
        match self.inner.store.activate(&self.inner.connector).await {
            Ok(()) => log::info!("[LISTENER] Activated after {}", event.kind()),
            Err(e) => log::warn!("[LISTENER] Activation after {} failed: {}", event.kind(), e),
        }
        self.refresh();
    }
}
