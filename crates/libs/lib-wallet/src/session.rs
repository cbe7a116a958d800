//! # Greeter Session
//!
//! Wires the connector, store, eager reconnection, inactive listener and
//! contract binder together and exposes the UI actions.
//!
//! A store observer keeps the rest in sync after every transition:
//! it marks eager reconnection as tried once a session is active,
//! re-derives the contract binding and reconciles the listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use shared::{ConnectionSnapshot, TransactionReceipt};

use crate::binder::ContractBinder;
use crate::config::Config;
use crate::connector::InjectedConnector;
use crate::contract::ContractBinding;
use crate::eager::EagerConnect;
use crate::error::Result;
use crate::listener::InactiveListener;
use crate::provider::Eip1193Provider;
use crate::store::{ConnectionState, ConnectionStore, StoreObserver};

pub const HELLO_GREETING: &str = "Hello World!";
pub const GOODBYE_GREETING: &str = "Goodbye World!";

struct DappInner {
    connector: InjectedConnector,
    store: ConnectionStore,
    eager: EagerConnect,
    listener: InactiveListener,
    binder: ContractBinder,
    observer: RefCell<Option<StoreObserver>>,
}

impl DappInner {
    /// Follow store transitions until [`GreeterDapp::unmount`].
    fn install_observer(self: &Rc<Self>) {
        if self.observer.borrow().is_some() {
            return;
        }
        let weak: Weak<DappInner> = Rc::downgrade(self);
        let observer = self.store.observe(move |state| {
            if let Some(inner) = weak.upgrade() {
                inner.on_transition(state);
            }
        });
        *self.observer.borrow_mut() = Some(observer);
    }

    fn on_transition(&self, state: &ConnectionState) {
        if state.is_active() {
            self.eager.mark_tried();
        }
        self.binder.sync(state);
        self.listener.refresh();
    }
}

#[derive(Clone)]
pub struct GreeterDapp {
    inner: Rc<DappInner>,
}

impl GreeterDapp {
    /// Fails only on configuration problems; those are fatal for the app.
    pub fn new(config: &Config, provider: Rc<dyn Eip1193Provider>) -> Result<Self> {
        config.validate()?;
        let binder = ContractBinder::from_config(config)?;

        let connector = InjectedConnector::new(provider, config.supported_chain_ids.iter().copied());
        let store = ConnectionStore::new();
        let eager = EagerConnect::new();
        let listener = InactiveListener::new(connector.clone(), store.clone(), eager.clone());
        binder.sync(&store.state());

        let inner = Rc::new(DappInner {
            connector,
            store,
            eager,
            listener,
            binder,
            observer: RefCell::new(None),
        });

        inner.install_observer();

        log::info!(
            "[DAPP] Greeter at {} (chains {:?})",
            inner.binder.address(),
            inner.connector.supported_chain_ids()
        );
        Ok(Self { inner })
    }

    /// Eager reconnection, then start listening if nothing was restored.
    pub async fn mount(&self) -> bool {
        self.inner.install_observer();
        self.inner.listener.start();
        let tried = self.inner.eager.run(&self.inner.connector, &self.inner.store).await;
        self.inner.listener.refresh();
        tried
    }

    /// Release every provider subscription and stop reacting to transitions
    /// until the next [`GreeterDapp::mount`].
    pub fn unmount(&self) {
        let observer = self.inner.observer.borrow_mut().take();
        drop(observer);
        self.inner.listener.stop();
        self.inner.store.release_session();
        log::debug!("[DAPP] Unmounted");
    }

    pub fn tried(&self) -> bool {
        self.inner.eager.tried()
    }

    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.inner.store.snapshot()
    }

    pub fn store(&self) -> &ConnectionStore {
        &self.inner.store
    }

    pub fn listener(&self) -> &InactiveListener {
        &self.inner.listener
    }

    pub fn binding(&self) -> Option<Rc<ContractBinding>> {
        self.inner.binder.current()
    }

    /// Called with every new connection state.
    pub fn subscribe(&self, observer: impl Fn(&ConnectionSnapshot) + 'static) -> StoreObserver {
        self.inner.store.observe(move |state| observer(&state.snapshot()))
    }

    /// Interactive connect. Errors are returned to the caller.
    pub async fn connect(&self) -> Result<()> {
        self.inner.store.activate(&self.inner.connector).await
    }

    pub fn disconnect(&self) {
        self.inner.store.deactivate();
        self.inner.listener.refresh();
    }

    fn active_binding(&self) -> Option<Rc<ContractBinding>> {
        if !self.inner.store.is_active() {
            log::debug!("[CONTRACT] No active session, skipping contract call");
            return None;
        }
        self.binding()
    }

    pub async fn get_greeting(&self) -> Option<String> {
        let binding = self.active_binding()?;
        match binding.greet().await {
            Ok(greeting) => {
                log::info!("[CONTRACT] greet() = {:?}", greeting);
                Some(greeting)
            }
            Err(e) => {
                log::error!("[CONTRACT] greet() failed: {}", e);
                None
            }
        }
    }

    pub async fn set_greeting(&self, text: &str) -> Option<TransactionReceipt> {
        let binding = self.active_binding()?;
        match binding.set_greeting(text).await {
            Ok(receipt) => {
                log::info!(
                    "[CONTRACT] setGreeting({:?}) sent: {}",
                    text,
                    receipt.transaction_hash
                );
                Some(receipt)
            }
            Err(e) => {
                log::error!("[CONTRACT] setGreeting({:?}) failed: {}", text, e);
                None
            }
        }
    }

    pub async fn set_hello_greeting(&self) -> Option<TransactionReceipt> {
        self.set_greeting(HELLO_GREETING).await
    }

    pub async fn set_goodbye_greeting(&self) -> Option<TransactionReceipt> {
        self.set_greeting(GOODBYE_GREETING).await
    }
}
