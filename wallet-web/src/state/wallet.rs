//! Wallet state management
//!
//! Mirrors the lifecycle core into Leptos signals and runs the UI actions.

use leptos::prelude::*;
use lib_wallet::{GreeterDapp, StoreObserver};
use shared::{ConnectionSnapshot, TransactionReceipt};

/// Global wallet context
#[derive(Clone, Copy)]
pub struct WalletContext {
    pub connection: RwSignal<ConnectionSnapshot>,
    pub tried: RwSignal<bool>,
    pub last_greeting: RwSignal<Option<String>>,
    pub last_receipt: RwSignal<Option<TransactionReceipt>>,
    pub error: RwSignal<Option<String>>,
    pub pending: RwSignal<bool>,
    dapp: StoredValue<GreeterDapp, LocalStorage>,
    observer: StoredValue<Option<StoreObserver>, LocalStorage>,
}

impl WalletContext {
    pub fn new(dapp: GreeterDapp) -> Self {
        let context = Self {
            connection: RwSignal::new(dapp.snapshot()),
            tried: RwSignal::new(dapp.tried()),
            last_greeting: RwSignal::new(None),
            last_receipt: RwSignal::new(None),
            error: RwSignal::new(None),
            pending: RwSignal::new(false),
            dapp: StoredValue::new_local(dapp.clone()),
            observer: StoredValue::new_local(None),
        };

        let guard = dapp.subscribe(move |snapshot| {
            context.connection.set(*snapshot);
            if snapshot.active {
                context.tried.set(true);
            }
        });
        context.observer.set_value(Some(guard));
        context
    }

    fn dapp(&self) -> GreeterDapp {
        self.dapp.get_value()
    }

    pub fn is_active(&self) -> bool {
        self.connection.with(|c| c.is_active())
    }

    /// Eager reconnection, then the inactive listener loop until the owner is disposed.
    pub fn start(&self) {
        let context = *self;
        let dapp = self.dapp();
        leptos::task::spawn_local(async move {
            dapp.mount().await;
            context.tried.set(dapp.tried());
            context.connection.set(dapp.snapshot());
            dapp.listener().run().await;
        });
        on_cleanup(move || {
            context.dapp.try_with_value(|dapp| dapp.unmount());
        });
    }

    pub fn connect(&self) {
        let context = *self;
        let dapp = self.dapp();
        context.error.set(None);
        context.pending.set(true);
        leptos::task::spawn_local(async move {
            if let Err(e) = dapp.connect().await {
                log::warn!("[CONNECT] {}", e);
                if !e.is_benign() {
                    context.error.set(Some(e.to_string()));
                }
            }
            context.pending.set(false);
        });
    }

    pub fn disconnect(&self) {
        self.dapp().disconnect();
        self.last_greeting.set(None);
        self.last_receipt.set(None);
        self.error.set(None);
    }

    pub fn get_greeting(&self) {
        let context = *self;
        let dapp = self.dapp();
        leptos::task::spawn_local(async move {
            if let Some(greeting) = dapp.get_greeting().await {
                context.last_greeting.set(Some(greeting));
            }
        });
    }

    pub fn set_hello_greeting(&self) {
        let context = *self;
        let dapp = self.dapp();
        context.pending.set(true);
        leptos::task::spawn_local(async move {
            if let Some(receipt) = dapp.set_hello_greeting().await {
                context.last_receipt.set(Some(receipt));
            }
            context.pending.set(false);
        });
    }

    pub fn set_goodbye_greeting(&self) {
        let context = *self;
        let dapp = self.dapp();
        context.pending.set(true);
        leptos::task::spawn_local(async move {
            if let Some(receipt) = dapp.set_goodbye_greeting().await {
                context.last_receipt.set(Some(receipt));
            }
            context.pending.set(false);
        });
    }
}

pub fn provide_wallet_context(dapp: GreeterDapp) -> WalletContext {
    let context = WalletContext::new(dapp);
    provide_context(context);
    context.start();
    context
}

pub fn use_wallet_context() -> WalletContext {
    expect_context::<WalletContext>()
}
