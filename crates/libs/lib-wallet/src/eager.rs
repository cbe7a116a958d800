//! # Eager Reconnection
//!
//! One silent reconnection attempt per process lifetime. The attempt probes
//! authorization with the non-prompting account query, swallows every error,
//! and always ends with `tried == true`.
//!
//! `tried` is also raised when a session becomes active by other means, but
//! [`EagerConnect::is_complete`] only turns true once the attempt itself has
//! resolved. The inactive listener is gated on the latter.

use std::cell::Cell;
use std::rc::Rc;

use crate::connector::{ActivationMode, InjectedConnector};
use crate::store::ConnectionStore;

#[derive(Default)]
struct EagerInner {
    started: Cell<bool>,
    tried: Cell<bool>,
    completed: Cell<bool>,
}

/// Shared handle; clones observe the same `tried` flag.
#[derive(Clone, Default)]
pub struct EagerConnect {
    inner: Rc<EagerInner>,
}

impl EagerConnect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tried(&self) -> bool {
        self.inner.tried.get()
    }

    /// The silent attempt has resolved (or was skipped).
    pub fn is_complete(&self) -> bool {
        self.inner.completed.get()
    }

    /// A session became active by other means; eager reconnection is moot.
    pub fn mark_tried(&self) {
        if !self.inner.tried.replace(true) {
            log::debug!("[EAGER] Marked as tried");
        }
    }

    /// Run the silent attempt. Later calls do not touch the provider and
    /// return the current flag.
    pub async fn run(&self, connector: &InjectedConnector, store: &ConnectionStore) -> bool {
        if self.inner.started.replace(true) {
            return self.tried();
        }
        let epoch = store.epoch();

        if !connector.provider().is_available() {
            log::info!("[EAGER] No injected provider, skipping reconnection");
        } else if store.is_active() {
            log::debug!("[EAGER] Session already active, skipping reconnection");
        } else if connector.is_authorized().await {
            match store.activate_since(connector, ActivationMode::Silent, epoch).await {
                Ok(()) => log::info!("[EAGER] Restored previous wallet session"),
                Err(e) => log::debug!("[EAGER] Silent reconnection skipped: {}", e),
            }
        } else {
            log::debug!("[EAGER] Site not authorized, skipping reconnection");
        }

        self.mark_tried();
        self.inner.completed.set(true);
        true
    }
}
