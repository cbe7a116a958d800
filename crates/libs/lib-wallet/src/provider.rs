//! # Injected Provider Capability
//!
//! [`Eip1193Provider`] is the seam between the lifecycle core and the wallet
//! extension injected into the page. The browser implementation lives in
//! `wallet-web`; tests use a mock.
//!
//! Event subscriptions are scoped: [`subscribe`] returns a [`Subscription`]
//! guard that removes the handler when dropped.

use std::fmt;
use std::rc::Rc;

use alloy_primitives::Address;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{Result, WalletError};

/// Provider events the core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    AccountsChanged,
    ChainChanged,
    Connect,
    Disconnect,
}

impl EventKind {
    /// Event name as used by `ethereum.on(...)`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AccountsChanged => "accountsChanged",
            EventKind::ChainChanged => "chainChanged",
            EventKind::Connect => "connect",
            EventKind::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded provider event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
    Connect { chain_id: Option<u64> },
    Disconnect,
}

impl ProviderEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => EventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => EventKind::ChainChanged,
            ProviderEvent::Connect { .. } => EventKind::Connect,
            ProviderEvent::Disconnect => EventKind::Disconnect,
        }
    }

    /// Decode the payload an `ethereum.on(kind, ...)` callback receives.
    pub fn from_payload(kind: EventKind, payload: Value) -> Result<Self> {
        Ok(match kind {
            EventKind::AccountsChanged => ProviderEvent::AccountsChanged(parse_accounts(payload)?),
            EventKind::ChainChanged => ProviderEvent::ChainChanged(parse_chain_id_value(&payload)?),
            EventKind::Connect => ProviderEvent::Connect {
                chain_id: payload.get("chainId").and_then(|v| parse_chain_id_value(v).ok()),
            },
            EventKind::Disconnect => ProviderEvent::Disconnect,
        })
    }
}

pub type EventHandler = Rc<dyn Fn(&ProviderEvent)>;

/// Handle returned by [`Eip1193Provider::on`], passed back to `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// EIP-1193 wallet provider.
///
/// Only `is_available`, `request`, `on` and `off` must be implemented; the
/// account and chain queries are expressed on top of `request`.
#[async_trait(?Send)]
pub trait Eip1193Provider {
    /// Whether a provider object is injected into the host environment.
    fn is_available(&self) -> bool;

    /// Raw JSON-RPC request.
    async fn request(&self, method: &str, params: Value) -> Result<Value>;

    fn on(&self, kind: EventKind, handler: EventHandler) -> ListenerId;

    fn off(&self, kind: EventKind, id: ListenerId);

    /// Ask for account access. May open a permission prompt.
    async fn request_accounts(&self) -> Result<Vec<Address>> {
        let value = self.request("eth_requestAccounts", json!([])).await?;
        parse_accounts(value)
    }

    /// Accounts the site is already authorized for. Never prompts.
    async fn accounts_if_authorized(&self) -> Result<Vec<Address>> {
        let value = self.request("eth_accounts", json!([])).await?;
        parse_accounts(value)
    }

    async fn chain_id(&self) -> Result<u64> {
        let value = self.request("eth_chainId", json!([])).await?;
        parse_chain_id_value(&value)
    }
}

pub(crate) fn parse_accounts(value: Value) -> Result<Vec<Address>> {
    Ok(serde_json::from_value(value)?)
}

/// Chain ids arrive as hex strings from `eth_chainId` and `chainChanged`,
/// and as numbers from some legacy providers.
pub fn parse_chain_id_value(value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::String(raw) => shared::chain::parse_chain_id(raw),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| WalletError::Provider(format!("Invalid chain id: {}", value)))
}

/// Scoped event subscription. Dropping it removes the handler from the provider.
pub struct Subscription {
    provider: Rc<dyn Eip1193Provider>,
    kind: EventKind,
    id: ListenerId,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.provider.off(self.kind, self.id);
    }
}

pub fn subscribe(
    provider: &Rc<dyn Eip1193Provider>,
    kind: EventKind,
    handler: impl Fn(&ProviderEvent) + 'static,
) -> Subscription {
    let id = provider.on(kind, Rc::new(handler));
    Subscription {
        provider: Rc::clone(provider),
        kind,
        id,
    }
}
