//! # lib-wallet
//!
//! Wallet connection lifecycle for the Greeter dApp, independent of any UI
//! framework:
//!
//! - [`connector`] - injected EIP-1193 connector restricted to supported chains
//! - [`store`] - the single source of truth for the connection state
//! - [`eager`] - one silent reconnection attempt per lifetime
//! - [`listener`] - activation on provider events while inactive
//! - [`binder`] / [`contract`] - Greeter contract binding and calls
//! - [`session`] - everything wired together behind the UI actions
//!
//! Everything is single-threaded (`Rc`/`RefCell`) to match the browser event loop.

pub mod binder;
pub mod config;
pub mod connector;
pub mod contract;
pub mod eager;
pub mod error;
pub mod listener;
pub mod provider;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use binder::ContractBinder;
pub use config::Config;
pub use connector::{ActivationMode, InjectedConnector};
pub use contract::{ContractBinding, SignerOrProvider};
pub use eager::EagerConnect;
pub use error::{ProviderRpcError, Result, WalletError};
pub use listener::{InactiveListener, ListenerState};
pub use provider::{Eip1193Provider, EventHandler, EventKind, ListenerId, ProviderEvent, Subscription};
pub use session::{GreeterDapp, GOODBYE_GREETING, HELLO_GREETING};
pub use store::{ConnectionState, ConnectionStore, StoreObserver};
