//! In-memory EIP-1193 provider for unit tests.
//!
//! Serves accounts and chain id, records every request, keeps registered
//! event handlers so tests can emit events, and plays a Greeter contract
//! behind `eth_call` / `eth_sendTransaction`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use alloy_primitives::{address, keccak256, Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};

use crate::contract::{greetCall, setGreetingCall};
use crate::error::{ProviderRpcError, Result, WalletError};
use crate::provider::{Eip1193Provider, EventHandler, EventKind, ListenerId, ProviderEvent};

pub const ACCOUNT: Address = address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
pub const SECOND_ACCOUNT: Address = address!("0x70997970c51812dc3a010c7d01b50e0d17dc79c8");
pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub struct MockProvider {
    available: Cell<bool>,
    authorized: Cell<bool>,
    rejecting: Cell<bool>,
    failing_contract: Cell<bool>,
    chain_id: Cell<u64>,
    accounts: RefCell<Vec<Address>>,
    greeting: RefCell<String>,
    sent: RefCell<Vec<(Address, String)>>,
    calls: RefCell<Vec<String>>,
    handlers: RefCell<BTreeMap<EventKind, Vec<(ListenerId, EventHandler)>>>,
    next_listener: Cell<u64>,
    hold: RefCell<Option<oneshot::Receiver<()>>>,
}

impl MockProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            available: Cell::new(true),
            authorized: Cell::new(false),
            rejecting: Cell::new(false),
            failing_contract: Cell::new(false),
            chain_id: Cell::new(4),
            accounts: RefCell::new(vec![ACCOUNT]),
            greeting: RefCell::new("Hello, Hardhat!".to_string()),
            sent: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            handlers: RefCell::new(BTreeMap::new()),
            next_listener: Cell::new(0),
            hold: RefCell::new(None),
        })
    }

    /// No extension injected into the page.
    pub fn missing() -> Rc<Self> {
        let mock = Self::new();
        mock.available.set(false);
        mock
    }

    pub fn with_chain_id(self: Rc<Self>, chain_id: u64) -> Rc<Self> {
        self.chain_id.set(chain_id);
        self
    }

    /// The site was authorized in an earlier visit.
    pub fn authorized(self: Rc<Self>) -> Rc<Self> {
        self.authorized.set(true);
        self
    }

    /// The user declines every permission prompt.
    pub fn rejecting(self: Rc<Self>) -> Rc<Self> {
        self.rejecting.set(true);
        self
    }

    pub fn failing_contract(self: Rc<Self>) -> Rc<Self> {
        self.failing_contract.set(true);
        self
    }

    pub fn account(&self) -> Address {
        self.accounts.borrow().first().copied().unwrap_or(ACCOUNT)
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.chain_id.set(chain_id);
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.borrow_mut() = accounts;
    }

    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.set(rejecting);
    }

    pub fn greeting(&self) -> String {
        self.greeting.borrow().clone()
    }

    pub fn sent_transactions(&self) -> Vec<(Address, String)> {
        self.sent.borrow().clone()
    }

    /// The next request stays pending until the returned sender fires.
    pub fn hold_next_request(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.hold.borrow_mut() = Some(rx);
        tx
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls.borrow().iter().filter(|m| m.as_str() == method).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().get(&kind).map_or(0, Vec::len)
    }

    pub fn total_handlers(&self) -> usize {
        self.handlers.borrow().values().map(Vec::len).sum()
    }

    /// Deliver an event to every handler registered for its kind.
    pub fn emit(&self, event: ProviderEvent) {
        let handlers: Vec<EventHandler> = self
            .handlers
            .borrow()
            .get(&event.kind())
            .map(|registered| registered.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(&event);
        }
    }

    fn contract_call(&self, params: &Value) -> Result<Value> {
        if self.failing_contract.get() {
            return Err(ProviderRpcError {
                code: -32603,
                message: "execution reverted".to_string(),
            }
            .into());
        }
        let data: Bytes = serde_json::from_value(params[0]["data"].clone())?;
        if !data.starts_with(&greetCall::SELECTOR) {
            return Err(WalletError::Provider("unknown selector".to_string()));
        }
        let encoded = greetCall::abi_encode_returns(&self.greeting.borrow());
        Ok(json!(Bytes::from(encoded)))
    }

    fn send_transaction(&self, params: &Value) -> Result<Value> {
        if self.rejecting.get() {
            return Err(ProviderRpcError {
                code: 4001,
                message: "User denied transaction signature".to_string(),
            }
            .into());
        }
        if self.failing_contract.get() {
            return Err(WalletError::Provider("insufficient funds".to_string()));
        }
        let from: Address = serde_json::from_value(params[0]["from"].clone())?;
        let data: Bytes = serde_json::from_value(params[0]["data"].clone())?;
        let call = setGreetingCall::abi_decode(&data)
            .map_err(|e| WalletError::Provider(e.to_string()))?;

        *self.greeting.borrow_mut() = call._greeting.clone();
        self.sent.borrow_mut().push((from, call._greeting));
        Ok(json!(keccak256(&data)))
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for MockProvider {
    fn is_available(&self) -> bool {
        self.available.get()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        self.calls.borrow_mut().push(method.to_string());

        let hold = self.hold.borrow_mut().take();
        if let Some(release) = hold {
            let _ = release.await;
        }

        match method {
            "eth_requestAccounts" => {
                if self.rejecting.get() {
                    return Err(ProviderRpcError {
                        code: 4001,
                        message: "User rejected the request.".to_string(),
                    }
                    .into());
                }
                self.authorized.set(true);
                Ok(json!(self.accounts.borrow().clone()))
            }
            "eth_accounts" => {
                if self.authorized.get() {
                    Ok(json!(self.accounts.borrow().clone()))
                } else {
                    Ok(json!([]))
                }
            }
            "eth_chainId" => Ok(json!(format!("{:#x}", self.chain_id.get()))),
            "eth_call" => self.contract_call(&params),
            "eth_sendTransaction" => self.send_transaction(&params),
            other => Err(WalletError::Provider(format!("unsupported method {}", other))),
        }
    }

    fn on(&self, kind: EventKind, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.handlers.borrow_mut().entry(kind).or_default().push((id, handler));
        id
    }

    fn off(&self, kind: EventKind, id: ListenerId) {
        if let Some(registered) = self.handlers.borrow_mut().get_mut(&kind) {
            registered.retain(|(existing, _)| *existing != id);
        }
    }
}
