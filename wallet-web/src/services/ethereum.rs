//! Injected Ethereum Provider via wasm-bindgen
//!
//! JavaScript interop for `window.ethereum` (MetaMask and other EIP-1193
//! wallets) and its [`Eip1193Provider`] implementation.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use lib_wallet::{Eip1193Provider, EventHandler, EventKind, ListenerId, ProviderEvent, ProviderRpcError, WalletError};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(inline_js = "
export function hasInjectedProvider() {
    return typeof window !== 'undefined' && !!window.ethereum;
}

export async function ethereumRequest(method, params) {
    if (!window.ethereum) {
        throw { code: -32000, message: 'No injected provider' };
    }
    return await window.ethereum.request({ method, params });
}

export function ethereumOn(event, handler) {
    if (window.ethereum && typeof window.ethereum.on === 'function') {
        window.ethereum.on(event, handler);
    }
}

export function ethereumRemoveListener(event, handler) {
    if (window.ethereum && typeof window.ethereum.removeListener === 'function') {
        window.ethereum.removeListener(event, handler);
    }
}
")]
extern "C" {
    #[wasm_bindgen(js_name = hasInjectedProvider)]
    fn has_injected_provider() -> bool;

    #[wasm_bindgen(js_name = ethereumRequest, catch)]
    async fn ethereum_request(method: &str, params: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = ethereumOn)]
    fn ethereum_on(event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(js_name = ethereumRemoveListener)]
    fn ethereum_remove_listener(event: &str, handler: &js_sys::Function);
}

/// `window.ethereum`, with the JS closures of every registered handler kept alive.
#[derive(Default)]
pub struct BrowserEthereum {
    listeners: RefCell<HashMap<ListenerId, (EventKind, Closure<dyn Fn(JsValue)>)>>,
    next_id: Cell<u64>,
}

impl BrowserEthereum {
    pub fn new() -> Self {
        Self::default()
    }
}

fn to_js(value: &Value) -> lib_wallet::Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| WalletError::Provider(format!("Failed to encode request params: {}", e)))
}

fn from_js(value: JsValue) -> lib_wallet::Result<Value> {
    if value.is_undefined() {
        return Ok(Value::Null);
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| WalletError::Provider(format!("Failed to decode provider response: {}", e)))
}

/// Provider errors are JS objects (often `Error` instances) carrying `code` and `message`.
fn rpc_error(err: JsValue) -> WalletError {
    let field = |name: &str| js_sys::Reflect::get(&err, &JsValue::from_str(name)).ok();
    let code = field("code").and_then(|v| v.as_f64());
    let message = field("message")
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));

    match code {
        Some(code) => ProviderRpcError {
            code: code as i64,
            message,
        }
        .into(),
        None => WalletError::Provider(message),
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for BrowserEthereum {
    fn is_available(&self) -> bool {
        has_injected_provider()
    }

    async fn request(&self, method: &str, params: Value) -> lib_wallet::Result<Value> {
        if !self.is_available() {
            return Err(WalletError::NoProvider);
        }
        log::debug!("[ETHEREUM] {}", method);
        let result = ethereum_request(method, to_js(&params)?).await.map_err(rpc_error)?;
        from_js(result)
    }

    fn on(&self, kind: EventKind, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let closure = Closure::<dyn Fn(JsValue)>::new(move |payload: JsValue| {
            let event = from_js(payload).and_then(|value| ProviderEvent::from_payload(kind, value));
            match event {
                Ok(event) => handler(&event),
                Err(e) => log::warn!("[ETHEREUM] Ignoring malformed {} event: {}", kind, e),
            }
        });
        ethereum_on(kind.as_str(), closure.as_ref().unchecked_ref());
        self.listeners.borrow_mut().insert(id, (kind, closure));
        id
    }

    fn off(&self, kind: EventKind, id: ListenerId) {
        let removed = self.listeners.borrow_mut().remove(&id);
        if let Some((registered, closure)) = removed {
            debug_assert_eq!(registered, kind);
            ethereum_remove_listener(kind.as_str(), closure.as_ref().unchecked_ref());
        }
    }
}
