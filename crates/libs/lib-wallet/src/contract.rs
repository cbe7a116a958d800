//! # Greeter Contract Binding
//!
//! ABI definitions for the deployed Greeter contract and a binding that
//! routes `greet()` through `eth_call` and `setGreeting(string)` through
//! `eth_sendTransaction` on the injected provider.
//!
//! A [`ContractBinding`] is derived from the connection state and never
//! mutated; the binder replaces it when the account, chain or provider
//! changes.

use std::fmt;
use std::rc::Rc;

use alloy_primitives::{Address, Bytes, TxHash};
use alloy_sol_types::{sol, SolCall};
use serde_json::json;
use shared::TransactionReceipt;

use crate::error::{Result, WalletError};
use crate::provider::Eip1193Provider;
use crate::store::ConnectionState;

sol! {
    function greet() external view returns (string memory);
    function setGreeting(string memory _greeting) external;
}

/// Who the contract calls are made as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerOrProvider {
    /// Calls and transactions are sent from this account.
    Signer(Address),
    /// No account: reads only.
    ReadOnly,
}

#[derive(Clone)]
pub struct ContractBinding {
    address: Address,
    signer: SignerOrProvider,
    chain_id: Option<u64>,
    provider: Option<Rc<dyn Eip1193Provider>>,
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .field("signer", &self.signer)
            .field("chain_id", &self.chain_id)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}

impl ContractBinding {
    /// Derive the binding for `address` from the current connection state.
    pub fn derive(address: Address, state: &ConnectionState) -> Self {
        let signer = match state.account {
            Some(account) => SignerOrProvider::Signer(account),
            None => SignerOrProvider::ReadOnly,
        };
        Self {
            address,
            signer,
            chain_id: state.chain_id,
            provider: state.provider.clone(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> SignerOrProvider {
        self.signer
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn provider(&self) -> Result<&Rc<dyn Eip1193Provider>> {
        self.provider
            .as_ref()
            .ok_or_else(|| WalletError::RemoteCall("Contract is not bound to a provider".to_string()))
    }

    /// `greet() -> string`
    pub async fn greet(&self) -> Result<String> {
        let provider = self.provider()?;
        let mut call = json!({
            "to": self.address,
            "data": Bytes::from(greetCall {}.abi_encode()),
        });
        if let SignerOrProvider::Signer(from) = self.signer {
            call["from"] = json!(from);
        }

        let value = provider.request("eth_call", json!([call, "latest"])).await?;
        let data: Bytes = serde_json::from_value(value)?;
        Ok(greetCall::abi_decode_returns(&data)?)
    }

    /// `setGreeting(text)`, submitted as a transaction from the bound account.
    pub async fn set_greeting(&self, text: &str) -> Result<TransactionReceipt> {
        let provider = self.provider()?;
        let from = match self.signer {
            SignerOrProvider::Signer(from) => from,
            SignerOrProvider::ReadOnly => {
                return Err(WalletError::RemoteCall(
                    "Read-only binding cannot send transactions".to_string(),
                ))
            }
        };

        let data = setGreetingCall {
            _greeting: text.to_string(),
        }
        .abi_encode();
        let tx = json!({
            "from": from,
            "to": self.address,
            "data": Bytes::from(data),
        });

        let value = provider.request("eth_sendTransaction", json!([tx])).await?;
        let transaction_hash: TxHash = serde_json::from_value(value)?;
        Ok(TransactionReceipt {
            transaction_hash,
            from,
        })
    }
}
