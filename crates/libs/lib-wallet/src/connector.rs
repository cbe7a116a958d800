//! # Injected Connector
//!
//! Wraps the injected provider and the set of chain ids this dApp accepts.
//! Activation resolves an [`Activation`] (provider, chain id, account) or one
//! of `NoProvider`, `Unauthorized`, `UserRejected`, `UnsupportedChain`.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use alloy_primitives::Address;

use crate::error::{Result, WalletError};
use crate::provider::Eip1193Provider;

/// How accounts are obtained during activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationMode {
    /// `eth_requestAccounts`: may open the wallet's permission prompt.
    Interactive,
    /// `eth_accounts`: query only, never prompts.
    Silent,
}

/// Outcome of a successful activation.
#[derive(Clone)]
pub struct Activation {
    pub provider: Rc<dyn Eip1193Provider>,
    pub chain_id: u64,
    pub account: Address,
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("chain_id", &self.chain_id)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct InjectedConnector {
    provider: Rc<dyn Eip1193Provider>,
    supported_chain_ids: BTreeSet<u64>,
}

impl InjectedConnector {
    pub fn new(provider: Rc<dyn Eip1193Provider>, supported_chain_ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            provider,
            supported_chain_ids: supported_chain_ids.into_iter().collect(),
        }
    }

    /// Connector accepting Mainnet, Ropsten, Rinkeby, Goerli, Kovan and a local node.
    pub fn with_default_chains(provider: Rc<dyn Eip1193Provider>) -> Self {
        Self::new(provider, shared::chain::DEFAULT_SUPPORTED_CHAIN_IDS.iter().copied())
    }

    pub fn provider(&self) -> &Rc<dyn Eip1193Provider> {
        &self.provider
    }

    pub fn supported_chain_ids(&self) -> &BTreeSet<u64> {
        &self.supported_chain_ids
    }

    pub fn is_supported(&self, chain_id: u64) -> bool {
        self.supported_chain_ids.contains(&chain_id)
    }

    /// Non-prompting probe: is a provider present and has it authorized this site?
    pub async fn is_authorized(&self) -> bool {
        if !self.provider.is_available() {
            return false;
        }
        match self.provider.accounts_if_authorized().await {
            Ok(accounts) => !accounts.is_empty(),
            Err(e) => {
                log::debug!("[CONNECTOR] Authorization probe failed: {}", e);
                false
            }
        }
    }

    pub async fn activate(&self, mode: ActivationMode) -> Result<Activation> {
        if !self.provider.is_available() {
            return Err(WalletError::NoProvider);
        }

        let accounts = match mode {
            ActivationMode::Interactive => self.provider.request_accounts().await?,
            ActivationMode::Silent => self.provider.accounts_if_authorized().await?,
        };
        let account = match accounts.first() {
            Some(account) => *account,
            None if mode == ActivationMode::Silent => return Err(WalletError::Unauthorized),
            None => return Err(WalletError::Provider("Wallet returned no accounts".to_string())),
        };

        let chain_id = self.provider.chain_id().await?;
        if !self.is_supported(chain_id) {
            return Err(WalletError::UnsupportedChain { chain_id });
        }

        Ok(Activation {
            provider: Rc::clone(&self.provider),
            chain_id,
            account,
        })
    }
}
