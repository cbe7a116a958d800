//! # Contract Binder
//!
//! Keeps exactly one [`ContractBinding`] for the configured contract address,
//! re-derived whenever the account, chain id or provider handle changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy_primitives::Address;

use crate::config::{Config, CONTRACT_ADDRESS_ENV};
use crate::contract::ContractBinding;
use crate::error::{Result, WalletError};
use crate::provider::Eip1193Provider;
use crate::store::ConnectionState;

/// Inputs the binding is derived from.
#[derive(Clone)]
struct BindingKey {
    account: Option<Address>,
    chain_id: Option<u64>,
    provider: Option<Rc<dyn Eip1193Provider>>,
}

impl BindingKey {
    fn of(state: &ConnectionState) -> Self {
        Self {
            account: state.account,
            chain_id: state.chain_id,
            provider: state.provider.clone(),
        }
    }

    fn matches(&self, other: &BindingKey) -> bool {
        let same_provider = match (&self.provider, &other.provider) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.account == other.account && self.chain_id == other.chain_id && same_provider
    }
}

pub struct ContractBinder {
    address: Address,
    current: RefCell<Option<(BindingKey, Rc<ContractBinding>)>>,
    generation: Cell<u64>,
}

impl ContractBinder {
    /// Fails with [`WalletError::Configuration`] when the address is missing or malformed.
    pub fn new(contract_address: Option<&str>) -> Result<Self> {
        let raw = contract_address
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                WalletError::Configuration(format!("{} must be set to the deployed contract address", CONTRACT_ADDRESS_ENV))
            })?;

        let address = raw.parse::<Address>().map_err(|e| {
            WalletError::Configuration(format!("{} is not a valid address ({:?}): {}", CONTRACT_ADDRESS_ENV, raw, e))
        })?;

        Ok(Self {
            address,
            current: RefCell::new(None),
            generation: Cell::new(0),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.contract_address.as_deref())
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Re-derive the binding if its inputs changed; otherwise return the current one.
    pub fn sync(&self, state: &ConnectionState) -> Rc<ContractBinding> {
        let key = BindingKey::of(state);
        if let Some((current_key, binding)) = self.current.borrow().as_ref() {
            if current_key.matches(&key) {
                return Rc::clone(binding);
            }
        }

        let binding = Rc::new(ContractBinding::derive(self.address, state));
        self.generation.set(self.generation.get() + 1);
        log::debug!("[BINDER] Rebound contract {:?}", binding);
        *self.current.borrow_mut() = Some((key, Rc::clone(&binding)));
        binding
    }

    pub fn current(&self) -> Option<Rc<ContractBinding>> {
        self.current.borrow().as_ref().map(|(_, binding)| Rc::clone(binding))
    }

    /// Number of bindings created so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::SignerOrProvider;
    use crate::test_support::{MockProvider, ACCOUNT, CONTRACT, SECOND_ACCOUNT};

    #[test]
    fn test_missing_address_is_configuration_error() {
        for raw in [None, Some(""), Some("  ")] {
            let err = ContractBinder::new(raw).err().unwrap();
            assert!(matches!(err, WalletError::Configuration(_)));
        }
    }

    #[test]
    fn test_malformed_address_is_configuration_error() {
        let err = ContractBinder::new(Some("0x1234")).err().unwrap();
        assert!(matches!(err, WalletError::Configuration(_)));
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_values(Some(CONTRACT), None).unwrap();
        let binder = ContractBinder::from_config(&config).unwrap();
        assert_eq!(binder.address(), CONTRACT.parse::<Address>().unwrap());
        assert!(binder.current().is_none());
    }

    #[test]
    fn test_rebinds_only_when_inputs_change() {
        let binder = ContractBinder::new(Some(CONTRACT)).unwrap();
        let mock = MockProvider::new();
        let mut state = ConnectionState {
            chain_id: Some(4),
            account: Some(ACCOUNT),
            provider: Some(mock.clone()),
        };

        let first = binder.sync(&state);
        let again = binder.sync(&state);
        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(binder.generation(), 1);

        state.account = Some(SECOND_ACCOUNT);
        let second = binder.sync(&state);
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second.signer(), SignerOrProvider::Signer(SECOND_ACCOUNT));

        state.chain_id = Some(1337);
        binder.sync(&state);
        assert_eq!(binder.generation(), 3);
        assert_eq!(binder.current().unwrap().chain_id(), Some(1337));
    }

    #[test]
    fn test_empty_state_binds_read_only() {
        let binder = ContractBinder::new(Some(CONTRACT)).unwrap();
        let binding = binder.sync(&ConnectionState::default());
        assert_eq!(binding.signer(), SignerOrProvider::ReadOnly);
        assert_eq!(binding.address(), binder.address());
    }
}
