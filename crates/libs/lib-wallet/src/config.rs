//! # dApp Configuration
//!
//! The deployed Greeter contract address is the only required value. It is
//! supplied by the deployment pipeline, either at build time (wasm frontend)
//! or through the process environment (native tooling and tests).
//!
//! | Variable | Required | Meaning |
//! |---|---|---|
//! | `GREETER_CONTRACT_ADDRESS` | yes | `0x`-prefixed contract address |
//! | `GREETER_SUPPORTED_CHAIN_IDS` | no | comma separated chain ids, overrides the default set |
//!
//! A missing address is not reported here: [`crate::binder::ContractBinder::new`]
//! rejects it, so the failure surfaces exactly where the binding is built.
//!
//! ```rust,no_run
//! use lib_wallet::config::Config;
//!
//! let config = Config::from_build_env()?;
//! println!("contract: {:?}", config.contract_address);
//! # Ok::<(), lib_wallet::error::WalletError>(())
//! ```

use std::env;

use shared::chain::DEFAULT_SUPPORTED_CHAIN_IDS;

use crate::error::{Result, WalletError};

pub const CONTRACT_ADDRESS_ENV: &str = "GREETER_CONTRACT_ADDRESS";
pub const SUPPORTED_CHAIN_IDS_ENV: &str = "GREETER_SUPPORTED_CHAIN_IDS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Raw contract address as configured; validated by the contract binder.
    pub contract_address: Option<String>,

    /// Chain ids the injected connector accepts.
    pub supported_chain_ids: Vec<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_address: None,
            supported_chain_ids: DEFAULT_SUPPORTED_CHAIN_IDS.to_vec(),
        }
    }
}

impl Config {
    /// Build from raw values, treating blank strings as unset.
    pub fn from_values(contract_address: Option<&str>, supported_chain_ids: Option<&str>) -> Result<Self> {
        let contract_address = contract_address
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let supported_chain_ids = match supported_chain_ids.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_chain_ids(raw)?,
            None => DEFAULT_SUPPORTED_CHAIN_IDS.to_vec(),
        };

        let config = Self {
            contract_address,
            supported_chain_ids,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let address = env::var(CONTRACT_ADDRESS_ENV).ok();
        let chains = env::var(SUPPORTED_CHAIN_IDS_ENV).ok();
        Self::from_values(address.as_deref(), chains.as_deref())
    }

    /// Load configuration baked in at compile time (used by the wasm frontend).
    pub fn from_build_env() -> Result<Self> {
        Self::from_values(
            option_env!("GREETER_CONTRACT_ADDRESS"),
            option_env!("GREETER_SUPPORTED_CHAIN_IDS"),
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.supported_chain_ids.is_empty() {
            return Err(WalletError::Configuration(format!(
                "{} must list at least one chain id",
                SUPPORTED_CHAIN_IDS_ENV
            )));
        }
        Ok(())
    }
}

fn parse_chain_ids(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            shared::chain::parse_chain_id(part).ok_or_else(|| {
                WalletError::Configuration(format!(
                    "{} contains an invalid chain id: {:?}",
                    SUPPORTED_CHAIN_IDS_ENV, part
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_values(None, None).unwrap();
        assert_eq!(config.contract_address, None);
        assert_eq!(config.supported_chain_ids, vec![1, 3, 4, 5, 42, 1337]);
    }

    #[test]
    fn test_blank_address_is_unset() {
        let config = Config::from_values(Some("   "), None).unwrap();
        assert_eq!(config.contract_address, None);
    }

    #[test]
    fn test_chain_override() {
        let config = Config::from_values(
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            Some("4, 0x539"),
        )
        .unwrap();
        assert_eq!(
            config.contract_address.as_deref(),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(config.supported_chain_ids, vec![4, 1337]);
    }

    #[test]
    fn test_invalid_chain_override() {
        let err = Config::from_values(None, Some("4,rinkeby")).unwrap_err();
        assert!(matches!(err, WalletError::Configuration(_)));
    }

    #[test]
    fn test_from_env_reads_both_variables() {
        env::set_var(CONTRACT_ADDRESS_ENV, "0x5FbDB2315678afecb367f032d93F642f64180aa3");
        env::set_var(SUPPORTED_CHAIN_IDS_ENV, "1337");
        let config = Config::from_env();
        env::remove_var(CONTRACT_ADDRESS_ENV);
        env::remove_var(SUPPORTED_CHAIN_IDS_ENV);

        let config = config.unwrap();
        assert_eq!(
            config.contract_address.as_deref(),
            Some("0x5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(config.supported_chain_ids, vec![1337]);
    }

    #[test]
    fn test_empty_chain_list_rejected() {
        let config = Config {
            contract_address: None,
            supported_chain_ids: vec![],
        };
        assert!(config.validate().is_err());
    }
}
