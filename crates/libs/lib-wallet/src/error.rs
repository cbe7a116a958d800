//! # Wallet Error Types
//!
//! [`WalletError`] covers every failure of the connection lifecycle and the
//! contract calls made through the injected provider.
//!
//! ## Propagation
//!
//! - Eager reconnection and the inactive listener swallow errors (logged).
//! - Explicit `connect` returns the error to the caller.
//! - Contract reads and writes log the error and return `None`.
//! - [`WalletError::Configuration`] is fatal at startup.
//!
//! ## Usage
//!
//! ```rust
//! use lib_wallet::error::WalletError;
//!
//! let err = WalletError::UnsupportedChain { chain_id: 56 };
//! assert_eq!(err.to_string(), "Unsupported chain id: 56");
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, WalletError>;

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;
/// EIP-1193 code for a method the site is not authorized to call.
pub const UNAUTHORIZED_CODE: i64 = 4100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No injected provider (`window.ethereum`) in the host environment.
    #[error("No injected wallet provider found")]
    NoProvider,

    /// The wallet is connected to a network the connector does not accept.
    #[error("Unsupported chain id: {chain_id}")]
    UnsupportedChain { chain_id: u64 },

    /// The user declined the permission prompt.
    #[error("User rejected the request")]
    UserRejected,

    /// Silent activation found no previously authorized account.
    #[error("Site is not authorized by the wallet")]
    Unauthorized,

    /// A deactivation happened while the activation was in flight.
    #[error("Activation superseded by a later deactivation")]
    Superseded,

    /// Any other provider or JSON-RPC failure.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Contract read or write failed.
    #[error("Remote call error: {0}")]
    RemoteCall(String),

    /// Missing or malformed deployment configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WalletError {
    /// Errors that leave the Connect affordance usable without user-facing noise.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            WalletError::NoProvider | WalletError::Unauthorized | WalletError::Superseded
        )
    }
}

/// JSON-RPC error object returned by an EIP-1193 provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderRpcError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

impl From<ProviderRpcError> for WalletError {
    fn from(err: ProviderRpcError) -> Self {
        match err.code {
            USER_REJECTED_CODE => WalletError::UserRejected,
            UNAUTHORIZED_CODE => WalletError::Unauthorized,
            code => WalletError::Provider(format!("{} (code {})", err.message, code)),
        }
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::Provider(format!("Malformed provider response: {}", err))
    }
}

impl From<alloy_sol_types::Error> for WalletError {
    fn from(err: alloy_sol_types::Error) -> Self {
        WalletError::RemoteCall(format!("ABI decoding failed: {}", err))
    }
}
