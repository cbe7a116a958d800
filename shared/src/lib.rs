//! # Shared Data Transfer Objects Library
//!
//! Types passed between the wallet lifecycle core (`lib-wallet`) and the
//! browser frontend (`wallet-web`).
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::connection`]**: Read-only view of the wallet connection
//!   - **[`dto::receipt`]**: Result of a state-mutating contract call
//! - **[`chain`]**: Chain identifiers and display names
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!
//! ## Wire Format
//!
//! DTOs crossing the JavaScript boundary follow the JSON-RPC conventions of
//! the wallet provider:
//! - Field names are **camelCase** (`transactionHash`, `chainId`)
//! - Addresses and hashes are `0x`-prefixed hex strings
//! - Optional fields are omitted when `None`
//!
//! ## Usage
//!
//! ```rust
//! use shared::chain::network_name;
//! use shared::utils::truncate_address;
//!
//! assert_eq!(network_name(4), "Rinkeby");
//! assert_eq!(
//!     truncate_address("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
//!     "0x5FbD...0aa3"
//! );
//! ```

pub mod chain;
pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
