//! # Data Transfer Objects (DTOs)
//!
//! ## Module Organization
//!
//! - [`connection`] - Snapshot of the wallet connection for rendering
//! - [`receipt`] - Transaction submission result from the wallet
//!
//! ## Example JSON
//!
//! ```text
//! {
//!   "transactionHash": "0x9fc76417374aa880d4449a1f7f31ec597f00b1f6f3dd2d66f4c9c6c445836d8b",
//!   "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
//! }
//! ```

pub mod connection;
pub mod receipt;

pub use connection::*;
pub use receipt::*;
