//! # Formatting Utilities for the Greeter page
//!
//! Display helpers for connection fields and transaction hashes.
//! For address formatting, use [`shared::utils::format_address`] or [`shared::utils::truncate_address`].

use alloy_primitives::TxHash;
use shared::ConnectionSnapshot;

use super::constants::explorer_for;

/// Chain id as shown in the header, e.g. `"4 (Rinkeby)"`, or a placeholder.
pub fn format_chain(snapshot: &ConnectionSnapshot) -> String {
    if snapshot.chain_id.is_some() {
        snapshot.network_label()
    } else {
        "-".to_string()
    }
}

/// Shortened checksummed account, or a placeholder.
pub fn format_account(snapshot: &ConnectionSnapshot) -> String {
    snapshot.short_account().unwrap_or_else(|| "-".to_string())
}

/// Transaction hash with the middle elided (e.g. `0x1234...cdef`).
pub fn format_tx_hash(hash: &TxHash) -> String {
    shared::utils::format_address(&hash.to_string(), 6, 4)
}

/// Explorer link for a transaction on chains that have one.
pub fn tx_url(chain_id: Option<u64>, hash: &TxHash) -> Option<String> {
    let base = explorer_for(chain_id?)?;
    Some(format!("{}/tx/{}", base, hash))
}
