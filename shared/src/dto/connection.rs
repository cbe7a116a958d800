use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::chain::network_name;
use crate::utils::truncate_address;

/// Read-only view of the wallet connection, published to the UI on every change.
///
/// `active` is true only when an account and a provider are both present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<Address>,
    pub active: bool,
}

impl ConnectionSnapshot {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Human readable network label, empty when no chain is known.
    pub fn network_label(&self) -> String {
        match self.chain_id {
            Some(id) => format!("{} ({})", id, network_name(id)),
            None => String::new(),
        }
    }

    /// Checksummed account, shortened for display.
    pub fn short_account(&self) -> Option<String> {
        self.account.map(|a| truncate_address(&a.to_checksum(None)))
    }
}
