use alloy_primitives::{Address, TxHash};
use serde::{Deserialize, Serialize};

/// Result of submitting a state-mutating contract call through the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub from: Address,
}
