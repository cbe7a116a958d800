//! # Chain Identifiers
//!
//! Networks the injected connector accepts by default, and their display names.

pub const MAINNET: u64 = 1;
pub const ROPSTEN: u64 = 3;
pub const RINKEBY: u64 = 4;
pub const GOERLI: u64 = 5;
pub const KOVAN: u64 = 42;
/// Local development node (hardhat).
pub const LOCAL: u64 = 1337;

/// Chain ids accepted when no override is configured.
pub const DEFAULT_SUPPORTED_CHAIN_IDS: &[u64] = &[MAINNET, ROPSTEN, RINKEBY, GOERLI, KOVAN, LOCAL];

/// Display name for a chain id, `"Unknown"` for anything not in the default set.
pub fn network_name(chain_id: u64) -> &'static str {
    match chain_id {
        MAINNET => "Mainnet",
        ROPSTEN => "Ropsten",
        RINKEBY => "Rinkeby",
        GOERLI => "Goerli",
        KOVAN => "Kovan",
        LOCAL => "Local",
        _ => "Unknown",
    }
}

/// Parse a chain id as reported by `eth_chainId` (`"0x4"`) or as a decimal string.
pub fn parse_chain_id(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
