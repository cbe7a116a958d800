//! Application constants

pub const APP_TITLE: &str = "Greeter";

/// Element shown by `index.html` until the wasm module has started.
pub const LOADING_ELEMENT_ID: &str = "leptos-loading";

// Block explorers by chain id
pub const EXPLORERS: &[(u64, &str)] = &[
    (1, "https://etherscan.io"),
    (3, "https://ropsten.etherscan.io"),
    (4, "https://rinkeby.etherscan.io"),
    (5, "https://goerli.etherscan.io"),
    (42, "https://kovan.etherscan.io"),
];

pub fn explorer_for(chain_id: u64) -> Option<&'static str> {
    EXPLORERS
        .iter()
        .find(|(id, _)| *id == chain_id)
        .map(|(_, url)| *url)
}
