//! # Shared Utility Functions
//!
//! ## Address Formatting
//!
//! Functions for formatting `0x`-prefixed Ethereum addresses for display:
//! - [`format_address`] - Keep the `0x` prefix, the first N and last M hex digits
//! - [`truncate_address`] - [`format_address`] with 4/4 digits
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
//! assert_eq!(format_address(address, 4, 4), "0x5FbD...0aa3");
//! ```

/// Format an address by showing the first `prefix_len` and last `suffix_len` hex digits.
///
/// The `0x` prefix is preserved and not counted. Addresses that are too short
/// to shorten are returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
/// assert_eq!(format_address(addr, 4, 4), "0xf39F...2266");
/// assert_eq!(format_address(addr, 6, 2), "0xf39Fd6...66");
/// assert_eq!(format_address("0x1234", 4, 4), "0x1234");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let (lead, digits) = match address.strip_prefix("0x") {
        Some(rest) => ("0x", rest),
        None => ("", address),
    };

    if !digits.is_ascii() || digits.len() <= prefix_len + suffix_len {
        return address.to_string();
    }

    let prefix = &digits[..prefix_len];
    let suffix = &digits[digits.len() - suffix_len..];

    format!("{}{}...{}", lead, prefix, suffix)
}

/// Format an address with 4 leading and 4 trailing hex digits.
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// assert_eq!(
///     truncate_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
///     "0xf39F...2266"
/// );
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 4, 4)
}
