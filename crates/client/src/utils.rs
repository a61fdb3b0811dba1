//! Formatting helpers.

/// Shortens an address for display: the first 6 and the last 4 characters joined with `...`.
///
/// Strings too short to shorten are returned unchanged.
pub fn truncate_address(address: &str) -> String {
    let chars = address.chars().count();
    if chars <= 10 {
        return address.to_string();
    }
    let head = address.chars().take(6).collect::<String>();
    let tail = address.chars().skip(chars - 4).collect::<String>();
    format!("{head}...{tail}")
}
