//! Resource pattern grammar
//!
//! A pattern is either an exact view address or a prefix ending in a
//! single `*`. Any other use of `*` makes the pattern invalid, and invalid
//! patterns match nothing.

const WILDCARD: char = '*';

/// At most one `*`, and only as the final character
pub fn is_pattern_valid(pattern: &str) -> bool {
    match pattern.find(WILDCARD) {
        None => true,
        Some(index) => index == pattern.len() - WILDCARD.len_utf8(),
    }
}

/// Whether `pattern` covers `address`
pub fn is_match(pattern: &str, address: &str) -> bool {
    if !is_pattern_valid(pattern) {
        return false;
    }
    match pattern.strip_suffix(WILDCARD) {
        Some(prefix) => address.starts_with(prefix),
        None => pattern == address,
    }
}
