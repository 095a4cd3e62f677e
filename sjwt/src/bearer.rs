//! Pulling a token out of an authorization header value
//!
//! Only the raw header value is consulted. Fetching that value from a
//! request is left to the caller's framework.

use crate::jwt::JwtRef;

/// The position of the token in `Bearer <token>`
pub const DEFAULT_TOKEN_INDEX: usize = 1;

const BEARER: &str = "bearer";

/// Returns the whitespace-separated segment at `token_index`
///
/// ```
/// use sjwt::bearer::{extract_token, DEFAULT_TOKEN_INDEX};
///
/// let token = extract_token("Bearer abc.def.ghi", DEFAULT_TOKEN_INDEX).unwrap();
/// assert_eq!(token.as_str(), "abc.def.ghi");
///
/// assert!(extract_token("Bearer", DEFAULT_TOKEN_INDEX).is_none());
/// ```
#[must_use]
pub fn extract_token(header_value: &str, token_index: usize) -> Option<&JwtRef> {
    header_value
        .split_whitespace()
        .nth(token_index)
        .map(JwtRef::from_str)
}

/// Returns the token of a `Bearer <token>` value
///
/// The scheme is matched without regard to case. Anything after the token
/// is ignored.
#[must_use]
pub fn extract_bearer(header_value: &str) -> Option<&JwtRef> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next()?;

    if !scheme.eq_ignore_ascii_case(BEARER) {
        return None;
    }

    parts.next().map(JwtRef::from_str)
}
