//! Settings read from the process environment
//!
//! | Variable          | Default         |
//! |-------------------|-----------------|
//! | `JWT_EXPIRATION`  | `60` (minutes)  |
//! | `JWT_HEADER_NAME` | `Authorization` |
//! | `JWT_TOKEN_INDEX` | `1`             |
//!
//! A variable that is unset or cannot be parsed falls back to its default.
//! The secret itself is read by [`EnvSecret`][crate::secret::EnvSecret].

use std::env;

use crate::{bearer, jwt::JwtRef};

/// Token lifetime and header settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Token lifetime in minutes
    pub default_expiration: i64,
    /// The request header holding the token
    pub header_name: String,
    /// The whitespace-separated position of the token in the header value
    pub token_index: usize,
}

impl Settings {
    /// Minutes a token lives when nothing else is configured
    pub const DEFAULT_EXPIRATION: i64 = 60;

    /// The header consulted when nothing else is configured
    pub const DEFAULT_HEADER_NAME: &'static str = "Authorization";

    /// Reads settings from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let settings = Self {
            default_expiration: lookup("JWT_EXPIRATION")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.default_expiration),
            header_name: lookup("JWT_HEADER_NAME")
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.header_name),
            token_index: lookup("JWT_TOKEN_INDEX")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.token_index),
        };

        tracing::debug!(
            default_expiration = settings.default_expiration,
            header_name = %settings.header_name,
            token_index = settings.token_index,
            "loaded JWT settings"
        );

        settings
    }

    /// Finds the token in a value of the configured header
    #[must_use]
    pub fn extract_token<'a>(&self, header_value: &'a str) -> Option<&'a JwtRef> {
        bearer::extract_token(header_value, self.token_index)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_expiration: Self::DEFAULT_EXPIRATION,
            header_name: Self::DEFAULT_HEADER_NAME.to_owned(),
            token_index: bearer::DEFAULT_TOKEN_INDEX,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.default_expiration, 60);
        assert_eq!(settings.header_name, "Authorization");
        assert_eq!(settings.token_index, 1);
    }

    #[test]
    fn variables_override_defaults() {
        let settings = Settings::from_lookup(lookup(&[
            ("JWT_EXPIRATION", "15"),
            ("JWT_HEADER_NAME", "X-Auth-Token"),
            ("JWT_TOKEN_INDEX", "0"),
        ]));

        assert_eq!(settings.default_expiration, 15);
        assert_eq!(settings.header_name, "X-Auth-Token");
        assert_eq!(settings.extract_token("xyz").unwrap().as_str(), "xyz");
    }

    #[test]
    fn unparseable_values_fall_back() {
        let settings = Settings::from_lookup(lookup(&[
            ("JWT_EXPIRATION", "an hour"),
            ("JWT_HEADER_NAME", "  "),
            ("JWT_TOKEN_INDEX", "-1"),
        ]));

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn from_env_reads_the_process_environment() {
        // Only asserts on a variable no other test touches.
        env::set_var("JWT_HEADER_NAME", "X-From-Env");
        assert_eq!(Settings::from_env().header_name, "X-From-Env");
        env::remove_var("JWT_HEADER_NAME");
    }
}
