//! Shared secrets and where to find them
//!
//! The secret is owned entirely by the caller. This crate never generates
//! one, never persists one, and never writes one to a log. Encoding and
//! decoding take the secret explicitly; a [`SecretProvider`] exists so that
//! an application can decide once where the secret lives and hand the same
//! provider to every call site.

use std::{env, fmt, sync::Arc};

use once_cell::sync::OnceCell;
use sjwt_base64::Base64Url;

use crate::error;

/// The shared key used to compute and verify signatures
///
/// Opaque bytes. The [`Debug`] implementation never prints them.
#[derive(Clone, PartialEq, Eq)]
#[must_use]
pub struct Secret {
    key: Base64Url,
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Secret { .. }")
    }
}

impl Secret {
    /// A secret holding the provided bytes
    pub fn new(key: impl Into<Base64Url>) -> Self {
        Self { key: key.into() }
    }

    /// Whether the secret holds no bytes at all
    ///
    /// An empty secret cannot be used to sign or verify.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key.as_slice().is_empty()
    }

    #[inline]
    pub(crate) fn expose(&self) -> &[u8] {
        self.key.as_slice()
    }
}

impl From<&'_ str> for Secret {
    #[inline]
    fn from(key: &str) -> Self {
        Self::new(key.as_bytes())
    }
}

impl From<String> for Secret {
    #[inline]
    fn from(key: String) -> Self {
        Self::new(key.into_bytes())
    }
}

impl From<&'_ [u8]> for Secret {
    #[inline]
    fn from(key: &[u8]) -> Self {
        Self::new(key)
    }
}

impl From<Vec<u8>> for Secret {
    #[inline]
    fn from(key: Vec<u8>) -> Self {
        Self::new(key)
    }
}

/// A source for the shared secret
pub trait SecretProvider {
    /// Gets the secret
    ///
    /// # Errors
    ///
    /// Returns an error if no non-empty secret is available.
    fn secret(&self) -> Result<&Secret, error::MissingSecret>;
}

/// A secret is its own provider
impl SecretProvider for Secret {
    #[inline]
    fn secret(&self) -> Result<&Secret, error::MissingSecret> {
        if self.is_empty() {
            Err(error::missing_secret())
        } else {
            Ok(self)
        }
    }
}

impl<T> SecretProvider for &'_ T
where
    T: SecretProvider + ?Sized,
{
    #[inline]
    fn secret(&self) -> Result<&Secret, error::MissingSecret> {
        T::secret(&**self)
    }
}

impl<T> SecretProvider for Box<T>
where
    T: SecretProvider + ?Sized,
{
    #[inline]
    fn secret(&self) -> Result<&Secret, error::MissingSecret> {
        T::secret(&**self)
    }
}

impl<T> SecretProvider for Arc<T>
where
    T: SecretProvider + ?Sized,
{
    #[inline]
    fn secret(&self) -> Result<&Secret, error::MissingSecret> {
        T::secret(&**self)
    }
}

/// A secret read from the process environment
///
/// The variables are consulted in order and the first non-empty value wins.
/// That value is memoized on first successful use; later changes to the
/// environment are not observed until [`reset()`][Self::reset()] is called.
/// A failed lookup is not memoized, so a secret set later is still found.
///
/// The memoized value is written at most once and read without locking
/// afterward, so a provider may be shared freely between threads.
#[derive(Debug)]
pub struct EnvSecret {
    vars: Vec<String>,
    cached: OnceCell<Secret>,
}

impl EnvSecret {
    /// The variables consulted by [`EnvSecret::new()`], in order
    pub const DEFAULT_VARS: [&'static str; 2] = ["SECRET_JWT", "JWT_SECRET"];

    /// Reads the secret from `SECRET_JWT`, falling back to `JWT_SECRET`
    #[must_use]
    pub fn new() -> Self {
        Self::from_vars(Self::DEFAULT_VARS)
    }

    /// Reads the secret from the given variables, in order
    #[must_use]
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(Into::into).collect(),
            cached: OnceCell::new(),
        }
    }

    /// Forgets the memoized secret, so the next use reads the environment again
    pub fn reset(&mut self) {
        if self.cached.take().is_some() {
            tracing::trace!("discarded memoized JWT secret");
        }
    }

    fn load(&self) -> Result<Secret, error::MissingSecret> {
        for var in &self.vars {
            match env::var(var) {
                Ok(value) if !value.is_empty() => {
                    tracing::debug!(var = %var, "loaded JWT secret from environment");
                    return Ok(Secret::from(value));
                }
                _ => {}
            }
        }

        tracing::debug!(vars = ?self.vars, "no JWT secret found in environment");
        Err(error::missing_secret())
    }
}

impl Default for EnvSecret {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecret {
    fn secret(&self) -> Result<&Secret, error::MissingSecret> {
        self.cached.get_or_try_init(|| self.load())
    }
}
