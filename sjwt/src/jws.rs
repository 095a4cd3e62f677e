//! Signature computation and verification
//!
//! A compact token's signature covers the exact text
//! `<encoded header>.<encoded payload>` as it appears in the token. It is
//! never computed over a re-serialization of parsed claims: JSON field order
//! and whitespace are not stable across implementations, so only the
//! received bytes can be trusted to match what was signed.

use std::{error::Error as StdError, fmt};

use crate::{jwa::SigningAlgorithm, secret::Secret};

/// A JWS signer
pub trait Signer {
    /// The usable signature algorithms
    type Algorithm;

    /// The error returned on failure to sign
    type Error: fmt::Debug + fmt::Display + Sync + Send + 'static;

    /// Attempts to sign the data provided using the specified algorithm
    fn sign(&self, alg: Self::Algorithm, data: &[u8]) -> Result<Vec<u8>, Self::Error>;
}

/// A JWS verifier
pub trait Verifier {
    /// The verifiable signature algorithms
    type Algorithm;

    /// The error returned on a failure to verify
    type Error: StdError + Send + Sync + 'static;

    /// Attempts to verify the data against the signature using the
    /// specified algorithm
    ///
    /// Implementations must compare in constant time.
    fn verify(
        &self,
        alg: Self::Algorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<(), Self::Error>;
}

/// Computes the raw HMAC-SHA256 tag of `message`
#[must_use]
pub fn sign(message: &[u8], secret: &Secret) -> Vec<u8> {
    match Signer::sign(secret, SigningAlgorithm::HS256, message) {
        Ok(tag) => tag,
        Err(never) => match never {},
    }
}

/// Checks `candidate` against the HMAC-SHA256 tag of `message`
///
/// The comparison takes the same time wherever the first differing byte
/// falls.
#[must_use]
pub fn verify(message: &[u8], secret: &Secret, candidate: &[u8]) -> bool {
    Verifier::verify(secret, SigningAlgorithm::HS256, message, candidate).is_ok()
}
