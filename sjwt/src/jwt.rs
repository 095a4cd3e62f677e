//! Compact JSON Web Tokens signed with a shared secret
//!
//! A token is three base64url segments joined by `.`: the JOSE header, the
//! claims payload, and the HMAC of the first two segments exactly as they
//! appear in the token.
//!
//! Decoding separates two kinds of failure. Input that cannot be a token at
//! all is a [`DecodeError`]. A well-formed token that carries a bad signature
//! or has expired still decodes, and the verdict is reported on the
//! [`Decoded`] value alongside the parsed claims. Callers can then tell
//! garbage apart from a legitimate but refused token without parsing twice.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sjwt::{jwt::TokenEngine, Claims, Secret};
//!
//! let secret = Secret::from("s3cr3t");
//! let engine = TokenEngine::new();
//!
//! let mut claims = Claims::new();
//! claims.insert("user_id".into(), json!(123));
//!
//! let token = engine.encode(&claims, 60, &secret).unwrap();
//! let decoded = engine.decode(token.as_str(), &secret).unwrap();
//!
//! assert!(decoded.is_valid());
//! assert_eq!(decoded.payload()["user_id"], 123);
//! ```

use std::fmt;

use aliri_braid::braid;
use serde_json::Value;
use sjwt_base64::Base64Url;
use sjwt_clock::{Clock, System, UnixTime};

use crate::{
    claims::{self, Claims},
    error::{self, DecodeError, EncodeError, Rejection, Section},
    jwa::SigningAlgorithm,
    jws::{Signer, Verifier},
    secret::{Secret, SecretProvider},
};

/// The outcome of decoding a token
pub type DecodeResult = Result<Decoded, DecodeError>;

/// A JSON Web Token
///
/// This type provides custom implementations of [`Display`][JwtRef#impl-Display] and
/// [`Debug`][JwtRef#impl-Debug] so that a token is not written to a log by accident.
#[braid(
    serde,
    debug = "owned",
    display = "owned",
    ord = "omit",
    ref_doc = "\
    A borrowed reference to a JSON Web Token ([`Jwt`])\n\
    \n\
    This type provides custom implementations of [`Display`][Self#impl-Display] and \
    [`Debug`][Self#impl-Debug] so that a token is not written to a log by accident.
    "
)]
#[must_use]
pub struct Jwt;

const REDACTED: &str = "***JWT***";

/// Prints a placeholder unless the alternate form, `{:#?}`, is requested
///
/// The alternate form prints the header and payload segments and hides the
/// signature behind an ellipsis. A width, as in `{:#8?}`, reveals that many
/// leading signature characters.
///
/// ```
/// # use sjwt::jwt::JwtRef;
/// let token = JwtRef::from_str("aGVhZGVy.cGF5bG9hZA.c2lnbmF0dXJl");
///
/// assert_eq!(format!("{:?}", token), "***JWT***");
/// assert_eq!(format!("{:#?}", token), "\"aGVhZGVy.cGF5bG9hZA.…\"");
/// assert_eq!(format!("{:#4?}", token), "\"aGVhZGVy.cGF5bG9hZA.c2ln…\"");
/// ```
impl fmt::Debug for JwtRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !f.alternate() {
            return f.write_str(REDACTED);
        }

        let (message, signature) = self.split_signature();
        f.write_str("\"")?;
        f.write_str(message)?;
        reveal(signature, f.width().unwrap_or(0), f)?;
        f.write_str("\"")
    }
}

/// Prints a placeholder unless the alternate form, `{:#}`, is requested
///
/// The alternate form prints the whole token. A width, as in `{:#8}`, limits
/// the signature to that many leading characters.
///
/// ```
/// # use sjwt::jwt::JwtRef;
/// let token = JwtRef::from_str("aGVhZGVy.cGF5bG9hZA.c2lnbmF0dXJl");
///
/// assert_eq!(format!("{}", token), "***JWT***");
/// assert_eq!(format!("{:#}", token), "aGVhZGVy.cGF5bG9hZA.c2lnbmF0dXJl");
/// assert_eq!(format!("{:#4}", token), "aGVhZGVy.cGF5bG9hZA.c2ln…");
/// ```
impl fmt::Display for JwtRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !f.alternate() {
            return f.write_str(REDACTED);
        }

        let (message, signature) = self.split_signature();
        f.write_str(message)?;
        reveal(signature, f.width().unwrap_or(usize::MAX), f)
    }
}

impl JwtRef {
    /// Splits after the last `.`, or treats the whole token as signature
    fn split_signature(&self) -> (&str, &str) {
        match self.0.rfind('.') {
            Some(idx) => self.0.split_at(idx + 1),
            None => ("", &self.0),
        }
    }
}

/// Writes at most `limit` characters of `signature`, marking any cut with `…`
fn reveal(signature: &str, limit: usize, f: &mut fmt::Formatter) -> fmt::Result {
    match signature.char_indices().nth(limit) {
        Some((cut, _)) => {
            f.write_str(&signature[..cut])?;
            f.write_str("…")
        }
        None => f.write_str(signature),
    }
}

/// A token that was read successfully
///
/// Holds the parsed header and claims even when the token is refused.
/// Consult [`is_valid()`][Self::is_valid()] or [`verdict()`][Self::verdict()]
/// before trusting the claims.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct Decoded {
    header: Value,
    payload: Claims,
    signature: Base64Url,
    expires_at: UnixTime,
    signature_valid: bool,
    token_expired: bool,
}

impl Decoded {
    /// The parsed JOSE header
    #[must_use]
    pub fn header(&self) -> &Value {
        &self.header
    }

    /// The parsed claims
    #[must_use]
    pub fn payload(&self) -> &Claims {
        &self.payload
    }

    /// Takes ownership of the parsed claims
    #[must_use]
    pub fn into_payload(self) -> Claims {
        self.payload
    }

    /// The raw signature bytes carried by the token
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        self.signature.as_slice()
    }

    /// The `exp` claim
    #[must_use]
    pub fn expires_at(&self) -> UnixTime {
        self.expires_at
    }

    /// Whether the signature matches the secret used to decode
    #[must_use]
    pub fn signature_valid(&self) -> bool {
        self.signature_valid
    }

    /// Whether the clock had passed `exp` at the time of decoding
    ///
    /// Any fraction of a second past `exp` counts.
    #[must_use]
    pub fn token_expired(&self) -> bool {
        self.token_expired
    }

    /// Whether the token is authentic and unexpired
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.signature_valid && !self.token_expired
    }

    /// The claims of a valid token, or the reason it was refused
    ///
    /// Expiration is reported ahead of a signature mismatch.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] when the token is not valid.
    pub fn verdict(&self) -> Result<&Claims, Rejection> {
        if self.token_expired {
            Err(Rejection::Expired)
        } else if !self.signature_valid {
            Err(Rejection::InvalidSignature)
        } else {
            Ok(&self.payload)
        }
    }
}

/// Produces and reads tokens
///
/// Holds the signing algorithm and the clock used for `iat`, `exp`, and the
/// expiration check. The secret is supplied on every call. An engine holds
/// no mutable state and may be shared between threads.
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct TokenEngine<C = System> {
    alg: SigningAlgorithm,
    clock: C,
}

impl TokenEngine {
    /// An HS256 engine reading the system clock
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> TokenEngine<C> {
    /// An HS256 engine reading the provided clock
    pub fn with_clock(clock: C) -> Self {
        Self {
            alg: SigningAlgorithm::default(),
            clock,
        }
    }

    /// Signs and verifies with `alg` instead
    ///
    /// Decoding always verifies with the configured algorithm. The `alg`
    /// named in a received header is never consulted.
    pub fn with_algorithm(self, alg: SigningAlgorithm) -> Self {
        Self { alg, ..self }
    }

    /// The signing algorithm
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.alg
    }

    /// The clock
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Issues a token for `claims`, expiring `ttl_minutes` from now
    ///
    /// The claims are copied and stamped with `iat` and `exp`. A zero or
    /// negative `ttl_minutes` issues a token that is already expired.
    ///
    /// # Errors
    ///
    /// Fails with [`EncodeError::MissingSecret`] if the secret is empty.
    /// No partial token is ever produced.
    pub fn encode<S>(&self, claims: &Claims, ttl_minutes: i64, secret: &S) -> Result<Jwt, EncodeError>
    where
        S: SecretProvider + ?Sized,
    {
        let secret = secret.secret()?;

        let header = Base64Url::from_raw(claims::build_header(self.alg)?);
        let payload = Base64Url::from_raw(claims::build_payload(claims, ttl_minutes, &self.clock)?);

        let expected_len = header.encoded_len()
            + payload.encoded_len()
            + sjwt_base64::calc_encoded_len(self.alg.signature_size())
            + 2;

        let mut token = String::with_capacity(expected_len);
        token.push_str(&header.encode());
        token.push('.');
        token.push_str(&payload.encode());

        let signature = match secret.sign(self.alg, token.as_bytes()) {
            Ok(tag) => tag,
            Err(never) => match never {},
        };

        token.push('.');
        token.push_str(&sjwt_base64::encode(signature));

        debug_assert_eq!(token.len(), expected_len);

        tracing::trace!(alg = %self.alg, ttl_minutes, "issued JWT");
        Ok(Jwt::new(token))
    }

    /// Reads `token`, checking its expiration and signature
    ///
    /// # Errors
    ///
    /// Fails, with no partial data, on the first of these problems found:
    ///
    /// * the secret is empty
    /// * the token does not have exactly three segments
    /// * a segment is not valid base64url
    /// * the header or payload is not valid JSON
    /// * the payload has no `exp` claim readable as an integer
    ///
    /// An expired token or a bad signature is not an error.
    pub fn decode<S>(&self, token: &str, secret: &S) -> DecodeResult
    where
        S: SecretProvider + ?Sized,
    {
        let result = self.try_decode(token, secret);

        match &result {
            Ok(decoded) => tracing::trace!(
                signature_valid = decoded.signature_valid,
                token_expired = decoded.token_expired,
                "decoded JWT"
            ),
            Err(err) => tracing::debug!(kind = ?err.kind(), error = %err, "unable to decode JWT"),
        }

        result
    }

    fn try_decode<S>(&self, token: &str, secret: &S) -> DecodeResult
    where
        S: SecretProvider + ?Sized,
    {
        let secret = secret.secret()?;

        let mut segments = token.split('.');
        let (Some(h), Some(p), Some(s), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(DecodeError::InvalidFormat {
                segments: token.split('.').count(),
            });
        };

        let header = sjwt_base64::decode(h).map_err(error::invalid_encoding(Section::Header))?;
        let payload = sjwt_base64::decode(p).map_err(error::invalid_encoding(Section::Payload))?;
        let signature = sjwt_base64::decode_loose(s)
            .map(Base64Url::from_raw)
            .map_err(error::invalid_encoding(Section::Signature))?;

        let header: Value =
            serde_json::from_slice(&header).map_err(error::json_parse(Section::Header))?;
        let payload: Value =
            serde_json::from_slice(&payload).map_err(error::json_parse(Section::Payload))?;

        let Value::Object(payload) = payload else {
            return Err(DecodeError::MissingExpClaim);
        };
        let expires_at = claims::expiration(&payload).ok_or(DecodeError::MissingExpClaim)?;

        let token_expired = self.clock.timestamp().is_after(expires_at);

        // Unused low bits in the final symbol let several texts decode to the
        // same tag. Only the text the signer would have written is accepted.
        let canonical = signature.encode() == s;

        let message = &token.as_bytes()[..h.len() + 1 + p.len()];
        let signature_valid = canonical
            && secret
                .verify(self.alg, message, signature.as_slice())
                .is_ok();

        Ok(Decoded {
            header,
            payload,
            signature,
            expires_at,
            signature_valid,
            token_expired,
        })
    }
}

/// Issues an HS256 token for `claims` using the system clock
///
/// # Errors
///
/// Fails with [`EncodeError::MissingSecret`] if `secret` is empty.
pub fn encode(
    claims: &Claims,
    ttl_minutes: i64,
    secret: impl AsRef<[u8]>,
) -> Result<Jwt, EncodeError> {
    TokenEngine::new().encode(claims, ttl_minutes, &Secret::new(secret.as_ref()))
}

/// Reads an HS256 token using the system clock
///
/// # Errors
///
/// See [`TokenEngine::decode()`].
pub fn decode(token: &str, secret: impl AsRef<[u8]>) -> DecodeResult {
    TokenEngine::new().decode(token, &Secret::new(secret.as_ref()))
}
