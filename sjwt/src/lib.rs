//! Compact JSON Web Tokens signed with HMAC, per [RFC7519][] and [RFC7515][]
//!
//! Tokens are issued from a map of claims, stamped with `iat` and `exp`, and
//! signed with a shared secret that the caller owns. Reading a token never
//! panics: malformed input yields a [`DecodeError`], and a well-formed token
//! reports its signature and expiration status alongside its claims.
//!
//! [RFC7515]: https://tools.ietf.org/html/rfc7515
//! [RFC7519]: https://tools.ietf.org/html/rfc7519
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sjwt::{error::ErrorKind, Claims};
//!
//! let mut claims = Claims::new();
//! claims.insert("user_id".into(), json!(123));
//!
//! let token = sjwt::encode(&claims, 60, "s3cr3t").unwrap();
//!
//! let decoded = sjwt::decode(token.as_str(), "s3cr3t").unwrap();
//! assert!(decoded.is_valid());
//! assert_eq!(decoded.payload()["user_id"], 123);
//!
//! let forged = sjwt::decode(token.as_str(), "guess").unwrap();
//! assert!(!forged.signature_valid());
//!
//! let err = sjwt::decode("abc.def", "s3cr3t").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidFormat);
//! ```
//!
//! Applications that keep the secret in the environment can hand an
//! [`EnvSecret`] to a [`TokenEngine`], and use [`bearer`] to find the token
//! in an `Authorization` header value.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_imports,
    unused_qualifications
)]
#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_must_use
)]

pub mod bearer;
pub mod claims;
pub mod config;
pub mod context;
pub mod error;
pub mod jwa;
pub mod jws;
pub mod jwt;
pub mod secret;

#[doc(inline)]
pub use claims::Claims;
#[doc(inline)]
pub use error::{DecodeError, EncodeError};
#[doc(inline)]
pub use jwt::{decode, encode, DecodeResult, Decoded, Jwt, JwtRef, TokenEngine};
#[doc(inline)]
pub use secret::{EnvSecret, Secret, SecretProvider};
