//! Signing algorithms
//!
//! Only the symmetric HMAC family from [RFC7518][] is implemented. Tokens
//! produced by this crate are signed with HS256 unless an engine is
//! configured otherwise.
//!
//! [RFC7518]: https://tools.ietf.org/html/rfc7518#section-3.2

pub mod hmac;

#[doc(inline)]
pub use hmac::SigningAlgorithm;
