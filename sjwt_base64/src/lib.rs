//! URL-safe base64 transport encoding for compact tokens
//!
//! Each segment of a compact token is base64url text: the standard base64
//! alphabet with `+` replaced by `-`, `/` replaced by `_`, and the trailing `=`
//! padding removed. Encoded output never contains `+`, `/`, or `=`.
//!
//! Decoding is deliberately forgiving about padding but strict about
//! everything else: missing `=` padding is restored to the next multiple of
//! four, `-` and `_` are translated back, and the result is decoded with the
//! standard alphabet. Any illegal character, misplaced padding, impossible
//! length, or non-canonical trailing bits is rejected with
//! [`InvalidBase64Data`].
//!
//! The underlying encoding/decoding mechanism is provided by the [`base64`][]
//! crate.
//!
//!   [`base64`]: https://docs.rs/base64
//!
//! # Example
//!
//! ```
//! let enc = sjwt_base64::encode([0xfb_u8, 0xff]);
//! assert_eq!(enc, "-_8");
//!
//! let dec = sjwt_base64::decode("-_8").unwrap();
//! assert_eq!(dec, vec![0xfb_u8, 0xff]);
//! ```
//!
//! Using [`Base64Url`] to hold raw bytes that display as base64url:
//!
//! ```
//! use sjwt_base64::Base64Url;
//!
//! let data = Base64Url::from_raw("👋 hello, world! 👋".as_bytes());
//! assert_eq!(data.to_string(), "8J-RiyBoZWxsbywgd29ybGQhIPCfkYs");
//! assert_eq!(format!("{:?}", data), "`8J-RiyBoZWxsbywgd29ybGQhIPCfkYs`");
//! ```
//!
//! # Serde
//!
//! With the `serde` feature enabled, [`Base64Url`] serializes as a base64url
//! string and deserializes through [`decode`].

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
    unused_must_use
)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use std::{error::Error, fmt};

use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD, URL_SAFE_NO_PAD},
        Engine,
    },
};

/// The standard alphabet, ignoring the unused low bits of the final symbol
const STANDARD_LOOSE_BITS: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// An error while decoding a value which is not properly formatted
/// base64url data
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidBase64Data {
    source: base64::DecodeError,
}

impl From<base64::DecodeError> for InvalidBase64Data {
    fn from(err: base64::DecodeError) -> Self {
        Self { source: err }
    }
}

impl fmt::Display for InvalidBase64Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid base64url data")
    }
}

impl Error for InvalidBase64Data {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Encodes bytes as URL-safe base64 without padding
#[must_use]
pub fn encode<T: AsRef<[u8]>>(raw: T) -> String {
    URL_SAFE_NO_PAD.encode(raw)
}

/// Decodes URL-safe base64 text, with or without trailing padding
///
/// # Errors
///
/// Returns an error if the text contains a character outside the base64
/// alphabet, has padding anywhere but the end, has a length that cannot be
/// produced by an encoder, or carries non-zero trailing bits.
pub fn decode<T: AsRef<[u8]>>(enc: T) -> Result<Vec<u8>, InvalidBase64Data> {
    Ok(STANDARD.decode(to_standard_form(enc.as_ref()))?)
}

/// Decodes URL-safe base64 text, ignoring non-zero trailing bits
///
/// Several texts that differ only in their final symbol decode to the same
/// bytes here. Callers that compare text must also check that
/// [`encode`] reproduces the input.
///
/// # Errors
///
/// Returns an error if the text contains a character outside the base64
/// alphabet, has padding anywhere but the end, or has a length that cannot
/// be produced by an encoder.
pub fn decode_loose<T: AsRef<[u8]>>(enc: T) -> Result<Vec<u8>, InvalidBase64Data> {
    Ok(STANDARD_LOOSE_BITS.decode(to_standard_form(enc.as_ref()))?)
}

/// Translates `-` and `_` and restores padding to a multiple of four
fn to_standard_form(enc: &[u8]) -> Vec<u8> {
    let mut std_form = Vec::with_capacity(enc.len() + 3);
    std_form.extend(enc.iter().map(|&b| match b {
        b'-' => b'+',
        b'_' => b'/',
        b => b,
    }));

    let rem = std_form.len() % 4;
    if rem != 0 {
        std_form.resize(std_form.len() + 4 - rem, b'=');
    }

    std_form
}

/// Calculates the length of the unpadded base64url encoding for `len` bytes
#[inline]
#[must_use]
pub const fn calc_encoded_len(len: usize) -> usize {
    let d = len / 3 * 4;
    match len % 3 {
        0 => d,
        m => d + m + 1,
    }
}

/// Owned bytes to be encoded as URL-safe base64 (no padding)
///
/// Encoding alphabet: `A`–`Z`, `a`–`z`, `0`–`9`, `-`, `_`
///
/// Data is held in memory in its raw form. Costs of encoding are only
/// incurred when serializing or displaying the value.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
#[must_use]
pub struct Base64Url(Vec<u8>);

impl Base64Url {
    /// Creates an empty buffer
    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Wraps raw, unencoded bytes
    ///
    /// To decode base64url text, use [`from_encoded()`][Self::from_encoded()].
    #[inline]
    pub fn from_raw<T: Into<Vec<u8>>>(raw: T) -> Self {
        Self(raw.into())
    }

    /// Decodes base64url text into a new owned buffer
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid base64url.
    pub fn from_encoded<T: AsRef<[u8]>>(enc: T) -> Result<Self, InvalidBase64Data> {
        decode(enc).map(Self)
    }

    /// Unwraps the underlying buffer
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    /// Provides access to the underlying bytes
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The length of this buffer once encoded
    #[inline]
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        calc_encoded_len(self.0.len())
    }

    /// Encodes the buffer as base64url text
    #[inline]
    #[must_use]
    pub fn encode(&self) -> String {
        encode(&self.0)
    }
}

impl From<Vec<u8>> for Base64Url {
    #[inline]
    fn from(buf: Vec<u8>) -> Self {
        Self(buf)
    }
}

impl From<&'_ [u8]> for Base64Url {
    #[inline]
    fn from(slice: &[u8]) -> Self {
        Self::from_raw(slice)
    }
}

impl From<Base64Url> for Vec<u8> {
    #[inline]
    fn from(val: Base64Url) -> Self {
        val.0
    }
}

impl AsRef<[u8]> for Base64Url {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Base64Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Base64Url {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}`", self.encode())
    }
}

/// Serialize the underlying byte array as a base64url string
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl serde::Serialize for Base64Url {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

/// Deserialize a base64url string and decode it into a byte array
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> serde::Deserialize<'de> for Base64Url {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let enc = <std::borrow::Cow<'de, str> as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_encoded(enc.as_bytes()).map_err(serde::de::Error::custom)
    }
}
