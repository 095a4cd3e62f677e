//! Common errors

#![allow(missing_copy_implementations)]

use std::{error::Error as StdError, fmt};

use http::StatusCode;
use sjwt_base64::InvalidBase64Data;
use thiserror::Error;

/// No secret was supplied, or the secret supplied is empty
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("JWT secret is not set")]
pub struct MissingSecret {
    _p: (),
}

pub(crate) const fn missing_secret() -> MissingSecret {
    MissingSecret { _p: () }
}

/// The provided name could not be matched with supported algorithms
#[derive(Debug, Error)]
#[error("'{alg}' does not match supported algorithms")]
pub struct UnknownAlgorithm {
    alg: String,
}

#[inline]
pub(crate) fn unknown_algorithm(alg: String) -> UnknownAlgorithm {
    UnknownAlgorithm { alg }
}

/// The signature did not match
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("signature mismatch")]
pub struct SignatureMismatch {
    _p: (),
}

pub(crate) const fn signature_mismatch() -> SignatureMismatch {
    SignatureMismatch { _p: () }
}

/// Unexpected error (possibly a bug)
#[derive(Debug, Error)]
#[error("unexpected error")]
pub struct Unexpected {
    #[from]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

pub(crate) fn unexpected(
    source: impl Into<Box<dyn StdError + Send + Sync + 'static>>,
) -> Unexpected {
    Unexpected {
        source: source.into(),
    }
}

/// One of the three dot-separated sections of a compact token
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    /// The JOSE header
    Header,
    /// The claims payload
    Payload,
    /// The signature
    Signature,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Header => "header",
            Self::Payload => "payload",
            Self::Signature => "signature",
        })
    }
}

/// The category of a hard failure
///
/// Hard failures stop processing and carry no partial token data. An
/// invalid signature or an expired token is not a hard failure; those are
/// reported on [`Decoded`][crate::jwt::Decoded].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No secret was available
    MissingSecret,
    /// The token does not have exactly three segments
    InvalidFormat,
    /// A segment is not valid base64url
    InvalidEncoding,
    /// The header or payload is not valid JSON
    JsonParseError,
    /// The payload carries no integer `exp` claim
    MissingExpClaim,
    /// An unexpected failure
    Unexpected,
}

/// An error occurring while producing a JWT
#[derive(Debug, Error)]
pub enum EncodeError {
    /// No secret was available to sign with
    #[error(transparent)]
    MissingSecret(#[from] MissingSecret),

    /// An unexpected error
    #[error(transparent)]
    Unexpected(#[from] Unexpected),
}

impl EncodeError {
    /// The category of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSecret(_) => ErrorKind::MissingSecret,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

/// An error occurring while decoding a JWT
///
/// Returned only for input that cannot be a token at all. A well-formed
/// token that fails verification or has expired still decodes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No secret was available to verify with
    #[error(transparent)]
    MissingSecret(#[from] MissingSecret),

    /// The token does not split into header, payload, and signature
    #[error("invalid JWT format: expected 3 segments, found {segments}")]
    InvalidFormat {
        /// The number of `.`-separated segments found
        segments: usize,
    },

    /// A segment is not valid base64url
    #[error("invalid base64url encoding in JWT {section}")]
    InvalidEncoding {
        /// The offending section
        section: Section,
        /// The decoding failure
        source: InvalidBase64Data,
    },

    /// The header or payload is not valid JSON
    #[error("JWT {section} is not valid JSON")]
    JsonParse {
        /// The offending section
        section: Section,
        /// The parse failure
        source: serde_json::Error,
    },

    /// The payload has no `exp` claim that can be read as an integer
    #[error("missing \"exp\" in payload")]
    MissingExpClaim,
}

impl DecodeError {
    /// The category of this failure
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingSecret(_) => ErrorKind::MissingSecret,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::InvalidEncoding { .. } => ErrorKind::InvalidEncoding,
            Self::JsonParse { .. } => ErrorKind::JsonParseError,
            Self::MissingExpClaim => ErrorKind::MissingExpClaim,
        }
    }

    /// The section at fault, when the failure is local to one section
    #[must_use]
    pub fn section(&self) -> Option<Section> {
        match self {
            Self::InvalidEncoding { section, .. } | Self::JsonParse { section, .. } => {
                Some(*section)
            }
            _ => None,
        }
    }

    /// The HTTP status a caller should answer with
    ///
    /// Input that cannot be read as a token is an authentication failure.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

pub(crate) fn invalid_encoding(section: Section) -> impl FnOnce(InvalidBase64Data) -> DecodeError {
    move |source| DecodeError::InvalidEncoding { section, source }
}

pub(crate) fn json_parse(section: Section) -> impl FnOnce(serde_json::Error) -> DecodeError {
    move |source| DecodeError::JsonParse { section, source }
}

/// The reason a well-formed token was refused
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    /// The current time is past the token's `exp` claim
    #[error("token expired")]
    Expired,

    /// The signature was not produced with the expected secret
    #[error("invalid signature")]
    InvalidSignature,
}

impl Rejection {
    /// The HTTP status a caller should answer with
    ///
    /// An expired token asks the client to authenticate again, while a
    /// forged one is refused outright.
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::Expired => StatusCode::UNAUTHORIZED,
            Self::InvalidSignature => StatusCode::FORBIDDEN,
        }
    }
}
