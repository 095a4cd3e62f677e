//! Construction of the header and payload sections
//!
//! Both sections are serialized to compact JSON. Forward slashes are not
//! escaped, so header text matches what other JWT libraries produce. The
//! bytes returned here are exactly the bytes that get encoded and signed;
//! no other canonical form is promised.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sjwt_clock::{Clock, UnixTime};

use crate::{error, jwa::SigningAlgorithm};

/// Caller-supplied claims, in insertion order
pub type Claims = Map<String, Value>;

/// The issued-at claim name
pub const ISSUED_AT: &str = "iat";

/// The expiration claim name
pub const EXPIRES: &str = "exp";

/// The JOSE header written into every token
///
/// Serializes as `{"typ":"JWT","alg":"<alg>"}`, in that field order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Headers {
    typ: Cow<'static, str>,
    alg: SigningAlgorithm,
}

impl Headers {
    /// The only token type this crate produces
    pub const TYPE: &'static str = "JWT";

    /// Headers for a token signed with `alg`
    pub const fn new(alg: SigningAlgorithm) -> Self {
        Self {
            typ: Cow::Borrowed(Self::TYPE),
            alg,
        }
    }

    /// The token type
    #[must_use]
    pub fn typ(&self) -> &str {
        &self.typ
    }

    /// The signing algorithm
    #[must_use]
    pub fn alg(&self) -> SigningAlgorithm {
        self.alg
    }
}

impl Default for Headers {
    fn default() -> Self {
        Self::new(SigningAlgorithm::HS256)
    }
}

/// Serializes the JOSE header for `alg`
///
/// # Errors
///
/// Returns an error if serialization fails, which indicates a bug.
pub fn build_header(alg: SigningAlgorithm) -> Result<Vec<u8>, error::Unexpected> {
    serde_json::to_vec(&Headers::new(alg)).map_err(error::unexpected)
}

/// Copies `claims` and stamps them with `iat` and `exp`
///
/// `iat` is the clock's current time and `exp` lies `ttl_minutes` minutes
/// later. A zero or negative `ttl_minutes` yields a token that has expired
/// once any time at all has passed. Caller values for `iat` or `exp` are
/// replaced in place.
pub fn stamp<C: Clock>(claims: &Claims, ttl_minutes: i64, clock: &C) -> Claims {
    let iat = clock.now();
    let exp = iat.add_minutes(ttl_minutes);

    let mut stamped = claims.clone();
    stamped.insert(ISSUED_AT.to_owned(), Value::from(iat.as_secs()));
    stamped.insert(EXPIRES.to_owned(), Value::from(exp.as_secs()));
    stamped
}

/// Serializes the payload: `claims` plus `iat` and `exp`
///
/// # Errors
///
/// Returns an error if serialization fails, which indicates a bug.
pub fn build_payload<C: Clock>(
    claims: &Claims,
    ttl_minutes: i64,
    clock: &C,
) -> Result<Vec<u8>, error::Unexpected> {
    serde_json::to_vec(&stamp(claims, ttl_minutes, clock)).map_err(error::unexpected)
}

/// 2^63, the first float above every `i64`
const I64_FLOAT_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Reads the `exp` claim as Unix seconds
///
/// An integer is taken as is. A float is truncated toward zero if the result
/// fits in an `i64`, and a string is accepted if it holds a decimal integer.
/// Anything else, including `null` or a float too large to represent, counts
/// as absent.
#[must_use]
pub fn expiration(claims: &Claims) -> Option<UnixTime> {
    let secs = match claims.get(EXPIRES)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| (-I64_FLOAT_BOUND..I64_FLOAT_BOUND).contains(f))
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    secs.map(UnixTime)
}
