//! The authenticated user, as described by a token's claims

use serde_json::Value;

use crate::{claims::Claims, jwt::Decoded};

/// Attributes of the authenticated user
///
/// Owned by the caller, typically one per request. Nothing here is shared
/// between threads or requests.
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct UserContext {
    attributes: Claims,
}

impl UserContext {
    /// An empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// A context holding the claims of a valid token
    ///
    /// Returns `None` if the token is expired or its signature is invalid.
    #[must_use]
    pub fn from_decoded(decoded: &Decoded) -> Option<Self> {
        decoded.verdict().ok().map(|claims| Self {
            attributes: claims.clone(),
        })
    }

    /// Merges `attributes` in; later values replace earlier ones
    pub fn extend(&mut self, attributes: Claims) {
        self.attributes.extend(attributes);
    }

    /// All attributes
    #[must_use]
    pub fn attributes(&self) -> &Claims {
        &self.attributes
    }

    /// A single attribute
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Whether an attribute is present and not `null`
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).map_or(false, |v| !v.is_null())
    }

    /// The user's `id`
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.get("id")
    }

    /// The user's `email`
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    /// The user's `name`
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    /// Removes every attribute
    pub fn clear(&mut self) {
        self.attributes.clear();
    }
}

impl From<Claims> for UserContext {
    fn from(attributes: Claims) -> Self {
        Self { attributes }
    }
}
