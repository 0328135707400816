//! Claims normalization.
//!
//! Identity providers hand us claims in whatever shape they like: a typed
//! struct from one verifier, a raw JSON body from another. Everything is
//! funnelled through [`normalize`] into a [`ClaimsMap`], a flat mapping from
//! claim name to JSON value, and all reads go through the accessors in
//! [`accessors`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use authenticator::claims::{normalize, ClaimsMap};
//!
//! let map = normalize(&verified_claims)?;
//! let email = map.string_field("email");
//! let groups = map.scope_values(&["groups"]);
//! let issued = map.issued_at_time()?;
//! ```

pub mod accessors;
pub mod value;

pub use accessors::{
    get_int_field, get_issued_at, get_issued_at_time, get_scope_values, get_string_field,
    ISSUED_AT_CLAIM,
};
pub use value::ClaimValue;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised while decoding claims or reading required claims.
///
/// Optional claims never produce these; see [`accessors`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// Claims could not be turned into a flat JSON object.
    #[error("Failed to decode claims: {0}")]
    Decode(String),

    /// A required claim is absent.
    #[error("token does not have {0} claim")]
    MissingClaim(String),

    /// A required claim is present but holds an incompatible value.
    #[error("{claim} '{value}' is not a number")]
    InvalidClaimType {
        /// Claim name.
        claim: String,
        /// Rendering of the offending value.
        value: String,
    },
}

// =============================================================================
// Canonical Mapping
// =============================================================================

/// Canonical claims mapping.
///
/// Keys are unique and two normalizations of the same input compare equal.
/// Values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimsMap(Map<String, Value>);

impl ClaimsMap {
    /// Build a mapping from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::Decode` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ClaimsError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => {
                let kind = json_kind(&other);
                tracing::debug!(
                    target: "authenticator.claims",
                    kind = kind,
                    "Claims rejected: top level is not an object"
                );
                Err(ClaimsError::Decode(format!(
                    "expected a JSON object, found {kind}"
                )))
            }
        }
    }

    /// Build a mapping from a JSON document, e.g. a decoded token body.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::Decode` if the bytes are not valid JSON or the
    /// document is not an object.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ClaimsError> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            tracing::debug!(target: "authenticator.claims", error = %e, "Failed to parse claims JSON");
            ClaimsError::Decode(e.to_string())
        })?;
        Self::from_value(value)
    }

    /// Raw value of a claim.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Consume the mapping, returning the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// See [`get_string_field`].
    #[must_use]
    pub fn string_field(&self, name: &str) -> &str {
        get_string_field(self, name)
    }

    /// See [`get_scope_values`].
    #[must_use]
    pub fn scope_values<S: AsRef<str>>(&self, scopes: &[S]) -> Vec<&str> {
        get_scope_values(self, scopes)
    }

    /// See [`get_issued_at`].
    ///
    /// # Errors
    ///
    /// Same as [`get_issued_at`].
    pub fn issued_at(&self) -> Result<i64, ClaimsError> {
        get_issued_at(self)
    }

    /// See [`get_issued_at_time`].
    ///
    /// # Errors
    ///
    /// Same as [`get_issued_at_time`].
    pub fn issued_at_time(&self) -> Result<DateTime<Utc>, ClaimsError> {
        get_issued_at_time(self)
    }
}

impl TryFrom<Value> for ClaimsMap {
    type Error = ClaimsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Convert any serializable claims structure into a [`ClaimsMap`].
///
/// The claims are serialized to JSON and read back as an object, so every
/// field survives under the name its `Serialize` impl gives it. Nothing is
/// renamed or filtered.
///
/// # Errors
///
/// Returns `ClaimsError::Decode` if serialization fails (for example a map
/// with non-string keys) or the top level is not an object.
pub fn normalize<C>(claims: &C) -> Result<ClaimsMap, ClaimsError>
where
    C: Serialize + ?Sized,
{
    let value = serde_json::to_value(claims).map_err(|e| {
        tracing::debug!(target: "authenticator.claims", error = %e, "Failed to serialize claims");
        ClaimsError::Decode(e.to_string())
    })?;
    ClaimsMap::from_value(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct ProviderClaims {
        sub: String,
        iat: i64,
        groups: Vec<String>,
        #[serde(rename = "preferred_username")]
        username: String,
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("claims backend exploded"))
        }
    }

    fn provider_claims() -> ProviderClaims {
        ProviderClaims {
            sub: "user-1".to_string(),
            iat: 1_700_000_000,
            groups: vec!["team-a".to_string(), "team-b".to_string()],
            username: "alice".to_string(),
        }
    }

    #[test]
    fn test_normalize_struct_preserves_every_field() {
        let map = normalize(&provider_claims()).unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.get("sub"), Some(&json!("user-1")));
        assert_eq!(map.get("iat"), Some(&json!(1_700_000_000)));
        assert_eq!(map.get("groups"), Some(&json!(["team-a", "team-b"])));
        assert_eq!(map.get("preferred_username"), Some(&json!("alice")));
    }

    #[test]
    fn test_normalize_is_deterministic() {
        let claims = provider_claims();
        let first = normalize(&claims).unwrap();
        let second = normalize(&claims).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_json_value() {
        let claims = json!({"sub": "svc", "groups": "admin", "nested": {"a": 1}});
        let map = normalize(&claims).unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("nested"), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_normalize_hash_map() {
        let mut claims = HashMap::new();
        claims.insert("email", "alice@example.com");
        let map = normalize(&claims).unwrap();
        assert_eq!(map.string_field("email"), "alice@example.com");
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        let result = normalize(&vec!["a", "b"]);
        assert!(matches!(result, Err(ClaimsError::Decode(msg)) if msg.contains("array")));

        let result = normalize("just-a-string");
        assert!(matches!(result, Err(ClaimsError::Decode(msg)) if msg.contains("string")));
    }

    #[test]
    fn test_normalize_propagates_serialization_failure() {
        let result = normalize(&Unserializable);
        assert!(
            matches!(result, Err(ClaimsError::Decode(msg)) if msg.contains("claims backend exploded"))
        );
    }

    #[test]
    fn test_normalize_rejects_non_string_keys() {
        let mut claims = HashMap::new();
        claims.insert(vec![1_u8, 2], "value");
        assert!(matches!(normalize(&claims), Err(ClaimsError::Decode(_))));
    }

    #[test]
    fn test_from_slice() {
        let map = ClaimsMap::from_slice(br#"{"sub":"alice","iat":1700000000}"#).unwrap();
        assert_eq!(map.string_field("sub"), "alice");
        assert_eq!(map.issued_at().unwrap(), 1_700_000_000);
    }

    #[test]
    fn test_from_slice_invalid_json() {
        assert!(matches!(
            ClaimsMap::from_slice(b"{not json"),
            Err(ClaimsError::Decode(_))
        ));
        assert!(matches!(
            ClaimsMap::from_slice(b"null"),
            Err(ClaimsError::Decode(_))
        ));
    }

    #[test]
    fn test_try_from_value() {
        let map = ClaimsMap::try_from(json!({"a": "b"})).unwrap();
        assert!(map.contains("a"));
        assert!(!map.contains("b"));
        assert!(ClaimsMap::try_from(json!(42)).is_err());
    }

    #[test]
    fn test_empty_object_is_valid() {
        let map = normalize(&json!({})).unwrap();
        assert!(map.is_empty());
        assert!(map.scope_values(&["groups"]).is_empty());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ClaimsError::MissingClaim("iat".to_string()).to_string(),
            "token does not have iat claim"
        );
        assert_eq!(
            ClaimsError::InvalidClaimType {
                claim: "iat".to_string(),
                value: "notanumber".to_string(),
            }
            .to_string(),
            "iat 'notanumber' is not a number"
        );
    }
}
