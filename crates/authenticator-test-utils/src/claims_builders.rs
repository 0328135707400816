//! Builder patterns for test claims
//!
//! Provides fluent APIs for the claim shapes identity providers send.

use chrono::{Duration, Utc};
use serde_json::{json, Map, Value};

/// Builder for creating test claims
///
/// # Example
/// ```rust,ignore
/// let claims = TestClaimsBuilder::new()
///     .for_user("alice")
///     .with_groups(&["team-a", "team-b"])
///     .expires_in(3600)
///     .build();
/// ```
pub struct TestClaimsBuilder {
    claims: Map<String, Value>,
}

impl TestClaimsBuilder {
    /// Create a new claims builder with defaults
    pub fn new() -> Self {
        let now = Utc::now();
        let mut claims = Map::new();
        claims.insert("sub".to_string(), json!("test-subject"));
        claims.insert("iat".to_string(), json!(now.timestamp()));
        claims.insert(
            "exp".to_string(),
            json!((now + Duration::seconds(3600)).timestamp()),
        );
        Self { claims }
    }

    /// Set the subject
    pub fn for_user(self, subject: &str) -> Self {
        self.with_claim("sub", json!(subject))
    }

    /// Set `groups` to a list of strings
    pub fn with_groups(self, groups: &[&str]) -> Self {
        self.with_claim("groups", json!(groups))
    }

    /// Set `groups` to a single bare string
    pub fn with_single_group(self, group: &str) -> Self {
        self.with_claim("groups", json!(group))
    }

    /// Set `groups` to an arbitrary JSON value (mixed lists, numbers, ...)
    pub fn with_raw_groups(self, groups: Value) -> Self {
        self.with_claim("groups", groups)
    }

    /// Set issued-at timestamp
    pub fn issued_at(self, timestamp: i64) -> Self {
        self.with_claim("iat", json!(timestamp))
    }

    /// Set issued-at as a floating point number, as some providers do
    pub fn issued_at_float(self, timestamp: f64) -> Self {
        self.with_claim("iat", json!(timestamp))
    }

    /// Set expiration in seconds from now
    pub fn expires_in(self, seconds: i64) -> Self {
        self.with_claim("exp", json!((Utc::now() + Duration::seconds(seconds)).timestamp()))
    }

    /// Remove a claim
    pub fn without(mut self, name: &str) -> Self {
        self.claims.remove(name);
        self
    }

    /// Set any claim
    pub fn with_claim(mut self, name: &str, value: Value) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    /// Build the claims as a JSON value
    pub fn build(self) -> Value {
        Value::Object(self.claims)
    }
}

impl Default for TestClaimsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
