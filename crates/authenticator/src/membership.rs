//! Group membership evaluation.
//!
//! Decides whether a principal's claimed groups intersect a required-group
//! set. Evaluation is fail-closed: claims that cannot be normalized are
//! treated as "not a member" and never surface as an error.
//!
//! The claim consulted for groups is `"groups"` unless a [`GroupMembership`]
//! policy is built with other scope names.

use crate::claims::{normalize, ClaimsMap};
use serde::Serialize;

/// Scope names consulted when no policy override is given.
pub const DEFAULT_GROUP_SCOPES: &[&str] = &["groups"];

/// Which claims carry group names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMembership {
    scopes: Vec<String>,
}

impl Default for GroupMembership {
    fn default() -> Self {
        Self::with_scopes(DEFAULT_GROUP_SCOPES)
    }
}

impl GroupMembership {
    /// Policy reading groups from the given scope claims, in order.
    #[must_use]
    pub fn with_scopes<S: AsRef<str>>(scopes: &[S]) -> Self {
        Self {
            scopes: scopes.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Whether the claims place the principal in any of `required`.
    ///
    /// Returns `false` when the claims cannot be normalized, when they carry
    /// no groups, or when no group matches.
    pub fn is_member<C, S>(&self, claims: &C, required: &[S]) -> bool
    where
        C: Serialize + ?Sized,
        S: AsRef<str>,
    {
        match normalize(claims) {
            Ok(map) => self.is_member_of_map(&map, required),
            Err(e) => {
                tracing::debug!(
                    target: "authenticator.membership",
                    error = %e,
                    "Membership denied: claims could not be normalized"
                );
                false
            }
        }
    }

    /// Same as [`GroupMembership::is_member`] over already-normalized claims.
    #[must_use]
    pub fn is_member_of_map<S: AsRef<str>>(&self, claims: &ClaimsMap, required: &[S]) -> bool {
        let groups = claims.scope_values(self.scopes.as_slice());
        let member = groups
            .iter()
            .any(|group| required.iter().any(|r| r.as_ref() == *group));

        tracing::trace!(
            target: "authenticator.membership",
            claimed = groups.len(),
            required = required.len(),
            member = member,
            "Evaluated group membership"
        );
        member
    }

    /// Claimed groups that appear in `required`, in claims order.
    ///
    /// Meant for audit logging by callers; an empty result means not a member.
    #[must_use]
    pub fn matching_groups<'a, S: AsRef<str>>(
        &self,
        claims: &'a ClaimsMap,
        required: &[S],
    ) -> Vec<&'a str> {
        claims
            .scope_values(self.scopes.as_slice())
            .into_iter()
            .filter(|group| required.iter().any(|r| r.as_ref() == *group))
            .collect()
    }
}

/// Whether the claims' `groups` place the principal in any of `required`.
///
/// Fail-closed: claims that cannot be normalized yield `false`.
pub fn is_member<C, S>(claims: &C, required: &[S]) -> bool
where
    C: Serialize + ?Sized,
    S: AsRef<str>,
{
    GroupMembership::default().is_member(claims, required)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde::Serializer;
    use serde_json::json;

    struct BrokenClaims;

    impl Serialize for BrokenClaims {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("unparsable"))
        }
    }

    #[derive(Serialize)]
    struct OidcClaims {
        sub: String,
        groups: Vec<String>,
    }

    #[test]
    fn test_member_when_any_group_matches() {
        let claims = json!({"groups": ["team-a", "team-b"]});
        assert!(is_member(&claims, &["team-b", "team-c"]));
    }

    #[test]
    fn test_not_member_when_no_group_matches() {
        let claims = json!({"groups": ["team-a"]});
        assert!(!is_member(&claims, &["team-b"]));
    }

    #[test]
    fn test_unparsable_claims_fail_closed() {
        assert!(!is_member(&BrokenClaims, &["anything"]));
        assert!(!is_member(&json!(["team-a"]), &["team-a"]));
    }

    #[test]
    fn test_no_groups_claim() {
        let claims = json!({"sub": "alice"});
        assert!(!is_member(&claims, &["team-a"]));
    }

    #[test]
    fn test_empty_required_set() {
        let claims = json!({"groups": ["team-a"]});
        let required: [&str; 0] = [];
        assert!(!is_member(&claims, &required));
    }

    #[test]
    fn test_bare_string_group() {
        let claims = json!({"groups": "admins"});
        assert!(is_member(&claims, &["admins"]));
    }

    #[test]
    fn test_untyped_group_list() {
        let claims = json!({"groups": [1, "admins", null]});
        assert!(is_member(&claims, &["admins"]));
        assert!(!is_member(&claims, &["1"]));
    }

    #[test]
    fn test_typed_claims_struct() {
        let claims = OidcClaims {
            sub: "alice".to_string(),
            groups: vec!["devs".to_string()],
        };
        assert!(is_member(&claims, &["devs".to_string()]));
    }

    #[test]
    fn test_match_is_exact() {
        let claims = json!({"groups": ["team-a"]});
        assert!(!is_member(&claims, &["team"]));
        assert!(!is_member(&claims, &["TEAM-A"]));
    }

    #[test]
    fn test_default_policy_only_reads_groups() {
        let claims = json!({"roles": ["admins"]});
        assert!(!is_member(&claims, &["admins"]));
        assert_eq!(GroupMembership::default().scopes(), ["groups".to_string()]);
    }

    #[test]
    fn test_custom_scopes() {
        let policy = GroupMembership::with_scopes(&["roles", "groups"]);
        let claims = json!({"roles": ["admins"], "groups": "devs"});

        assert!(policy.is_member(&claims, &["admins"]));
        assert!(policy.is_member(&claims, &["devs"]));
        assert!(!policy.is_member(&claims, &["ops"]));
    }

    #[test]
    fn test_is_member_of_map() {
        let map = normalize(&json!({"groups": ["a", "b"]})).unwrap();
        let policy = GroupMembership::default();
        assert!(policy.is_member_of_map(&map, &["b"]));
        assert!(!policy.is_member_of_map(&map, &["c"]));
    }

    #[test]
    fn test_matching_groups() {
        let map = normalize(&json!({"groups": ["a", "b", "c", "b"]})).unwrap();
        let matched = GroupMembership::default().matching_groups(&map, &["b", "c", "z"]);
        assert_eq!(matched, vec!["b", "c", "b"]);
    }
}
