//! Typed getters over a [`ClaimsMap`].
//!
//! Optional claims (plain strings, scope lists) never fail: a missing claim
//! or a value of the wrong shape reads as "not set". Load-bearing claims
//! (`iat`) fail with a typed [`ClaimsError`] so callers can reject the token.

use super::{ClaimValue, ClaimsError, ClaimsMap};
use chrono::{DateTime, Utc};
use serde_json::{Number, Value};

/// Name of the issued-at claim.
pub const ISSUED_AT_CLAIM: &str = "iat";

/// Exclusive upper bound of `i64` as an `f64` (2^63).
const I64_UPPER_BOUND_F64: f64 = 9_223_372_036_854_775_808.0;

/// Value of a string claim, or `""` when absent or not a string.
#[must_use]
pub fn get_string_field<'a>(claims: &'a ClaimsMap, name: &str) -> &'a str {
    match claims.get(name).map(ClaimValue::classify) {
        Some(ClaimValue::Text(s)) => s,
        _ => "",
    }
}

/// Flatten the requested scope claims into individual group names.
///
/// Each scope may hold a single string, a list of strings, or a list with
/// mixed element types (only the strings are kept). Scopes missing from the
/// claims are skipped. Output follows the order of `scopes`, then the source
/// order within each scope; duplicates are kept.
#[must_use]
pub fn get_scope_values<'a, S: AsRef<str>>(claims: &'a ClaimsMap, scopes: &[S]) -> Vec<&'a str> {
    scopes
        .iter()
        .filter_map(|scope| claims.get(scope.as_ref()))
        .flat_map(|value| ClaimValue::classify(value).into_strings())
        .collect()
}

/// Read a numeric claim as whole seconds.
///
/// Integers are taken as-is, floats are truncated toward zero. Strings are
/// never coerced, even when they look numeric.
///
/// # Errors
///
/// - `MissingClaim` if the claim is absent
/// - `InvalidClaimType` if the value is not a number or does not fit in `i64`
pub fn get_int_field(claims: &ClaimsMap, name: &str) -> Result<i64, ClaimsError> {
    let value = claims
        .get(name)
        .ok_or_else(|| ClaimsError::MissingClaim(name.to_string()))?;

    let seconds = match ClaimValue::classify(value) {
        ClaimValue::Number(number) => number_to_i64(number),
        _ => None,
    };

    seconds.ok_or_else(|| {
        tracing::debug!(
            target: "authenticator.claims",
            claim = name,
            "Claim rejected: value is not a usable number"
        );
        invalid_claim(name, value)
    })
}

/// Issued-at timestamp in seconds since the Unix epoch.
///
/// # Errors
///
/// Same as [`get_int_field`] for the `iat` claim.
pub fn get_issued_at(claims: &ClaimsMap) -> Result<i64, ClaimsError> {
    get_int_field(claims, ISSUED_AT_CLAIM)
}

/// Issued-at as an absolute point in time.
///
/// # Errors
///
/// Same as [`get_issued_at`], plus `InvalidClaimType` when the seconds value
/// is outside the representable date range.
pub fn get_issued_at_time(claims: &ClaimsMap) -> Result<DateTime<Utc>, ClaimsError> {
    let iat = get_issued_at(claims)?;
    DateTime::from_timestamp(iat, 0).ok_or_else(|| ClaimsError::InvalidClaimType {
        claim: ISSUED_AT_CLAIM.to_string(),
        value: iat.to_string(),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn number_to_i64(number: &Number) -> Option<i64> {
    if let Some(i) = number.as_i64() {
        return Some(i);
    }
    if number.is_u64() {
        // Larger than i64::MAX
        return None;
    }
    number
        .as_f64()
        .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < I64_UPPER_BOUND_F64)
        .map(|f| f.trunc() as i64)
}

fn invalid_claim(name: &str, value: &Value) -> ClaimsError {
    let rendered = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    ClaimsError::InvalidClaimType {
        claim: name.to_string(),
        value: rendered,
    }
}
