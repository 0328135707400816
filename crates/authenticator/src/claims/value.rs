//! Tagged view over a single claim value.
//!
//! Providers disagree on how multi-valued claims look on the wire: a bare
//! string for a single group, a list of strings, or a list that mixes in
//! numbers and objects. [`ClaimValue::classify`] is the one place that
//! probes the JSON shape; accessors match on the variants.

use serde_json::{Number, Value};

/// Shape of a claim value.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue<'a> {
    /// A single string.
    Text(&'a str),

    /// A list whose elements are all strings (including the empty list).
    TextList(Vec<&'a str>),

    /// A list holding at least one non-string element.
    Untyped(&'a [Value]),

    /// A JSON number.
    Number(&'a Number),

    /// Booleans, null and nested objects.
    Other(&'a Value),
}

impl<'a> ClaimValue<'a> {
    /// Classify a raw JSON value.
    #[must_use]
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Array(items) => {
                let strings: Option<Vec<&str>> = items.iter().map(Value::as_str).collect();
                match strings {
                    Some(list) => Self::TextList(list),
                    None => Self::Untyped(items),
                }
            }
            Value::Number(n) => Self::Number(n),
            other => Self::Other(other),
        }
    }

    /// Flatten into individual strings, in source order.
    ///
    /// Non-string elements of an untyped list are skipped; numbers and other
    /// scalars yield nothing.
    #[must_use]
    pub fn into_strings(self) -> Vec<&'a str> {
        match self {
            Self::Text(s) => vec![s],
            Self::TextList(list) => list,
            Self::Untyped(items) => items.iter().filter_map(Value::as_str).collect(),
            Self::Number(_) | Self::Other(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_string() {
        let v = json!("admin");
        assert_eq!(ClaimValue::classify(&v), ClaimValue::Text("admin"));
    }

    #[test]
    fn test_classify_string_list() {
        let v = json!(["a", "b"]);
        assert_eq!(ClaimValue::classify(&v), ClaimValue::TextList(vec!["a", "b"]));
    }

    #[test]
    fn test_classify_empty_list_is_text_list() {
        let v = json!([]);
        assert_eq!(ClaimValue::classify(&v), ClaimValue::TextList(vec![]));
    }

    #[test]
    fn test_classify_mixed_list() {
        let v = json!(["a", 42, "b"]);
        assert!(matches!(ClaimValue::classify(&v), ClaimValue::Untyped(items) if items.len() == 3));
    }

    #[test]
    fn test_classify_scalars() {
        let n = json!(7);
        assert!(matches!(ClaimValue::classify(&n), ClaimValue::Number(_)));

        for v in [json!(true), json!(null), json!({"k": "v"})] {
            assert!(matches!(ClaimValue::classify(&v), ClaimValue::Other(_)));
        }
    }

    #[test]
    fn test_into_strings() {
        let single = json!("admin");
        assert_eq!(ClaimValue::classify(&single).into_strings(), vec!["admin"]);

        let mixed = json!(["a", 42, {"x": 1}, null, "b"]);
        assert_eq!(ClaimValue::classify(&mixed).into_strings(), vec!["a", "b"]);

        let number = json!(3.5);
        assert!(ClaimValue::classify(&number).into_strings().is_empty());
    }
}
