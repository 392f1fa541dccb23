//! The dynamic value model and its comparison rules.
//!
//! Form values are [`serde_json::Value`]s; `Value::Null` means "unset".
//!
//! Comparison follows the loose/strict split forms authors expect:
//!
//! | Operator | Rule |
//! |----------|------|
//! | `===` / `!==` | same kind and same content; numbers compare numerically |
//! | `==` / `!=` | like strict, but numbers, numeric strings and booleans coerce |
//! | `<` `<=` `>` `>=` | strings lexicographically, else numerically; incomparable is `false` |
//! | `in` / `not in` | array member (strict), object key, or substring |

use std::cmp::Ordering;

pub use serde_json::{Map, Value};

/// Data injected into a context node and its rendered template.
pub type ContextData = Map<String, Value>;

/// Strict equality. Arrays and objects compare by content.
#[must_use]
pub fn strict_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| strict_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| strict_eq(x, y)))
        }
        _ => left == right,
    }
}

/// Loose equality with numeric coercion of strings and booleans.
#[must_use]
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => left.is_null() && right.is_null(),
        (Value::Bool(_), _) | (_, Value::Bool(_))
            if std::mem::discriminant(left) != std::mem::discriminant(right) =>
        {
            match (to_number(left), to_number(right)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            match (to_number(left), to_number(right)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        _ => strict_eq(left, right),
    }
}

/// Ordering used by the relational comparators. `None` when incomparable.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            let a = to_number(left)?;
            let b = to_number(right)?;
            a.partial_cmp(&b)
        }
    }
}

/// Membership test for `in` / `not in`.
#[must_use]
pub fn contains(collection: &Value, needle: &Value) -> bool {
    match collection {
        Value::Array(items) => items.iter().any(|item| strict_eq(item, needle)),
        Value::Object(map) => case_key(needle).is_some_and(|key| map.contains_key(&key)),
        Value::String(haystack) => match needle {
            Value::String(part) => haystack.contains(part.as_str()),
            _ => false,
        },
        _ => false,
    }
}

/// Numeric view of a value, the way relational operators coerce it.
#[must_use]
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
            }
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Canonical string key for a value, so `0`, `0.0` and `"0"` select the
/// same case. Arrays and objects have no key.
#[must_use]
pub fn case_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        }),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether a value counts as "empty" for presence checks.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strict_numbers_ignore_representation() {
        assert!(strict_eq(&json!(1), &json!(1.0)));
        assert!(!strict_eq(&json!(1), &json!("1")));
    }

    #[test]
    fn loose_coerces_numeric_strings_and_bools() {
        assert!(loose_eq(&json!(1), &json!("1")));
        assert!(loose_eq(&json!(true), &json!(1)));
        assert!(loose_eq(&json!("0"), &json!(false)));
        assert!(!loose_eq(&json!("a"), &json!(0)));
        assert!(loose_eq(&Value::Null, &Value::Null));
        assert!(!loose_eq(&Value::Null, &json!(false)));
        assert!(!loose_eq(&json!(0), &Value::Null));
    }

    #[test]
    fn relational_rules() {
        assert_eq!(compare_values(&json!(1), &json!(2)), Some(Ordering::Less));
        assert_eq!(compare_values(&json!("b"), &json!("a")), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!("10"), &json!(9)), Some(Ordering::Greater));
        assert_eq!(compare_values(&json!("x"), &json!(1)), None);
        assert_eq!(compare_values(&json!([1]), &json!(1)), None);
    }

    #[test]
    fn membership() {
        assert!(contains(&json!(["1", "2"]), &json!("1")));
        assert!(!contains(&json!([1, 2]), &json!("1")));
        assert!(contains(&json!({"a": 1}), &json!("a")));
        assert!(contains(&json!("hello"), &json!("ell")));
        assert!(!contains(&json!(3), &json!(3)));
    }

    #[test]
    fn case_keys_unify_numbers_and_strings() {
        assert_eq!(case_key(&json!(0)), Some("0".to_string()));
        assert_eq!(case_key(&json!(0.0)), Some("0".to_string()));
        assert_eq!(case_key(&json!("0")), Some("0".to_string()));
        assert_eq!(case_key(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(case_key(&json!([0])), None);
    }

    #[test]
    fn emptiness() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
    }
}
