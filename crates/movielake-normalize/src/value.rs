//! Scalar coercion: collapsing an arbitrarily nested JSON value into one
//! flat display string.

use serde_json::Value;

use crate::schema::DISPLAY_NAME_KEYS;

/// Coerces any JSON value to a flat display string. Total over [`Value`] —
/// never fails, never panics.
///
/// - string → itself
/// - object → first non-empty coerced value among [`DISPLAY_NAME_KEYS`],
///   falling back to the compact JSON form of the whole object
/// - array → elements coerced and joined with `", "`
/// - null → `""`
/// - number/bool → display form
#[must_use]
pub fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            for key in DISPLAY_NAME_KEYS {
                if let Some(inner) = map.get(*key) {
                    let coerced = coerce(inner);
                    if !coerced.is_empty() {
                        return coerced;
                    }
                }
            }
            serde_json::to_string(value).unwrap_or_default()
        }
        Value::Array(items) => items.iter().map(coerce).collect::<Vec<_>>().join(", "),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
    }
}

/// Extracts an integer from a JSON number or numeric string; anything else
/// (including blanks) is `None`.
#[must_use]
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64().and_then(|f| {
                if f.is_finite() {
                    #[allow(clippy::cast_possible_truncation)]
                    Some(f as i64)
                } else {
                    None
                }
            })
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Extracts a finite float from a JSON number or numeric string.
#[must_use]
pub fn as_real(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn string_passes_through() {
        assert_eq!(coerce(&json!("Drama")), "Drama");
    }

    #[test]
    fn null_becomes_empty_string() {
        assert_eq!(coerce(&Value::Null), "");
    }

    #[test]
    fn object_uses_display_name_preference_order() {
        assert_eq!(coerce(&json!({"name": "Warner Bros."})), "Warner Bros.");
        assert_eq!(coerce(&json!({"fullName": "Ridley Scott"})), "Ridley Scott");
        assert_eq!(
            coerce(&json!({"title": "Alien", "fullName": "Ridley Scott"})),
            "Ridley Scott"
        );
    }

    #[test]
    fn object_skips_empty_preferred_values() {
        assert_eq!(
            coerce(&json!({"name": "", "fullName": "Ridley Scott"})),
            "Ridley Scott"
        );
        assert_eq!(
            coerce(&json!({"name": null, "title": "Alien"})),
            "Alien"
        );
    }

    #[test]
    fn object_without_display_name_serializes_compactly() {
        let coerced = coerce(&json!({"code": 7}));
        assert_eq!(coerced, r#"{"code":7}"#);
    }

    #[test]
    fn array_joins_coerced_elements() {
        assert_eq!(
            coerce(&json!(["Rick Deckard", {"name": "Roy Batty"}])),
            "Rick Deckard, Roy Batty"
        );
    }

    #[test]
    fn mixed_and_nested_values_never_fail() {
        assert_eq!(coerce(&json!([null, 3, true])), ", 3, true");
        assert_eq!(coerce(&json!(9.5)), "9.5");
        assert_eq!(coerce(&json!(false)), "false");
    }

    #[test]
    fn as_integer_accepts_numbers_and_numeric_strings() {
        assert_eq!(as_integer(&json!(1999)), Some(1999));
        assert_eq!(as_integer(&json!("1999")), Some(1999));
        assert_eq!(as_integer(&json!(" 42 ")), Some(42));
        assert_eq!(as_integer(&json!("")), None);
        assert_eq!(as_integer(&Value::Null), None);
        assert_eq!(as_integer(&json!([1])), None);
    }

    #[test]
    fn as_real_rejects_non_finite() {
        assert_eq!(as_real(&json!(7.8)), Some(7.8));
        assert_eq!(as_real(&json!("7.8")), Some(7.8));
        assert_eq!(as_real(&json!("inf")), None);
        assert_eq!(as_real(&json!("not a number")), None);
    }
}
