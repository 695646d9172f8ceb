//! Lenient field extraction from loosely-typed JSON records.
//!
//! Corpus files are hand-assembled and inconsistent: years appear as numbers
//! or strings, cast lists as a single string, ratings as `"N/A"`. These
//! helpers absorb the variation at the load boundary so the typed records
//! never fail on a field's shape.

use serde_json::Value;

use crate::record::TextOrList;

/// Extract a scalar as text without trimming.
///
/// Strings are returned as-is, numbers and booleans use their JSON text.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Extract an optional text field from an object.
pub fn text_field(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(text)
}

/// Extract a field that may be free text or a list of strings.
///
/// Non-scalar list elements are dropped.
pub fn text_or_list_field(record: &Value, key: &str) -> Option<TextOrList> {
    match record.get(key)? {
        Value::Array(items) => Some(TextOrList::List(items.iter().filter_map(text).collect())),
        other => text(other).map(TextOrList::Text),
    }
}

/// Extract a list of strings.
///
/// A single scalar becomes a one-element list; anything else is empty.
pub fn string_list_field(record: &Value, key: &str) -> Vec<String> {
    match record.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(text).collect(),
        Some(other) => text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Extract a list of JSON objects, ignoring entries of any other shape.
pub fn object_list_field<'a>(record: &'a Value, key: &str) -> Vec<&'a Value> {
    match record.get(key) {
        Some(Value::Array(items)) => items.iter().filter(|item| item.is_object()).collect(),
        _ => Vec::new(),
    }
}

/// Coerce a raw rating into a finite, non-negative float.
///
/// Numbers and numeric strings parse; absence, `"N/A"`, NaN, infinities and
/// negative values all become `0.0`. Never fails.
///
/// # Examples
///
/// ```
/// use scriptsearch_core::util::lenient::coerce_rating;
/// use serde_json::json;
///
/// assert_eq!(coerce_rating(Some(&json!("8.5"))), 8.5);
/// assert_eq!(coerce_rating(Some(&json!(7))), 7.0);
/// assert_eq!(coerce_rating(Some(&json!("N/A"))), 0.0);
/// assert_eq!(coerce_rating(None), 0.0);
/// ```
pub fn coerce_rating(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(rating) if rating.is_finite() && rating >= 0.0 => rating,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    // -------------------------------------------------------------------------
    // text tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_text_scalars() {
        assert_eq!(text(&json!("Alien")), Some("Alien".to_string()));
        assert_eq!(text(&json!(1979)), Some("1979".to_string()));
        assert_eq!(text(&json!(false)), Some("false".to_string()));
    }

    #[test]
    fn test_text_keeps_whitespace() {
        assert_eq!(text(&json!("  padded ")), Some("  padded ".to_string()));
    }

    #[test]
    fn test_text_non_scalars() {
        assert_eq!(text(&json!(null)), None);
        assert_eq!(text(&json!([1])), None);
        assert_eq!(text(&json!({})), None);
    }

    #[test]
    fn test_text_field_missing() {
        assert_eq!(text_field(&json!({}), "title"), None);
    }

    // -------------------------------------------------------------------------
    // text_or_list_field tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_text_or_list_text() {
        let record = json!({"directors": "Ridley Scott"});
        assert_eq!(
            text_or_list_field(&record, "directors"),
            Some(TextOrList::Text("Ridley Scott".to_string()))
        );
    }

    #[test]
    fn test_text_or_list_list() {
        let record = json!({"genres": ["Horror", 3, null, "Sci-Fi"]});
        assert_eq!(
            text_or_list_field(&record, "genres"),
            Some(TextOrList::List(vec![
                "Horror".to_string(),
                "3".to_string(),
                "Sci-Fi".to_string()
            ]))
        );
    }

    #[test]
    fn test_text_or_list_null() {
        assert_eq!(text_or_list_field(&json!({"writers": null}), "writers"), None);
    }

    // -------------------------------------------------------------------------
    // string_list_field tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_string_list_array() {
        let record = json!({"cast": ["Sigourney Weaver", "Tom Skerritt"]});
        assert_eq!(
            string_list_field(&record, "cast"),
            vec!["Sigourney Weaver", "Tom Skerritt"]
        );
    }

    #[test]
    fn test_string_list_single_scalar() {
        let record = json!({"cast": "Sigourney Weaver"});
        assert_eq!(string_list_field(&record, "cast"), vec!["Sigourney Weaver"]);
    }

    #[test]
    fn test_string_list_missing_or_object() {
        assert!(string_list_field(&json!({}), "cast").is_empty());
        assert!(string_list_field(&json!({"cast": {"a": 1}}), "cast").is_empty());
    }

    // -------------------------------------------------------------------------
    // object_list_field tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_object_list_filters_non_objects() {
        let record = json!({"dialogues": [{"text": "hi"}, "stray", 4, {"text": "bye"}]});
        assert_eq!(object_list_field(&record, "dialogues").len(), 2);
    }

    #[test]
    fn test_object_list_not_array() {
        assert!(object_list_field(&json!({"scenes": "none"}), "scenes").is_empty());
    }

    // -------------------------------------------------------------------------
    // coerce_rating tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_coerce_rating_numeric_string() {
        assert_eq!(coerce_rating(Some(&json!("8.5"))), 8.5);
        assert_eq!(coerce_rating(Some(&json!(" 6.1 "))), 6.1);
    }

    #[test]
    fn test_coerce_rating_number() {
        assert_eq!(coerce_rating(Some(&json!(9.2))), 9.2);
    }

    #[test]
    fn test_coerce_rating_missing() {
        assert_eq!(coerce_rating(None), 0.0);
        assert_eq!(coerce_rating(Some(&json!(null))), 0.0);
    }

    #[test]
    fn test_coerce_rating_unparseable() {
        assert_eq!(coerce_rating(Some(&json!("N/A"))), 0.0);
        assert_eq!(coerce_rating(Some(&json!(""))), 0.0);
        assert_eq!(coerce_rating(Some(&json!([8.5]))), 0.0);
    }

    #[test]
    fn test_coerce_rating_rejects_non_finite_and_negative() {
        assert_eq!(coerce_rating(Some(&json!("NaN"))), 0.0);
        assert_eq!(coerce_rating(Some(&json!("inf"))), 0.0);
        assert_eq!(coerce_rating(Some(&json!(-3.0))), 0.0);
    }

    proptest! {
        #[test]
        fn prop_coerce_rating_string_is_finite_non_negative(raw in ".*") {
            let rating = coerce_rating(Some(&json!(raw)));
            prop_assert!(rating.is_finite() && rating >= 0.0);
        }

        #[test]
        fn prop_coerce_rating_number_is_finite_non_negative(raw in any::<f64>()) {
            let rating = coerce_rating(Some(&json!(raw)));
            prop_assert!(rating.is_finite() && rating >= 0.0);
            if raw.is_finite() && raw >= 0.0 {
                prop_assert_eq!(rating, raw);
            }
        }

        #[test]
        fn prop_text_preserves_strings(raw in ".*") {
            prop_assert_eq!(text(&json!(raw)), Some(raw));
        }
    }
}
