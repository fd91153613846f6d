//! Cell coercion: raw string -> typed JSON value.
//!
//! Checks run in a fixed order and the first match wins:
//!
//! 1. empty -> `null`
//! 2. boolean token -> `true` / `false` (so `"0"` and `"1"` are always booleans,
//!    even in numeric columns; existing consumers rely on this)
//! 3. list field containing a comma -> array of trimmed strings
//! 4. number (`.` present -> float, else integer)
//! 5. otherwise the string itself

use serde_json::{Number, Value};

use crate::config::CoercionRules;

/// Coerce one cell using the field name (last path segment) as a hint.
pub fn coerce(value: &str, field: &str, rules: &CoercionRules) -> Value {
    if value.is_empty() {
        return Value::Null;
    }

    if let Some(flag) = rules.boolean(value) {
        return Value::Bool(flag);
    }

    if value.contains(',') && rules.is_list_field(field) {
        return Value::Array(split_list(value));
    }

    parse_number(value).unwrap_or_else(|| Value::String(value.to_string()))
}

/// Naive list split: one layer of enclosing quotes is removed, then the value
/// is split on every comma. Quoted commas are not protected.
fn split_list(value: &str) -> Vec<Value> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    inner
        .split(',')
        .map(|item| Value::String(item.trim().to_string()))
        .collect()
}

fn parse_number(value: &str) -> Option<Value> {
    let trimmed = value.trim();

    if trimmed.contains('.') {
        return trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number);
    }

    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }

    trimmed.parse::<u64>().ok().map(|n| Value::Number(n.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn c(value: &str, field: &str) -> Value {
        coerce(value, field, &CoercionRules::default())
    }

    #[test]
    fn test_empty_is_null() {
        assert_eq!(c("", "optional"), Value::Null);
    }

    #[test]
    fn test_booleans() {
        assert_eq!(c("true", "isActive"), json!(true));
        assert_eq!(c("false", "isActive"), json!(false));
        assert_eq!(c("yes", "isActive"), json!(true));
        assert_eq!(c("No", "isActive"), json!(false));
        assert_eq!(c("TRUE", "isActive"), json!(true));
    }

    #[test]
    fn test_zero_and_one_are_always_booleans() {
        for field in ["anyField", "count", "capacity", "price.minValue", "categoryTags"] {
            assert_eq!(c("0", field), json!(false), "field {}", field);
            assert_eq!(c("1", field), json!(true), "field {}", field);
        }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(c("123", "count"), json!(123));
        assert_eq!(c("123.45", "price"), json!(123.45));
        assert_eq!(c("-73.5878", "longitude"), json!(-73.5878));
        assert_eq!(c("25.00", "minValue"), json!(25.0));
        assert_eq!(c("18446744073709551615", "big"), json!(18446744073709551615u64));
    }

    #[test]
    fn test_unparseable_numbers_stay_strings() {
        assert_eq!(c("3.0.1", "version"), json!("3.0.1"));
        assert_eq!(c("H2X1Z4", "addressPostalCode"), json!("H2X1Z4"));
        assert_eq!(c("09:00", "opens"), json!("09:00"));
        assert_eq!(c("123456789012345678901234567890", "huge"), json!("123456789012345678901234567890"));
    }

    #[test]
    fn test_list_fields() {
        assert_eq!(c("tag1,tag2,tag3", "categoryTags"), json!(["tag1", "tag2", "tag3"]));
        assert_eq!(c("x,y,z", "categoryTags"), json!(["x", "y", "z"]));
        assert_eq!(
            c("Wheelchair Access, Assistive Listening Systems", "accessibilityFeatures"),
            json!(["Wheelchair Access", "Assistive Listening Systems"])
        );
        assert_eq!(c("a,b", "relatedIds"), json!(["a", "b"]));
    }

    #[test]
    fn test_list_needs_indicator_and_comma() {
        assert_eq!(c("x,y,z", "plainField"), json!("x,y,z"));
        assert_eq!(c("music", "categoryTags"), json!("music"));
    }

    #[test]
    fn test_quoted_list_split_naively() {
        let quoted = c("\"tag1,tag2\",tag3", "performerNames");
        assert_eq!(quoted, json!(["\"tag1", "tag2\"", "tag3"]));

        let wrapped = c("\"a, b\"", "performerNames");
        assert_eq!(wrapped, json!(["a", "b"]));
    }

    #[test]
    fn test_plain_strings() {
        assert_eq!(c("test string", "description"), json!("test string"));
        assert_eq!(c("event123", "id"), json!("event123"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = CoercionRules {
            true_tokens: vec!["oui".into()],
            false_tokens: vec!["non".into()],
            list_indicators: vec!["keywords".into()],
        };
        assert_eq!(coerce("Oui", "flag", &rules), json!(true));
        assert_eq!(coerce("1", "flag", &rules), json!(1));
        assert_eq!(coerce("a,b", "keywords", &rules), json!(["a", "b"]));
        assert_eq!(coerce("a,b", "categoryTags", &rules), json!("a,b"));
    }
}
