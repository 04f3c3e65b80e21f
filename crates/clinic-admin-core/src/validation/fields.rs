//! Typed readers for JSON field values.
//!
//! These apply the same coercions the rules accept, so a document that passed
//! validation reads back without surprises.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

/// Finite number from a JSON number or a numeric string.
pub fn number_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Whole number from a JSON number or numeric string; fractions truncate.
pub fn integer_value(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    if let Value::String(s) = value {
        if let Ok(n) = s.trim().parse::<i64>() {
            return Some(n);
        }
    }
    number_value(value).map(|n| n.trunc() as i64)
}

/// UTC timestamp from `YYYY-MM-DD` (midnight) or RFC 3339 text.
pub fn timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Raw bytes from standard base64, with any `data:` URL prefix removed.
pub fn bytes_value(value: &Value) -> Option<Vec<u8>> {
    let text = value.as_str()?.trim();
    let payload = match text.split_once(";base64,") {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => text,
    };
    STANDARD.decode(payload).ok()
}

/// Trimmed string field, "" when absent or not a string.
pub fn text(fields: &Map<String, Value>, key: &str) -> String {
    optional_text(fields, key).unwrap_or_default()
}

/// Trimmed string field, `None` when missing or `null`.
pub fn optional_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
}

/// Trimmed, lowercased email field.
pub fn email(fields: &Map<String, Value>, key: &str) -> String {
    text(fields, key).to_lowercase()
}

/// String array field; non-string elements are dropped.
pub fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_coercions() {
        assert_eq!(integer_value(&json!(30)), Some(30));
        assert_eq!(integer_value(&json!("30")), Some(30));
        assert_eq!(integer_value(&json!(" 45 ")), Some(45));
        assert_eq!(integer_value(&json!(30.9)), Some(30));
        assert_eq!(integer_value(&json!("thirty")), None);
        assert_eq!(integer_value(&json!(true)), None);
    }

    #[test]
    fn test_number_rejects_non_finite() {
        assert_eq!(number_value(&json!("50")), Some(50.0));
        assert_eq!(number_value(&json!("NaN")), None);
        assert_eq!(number_value(&json!("inf")), None);
    }

    #[test]
    fn test_timestamp_date_only_is_midnight_utc() {
        let ts = timestamp_value(&json!("1980-01-01")).unwrap();
        assert_eq!(ts.to_rfc3339(), "1980-01-01T00:00:00+00:00");

        let ts = timestamp_value(&json!("1980-01-01T05:00:00+05:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "1980-01-01T00:00:00+00:00");

        assert!(timestamp_value(&json!("1980-13-01")).is_none());
    }

    #[test]
    fn test_bytes_strips_data_url() {
        assert_eq!(bytes_value(&json!("data:image/jpeg;base64,AQID")), Some(vec![1, 2, 3]));
        assert_eq!(bytes_value(&json!("AQID")), Some(vec![1, 2, 3]));
        assert_eq!(bytes_value(&json!("not base64!")), None);
    }

    #[test]
    fn test_text_readers() {
        let map = match json!({ "a": "  x ", "e": " Jane@X.com ", "n": 5, "l": ["Online", 3] }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(text(&map, "a"), "x");
        assert_eq!(text(&map, "n"), "");
        assert_eq!(optional_text(&map, "missing"), None);
        assert_eq!(email(&map, "e"), "jane@x.com");
        assert_eq!(string_list(&map, "l"), vec!["Online".to_string()]);
    }
}
