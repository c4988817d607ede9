// ABOUTME: Lenient number coercion for identifiers and numeric columns
// ABOUTME: Mirrors parseInt/parseFloat semantics and provides serde field helpers

use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

use crate::constants::ID_FIELD;

/// Parse an integer the way loosely typed callers expect: numbers are
/// truncated toward zero, strings are read up to the first non-digit.
///
/// Returns `None` when no digits can be read (`"abc"`, `true`, `[]`).
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)
            }
        }
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Parse a float, reading the longest numeric prefix of a string.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(s.len());
    let candidate = &s[..end];

    // Shrink until the prefix parses ("1.5e" -> "1.5")
    (1..=candidate.len())
        .rev()
        .filter(|&i| candidate.is_char_boundary(i))
        .find_map(|i| candidate[..i].parse::<f64>().ok())
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Deserialize an optional integer identifier from a number or numeric string.
///
/// `null` and blank strings become `None`; anything else that has no
/// leading digits is rejected.
pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) if is_blank(&v) => Ok(None),
        Some(v) => parse_int(&v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, got {}", v))),
    }
}

/// Deserialize an optional float from a number or numeric string.
pub fn opt_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(v) if is_blank(&v) => Ok(None),
        Some(v) => parse_float(&v)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a number, got {}", v))),
    }
}

/// Deserialize a reference column read back from the store.
///
/// The store may return a bare id, a numeric string, or a lookup object
/// such as `{"Id": 4, "Name": "Acme"}`. Unreadable values decode to `None`.
pub fn opt_lookup_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map.get(ID_FIELD).and_then(parse_int),
        Some(v) => parse_int(&v),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::json;

    #[rstest]
    #[case(json!(42), Some(42))]
    #[case(json!(12.9), Some(12))]
    #[case(json!(-3.5), Some(-3))]
    #[case(json!("17"), Some(17))]
    #[case(json!("  8 apples"), Some(8))]
    #[case(json!("-5"), Some(-5))]
    #[case(json!("abc"), None)]
    #[case(json!(""), None)]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    fn test_parse_int(#[case] input: Value, #[case] expected: Option<i64>) {
        assert_eq!(parse_int(&input), expected);
    }

    #[rstest]
    #[case(json!(1.25), Some(1.25))]
    #[case(json!("90"), Some(90.0))]
    #[case(json!("1.5h"), Some(1.5))]
    #[case(json!("1.5e"), Some(1.5))]
    #[case(json!("minutes"), None)]
    fn test_parse_float(#[case] input: Value, #[case] expected: Option<f64>) {
        assert_eq!(parse_float(&input), expected);
    }

    #[derive(Debug, Deserialize)]
    struct Input {
        #[serde(default, deserialize_with = "opt_int")]
        project_id: Option<i64>,
        #[serde(default, deserialize_with = "opt_float")]
        duration: Option<f64>,
    }

    #[test]
    fn test_opt_int_accepts_strings_and_blanks() {
        let input: Input = serde_json::from_value(json!({"project_id": "7", "duration": "30"})).unwrap();
        assert_eq!(input.project_id, Some(7));
        assert_eq!(input.duration, Some(30.0));

        let input: Input = serde_json::from_value(json!({"project_id": ""})).unwrap();
        assert_eq!(input.project_id, None);
        assert_eq!(input.duration, None);
    }

    #[test]
    fn test_opt_int_rejects_garbage() {
        let result: Result<Input, _> = serde_json::from_value(json!({"project_id": "nope"}));
        assert!(result.is_err());
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "opt_lookup_id")]
        client_id_c: Option<i64>,
    }

    #[test]
    fn test_opt_lookup_id_shapes() {
        let row: Row = serde_json::from_value(json!({"client_id_c": {"Id": 4, "Name": "Acme"}})).unwrap();
        assert_eq!(row.client_id_c, Some(4));

        let row: Row = serde_json::from_value(json!({"client_id_c": "9"})).unwrap();
        assert_eq!(row.client_id_c, Some(9));

        let row: Row = serde_json::from_value(json!({"client_id_c": null})).unwrap();
        assert_eq!(row.client_id_c, None);

        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.client_id_c, None);
    }
}
