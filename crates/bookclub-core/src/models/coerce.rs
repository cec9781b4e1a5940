//! Lenient deserializers for spreadsheet cells.
//!
//! Sheet cells come back as whatever the script serialized: numbers may be
//! strings, flags may be `"TRUE"`, ids may be numbers. These helpers coerce a
//! cell into the Rust type the entity expects instead of failing the row.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Flag cell: `true`, `"TRUE"`, `"1"`, `"yes"`, `"on"` or a non-zero number.
pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

/// Optional numeric cell; blank or unparsable cells become `None`.
pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64))
}

/// Optional non-negative integer cell.
pub fn opt_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_f64).map(clamp_count))
}

/// Vote count cell; anything missing or negative counts as zero.
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(opt_u64(deserializer)?.unwrap_or(0))
}

/// Optional text cell; numbers and booleans are rendered, blanks become `None`.
pub fn opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_text))
}

/// Required text cell; blanks become an empty string.
pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        _ => false,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_count(number: f64) -> u64 {
    if number <= 0.0 {
        0
    } else {
        number.trunc() as u64
    }
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Cells {
        #[serde(default, deserialize_with = "flag")]
        flag: bool,
        #[serde(default, deserialize_with = "opt_f64")]
        rating: Option<f64>,
        #[serde(default, deserialize_with = "count")]
        votes: u64,
        #[serde(default, deserialize_with = "opt_string")]
        id: Option<String>,
    }

    fn cells(value: serde_json::Value) -> Cells {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn flag_accepts_sheet_true_variants() {
        assert!(cells(json!({"flag": "TRUE"})).flag);
        assert!(cells(json!({"flag": true})).flag);
        assert!(cells(json!({"flag": "yes"})).flag);
        assert!(cells(json!({"flag": 1})).flag);
    }

    #[test]
    fn flag_defaults_to_false() {
        assert!(!cells(json!({"flag": "FALSE"})).flag);
        assert!(!cells(json!({"flag": ""})).flag);
        assert!(!cells(json!({"flag": null})).flag);
        assert!(!cells(json!({})).flag);
    }

    #[test]
    fn numbers_are_coerced_from_strings() {
        let parsed = cells(json!({"rating": "4.5", "votes": "7", "id": 12}));
        assert_eq!(parsed.rating, Some(4.5));
        assert_eq!(parsed.votes, 7);
        assert_eq!(parsed.id.as_deref(), Some("12"));
    }

    #[test]
    fn bad_numbers_fall_back() {
        let parsed = cells(json!({"rating": "n/a", "votes": -3, "id": "  "}));
        assert_eq!(parsed.rating, None);
        assert_eq!(parsed.votes, 0);
        assert_eq!(parsed.id, None);
    }
}
