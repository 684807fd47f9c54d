// src/models/lenient.rs
// DOCUMENTATION: Lenient decoding of boolean flags
// PURPOSE: The backend sends flags as booleans, numbers, strings or wrapped values

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a loosely-typed JSON value as a boolean
/// DOCUMENTATION: `true`, non-zero numbers and the strings "true", "1",
/// "yes", "on" (any case) are true. `{"value": x}` unwraps to `x`.
/// Everything else, including null, is false.
pub fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Value::Object(map) => map.get("value").map(value_as_bool).unwrap_or(false),
        Value::Null | Value::Array(_) => false,
    }
}

/// Serde adapter producing a plain `bool`
/// Use together with `#[serde(default)]` so a missing key decodes as false.
pub fn bool_from_any<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_bool(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "bool_from_any")]
        flag: bool,
    }

    fn decode(raw: &str) -> bool {
        serde_json::from_str::<Flags>(raw).map(|f| f.flag).unwrap()
    }

    #[test]
    fn test_native_and_string_flags() {
        assert!(decode(r#"{"flag": true}"#));
        assert!(!decode(r#"{"flag": false}"#));
        assert!(decode(r#"{"flag": "true"}"#));
        assert!(decode(r#"{"flag": "TRUE"}"#));
        assert!(decode(r#"{"flag": "1"}"#));
        assert!(!decode(r#"{"flag": "false"}"#));
        assert!(!decode(r#"{"flag": "nope"}"#));
    }

    #[test]
    fn test_numbers_wrappers_and_missing() {
        assert!(decode(r#"{"flag": 1}"#));
        assert!(!decode(r#"{"flag": 0}"#));
        assert!(decode(r#"{"flag": {"value": "yes"}}"#));
        assert!(!decode(r#"{"flag": null}"#));
        assert!(!decode("{}"));
        assert!(!value_as_bool(&json!([true])));
    }
}
