//! Upstream inspection call records
//!
//! A call record is whatever the upstream inspection system hands us for one
//! inspection event. Nothing about its shape is guaranteed: fields may be
//! missing, renamed across historical versions, or hold the wrong JSON type.
//! The accessors here never fail; they answer "is there a usable value under
//! any of these keys" and leave fallback policy to the normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One upstream call record (field name → JSON value)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallRecord(Map<String, Value>);

impl CallRecord {
    /// Create an empty call record
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an arbitrary JSON value. Anything that is not an object becomes an
    /// empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    /// Parse a call record from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// First value among `keys` that is present (see [`is_present`])
    pub fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| is_present(value))
    }

    /// First non-empty text among `keys`
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find_map(value_text)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for CallRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Value> for CallRecord {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Whether a value counts as "present" for fallback purposes.
///
/// Null, `false`, zero, NaN, empty strings, empty arrays and objects are all
/// treated as missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => false,
    }
}

/// Render a value as certificate text, or `None` when it is not present.
///
/// Arrays of scalars are joined with `", "`; nested arrays and objects inside
/// them are skipped.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other => scalar_text(other),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    if !is_present(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) => Some("true".to_string()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Integral numbers render without a fractional part (`3`, never `3.0`)
fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_object_becomes_empty_record() {
        assert!(CallRecord::from_value(json!([1, 2, 3])).is_empty());
        assert!(CallRecord::from_value(json!("call")).is_empty());
        assert!(CallRecord::from_value(Value::Null).is_empty());
    }

    #[test]
    fn test_presence_follows_falsy_rules() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(0.0)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!([])));
        assert!(!is_present(&json!({"nested": true})));
        assert!(is_present(&json!("x")));
        assert!(is_present(&json!(12)));
        assert!(is_present(&json!(["a"])));
    }

    #[test]
    fn test_first_text_skips_falsy_candidates() {
        let call = CallRecord::new()
            .with("vendorName", "")
            .with("contractor", Value::Null)
            .with("firmName", "M/s SAI KRIPA INDUSTRIES");
        assert_eq!(
            call.first_text(&["vendorName", "contractor", "firmName"]),
            Some("M/s SAI KRIPA INDUSTRIES".to_string())
        );
        assert_eq!(call.first_text(&["missing"]), None);
    }

    #[test]
    fn test_number_text_has_no_trailing_fraction() {
        assert_eq!(value_text(&json!(35000)), Some("35000".to_string()));
        assert_eq!(value_text(&json!(3.0)), Some("3".to_string()));
        assert_eq!(value_text(&json!(2.5)), Some("2.5".to_string()));
    }

    #[test]
    fn test_array_text_joins_scalars() {
        assert_eq!(
            value_text(&json!(["AEP/WAY/KURJ", 7, {"x": 1}])),
            Some("AEP/WAY/KURJ, 7".to_string())
        );
        assert_eq!(value_text(&json!([{"x": 1}])), None);
    }
}
