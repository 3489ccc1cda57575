//! Parameter mappings handed to calibration factories.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CalibrationResult, ConfigurationError};

/// A single calibration parameter as written in a panel file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(v: Vec<&str>) -> Self {
        Self::List(v.into_iter().map(str::to_string).collect())
    }
}

/// Named parameters for one calibration, kept in key order so that equal
/// mappings serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibrationParams(BTreeMap<String, ParamValue>);

impl CalibrationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Required finite number.
    pub fn number(&self, kind: &str, key: &str) -> CalibrationResult<f64> {
        match self.require(kind, key)? {
            ParamValue::Number(v) if v.is_finite() => Ok(*v),
            ParamValue::Number(v) => Err(malformed(kind, key, format!("{v} is not finite"))),
            other => Err(malformed(kind, key, format!("expected a number, got {other:?}"))),
        }
    }

    /// Optional finite number with a default.
    pub fn number_or(&self, kind: &str, key: &str, default: f64) -> CalibrationResult<f64> {
        if self.0.contains_key(key) {
            self.number(kind, key)
        } else {
            Ok(default)
        }
    }

    /// Required non-empty text.
    pub fn text(&self, kind: &str, key: &str) -> CalibrationResult<&str> {
        match self.require(kind, key)? {
            ParamValue::Text(s) if !s.trim().is_empty() => Ok(s.trim()),
            ParamValue::Text(_) => Err(malformed(kind, key, "empty text".to_string())),
            other => Err(malformed(kind, key, format!("expected text, got {other:?}"))),
        }
    }

    /// Optional list of names; a single text value counts as a one-element list.
    pub fn names(&self, kind: &str, key: &str) -> CalibrationResult<Option<Vec<String>>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(ParamValue::List(items)) => Ok(Some(items.clone())),
            Some(ParamValue::Text(s)) => Ok(Some(vec![s.clone()])),
            Some(other) => Err(malformed(
                kind,
                key,
                format!("expected a list of names, got {other:?}"),
            )),
        }
    }

    /// Reject keys a factory does not understand.
    pub fn only(&self, kind: &str, allowed: &[&str]) -> CalibrationResult<()> {
        match self.0.keys().find(|k| !allowed.contains(&k.as_str())) {
            Some(key) => Err(malformed(kind, key, "unknown parameter".to_string())),
            None => Ok(()),
        }
    }

    fn require(&self, kind: &str, key: &str) -> CalibrationResult<&ParamValue> {
        self.0
            .get(key)
            .ok_or_else(|| ConfigurationError::MissingParameter {
                kind: kind.to_string(),
                key: key.to_string(),
            })
    }
}

fn malformed(kind: &str, key: &str, reason: String) -> ConfigurationError {
    ConfigurationError::MalformedParameter {
        kind: kind.to_string(),
        key: key.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_access() {
        let params = CalibrationParams::new()
            .with("slope", 2.0)
            .with("unit", "mA")
            .with("units", vec!["mV", "kV"]);

        assert_eq!(params.number("linear", "slope").unwrap(), 2.0);
        assert_eq!(params.number_or("linear", "offset", 0.5).unwrap(), 0.5);
        assert_eq!(params.text("linear", "unit").unwrap(), "mA");
        assert_eq!(
            params.names("si_prefix", "units").unwrap(),
            Some(vec!["mV".to_string(), "kV".to_string()])
        );
    }

    #[test]
    fn missing_and_malformed() {
        let params = CalibrationParams::new()
            .with("slope", "steep")
            .with("offset", f64::NAN);

        assert!(matches!(
            params.number("linear", "gain"),
            Err(ConfigurationError::MissingParameter { .. })
        ));
        assert!(matches!(
            params.number("linear", "slope"),
            Err(ConfigurationError::MalformedParameter { .. })
        ));
        assert!(matches!(
            params.number("linear", "offset"),
            Err(ConfigurationError::MalformedParameter { .. })
        ));
        assert!(params.only("linear", &["slope"]).is_err());
    }

    #[test]
    fn deserializes_mixed_yaml_like_json() {
        let params: CalibrationParams =
            serde_json::from_str(r#"{"slope": 3, "unit": "mA", "units": ["a", "b"]}"#).unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.number("linear", "slope").unwrap(), 3.0);
    }
}
