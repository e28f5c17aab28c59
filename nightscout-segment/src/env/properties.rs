//! Segment properties: the user's per-segment configuration.
//!
//! Properties are a flat JSON object. Lookups are typed and always take a
//! default, so a missing or mistyped key never fails a segment.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

/// Errors loading properties from JSON.
#[derive(Debug, thiserror::Error)]
pub enum PropertiesError {
    /// Failed to read the properties file
    #[error("failed to read properties: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON
    #[error("properties JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is valid but not an object
    #[error("properties must be a JSON object")]
    NotAnObject,
}

/// Key-value segment configuration with typed getters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, Value>,
}

impl Properties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties from a JSON object.
    pub fn from_json_str(json: &str) -> Result<Self, PropertiesError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            _ => Err(PropertiesError::NotAnObject),
        }
    }

    /// Load properties from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PropertiesError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Set a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a property in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a string property, or `default` if missing or not a string.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => default.to_string(),
        }
    }

    /// Get an integer property, or `default` if missing or not integral.
    ///
    /// Accepts JSON integers, floats with no fractional part, and strings
    /// holding an integer.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.values.get(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }
}
