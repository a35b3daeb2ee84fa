use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

/// A single caller-supplied feature value before normalization.
///
/// Callers send the same logical field as a number, a boolean or a string
/// depending on where the record came from, so every field keeps its raw tag
/// until the encoder applies the field's coercion rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays and objects. Only meaningful to truthiness checks.
    Compound(Value),
}

impl FeatureValue {
    /// Truthiness used by flag fields: false, zero, empty text, empty
    /// collections and null are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FeatureValue::Null => false,
            FeatureValue::Bool(flag) => *flag,
            FeatureValue::Number(value) => *value != 0.0,
            FeatureValue::Text(text) => !text.is_empty(),
            FeatureValue::Compound(Value::Array(items)) => !items.is_empty(),
            FeatureValue::Compound(Value::Object(map)) => !map.is_empty(),
            FeatureValue::Compound(_) => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FeatureValue::Null)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            FeatureValue::Null => "null",
            FeatureValue::Bool(_) => "boolean",
            FeatureValue::Number(_) => "number",
            FeatureValue::Text(_) => "string",
            FeatureValue::Compound(Value::Array(_)) => "array",
            FeatureValue::Compound(_) => "object",
        }
    }
}

impl From<Value> for FeatureValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FeatureValue::Null,
            Value::Bool(flag) => FeatureValue::Bool(flag),
            Value::Number(number) => match number.as_f64() {
                Some(value) => FeatureValue::Number(value),
                None => FeatureValue::Compound(Value::Number(number)),
            },
            Value::String(text) => FeatureValue::Text(text),
            other => FeatureValue::Compound(other),
        }
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Bool(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Number(f64::from(value))
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl<'de> Deserialize<'de> for FeatureValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(FeatureValue::from)
    }
}

/// Partial description of a subject, keyed by feature name.
///
/// Lookups are by name; insertion order is retained so the keys can be echoed
/// back in the order the caller sent them. Re-inserting a key replaces the
/// value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert, mostly for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Value for `key`, treating an explicit null like an absent key.
    pub fn present(&self, key: &str) -> Option<&FeatureValue> {
        self.get(key).filter(|value| !value.is_null())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FeatureRecord
where
    K: Into<String>,
    V: Into<FeatureValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = FeatureRecord::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

struct FeatureRecordVisitor;

impl<'de> Visitor<'de> for FeatureRecordVisitor {
    type Value = FeatureRecord;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an object mapping feature names to values")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = FeatureRecord::new();
        while let Some((key, value)) = access.next_entry::<String, FeatureValue>()? {
            record.insert(key, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for FeatureRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FeatureRecordVisitor)
    }
}

/// Body of a prediction request. `features` is optional at the wire level so
/// that its absence can be reported as an invalid record rather than a
/// generic decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub features: Option<FeatureRecord>,
}

impl PredictRequest {
    pub fn new(features: FeatureRecord) -> Self {
        Self {
            features: Some(features),
        }
    }
}
