//! Untyped configuration trees
//!
//! A [`ConfigValue`] is either a mapping or a leaf. Leaves cover the scalar
//! kinds YAML produces (strings, integers, floats, booleans) plus sequences
//! and null, which are carried through merges as opaque leaves.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping node of a configuration tree
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A node in a configuration tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Explicit null (`~` or `null` in YAML)
    Null,
    Bool(bool),
    Int(i64),
    /// Non-negative integer past `i64::MAX`
    UInt(u64),
    Float(f64),
    Str(String),
    /// Sequence leaf; never merged element-wise
    List(Vec<ConfigValue>),
    /// Nested mapping
    Map(ConfigMap),
}

impl Default for ConfigValue {
    fn default() -> Self {
        ConfigValue::Map(ConfigMap::new())
    }
}

impl ConfigValue {
    /// Create an empty mapping
    pub fn map() -> Self {
        Self::default()
    }

    /// Builder-style insert; a no-op on non-mapping values
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        if let ConfigValue::Map(map) = &mut self {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Parse a YAML document into a tree
    ///
    /// Scalar mapping keys (`0: cat`, `true: x`) become their string form.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let raw: serde_yaml::Value = serde_yaml::from_str(yaml)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;
        Self::from_yaml_value(raw)
    }

    fn from_yaml_value(value: serde_yaml::Value) -> Result<Self> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(v) => ConfigValue::Bool(v),
            Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(v), _, _) => ConfigValue::Int(v),
                (None, Some(v), _) => ConfigValue::UInt(v),
                (None, None, Some(v)) => ConfigValue::Float(v),
                (None, None, None) => {
                    return Err(Error::ConfigError(format!("Unsupported YAML number {n}")))
                }
            },
            Value::String(v) => ConfigValue::Str(v),
            Value::Sequence(items) => ConfigValue::List(
                items
                    .into_iter()
                    .map(Self::from_yaml_value)
                    .collect::<Result<_>>()?,
            ),
            Value::Mapping(mapping) => {
                let mut map = ConfigMap::new();
                for (key, value) in mapping {
                    map.insert(yaml_key(key)?, Self::from_yaml_value(value)?);
                }
                ConfigValue::Map(map)
            }
            Value::Tagged(tagged) => Self::from_yaml_value(tagged.value)?,
        })
    }

    /// Render the tree as YAML
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| Error::Serialization(format!("YAML serialization error: {e}")))
    }

    /// Render the tree as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Serialization(format!("JSON serialization error: {e}")))
    }

    /// Deserialize the tree into a typed configuration struct
    pub fn into_typed<T: DeserializeOwned>(&self) -> Result<T> {
        let value = serde_yaml::to_value(self)
            .map_err(|e| Error::Serialization(format!("YAML serialization error: {e}")))?;
        serde_yaml::from_value(value)
            .map_err(|e| Error::ConfigError(format!("Config does not match schema: {e}")))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, ConfigValue::Map(_))
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Unsigned view of either integer variant
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ConfigValue::Int(v) => u64::try_from(*v).ok(),
            ConfigValue::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Float view; integers widen
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            ConfigValue::Int(v) => Some(*v as f64),
            ConfigValue::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Look up a direct child of a mapping
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Look up a nested value by dotted path (`"optimizer.lr"`)
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        path.split('.').try_fold(self, |node, key| node.get(key))
    }
}

/// String form of a scalar mapping key
fn yaml_key(key: serde_yaml::Value) -> Result<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        other => Err(Error::ConfigError(format!(
            "Unsupported mapping key {other:?}: keys must be strings, numbers or booleans"
        ))),
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        ConfigValue::Int(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        ConfigValue::Int(i64::from(v))
    }
}

impl From<u64> for ConfigValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(ConfigValue::UInt(v), ConfigValue::Int)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(v: ConfigMap) -> Self {
        ConfigValue::Map(v)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(v: Vec<ConfigValue>) -> Self {
        ConfigValue::List(v)
    }
}
