//! Runtime configuration payloads exchanged with the persistence / config UI
//! collaborator.
use core::ops::RangeInclusive;

use heapless::FnvIndexMap;

use crate::error::ConfigError;

/// Maximum number of keys in a payload (power of two for `FnvIndexMap`).
pub const MAX_CONFIG_KEYS: usize = 8;

/// Scalar value of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigValue {
    Int(i64),
    Float(f64),
    Bool(bool),
}

/// Plain JSON scalar on the wire: `3`, `3.5` or `true`.
#[cfg(feature = "serde")]
impl serde::Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match *self {
            ConfigValue::Int(value) => serializer.serialize_i64(value),
            ConfigValue::Float(value) => serializer.serialize_f64(value),
            ConfigValue::Bool(value) => serializer.serialize_bool(value),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl serde::de::Visitor<'_> for ScalarVisitor {
            type Value = ConfigValue;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("an integer, a number or a boolean")
            }

            fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<ConfigValue, E> {
                Ok(ConfigValue::Int(value))
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<ConfigValue, E> {
                i64::try_from(value).map(ConfigValue::Int).map_err(|_| {
                    E::invalid_value(serde::de::Unexpected::Unsigned(value), &self)
                })
            }

            fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<ConfigValue, E> {
                Ok(ConfigValue::Float(value))
            }

            fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<ConfigValue, E> {
                Ok(ConfigValue::Bool(value))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Fixed-capacity `key -> value` mapping.
#[derive(Debug, Clone, Default)]
pub struct ConfigPayload {
    entries: FnvIndexMap<&'static str, ConfigValue, MAX_CONFIG_KEYS>,
}

impl ConfigPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key.
    pub fn insert(&mut self, key: &'static str, value: ConfigValue) -> Result<(), ConfigError> {
        self.entries
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| ConfigError::PayloadFull)
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: &'static str, value: ConfigValue) -> Result<Self, ConfigError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.entries.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ConfigValue)> + '_ {
        self.entries.iter().map(|(key, value)| (*key, *value))
    }

    fn require(&self, key: &'static str) -> Result<ConfigValue, ConfigError> {
        self.get(key).ok_or_else(|| {
            #[cfg(feature = "defmt")]
            defmt::warn!("Missing configuration key {}", key);
            ConfigError::MissingKey { key }
        })
    }

    /// Integer value of a required key.
    pub fn require_int(&self, key: &'static str) -> Result<i64, ConfigError> {
        match self.require(key)? {
            ConfigValue::Int(value) => Ok(value),
            _ => Err(ConfigError::InvalidValue { key }),
        }
    }

    /// Integer value of a required key, checked against `range`.
    pub fn require_int_in(
        &self,
        key: &'static str,
        range: RangeInclusive<i64>,
    ) -> Result<i64, ConfigError> {
        let value = self.require_int(key)?;
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(ConfigError::OutOfRange { key })
        }
    }

    /// Numeric value of a required key. Integers are widened to `f64`.
    pub fn require_float(&self, key: &'static str) -> Result<f64, ConfigError> {
        match self.require(key)? {
            ConfigValue::Float(value) if !value.is_nan() => Ok(value),
            ConfigValue::Int(value) => Ok(value as f64),
            _ => Err(ConfigError::InvalidValue { key }),
        }
    }

    /// Numeric value of an optional key.
    pub fn optional_float(&self, key: &'static str) -> Result<Option<f64>, ConfigError> {
        if self.contains_key(key) {
            self.require_float(key).map(Some)
        } else {
            Ok(None)
        }
    }
}
