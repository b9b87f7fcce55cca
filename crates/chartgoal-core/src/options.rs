//! Command option entries
//!
//! Helm options are configured as a list mixing bare flags and single
//! `key: value` maps:
//!
//! ```yaml
//! globalOptions:
//!   - debug
//!   - tiller-namespace: kube-system
//! ```
//!
//! Dashes are added when the argument list is synthesized.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A single configured option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliOption {
    /// Bare flag without a value, e.g. `wait` becomes `--wait`
    Flag(String),
    /// Option with a value, e.g. `timeout: 300` becomes `--timeout 300`
    KeyValue { key: String, value: String },
}

/// Ordered list of options from one configuration source
pub type OptionList = Vec<CliOption>;

impl CliOption {
    /// Create a bare flag
    pub fn flag(name: impl Into<String>) -> Self {
        CliOption::Flag(name.into())
    }

    /// Create a valued option
    pub fn value(key: impl Into<String>, value: impl Into<String>) -> Self {
        CliOption::KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Serialize for CliOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CliOption::Flag(name) => serializer.serialize_str(name),
            CliOption::KeyValue { key, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, value)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for CliOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CliOptionVisitor)
    }
}

struct CliOptionVisitor;

impl<'de> Visitor<'de> for CliOptionVisitor {
    type Value = CliOption;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a bare flag name or a map with exactly one key")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(CliOption::Flag(v.to_string()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let Some((key, value)) = map.next_entry::<String, OptionValue>()? else {
            return Err(de::Error::invalid_length(0, &self));
        };
        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom(format!(
                "option '{}' must be the only key in its map",
                key
            )));
        }
        Ok(CliOption::KeyValue {
            key,
            value: value.0,
        })
    }
}

/// Scalar option value, stringified
struct OptionValue(String);

impl<'de> Deserialize<'de> for OptionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = OptionValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(OptionValue(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(OptionValue(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(OptionValue(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(OptionValue(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(OptionValue(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}
