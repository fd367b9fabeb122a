//! Per-type field descriptors.
//!
//! A [`Schema`] lists an option type's fields once, with the wire name the charting library
//! expects and an optional default, so that the dict conversions of every option type go
//! through the same routine instead of being written out per type.

use crate::error::{CoercionError, ValueError};
use crate::trim::trim_dict;
use crate::utils::{to_camel_case, to_snake_case};
use crate::value::{Map, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// The Rust-side (snake_case) name.
    pub name: &'static str,
    /// The charting library's (camelCase) name.
    pub wire_name: String,
    pub default: Option<Value>,
}

impl FieldSpec {
    /// A field whose wire name is the camelCase form of `name`.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            wire_name: to_camel_case(name),
            default: None,
        }
    }

    /// Overrides the derived wire name.
    #[must_use]
    pub fn wire(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = wire_name.into();
        self
    }

    #[must_use]
    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Finds a field by its wire name, its snake_case name, or the camelCase form of the
    /// latter when the wire name was overridden.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&FieldSpec> {
        let snake = to_snake_case(key);
        self.fields
            .iter()
            .find(|field| field.wire_name == key || field.name == key || field.name == snake)
    }

    /// Rewrites an incoming mapping to wire names and fills in defaults.
    ///
    /// # Errors
    ///
    /// [`ValueError::UnknownField`] for a key that names no field,
    /// [`ValueError::DuplicateField`] when one field is given under two spellings.
    pub fn normalize(&self, map: &Map) -> Result<Map, CoercionError> {
        let mut normalized = Map::new();
        for (key, value) in map {
            let field = self.lookup(key).ok_or_else(|| ValueError::UnknownField {
                type_name: self.type_name,
                field: key.clone(),
            })?;
            if normalized
                .insert(field.wire_name.clone(), value.clone())
                .is_some()
            {
                return Err(ValueError::DuplicateField {
                    type_name: self.type_name,
                    field: field.name,
                }
                .into());
            }
        }
        for field in &self.fields {
            if let Some(default) = &field.default {
                normalized
                    .entry(field.wire_name.clone())
                    .or_insert_with(|| default.clone());
            }
        }
        Ok(normalized)
    }

    /// Builds a `T` from a mapping keyed by field or wire names. `T` is expected to
    /// deserialize from wire names (`#[serde(rename_all = "camelCase")]`).
    ///
    /// # Errors
    ///
    /// Unknown keys, or field values `T` cannot be deserialized from.
    pub fn from_dict<T: DeserializeOwned>(&self, map: &Map) -> Result<T, CoercionError> {
        let normalized = self.normalize(map)?;
        serde_json::from_value(Value::Object(normalized).to_json_value()).map_err(|err| {
            ValueError::Malformed {
                type_name: self.type_name,
                reason: err.to_string(),
            }
            .into()
        })
    }

    /// Serializes `value` to a mapping holding every schema field under its wire name,
    /// unset fields as null.
    ///
    /// # Errors
    ///
    /// When `value` does not serialize to an object.
    pub fn to_untrimmed_dict<T: Serialize>(&self, value: &T) -> Result<Map, CoercionError> {
        let serialized = serde_json::to_value(value).map_err(|err| ValueError::Malformed {
            type_name: self.type_name,
            reason: err.to_string(),
        })?;
        let Value::Object(mut map) = Value::from(serialized) else {
            return Err(ValueError::Malformed {
                type_name: self.type_name,
                reason: "did not serialize to a mapping".to_string(),
            }
            .into());
        };
        for field in &self.fields {
            map.entry(field.wire_name.clone()).or_insert(Value::Null);
        }
        Ok(map)
    }

    /// [`to_untrimmed_dict`](Self::to_untrimmed_dict) with unset entries removed.
    ///
    /// # Errors
    ///
    /// As [`to_untrimmed_dict`](Self::to_untrimmed_dict).
    pub fn to_dict<T: Serialize>(&self, value: &T) -> Result<Map, CoercionError> {
        self.to_untrimmed_dict(value).map(trim_dict)
    }
}
