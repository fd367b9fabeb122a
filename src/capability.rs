//! The construction interface a target type offers to the coercion engine.
//!
//! Instead of probing a type for methods at runtime, every coercible type implements
//! [`Coercible`] and reports which alternate representations it can be built from through
//! [`Coercible::capabilities`]. Constructors for capabilities a type does not declare keep
//! their default bodies, which report a [`ConfigurationError::MissingCapability`].

use crate::error::{CoercionError, ConfigurationError, ValueError};
use crate::parser::Parser;
use crate::serialization::to_value;
use crate::value::{Map, Value};
use serde::de::DeserializeOwned;
use std::any::TypeId;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Dict,
    Json,
    JsLiteral,
    Array,
}

impl Capability {
    const fn bit(self) -> u8 {
        match self {
            Capability::Dict => 0b0001,
            Capability::Json => 0b0010,
            Capability::JsLiteral => 0b0100,
            Capability::Array => 0b1000,
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Dict => write!(f, "from_dict"),
            Capability::Json => write!(f, "from_json"),
            Capability::JsLiteral => write!(f, "from_js_literal"),
            Capability::Array => write!(f, "from_array"),
        }
    }
}

/// A set of [`Capability`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Capabilities = Capabilities(0);

    #[must_use]
    pub const fn all() -> Self {
        Capabilities(0b1111)
    }

    #[must_use]
    pub const fn with(self, capability: Capability) -> Self {
        Capabilities(self.0 | capability.bit())
    }

    #[must_use]
    pub const fn contains(self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }
}

/// A type the coercion engine can build values of.
pub trait Coercible: Sized + 'static {
    /// Name used in error messages, e.g. `"Point"`.
    const TYPE_NAME: &'static str;

    fn capabilities() -> Capabilities;

    /// Builds an instance from a flat key/value mapping.
    fn from_dict(_map: &Map) -> Result<Self, CoercionError> {
        Err(missing::<Self>(Capability::Dict))
    }

    fn from_json(_text: &str) -> Result<Self, CoercionError> {
        Err(missing::<Self>(Capability::Json))
    }

    fn from_js_literal(_text: &str) -> Result<Self, CoercionError> {
        Err(missing::<Self>(Capability::JsLiteral))
    }

    /// Builds one instance per element of a raw collection, e.g. `[[x, y], ...]` data arrays.
    fn from_array(_items: &[Value]) -> Result<Vec<Self>, CoercionError> {
        Err(missing::<Self>(Capability::Array))
    }
}

fn missing<T: Coercible>(capability: Capability) -> CoercionError {
    ConfigurationError::MissingCapability {
        type_name: T::TYPE_NAME,
        capability,
    }
    .into()
}

/// Runtime description of a declared target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub capabilities: Capabilities,
    id: TypeId,
}

impl TypeDescriptor {
    #[must_use]
    pub fn of<T: Coercible>() -> Self {
        Self {
            name: T::TYPE_NAME,
            capabilities: T::capabilities(),
            id: TypeId::of::<T>(),
        }
    }

    #[must_use]
    pub fn is<T: Coercible>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

/// The ordered list of types a value may be coerced to. The first entry is the primary type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeSet {
    types: Vec<TypeDescriptor>,
}

impl TypeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn of<T: Coercible>() -> Self {
        Self {
            types: vec![TypeDescriptor::of::<T>()],
        }
    }

    /// Appends a further candidate type.
    #[must_use]
    pub fn and<T: Coercible>(mut self) -> Self {
        self.types.push(TypeDescriptor::of::<T>());
        self
    }

    pub fn push(&mut self, descriptor: TypeDescriptor) {
        self.types.push(descriptor);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn primary(&self) -> Option<&TypeDescriptor> {
        self.types.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// Checks the declaration against the type the caller wants back.
    pub(crate) fn resolve_primary<T: Coercible>(
        &self,
    ) -> Result<&TypeDescriptor, ConfigurationError> {
        let primary = self.primary().ok_or(ConfigurationError::EmptyTypes)?;
        if !primary.is::<T>() {
            return Err(ConfigurationError::PrimaryTypeMismatch {
                declared: primary.name,
                requested: T::TYPE_NAME,
            });
        }
        Ok(primary)
    }
}

impl FromIterator<TypeDescriptor> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}

// === serde-backed constructors ===

/// `from_dict` through serde: the mapping is deserialized with the type's own field names.
pub fn dict_via_serde<T: DeserializeOwned>(
    type_name: &'static str,
    map: &Map,
) -> Result<T, CoercionError> {
    let json = Value::Object(map.clone()).to_json_value();
    serde_json::from_value(json).map_err(|err| malformed(type_name, &err))
}

pub fn json_via_serde<T: DeserializeOwned>(
    type_name: &'static str,
    text: &str,
) -> Result<T, CoercionError> {
    serde_json::from_str(text).map_err(|err| malformed(type_name, &err))
}

/// `from_js_literal` through serde: the text is parsed as an object literal first.
pub fn js_literal_via_serde<T: DeserializeOwned>(
    type_name: &'static str,
    text: &str,
) -> Result<T, CoercionError> {
    let document = Parser::new_with_name(text, format!("{type_name} literal")).parse_document()?;
    let json = to_value(&document.root).to_json_value();
    serde_json::from_value(json).map_err(|err| malformed(type_name, &err))
}

/// `from_array` through serde. Each element may be a mapping or, for structs, a positional
/// array such as `[x, y]`.
pub fn array_via_serde<T: DeserializeOwned>(
    type_name: &'static str,
    items: &[Value],
) -> Result<Vec<T>, CoercionError> {
    items
        .iter()
        .map(|item| {
            serde_json::from_value(item.to_json_value()).map_err(|err| malformed(type_name, &err))
        })
        .collect()
}

fn malformed(type_name: &'static str, err: &impl Display) -> CoercionError {
    ValueError::Malformed {
        type_name,
        reason: err.to_string(),
    }
    .into()
}

/// Implements [`Coercible`] for a serde-deserializable type, declaring the listed
/// capabilities (`dict`, `json`, `js_literal`, `array`) and backing each with serde.
///
/// ```
/// use chartopt_core::coercible;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// coercible!(Point as "Point": dict, json, js_literal, array);
/// ```
#[macro_export]
macro_rules! coercible {
    (@cap dict) => { $crate::Capability::Dict };
    (@cap json) => { $crate::Capability::Json };
    (@cap js_literal) => { $crate::Capability::JsLiteral };
    (@cap array) => { $crate::Capability::Array };

    (@method dict) => {
        fn from_dict(map: &$crate::Map) -> ::core::result::Result<Self, $crate::CoercionError> {
            $crate::capability::dict_via_serde(<Self as $crate::Coercible>::TYPE_NAME, map)
        }
    };
    (@method json) => {
        fn from_json(text: &str) -> ::core::result::Result<Self, $crate::CoercionError> {
            $crate::capability::json_via_serde(<Self as $crate::Coercible>::TYPE_NAME, text)
        }
    };
    (@method js_literal) => {
        fn from_js_literal(text: &str) -> ::core::result::Result<Self, $crate::CoercionError> {
            $crate::capability::js_literal_via_serde(<Self as $crate::Coercible>::TYPE_NAME, text)
        }
    };
    (@method array) => {
        fn from_array(
            items: &[$crate::Value],
        ) -> ::core::result::Result<::std::vec::Vec<Self>, $crate::CoercionError> {
            $crate::capability::array_via_serde(<Self as $crate::Coercible>::TYPE_NAME, items)
        }
    };

    ($ty:ty as $name:literal $(: $($cap:ident),* $(,)?)?) => {
        impl $crate::Coercible for $ty {
            const TYPE_NAME: &'static str = $name;

            fn capabilities() -> $crate::Capabilities {
                $crate::Capabilities::NONE $($( .with($crate::coercible!(@cap $cap)) )*)?
            }

            $($( $crate::coercible!(@method $cap); )*)?
        }
    };
}
