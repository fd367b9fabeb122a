//! The value-coercion engine.
//!
//! [`coerce`] turns whatever a caller assigned to an option property into the property's
//! declared type. The accepted source representations are checked in a fixed order:
//!
//! 1. empty input (and the enforced-null marker),
//! 2. an already-typed instance,
//! 3. a mapping, through [`Coercible::from_dict`],
//! 4. JS object literal text, through [`Coercible::from_js_literal`] (failures fall through;
//!    strict JSON text only when `allow_json` is set),
//! 5. a collection, through [`Coercible::from_array`] when `force_iterable` is set,
//! 6. JSON text or bytes, through [`Coercible::from_json`],
//! 7. per-element coercion of a collection when `force_iterable` is set,
//!
//! and anything left over is rejected with a message listing what would have been accepted.

use crate::capability::{Capability, Coercible, TypeSet};
use crate::error::{CoercionError, ConfigurationError, ValueError};
use crate::value::{Map, Value};
use log::{debug, trace};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

/// The switches a coercion call honours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoerceOptions {
    /// Accept mapping input.
    pub allow_dict: bool,
    /// Accept JSON text (string or bytes).
    pub allow_json: bool,
    /// Accept empty input and return it as empty.
    pub allow_none: bool,
    /// Accept JS object literal text. Ignored when the primary type cannot parse literals.
    pub allow_js_literal: bool,
    /// Treat the input as a collection and coerce each element.
    pub force_iterable: bool,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            allow_dict: true,
            allow_json: true,
            allow_none: true,
            allow_js_literal: true,
            force_iterable: false,
        }
    }
}

impl CoerceOptions {
    /// Default options with `force_iterable` switched on.
    #[must_use]
    pub fn iterable() -> Self {
        Self::default().with_force_iterable(true)
    }

    #[must_use]
    pub const fn with_allow_dict(mut self, allow: bool) -> Self {
        self.allow_dict = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_json(mut self, allow: bool) -> Self {
        self.allow_json = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_none(mut self, allow: bool) -> Self {
        self.allow_none = allow;
        self
    }

    #[must_use]
    pub const fn with_allow_js_literal(mut self, allow: bool) -> Self {
        self.allow_js_literal = allow;
        self
    }

    #[must_use]
    pub const fn with_force_iterable(mut self, force: bool) -> Self {
        self.force_iterable = force;
        self
    }
}

/// A value handed to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    /// No value (`None`).
    Empty,
    /// The enforced-null marker; passed through untouched when empties are allowed.
    EnforcedNull,
    /// An already-typed value.
    Instance(T),
    Map(Map),
    /// Text: JSON or a JS object literal.
    Text(String),
    /// JSON as a byte string.
    Bytes(Vec<u8>),
    List(Vec<Input<T>>),
    /// Booleans and numbers.
    Scalar(Value),
}

impl<T> Input<T> {
    #[must_use]
    pub fn instance(value: T) -> Self {
        Input::Instance(value)
    }

    /// A list of already-typed values.
    pub fn instances(values: impl IntoIterator<Item = T>) -> Self {
        Input::List(values.into_iter().map(Input::Instance).collect())
    }

    /// Empty input in Python's sense: null, `false`, zero, empty text and empty containers.
    /// Typed instances and the enforced-null marker are never empty.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Input::Empty => true,
            Input::EnforcedNull | Input::Instance(_) => false,
            Input::Map(map) => map.is_empty(),
            Input::Text(text) => text.is_empty(),
            Input::Bytes(bytes) => bytes.is_empty(),
            Input::List(items) => items.is_empty(),
            Input::Scalar(value) => !value.is_truthy(),
        }
    }

    /// The raw form of the input, or `None` if it contains typed instances or bytes.
    #[must_use]
    pub fn to_raw(&self) -> Option<Value> {
        match self {
            Input::Empty => Some(Value::Null),
            Input::EnforcedNull => Some(Value::EnforcedNull),
            Input::Instance(_) | Input::Bytes(_) => None,
            Input::Map(map) => Some(Value::Object(map.clone())),
            Input::Text(text) => Some(Value::String(text.clone())),
            Input::List(items) => items
                .iter()
                .map(Input::to_raw)
                .collect::<Option<Vec<_>>>()
                .map(Value::Array),
            Input::Scalar(value) => Some(value.clone()),
        }
    }
}

impl<T: Coercible> Input<T> {
    /// Name of the input's kind for "Received: ..." messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Input::Empty => "null",
            Input::EnforcedNull => "EnforcedNull",
            Input::Instance(_) => T::TYPE_NAME,
            Input::Map(_) => "dict",
            Input::Text(_) => "str",
            Input::Bytes(_) => "bytes",
            Input::List(_) => "list",
            Input::Scalar(value) => value.type_name(),
        }
    }
}

impl<T> From<Value> for Input<T> {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Input::Empty,
            Value::EnforcedNull => Input::EnforcedNull,
            Value::Object(map) => Input::Map(map),
            Value::String(text) => Input::Text(text),
            Value::Array(items) => Input::List(items.into_iter().map(Input::from).collect()),
            scalar => Input::Scalar(scalar),
        }
    }
}

impl<T> From<serde_json::Value> for Input<T> {
    fn from(json: serde_json::Value) -> Self {
        Input::from(Value::from(json))
    }
}

impl<T> From<Map> for Input<T> {
    fn from(map: Map) -> Self {
        Input::Map(map)
    }
}

impl<T> From<&str> for Input<T> {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl<T> From<String> for Input<T> {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl<T> From<&[u8]> for Input<T> {
    fn from(bytes: &[u8]) -> Self {
        Input::Bytes(bytes.to_vec())
    }
}

impl<T> From<Vec<u8>> for Input<T> {
    fn from(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<T> From<bool> for Input<T> {
    fn from(b: bool) -> Self {
        Input::Scalar(Value::Boolean(b))
    }
}

impl<T> From<i64> for Input<T> {
    fn from(i: i64) -> Self {
        Input::Scalar(Value::Integer(i))
    }
}

impl<T> From<f64> for Input<T> {
    fn from(n: f64) -> Self {
        Input::Scalar(Value::Number(n))
    }
}

/// The outcome of a successful coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    Empty,
    EnforcedNull,
    Single(T),
    /// One element per input element, in input order.
    Many(Vec<T>),
    /// Syntactically valid JSON that the primary type could not be built from.
    Untyped(Value),
}

impl<T> Default for Coerced<T> {
    fn default() -> Self {
        Coerced::Empty
    }
}

impl<T> Coerced<T> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Coerced::Empty)
    }

    #[must_use]
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Coerced::Single(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_many(&self) -> Option<&[T]> {
        match self {
            Coerced::Many(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_single(self) -> Option<T> {
        match self {
            Coerced::Single(value) => Some(value),
            _ => None,
        }
    }

    /// All typed values: one for `Single`, every element for `Many`, none otherwise.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Coerced::Single(value) => vec![value],
            Coerced::Many(values) => values,
            _ => Vec::new(),
        }
    }
}

/// Coerces `value` to the primary type of `types`.
///
/// `context` names what is being assigned (usually the property) and only shows up in
/// error messages.
///
/// # Errors
///
/// A [`ConfigurationError`] when `types` is empty, when its primary type is not `T`, or when
/// `T` lacks a constructor the input needs under the active flags. A [`ValueError`] when the
/// input cannot be turned into a `T`.
pub fn coerce<T: Coercible>(
    value: Input<T>,
    types: &TypeSet,
    options: CoerceOptions,
    context: Option<&str>,
) -> Result<Coerced<T>, CoercionError> {
    let primary = types.resolve_primary::<T>()?;

    let mut options = options;
    if options.allow_js_literal && !primary.capabilities.contains(Capability::JsLiteral) {
        options.allow_js_literal = false;
    }

    let expectation = Expectation {
        type_name: primary.name,
        context,
        options,
    };
    resolve(value, &expectation)
}

/// [`coerce`] with `T` as the only declared type.
///
/// # Errors
///
/// See [`coerce`].
pub fn coerce_to<T: Coercible>(
    value: impl Into<Input<T>>,
    options: CoerceOptions,
) -> Result<Coerced<T>, CoercionError> {
    coerce(value.into(), &TypeSet::of::<T>(), options, None)
}

/// What a single coercion call is looking for.
struct Expectation<'a> {
    type_name: &'static str,
    context: Option<&'a str>,
    options: CoerceOptions,
}

impl Expectation<'_> {
    fn mismatch(&self, received: &'static str) -> CoercionError {
        ValueError::TypeMismatch {
            message: describe_expectation(self.type_name, self.context, self.options, received),
            expected: self.type_name,
            received,
        }
        .into()
    }

    fn element(&self, index: usize) -> (Option<String>, CoerceOptions) {
        let context = self.context.map(|name| format!("{name}[{index}]"));
        (context, self.options.with_force_iterable(false))
    }
}

fn resolve<T: Coercible>(
    value: Input<T>,
    exp: &Expectation<'_>,
) -> Result<Coerced<T>, CoercionError> {
    let options = exp.options;

    // Empty handling
    let is_empty_list = matches!(&value, Input::List(items) if items.is_empty());
    if options.allow_none && options.force_iterable && is_empty_list {
        return Ok(Coerced::Many(Vec::new()));
    }
    if options.allow_none && matches!(value, Input::EnforcedNull) {
        return Ok(Coerced::EnforcedNull);
    }
    if value.is_falsy() {
        if options.allow_none {
            return Ok(Coerced::Empty);
        }
        return Err(ValueError::UnexpectedEmpty {
            context: exp.context.map(str::to_string),
        }
        .into());
    }

    let received = value.type_name();
    match value {
        Input::Instance(instance) => Ok(Coerced::Single(instance)),
        Input::Map(map) if options.allow_dict => {
            trace!("coercing dict into {}", exp.type_name);
            require::<T>(Capability::Dict)?;
            T::from_dict(&map).map(Coerced::Single)
        }
        Input::Text(text) => {
            // Strict JSON is JSON even though it also reads as a literal
            let literal_allowed =
                options.allow_js_literal && (options.allow_json || !is_json(&text));
            if literal_allowed {
                match T::from_js_literal(&text) {
                    Ok(instance) => return Ok(Coerced::Single(instance)),
                    Err(err) => debug!("{} is not a {} literal: {err}", received, exp.type_name),
                }
            }
            if options.allow_json {
                return resolve_json(&text, exp);
            }
            Err(exp.mismatch(received))
        }
        Input::Bytes(bytes) if options.allow_json => match std::str::from_utf8(&bytes) {
            Ok(text) => resolve_json(text, exp),
            Err(_) => Err(ValueError::InvalidUtf8 {
                context: exp.context.map(str::to_string),
            }
            .into()),
        },
        Input::List(items) if options.force_iterable => resolve_list(items, exp),
        _ => Err(exp.mismatch(received)),
    }
}

fn is_json(text: &str) -> bool {
    serde_json::from_str::<IgnoredAny>(text).is_ok()
}

fn resolve_json<T: Coercible>(
    text: &str,
    exp: &Expectation<'_>,
) -> Result<Coerced<T>, CoercionError> {
    trace!("coercing JSON text into {}", exp.type_name);
    require::<T>(Capability::Json)?;
    let typed_err = match T::from_json(text) {
        Ok(instance) => return Ok(Coerced::Single(instance)),
        Err(err) => err,
    };

    let Ok(json) = serde_json::from_str::<serde_json::Value>(text) else {
        debug!("text is not JSON: {typed_err}");
        return Err(exp.mismatch("str"));
    };
    match Value::from(json) {
        Value::Array(items) if exp.options.force_iterable => {
            resolve_list(items.into_iter().map(Input::from).collect(), exp)
        }
        generic => {
            debug!(
                "JSON could not be read as {}, keeping it untyped: {typed_err}",
                exp.type_name
            );
            Ok(Coerced::Untyped(generic))
        }
    }
}

fn resolve_list<T: Coercible>(
    items: Vec<Input<T>>,
    exp: &Expectation<'_>,
) -> Result<Coerced<T>, CoercionError> {
    if T::capabilities().contains(Capability::Array) {
        let raw: Option<Vec<Value>> = items.iter().map(Input::to_raw).collect();
        if let Some(raw) = raw {
            trace!("coercing {} items through {}::from_array", raw.len(), exp.type_name);
            match T::from_array(&raw) {
                Ok(values) => return Ok(Coerced::Many(values)),
                Err(err) => {
                    debug!("from_array rejected the collection, coercing per element: {err}");
                }
            }
        }
    }

    let mut values = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let (context, options) = exp.element(index);
        let element = Expectation {
            type_name: exp.type_name,
            context: context.as_deref(),
            options,
        };
        let received = item.type_name();
        match resolve(item, &element)? {
            Coerced::Single(value) => values.push(value),
            _ => return Err(element.mismatch(received)),
        }
    }
    Ok(Coerced::Many(values))
}

fn require<T: Coercible>(capability: Capability) -> Result<(), ConfigurationError> {
    if T::capabilities().contains(capability) {
        Ok(())
    } else {
        Err(ConfigurationError::MissingCapability {
            type_name: T::TYPE_NAME,
            capability,
        })
    }
}

/// Builds the "expects a ..." message for a rejected value, listing the alternate
/// representations the flags allowed.
#[must_use]
pub fn describe_expectation(
    type_name: &str,
    context: Option<&str>,
    options: CoerceOptions,
    received: &str,
) -> String {
    let mut accepted = vec![format!("a {type_name}")];
    if options.allow_dict {
        accepted.push("dict".to_string());
    }
    if options.allow_json || options.allow_js_literal {
        accepted.push("str".to_string());
    }
    if options.force_iterable {
        accepted.push("iterable".to_string());
    }
    if options.allow_none {
        accepted.push("None".to_string());
    }

    let choices = match accepted.len() {
        1 => accepted.remove(0),
        2 => format!("{} or {}", accepted[0], accepted[1]),
        n => format!("{}, or {}", accepted[..n - 1].join(", "), accepted[n - 1]),
    };
    match context {
        Some(name) => format!("{name} expects {choices}. Received: {received}"),
        None => format!("expects {choices}. Received: {received}"),
    }
}
