//! Typed value coercion for chart option schemas.
//!
//! Option properties accept whatever users tend to hand them: an already-built option
//! object, a mapping, JSON text, JS object literal text, or a list of any of these.
//! [`coerce`] normalizes such input into the property's declared type, and
//! [`type_sensitive!`] wraps property setters with it. Alongside sit the JS object literal
//! parser, the dict-trim utility, per-type [`Schema`] descriptors and the merge of partial
//! dicts from composed option components.

pub mod api;
pub mod ast;
pub mod capability;
pub mod coerce;
pub mod error;
pub mod flatten;
pub mod lexer;
pub mod parser;
pub mod schema;
mod serialization;
pub mod setter;
pub mod trim;
pub mod utils;
pub mod value;

pub use api::{analyze, analyze_file, LiteralAnalysis};
pub use capability::{Capabilities, Capability, Coercible, TypeDescriptor, TypeSet};
pub use coerce::{coerce, coerce_to, describe_expectation, CoerceOptions, Coerced, Input};
pub use error::{CoercionError, ConfigurationError, LiteralError, UsageError, ValueError};
pub use flatten::{flatten_components, Composed, PartialDict};
pub use schema::{FieldSpec, Schema};
pub use setter::TypeSensitive;
pub use trim::{trim_dict, trim_iterable};
pub use value::{Map, Value};
