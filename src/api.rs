use crate::ast::LiteralDocument;
use crate::error::CoercionError;
use crate::parser::Parser;
use crate::serialization::to_value;
use crate::value::Value;
use serde::{Serialize, Serializer};
use std::path::Path;

/// The result of parsing a JS object literal.
///
/// Holds the positioned document and converts it into the untyped [`Value`] model or
/// re-emits it as JSON, YAML or JS literal text.
#[derive(Debug, Clone)]
pub struct LiteralAnalysis {
    pub document: LiteralDocument,
}

impl Serialize for LiteralAnalysis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = self.to_value();
        value.serialize(serializer)
    }
}

impl LiteralAnalysis {
    /// Converts the parsed literal into a generic `Value`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        to_value(&self.document.root)
    }

    /// The variable name when the source read `var name = {...}`.
    #[must_use]
    pub fn binding(&self) -> Option<&str> {
        self.document.binding.as_deref()
    }

    /// Serializes the literal into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the literal into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }

    /// Re-emits the literal in canonical JS literal form.
    #[must_use]
    pub fn to_js_literal(&self) -> String {
        self.to_value().to_js_literal()
    }
}

/// Parses JS object literal text.
///
/// # Arguments
///
/// * `source` - The literal text, optionally wrapped as `var name = ...;`.
/// * `file_name` - The name reported in diagnostics.
///
/// # Errors
///
/// Returns a `CoercionError::Literal` if the text is not a valid literal.
pub fn analyze(source: &str, file_name: &str) -> Result<LiteralAnalysis, CoercionError> {
    let mut parser = Parser::new_with_name(source, file_name.to_string());
    let document = parser.parse_document()?;
    Ok(LiteralAnalysis { document })
}

/// Reads and parses a JS object literal file.
///
/// # Errors
///
/// `CoercionError::Io` when the file cannot be read, otherwise as [`analyze`].
pub fn analyze_file(path: impl AsRef<Path>) -> Result<LiteralAnalysis, CoercionError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|err| CoercionError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    analyze(&source, &path.to_string_lossy())
}
