use crate::capability::Capability;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Every failure this crate reports.
///
/// The variants keep the distinction callers care about: a [`ConfigurationError`] means the
/// option library itself declared something it cannot honour, a [`ValueError`] means the
/// end user handed over a value that cannot become the declared type.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CoercionError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Literal(#[from] LiteralError),

    #[error("Failed to read {path}: {reason}")]
    #[diagnostic(code(io::read), help("Check that the file exists and is readable."))]
    Io { path: String, reason: String },
}

impl CoercionError {
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, CoercionError::Configuration(_))
    }

    #[must_use]
    pub fn is_value(&self) -> bool {
        matches!(self, CoercionError::Value(_))
    }

    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, CoercionError::Usage(_))
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("types cannot be empty")]
    #[diagnostic(
        code(coerce::empty_types),
        help("Declare at least one target type; the first one is the primary type.")
    )]
    EmptyTypes,

    #[error("primary type {declared} does not match the requested type {requested}")]
    #[diagnostic(
        code(coerce::primary_mismatch),
        help("The first declared type must be the type the coerced value is built as.")
    )]
    PrimaryTypeMismatch {
        declared: &'static str,
        requested: &'static str,
    },

    #[error("{type_name} does not support {capability}")]
    #[diagnostic(
        code(coerce::missing_capability),
        help("Declare the capability on the type or disable the matching allow_* flag.")
    )]
    MissingCapability {
        type_name: &'static str,
        capability: Capability,
    },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("{}value is not expected to be empty, but was empty", context_prefix(.context))]
    #[diagnostic(code(value::unexpected_empty))]
    UnexpectedEmpty { context: Option<String> },

    #[error("{message}")]
    #[diagnostic(code(value::type_mismatch))]
    TypeMismatch {
        message: String,
        expected: &'static str,
        received: &'static str,
    },

    #[error("could not build a {type_name}: {reason}")]
    #[diagnostic(code(value::malformed))]
    Malformed {
        type_name: &'static str,
        reason: String,
    },

    #[error("{type_name} has no field named `{field}`")]
    #[diagnostic(
        code(value::unknown_field),
        help("Fields may be given by their snake_case name or their camelCase wire name.")
    )]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    #[error("{type_name} field `{field}` was given under more than one spelling")]
    #[diagnostic(
        code(value::duplicate_field),
        help("Use either the snake_case name or the camelCase wire name, not both.")
    )]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("{}byte string is not valid UTF-8", context_prefix(.context))]
    #[diagnostic(code(value::invalid_utf8))]
    InvalidUtf8 { context: Option<String> },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("setter `{setter}` was called without a value argument")]
    #[diagnostic(
        code(usage::missing_value_argument),
        help("Type-sensitive setters take the receiver followed by exactly one value.")
    )]
    MissingValueArgument { setter: String },
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LiteralError {
    #[error("Unexpected token at {line}:{column}")]
    #[diagnostic(
        code(literal::unexpected_token),
        help("The parser found a token it did not expect in this position.")
    )]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("Expected {expected}, but found this")]
        span: SourceSpan,
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("Unexpected end of input")]
    #[diagnostic(
        code(literal::unexpected_eof),
        help("The literal ended unexpectedly. The parser expected more tokens.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("Input ended unexpectedly here")]
        span: SourceSpan,
    },

    #[error("Invalid token")]
    #[diagnostic(
        code(literal::invalid_token),
        help("Unclosed strings and comments, and stray characters, are not valid here.")
    )]
    InvalidToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("This could not be read")]
        span: SourceSpan,
    },

    #[error("Literal nested deeper than {limit} levels")]
    #[diagnostic(
        code(literal::too_deep),
        help("Objects and arrays may be nested at most {limit} levels deep.")
    )]
    TooDeep {
        #[source_code]
        src: NamedSource<String>,
        #[label("This level exceeds the limit")]
        span: SourceSpan,
        limit: usize,
    },
}

fn context_prefix(context: &Option<String>) -> String {
    match context {
        Some(name) => format!("{name}: "),
        None => String::new(),
    }
}
