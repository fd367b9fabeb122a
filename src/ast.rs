use miette::SourceSpan;

/// A parsed JS object literal, optionally introduced by `var name =`.
#[derive(Debug, PartialEq, Clone)]
pub struct LiteralDocument {
    pub binding: Option<String>,
    pub root: LiteralValue,
}

#[derive(Debug, PartialEq, Clone)]
pub struct LiteralValue {
    pub kind: LiteralKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl LiteralValue {
    #[must_use]
    pub fn get_source_span(&self) -> SourceSpan {
        (self.pos_start, self.pos_end - self.pos_start).into()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum LiteralKind {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    Object(Vec<Property>),
    Array(Vec<LiteralValue>),
}

/// One `key: value` entry of an object literal. Keys keep source order; duplicates are
/// resolved (last one wins) only when converting to a [`crate::value::Value`].
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: String,
    pub key_span: SourceSpan,
    pub value: LiteralValue,
}
