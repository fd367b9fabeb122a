use crate::ast::{LiteralKind, LiteralValue};
use crate::utils::is_identifier;
use crate::value::{Map, Value};
use std::fmt::Write;

pub(crate) fn to_value(literal: &LiteralValue) -> Value {
    match &literal.kind {
        LiteralKind::String(s) => Value::String(s.clone()),
        LiteralKind::Integer(i) => Value::Integer(*i),
        LiteralKind::Number(n) => Value::Number(*n),
        LiteralKind::Boolean(b) => Value::Boolean(*b),
        LiteralKind::Null | LiteralKind::Undefined => Value::Null,
        LiteralKind::Array(items) => Value::Array(items.iter().map(to_value).collect()),
        LiteralKind::Object(properties) => {
            let mut map = Map::new();
            for property in properties {
                // Later duplicates win, as in a JS engine.
                map.insert(property.key.clone(), to_value(&property.value));
            }
            Value::Object(map)
        }
    }
}

impl Value {
    /// Renders the value as JS object literal text: identifier keys unquoted, strings in
    /// single quotes, two-space indentation for non-empty objects.
    #[must_use]
    pub fn to_js_literal(&self) -> String {
        let mut out = String::new();
        write_literal(&mut out, self, 0);
        out
    }
}

fn write_literal(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Null | Value::EnforcedNull => out.push_str("null"),
        Value::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Integer(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Number(n) => write_number(out, *n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item, indent);
            }
            out.push(']');
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                push_indent(out, indent + 1);
                if is_identifier(key) {
                    out.push_str(key);
                } else {
                    write_string(out, key);
                }
                out.push_str(": ");
                write_literal(out, item, indent + 1);
                if i + 1 < map.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, indent);
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: f64) {
    if n.is_nan() {
        out.push_str("NaN");
    } else if n.is_infinite() {
        out.push_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        // Keep a fraction so the text reads back as a float
        let _ = write!(out, "{n:.1}");
    } else {
        let _ = write!(out, "{n}");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}
