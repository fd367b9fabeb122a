use convert_case::{Case, Casing};

/// Calculates the 1-based line and column number for a given byte position in the source text.
/// Only called when an error is being built, so the linear scan is acceptable.
pub fn get_line_and_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (offset, c) in source.char_indices() {
        if offset >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// `point_start` -> `pointStart`, the charting library's wire naming.
pub fn to_camel_case(name: &str) -> String {
    name.from_case(Case::Snake).to_case(Case::Camel)
}

/// `pointStart` -> `point_start`.
pub fn to_snake_case(name: &str) -> String {
    name.from_case(Case::Camel).to_case(Case::Snake)
}

/// Whether `key` can be written unquoted as an object literal key.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
