// Command-line arguments as renderable values

use qprint_core::{Render, Shape};

/// A shell argument, typed by what it parses as.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Integers first, then floats, then `true`/`false`; anything else is text.
    pub fn infer(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            return Value::Int(v);
        }
        // "inf" and "nan" parse as floats but are meant as words.
        if raw.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(v) = raw.parse::<f64>() {
                return Value::Float(v);
            }
        }
        match raw {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }
}

impl Render for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Int(v) => v.shape(),
            Value::Float(v) => v.shape(),
            Value::Bool(v) => v.shape(),
            Value::Text(v) => v.shape(),
        }
    }
}

/// Resolve `\n`, `\t`, `\r`, `\\` and `\u{...}`-free `\uXXXX` escapes typed on a shell.
pub fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(c) => result.push(c),
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(c) => {
                result.push('\\');
                result.push(c);
            }
            None => result.push('\\'),
        }
    }

    result
}
