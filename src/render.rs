//! Turning a [`Value`] back into JSON text.
//!
//! Object members come out in lexicographic key order because that is the
//! iteration order of the underlying `BTreeMap`. Parsed numbers are written
//! back exactly as they appeared in the source.

use crate::value::Value;
use log::warn;

/// Renders `value` as compact JSON with no insignificant whitespace.
#[must_use]
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, None, 0);
    out
}

/// Renders `value` with one member or element per line, nesting indented by
/// repeating `indent_unit`.
#[must_use]
pub fn render_pretty(value: &Value, indent_unit: &str) -> String {
    let mut out = String::new();
    write_value(&mut out, value, Some(indent_unit), 0);
    out
}

fn write_value(out: &mut String, value: &Value, indent: Option<&str>, depth: usize) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int { value, raw } => match raw {
            Some(text) => out.push_str(text),
            None => out.push_str(&value.to_string()),
        },
        Value::Float { value, raw } => match raw {
            Some(text) => out.push_str(text),
            None => write_float(out, *value),
        },
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_value(out, item, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push(']');
        }
        Value::Object(map) => {
            if map.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, indent, depth + 1);
                write_string(out, key);
                out.push(':');
                if indent.is_some() {
                    out.push(' ');
                }
                write_value(out, item, indent, depth + 1);
            }
            newline(out, indent, depth);
            out.push('}');
        }
    }
}

fn newline(out: &mut String, indent: Option<&str>, depth: usize) {
    if let Some(unit) = indent {
        out.push('\n');
        for _ in 0..depth {
            out.push_str(unit);
        }
    }
}

fn write_float(out: &mut String, value: f64) {
    if !value.is_finite() {
        warn!("Non-finite float {value} has no JSON form; rendering it as null");
        out.push_str("null");
        return;
    }
    let text = value.to_string();
    out.push_str(&text);
    // Keep the float tag when the text is read back.
    if !text.contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
