//! Best-effort parsing of serialized string lists.
//!
//! Upstream exports write list columns as Python reprs (`['a', "b's"]`) or
//! JSON arrays. Both are accepted; anything that is not a flat list returns
//! `None` so the caller can fall back to treating the raw text as one item.

use serde_json::Value;
use std::iter::Peekable;
use std::str::Chars;

/// Parse a flat list literal. String elements are returned in order; bare
/// scalars such as numbers, `None` or `True` are accepted and dropped.
pub fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let raw = raw.trim();
    if let Ok(values) = serde_json::from_str::<Vec<Value>>(raw) {
        return json_strings(values);
    }
    parse_python_list(raw)
}

/// String elements of a JSON array. Nested arrays or objects make the
/// whole literal unusable, as they do for the repr parser.
fn json_strings(values: Vec<Value>) -> Option<Vec<String>> {
    let mut items = Vec::new();
    for value in values {
        match value {
            Value::String(item) => items.push(item),
            Value::Array(_) | Value::Object(_) => return None,
            _ => {}
        }
    }
    Some(items)
}

fn parse_python_list(raw: &str) -> Option<Vec<String>> {
    let mut chars = raw.chars().peekable();
    if chars.next()? != '[' {
        return None;
    }

    let mut items = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        match *chars.peek()? {
            ']' => {
                chars.next();
                break;
            }
            '\'' | '"' => items.push(parse_quoted(&mut chars)?),
            _ => skip_bare_scalar(&mut chars)?,
        }

        skip_whitespace(&mut chars);
        match chars.next()? {
            ',' => continue,
            ']' => break,
            _ => return None,
        }
    }

    if chars.next().is_some() {
        return None;
    }
    Some(items)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn skip_bare_scalar(chars: &mut Peekable<Chars<'_>>) -> Option<()> {
    let mut consumed = 0;
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || matches!(c, '_' | '.' | '+' | '-') {
            chars.next();
            consumed += 1;
        } else {
            break;
        }
    }
    (consumed > 0).then_some(())
}

fn parse_quoted(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let quote = chars.next()?;
    let mut out = String::new();

    loop {
        let c = chars.next()?;
        if c == quote {
            return Some(out);
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '/' => out.push('/'),
            'x' => out.push(read_hex_escape(chars, 2)?),
            'u' => out.push(read_hex_escape(chars, 4)?),
            'U' => out.push(read_hex_escape(chars, 8)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
}

fn read_hex_escape(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let hex: String = (0..digits).map(|_| chars.next()).collect::<Option<String>>()?;
    let code = u32::from_str_radix(&hex, 16).ok()?;
    char::from_u32(code)
}
