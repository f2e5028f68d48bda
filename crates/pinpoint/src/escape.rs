//! String escaping for generated CSS selectors and XPath expressions.
//!
//! Every value copied out of the document (ids, classes, attribute values,
//! text) passes through one of these before it becomes part of a locator.

use std::fmt::Write;

/// Escape a string for use as a CSS identifier (CSSOM `CSS.escape`).
///
/// ```
/// use pinpoint::escape::css_escape_ident;
/// assert_eq!(css_escape_ident("email"), "email");
/// assert_eq!(css_escape_ident("1st"), "\\31 st");
/// assert_eq!(css_escape_ident("a.b"), "a\\.b");
/// ```
#[must_use]
pub fn css_escape_ident(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);

    for (index, &ch) in chars.iter().enumerate() {
        match ch {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, ch),
            '0'..='9' if index == 0 => push_hex_escape(&mut out, ch),
            '0'..='9' if index == 1 && chars[0] == '-' => push_hex_escape(&mut out, ch),
            '-' if index == 0 && chars.len() == 1 => out.push_str("\\-"),
            c if c as u32 >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c);
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

/// Quote a string as a double-quoted CSS string (attribute selector value).
///
/// ```
/// use pinpoint::escape::css_attr_value;
/// assert_eq!(css_attr_value("submit"), "\"submit\"");
/// assert_eq!(css_attr_value("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
#[must_use]
pub fn css_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, ch),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Build an attribute selector `[name="value"]`.
#[must_use]
pub fn css_attr_selector(name: &str, value: &str) -> String {
    format!("[{}={}]", css_escape_ident(name), css_attr_value(value))
}

/// Quote a string as an XPath 1.0 string literal.
///
/// XPath literals cannot contain their own delimiter, so a value holding
/// both quote characters is assembled with `concat()`.
///
/// ```
/// use pinpoint::escape::xpath_literal;
/// assert_eq!(xpath_literal("email"), "'email'");
/// assert_eq!(xpath_literal("it's"), "\"it's\"");
/// assert_eq!(xpath_literal("a'b\"c"), "concat('a', \"'\", 'b\"c')");
/// ```
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }

    let mut parts = Vec::new();
    for (index, piece) in value.split('\'').enumerate() {
        if index > 0 {
            parts.push("\"'\"".to_string());
        }
        if !piece.is_empty() {
            parts.push(format!("'{piece}'"));
        }
    }
    format!("concat({})", parts.join(", "))
}

fn push_hex_escape(out: &mut String, ch: char) {
    let _ = write!(out, "\\{:x} ", ch as u32);
}
