//! Cooking of numeric and string literal values.

use std::borrow::Cow;

/// Returns true for legacy octal literals such as `0777`.
pub(crate) fn is_legacy_octal(raw: &str) -> bool {
    raw.len() > 1
        && raw.starts_with('0')
        && raw[1..].bytes().all(|b| matches!(b, b'0'..=b'7'))
}

/// Computes the value of a numeric literal from its raw text.
pub(crate) fn numeric_value(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    let (digits, radix) = match cleaned.get(..2) {
        Some("0x" | "0X") => (&cleaned[2..], 16),
        Some("0o" | "0O") => (&cleaned[2..], 8),
        Some("0b" | "0B") => (&cleaned[2..], 2),
        _ if is_legacy_octal(&cleaned) => (&cleaned[1..], 8),
        _ => return cleaned.parse::<f64>().unwrap_or(f64::NAN),
    };
    radix_value(digits, radix)
}

fn radix_value(digits: &str, radix: u32) -> f64 {
    if let Ok(value) = u64::from_str_radix(digits, radix) {
        return value as f64;
    }
    digits.chars().fold(0.0, |acc, c| {
        acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
    })
}

/// Returns the cooked value of a quoted string literal, or `None` when an
/// escape sequence is malformed.
pub(crate) fn string_value(raw: &str) -> Option<Cow<'_, str>> {
    let body = &raw[1..raw.len() - 1];
    if !body.contains('\\') {
        return Some(Cow::Borrowed(body));
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            'u' => {
                let code = if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
                    u32::from_str_radix(&hex, 16).ok()?
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    u32::from_str_radix(&hex, 16).ok()?
                };
                // Lone surrogates cannot be represented; substitute.
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }
    Some(Cow::Owned(out))
}
