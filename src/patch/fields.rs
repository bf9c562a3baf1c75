// src/patch/fields.rs
// Bounded field lookup inside one entry's text: `key: "value"`.
// Keys may be bare or quoted. String values come back raw (no unescaping),
// which mirrors the emitter writing them verbatim.

use super::scanner::{ is_ident_byte, skip_comment, skip_string };

/// Value bound to `field` in `entry`, first match in source order at any
/// depth. Non-string values run to the next `,`, `}` or newline.
pub fn extract_field<'a>(entry: &'a str, field: &str) -> Option<&'a str> {
    let b = entry.as_bytes();
    let mut i = 0usize;

    while i < b.len() {
        if let Some(next) = skip_comment(b, i) {
            i = next;
            continue;
        }
        let c = b[i];
        let (name, after) = if matches!(c, b'"' | b'\'' | b'`') {
            let close = skip_string(b, i);
            let inner = entry.get(i + 1..close.saturating_sub(1)).unwrap_or("");
            (inner, close)
        } else if is_ident_byte(c) && (i == 0 || !is_ident_byte(b[i - 1])) {
            let mut j = i;
            while j < b.len() && is_ident_byte(b[j]) {
                j += 1;
            }
            (&entry[i..j], j)
        } else {
            i += 1;
            continue;
        };

        if name == field {
            if let Some(v) = value_after_colon(entry, after) {
                return Some(v);
            }
        }
        i = after.max(i + 1);
    }
    None
}

fn value_after_colon(entry: &str, mut i: usize) -> Option<&str> {
    let b = entry.as_bytes();
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    if b.get(i) != Some(&b':') {
        return None;
    }
    i += 1;
    while i < b.len() && b[i].is_ascii_whitespace() {
        i += 1;
    }
    match b.get(i)? {
        b'"' | b'\'' | b'`' => {
            let close = skip_string(b, i);
            if close == 0 || b.get(close - 1) != Some(&b[i]) || close == i + 1 {
                return None; // unterminated
            }
            Some(&entry[i + 1..close - 1])
        }
        _ => {
            let end = b[i..]
                .iter()
                .position(|&c| matches!(c, b',' | b'}' | b'\n'))
                .map(|p| i + p)
                .unwrap_or(b.len());
            Some(entry[i..end].trim())
        }
    }
}
