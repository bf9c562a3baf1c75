// src/patch/insert.rs
//! Anchor-based inserter.
//!
//! An anchor is a regex whose first match marks where new entries go (its
//! start is the insertion point). A fallback pattern is tried when the
//! primary one is absent; if neither matches the file cannot be patched.
//!
//! Separator rule: look at the nearest significant character before the
//! insertion point. An opening delimiter (empty collection) or a comma means
//! no separator; anything else gets a comma. Comment text is not
//! significant, and when a comment sits between that character and the
//! anchor the comma goes right after the character instead of into the comment.

use std::path::Path;

use regex::Regex;

use crate::error::{ Result, SyncError };

use super::scanner::skip_string;

pub fn compile_anchor(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| SyncError::BadAnchor { pattern: s!(pattern), source })
}

/// Start offset of the first primary match, else of the first fallback match.
pub fn find_anchor(buf: &str, primary: &str, fallback: &str) -> Result<Option<usize>> {
    if let Some(m) = compile_anchor(primary)?.find(buf) {
        return Ok(Some(m.start()));
    }
    if let Some(m) = compile_anchor(fallback)?.find(buf) {
        logw!("primary anchor `{primary}` missing; using fallback `{fallback}`");
        return Ok(Some(m.start()));
    }
    Ok(None)
}

/// Start of the nearest significant character before `before`, skipping
/// whitespace and comments. Also reports whether a comment was stepped over.
fn last_significant(buf: &str, before: usize) -> Option<(usize, bool)> {
    let b = buf.as_bytes();
    let mut i = before;
    let mut crossed_comment = false;
    loop {
        while i > 0 && b[i - 1].is_ascii_whitespace() {
            i -= 1;
        }
        if i == 0 {
            return None;
        }
        let mut p = i - 1;
        while !buf.is_char_boundary(p) {
            p -= 1;
        }

        // `*/` closing a block comment
        if b[p] == b'/' && p > 0 && b[p - 1] == b'*' {
            if let Some(open) = buf[..p - 1].rfind("/*") {
                i = open;
                crossed_comment = true;
                continue;
            }
        }

        let line_start = buf[..p].rfind('\n').map_or(0, |n| n + 1);
        if let Some(c) = line_comment_start(b, line_start, p) {
            i = c;
            crossed_comment = true;
            continue;
        }
        return Some((p, crossed_comment));
    }
}

/// Start of a `//` comment covering `p` on the line starting at `line_start`.
fn line_comment_start(b: &[u8], line_start: usize, p: usize) -> Option<usize> {
    let mut j = line_start;
    while j <= p {
        match b[j] {
            b'"' | b'\'' | b'`' => j = skip_string(b, j),
            b'/' if b.get(j + 1) == Some(&b'/') => return Some(j),
            _ => j += 1,
        }
    }
    None
}

/// Splice `header` + `block` in at `at`, with a separator when needed.
/// Text before `at` and after it is carried over unchanged; the only other
/// edit is a lone comma after the last entry when a comment follows it.
pub fn splice(buf: &str, at: usize, header: &str, block: &str) -> String {
    let prev = last_significant(buf, at);
    let needs_sep = prev.is_some_and(|(p, _)| !matches!(buf.as_bytes()[p], b'[' | b'{' | b','));

    let mut insertion = String::with_capacity(block.len() + header.len() + 4);
    let mut comma_at = None;
    match (needs_sep, prev) {
        (true, Some((p, true))) => {
            comma_at = Some(p + buf[p..].chars().next().map_or(1, char::len_utf8));
            insertion.push('\n');
        }
        (true, _) => insertion.push_str(",\n"),
        (false, _) => insertion.push('\n'),
    }
    if !header.is_empty() {
        insertion.push_str(header);
        insertion.push('\n');
    }
    insertion.push_str(block);
    insertion.push('\n');

    let mut out = String::with_capacity(buf.len() + insertion.len() + 1);
    match comma_at {
        Some(c) => {
            out.push_str(&buf[..c]);
            out.push(',');
            out.push_str(&buf[c..at]);
        }
        None => out.push_str(&buf[..at]),
    }
    out.push_str(&insertion);
    out.push_str(&buf[at..]);
    out
}

/// Insert `block` at the file's anchor. Fails when neither pattern matches.
pub fn insert_at_anchor(
    buf: &str,
    path: &Path,
    primary: &str,
    fallback: &str,
    header: &str,
    block: &str,
) -> Result<String> {
    let at = find_anchor(buf, primary, fallback)?.ok_or_else(|| SyncError::AnchorNotFound {
        path: path.to_path_buf(),
        primary: s!(primary),
        fallback: s!(fallback),
    })?;
    Ok(splice(buf, at, header, block))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: &str = r"\s*\]\s*;\s*\n\s*// NEXT";
    const FALLBACK: &str = r"\s*\]\s*;\s*// NEXT";

    #[test]
    fn empty_array_gets_no_comma() {
        let buf = "const a = [\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert_eq!(out, "const a = [\n  { id: \"x\" }\n\n];\n// NEXT\n");
    }

    #[test]
    fn closing_brace_gets_a_comma() {
        let buf = "const a = [\n  { id: \"w\" }\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "  // new", "  { id: \"x\" }").unwrap();
        assert_eq!(out, "const a = [\n  { id: \"w\" },\n  // new\n  { id: \"x\" }\n\n];\n// NEXT\n");
    }

    #[test]
    fn existing_trailing_comma_is_reused() {
        let buf = "const a = [\n  { id: \"w\" },\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert!(out.contains("{ id: \"w\" },\n  { id: \"x\" }"));
        assert!(!out.contains(",,"));
    }

    #[test]
    fn bytes_around_the_anchor_are_preserved() {
        let buf = "head [\n  { id: \"w\" }\n];\n// NEXT\ntail";
        let at = find_anchor(buf, ANCHOR, FALLBACK).unwrap().unwrap();
        let block = "  { id: \"x\" }";
        let out = splice(buf, at, "", block);
        let inserted = join!(",\n", block, "\n");
        assert_eq!(&out[..at], &buf[..at]);
        assert_eq!(&out[at..at + inserted.len()], inserted);
        assert_eq!(&out[at + inserted.len()..], &buf[at..]);
    }

    #[test]
    fn fallback_anchor_is_used() {
        let buf = "const a = [\n  { id: \"w\" }\n]; // NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert!(out.contains("{ id: \"w\" },\n  { id: \"x\" }\n\n]; // NEXT"));
    }

    #[test]
    fn missing_anchors_fail_loudly() {
        let err = insert_at_anchor("const a = [];", Path::new("a.ts"), ANCHOR, FALLBACK, "", "x").unwrap_err();
        assert!(matches!(err, SyncError::AnchorNotFound { .. }));
    }

    #[test]
    fn bad_pattern_is_reported() {
        let err = find_anchor("x", "(", "x").unwrap_err();
        assert!(matches!(err, SyncError::BadAnchor { .. }));
    }

    #[test]
    fn comma_lands_before_a_trailing_comment() {
        let buf = "const a = [\n  { id: \"w\" } // last one\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert_eq!(out, "const a = [\n  { id: \"w\" }, // last one\n  { id: \"x\" }\n\n];\n// NEXT\n");
    }

    #[test]
    fn comment_only_lines_are_not_significant() {
        let buf = "const a = [\n  // nothing yet, it's empty\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert!(out.starts_with("const a = [\n  // nothing yet, it's empty\n  { id: \"x\" }"));
    }

    #[test]
    fn url_in_string_is_not_a_comment() {
        let buf = "const a = [\n  { link: \"https://x.org\" }\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert!(out.contains("{ link: \"https://x.org\" },\n  { id: \"x\" }"));
    }

    #[test]
    fn multibyte_text_in_a_trailing_comment() {
        let buf = "const a = [\n  { id: \"a\" } // won 2½\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  { id: \"x\" }").unwrap();
        assert_eq!(out, "const a = [\n  { id: \"a\" }, // won 2½\n  { id: \"x\" }\n\n];\n// NEXT\n");
    }

    #[test]
    fn multibyte_last_entry_gets_a_whole_comma() {
        let buf = "const a = [\n  1, π\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  2").unwrap();
        assert_eq!(out, "const a = [\n  1, π,\n  2\n\n];\n// NEXT\n");

        let buf = "const a = [\n  1, π /* pi */\n];\n// NEXT\n";
        let out = insert_at_anchor(buf, Path::new("a.ts"), ANCHOR, FALLBACK, "", "  2").unwrap();
        assert_eq!(out, "const a = [\n  1, π, /* pi */\n  2\n\n];\n// NEXT\n");
    }
}
