// src/patch/scanner.rs
//! Depth-bounded block scanner.
//!
//! Finds one delimited literal (`[...]` or `{...}`) inside an otherwise
//! unparsed source file and splits it into top-level entries. The only
//! grammar understood here:
//! - nesting depth of the region's own delimiter pair,
//! - string literals (`"…"`, `'…'`, `` `…` ``) with backslash escapes,
//! - `//` line comments and `/* … */` block comments.
//!
//! Delimiters inside strings or comments never change depth.
//! All offsets are byte offsets into the buffer; every span starts and ends
//! on an ASCII byte, so slicing with them is always on a char boundary.

use std::ops::Range;

use crate::error::{ Result, SyncError };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delim {
    Bracket,
    Brace,
}

impl Delim {
    pub fn open(self) -> u8 {
        match self { Delim::Bracket => b'[', Delim::Brace => b'{' }
    }

    pub fn close(self) -> u8 {
        match self { Delim::Bracket => b']', Delim::Brace => b'}' }
    }

    pub fn from_open(b: u8) -> Option<Self> {
        match b {
            b'[' => Some(Delim::Bracket),
            b'{' => Some(Delim::Brace),
            _ => None,
        }
    }
}

/// Byte span `[start, end)` in a host buffer.
/// For a located region, `start` is the opening delimiter and `end` is one
/// past its closing partner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRegion {
    pub start: usize,
    pub end: usize,
}

impl TextRegion {
    pub fn text<'a>(&self, buf: &'a str) -> &'a str {
        &buf[self.start..self.end]
    }

    /// Span between the delimiters.
    pub fn body_range(&self) -> Range<usize> {
        (self.start + 1)..(self.end - 1).max(self.start + 1)
    }

    pub fn body<'a>(&self, buf: &'a str) -> &'a str {
        &buf[self.body_range()]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// A `key: value` entry of a mapping literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    /// Key text without its quotes
    pub key: String,
    /// From the first byte of the key to the end of the value
    pub span: TextRegion,
}

/* ---------------- lexical helpers ---------------- */

#[inline]
pub(crate) fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

#[inline]
fn is_separator(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | b',')
}

/// `i` sits on a quote. Returns the offset just past the closing quote.
/// Plain quotes also stop at a newline so one stray quote cannot swallow the
/// rest of the file; an unterminated literal runs to the end of the buffer.
pub(crate) fn skip_string(b: &[u8], i: usize) -> usize {
    let quote = b[i];
    let mut j = i + 1;
    while j < b.len() {
        match b[j] {
            b'\\' => j += 2,
            b'\n' if quote != b'`' => return j,
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    b.len()
}

/// If a comment starts at `i`, the offset just past it.
pub(crate) fn skip_comment(b: &[u8], i: usize) -> Option<usize> {
    if b.get(i) != Some(&b'/') {
        return None;
    }
    match b.get(i + 1) {
        Some(b'/') => {
            let nl = b[i..].iter().position(|&c| c == b'\n').map(|p| i + p);
            Some(nl.unwrap_or(b.len()))
        }
        Some(b'*') => {
            let close = b[i + 2..].windows(2).position(|w| w == b"*/");
            Some(close.map(|p| i + 2 + p + 2).unwrap_or(b.len()))
        }
        _ => None,
    }
}

/// Skip a string or comment starting at `i`.
pub(crate) fn skip_inert(b: &[u8], i: usize) -> Option<usize> {
    match b.get(i)? {
        b'"' | b'\'' | b'`' => Some(skip_string(b, i)),
        b'/' => skip_comment(b, i),
        _ => None,
    }
}

/* ---------------- region location ---------------- */

/// Offset one past the delimiter closing the one at `open_at`, tracking the
/// depth of that delimiter pair only. `None` if depth never returns to zero.
pub fn find_matching_close(buf: &str, open_at: usize) -> Option<usize> {
    let b = buf.as_bytes();
    let delim = Delim::from_open(*b.get(open_at)?)?;
    let mut depth = 0usize;
    let mut i = open_at;
    while i < b.len() {
        if let Some(next) = skip_inert(b, i) {
            i = next;
            continue;
        }
        let c = b[i];
        if c == delim.open() {
            depth += 1;
        } else if c == delim.close() {
            depth -= 1;
            if depth == 0 {
                return Some(i + 1);
            }
        }
        i += 1;
    }
    None
}

/// First opening delimiter at or after `from`, outside strings and comments.
fn next_open_delim(buf: &str, from: usize) -> Option<usize> {
    let b = buf.as_bytes();
    let mut i = from;
    while i < b.len() {
        if let Some(next) = skip_inert(b, i) {
            i = next;
            continue;
        }
        if Delim::from_open(b[i]).is_some() {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Locate the literal that follows the first occurrence of `anchor`.
/// The search for the opening delimiter starts after the anchor text, so a
/// marker may itself contain delimiters (`Foo[] =`).
pub fn locate_region(buf: &str, anchor: &str) -> Result<TextRegion> {
    let not_found = || SyncError::RegionNotFound { anchor: s!(anchor) };

    let at = buf.find(anchor).ok_or_else(not_found)?;
    let open_at = next_open_delim(buf, at + anchor.len()).ok_or_else(not_found)?;
    let end = find_matching_close(buf, open_at)
        .ok_or_else(|| SyncError::UnbalancedRegion { anchor: s!(anchor) })?;

    logd!("region after `{anchor}` spans {open_at}..{end}");
    Ok(TextRegion { start: open_at, end })
}

/// Every region introduced by `anchor`, in source order.
pub fn locate_all_regions(buf: &str, anchor: &str) -> Vec<TextRegion> {
    let mut out = Vec::new();
    let mut from = 0usize;
    while let Some(rel) = buf.get(from..).and_then(|rest| rest.find(anchor)) {
        let after = from + rel + anchor.len();
        match next_open_delim(buf, after).and_then(|o| find_matching_close(buf, o).map(|e| (o, e))) {
            Some((start, end)) => {
                out.push(TextRegion { start, end });
                from = end;
            }
            None => from = after,
        }
    }
    out
}

/* ---------------- entry splitting ---------------- */

/// Split a region's body into balanced `entry`-delimited top-level entries.
/// Anything that does not open an entry (stray tokens, comments, spreads) is
/// stepped over.
pub fn split_top_level_entries(buf: &str, region: TextRegion, entry: Delim) -> Vec<TextRegion> {
    let b = buf.as_bytes();
    let body = region.body_range();
    let end = body.end;
    let mut out = Vec::new();
    let mut i = body.start;

    while i < end {
        while i < end && is_separator(b[i]) {
            i += 1;
        }
        if i >= end {
            break;
        }
        if let Some(next) = skip_inert(b, i) {
            i = next;
            continue;
        }
        if b[i] != entry.open() {
            i += 1;
            continue;
        }
        match find_matching_close(buf, i) {
            Some(e) if e <= end => {
                out.push(TextRegion { start: i, end: e });
                i = e;
            }
            _ => break,
        }
    }
    out
}

/// Split a mapping region's body into `key: value` entries.
/// Keys may be quoted or bare identifiers; values may be nested literals or
/// scalars running to the next top-level comma.
pub fn split_mapping_entries(buf: &str, region: TextRegion) -> Vec<MappingEntry> {
    let b = buf.as_bytes();
    let end = region.body_range().end;
    let mut out = Vec::new();
    let mut i = region.body_range().start;

    while i < end {
        while i < end && is_separator(b[i]) {
            i += 1;
        }
        if i >= end {
            break;
        }
        if let Some(next) = skip_comment(b, i) {
            i = next;
            continue;
        }

        // key
        let key_start = i;
        let key = match b[i] {
            b'"' | b'\'' => {
                let close = skip_string(b, i).min(end);
                i = close;
                // an unterminated key runs to the line end and has no closing quote
                let inner_end = if close > key_start + 1 && b[close - 1] == b[key_start] { close - 1 } else { close };
                buf.get(key_start + 1..inner_end).unwrap_or("").to_string()
            }
            c if is_ident_byte(c) => {
                while i < end && is_ident_byte(b[i]) {
                    i += 1;
                }
                buf[key_start..i].to_string()
            }
            _ => {
                i += 1;
                continue;
            }
        };

        i = skip_ws_and_comments(b, i, end);
        if i >= end || b[i] != b':' {
            continue;
        }
        i = skip_ws_and_comments(b, i + 1, end);
        if i >= end {
            break;
        }

        // value
        let value_end = if Delim::from_open(b[i]).is_some() {
            match find_matching_close(buf, i) {
                Some(e) if e <= end => e,
                _ => break,
            }
        } else {
            scalar_end(b, i, end)
        };

        out.push(MappingEntry { key, span: TextRegion { start: key_start, end: value_end } });
        i = value_end;
    }
    out
}

fn skip_ws_and_comments(b: &[u8], mut i: usize, end: usize) -> usize {
    while i < end {
        if b[i].is_ascii_whitespace() {
            i += 1;
        } else if let Some(next) = skip_comment(b, i) {
            i = next;
        } else {
            break;
        }
    }
    i
}

/// End of a scalar value: next top-level comma or the region end, with
/// trailing whitespace trimmed off.
fn scalar_end(b: &[u8], mut i: usize, end: usize) -> usize {
    while i < end && b[i] != b',' {
        if let Some(next) = skip_inert(b, i) {
            if b[i] == b'/' {
                break;
            }
            i = next.min(end);
            continue;
        }
        i += 1;
    }
    while i > 0 && b[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = r#"// header with an apostrophe: don't panic
export const completed: SimpleFixture[] = [
  { id: "a-1", homeTeam: "X {brace" },
  { id: "a-2", notes: "closing ] inside" }, // trailing ] comment
];

export const upcoming: SimpleFixture[] = [
];
"#;

    #[test]
    fn region_skips_delimiters_in_marker_strings_and_comments() {
        let r = locate_region(FILE, "completed: SimpleFixture[] =").unwrap();
        let text = r.text(FILE);
        assert!(text.starts_with('['));
        assert!(text.ends_with(']'));
        assert!(text.contains("a-2"));
        assert_eq!(&FILE[r.end..r.end + 1], ";");
    }

    #[test]
    fn empty_region_has_no_entries() {
        let r = locate_region(FILE, "upcoming: SimpleFixture[] =").unwrap();
        assert_eq!(r.body(FILE).trim(), "");
        assert!(split_top_level_entries(FILE, r, Delim::Brace).is_empty());
    }

    #[test]
    fn entries_come_back_in_source_order() {
        let r = locate_region(FILE, "completed: SimpleFixture[] =").unwrap();
        let entries = split_top_level_entries(FILE, r, Delim::Brace);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].text(FILE).contains("a-1"));
        assert!(entries[1].text(FILE).contains("a-2"));
        assert!(entries.iter().all(|e| e.text(FILE).ends_with('}')));
    }

    #[test]
    fn missing_anchor_and_unbalanced_region_are_distinguished() {
        match locate_region(FILE, "nope") {
            Err(SyncError::RegionNotFound { .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
        let broken = "const x = [ { a: 1 }, ";
        match locate_region(broken, "const x =") {
            Err(SyncError::UnbalancedRegion { .. }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_hides_closers_to_end_of_buffer() {
        let buf = "x = [ `open template ] ";
        assert!(find_matching_close(buf, 4).is_none());
    }

    #[test]
    fn escaped_quotes_do_not_end_strings() {
        let buf = r#"[ "a \" ] b", 1 ]"#;
        assert_eq!(find_matching_close(buf, 0), Some(buf.len()));
    }

    #[test]
    fn stray_content_between_entries_is_skipped() {
        let buf = "[ ...spread, { a: 1 } /* { not me } */ junk { b: 2 } ]";
        let r = TextRegion { start: 0, end: buf.len() };
        let entries = split_top_level_entries(buf, r, Delim::Brace);
        let texts: Vec<&str> = entries.iter().map(|e| e.text(buf)).collect();
        assert_eq!(texts, vec!["{ a: 1 }", "{ b: 2 }"]);
    }

    #[test]
    fn mapping_entries_capture_keys_and_values() {
        let buf = r#"{
  "andover-a-2025-09-23": {
    "boardResults": [ { board: 1 } ]
  },
  // comment between entries
  plain: 42,
  'single': "text, with comma"
}"#;
        let r = TextRegion { start: 0, end: buf.len() };
        let entries = split_mapping_entries(buf, r);
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["andover-a-2025-09-23", "plain", "single"]);
        assert!(entries[0].span.text(buf).ends_with('}'));
        assert_eq!(entries[1].span.text(buf), "plain: 42");
        assert_eq!(entries[2].span.text(buf), r#"'single': "text, with comma""#);
    }

    #[test]
    fn all_regions_for_repeated_marker() {
        let regions = locate_all_regions(FILE, ": SimpleFixture[] =");
        assert_eq!(regions.len(), 2);
        assert!(regions[0].end <= regions[1].start);
    }

    #[test]
    fn unterminated_key_ending_in_multibyte_text() {
        let buf = "{\n  \"café\n  \"ok\": 1\n}";
        let r = TextRegion { start: 0, end: buf.len() };
        let keys: Vec<String> = split_mapping_entries(buf, r).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["ok"]);
    }
}
