// src/patch/dedupe.rs
//! Keyed deduplicator.
//!
//! Drops the top-level entries of a region whose key is in a purge set and
//! rebuilds the region body from what is left:
//! - indentation is copied from the first entry (two spaces if none),
//! - entries are comma-separated with no trailing comma,
//! - a fully purged body collapses to a single newline.
//!
//! `purge_region_text` is pure; `apply_purge` is the buffer-level wrapper the
//! runner calls.

use std::collections::HashSet;

use crate::config::options::{ EntryShape, PurgeSpec };
use crate::error::Result;

use super::fields::extract_field;
use super::scanner::{ self, Delim, TextRegion };

const DEFAULT_INDENT: &str = "  ";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Purged {
    /// New text for between the region's delimiters
    pub body: String,
    pub kept: usize,
    pub removed: usize,
}

/// Purge `region_text` (the whole literal, delimiters included).
/// Nothing removed → the body comes back byte-for-byte.
pub fn purge_region_text(region_text: &str, shape: &EntryShape, purge: &HashSet<String>) -> Purged {
    let whole = TextRegion { start: 0, end: region_text.len() };
    let original = whole.body(region_text);

    // (span, key) per top-level entry
    let entries: Vec<(TextRegion, Option<String>)> = match shape {
        EntryShape::Sequence { key_field } => {
            scanner::split_top_level_entries(region_text, whole, Delim::Brace)
                .into_iter()
                .map(|e| {
                    let key = extract_field(e.text(region_text), key_field).map(|k| s!(k));
                    (e, key)
                })
                .collect()
        }
        EntryShape::Mapping => scanner::split_mapping_entries(region_text, whole)
            .into_iter()
            .map(|e| (e.span, Some(e.key)))
            .collect(),
    };

    let total = entries.len();
    let kept: Vec<TextRegion> = entries
        .into_iter()
        .filter(|(_, key)| !key.as_ref().is_some_and(|k| purge.contains(k)))
        .map(|(span, _)| span)
        .collect();

    let removed = total - kept.len();
    if removed == 0 {
        return Purged { body: s!(original), kept: total, removed: 0 };
    }

    let indent = detect_indent(region_text, kept.first().copied());
    let mut body = s!();
    for (i, span) in kept.iter().enumerate() {
        body.push('\n');
        body.push_str(&indent);
        body.push_str(span.text(region_text));
        if i + 1 < kept.len() {
            body.push(',');
        }
    }
    body.push('\n');

    Purged { body, kept: kept.len(), removed }
}

/// Whitespace between the entry and the newline before it.
fn detect_indent(text: &str, first: Option<TextRegion>) -> String {
    let Some(first) = first else { return s!(DEFAULT_INDENT) };
    let line_start = text[..first.start].rfind('\n').map(|p| p + 1);
    match line_start {
        Some(ls) => {
            let lead = &text[ls..first.start];
            if lead.bytes().all(|c| c == b' ' || c == b'\t') {
                s!(lead)
            } else {
                s!(DEFAULT_INDENT)
            }
        }
        None => s!(DEFAULT_INDENT),
    }
}

/// Purge every region introduced by `spec.marker` inside `buf`.
/// Returns the (possibly unchanged) buffer and how many entries went.
/// No region at all is `RegionNotFound` (or `UnbalancedRegion`).
pub fn apply_purge(buf: &str, spec: &PurgeSpec, purge: &HashSet<String>) -> Result<(String, usize)> {
    let regions = scanner::locate_all_regions(buf, &spec.marker);
    if regions.is_empty() {
        scanner::locate_region(buf, &spec.marker)?;
        return Ok((s!(buf), 0));
    }

    let mut patched = s!(buf);
    let mut removed = 0usize;
    // back to front so earlier offsets stay valid
    for region in regions.iter().rev() {
        let out = purge_region_text(region.text(buf), &spec.shape, purge);
        if out.removed == 0 {
            continue;
        }
        patched.replace_range(region.body_range(), &out.body);
        removed += out.removed;
        logd!("purged {} of {} entries at {}", out.removed, out.removed + out.kept, region.start);
    }

    if removed > 0 {
        logd!("purged {removed} entries across {} regions after `{}`", regions.len(), spec.marker);
    }
    Ok((patched, removed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> HashSet<String> {
        v.iter().map(|s| s!(*s)).collect()
    }

    fn seq() -> EntryShape {
        EntryShape::Sequence { key_field: s!("id") }
    }

    const REGION: &str = "[
    {
      id: \"andover-a-2025-09-23\",
      homeTeam: \"Andover A\"
    },
    {
      id: \"andover-b-2025-10-01\",
      homeTeam: \"Andover B\"
    }
]";

    #[test]
    fn single_matching_entry_leaves_empty_valid_body() {
        let region = "[\n  {\n    id: \"andover-a-2025-09-23\",\n    homeTeam: \"Andover A\"\n  }\n]";
        let out = purge_region_text(region, &seq(), &ids(&["andover-a-2025-09-23"]));
        assert_eq!(out.body, "\n");
        assert_eq!(out.removed, 1);
        assert_eq!(out.kept, 0);
    }

    #[test]
    fn keeps_indentation_and_drops_trailing_comma() {
        let out = purge_region_text(REGION, &seq(), &ids(&["andover-a-2025-09-23"]));
        assert_eq!(out.removed, 1);
        assert!(out.body.starts_with("\n    {"));
        assert!(out.body.ends_with("}\n"));
        assert!(!out.body.contains("andover-a-2025-09-23"));
        assert!(!out.body.trim_end().ends_with(','));
    }

    #[test]
    fn purge_is_idempotent() {
        let purge = ids(&["andover-b-2025-10-01"]);
        let once = purge_region_text(REGION, &seq(), &purge);
        let rebuilt = join!("[", &once.body, "]");
        let twice = purge_region_text(&rebuilt, &seq(), &purge);
        assert_eq!(twice.removed, 0);
        assert_eq!(twice.body, once.body);
    }

    #[test]
    fn empty_purge_set_returns_body_untouched() {
        let out = purge_region_text(REGION, &seq(), &HashSet::new());
        assert_eq!(out.body, &REGION[1..REGION.len() - 1]);
        assert_eq!(out.kept, 2);
    }

    #[test]
    fn mapping_keys_are_purged() {
        let region = "{\n  \"x-1\": {\n    \"boardResults\": []\n  },\n  \"x-2\": {\n    \"boardResults\": []\n  }\n}";
        let out = purge_region_text(region, &EntryShape::Mapping, &ids(&["x-2"]));
        assert_eq!(out.body, "\n  \"x-1\": {\n    \"boardResults\": []\n  }\n");
    }

    #[test]
    fn apply_purge_only_touches_the_region_body() {
        let buf = format!("const before = 1;\nexport const up: T[] = {REGION};\nconst after = 2;\n");
        let spec = PurgeSpec { marker: s!("export const up: T[] ="), shape: seq() };
        let (out, n) = apply_purge(&buf, &spec, &ids(&["andover-a-2025-09-23", "andover-b-2025-10-01"])).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out, "const before = 1;\nexport const up: T[] = [\n];\nconst after = 2;\n");
    }

    #[test]
    fn apply_purge_covers_every_marked_region() {
        let buf = format!(
            "export const done: T[] = {REGION};\n// anchor\nexport const later: T[] = [\n  {{ id: \"x\" }},\n  {{ id: \"andover-b-2025-10-01\" }}\n];\n"
        );
        let spec = PurgeSpec { marker: s!(": T[] ="), shape: seq() };
        let (out, n) = apply_purge(&buf, &spec, &ids(&["andover-b-2025-10-01"])).unwrap();
        assert_eq!(n, 2);
        assert!(!out.contains("andover-b-2025-10-01"));
        assert!(out.contains("andover-a-2025-09-23"));
        assert!(out.ends_with("// anchor\nexport const later: T[] = [\n  { id: \"x\" }\n];\n"));
    }

    #[test]
    fn apply_purge_without_region_is_an_error() {
        let spec = PurgeSpec { marker: s!(": T[] ="), shape: seq() };
        let err = apply_purge("const a = 1;\n", &spec, &ids(&["x"])).unwrap_err();
        assert!(matches!(err, crate::error::SyncError::RegionNotFound { .. }));
        assert!(!err.is_fatal());
    }
}
