// src/core/html.rs
// Tolerant, case-insensitive tag scanning for the results site's tables.

use super::sanitize::{ normalize_entities, normalize_ws };

pub fn to_lower(s: &str) -> String {
    s.chars().map(|c| c.to_ascii_lowercase()).collect()
}

/// Byte span of the next `<open …>…</close>` block at or after `from`.
/// The lowered copy must be `to_lower(s)`; ASCII lowering keeps offsets aligned.
fn next_block_in(s: &str, lc: &str, open: &str, close: &str, from: usize) -> Option<(usize, usize)> {
    let start = lc.get(from..)?.find(open)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end = lc[open_end..].find(close)? + open_end + close.len();
    Some((start, end))
}

/// Byte spans of all `<tag …>…</tag>` blocks in order, non-nested.
pub fn tag_spans(s: &str, tag: &str) -> Vec<(usize, usize)> {
    let lc = to_lower(s);
    let open = join!("<", &to_lower(tag));
    let close = join!("</", &to_lower(tag), ">");
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b, e)) = next_block_in(s, &lc, &open, &close, pos) {
        // `<td` must not match `<tdx`
        let next = s.as_bytes().get(b + open.len()).copied().unwrap_or(b'>');
        if next == b'>' || next == b'/' || next.is_ascii_whitespace() {
            out.push((b, e));
            pos = e;
        } else {
            pos = b + open.len();
        }
    }
    out
}

pub fn tag_blocks<'a>(s: &'a str, tag: &str) -> Vec<&'a str> {
    tag_spans(s, tag).into_iter().map(|(b, e)| &s[b..e]).collect()
}

pub fn inner_after_open_tag(block: &str) -> &str {
    match (block.find('>'), block.rfind('<')) {
        (Some(oe), Some(cs)) if cs > oe => &block[oe + 1..cs],
        _ => "",
    }
}

pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let mut out = String::with_capacity(s.as_ref().len());
    let mut in_tag = false;
    for ch in s.as_ref().chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Visible text of a block: tags stripped, entities decoded, whitespace collapsed.
pub fn text_of(block: &str) -> String {
    normalize_ws(&normalize_entities(&strip_tags(inner_after_open_tag(block))))
}

/// Value of the first `attr="…"` (or single-quoted) inside `block`.
pub fn attr_value(block: &str, attr: &str) -> Option<String> {
    let lc = to_lower(block);
    let needle = join!(&to_lower(attr), "=");
    let at = lc.find(&needle)? + needle.len();
    let rest = &block[at..];
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &rest[1..];
    let end = body.find(quote)?;
    Some(normalize_entities(&body[..end]))
}

/// Every `<tr>` of the document as its `<td>` blocks.
pub fn table_rows(doc: &str) -> Vec<Vec<&str>> {
    tag_blocks(doc, "tr").into_iter().map(|tr| tag_blocks(tr, "td")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_case_insensitive() {
        let doc = "<TABLE><TR><Td class=x>A</TD><td>B &amp; C</td></tr></table>";
        let rows = table_rows(doc);
        assert_eq!(rows.len(), 1);
        assert_eq!(text_of(rows[0][0]), "A");
        assert_eq!(text_of(rows[0][1]), "B & C");
    }

    #[test]
    fn similar_tag_names_are_not_cells() {
        let doc = "<tr><tdx>no</tdx><td>yes</td></tr>";
        let cells: Vec<String> = table_rows(doc)[0].iter().map(|c| text_of(c)).collect();
        assert_eq!(cells, vec!["yes"]);
    }

    #[test]
    fn nested_markup_flattens_with_spaces() {
        assert_eq!(text_of("<td><a href='/m/1'>Andover</a><br>A</td>"), "Andover A");
    }

    #[test]
    fn attributes() {
        let td = r#"<td><a class="l" HREF="/lms/match/77?a=1&amp;b=2">x</a></td>"#;
        assert_eq!(attr_value(td, "href").as_deref(), Some("/lms/match/77?a=1&b=2"));
        assert_eq!(attr_value("<a href=bare>", "href"), None);
    }
}
