// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&frac12;", "½")
        .replace("&#189;", "½")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Whitespace-collapsed, lowercased team name for matching.
pub fn team_match_key(name: &str) -> String {
    normalize_ws(name).to_lowercase()
}

/// Lowercase words joined by '-', e.g. for venue keys.
pub fn slugify<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    words
        .into_iter()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize_ws("  Andover \t  A\n"), "Andover A");
    }

    #[test]
    fn decodes_half_point_entities() {
        assert_eq!(normalize_entities("2&frac12;&nbsp;&ndash; 1&#189;"), "2½ – 1½");
    }

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(slugify("St. Mary's Club".split_whitespace()), "st-marys-club");
        assert_eq!(team_match_key(" Andover  B "), "andover b");
    }
}
