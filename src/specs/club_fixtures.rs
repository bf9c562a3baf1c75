// src/specs/club_fixtures.rs
// Club fixtures page: one table row per fixture.
// Cells: home | result | away | date | time | event | organisation | status

use crate::core::html::{ attr_value, table_rows, text_of, to_lower };

const MIN_CELLS: usize = 8;

/// A fixture row as it appears on the page, text only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFixture {
    pub home_team: String,
    pub result: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub event: String,
    pub organisation: String,
    pub status: String,
    /// Absolute match-page link from the result cell, when present.
    pub url: Option<String>,
}

/// Rows involving `club` (case-insensitive, either side).
pub fn parse_doc(doc: &str, base_url: &str, club: &str) -> Vec<RawFixture> {
    let club_lc = to_lower(club);
    let mut out = Vec::new();

    for cells in table_rows(doc) {
        if cells.len() < MIN_CELLS {
            continue;
        }
        let text: Vec<String> = cells.iter().take(MIN_CELLS).map(|c| text_of(c)).collect();
        let involves_club =
            to_lower(&text[0]).contains(&club_lc) || to_lower(&text[2]).contains(&club_lc);
        if !involves_club {
            continue;
        }

        let url = attr_value(cells[1], "href")
            .filter(|h| !h.trim().is_empty())
            .map(|h| absolute_url(base_url, h.trim()));

        let mut it = text.into_iter();
        let mut next = || it.next().unwrap_or_default();
        out.push(RawFixture {
            home_team: next(),
            result: next(),
            away_team: next(),
            date: next(),
            time: next(),
            event: next(),
            organisation: next(),
            status: next(),
            url,
        });
    }

    logd!("club page: {} fixture rows for {club}", out.len());
    out
}

fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        s!(href)
    } else if href.starts_with('/') {
        join!(base_url.trim_end_matches('/'), href)
    } else {
        join!(base_url.trim_end_matches('/'), "/", href)
    }
}

#[cfg(feature = "live")]
pub fn fetch(agent: &ureq::Agent, base_url: &str, page_path: &str, club: &str) -> crate::error::Result<Vec<RawFixture>> {
    let doc = crate::core::net::http_get(agent, &join!(base_url.trim_end_matches('/'), page_path))?;
    Ok(parse_doc(&doc, base_url, club))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<table class="fixtures">
  <tr><th>Home</th><th>Result</th><th>Away</th></tr>
  <tr>
    <td>Andover&nbsp;A</td>
    <td><a href="/lms/match/1201">2&frac12; - 1&frac12;</a></td>
    <td>Fareham B</td>
    <td>Tue 23 Sep 25</td>
    <td>19:30</td>
    <td>Division 2</td>
    <td>Southampton League</td>
    <td>Played</td>
  </tr>
  <tr>
    <td>Winchester A</td><td></td><td>Basingstoke A</td><td>Wed 24 Sep 25</td>
    <td>19:30</td><td>Division 1</td><td>Southampton League</td><td>Scheduled</td>
  </tr>
  <tr>
    <td>Fareham C</td><td>0-0</td><td>ANDOVER B</td><td>Thu 2 Oct 25</td>
    <td>19:45</td><td>Division 3</td><td>Southampton League</td><td>Scheduled</td>
  </tr>
  <tr><td>Andover A</td><td>short row</td></tr>
</table>"#;

    #[test]
    fn keeps_club_rows_only() {
        let rows = parse_doc(PAGE, "https://lms.example.org/", "Andover");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].home_team, "Andover A");
        assert_eq!(rows[0].result, "2½ - 1½");
        assert_eq!(rows[0].date, "Tue 23 Sep 25");
        assert_eq!(rows[0].event, "Division 2");
        assert_eq!(rows[0].url.as_deref(), Some("https://lms.example.org/lms/match/1201"));
        assert_eq!(rows[1].away_team, "ANDOVER B");
        assert_eq!(rows[1].url, None);
    }

    #[test]
    fn links_resolve_against_base() {
        assert_eq!(absolute_url("https://a.org", "m/2"), "https://a.org/m/2");
        assert_eq!(absolute_url("https://a.org", "https://b.org/x"), "https://b.org/x");
    }
}
