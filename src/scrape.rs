// src/scrape.rs
//! Scraping collaborator and new-result detection.
//!
//! `ResultsSource` is the seam to the results site; `LmsSource` is the live
//! implementation (feature `live`). `build_payload` turns whatever a source
//! returns into the update payload, skipping fixtures the host file already
//! records a result for.

use std::collections::HashSet;

use crate::{
    config::consts::FIXTURE_ARRAY_MARKER,
    config::options::Defaults,
    core::sanitize::team_match_key,
    error::Result,
    model::{ FixtureResults, Summary, UpdatePayload },
    normalize,
    patch::{ fields::extract_field, scanner, Delim },
    progress::Progress,
    specs::club_fixtures::RawFixture,
    specs::match_details::RawMatchDetails,
};

pub trait ResultsSource {
    fn fetch_fixtures(&self) -> Result<Vec<RawFixture>>;
    fn fetch_match_details(&self, url: &str) -> Result<RawMatchDetails>;
}

#[cfg(feature = "live")]
pub use live::LmsSource;

#[cfg(feature = "live")]
mod live {
    use super::*;
    use crate::config::consts::{ CLUB_PAGE_PATH, LMS_BASE_URL };
    use crate::core::net;
    use crate::specs::{ club_fixtures, match_details };

    pub struct LmsSource {
        agent: ureq::Agent,
        base_url: String,
        club_page: String,
        club: String,
    }

    impl LmsSource {
        pub fn new(club: &str) -> Self {
            Self {
                agent: net::agent(),
                base_url: s!(LMS_BASE_URL),
                club_page: s!(CLUB_PAGE_PATH),
                club: s!(club),
            }
        }
    }

    impl ResultsSource for LmsSource {
        fn fetch_fixtures(&self) -> Result<Vec<RawFixture>> {
            club_fixtures::fetch(&self.agent, &self.base_url, &self.club_page, &self.club)
        }

        fn fetch_match_details(&self, url: &str) -> Result<RawMatchDetails> {
            match_details::fetch(&self.agent, url)
        }
    }
}

/// The live source for `defaults.club`, or `LiveUnavailable` when built without it.
pub fn live_source(defaults: &Defaults) -> Result<Box<dyn ResultsSource>> {
    #[cfg(feature = "live")]
    {
        Ok(Box::new(LmsSource::new(&defaults.club)))
    }
    #[cfg(not(feature = "live"))]
    {
        let _ = defaults;
        Err(crate::error::SyncError::LiveUnavailable)
    }
}

/* ---------------- existing fixtures ---------------- */

/// Fields of a fixture entry already in the host file, as written there.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingFixture {
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub status: String,
    pub result: String,
}

/// Every entry of every `SimpleFixture[]` literal in `buf`.
/// Entries without home, away and date are ignored.
pub fn read_existing_fixtures(buf: &str) -> Vec<ExistingFixture> {
    let mut out = Vec::new();
    for region in scanner::locate_all_regions(buf, FIXTURE_ARRAY_MARKER) {
        for entry in scanner::split_top_level_entries(buf, region, Delim::Brace) {
            let text = entry.text(buf);
            let field = |name: &str| extract_field(text, name).map(|v| s!(v));
            let (Some(home_team), Some(away_team), Some(date)) =
                (field("homeTeam"), field("awayTeam"), field("date"))
            else {
                continue;
            };
            out.push(ExistingFixture {
                home_team,
                away_team,
                date,
                status: field("status").unwrap_or_default(),
                result: field("result").unwrap_or_default(),
            });
        }
    }
    logd!("read {} existing fixtures", out.len());
    out
}

/* ---------------- detection ---------------- */

/// Scraped fixtures with a result the host file does not yet record.
pub fn find_new_results<'a>(
    scraped: &'a [RawFixture],
    existing: &[ExistingFixture],
    defaults: &Defaults,
) -> Vec<&'a RawFixture> {
    scraped
        .iter()
        .filter(|f| normalize::has_result(&f.result))
        .filter(|f| {
            let date = normalize::parse_date(&f.date, defaults);
            let (home, away) = (team_match_key(&f.home_team), team_match_key(&f.away_team));
            let known = existing.iter().find(|e| {
                if e.date != date {
                    return false;
                }
                let (eh, ea) = (team_match_key(&e.home_team), team_match_key(&e.away_team));
                (eh == home && ea == away) || (eh == away && ea == home)
            });
            known.is_none_or(|e| e.result.trim().is_empty())
        })
        .collect()
}

/// Scrape, detect, normalise. Match pages are fetched only for new results
/// that link to one; a failed fetch drops that fixture's board results.
pub fn build_payload(
    source: &dyn ResultsSource,
    existing_text: &str,
    defaults: &Defaults,
    mut progress: Option<&mut dyn Progress>,
) -> Result<UpdatePayload> {
    let scraped = source.fetch_fixtures()?;
    let existing = read_existing_fixtures(existing_text);
    let fresh = find_new_results(&scraped, &existing, defaults);
    logf!("scraped {} fixtures, {} with new results", scraped.len(), fresh.len());

    if let Some(p) = progress.as_deref_mut() {
        p.begin(fresh.len());
    }

    let mut payload = UpdatePayload::default();
    let mut seen: HashSet<String> = HashSet::new();

    for raw in fresh {
        let Some(fixture) = normalize::to_canonical(raw, defaults) else { continue };
        if !seen.insert(fixture.id.clone()) {
            logw!("duplicate fixture id {}; keeping the first", fixture.id);
            continue;
        }

        if let Some(url) = raw.url.as_deref() {
            match source.fetch_match_details(url) {
                Ok(details) => {
                    let board_results: Vec<_> = details.boards.iter().map(normalize::to_board_result).collect();
                    if !board_results.is_empty() || details.notes.is_some() {
                        payload.new_board_results.insert(
                            fixture.id.clone(),
                            FixtureResults { board_results, match_notes: details.notes },
                        );
                    }
                }
                Err(e) => logw!("no match details for {}: {e}", fixture.id),
            }
        }

        if let Some(p) = progress.as_deref_mut() {
            p.fixture(&fixture);
        }
        payload.new_fixtures.push(fixture);
    }

    payload.summary = Some(Summary {
        total_scraped: scraped.len(),
        new_results: payload.new_fixtures.len(),
        fixtures_with_details: payload.new_board_results.len(),
    });
    Ok(payload)
}
