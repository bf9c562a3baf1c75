// src/normalize.rs
//! Record normalizer.
//!
//! Turns untrusted scraped text into canonical records. Every rule here is
//! lenient: unreadable input falls back to an empty value or a named default
//! from `Defaults`, never to an error.

use std::sync::LazyLock;

use chrono::{ Datelike, NaiveDate };
use regex::Regex;

use crate::config::options::Defaults;
use crate::core::sanitize::{ normalize_ws, slugify };
use crate::model::{ BoardResult, CanonicalFixture, FixtureStatus, GameResult, Outcome, Venue };
use crate::specs::club_fixtures::RawFixture;
use crate::specs::match_details::RawBoardRow;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}:\d{2})").expect("valid time regex"));
static RATING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{3,4}").expect("valid rating regex"));
static HOME_WIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b1\s*[-–]\s*0\b").expect("valid result regex"));
static AWAY_WIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0\s*[-–]\s*1\b").expect("valid result regex"));

const MONTHS: [(&str, &str); 12] = [
    ("jan", "01"), ("feb", "02"), ("mar", "03"), ("apr", "04"),
    ("may", "05"), ("jun", "06"), ("jul", "07"), ("aug", "08"),
    ("sep", "09"), ("oct", "10"), ("nov", "11"), ("dec", "12"),
];

/* ---------------- dates & times ---------------- */

/// `"Tue 23 Sep 25"` → `"2025-09-23"`. Empty string when unreadable.
/// An unknown month maps to `01`; a missing year uses `defaults.year_suffix`.
pub fn parse_date(raw: &str, defaults: &Defaults) -> String {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() < 3 {
        return s!();
    }

    let day = tokens[1];
    if day.is_empty() || day.len() > 2 || !day.bytes().all(|c| c.is_ascii_digit()) {
        return s!();
    }

    let month_key: String = tokens[2].chars().take(3).collect::<String>().to_lowercase();
    let month = MONTHS
        .iter()
        .find(|(abbr, _)| *abbr == month_key)
        .map(|(_, num)| *num)
        .unwrap_or("01");

    let year = tokens
        .get(3)
        .copied()
        .filter(|y| matches!(y.len(), 2 | 4) && y.bytes().all(|c| c.is_ascii_digit()))
        .unwrap_or(defaults.year_suffix.as_str());
    let full_year = if year.len() == 2 { join!("20", year) } else { s!(year) };

    format!("{full_year}-{month}-{day:0>2}")
}

/// First `H:MM`/`HH:MM` in the text, else the default kick-off time.
pub fn parse_time(raw: &str, defaults: &Defaults) -> String {
    TIME_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| s!(m.as_str()))
        .unwrap_or_else(|| defaults.time.clone())
}

/// Season label for an ISO date; seasons turn over in August.
pub fn season_for(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => {
            let start = if d.month() >= 8 { d.year() } else { d.year() - 1 };
            format!("{}-{}", start, start + 1)
        }
        Err(_) => s!(),
    }
}

/* ---------------- scores ---------------- */

/// Unify dashes, drop spaces around the dash, collapse whitespace.
/// The half-point glyph is kept: `"2½ – 1½"` → `"2½-1½"`.
pub fn normalize_score(raw: &str) -> String {
    let dashed = raw.replace(['–', '—'], "-");
    let parts: Vec<String> = dashed.split('-').map(normalize_ws).collect();
    normalize_ws(&parts.join("-"))
}

/// A result is present unless empty or the site's `0-0` placeholder.
pub fn has_result(raw: &str) -> bool {
    let s = normalize_score(raw);
    !s.is_empty() && s != "0-0"
}

/// Numeric sides of a normalized score; `½` counts as `.5`.
pub fn score_values(score: &str) -> Option<(f64, f64)> {
    let mut parts = score.split('-');
    let (home, away) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    Some((score_side(home)?, score_side(away)?))
}

fn score_side(part: &str) -> Option<f64> {
    let mut p = part.trim().replace('½', ".5");
    if p.starts_with('.') {
        p.insert(0, '0');
    }
    if p.is_empty() || !p.bytes().all(|c| c.is_ascii_digit() || c == b'.') {
        return None;
    }
    p.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Outcome from the tracked club's side; `Unknown` if the score is unreadable.
pub fn derive_outcome(score: &str, venue: Venue) -> Outcome {
    let Some((home, away)) = score_values(score) else { return Outcome::Unknown };
    if (home - away).abs() < 1e-6 {
        return Outcome::Draw;
    }
    let (club, other) = match venue {
        Venue::Home => (home, away),
        Venue::Away => (away, home),
    };
    if club > other { Outcome::Win } else { Outcome::Loss }
}

/* ---------------- teams & identifiers ---------------- */

fn mentions_club(team: &str, defaults: &Defaults) -> bool {
    team.to_lowercase().contains(&defaults.club.to_lowercase())
}

pub fn venue_for(home_team: &str, defaults: &Defaults) -> Venue {
    if mentions_club(home_team, defaults) { Venue::Home } else { Venue::Away }
}

/// Single-letter squad designator right after the club name (`Andover B` → `b`).
pub fn team_designator(team: &str, defaults: &Defaults) -> Option<char> {
    let pattern = format!(r"(?i)\b{}\s+([a-z])\b", regex::escape(&defaults.club));
    let re = Regex::new(&pattern).ok()?;
    re.captures(team)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase())
}

/// `<club>-<designator>-<date>`; home team searched first, default designator last.
pub fn fixture_id(home: &str, away: &str, date: &str, defaults: &Defaults) -> String {
    let letter = [home, away]
        .into_iter()
        .filter(|t| mentions_club(t, defaults))
        .find_map(|t| team_designator(t, defaults))
        .unwrap_or(defaults.designator)
        .to_ascii_lowercase();
    format!("{}-{}-{}", defaults.club_slug(), letter, date)
}

/// Club slug at home; away, the host team's name minus its designator.
pub fn venue_key(home: &str, venue: Venue, defaults: &Defaults) -> String {
    match venue {
        Venue::Home => defaults.club_slug(),
        Venue::Away => {
            let mut words: Vec<&str> = home.split_whitespace().collect();
            if words.len() > 1
                && words.last().is_some_and(|w| w.len() == 1 && w.bytes().all(|c| c.is_ascii_alphabetic()))
            {
                words.pop();
            }
            slugify(words)
        }
    }
}

pub fn fixture_notes(home: &str, away: &str, venue: Venue, defaults: &Defaults) -> String {
    let tail = match venue {
        Venue::Home => defaults.club.as_str(),
        Venue::Away => home.split_whitespace().next().unwrap_or(""),
    };
    format!("{home} vs {away} - {tail}")
}

/// Canonical fixture for a scraped row. `None` when the date is unreadable.
pub fn to_canonical(raw: &RawFixture, defaults: &Defaults) -> Option<CanonicalFixture> {
    let date = parse_date(&raw.date, defaults);
    if date.is_empty() {
        logw!("skipping fixture with unreadable date `{}`: {} v {}", raw.date, raw.home_team, raw.away_team);
        return None;
    }

    let home = normalize_ws(&raw.home_team);
    let away = normalize_ws(&raw.away_team);
    let venue = venue_for(&home, defaults);
    let played = has_result(&raw.result);
    let score = if played { normalize_score(&raw.result) } else { s!() };
    let outcome = if played { derive_outcome(&score, venue) } else { Outcome::Unknown };
    if played && outcome == Outcome::Unknown {
        logd!("score `{score}` for {home} v {away} has no numeric reading");
    }

    let event = normalize_ws(&raw.event);
    Some(CanonicalFixture {
        id: fixture_id(&home, &away, &date, defaults),
        season: season_for(&date),
        time: parse_time(&raw.time, defaults),
        venue,
        competition: if event.is_empty() { defaults.competition.clone() } else { event },
        is_tournament: false,
        status: if played { FixtureStatus::Completed } else { FixtureStatus::Scheduled },
        outcome,
        score,
        notes: fixture_notes(&home, &away, venue, defaults),
        venue_key: venue_key(&home, venue, defaults),
        home_team: home,
        away_team: away,
        date,
    })
}

/* ---------------- board results ---------------- */

/// Collapse whitespace and drop a trailing single-letter membership marker.
pub fn clean_player_name(raw: &str) -> String {
    let mut name = normalize_ws(raw);
    if let Some((head, last)) = name.rsplit_once(' ') {
        if last.len() == 1 && last.bytes().all(|c| c.is_ascii_uppercase()) {
            name = s!(head);
        }
    }
    let name = name.replace(" ,", ",");
    s!(name.trim().trim_matches(',').trim())
}

/// The away column carries the membership letter in front (`G Jones` → `Jones`).
/// Only the away side is formatted this way on the match page.
pub fn strip_away_membership_prefix(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_ascii_uppercase() && second.is_whitespace() => {
            s!(chars.as_str().trim_start())
        }
        _ => s!(name),
    }
}

/// Last 3–4 digit group in the cell.
pub fn parse_rating(raw: &str) -> Option<u32> {
    RATING_RE.find_iter(raw).last().and_then(|m| m.as_str().parse().ok())
}

pub fn parse_game_result(raw: &str) -> GameResult {
    if HOME_WIN_RE.is_match(raw) {
        GameResult::HomeWin
    } else if AWAY_WIN_RE.is_match(raw) {
        GameResult::AwayWin
    } else if raw.contains('½') || raw.contains("1/2") {
        GameResult::Drawn
    } else {
        GameResult::Pending
    }
}

pub fn to_board_result(row: &RawBoardRow) -> BoardResult {
    BoardResult {
        board: row.board,
        home_player: clean_player_name(&row.home_name),
        away_player: strip_away_membership_prefix(&clean_player_name(&row.away_name)),
        home_rating: parse_rating(&row.home_rating),
        away_rating: parse_rating(&row.away_rating),
        result: parse_game_result(&row.result),
        ..Default::default()
    }
}
