// src/patch/emit.rs
// Renders canonical records as literal entries in the host files' layout.
// Field order is fixed. String values are written verbatim between double
// quotes; embedded quotes are not escaped.

use std::fmt::Write as _;

use crate::model::{ BoardResult, CanonicalFixture, FixtureResultSet, FixtureResults };

/// One entry of a fixture array, two-space indented.
pub fn render_fixture(f: &CanonicalFixture) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("  {\n");
    let _ = writeln!(out, "    id: \"{}\",", f.id);
    let _ = writeln!(out, "    season: \"{}\",", f.season);
    let _ = writeln!(out, "    homeTeam: \"{}\",", f.home_team);
    let _ = writeln!(out, "    awayTeam: \"{}\",", f.away_team);
    let _ = writeln!(out, "    date: \"{}\",", f.date);
    let _ = writeln!(out, "    time: \"{}\",", f.time);
    let _ = writeln!(out, "    venue: \"{}\",", f.venue.as_str());
    let _ = writeln!(out, "    competition: \"{}\",", f.competition);
    let _ = writeln!(out, "    isTournament: {},", f.is_tournament);
    let _ = writeln!(out, "    status: \"{}\",", f.status.host_str());
    let _ = writeln!(out, "    result: \"{}\",", f.outcome.as_str());
    let _ = writeln!(out, "    score: \"{}\",", f.score);
    let _ = writeln!(out, "    notes: \"{}\",", f.notes);
    let _ = writeln!(out, "    venueKey: \"{}\"", f.venue_key);
    out.push_str("  }");
    out
}

pub fn render_fixtures(fixtures: &[CanonicalFixture]) -> String {
    fixtures.iter().map(render_fixture).collect::<Vec<_>>().join(",\n")
}

/// One board object, six-space indented. Missing ratings render as
/// `default_rating`.
pub fn render_board(b: &BoardResult, default_rating: u32) -> String {
    let mut out = String::with_capacity(320);
    out.push_str("      {\n");
    let _ = writeln!(out, "        board: {},", b.board);
    let _ = writeln!(out, "        homePlayer: \"{}\",", b.home_player);
    let _ = writeln!(out, "        awayPlayer: \"{}\",", b.away_player);
    let _ = writeln!(out, "        homeRating: {},", b.home_rating.unwrap_or(default_rating));
    let _ = writeln!(out, "        awayRating: {},", b.away_rating.unwrap_or(default_rating));
    let _ = writeln!(out, "        result: \"{}\",", b.result.as_str());
    let _ = writeln!(out, "        gameLength: \"{}\",", b.game_length);
    let _ = writeln!(out, "        opening: \"{}\",", b.opening);
    let _ = writeln!(out, "        notes: \"{}\"", b.notes);
    out.push_str("      }");
    out
}

/// `"<id>": { "boardResults": [ … ] }` mapping entry.
pub fn render_results_entry(id: &str, results: &FixtureResults, default_rating: u32) -> String {
    let boards = results
        .board_results
        .iter()
        .map(|b| render_board(b, default_rating))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut out = String::with_capacity(boards.len() + 96);
    let _ = writeln!(out, "  \"{id}\": {{");
    if boards.is_empty() {
        out.push_str("    \"boardResults\": []");
    } else {
        let _ = write!(out, "    \"boardResults\": [\n{boards}\n    ]");
    }
    match results.match_notes.as_deref().filter(|n| !n.is_empty()) {
        Some(notes) => {
            let _ = write!(out, ",\n    \"matchNotes\": \"{notes}\"\n");
        }
        None => out.push('\n'),
    }
    out.push_str("  }");
    out
}

pub fn render_result_set(set: &FixtureResultSet, default_rating: u32) -> String {
    set.iter()
        .map(|(id, r)| render_results_entry(id, r, default_rating))
        .collect::<Vec<_>>()
        .join(",\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::patch::fields::extract_field;

    fn fixture() -> CanonicalFixture {
        CanonicalFixture {
            id: s!("andover-a-2025-09-23"),
            season: s!("2025-2026"),
            home_team: s!("Andover A"),
            away_team: s!("Fareham B"),
            date: s!("2025-09-23"),
            time: s!("19:30"),
            venue: Venue::Home,
            competition: s!("Southampton Chess League"),
            is_tournament: false,
            status: FixtureStatus::Completed,
            outcome: Outcome::Win,
            score: s!("2½-1½"),
            notes: s!("Andover A vs Fareham B - Andover"),
            venue_key: s!("andover"),
        }
    }

    #[test]
    fn fixture_fields_survive_extraction() {
        let f = fixture();
        let text = render_fixture(&f);
        assert_eq!(extract_field(&text, "id"), Some(f.id.as_str()));
        assert_eq!(extract_field(&text, "homeTeam"), Some(f.home_team.as_str()));
        assert_eq!(extract_field(&text, "awayTeam"), Some(f.away_team.as_str()));
        assert_eq!(extract_field(&text, "date"), Some(f.date.as_str()));
        assert_eq!(extract_field(&text, "result"), Some("Win"));
        assert_eq!(extract_field(&text, "isTournament"), Some("false"));
    }

    #[test]
    fn fixture_layout_is_fixed() {
        let text = render_fixture(&fixture());
        assert!(text.starts_with("  {\n    id: \"andover-a-2025-09-23\",\n    season:"));
        assert!(text.ends_with("    venueKey: \"andover\"\n  }"));
        assert!(text.contains("    status: \"completed\",\n"));
    }

    #[test]
    fn fixtures_are_comma_joined() {
        let mut second = fixture();
        second.id = s!("andover-b-2025-09-24");
        let text = render_fixtures(&[fixture(), second]);
        assert!(text.contains("  },\n  {\n    id: \"andover-b-2025-09-24\""));
    }

    #[test]
    fn missing_rating_renders_default() {
        let b = BoardResult {
            board: 1,
            home_player: s!("Smith, J"),
            away_player: s!("Jones, K"),
            home_rating: Some(1820),
            away_rating: None,
            result: GameResult::Drawn,
            ..Default::default()
        };
        let text = render_board(&b, 0);
        assert!(text.contains("homeRating: 1820,"));
        assert!(text.contains("awayRating: 0,"));
        assert!(text.contains("result: \"½-½\","));
    }

    #[test]
    fn result_set_groups_by_id_with_separators() {
        let mut set = FixtureResultSet::new();
        let board = BoardResult { board: 1, ..Default::default() };
        set.insert(s!("a-1"), FixtureResults { board_results: vec![board.clone()], match_notes: None });
        set.insert(
            s!("a-2"),
            FixtureResults { board_results: vec![board], match_notes: Some(s!("Close match")) },
        );
        let text = render_result_set(&set, 0);
        assert!(text.starts_with("  \"a-1\": {\n    \"boardResults\": [\n      {"));
        assert!(text.contains("    ]\n  },\n  \"a-2\": {"));
        assert!(text.ends_with("    ],\n    \"matchNotes\": \"Close match\"\n  }"));
    }
}
