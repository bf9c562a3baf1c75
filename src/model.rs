// src/model.rs
//! Canonical records and the update payload.
//!
//! These live for a single run: built from the payload file or the scraper,
//! rendered into the host files by `patch::emit`, then dropped.

use std::collections::BTreeMap;

use serde::{ Deserialize, Serialize };

use crate::config::consts::DEFAULT_TIME;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    #[default]
    Home,
    Away,
}

impl Venue {
    pub fn as_str(&self) -> &'static str {
        match self { Venue::Home => "home", Venue::Away => "away" }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    #[default]
    #[serde(alias = "upcoming")]
    Scheduled,
    Completed,
}

impl FixtureStatus {
    /// Spelling used by the host file's `status` union.
    pub fn host_str(&self) -> &'static str {
        match self {
            FixtureStatus::Scheduled => "upcoming",
            FixtureStatus::Completed => "completed",
        }
    }
}

/// Match outcome from the tracked club's side. Empty when the score
/// could not be read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Draw => "Draw",
            Outcome::Unknown => "",
        }
    }
}

fn default_time() -> String {
    s!(DEFAULT_TIME)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalFixture {
    pub id: String,
    #[serde(default)]
    pub season: String,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default)]
    pub venue: Venue,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub is_tournament: bool,
    #[serde(default)]
    pub status: FixtureStatus,
    #[serde(default, rename = "result")]
    pub outcome: Outcome,
    #[serde(default)]
    pub score: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub venue_key: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    HomeWin,
    #[serde(rename = "0-1")]
    AwayWin,
    #[serde(rename = "½-½")]
    Drawn,
    #[default]
    #[serde(rename = "pending")]
    Pending,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::HomeWin => "1-0",
            GameResult::AwayWin => "0-1",
            GameResult::Drawn => "½-½",
            GameResult::Pending => "pending",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResult {
    pub board: u32,
    #[serde(default)]
    pub home_player: String,
    #[serde(default)]
    pub away_player: String,
    #[serde(default)]
    pub home_rating: Option<u32>,
    #[serde(default)]
    pub away_rating: Option<u32>,
    #[serde(default)]
    pub result: GameResult,
    #[serde(default)]
    pub game_length: String,
    #[serde(default)]
    pub opening: String,
    #[serde(default)]
    pub notes: String,
}

/// Board results for one fixture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureResults {
    #[serde(default)]
    pub board_results: Vec<BoardResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_notes: Option<String>,
}

/// Fixture id → its board results, ordered by id.
pub type FixtureResultSet = BTreeMap<String, FixtureResults>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_scraped: usize,
    #[serde(default)]
    pub new_results: usize,
    /// New fixtures that carry board results or match notes
    #[serde(default)]
    pub fixtures_with_details: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(default)]
    pub new_fixtures: Vec<CanonicalFixture>,
    #[serde(default)]
    pub new_board_results: FixtureResultSet,
}

impl UpdatePayload {
    pub fn is_empty(&self) -> bool {
        self.new_fixtures.is_empty() && self.new_board_results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_reads_camel_case_and_fills_defaults() {
        let json = r#"{
            "id": "andover-a-2025-09-23",
            "homeTeam": "Andover A",
            "awayTeam": "Fareham B",
            "date": "2025-09-23",
            "status": "upcoming",
            "result": ""
        }"#;
        let f: CanonicalFixture = serde_json::from_str(json).unwrap();
        assert_eq!(f.home_team, "Andover A");
        assert_eq!(f.time, "19:30");
        assert_eq!(f.status, FixtureStatus::Scheduled);
        assert_eq!(f.outcome, Outcome::Unknown);
        assert_eq!(f.venue, Venue::Home);
    }

    #[test]
    fn board_result_accepts_half_point_and_null_rating() {
        let json = r#"{ "board": 2, "homePlayer": "Smith, J", "awayPlayer": "Jones",
                        "homeRating": null, "awayRating": 1650, "result": "½-½" }"#;
        let b: BoardResult = serde_json::from_str(json).unwrap();
        assert_eq!(b.result, GameResult::Drawn);
        assert_eq!(b.home_rating, None);
        assert_eq!(b.away_rating, Some(1650));
        assert_eq!(b.opening, "");
    }

    #[test]
    fn outcome_serializes_unknown_as_empty() {
        assert_eq!(serde_json::to_string(&Outcome::Unknown).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&Outcome::Win).unwrap(), "\"Win\"");
    }
}
