// src/specs/match_details.rs
// Match page: board-by-board table plus an optional notes paragraph.
// Cells: board | home rating | home player | result | away player | away rating

use crate::core::html::{ table_rows, tag_spans, text_of, to_lower };

const MIN_CELLS: usize = 4;
const MIN_NOTES_LEN: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBoardRow {
    pub board: u32,
    pub home_rating: String,
    pub home_name: String,
    pub result: String,
    pub away_name: String,
    pub away_rating: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMatchDetails {
    pub boards: Vec<RawBoardRow>,
    pub notes: Option<String>,
}

pub fn parse_doc(doc: &str) -> RawMatchDetails {
    let mut boards = Vec::new();
    for cells in table_rows(doc) {
        if cells.len() < MIN_CELLS {
            continue;
        }
        let text: Vec<String> = cells.iter().map(|c| text_of(c)).collect();
        let Some(board) = board_number(&text[0]) else { continue };
        let cell = |i: usize| text.get(i).cloned().unwrap_or_default();
        boards.push(RawBoardRow {
            board,
            home_rating: cell(1),
            home_name: cell(2),
            result: cell(3),
            away_name: cell(4),
            away_rating: cell(5),
        });
    }

    RawMatchDetails { boards, notes: find_notes(doc) }
}

/// First digit run of the board cell (`"1 of 6"` is board 1); rows without
/// any are headers or totals.
fn board_number(cell: &str) -> Option<u32> {
    let run = &cell[cell.find(|c: char| c.is_ascii_digit())?..];
    let len = run.find(|c: char| !c.is_ascii_digit()).unwrap_or(run.len());
    run[..len].parse().ok()
}

/// First paragraph/div (document order) long enough to be prose about the match.
fn find_notes(doc: &str) -> Option<String> {
    let mut spans = tag_spans(doc, "p");
    spans.extend(tag_spans(doc, "div"));
    spans.sort_unstable();
    spans.into_iter().map(|(b, e)| text_of(&doc[b..e])).find(|t| {
        let lc = to_lower(t);
        t.chars().count() > MIN_NOTES_LEN && (lc.contains("match") || lc.contains("game"))
    })
}

#[cfg(feature = "live")]
pub fn fetch(agent: &ureq::Agent, url: &str) -> crate::error::Result<RawMatchDetails> {
    let doc = crate::core::net::http_get(agent, url)?;
    Ok(parse_doc(&doc))
}
