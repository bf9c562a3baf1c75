// src/specs/mod.rs
//! # Page specs
//!
//! One module per results-site page. Each knows where the data lives in that
//! page's HTML and lifts it into raw, untrimmed-of-meaning records; the
//! normalizer decides what the text means.
//!
//! ## Conventions
//! - Case-insensitive tag detection through `core::html`; no full-document regexes.
//! - Rows that do not have the expected cell count are skipped, not errors.
//! - `parse_doc` is pure and takes the page text, so it is testable offline.
//!   `fetch` (feature `live`) only adds the HTTP call.
//!
//! ```text
//! scrape::LmsSource → specs::club_fixtures::fetch   → Vec<RawFixture>
//!                   → specs::match_details::fetch   → RawMatchDetails
//! ```
pub mod club_fixtures;
pub mod match_details;
