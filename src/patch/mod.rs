// src/patch/mod.rs
//! Structural text patching of the hand-maintained data files.
//!
//! ```text
//! scanner  → locate a literal, split it into entries
//! fields   → read `key: "value"` inside one entry
//! dedupe   → drop entries by key, rebuild the body
//! emit     → canonical records → literal entry text
//! insert   → splice text in at a regex anchor
//! ```
//!
//! Nothing here touches the filesystem; `runner` sequences these steps
//! around `file`.

pub mod dedupe;
pub mod emit;
pub mod fields;
pub mod insert;
pub mod scanner;

pub use scanner::{ Delim, TextRegion };
