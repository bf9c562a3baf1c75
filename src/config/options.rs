// src/config/options.rs
use std::path::{ Path, PathBuf };
use super::consts::*;

/// Named defaults the normalizer falls back on.
/// Passed in explicitly so tests (and other clubs) can override them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Defaults {
    /// Tracked club, matched case-insensitively inside team names
    pub club: String,
    pub time: String,
    /// Two-digit year assumed when the date has no year token
    pub year_suffix: String,
    pub designator: char,
    pub competition: String,
    /// Rendered for a missing board rating
    pub rating: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            club: s!(CLUB_NAME),
            time: s!(DEFAULT_TIME),
            year_suffix: s!(DEFAULT_YEAR_SUFFIX),
            designator: DEFAULT_DESIGNATOR,
            competition: s!(DEFAULT_COMPETITION),
            rating: DEFAULT_RATING,
        }
    }
}

impl Defaults {
    /// Lowercase, hyphen-joined club name used as the id prefix.
    pub fn club_slug(&self) -> String {
        self.club
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// How the top-level entries of a purge region are laid out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryShape {
    /// `[ { key_field: "…", … }, … ]`
    Sequence { key_field: String },
    /// `{ "key": { … }, … }`
    Mapping,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurgeSpec {
    /// Declaration text; the region opens at the first delimiter after it
    pub marker: String,
    pub shape: EntryShape,
}

/// One hand-maintained target file and the anchors we rely on inside it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostFileSpec {
    pub rel_path: PathBuf,
    pub purge: Option<PurgeSpec>,
    /// Regex; the match start is the insertion point
    pub anchor: String,
    pub anchor_fallback: String,
    /// Comment line written above each inserted block
    pub header: String,
}

impl HostFileSpec {
    pub fn fixtures_data() -> Self {
        Self {
            rel_path: PathBuf::from(FIXTURES_DATA_FILE),
            purge: Some(PurgeSpec {
                marker: s!(FIXTURE_ARRAY_MARKER),
                shape: EntryShape::Sequence { key_field: s!("id") },
            }),
            anchor: s!(FIXTURES_ANCHOR),
            anchor_fallback: s!(FIXTURES_ANCHOR_FALLBACK),
            header: s!(FIXTURES_HEADER),
        }
    }

    pub fn results() -> Self {
        Self {
            rel_path: PathBuf::from(RESULTS_FILE),
            purge: Some(PurgeSpec {
                marker: s!(RESULTS_MAP_MARKER),
                shape: EntryShape::Mapping,
            }),
            anchor: s!(RESULTS_ANCHOR),
            anchor_fallback: s!(RESULTS_ANCHOR_FALLBACK),
            header: s!(RESULTS_HEADER),
        }
    }

    pub fn path(&self, root: &Path) -> PathBuf {
        root.join(&self.rel_path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchOptions {
    pub root: PathBuf,
    pub fixtures: HostFileSpec,
    pub results: HostFileSpec,
    /// Hold an advisory lock on each target during read-modify-write
    pub lock: bool,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            fixtures: HostFileSpec::fixtures_data(),
            results: HostFileSpec::results(),
            lock: true,
        }
    }
}

impl PatchOptions {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), ..Self::default() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Pre-built payload on disk
    Json(PathBuf),
    /// Scrape the results site
    Live,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub input: InputMode,
    pub patch: PatchOptions,
    pub defaults: Defaults,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            input: InputMode::Live,
            patch: PatchOptions::default(),
            defaults: Defaults::default(),
        }
    }
}
