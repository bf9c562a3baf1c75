// src/config/consts.rs

// Net config
pub const LMS_BASE_URL: &str = "https://lms.englishchess.org.uk";
pub const CLUB_PAGE_PATH: &str = "/lms/organisation/416";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Tracked club
pub const CLUB_NAME: &str = "Andover";

// Normalizer defaults
pub const DEFAULT_TIME: &str = "19:30";
pub const DEFAULT_YEAR_SUFFIX: &str = "25";
pub const DEFAULT_DESIGNATOR: char = 'a';
pub const DEFAULT_COMPETITION: &str = "Southampton Chess League";
pub const DEFAULT_RATING: u32 = 0;

// Host files (relative to --root)
pub const FIXTURES_DATA_FILE: &str = "src/data/fixturesData.ts";
pub const RESULTS_FILE: &str = "src/data/fixtures.ts";

// Every fixture array in the fixtures file is declared with this; all of
// them are purged by id before completed entries are appended
pub const FIXTURE_ARRAY_MARKER: &str = ": SimpleFixture[] =";

pub const RESULTS_MAP_MARKER: &str =
    "const boardResultsData: Record<string, { boardResults: BoardResult[]; matchNotes?: string }> =";

// Insertion anchors. Leading \s* makes the match start at the whitespace run
// that precedes the closing delimiter.
pub const FIXTURES_ANCHOR: &str = r"\s*\]\s*;\s*\n\s*\n\s*// 2025-2026 Season Upcoming Tournaments";
pub const FIXTURES_ANCHOR_FALLBACK: &str = r"\s*\]\s*;\s*\n\s*// 2025-2026 Season Upcoming Tournaments";
pub const RESULTS_ANCHOR: &str = r"\s*\};\s*// Function to determine fixture status";
pub const RESULTS_ANCHOR_FALLBACK: &str = r"\s*\};\s*const getFixtureStatus";

pub const FIXTURES_HEADER: &str = "  // New fixtures from LMS update";
pub const RESULTS_HEADER: &str = "  // New board results from LMS update";

// Backups
pub const BACKUP_INFIX: &str = ".backup.";
