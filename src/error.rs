// src/error.rs
//! Crate error type.
//!
//! Fatal conditions end the run (or, for a host file, that file's patch).
//! Region lookups during the purge step are the only non-fatal variants:
//! the runner logs them and carries on with the insertion.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("target file not found: {}", .0.display())]
    MissingTarget(PathBuf),

    #[error("input JSON not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("input JSON file is empty: {}", .0.display())]
    EmptyInput(PathBuf),

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no insertion point in {}: tried `{primary}` and `{fallback}`", path.display())]
    AnchorNotFound {
        path: PathBuf,
        primary: String,
        fallback: String,
    },

    #[error("invalid anchor pattern `{pattern}`: {source}")]
    BadAnchor {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("live scraping is not available in this build (enable the `live` feature)")]
    LiveUnavailable,

    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("region marker `{anchor}` not found")]
    RegionNotFound { anchor: String },

    #[error("region after `{anchor}` is never closed")]
    UnbalancedRegion { anchor: String },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io { path: path.into(), source }
    }

    /// Region lookups only skip the purge step; everything else aborts.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            SyncError::RegionNotFound { .. } | SyncError::UnbalancedRegion { .. }
        )
    }
}
