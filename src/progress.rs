// src/progress.rs
use std::path::Path;

use crate::model::CanonicalFixture;

/// Console-facing progress for a sync run.
/// Library code reports here instead of printing; the CLI implements it.
pub trait Progress {
    /// Called before match pages are fetched, with how many will be.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One new result was found and normalised.
    fn fixture(&mut self, _fixture: &CanonicalFixture) {}

    /// A host file was written (with its backup, if any).
    fn file_done(&mut self, _path: &Path, _backup: Option<&Path>) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
