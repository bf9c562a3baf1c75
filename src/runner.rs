// src/runner.rs
//! File patch orchestrator.
//!
//! Per target file: purge entries about to be re-added, render the new
//! block, splice it in at the anchor, then back up and write. The fixtures
//! file goes first, then the results file; a failure on one is recorded and
//! does not stop the other.

use std::collections::HashSet;
use std::path::{ Path, PathBuf };

use crate::{
    config::options::{ HostFileSpec, InputMode, PatchOptions, RunOptions },
    error::{ Result, SyncError },
    file,
    model::{ CanonicalFixture, FixtureResultSet, Summary, UpdatePayload },
    patch::{ dedupe, emit, insert },
    progress::Progress,
    scrape,
};

/// What happened to one host file.
#[derive(Debug)]
pub enum FileOutcome {
    /// Nothing to write for this file
    Skipped,
    Patched {
        path: PathBuf,
        backup: PathBuf,
        added: usize,
        purged: usize,
    },
    Failed {
        path: PathBuf,
        error: SyncError,
    },
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }
}

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub payload: Option<Summary>,
    pub new_fixtures: usize,
    pub fixtures_file: FileOutcome,
    pub results_file: FileOutcome,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.fixtures_file.is_failed() || self.results_file.is_failed()
    }

    pub fn files_written(&self) -> Vec<&Path> {
        [&self.fixtures_file, &self.results_file]
            .into_iter()
            .filter_map(|o| match o {
                FileOutcome::Patched { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Top-level runner: obtain the payload, then patch both host files.
/// `progress` can be None (no console updates) or Some(&mut impl Progress).
pub fn run(opts: &RunOptions, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let payload = match &opts.input {
        InputMode::Json(path) => {
            logf!("loading payload from {}", path.display());
            file::load_payload(path)?
        }
        InputMode::Live => {
            let source = scrape::live_source(&opts.defaults)?;
            let fixtures_path = opts.patch.fixtures.path(&opts.patch.root);
            file::ensure_target(&fixtures_path)?;
            let existing = std::fs::read_to_string(&fixtures_path)
                .map_err(|e| SyncError::io(&fixtures_path, e))?;
            scrape::build_payload(source.as_ref(), &existing, &opts.defaults, reborrow(&mut progress))?
        }
    };

    let summary = apply_payload(&opts.patch, &payload, opts.defaults.rating, reborrow(&mut progress));
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

/// Shorter-lived handle on an optional sink, so it can be passed on more than once.
fn reborrow<'a>(progress: &'a mut Option<&mut dyn Progress>) -> Option<&'a mut dyn Progress> {
    match progress {
        Some(p) => Some(&mut **p),
        None => None,
    }
}

/// Patch both host files from an already-built payload.
pub fn apply_payload(
    opts: &PatchOptions,
    payload: &UpdatePayload,
    default_rating: u32,
    mut progress: Option<&mut dyn Progress>,
) -> RunSummary {
    let mut summary = RunSummary {
        payload: payload.summary.clone(),
        new_fixtures: payload.new_fixtures.len(),
        fixtures_file: FileOutcome::Skipped,
        results_file: FileOutcome::Skipped,
    };

    if payload.is_empty() {
        logf!("no new results; nothing to update");
        if let Some(p) = progress.as_deref_mut() {
            p.log("No new results found.");
        }
        return summary;
    }

    summary.fixtures_file = settle(
        opts.fixtures.path(&opts.root),
        patch_fixtures_file(opts, &payload.new_fixtures),
    );
    summary.results_file = settle(
        opts.results.path(&opts.root),
        patch_results_file(opts, &payload.new_board_results, default_rating),
    );

    if let Some(p) = progress.as_deref_mut() {
        for outcome in [&summary.fixtures_file, &summary.results_file] {
            if let FileOutcome::Patched { path, backup, .. } = outcome {
                p.file_done(path, Some(backup));
            }
        }
    }
    summary
}

fn settle(path: PathBuf, res: Result<FileOutcome>) -> FileOutcome {
    res.unwrap_or_else(|error| {
        loge!("{}: {error}", path.display());
        FileOutcome::Failed { path, error }
    })
}

pub fn patch_fixtures_file(opts: &PatchOptions, fixtures: &[CanonicalFixture]) -> Result<FileOutcome> {
    if fixtures.is_empty() {
        return Ok(FileOutcome::Skipped);
    }
    let ids: HashSet<String> = fixtures.iter().map(|f| f.id.clone()).collect();
    patch_host_file(opts, &opts.fixtures, &ids, fixtures.len(), &emit::render_fixtures(fixtures))
}

pub fn patch_results_file(opts: &PatchOptions, results: &FixtureResultSet, default_rating: u32) -> Result<FileOutcome> {
    if results.is_empty() {
        return Ok(FileOutcome::Skipped);
    }
    let ids: HashSet<String> = results.keys().cloned().collect();
    patch_host_file(opts, &opts.results, &ids, results.len(), &emit::render_result_set(results, default_rating))
}

/* ---------------- one file ---------------- */

fn patch_host_file(
    opts: &PatchOptions,
    spec: &HostFileSpec,
    ids: &HashSet<String>,
    added: usize,
    block: &str,
) -> Result<FileOutcome> {
    let path = spec.path(&opts.root);
    let mut purged = 0usize;

    let written = file::rewrite_locked(&path, opts.lock, |buf| {
        let mut text = s!(buf);
        if let Some(purge) = &spec.purge {
            match dedupe::apply_purge(&text, purge, ids) {
                Ok((t, n)) => {
                    text = t;
                    purged = n;
                }
                Err(e) if !e.is_fatal() => logw!("{}: purge skipped: {e}", path.display()),
                Err(e) => return Err(e),
            }
        }
        let out = insert::insert_at_anchor(&text, &path, &spec.anchor, &spec.anchor_fallback, &spec.header, block)?;
        Ok(Some(out))
    })?;

    Ok(match written {
        Some(w) => {
            logf!("{}: {added} added, {purged} replaced (backup {})", path.display(), w.backup.display());
            FileOutcome::Patched { path, backup: w.backup, added, purged }
        }
        None => FileOutcome::Skipped,
    })
}
