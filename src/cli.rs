// src/cli.rs
use std::path::{ Path, PathBuf };

use clap::Parser;
use color_eyre::eyre::{ eyre, WrapErr };

use crate::config::options::{ InputMode, PatchOptions, RunOptions };
use crate::model::CanonicalFixture;
use crate::progress::Progress;
use crate::runner::{ self, FileOutcome, RunSummary };

/// Update the club site's fixtures and board results from the league system.
#[derive(Parser, Debug, Clone)]
#[command(name = "lms_sync", version, about)]
pub struct Args {
    /// JSON payload produced by an earlier scrape
    #[arg(short = 'i', long = "input", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Repository root holding src/data
    #[arg(short = 'r', long = "root", value_name = "PATH", default_value = ".")]
    pub root: PathBuf,

    /// Scrape the league site directly (wins over --input)
    #[arg(long)]
    pub live: bool,

    /// Debug-level diagnostics on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Args {
    pub fn run_options(&self) -> RunOptions {
        let input = match (&self.input, self.live) {
            (Some(path), false) => InputMode::Json(path.clone()),
            (Some(_), true) => {
                logw!("both --input and --live given; using live mode");
                InputMode::Live
            }
            (None, _) => InputMode::Live,
        };
        RunOptions {
            input,
            patch: PatchOptions::with_root(&self.root),
            ..RunOptions::default()
        }
    }
}

/// Prints run progress to stdout.
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        if total > 0 {
            println!("Found {total} new result(s)");
        }
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn fixture(&mut self, f: &CanonicalFixture) {
        println!("  {} {} vs {}: {} ({})", f.date, f.home_team, f.away_team, f.score, f.outcome.as_str());
    }

    fn file_done(&mut self, path: &Path, backup: Option<&Path>) {
        match backup {
            Some(b) => println!("Updated {} (backup: {})", path.display(), b.display()),
            None => println!("Updated {}", path.display()),
        }
    }
}

pub fn run() -> color_eyre::Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose);

    let opts = args.run_options();
    let mut progress = ConsoleProgress;
    let summary = runner::run(&opts, Some(&mut progress)).wrap_err("update aborted")?;

    if let Some(s) = &summary.payload {
        println!(
            "Scraped {} fixture(s): {} new result(s), {} with board details",
            s.total_scraped, s.new_results, s.fixtures_with_details
        );
    }

    let mut failed = 0usize;
    for outcome in [&summary.fixtures_file, &summary.results_file] {
        match outcome {
            FileOutcome::Patched { path, added, purged, .. } => {
                println!("  {}: {added} added, {purged} replaced", path.display());
            }
            FileOutcome::Failed { path, error } => {
                eprintln!("  {}: FAILED: {error}", path.display());
                failed += 1;
            }
            FileOutcome::Skipped => {}
        }
    }

    if failed > 0 {
        return Err(eyre!("{failed} host file(s) could not be updated"));
    }
    if let Some(line) = files_updated_line(&summary) {
        println!("{line}");
    }
    Ok(())
}

/// Closing line, printed whenever either host file was written.
fn files_updated_line(summary: &RunSummary) -> Option<String> {
    let written = summary.files_written();
    (!written.is_empty()).then(|| format!("Files updated: {}", written.len()))
}
