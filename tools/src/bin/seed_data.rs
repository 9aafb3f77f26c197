//! seed-data: load the reference instrument catalog into DATABASE_PATH.
//!
//! Exits non-zero if any instrument is rejected, so `reset-db` treats a
//! partial catalog as a failed seed.

use alex_core::{
    config,
    console::{Console, OutputEncoding, Status},
    seed::{self, SeedOutcome},
    store::AlexStore,
};
use anyhow::{Context, Result};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    env_logger::init();

    let path = config::database_path();
    let store = AlexStore::open(&path).with_context(|| format!("opening {path}"))?;
    let summary = seed::load_instruments(&store).context("loading instruments")?;

    let mut console = Console::stdout(OutputEncoding::Utf8);
    for outcome in &summary.outcomes {
        match outcome {
            SeedOutcome::Loaded { symbol, name } => {
                console.detail(Status::Ok, &format!("{symbol}: {name}"))?
            }
            SeedOutcome::Rejected { symbol, reason } => {
                console.detail(Status::Fail, &format!("{symbol}: {reason}"))?
            }
        }
    }
    console.status(Status::Ok, &summary.progress_line())?;

    if summary.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{} instrument(s) rejected",
            summary.total - summary.loaded()
        );
        Ok(ExitCode::FAILURE)
    }
}
