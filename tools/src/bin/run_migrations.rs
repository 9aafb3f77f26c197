//! run-migrations: apply the embedded schema to DATABASE_PATH.

use alex_core::{
    config,
    console::{Console, OutputEncoding, Status},
    store::AlexStore,
};
use anyhow::{Context, Result};

fn main() -> Result<()> {
    env_logger::init();

    let path = config::database_path();
    let store = AlexStore::open(&path).with_context(|| format!("opening {path}"))?;
    let applied = store.migrate().context("applying migrations")?;

    let mut console = Console::stdout(OutputEncoding::Utf8);
    console.status(Status::Ok, &format!("Applied {applied} migration file(s) to {path}"))?;
    console.status(Status::Ok, "Migrations completed")?;
    Ok(())
}
