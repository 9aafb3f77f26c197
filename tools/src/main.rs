//! reset-db: drop, migrate and reseed the Alex database.
//!
//! Usage:
//!   reset-db
//!   reset-db --with-test-data
//!   reset-db --skip-drop --with-test-data
//!
//! Environment: DATABASE_PATH, ALEX_MIGRATE_COMMAND, ALEX_SEED_COMMAND,
//! ALEX_ASCII_OUTPUT, RUST_LOG.

use alex_core::{
    config::{Invocation, ResetConfig, ResetOptions, USAGE},
    console::Console,
    error::AlexError,
    process::SystemRunner,
    reset::Resetter,
    store::AlexStore,
};
use anyhow::Result;
use std::env;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    env_logger::init();

    let opts = match ResetOptions::parse(env::args().skip(1)) {
        Ok(Invocation::Run(opts)) => opts,
        Ok(Invocation::Help) => {
            println!("{USAGE}");
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return Ok(ExitCode::from(2));
        }
    };

    let config = ResetConfig::from_env();
    log::info!(
        "resetting {} (migrate: `{}`, seed: `{}`)",
        config.database_path,
        config.migrate_command.display(),
        config.seed_command.display()
    );

    let store = AlexStore::open(&config.database_path)?;
    let console = Console::stdout(config.encoding);
    let mut resetter = Resetter::new(&store, &config, SystemRunner, console);

    match resetter.run(opts) {
        Ok(report) => {
            log::debug!("reset finished: {:?}", report.counts);
            Ok(ExitCode::SUCCESS)
        }
        // Already reported on the console together with the child's stderr.
        Err(AlexError::StepFailed { .. }) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e.into()),
    }
}
