//! Shared helpers for reset tests.
#![allow(dead_code)]

use alex_core::{
    config::{ResetConfig, MIGRATE_BIN, SEED_BIN},
    console::{Console, OutputEncoding},
    process::{CommandOutput, CommandRunner, ExternalCommand},
    seed,
    store::AlexStore,
};
use std::io;

/// A SQLite URI naming an in-memory database that every connection in this
/// process opened with the same name shares.
pub fn shared_memory_uri(name: &str) -> String {
    format!("file:{name}?mode=memory&cache=shared")
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Stands in for the migration and seed programs. Instead of spawning a
/// process it opens its own connection to the shared database and does the
/// work in-process, recording every invocation.
pub struct FakeRunner {
    pub uri: String,
    pub migrate_exit: i32,
    pub seed_exit: i32,
    /// Replaces the seed loader's real stdout when set.
    pub seed_stdout: Option<String>,
    pub calls: Vec<String>,
}

impl FakeRunner {
    pub fn new(uri: &str) -> Self {
        Self {
            uri: uri.to_string(),
            migrate_exit: 0,
            seed_exit: 0,
            seed_stdout: None,
            calls: Vec::new(),
        }
    }

    fn failed(code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

fn io_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e.to_string())
}

impl CommandRunner for FakeRunner {
    fn run(&mut self, command: &ExternalCommand) -> io::Result<CommandOutput> {
        self.calls.push(command.program.clone());

        if command.program == MIGRATE_BIN {
            if self.migrate_exit != 0 {
                return Ok(Self::failed(self.migrate_exit, "migration exploded"));
            }
            let store = AlexStore::open(&self.uri).map_err(io_error)?;
            store.migrate().map_err(io_error)?;
            return Ok(CommandOutput {
                code: Some(0),
                stdout: "Migrations completed\n".into(),
                stderr: String::new(),
            });
        }

        if command.program == SEED_BIN {
            if self.seed_exit != 0 {
                return Ok(Self::failed(self.seed_exit, "seed exploded"));
            }
            let store = AlexStore::open(&self.uri).map_err(io_error)?;
            let summary = seed::load_instruments(&store).map_err(io_error)?;
            let stdout = self
                .seed_stdout
                .clone()
                .unwrap_or_else(|| format!("{}\n", summary.progress_line()));
            return Ok(CommandOutput {
                code: Some(0),
                stdout,
                stderr: String::new(),
            });
        }

        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("unexpected program {}", command.program),
        ))
    }
}

/// A reset harness over a fresh shared in-memory database.
pub struct Harness {
    pub store: AlexStore,
    pub config: ResetConfig,
    pub uri: String,
}

impl Harness {
    pub fn new(name: &str) -> Self {
        init_logging();
        let uri = shared_memory_uri(name);
        let store = AlexStore::open(&uri).expect("open shared store");
        let config = ResetConfig::new(uri.clone());
        Self { store, config, uri }
    }

    pub fn console() -> Console<Vec<u8>> {
        Console::new(Vec::new(), OutputEncoding::Utf8)
    }
}
