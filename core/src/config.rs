//! Runtime configuration: command-line flags and environment.
//!
//! There is no config file. Flags select which steps run; the environment
//! says where the database lives and which programs migrate and seed it.

use crate::{
    console::OutputEncoding,
    error::{AlexError, AlexResult},
    process::ExternalCommand,
};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATABASE_PATH: &str = "alex.db";
pub const DATABASE_PATH_VAR: &str = "DATABASE_PATH";
pub const MIGRATE_COMMAND_VAR: &str = "ALEX_MIGRATE_COMMAND";
pub const SEED_COMMAND_VAR: &str = "ALEX_SEED_COMMAND";
pub const ASCII_OUTPUT_VAR: &str = "ALEX_ASCII_OUTPUT";

pub const MIGRATE_BIN: &str = "run-migrations";
pub const SEED_BIN: &str = "seed-data";

/// Locale handed to child processes so their text output is UTF-8.
pub const CHILD_LOCALE: (&str, &str) = ("LC_ALL", "C.UTF-8");

pub const USAGE: &str = "\
Reset the Alex database: drop tables, run migrations, load seed data.

Usage: reset-db [--with-test-data] [--skip-drop]

Options:
  --with-test-data  Create test user with sample portfolio
  --skip-drop       Skip dropping tables (just reload data)
  -h, --help        Print this help";

// ── Flags ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOptions {
    pub with_test_data: bool,
    pub skip_drop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Run(ResetOptions),
    Help,
}

impl ResetOptions {
    /// Parse flags, excluding the program name.
    pub fn parse<I, S>(args: I) -> AlexResult<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = ResetOptions::default();
        for arg in args {
            match arg.as_ref() {
                "--with-test-data" => opts.with_test_data = true,
                "--skip-drop" => opts.skip_drop = true,
                "-h" | "--help" => return Ok(Invocation::Help),
                other => {
                    return Err(AlexError::Usage(format!("unrecognized argument: {other}")))
                }
            }
        }
        Ok(Invocation::Run(opts))
    }
}

// ── Environment ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetConfig {
    pub database_path: String,
    pub migrate_command: ExternalCommand,
    pub seed_command: ExternalCommand,
    pub encoding: OutputEncoding,
}

impl ResetConfig {
    /// Defaults for `database_path`: companion binaries looked up on PATH,
    /// UTF-8 output.
    pub fn new(database_path: impl Into<String>) -> Self {
        let database_path = database_path.into();
        Self {
            migrate_command: child_command(ExternalCommand::new(MIGRATE_BIN), &database_path),
            seed_command: child_command(ExternalCommand::new(SEED_BIN), &database_path),
            database_path,
            encoding: OutputEncoding::Utf8,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// Companion binaries default to the siblings of the running
    /// executable, falling back to a PATH lookup.
    pub fn from_env() -> Self {
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        Self::from_lookup(|key| env::var(key).ok(), exe_dir.as_deref())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F, exe_dir: Option<&Path>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = database_path_from(&lookup);

        let command_for = |var: &str, bin: &str| {
            let base = lookup(var)
                .and_then(|line| ExternalCommand::parse(&line))
                .unwrap_or_else(|| ExternalCommand::new(sibling_program(exe_dir, bin)));
            child_command(base, &database_path)
        };
        let migrate_command = command_for(MIGRATE_COMMAND_VAR, MIGRATE_BIN);
        let seed_command = command_for(SEED_COMMAND_VAR, SEED_BIN);

        let encoding = match lookup(ASCII_OUTPUT_VAR).as_deref().map(str::trim) {
            Some("1") | Some("true") | Some("yes") => OutputEncoding::Ascii,
            _ => OutputEncoding::Utf8,
        };

        Self {
            database_path,
            migrate_command,
            seed_command,
            encoding,
        }
    }
}

/// `DATABASE_PATH`, or the default. Shared by every binary.
pub fn database_path() -> String {
    database_path_from(&|key: &str| env::var(key).ok())
}

fn database_path_from<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(DATABASE_PATH_VAR)
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
}

fn sibling_program(exe_dir: Option<&Path>, bin: &str) -> String {
    let file_name = format!("{bin}{}", env::consts::EXE_SUFFIX);
    exe_dir
        .map(|dir| dir.join(&file_name))
        .filter(|candidate: &PathBuf| candidate.is_file())
        .map(|candidate| candidate.to_string_lossy().into_owned())
        .unwrap_or(file_name)
}

fn child_command(cmd: ExternalCommand, database_path: &str) -> ExternalCommand {
    cmd.env(DATABASE_PATH_VAR, database_path)
        .env(CHILD_LOCALE.0, CHILD_LOCALE.1)
}
