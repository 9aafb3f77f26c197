//! Runs the real binaries against a throwaway database file.

use std::path::Path;
use std::process::{Command, Output};

const RESET_DB: &str = env!("CARGO_BIN_EXE_reset-db");
const RUN_MIGRATIONS: &str = env!("CARGO_BIN_EXE_run-migrations");
const SEED_DATA: &str = env!("CARGO_BIN_EXE_seed-data");

fn reset_db(db: &Path, args: &[&str]) -> Output {
    Command::new(RESET_DB)
        .args(args)
        .env("DATABASE_PATH", db)
        .env("ALEX_MIGRATE_COMMAND", RUN_MIGRATIONS)
        .env("ALEX_SEED_COMMAND", SEED_DATA)
        .env_remove("ALEX_ASCII_OUTPUT")
        .output()
        .expect("spawn reset-db")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn no_flags_on_empty_database_exits_zero_with_counts() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("alex.db");

    let out = reset_db(&db, &[]);
    let text = stdout(&out);

    assert_eq!(out.status.code(), Some(0), "stdout:\n{text}\nstderr:\n{}",
        String::from_utf8_lossy(&out.stderr));
    assert!(text.contains("Dropped positions"));
    assert!(text.contains("Migrations completed"));
    assert!(text.contains("Loaded 22 instruments"));
    assert!(text.contains("• users: 0 records"));
    assert!(text.contains("• instruments: 22 records"));
    assert!(text.contains("• accounts: 0 records"));
    assert!(text.contains("• positions: 0 records"));
    assert!(text.contains("• jobs: 0 records"));
    assert!(text.contains("Database reset complete!"));
}

#[test]
fn test_data_rerun_reports_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("alex.db");

    let first = reset_db(&db, &["--with-test-data"]);
    assert_eq!(first.status.code(), Some(0), "{}", stdout(&first));
    let first_text = stdout(&first);
    assert!(first_text.contains("Created test user"));
    assert!(first_text.contains("• positions: 5 records"));

    let second = reset_db(&db, &["--skip-drop", "--with-test-data"]);
    let text = stdout(&second);
    assert_eq!(second.status.code(), Some(0), "{text}");
    assert!(!text.contains("Dropping existing tables"));
    assert!(text.contains("Test user already exists"));
    assert!(text.contains("User already has 3 accounts"));
    assert!(text.contains("• users: 1 records"));
    assert!(text.contains("• accounts: 3 records"));
    assert!(text.contains("• positions: 5 records"));
}

#[cfg(unix)]
#[test]
fn failing_migration_exits_one_and_skips_seed() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("alex.db");
    let marker = dir.path().join("seed-ran");

    let out = Command::new(RESET_DB)
        .env("DATABASE_PATH", &db)
        .env("ALEX_MIGRATE_COMMAND", "false")
        .env("ALEX_SEED_COMMAND", format!("touch {}", marker.display()))
        .output()
        .expect("spawn reset-db");

    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Migration failed!"));
    assert!(!marker.exists(), "seed command must not run");
}

#[test]
fn missing_migration_program_exits_one_and_skips_seed() {
    let dir = tempfile::tempdir().unwrap();

    let out = Command::new(RESET_DB)
        .env("DATABASE_PATH", dir.path().join("alex.db"))
        .env("ALEX_MIGRATE_COMMAND", "/nonexistent/run-migrations")
        .env("ALEX_SEED_COMMAND", SEED_DATA)
        .env_remove("ALEX_ASCII_OUTPUT")
        .output()
        .expect("spawn reset-db");

    let text = stdout(&out);
    assert_eq!(out.status.code(), Some(1), "{text}");
    assert!(text.contains("Running migrations..."));
    assert!(!text.contains("Loading seed data"), "{text}");
    assert!(!text.contains("Database reset complete!"));
}

#[test]
fn unknown_flag_is_rejected_with_usage() {
    let dir = tempfile::tempdir().unwrap();
    let out = reset_db(&dir.path().join("alex.db"), &["--everything"]);

    assert_eq!(out.status.code(), Some(2));
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("--everything"));
    assert!(err.contains("Usage: reset-db"));
}

#[test]
fn ascii_output_contains_no_emoji() {
    let dir = tempfile::tempdir().unwrap();
    let out = Command::new(RESET_DB)
        .env("DATABASE_PATH", dir.path().join("alex.db"))
        .env("ALEX_MIGRATE_COMMAND", RUN_MIGRATIONS)
        .env("ALEX_SEED_COMMAND", SEED_DATA)
        .env("ALEX_ASCII_OUTPUT", "1")
        .output()
        .expect("spawn reset-db");

    assert_eq!(out.status.code(), Some(0));
    let text = stdout(&out);
    assert!(text.is_ascii(), "{text}");
    assert!(text.contains("[ok] Loaded 22 instruments"));
}
