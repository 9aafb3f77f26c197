//! The reset driver.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Drop tables          (skipped with --skip-drop)
//!   2. Run migrations       (external process)
//!   3. Load seed data       (external process)
//!   4. Create test fixture  (only with --with-test-data)
//!   5. Verification counts
//!
//! RULES:
//!   - Drop failures are logged and the remaining drops still run.
//!   - A failing migration or seed process stops the run; nothing after it
//!     executes.
//!   - Everything else propagates its error unchanged.

use crate::{
    config::{ResetConfig, ResetOptions},
    console::{Console, Status},
    error::{AlexError, AlexResult, Step},
    fixture::{self, FixtureReport, TEST_USER_ID},
    process::{CommandOutput, CommandRunner, ExternalCommand},
    store::{quote_ident, AlexStore},
    types::{TABLES_TO_DROP, TABLES_TO_VERIFY, TIMESTAMPED_TABLES},
};
use std::io::Write;

/// Printed by the seed loader when the full catalog went in.
pub const FULL_SEED_MARKER: &str = "22/22 instruments loaded";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropReport {
    pub dropped: Vec<String>,
    /// (object, error message) for every drop that failed.
    pub failures: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedConfirmation {
    /// The output carried `FULL_SEED_MARKER`.
    FullCatalog,
    Generic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub drop: Option<DropReport>,
    pub seed: Option<SeedConfirmation>,
    pub fixture: Option<FixtureReport>,
    /// (table, row count) in verification order.
    pub counts: Vec<(String, i64)>,
}

impl ResetReport {
    pub fn count(&self, table: &str) -> Option<i64> {
        self.counts
            .iter()
            .find(|(t, _)| t == table)
            .map(|(_, n)| *n)
    }
}

pub struct Resetter<'a, R: CommandRunner, W: Write> {
    store: &'a AlexStore,
    config: &'a ResetConfig,
    runner: R,
    console: Console<W>,
}

impl<'a, R: CommandRunner, W: Write> Resetter<'a, R, W> {
    pub fn new(store: &'a AlexStore, config: &'a ResetConfig, runner: R, console: Console<W>) -> Self {
        Self {
            store,
            config,
            runner,
            console,
        }
    }

    pub fn into_parts(self) -> (R, Console<W>) {
        (self.runner, self.console)
    }

    /// Run every step selected by `opts`.
    pub fn run(&mut self, opts: ResetOptions) -> AlexResult<ResetReport> {
        let mut report = ResetReport::default();

        self.console.status(Status::Start, "Database Reset Script")?;
        self.console.rule()?;

        if !opts.skip_drop {
            report.drop = Some(self.drop_all_tables()?);
        } else {
            log::info!("--skip-drop: leaving existing tables in place");
        }

        self.run_migrations()?;
        report.seed = Some(self.load_seed_data()?);

        if opts.with_test_data {
            report.fixture = Some(fixture::create_test_data(self.store, &mut self.console)?);
        }

        report.counts = self.verify()?;

        self.console.blank()?;
        self.console.rule()?;
        self.console.status(Status::Ok, "Database reset complete!")?;

        if opts.with_test_data {
            self.console.section(Status::Note, "Test user created:")?;
            self.console
                .detail(Status::Bullet, &format!("User ID: {TEST_USER_ID}"))?;
            self.console
                .detail(Status::Bullet, "3 accounts (401k, Roth IRA, Taxable)")?;
            self.console
                .detail(Status::Bullet, "5 positions in 401k account")?;
        }
        self.console.flush()?;
        Ok(report)
    }

    // ── 1. Drop ────────────────────────────────────────────────

    /// Drop every table, dependents first, then the `updated_at` triggers.
    /// Each statement is attempted regardless of earlier failures.
    pub fn drop_all_tables(&mut self) -> AlexResult<DropReport> {
        self.console.status(Status::Drop, "Dropping existing tables...")?;
        let mut report = DropReport::default();

        for table in TABLES_TO_DROP {
            let sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table));
            match self.store.execute(&sql) {
                Ok(()) => {
                    self.console
                        .detail(Status::Ok, &format!("Dropped {table}"))?;
                    report.dropped.push(table.to_string());
                }
                Err(e) => {
                    log::warn!("drop of {table} failed: {e}");
                    self.console
                        .detail(Status::Warn, &format!("Error dropping {table}: {e}"))?;
                    report.failures.push((table.to_string(), e.to_string()));
                }
            }
        }

        let triggers: Vec<String> = TIMESTAMPED_TABLES
            .iter()
            .map(|table| format!("update_{table}_updated_at"))
            .collect();
        let mut trigger_errors = Vec::new();
        for trigger in &triggers {
            let sql = format!("DROP TRIGGER IF EXISTS {}", quote_ident(trigger));
            if let Err(e) = self.store.execute(&sql) {
                log::warn!("drop of trigger {trigger} failed: {e}");
                trigger_errors.push((trigger.clone(), e.to_string()));
            }
        }
        if trigger_errors.is_empty() {
            self.console
                .detail(Status::Ok, "Dropped updated_at triggers")?;
        } else {
            for (trigger, e) in &trigger_errors {
                self.console
                    .detail(Status::Warn, &format!("Error dropping {trigger}: {e}"))?;
            }
            report.failures.extend(trigger_errors);
        }

        Ok(report)
    }

    // ── 2. Migrations ──────────────────────────────────────────

    pub fn run_migrations(&mut self) -> AlexResult<()> {
        self.console.section(Status::Migrate, "Running migrations...")?;
        let command = self.config.migrate_command.clone();
        self.run_step(Step::Migrations, &command)?;
        self.console.status(Status::Ok, "Migrations completed")?;
        Ok(())
    }

    // ── 3. Seed ────────────────────────────────────────────────

    pub fn load_seed_data(&mut self) -> AlexResult<SeedConfirmation> {
        self.console.section(Status::Seed, "Loading seed data...")?;
        let command = self.config.seed_command.clone();
        let output = self.run_step(Step::Seed, &command)?;

        let confirmation = seed_confirmation(&output.stdout);
        match confirmation {
            SeedConfirmation::FullCatalog => {
                self.console.status(Status::Ok, "Loaded 22 instruments")?
            }
            SeedConfirmation::Generic => self.console.status(Status::Ok, "Seed data loaded")?,
        }
        Ok(confirmation)
    }

    /// Run `command`; a non-zero exit prints the captured stderr and turns
    /// into `StepFailed`.
    fn run_step(&mut self, step: Step, command: &ExternalCommand) -> AlexResult<CommandOutput> {
        log::info!("running {step}: {}", command.display());
        let output = self.runner.run(command)?;
        if output.success() {
            return Ok(output);
        }

        let headline = match step {
            Step::Migrations => "Migration failed!",
            Step::Seed => "Seed data failed!",
        };
        log::error!("{step} exited with {:?}", output.code);
        self.console.status(Status::Fail, headline)?;
        self.console.raw(&output.stderr)?;
        self.console.flush()?;
        Err(AlexError::StepFailed {
            step,
            code: output.code,
            stderr: output.stderr,
        })
    }

    // ── 5. Verify ──────────────────────────────────────────────

    pub fn verify(&mut self) -> AlexResult<Vec<(String, i64)>> {
        self.console.section(Status::Verify, "Final verification...")?;
        let mut counts = Vec::with_capacity(TABLES_TO_VERIFY.len());
        for table in TABLES_TO_VERIFY {
            let count = self.store.count_rows(table)?;
            self.console
                .detail(Status::Bullet, &format!("{table}: {count} records"))?;
            counts.push((table.to_string(), count));
        }
        Ok(counts)
    }
}

pub fn seed_confirmation(stdout: &str) -> SeedConfirmation {
    if stdout.contains(FULL_SEED_MARKER) {
        SeedConfirmation::FullCatalog
    } else {
        SeedConfirmation::Generic
    }
}
